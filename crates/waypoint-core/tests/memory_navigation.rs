//! End-to-end navigation over the in-memory host.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::json;
use url::Url;
use waypoint_core::{
    after_fn, before_fn, BeforeInterrupt, BlockOptions, InitialMemoryOptions, NavigateOptions,
    Navigation, NavigationError, MAX_REDIRECTS,
};

fn session(url: &str) -> Navigation {
    Navigation::with_initial_url(InitialMemoryOptions::new(Url::parse(url).unwrap())).unwrap()
}

fn paths(nav: &Navigation) -> Vec<String> {
    nav.entries()
        .iter()
        .map(|e| e.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_push_back_forward_with_handler_fanout() {
    let options = InitialMemoryOptions::new(Url::parse("https://example.com/foo/1").unwrap())
        .with_state(json!({"x": 0.5}))
        .with_max_entries(3);
    let nav = Navigation::with_initial_url(options).unwrap();
    let initial = nav.current_entry();
    assert_eq!(initial.state, Some(json!({"x": 0.5})));

    let counter = Arc::new(AtomicU64::new(0));
    let _before = {
        let counter = counter.clone();
        nav.before_navigation(before_fn(move |_event| {
            counter.fetch_add(10, Ordering::SeqCst);
            Ok(None)
        }))
    };
    let _after = {
        let counter = counter.clone();
        nav.on_navigation(after_fn(move |_event| {
            let doubled = counter.load(Ordering::SeqCst) * 2;
            counter.store(doubled, Ordering::SeqCst);
        }))
    };

    nav.navigate("/foo/2", NavigateOptions::default()).await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 20);

    nav.back(None).await.unwrap();
    nav.forward(None).await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 140);

    nav.navigate("/foo/3", NavigateOptions::default()).await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 300);

    nav.traverse_to(initial.key, None).await.unwrap();
    nav.forward(None).await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1260);

    nav.navigate("/4", NavigateOptions::default()).await.unwrap();
    nav.navigate("/5", NavigateOptions::default()).await.unwrap();
    nav.navigate("/6", NavigateOptions::default()).await.unwrap();
    assert_eq!(paths(&nav), vec!["/4", "/5", "/6"]);
}

#[tokio::test]
async fn test_redirect_from_before_handler() {
    let nav = session("https://example.com/foo/1");
    let _guard = nav.before_navigation(before_fn(|event| {
        if event.to.url().path() == "/foo/1" {
            Err(BeforeInterrupt::redirect("/bar/42"))
        } else {
            Ok(None)
        }
    }));

    let entry = nav.navigate("/foo/1", NavigateOptions::default()).await.unwrap();
    assert_eq!(entry.url.path(), "/bar/42");
    assert_eq!(paths(&nav), vec!["/bar/42"]);
}

#[tokio::test]
async fn test_cancel_from_before_handler() {
    let nav = session("https://example.com/foo/1");
    let _guard = nav.before_navigation(before_fn(|event| {
        if event.to.url().path() == "/bar/42" {
            Err(BeforeInterrupt::Cancel)
        } else {
            Ok(None)
        }
    }));

    let entry = nav.navigate("/bar/42", NavigateOptions::default()).await.unwrap();
    assert_eq!(entry.url.path(), "/foo/1");
    assert_eq!(paths(&nav), vec!["/foo/1"]);
}

#[tokio::test]
async fn test_after_handler_observes_committed_url_only() {
    let nav = session("https://example.com/foo/1");
    let polls = Arc::new(AtomicU64::new(0));
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

    let _before = {
        let polls = polls.clone();
        nav.before_navigation(before_fn(move |event| {
            polls.fetch_add(1, Ordering::SeqCst);
            if event.to.url().path() == "/foo/2" {
                Err(BeforeInterrupt::redirect("/bar/42"))
            } else {
                Ok(None)
            }
        }))
    };
    let _after = {
        let seen = seen.clone();
        nav.on_navigation(after_fn(move |event| {
            seen.lock().unwrap().push(event.destination.url.path().to_string());
        }))
    };

    nav.navigate("/foo/2", NavigateOptions::default()).await.unwrap();
    assert_eq!(polls.load(Ordering::SeqCst), 2);
    assert_eq!(*seen.lock().unwrap(), vec!["/bar/42"]);
}

#[tokio::test]
async fn test_blocking_confirm_and_cancel() {
    let nav = session("https://example.com/foo/1");
    {
        let block = nav.use_block_navigation(BlockOptions::default());
        let did_block = Arc::new(AtomicBool::new(false));
        let task = {
            let did_block = did_block.clone();
            block.when_blocked(move |blocked| {
                did_block.store(true, Ordering::SeqCst);
                blocked.confirm();
            })
        };

        let entry = nav.navigate("/bar/42", NavigateOptions::default()).await.unwrap();
        assert_eq!(entry.url.path(), "/bar/42");
        assert!(did_block.load(Ordering::SeqCst));
        task.abort();
    }

    let nav = session("https://example.com/foo/1");
    let block = nav.use_block_navigation(BlockOptions::default());
    let task = block.when_blocked(|blocked| blocked.cancel());

    let entry = nav.navigate("/bar/42", NavigateOptions::default()).await.unwrap();
    assert_eq!(entry.url.path(), "/foo/1");
    task.abort();
}

#[tokio::test]
async fn test_back_and_forward_round_trip_regenerates_ids() {
    let nav = session("https://example.com/foo/1");
    nav.navigate("/foo/2", NavigateOptions::default()).await.unwrap();
    let before = nav.current_entry();
    let keys_before: Vec<_> = nav.entries().iter().map(|e| e.key).collect();

    nav.back(None).await.unwrap();
    let after = nav.forward(None).await.unwrap();

    let keys_after: Vec<_> = nav.entries().iter().map(|e| e.key).collect();
    assert_eq!(keys_before, keys_after);
    assert_eq!(after.key, before.key);
    assert_eq!(after.url, before.url);
    assert_ne!(after.id, before.id);
}

#[tokio::test]
async fn test_replace_twice_is_idempotent_on_shape() {
    let nav = session("https://example.com/foo/1");

    let first = nav
        .navigate("/bar", NavigateOptions::replace())
        .await
        .unwrap();
    let second = nav
        .navigate("/bar", NavigateOptions::replace())
        .await
        .unwrap();

    assert_eq!(nav.entries().len(), 1);
    assert_eq!(first.key, second.key);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_boundaries() {
    let nav = session("https://example.com/foo/1");
    let initial = nav.current_entry();

    assert_eq!(nav.back(None).await.unwrap(), initial);
    assert_eq!(nav.forward(None).await.unwrap(), initial);
    assert_eq!(
        nav.traverse_to(uuid::Uuid::new_v4(), None).await.unwrap(),
        initial
    );
    assert!(!nav.can_go_back());
    assert!(!nav.can_go_forward());
}

#[tokio::test]
async fn test_redirect_loop_is_fatal() {
    let nav = session("https://example.com/foo/1");
    let _guard = nav.before_navigation(before_fn(|_event| {
        Err(BeforeInterrupt::redirect("/loop"))
    }));

    let err = nav.navigate("/start", NavigateOptions::default()).await.unwrap_err();
    let waypoint_core::CoreError::Navigation(err) = err else {
        panic!("expected a navigation error");
    };
    assert!(matches!(err, NavigationError::RedirectLoop(MAX_REDIRECTS)));
}

#[tokio::test]
async fn test_equal_states_emit_no_change() {
    let nav = session("https://example.com/foo/1");
    let mut rx = nav.subscribe();
    rx.borrow_and_update();

    nav.back(None).await.unwrap();
    assert!(!rx.has_changed().unwrap());

    nav.navigate("/foo/2", NavigateOptions::default()).await.unwrap();
    assert!(rx.has_changed().unwrap());
}

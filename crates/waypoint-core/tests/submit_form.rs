//! Form submission against the navigation session.

use url::Url;
use waypoint_core::{
    FormMethod, FormSubmission, InitialMemoryOptions, Navigation, SubmitResponse,
};
use waypoint_submit::testing::CannedClient;

fn session() -> Navigation {
    Navigation::with_initial_url(InitialMemoryOptions::new(
        Url::parse("https://example.com/foo/1").unwrap(),
    ))
    .unwrap()
}

fn redirect() -> SubmitResponse {
    SubmitResponse {
        status: 302,
        headers: vec![(
            "location".to_string(),
            "https://example.com/bar/42".to_string(),
        )],
        body: String::new(),
    }
}

#[tokio::test]
async fn test_get_submit_follows_redirect() {
    let nav = session();
    let client = CannedClient::respond(redirect());

    let (destination, response) = nav
        .submit(&client, FormSubmission::new(FormMethod::Get, "foo"))
        .await
        .unwrap();

    assert_eq!(destination.url.path(), "/bar/42");
    assert_eq!(response.status, 302);
    assert_eq!(response.location(), Some("https://example.com/bar/42"));
    // The redirect replaced the current entry.
    assert_eq!(nav.entries().len(), 1);
    assert_eq!(nav.current_entry().url.path(), "/bar/42");
}

#[tokio::test]
async fn test_post_submit_follows_redirect() {
    let nav = session();
    let client = CannedClient::respond(redirect());

    let (destination, response) = nav
        .submit(&client, FormSubmission::new(FormMethod::Post, "foo"))
        .await
        .unwrap();

    assert_eq!(destination.url.path(), "/bar/42");
    assert_eq!(response.status, 302);
    assert_eq!(nav.current_entry().url.path(), "/bar/42");
}

#[tokio::test]
async fn test_client_error_leaves_navigation_unchanged() {
    let nav = session();
    let client = CannedClient::respond(SubmitResponse {
        status: 400,
        headers: vec![],
        body: "bad request".to_string(),
    });

    let (destination, response) = nav
        .submit(&client, FormSubmission::new(FormMethod::Post, "foo"))
        .await
        .unwrap();

    assert_eq!(destination.url.path(), "/foo/1");
    assert_eq!(response.status, 400);
    assert_eq!(nav.current_entry().url.path(), "/foo/1");
}

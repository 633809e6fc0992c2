//! Platform-Navigation adapter
//!
//! Binds to a host that exposes a first-class Navigation API. The host owns
//! the truth: commits delegate to its promise-based operations and the
//! engine adopts the host's entry list after every commit. Host-initiated
//! `navigate` events run the engine's after-handlers when they are
//! intercept-eligible.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;
use uuid::Uuid;
use waypoint_engine::{
    Engine, EngineConfig, HostAdapter, NavigationError, Result,
};
use waypoint_model::{
    Destination, HistoryMode, NavigationEvent, NavigationState, TransitionEvent, TransitionKind,
    DEFAULT_MAX_ENTRIES,
};

/// One native history entry as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformEntry {
    pub id: String,
    pub key: String,
    pub url: Url,
    pub state: Option<Value>,
    pub same_document: bool,
}

/// Promise-based operations of a platform Navigation API host.
///
/// The async writes resolve when the host reports the navigation as
/// committed; rejections surface as [`NavigationError`].
#[async_trait]
pub trait PlatformHost: Send + Sync {
    fn entries(&self) -> Vec<PlatformEntry>;
    fn current_index(&self) -> usize;

    async fn navigate(
        &self,
        url: &Url,
        mode: HistoryMode,
        state: Option<Value>,
        info: Option<Value>,
    ) -> Result<()>;
    async fn reload(&self, state: Option<Value>, info: Option<Value>) -> Result<()>;
    async fn traverse_to(&self, key: Uuid, info: Option<Value>) -> Result<()>;
}

/// A host `navigate` event offered for interception.
#[derive(Debug, Clone)]
pub struct PlatformNavigateEvent {
    pub kind: TransitionKind,
    pub destination: Destination,
    pub info: Option<Value>,
    pub can_intercept: bool,
    pub hash_change: bool,
    pub download_request: bool,
    pub form_data: bool,
}

impl PlatformNavigateEvent {
    /// Hash-only moves, downloads, and form submissions stay with the host.
    pub fn should_intercept(&self) -> bool {
        self.can_intercept && !self.hash_change && !self.download_request && !self.form_data
    }
}

struct PlatformCommitter {
    host: Arc<dyn PlatformHost>,
}

#[async_trait]
impl HostAdapter for PlatformCommitter {
    async fn commit(&self, to: &Destination, event: &TransitionEvent) -> Result<()> {
        match event.kind {
            TransitionKind::Push => {
                self.host
                    .navigate(
                        &to.url,
                        HistoryMode::Push,
                        to.state.clone(),
                        event.info.clone(),
                    )
                    .await
            }
            TransitionKind::Replace => {
                self.host
                    .navigate(
                        &to.url,
                        HistoryMode::Replace,
                        to.state.clone(),
                        event.info.clone(),
                    )
                    .await
            }
            TransitionKind::Reload => {
                self.host.reload(to.state.clone(), event.info.clone()).await
            }
            TransitionKind::Traverse => {
                self.host.traverse_to(to.key, event.info.clone()).await
            }
        }
    }

    fn refreshed_state(&self) -> Option<NavigationState> {
        project(self.host.as_ref())
    }
}

/// Project the host's entry list and index into a navigation state.
///
/// Host identifiers are kept when they are valid UUIDs and reminted
/// otherwise.
fn project(host: &dyn PlatformHost) -> Option<NavigationState> {
    let entries: Vec<Destination> = host
        .entries()
        .into_iter()
        .map(|entry| Destination {
            id: parse_uuid(&entry.id),
            key: parse_uuid(&entry.key),
            url: entry.url,
            state: entry.state,
            same_document: entry.same_document,
        })
        .collect();
    let index = host.current_index();
    NavigationState::new(entries, index).ok()
}

fn parse_uuid(raw: &str) -> Uuid {
    raw.parse().unwrap_or_else(|_| {
        tracing::debug!(raw, "host entry id is not a UUID, reminting");
        Uuid::new_v4()
    })
}

/// One bound platform Navigation host.
pub struct PlatformSession {
    engine: Arc<Engine>,
}

impl PlatformSession {
    pub fn bind(host: Arc<dyn PlatformHost>) -> Result<Arc<Self>> {
        let initial = project(host.as_ref()).ok_or_else(|| {
            NavigationError::Host("platform host reports no entries".to_string())
        })?;
        let origin = Url::parse(&initial.current().url.origin().ascii_serialization())
            .map_err(|err| NavigationError::Host(format!("host origin: {err}")))?;

        let engine = Arc::new(Engine::new(EngineConfig {
            initial,
            origin,
            base: "/".to_string(),
            max_entries: DEFAULT_MAX_ENTRIES,
            adapter: Arc::new(PlatformCommitter { host }),
        }));

        Ok(Arc::new(Self { engine }))
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Offer a host `navigate` event for interception.
    ///
    /// Intercept-eligible events run the engine's after-handlers (the
    /// before-handlers already ran while the engine committed) and report
    /// `true`; everything else is left to the host.
    pub async fn on_navigate_event(&self, event: PlatformNavigateEvent) -> bool {
        if !event.should_intercept() {
            return false;
        }

        self.engine
            .emit_navigation(NavigationEvent {
                kind: event.kind,
                destination: event.destination,
                info: event.info,
            })
            .await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_engine::after_fn;
    use waypoint_model::NavigateOptions;

    use crate::testing::FakePlatform;

    #[tokio::test]
    async fn test_bind_projects_host_entries() {
        let host = FakePlatform::new("https://example.com/foo/1");
        let session = PlatformSession::bind(host.clone()).unwrap();

        let entry = session.engine().current_entry();
        assert_eq!(entry.url.as_str(), "https://example.com/foo/1");
        assert_eq!(entry.id.to_string(), host.entries()[0].id);
        assert_eq!(entry.key.to_string(), host.entries()[0].key);
    }

    #[tokio::test]
    async fn test_commit_adopts_host_truth() {
        let host = FakePlatform::new("https://example.com/foo/1");
        let session = PlatformSession::bind(host.clone()).unwrap();

        let entry = session
            .engine()
            .navigate("/foo/2", NavigateOptions::default())
            .await
            .unwrap();

        // The host minted the entry; the engine mirrors it.
        let host_current = &host.entries()[host.current_index()];
        assert_eq!(entry.id.to_string(), host_current.id);
        assert_eq!(entry.url.as_str(), "https://example.com/foo/2");
        assert_eq!(session.engine().entries().len(), 2);
    }

    #[tokio::test]
    async fn test_traverse_delegates_to_host() {
        let host = FakePlatform::new("https://example.com/foo/1");
        let session = PlatformSession::bind(host.clone()).unwrap();
        session
            .engine()
            .navigate("/foo/2", NavigateOptions::default())
            .await
            .unwrap();

        let entry = session.engine().back(None).await.unwrap();
        assert_eq!(entry.url.path(), "/foo/1");
        assert_eq!(host.current_index(), 0);
    }

    #[tokio::test]
    async fn test_host_rejection_surfaces() {
        let host = FakePlatform::new("https://example.com/foo/1");
        let session = PlatformSession::bind(host.clone()).unwrap();
        host.fail_commits();

        let err = session
            .engine()
            .navigate("/foo/2", NavigateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NavigationError::Host(_)));
        assert_eq!(session.engine().entries().len(), 1);
    }

    #[tokio::test]
    async fn test_navigate_event_interception() {
        let host = FakePlatform::new("https://example.com/foo/1");
        let session = PlatformSession::bind(host.clone()).unwrap();

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let _guard = {
            let seen = seen.clone();
            session.engine().on_navigation(after_fn(move |event| {
                seen.lock().push(event.destination.url.path().to_string());
            }))
        };

        host.emulate_navigate("https://example.com/bar");
        let destination = project(host.as_ref()).unwrap().current().clone();

        let event = PlatformNavigateEvent {
            kind: TransitionKind::Push,
            destination: destination.clone(),
            info: None,
            can_intercept: true,
            hash_change: false,
            download_request: false,
            form_data: false,
        };
        assert!(session.on_navigate_event(event).await);
        assert_eq!(*seen.lock(), vec!["/bar"]);

        // Form submissions stay with the host.
        let event = PlatformNavigateEvent {
            kind: TransitionKind::Push,
            destination,
            info: None,
            can_intercept: true,
            hash_change: false,
            download_request: false,
            form_data: true,
        };
        assert!(!session.on_navigate_event(event).await);
        assert_eq!(seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_host_ids_are_reminted() {
        let host = FakePlatform::new("https://example.com/foo/1");
        {
            // Corrupt the host's identifiers.
            let mut entries = host.entries();
            entries[0].id = "not-a-uuid".to_string();
            host.replace_entries(entries);
        }

        let session = PlatformSession::bind(host.clone()).unwrap();
        let entry = session.engine().current_entry();
        assert_ne!(entry.id.to_string(), "not-a-uuid");
    }
}

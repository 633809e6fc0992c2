//! History-API adapter
//!
//! Binds the engine to a host window that only has the legacy History and
//! location API. The five history mutators are patched so application calls
//! route through the engine instead of mutating the host store, and
//! `popstate`/`hashchange` listeners feed external moves back in with
//! commit suppressed. Entry identity is persisted in the host store through
//! the patched state marker.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use url::Url;
use waypoint_engine::{
    CommitMode, Engine, EngineConfig, HostAdapter, NavigationError, Result,
};
use waypoint_model::{
    Destination, HistoryMode, NavigateOptions, NavigationState, StateMarker, TransitionEvent,
    TransitionKind, DEFAULT_MAX_ENTRIES,
};

/// Raw operations and patch points of a History-API host window.
///
/// The `raw_*` writes are the host's original mutators; the adapter calls
/// them from commit. `install_patch` reroutes the public mutators and the
/// `popstate`/`hashchange` events into the given sink, and `restore` puts
/// the originals back.
pub trait HistoryHost: Send + Sync {
    fn location(&self) -> Url;
    fn raw_state(&self) -> Option<Value>;
    /// The `<base href>` of the hosting document, if any.
    fn base_href(&self) -> Option<String>;

    fn raw_push_state(&self, state: Option<Value>, url: &Url);
    fn raw_replace_state(&self, state: Option<Value>, url: &Url);
    fn raw_go(&self, delta: i64);
    fn raw_reload(&self);

    fn install_patch(&self, sink: HostEventSink);
    fn restore(&self);
}

pub type HostEventSink = Arc<dyn Fn(HostEvent) + Send + Sync>;

/// Events the patched host surface feeds back to the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Application called the patched `pushState`.
    PushState { state: Option<Value>, url: String },
    /// Application called the patched `replaceState`.
    ReplaceState {
        state: Option<Value>,
        url: Option<String>,
    },
    /// Application called the patched `go`/`back`/`forward`.
    Traverse { delta: i64 },
    /// The host already moved to another entry.
    PopState { state: Option<Value> },
    /// The host changed the fragment in place.
    HashChange { url: String },
}

struct HistoryCommitter {
    host: Arc<dyn HistoryHost>,
}

#[async_trait]
impl HostAdapter for HistoryCommitter {
    async fn commit(&self, to: &Destination, event: &TransitionEvent) -> Result<()> {
        let marker = to.marker().encode();
        match event.kind {
            TransitionKind::Push => self.host.raw_push_state(Some(marker), &to.url),
            TransitionKind::Replace => self.host.raw_replace_state(Some(marker), &to.url),
            TransitionKind::Reload => self.host.raw_reload(),
            TransitionKind::Traverse => {
                // The move itself, then reattach identity at the new slot.
                self.host.raw_go(event.delta);
                self.host.raw_replace_state(Some(marker), &to.url);
            }
        }
        Ok(())
    }
}

/// One bound History-API window. Unbinding (drop) restores the host.
pub struct HistorySession {
    engine: Arc<Engine>,
    host: Arc<dyn HistoryHost>,
    pump: parking_lot::Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl HistorySession {
    /// Patch the host and seed the engine from its current entry.
    ///
    /// Must run inside a tokio runtime; the patched event stream is drained
    /// by a background task for as long as the session lives.
    pub fn bind(host: Arc<dyn HistoryHost>) -> Result<Arc<Self>> {
        let location = host.location();
        let origin = Url::parse(&location.origin().ascii_serialization())
            .map_err(|err| NavigationError::Host(format!("host origin: {err}")))?;
        let base = host.base_href().unwrap_or_else(|| "/".to_string());

        let initial = Destination::new(location, host.raw_state(), &origin.origin());
        // Persist identity for the seeded entry, so an external move back to
        // it rehydrates instead of reminting.
        host.raw_replace_state(Some(initial.marker().encode()), &initial.url);
        let engine = Arc::new(Engine::new(EngineConfig {
            initial: NavigationState::single(initial),
            origin,
            base,
            max_entries: DEFAULT_MAX_ENTRIES,
            adapter: Arc::new(HistoryCommitter { host: host.clone() }),
        }));

        let session = Arc::new(Self {
            engine,
            host: host.clone(),
            pump: parking_lot::Mutex::new(None),
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink: HostEventSink = Arc::new(move |event| {
            let _ = tx.send(event);
        });
        host.install_patch(sink);

        let weak = Arc::downgrade(&session);
        let pump = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(session) = weak.upgrade() else { break };
                if let Err(err) = session.handle_host_event(event).await {
                    tracing::warn!(error = %err, "host history event failed");
                }
            }
        });
        *session.pump.lock() = Some(pump);

        Ok(session)
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// The caller-visible history state: the marker envelope is unwrapped,
    /// anything else passes through.
    pub fn state(&self) -> Option<Value> {
        let raw = self.host.raw_state();
        match StateMarker::decode_opt(raw.as_ref()) {
            Some(marker) => marker.state,
            None => raw,
        }
    }

    /// Replace the caller-visible state; the store keeps its marker.
    pub async fn set_state(&self, state: Option<Value>) -> Result<Destination> {
        self.engine.update_current_entry(state).await
    }

    /// Translate one patched host event into an engine transition.
    ///
    /// This is what the background pump runs for every event the patch
    /// emits; tests can call it directly for deterministic sequencing.
    pub async fn handle_host_event(&self, event: HostEvent) -> Result<Destination> {
        match event {
            HostEvent::PushState { state, url } => {
                let options = NavigateOptions {
                    history: HistoryMode::Auto,
                    state,
                    info: None,
                };
                self.engine
                    .navigate_with(&url, options, CommitMode::Commit)
                    .await
            }
            HostEvent::ReplaceState {
                state,
                url: Some(url),
            } => {
                let options = NavigateOptions {
                    history: HistoryMode::Replace,
                    state,
                    info: None,
                };
                self.engine
                    .navigate_with(&url, options, CommitMode::Commit)
                    .await
            }
            HostEvent::ReplaceState { state, url: None } => {
                self.engine
                    .update_current_entry_with(state, CommitMode::Commit)
                    .await
            }
            HostEvent::Traverse { delta } => {
                let snapshot = self.engine.snapshot();
                let target = snapshot.index as i64 + delta;
                if target < 0 || target >= snapshot.entries.len() as i64 {
                    return Ok(snapshot.current().clone());
                }
                let key = snapshot.entries[target as usize].key;
                self.engine.traverse_to(key, None).await
            }
            HostEvent::PopState { state } => {
                let url = self.host.location();
                let known_slot = StateMarker::decode_opt(state.as_ref())
                    .and_then(|marker| self.engine.snapshot().position_of(marker.key));

                match known_slot {
                    Some(_) => {
                        // The marker names a slot we track: rehydrate its
                        // identity and traverse without echoing the move.
                        let to = Destination::new(url, state, &self.engine.origin());
                        self.engine
                            .traverse_adopting(to, None, CommitMode::Skip)
                            .await
                    }
                    None => {
                        let options = NavigateOptions {
                            history: HistoryMode::Replace,
                            state,
                            info: None,
                        };
                        self.engine
                            .navigate_with(url.as_str(), options, CommitMode::Skip)
                            .await
                    }
                }
            }
            HostEvent::HashChange { url } => {
                let options = NavigateOptions {
                    history: HistoryMode::Replace,
                    state: self.host.raw_state(),
                    info: None,
                };
                self.engine
                    .navigate_with(&url, options, CommitMode::Skip)
                    .await
            }
        }
    }
}

impl Drop for HistorySession {
    fn drop(&mut self) {
        self.host.restore();
        if let Some(pump) = self.pump.lock().take() {
            pump.abort();
        }
    }
}

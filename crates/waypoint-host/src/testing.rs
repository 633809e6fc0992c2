//! In-process fake hosts
//!
//! Scriptable stand-ins for a browser window and a platform Navigation API,
//! used by the adapter tests and by downstream crates that need a host
//! without a browser.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use url::Url;
use uuid::Uuid;
use waypoint_engine::{NavigationError, Result};
use waypoint_model::HistoryMode;

use crate::history::{HistoryHost, HostEvent, HostEventSink};
use crate::platform::{PlatformEntry, PlatformHost};

/// A fake window with a History-API shaped store.
///
/// The public mutators (`push_state`, `replace_state`, `go`, ...) behave
/// like the patched surface: while a patch is installed they emit events
/// into its sink instead of touching the store. The `emulate_*` methods act
/// as the browser itself: they mutate the store directly and can dispatch
/// `popstate`/`hashchange` to the installed listeners.
pub struct FakeWindow {
    inner: Mutex<WindowInner>,
}

struct WindowInner {
    entries: Vec<(Url, Option<Value>)>,
    index: usize,
    base_href: Option<String>,
    sink: Option<HostEventSink>,
    reloads: usize,
}

impl FakeWindow {
    pub fn new(url: &str) -> Arc<Self> {
        let url = Url::parse(url).expect("fake window url");
        Arc::new(Self {
            inner: Mutex::new(WindowInner {
                entries: vec![(url, None)],
                index: 0,
                base_href: None,
                sink: None,
                reloads: 0,
            }),
        })
    }

    pub fn with_base(url: &str, base: &str) -> Arc<Self> {
        let window = Self::new(url);
        window.inner.lock().base_href = Some(base.to_string());
        window
    }

    /// Set the raw state of the current entry, as a page loaded with
    /// pre-existing history state would see it.
    pub fn seed_state(&self, state: Value) {
        let mut inner = self.inner.lock();
        let index = inner.index;
        inner.entries[index].1 = Some(state);
    }

    pub fn href(&self) -> Url {
        let inner = self.inner.lock();
        inner.entries[inner.index].0.clone()
    }

    /// The raw (possibly marker-wrapped) state of the current entry.
    pub fn state(&self) -> Option<Value> {
        let inner = self.inner.lock();
        inner.entries[inner.index].1.clone()
    }

    pub fn entry_count(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn reload_count(&self) -> usize {
        self.inner.lock().reloads
    }

    pub fn patched(&self) -> bool {
        self.inner.lock().sink.is_some()
    }

    // Patched public surface.

    pub fn push_state(&self, state: Option<Value>, url: &str) {
        match self.sink() {
            Some(sink) => sink(HostEvent::PushState {
                state,
                url: url.to_string(),
            }),
            None => {
                let resolved = self.resolve(url);
                self.raw_push_state(state, &resolved);
            }
        }
    }

    pub fn replace_state(&self, state: Option<Value>, url: Option<&str>) {
        match self.sink() {
            Some(sink) => sink(HostEvent::ReplaceState {
                state,
                url: url.map(str::to_string),
            }),
            None => {
                let resolved = url
                    .map(|url| self.resolve(url))
                    .unwrap_or_else(|| self.href());
                self.raw_replace_state(state, &resolved);
            }
        }
    }

    pub fn go(&self, delta: i64) {
        match self.sink() {
            Some(sink) => sink(HostEvent::Traverse { delta }),
            None => self.raw_go(delta),
        }
    }

    pub fn back(&self) {
        self.go(-1);
    }

    pub fn forward(&self) {
        self.go(1);
    }

    // Browser-side emulation.

    /// Move through the store without notifying anyone, as a precursor to
    /// `dispatch_popstate`.
    pub fn emulate_traverse(&self, delta: i64) {
        self.raw_go(delta);
    }

    /// Replace the current entry with one this session never produced.
    pub fn emulate_external_entry(&self, url: &str, state: Option<Value>) {
        let url = Url::parse(url).expect("external entry url");
        let mut inner = self.inner.lock();
        let index = inner.index;
        inner.entries[index] = (url, state);
    }

    /// Change the fragment of the current entry in place.
    pub fn emulate_hash(&self, fragment: &str) {
        let mut inner = self.inner.lock();
        let index = inner.index;
        let mut url = inner.entries[index].0.clone();
        url.set_fragment(Some(fragment.trim_start_matches('#')));
        inner.entries[index].0 = url;
    }

    /// Fire `popstate` for the current entry at the installed listeners.
    pub fn dispatch_popstate(&self) {
        if let Some(sink) = self.sink() {
            sink(HostEvent::PopState {
                state: self.state(),
            });
        }
    }

    /// Fire `hashchange` with the current URL at the installed listeners.
    pub fn dispatch_hashchange(&self) {
        if let Some(sink) = self.sink() {
            sink(HostEvent::HashChange {
                url: self.href().to_string(),
            });
        }
    }

    fn sink(&self) -> Option<HostEventSink> {
        self.inner.lock().sink.clone()
    }

    fn resolve(&self, url: &str) -> Url {
        self.href().join(url).expect("relative url against href")
    }
}

impl HistoryHost for FakeWindow {
    fn location(&self) -> Url {
        self.href()
    }

    fn raw_state(&self) -> Option<Value> {
        self.state()
    }

    fn base_href(&self) -> Option<String> {
        self.inner.lock().base_href.clone()
    }

    fn raw_push_state(&self, state: Option<Value>, url: &Url) {
        let mut inner = self.inner.lock();
        let index = inner.index;
        inner.entries.truncate(index + 1);
        inner.entries.push((url.clone(), state));
        inner.index += 1;
    }

    fn raw_replace_state(&self, state: Option<Value>, url: &Url) {
        let mut inner = self.inner.lock();
        let index = inner.index;
        inner.entries[index] = (url.clone(), state);
    }

    fn raw_go(&self, delta: i64) {
        let mut inner = self.inner.lock();
        let target = inner.index as i64 + delta;
        if target >= 0 && target < inner.entries.len() as i64 {
            inner.index = target as usize;
        }
    }

    fn raw_reload(&self) {
        self.inner.lock().reloads += 1;
    }

    fn install_patch(&self, sink: HostEventSink) {
        self.inner.lock().sink = Some(sink);
    }

    fn restore(&self) {
        self.inner.lock().sink = None;
    }
}

/// A fake platform Navigation API owning its own entry list.
pub struct FakePlatform {
    inner: Mutex<PlatformInner>,
}

struct PlatformInner {
    entries: Vec<PlatformEntry>,
    index: usize,
    fail_commits: bool,
}

impl FakePlatform {
    pub fn new(url: &str) -> Arc<Self> {
        let url = Url::parse(url).expect("fake platform url");
        Arc::new(Self {
            inner: Mutex::new(PlatformInner {
                entries: vec![PlatformEntry {
                    id: Uuid::new_v4().to_string(),
                    key: Uuid::new_v4().to_string(),
                    url,
                    state: None,
                    same_document: true,
                }],
                index: 0,
                fail_commits: false,
            }),
        })
    }

    /// Make every subsequent commit fail, as a host rejecting navigations.
    pub fn fail_commits(&self) {
        self.inner.lock().fail_commits = true;
    }

    /// Overwrite the host's entry list, keeping the index in range.
    pub fn replace_entries(&self, entries: Vec<PlatformEntry>) {
        let mut inner = self.inner.lock();
        inner.index = inner.index.min(entries.len().saturating_sub(1));
        inner.entries = entries;
    }

    /// Host-initiated navigation, bypassing any engine.
    pub fn emulate_navigate(&self, url: &str) {
        let url = Url::parse(url).expect("platform navigate url");
        let mut inner = self.inner.lock();
        let index = inner.index;
        inner.entries.truncate(index + 1);
        inner.entries.push(PlatformEntry {
            id: Uuid::new_v4().to_string(),
            key: Uuid::new_v4().to_string(),
            url,
            state: None,
            same_document: true,
        });
        inner.index += 1;
    }

    fn check(&self) -> Result<()> {
        if self.inner.lock().fail_commits {
            Err(NavigationError::Host("platform rejected commit".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PlatformHost for FakePlatform {
    fn entries(&self) -> Vec<PlatformEntry> {
        self.inner.lock().entries.clone()
    }

    fn current_index(&self) -> usize {
        self.inner.lock().index
    }

    async fn navigate(
        &self,
        url: &Url,
        mode: HistoryMode,
        state: Option<Value>,
        _info: Option<Value>,
    ) -> Result<()> {
        self.check()?;
        let mut inner = self.inner.lock();
        let index = inner.index;
        let entry = PlatformEntry {
            id: Uuid::new_v4().to_string(),
            key: match mode {
                HistoryMode::Replace => inner.entries[index].key.clone(),
                _ => Uuid::new_v4().to_string(),
            },
            url: url.clone(),
            state,
            same_document: true,
        };
        match mode {
            HistoryMode::Replace => inner.entries[index] = entry,
            _ => {
                inner.entries.truncate(index + 1);
                inner.entries.push(entry);
                inner.index += 1;
            }
        }
        Ok(())
    }

    async fn reload(&self, state: Option<Value>, _info: Option<Value>) -> Result<()> {
        self.check()?;
        let mut inner = self.inner.lock();
        let index = inner.index;
        if state.is_some() {
            inner.entries[index].state = state;
        }
        inner.entries[index].id = Uuid::new_v4().to_string();
        Ok(())
    }

    async fn traverse_to(&self, key: Uuid, _info: Option<Value>) -> Result<()> {
        self.check()?;
        let mut inner = self.inner.lock();
        let target = inner
            .entries
            .iter()
            .position(|entry| entry.key == key.to_string());
        match target {
            Some(target) => {
                inner.index = target;
                inner.entries[target].id = Uuid::new_v4().to_string();
                Ok(())
            }
            None => Err(NavigationError::Host(format!(
                "platform has no entry with key {key}"
            ))),
        }
    }
}

//! In-memory adapter
//!
//! No external store: commit is a no-op and the engine's own state is the
//! only truth. Used for tests and server-side rendering.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;
use waypoint_engine::{Engine, EngineConfig, HostAdapter, NavigationError, Result};
use waypoint_model::{Destination, NavigationState, TransitionEvent, DEFAULT_MAX_ENTRIES};

pub struct MemoryAdapter;

#[async_trait]
impl HostAdapter for MemoryAdapter {
    async fn commit(&self, _to: &Destination, _event: &TransitionEvent) -> Result<()> {
        Ok(())
    }
}

/// Configuration for an engine seeded with an existing entry list.
pub struct MemoryOptions {
    pub entries: Vec<Destination>,
    pub current_index: usize,
    /// Defaults to the origin of the first entry.
    pub origin: Option<Url>,
    pub base: Option<String>,
    pub max_entries: Option<usize>,
    /// Override the no-op commit, e.g. to mirror entries elsewhere.
    pub commit: Option<Arc<dyn HostAdapter>>,
}

impl MemoryOptions {
    pub fn new(entries: Vec<Destination>, current_index: usize) -> Self {
        Self {
            entries,
            current_index,
            origin: None,
            base: None,
            max_entries: None,
            commit: None,
        }
    }
}

/// Configuration for an engine starting from a single URL.
pub struct InitialMemoryOptions {
    pub url: Url,
    pub state: Option<Value>,
    pub origin: Option<Url>,
    pub base: Option<String>,
    pub max_entries: Option<usize>,
    pub commit: Option<Arc<dyn HostAdapter>>,
}

impl InitialMemoryOptions {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            state: None,
            origin: None,
            base: None,
            max_entries: None,
            commit: None,
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Expand into full options with a single seeded entry.
    pub fn into_memory_options(self) -> MemoryOptions {
        let origin_url = self
            .origin
            .clone()
            .unwrap_or_else(|| origin_of(&self.url));
        let entry = Destination::new(self.url, self.state, &origin_url.origin());
        MemoryOptions {
            entries: vec![entry],
            current_index: 0,
            origin: Some(origin_url),
            base: self.base,
            max_entries: self.max_entries,
            commit: self.commit,
        }
    }
}

/// Build an engine over the in-memory adapter.
pub fn memory_engine(options: MemoryOptions) -> Result<Engine> {
    let origin = match options.origin {
        Some(origin) => origin,
        None => {
            let first = options.entries.first().ok_or_else(|| {
                NavigationError::Host("memory navigation needs at least one entry".to_string())
            })?;
            origin_of(&first.url)
        }
    };

    let initial = NavigationState::new(options.entries, options.current_index)?;
    Ok(Engine::new(EngineConfig {
        initial,
        origin,
        base: options.base.unwrap_or_else(|| "/".to_string()),
        max_entries: options.max_entries.unwrap_or(DEFAULT_MAX_ENTRIES),
        adapter: options.commit.unwrap_or_else(|| Arc::new(MemoryAdapter)),
    }))
}

fn origin_of(url: &Url) -> Url {
    // The origin serialization always re-parses.
    Url::parse(&url.origin().ascii_serialization())
        .unwrap_or_else(|_| url.clone())
}

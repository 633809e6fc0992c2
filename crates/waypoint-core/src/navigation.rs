//! Navigation session
//!
//! Thin façade over the transition engine: constructors pick the host
//! binding, everything else forwards.

use std::sync::Arc;

use serde_json::Value;
use url::Origin;
use uuid::Uuid;

use waypoint_engine::{
    use_block_navigation, AfterHandler, BeforeHandler, BlockNavigation, BlockOptions, Engine,
    HandlerGuard,
};
use waypoint_host::{
    memory_engine, HistoryHost, HistorySession, InitialMemoryOptions, MemoryOptions,
    PlatformHost, PlatformSession,
};
use waypoint_model::{
    Destination, NavigateOptions, NavigationState, TransitionEvent,
};
use waypoint_submit::{FormSubmission, HttpClient, SubmitResponse};

use crate::Result;

/// One navigation session over a single window's history.
pub struct Navigation {
    engine: Arc<Engine>,
    history: Option<Arc<HistorySession>>,
    platform: Option<Arc<PlatformSession>>,
}

impl Navigation {
    /// A session over a caller-provided entry list, with no external store.
    pub fn in_memory(options: MemoryOptions) -> Result<Self> {
        let engine = memory_engine(options)?;
        Ok(Self {
            engine: Arc::new(engine),
            history: None,
            platform: None,
        })
    }

    /// An in-memory session seeded with a single URL.
    pub fn with_initial_url(options: InitialMemoryOptions) -> Result<Self> {
        Self::in_memory(options.into_memory_options())
    }

    /// A session bound to a History-API host window.
    pub fn with_history(host: Arc<dyn HistoryHost>) -> Result<Self> {
        let session = HistorySession::bind(host)?;
        tracing::info!(
            url = %session.engine().current_entry().url,
            base = session.engine().base(),
            "Bound navigation to History-API host"
        );
        Ok(Self {
            engine: session.engine().clone(),
            history: Some(session),
            platform: None,
        })
    }

    /// A session bound to a platform Navigation API host.
    pub fn with_platform(host: Arc<dyn PlatformHost>) -> Result<Self> {
        let session = PlatformSession::bind(host)?;
        tracing::info!(
            url = %session.engine().current_entry().url,
            entries = session.engine().entries().len(),
            "Bound navigation to platform Navigation host"
        );
        Ok(Self {
            engine: session.engine().clone(),
            history: None,
            platform: Some(session),
        })
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn history_session(&self) -> Option<&Arc<HistorySession>> {
        self.history.as_ref()
    }

    pub fn platform_session(&self) -> Option<&Arc<PlatformSession>> {
        self.platform.as_ref()
    }

    // Projections

    pub fn current_entry(&self) -> Destination {
        self.engine.current_entry()
    }

    pub fn entries(&self) -> Vec<Destination> {
        self.engine.entries()
    }

    pub fn can_go_back(&self) -> bool {
        self.engine.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.engine.can_go_forward()
    }

    pub fn transition(&self) -> Option<TransitionEvent> {
        self.engine.transition()
    }

    pub fn origin(&self) -> Origin {
        self.engine.origin()
    }

    pub fn base(&self) -> &str {
        self.engine.base()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<NavigationState> {
        self.engine.subscribe()
    }

    // Operations

    pub async fn navigate(&self, url: &str, options: NavigateOptions) -> Result<Destination> {
        Ok(self.engine.navigate(url, options).await?)
    }

    pub async fn back(&self, info: Option<Value>) -> Result<Destination> {
        Ok(self.engine.back(info).await?)
    }

    pub async fn forward(&self, info: Option<Value>) -> Result<Destination> {
        Ok(self.engine.forward(info).await?)
    }

    pub async fn traverse_to(&self, key: Uuid, info: Option<Value>) -> Result<Destination> {
        Ok(self.engine.traverse_to(key, info).await?)
    }

    pub async fn reload(&self, info: Option<Value>) -> Result<Destination> {
        Ok(self.engine.reload(info).await?)
    }

    pub async fn update_current_entry(&self, state: Option<Value>) -> Result<Destination> {
        Ok(self.engine.update_current_entry(state).await?)
    }

    // Interception

    #[must_use = "the handler is deregistered when the guard drops"]
    pub fn before_navigation(&self, handler: Arc<BeforeHandler>) -> HandlerGuard<BeforeHandler> {
        self.engine.before_navigation(handler)
    }

    #[must_use = "the handler is deregistered when the guard drops"]
    pub fn on_navigation(&self, handler: Arc<AfterHandler>) -> HandlerGuard<AfterHandler> {
        self.engine.on_navigation(handler)
    }

    /// Park transitions behind confirm/cancel/redirect decisions.
    pub fn use_block_navigation(&self, options: BlockOptions) -> BlockNavigation {
        use_block_navigation(&self.engine, options)
    }

    /// Submit a form and fold a redirect response into the session.
    pub async fn submit(
        &self,
        client: &dyn HttpClient,
        form: FormSubmission,
    ) -> Result<(Destination, SubmitResponse)> {
        Ok(waypoint_submit::submit(&self.engine, client, form).await?)
    }
}

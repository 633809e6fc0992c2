//! Waypoint Core
//!
//! Central entry point for the waypoint navigation control plane: one
//! [`Navigation`] session over a single window's history, with observation,
//! interception, redirect, cancel, and blocking of its transitions. The
//! same contract runs over three hosts: in-memory, the legacy History API,
//! and a platform Navigation API.

mod error;
mod navigation;

pub use error::CoreError;
pub use navigation::Navigation;

// Re-export the building blocks
pub use waypoint_engine::{
    after_fn, before_fn, use_block_navigation, BeforeInterrupt, BlockNavigation, BlockOptions,
    BlockedTransition, CommitMode, Engine, HandlerGuard, HostAdapter, NavigationError,
    MAX_REDIRECTS,
};
pub use waypoint_host::{
    memory_engine, HistoryHost, HistorySession, HostEvent, InitialMemoryOptions, MemoryAdapter,
    MemoryOptions, PlatformEntry, PlatformHost, PlatformNavigateEvent, PlatformSession,
};
pub use waypoint_model::{
    resolve_url, Destination, HistoryMode, ModelError, NavigateOptions, NavigationEvent,
    NavigationState, ProposedDestination, RedirectOptions, StateMarker, TransitionEvent,
    TransitionKind, TransitionTarget, DEFAULT_MAX_ENTRIES, ID_FIELD, KEY_FIELD, STATE_FIELD,
};
pub use waypoint_submit::{
    submit, FormMethod, FormSubmission, FormSubmitError, HttpClient, ReqwestClient,
    SubmitRequest, SubmitResponse,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Install a subscriber for waypoint's diagnostics.
///
/// Convenience for examples and tests; applications embedding waypoint
/// normally bring their own subscriber. `RUST_LOG` wins when set, otherwise
/// only the waypoint crates log, at debug. Safe to call more than once.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("waypoint_model=debug,waypoint_engine=debug,waypoint_host=debug,waypoint_submit=debug,waypoint_core=debug")
    });

    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

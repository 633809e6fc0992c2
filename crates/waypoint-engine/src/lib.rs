//! Waypoint transition engine
//!
//! Drives one navigation transition at a time through five phases: propose,
//! before-handlers, commit, mutate, after-handlers. Before-handlers may veto
//! or redirect a transition; after-handlers observe committed navigations.
//! The engine is fed by exactly one host adapter (memory, History API, or
//! platform Navigation API) through the [`HostAdapter`] seam.

mod adapter;
mod blocking;
mod cell;
mod engine;
mod error;
mod handler;
mod registry;

pub use adapter::HostAdapter;
pub use blocking::{use_block_navigation, BlockNavigation, BlockOptions, BlockedTransition};
pub use cell::{NavigationCell, StateTxn};
pub use engine::{CommitMode, Engine, EngineConfig, MAX_REDIRECTS};
pub use error::{BeforeInterrupt, NavigationError};
pub use handler::{
    after_fn, before_fn, AfterEffect, AfterFuture, AfterHandler, BeforeFuture, BeforeHandler,
    BeforeResult, Deferred,
};
pub use registry::{HandlerGuard, HandlerRegistry};

pub type Result<T> = std::result::Result<T, NavigationError>;

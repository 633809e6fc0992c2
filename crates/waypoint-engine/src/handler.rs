//! Handler signatures
//!
//! A before-handler is polled once per transition and either abstains,
//! returns a deferred effect to run after all handlers have been polled, or
//! fails with a redirect/cancel interrupt. An after-handler observes a
//! committed navigation and may return an effect that runs concurrently with
//! the other after effects; its result is discarded.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use waypoint_model::{NavigationEvent, TransitionEvent};

use crate::error::BeforeInterrupt;

pub type Deferred = Pin<Box<dyn Future<Output = Result<(), BeforeInterrupt>> + Send>>;
pub type BeforeResult = Result<Option<Deferred>, BeforeInterrupt>;
pub type BeforeFuture = Pin<Box<dyn Future<Output = BeforeResult> + Send>>;
pub type BeforeHandler = dyn Fn(&TransitionEvent) -> BeforeFuture + Send + Sync;

pub type AfterEffect = Pin<Box<dyn Future<Output = Result<(), crate::NavigationError>> + Send>>;
pub type AfterFuture = Pin<Box<dyn Future<Output = Option<AfterEffect>> + Send>>;
pub type AfterHandler = dyn Fn(&NavigationEvent) -> AfterFuture + Send + Sync;

/// Wrap a synchronous closure as a before-handler.
pub fn before_fn<F>(f: F) -> Arc<BeforeHandler>
where
    F: Fn(&TransitionEvent) -> BeforeResult + Send + Sync + 'static,
{
    Arc::new(move |event| {
        let result = f(event);
        Box::pin(async move { result })
    })
}

/// Wrap a synchronous closure as an after-handler.
pub fn after_fn<F>(f: F) -> Arc<AfterHandler>
where
    F: Fn(&NavigationEvent) + Send + Sync + 'static,
{
    Arc::new(move |event| {
        f(event);
        Box::pin(async move { None })
    })
}

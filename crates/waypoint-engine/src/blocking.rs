//! Blocking façade
//!
//! Layers a single before-handler over the engine that parks each transition
//! behind a one-shot decision: confirm lets it proceed, cancel vetoes it,
//! redirect sends it elsewhere. Consumers observe the blocked transition
//! through a watch stream and settle it from outside the pipeline.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use waypoint_model::{RedirectOptions, TransitionEvent};

use crate::engine::Engine;
use crate::error::BeforeInterrupt;
use crate::handler::{BeforeFuture, BeforeHandler, Deferred};
use crate::registry::HandlerGuard;

enum Decision {
    Confirm,
    Cancel,
    Redirect {
        path: String,
        options: RedirectOptions,
    },
}

/// A transition parked behind a pending decision.
#[derive(Clone)]
pub struct BlockedTransition {
    event: TransitionEvent,
    inner: Arc<BlockedInner>,
}

struct BlockedInner {
    settle: Mutex<Option<oneshot::Sender<Decision>>>,
    state: Arc<watch::Sender<Option<BlockedTransition>>>,
}

impl BlockedTransition {
    pub fn event(&self) -> &TransitionEvent {
        &self.event
    }

    /// Let the transition proceed.
    pub fn confirm(&self) {
        self.settle(Decision::Confirm);
    }

    /// Veto the transition; the operation resolves with the unchanged
    /// current entry.
    pub fn cancel(&self) {
        self.settle(Decision::Cancel);
    }

    /// Send the transition elsewhere instead.
    pub fn redirect(&self, path: impl Into<String>, options: RedirectOptions) {
        self.settle(Decision::Redirect {
            path: path.into(),
            options,
        });
    }

    fn settle(&self, decision: Decision) {
        if let Some(tx) = self.inner.settle.lock().take() {
            let _ = tx.send(decision);
            let _ = self.inner.state.send(None);
        }
    }
}

impl std::fmt::Debug for BlockedTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockedTransition")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

type ShouldBlock = Arc<dyn Fn(&TransitionEvent) -> bool + Send + Sync>;

#[derive(Default, Clone)]
pub struct BlockOptions {
    /// Per-event predicate deciding whether to engage; blocks everything
    /// when absent.
    pub should_block: Option<ShouldBlock>,
}

/// Handle over the blocking state. Dropping it deregisters the handler and
/// releases the block.
pub struct BlockNavigation {
    state: Arc<watch::Sender<Option<BlockedTransition>>>,
    _guard: HandlerGuard<BeforeHandler>,
}

impl BlockNavigation {
    pub fn blocked(&self) -> Option<BlockedTransition> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<BlockedTransition>> {
        self.state.subscribe()
    }

    /// Run `handler` for every transition that becomes blocked.
    ///
    /// The subscription lives until the handle drops or the returned task is
    /// aborted.
    pub fn when_blocked<F>(&self, handler: F) -> JoinHandle<()>
    where
        F: Fn(BlockedTransition) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                let blocked = rx.borrow_and_update().clone();
                if let Some(blocked) = blocked {
                    handler(blocked);
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

/// Install the blocking before-handler on `engine`.
///
/// While one transition is blocked, further transitions are not re-blocked;
/// they run through the remaining before-handlers unimpeded.
pub fn use_block_navigation(engine: &Engine, options: BlockOptions) -> BlockNavigation {
    let (tx, _rx) = watch::channel(None);
    let state = Arc::new(tx);

    let handler: Arc<BeforeHandler> = {
        let state = state.clone();
        let should_block = options.should_block;
        Arc::new(move |event: &TransitionEvent| -> BeforeFuture {
            if state.borrow().is_some() {
                return Box::pin(async { Ok(None) });
            }
            if let Some(predicate) = &should_block {
                if !predicate(event) {
                    return Box::pin(async { Ok(None) });
                }
            }

            let (decide_tx, decide_rx) = oneshot::channel();
            let blocked = BlockedTransition {
                event: event.clone(),
                inner: Arc::new(BlockedInner {
                    settle: Mutex::new(Some(decide_tx)),
                    state: state.clone(),
                }),
            };
            let _ = state.send(Some(blocked));

            Box::pin(async move {
                let deferred: Deferred = Box::pin(async move {
                    match decide_rx.await {
                        Ok(Decision::Confirm) => Ok(()),
                        Ok(Decision::Cancel) | Err(_) => Err(BeforeInterrupt::Cancel),
                        Ok(Decision::Redirect { path, options }) => {
                            Err(BeforeInterrupt::Redirect { path, options })
                        }
                    }
                });
                Ok(Some(deferred))
            })
        })
    };

    let guard = engine.before_navigation(handler);
    BlockNavigation {
        state,
        _guard: guard,
    }
}

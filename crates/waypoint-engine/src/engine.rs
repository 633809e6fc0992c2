//! Transition engine
//!
//! Each operation drives one transition through five phases: propose,
//! before-handlers, commit, mutate, after-handlers. Redirects raised by
//! before-handlers restart the pipeline with a fresh replace event; cancels
//! resolve the operation with the unchanged current entry.

use std::sync::Arc;

use serde_json::Value;
use url::{Origin, Url};
use uuid::Uuid;
use waypoint_model::{
    resolve_url, Destination, HistoryMode, NavigateOptions, NavigationEvent, NavigationState,
    TransitionEvent, TransitionKind, TransitionTarget,
};

use crate::adapter::HostAdapter;
use crate::cell::{NavigationCell, StateTxn};
use crate::error::{BeforeInterrupt, NavigationError};
use crate::handler::{AfterHandler, BeforeHandler};
use crate::registry::{HandlerGuard, HandlerRegistry};
use crate::Result;

/// Redirect chains this deep are treated as a logic error.
pub const MAX_REDIRECTS: u32 = 25;

/// Whether a transition reconciles with the host store.
///
/// `Skip` is used when the engine is reacting to a mutation the host already
/// performed, so the mutation is not echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    Commit,
    Skip,
}

pub struct EngineConfig {
    pub initial: NavigationState,
    pub origin: Url,
    pub base: String,
    pub max_entries: usize,
    pub adapter: Arc<dyn HostAdapter>,
}

pub struct Engine {
    cell: NavigationCell,
    before: HandlerRegistry<BeforeHandler>,
    after: HandlerRegistry<AfterHandler>,
    adapter: Arc<dyn HostAdapter>,
    origin: Url,
    base: String,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            cell: NavigationCell::new(config.initial, config.max_entries),
            before: HandlerRegistry::new(),
            after: HandlerRegistry::new(),
            adapter: config.adapter,
            origin: config.origin,
            base: config.base,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin.origin()
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn max_entries(&self) -> usize {
        self.cell.max_entries()
    }

    pub fn current_entry(&self) -> Destination {
        self.cell.current_entry()
    }

    pub fn entries(&self) -> Vec<Destination> {
        self.cell.entries()
    }

    pub fn can_go_back(&self) -> bool {
        self.cell.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.cell.can_go_forward()
    }

    pub fn transition(&self) -> Option<TransitionEvent> {
        self.cell.transition()
    }

    pub fn snapshot(&self) -> NavigationState {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<NavigationState> {
        self.cell.subscribe()
    }

    /// Register a before-handler; it may veto or redirect transitions.
    #[must_use = "the handler is deregistered when the guard drops"]
    pub fn before_navigation(&self, handler: Arc<BeforeHandler>) -> HandlerGuard<BeforeHandler> {
        self.before.register(handler)
    }

    /// Register an after-handler; it observes committed navigations.
    #[must_use = "the handler is deregistered when the guard drops"]
    pub fn on_navigation(&self, handler: Arc<AfterHandler>) -> HandlerGuard<AfterHandler> {
        self.after.register(handler)
    }

    pub async fn navigate(&self, url: &str, options: NavigateOptions) -> Result<Destination> {
        self.navigate_with(url, options, CommitMode::Commit).await
    }

    /// Navigation entry point for host adapters, which choose whether the
    /// transition reconciles back into the host store.
    pub async fn navigate_with(
        &self,
        url: &str,
        options: NavigateOptions,
        commit: CommitMode,
    ) -> Result<Destination> {
        let url = resolve_url(&self.origin, &self.base, url)?;
        let txn = self.cell.begin().await;

        let current = txn.get().current().clone();
        let to = Destination::new_or_update(&current, url, options.state, &self.origin());
        let kind = match options.history {
            HistoryMode::Push => TransitionKind::Push,
            HistoryMode::Replace => TransitionKind::Replace,
            HistoryMode::Auto if to.key == current.key => TransitionKind::Replace,
            HistoryMode::Auto => TransitionKind::Push,
        };

        let event = TransitionEvent {
            kind,
            from: current,
            to: TransitionTarget::Materialized(to),
            delta: 0,
            info: options.info,
        };
        self.run_transition(&txn, event, commit).await
    }

    pub async fn back(&self, info: Option<Value>) -> Result<Destination> {
        let txn = self.cell.begin().await;
        let state = txn.get();
        if !state.can_go_back() {
            return Ok(state.current().clone());
        }
        self.traverse_in(&txn, &state, state.index - 1, info, CommitMode::Commit)
            .await
    }

    pub async fn forward(&self, info: Option<Value>) -> Result<Destination> {
        let txn = self.cell.begin().await;
        let state = txn.get();
        if !state.can_go_forward() {
            return Ok(state.current().clone());
        }
        self.traverse_in(&txn, &state, state.index + 1, info, CommitMode::Commit)
            .await
    }

    pub async fn traverse_to(&self, key: Uuid, info: Option<Value>) -> Result<Destination> {
        self.traverse_to_with(key, info, CommitMode::Commit).await
    }

    pub async fn traverse_to_with(
        &self,
        key: Uuid,
        info: Option<Value>,
        commit: CommitMode,
    ) -> Result<Destination> {
        let txn = self.cell.begin().await;
        let state = txn.get();
        let Some(target) = state.position_of(key) else {
            return Ok(state.current().clone());
        };
        self.traverse_in(&txn, &state, target, info, commit).await
    }

    /// Traverse to the slot named by `to.key`, adopting `to` wholesale.
    ///
    /// Host adapters use this to rehydrate identity from a patched marker
    /// the host store handed back. An unknown key resolves to the unchanged
    /// current entry.
    pub async fn traverse_adopting(
        &self,
        to: Destination,
        info: Option<Value>,
        commit: CommitMode,
    ) -> Result<Destination> {
        let txn = self.cell.begin().await;
        let state = txn.get();
        let Some(target) = state.position_of(to.key) else {
            return Ok(state.current().clone());
        };

        let event = TransitionEvent {
            kind: TransitionKind::Traverse,
            from: state.current().clone(),
            to: TransitionTarget::Materialized(to),
            delta: target as i64 - state.index as i64,
            info,
        };
        self.run_transition(&txn, event, commit).await
    }

    pub async fn reload(&self, info: Option<Value>) -> Result<Destination> {
        let txn = self.cell.begin().await;
        let current = txn.get().current().clone();

        let event = TransitionEvent {
            kind: TransitionKind::Reload,
            from: current.clone(),
            to: TransitionTarget::Materialized(current.remint()),
            delta: 0,
            info,
        };
        self.run_transition(&txn, event, CommitMode::Commit).await
    }

    pub async fn update_current_entry(&self, state: Option<Value>) -> Result<Destination> {
        self.update_current_entry_with(state, CommitMode::Commit)
            .await
    }

    pub async fn update_current_entry_with(
        &self,
        state: Option<Value>,
        commit: CommitMode,
    ) -> Result<Destination> {
        let txn = self.cell.begin().await;
        let current = txn.get().current().clone();

        let event = TransitionEvent {
            kind: TransitionKind::Replace,
            from: current.clone(),
            to: TransitionTarget::Materialized(current.with_state(state)),
            delta: 0,
            info: None,
        };
        self.run_transition(&txn, event, commit).await
    }

    /// Run the after-handlers for a navigation the host committed itself.
    pub async fn emit_navigation(&self, event: NavigationEvent) {
        self.run_after(event).await;
    }

    async fn traverse_in(
        &self,
        txn: &StateTxn<'_>,
        state: &NavigationState,
        target: usize,
        info: Option<Value>,
        commit: CommitMode,
    ) -> Result<Destination> {
        let event = TransitionEvent {
            kind: TransitionKind::Traverse,
            from: state.current().clone(),
            to: TransitionTarget::Materialized(state.entries[target].remint()),
            delta: target as i64 - state.index as i64,
            info,
        };
        self.run_transition(txn, event, commit).await
    }

    /// Drive one transition through the five-phase pipeline, looping on
    /// redirect.
    async fn run_transition(
        &self,
        txn: &StateTxn<'_>,
        mut event: TransitionEvent,
        commit: CommitMode,
    ) -> Result<Destination> {
        let mut redirects = 0u32;

        loop {
            tracing::debug!(
                kind = %event.kind,
                url = %event.to.url(),
                delta = event.delta,
                "navigation transition"
            );

            // Propose: expose the in-flight transition to observers.
            let mut state = txn.get();
            state.transition = Some(event.clone());
            txn.set(state);

            match self.run_before(&event).await {
                Ok(()) => {}
                Err(BeforeInterrupt::Cancel) => {
                    let state = self.clear_transition(txn);
                    tracing::debug!(url = %state.current().url, "navigation cancelled");
                    return Ok(state.current().clone());
                }
                Err(BeforeInterrupt::Redirect { path, options }) => {
                    redirects += 1;
                    let state = self.clear_transition(txn);
                    if redirects >= MAX_REDIRECTS {
                        return Err(NavigationError::RedirectLoop(redirects));
                    }

                    let url = resolve_url(&self.origin, &self.base, &path)?;
                    tracing::debug!(url = %url, redirects, "navigation redirected");
                    event = TransitionEvent {
                        kind: TransitionKind::Replace,
                        from: state.current().clone(),
                        to: TransitionTarget::Materialized(Destination::new(
                            url,
                            options.state,
                            &self.origin(),
                        )),
                        delta: 0,
                        info: options.info,
                    };
                    continue;
                }
                Err(BeforeInterrupt::Fatal(err)) => {
                    self.clear_transition(txn);
                    return Err(err);
                }
            }

            // Commit: reconcile with the host store, unless the host already
            // performed this mutation.
            let to = event.to.clone().into_destination();
            if commit == CommitMode::Commit {
                if let Err(err) = self.adapter.commit(&to, &event).await {
                    self.clear_transition(txn);
                    return Err(err);
                }
            }

            // Mutate: adopt the host's truth when it is authoritative,
            // otherwise apply the transition locally.
            let destination = match self.adapter.refreshed_state() {
                Some(mut refreshed) => {
                    refreshed.transition = None;
                    let destination = refreshed.current().clone();
                    txn.set(refreshed);
                    destination
                }
                None => {
                    let state = txn.get().applied(event.kind, to.clone(), event.delta);
                    txn.set(state);
                    to
                }
            };

            self.run_after(NavigationEvent {
                kind: event.kind,
                destination: destination.clone(),
                info: event.info.clone(),
            })
            .await;

            return Ok(destination);
        }
    }

    fn clear_transition(&self, txn: &StateTxn<'_>) -> NavigationState {
        let mut state = txn.get();
        state.transition = None;
        txn.set(state.clone());
        state
    }

    /// Poll every before-handler, then drain the deferred effects they
    /// returned. A handler failure preempts the remaining handlers; a
    /// deferred failure preempts the remaining deferreds only.
    async fn run_before(&self, event: &TransitionEvent) -> std::result::Result<(), BeforeInterrupt> {
        let mut deferred = Vec::new();
        for handler in self.before.snapshot() {
            match handler(event).await {
                Ok(None) => {}
                Ok(Some(effect)) => deferred.push(effect),
                Err(interrupt) => return Err(interrupt),
            }
        }
        for effect in deferred {
            effect.await?;
        }
        Ok(())
    }

    /// Run after-handlers in insertion order, then their effects
    /// concurrently. Effect failures are logged and dropped.
    async fn run_after(&self, event: NavigationEvent) {
        let mut effects = Vec::new();
        for handler in self.after.snapshot() {
            if let Some(effect) = handler(&event).await {
                effects.push(effect);
            }
        }

        for result in futures_util::future::join_all(effects).await {
            if let Err(err) = result {
                tracing::warn!(error = %err, "navigation after-handler effect failed");
            }
        }
    }
}

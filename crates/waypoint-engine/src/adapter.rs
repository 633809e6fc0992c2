//! Host adapter seam

use async_trait::async_trait;
use waypoint_model::{Destination, NavigationState, TransitionEvent};

use crate::Result;

/// Reconciles the engine with an external history store.
///
/// `commit` runs between the before-handlers and the state mutation; a
/// failure aborts the transition with the state cell untouched. Adapters
/// whose store is authoritative (platform Navigation API) also supply
/// `refreshed_state`, which the engine adopts wholesale after commit instead
/// of applying its own mutation.
#[async_trait]
pub trait HostAdapter: Send + Sync {
    async fn commit(&self, to: &Destination, event: &TransitionEvent) -> Result<()>;

    fn refreshed_state(&self) -> Option<NavigationState> {
        None
    }
}

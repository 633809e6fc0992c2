//! Navigation state cell
//!
//! Holds the authoritative [`NavigationState`] behind a watch channel.
//! Writers serialize through a fair async mutex, so concurrent transitions
//! are linearized FIFO; readers observe through cheap projections or the
//! change stream. Equal states never emit a change.

use tokio::sync::{watch, Mutex, MutexGuard};
use waypoint_model::{Destination, NavigationState, TransitionEvent};

pub struct NavigationCell {
    gate: Mutex<()>,
    tx: watch::Sender<NavigationState>,
    max_entries: usize,
}

impl NavigationCell {
    pub fn new(initial: NavigationState, max_entries: usize) -> Self {
        let (tx, _rx) = watch::channel(initial.clamped(max_entries));
        Self {
            gate: Mutex::new(()),
            tx,
            max_entries,
        }
    }

    /// Open a write transaction. Waiters are served in FIFO order; no other
    /// writer can interleave between a transaction's reads and writes.
    pub async fn begin(&self) -> StateTxn<'_> {
        StateTxn {
            _permit: self.gate.lock().await,
            cell: self,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn snapshot(&self) -> NavigationState {
        self.tx.borrow().clone()
    }

    /// Change stream over the navigation state.
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.tx.subscribe()
    }

    pub fn current_entry(&self) -> Destination {
        self.tx.borrow().current().clone()
    }

    pub fn entries(&self) -> Vec<Destination> {
        self.tx.borrow().entries.clone()
    }

    pub fn can_go_back(&self) -> bool {
        self.tx.borrow().can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.tx.borrow().can_go_forward()
    }

    pub fn transition(&self) -> Option<TransitionEvent> {
        self.tx.borrow().transition.clone()
    }

    fn set(&self, state: NavigationState) {
        let state = state.clamped(self.max_entries);
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}

/// Exclusive access to the cell for the duration of one update sequence.
pub struct StateTxn<'a> {
    _permit: MutexGuard<'a, ()>,
    cell: &'a NavigationCell,
}

impl StateTxn<'_> {
    pub fn get(&self) -> NavigationState {
        self.cell.snapshot()
    }

    pub fn set(&self, state: NavigationState) {
        self.cell.set(state);
    }
}

//! Navigation state value object

use serde::{Deserialize, Serialize};

use crate::destination::Destination;
use crate::error::ModelError;
use crate::event::{TransitionEvent, TransitionKind};
use crate::Result;

pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// The observable state of one navigation session: the ordered entry list,
/// the current index, and the in-flight transition when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub entries: Vec<Destination>,
    pub index: usize,
    pub transition: Option<TransitionEvent>,
}

impl NavigationState {
    pub fn new(entries: Vec<Destination>, index: usize) -> Result<Self> {
        if entries.is_empty() {
            return Err(ModelError::InvalidState(
                "entry list must not be empty".to_string(),
            ));
        }
        if index >= entries.len() {
            return Err(ModelError::InvalidState(format!(
                "index {} out of range for {} entries",
                index,
                entries.len()
            )));
        }

        Ok(Self {
            entries,
            index,
            transition: None,
        })
    }

    pub fn single(entry: Destination) -> Self {
        Self {
            entries: vec![entry],
            index: 0,
            transition: None,
        }
    }

    pub fn current(&self) -> &Destination {
        &self.entries[self.index]
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Position of the entry whose slot key matches, if any. Duplicate keys
    /// resolve to the earliest slot.
    pub fn position_of(&self, key: uuid::Uuid) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    /// Apply one committed transition, clearing the in-flight marker.
    ///
    /// `to` is the materialized target; for traverse it lands in the slot at
    /// `index + delta`, re-materializing it under the same key.
    pub fn applied(mut self, kind: TransitionKind, to: Destination, delta: i64) -> Self {
        match kind {
            TransitionKind::Push => {
                self.entries.truncate(self.index + 1);
                self.entries.push(to);
                self.index += 1;
            }
            TransitionKind::Replace | TransitionKind::Reload => {
                self.entries[self.index] = to;
            }
            TransitionKind::Traverse => {
                let last = self.entries.len() as i64 - 1;
                let target = (self.index as i64 + delta).clamp(0, last) as usize;
                self.entries[target] = to;
                self.index = target;
            }
        }

        self.transition = None;
        self
    }

    /// Bound the entry list to the most recent `max` entries, shifting the
    /// index accordingly. Idempotent; the in-flight transition is preserved.
    pub fn clamped(mut self, max: usize) -> Self {
        let max = max.max(1);
        if self.entries.len() > max {
            let dropped = self.entries.len() - max;
            self.entries.drain(..dropped);
            self.index = self.index.saturating_sub(dropped);
        }
        if self.index >= self.entries.len() {
            self.index = self.entries.len() - 1;
        }
        self
    }
}

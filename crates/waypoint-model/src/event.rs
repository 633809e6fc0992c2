//! Transition and navigation events

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::destination::{Destination, ProposedDestination};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Append a new entry, discarding any forward entries.
    Push,
    /// Swap the current entry in place.
    Replace,
    /// Re-materialize the current entry.
    Reload,
    /// Move the index to an existing entry.
    Traverse,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Push => "push",
            TransitionKind::Replace => "replace",
            TransitionKind::Reload => "reload",
            TransitionKind::Traverse => "traverse",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransitionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "push" => Ok(TransitionKind::Push),
            "replace" => Ok(TransitionKind::Replace),
            "reload" => Ok(TransitionKind::Reload),
            "traverse" => Ok(TransitionKind::Traverse),
            _ => Err(format!("Unknown transition kind: {}", s)),
        }
    }
}

/// The target of an in-flight transition: either already materialized or
/// still awaiting identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionTarget {
    Materialized(Destination),
    Proposed(ProposedDestination),
}

impl TransitionTarget {
    pub fn url(&self) -> &Url {
        match self {
            TransitionTarget::Materialized(dest) => &dest.url,
            TransitionTarget::Proposed(proposed) => &proposed.url,
        }
    }

    pub fn state(&self) -> Option<&Value> {
        match self {
            TransitionTarget::Materialized(dest) => dest.state.as_ref(),
            TransitionTarget::Proposed(proposed) => proposed.state.as_ref(),
        }
    }

    /// The target's key, when identity has been assigned.
    pub fn key(&self) -> Option<Uuid> {
        match self {
            TransitionTarget::Materialized(dest) => Some(dest.key),
            TransitionTarget::Proposed(_) => None,
        }
    }

    /// Materialize, upgrading a proposed target with fresh identity.
    pub fn into_destination(self) -> Destination {
        match self {
            TransitionTarget::Materialized(dest) => dest,
            TransitionTarget::Proposed(proposed) => proposed.upgrade(),
        }
    }
}

impl From<Destination> for TransitionTarget {
    fn from(dest: Destination) -> Self {
        TransitionTarget::Materialized(dest)
    }
}

impl From<ProposedDestination> for TransitionTarget {
    fn from(proposed: ProposedDestination) -> Self {
        TransitionTarget::Proposed(proposed)
    }
}

/// An in-flight transition between two destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub kind: TransitionKind,
    pub from: Destination,
    pub to: TransitionTarget,
    /// Signed index movement; zero for everything but traverse.
    pub delta: i64,
    pub info: Option<Value>,
}

/// Emitted to observers after a transition has committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub kind: TransitionKind,
    pub destination: Destination,
    pub info: Option<Value>,
}

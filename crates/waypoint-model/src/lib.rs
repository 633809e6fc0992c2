//! Waypoint navigation model
//!
//! Value types shared by the navigation engine and its host adapters:
//! destinations (history entries with identity), transition events, the
//! navigation-state value object, and the patched state marker that survives
//! round-trips through a host history store.

mod destination;
mod error;
mod event;
mod marker;
mod options;
mod resolve;
mod state;

pub use destination::{Destination, ProposedDestination};
pub use error::ModelError;
pub use event::{NavigationEvent, TransitionEvent, TransitionKind, TransitionTarget};
pub use marker::{StateMarker, ID_FIELD, KEY_FIELD, STATE_FIELD};
pub use options::{HistoryMode, NavigateOptions, RedirectOptions};
pub use resolve::resolve_url;
pub use state::{NavigationState, DEFAULT_MAX_ENTRIES};

pub type Result<T> = std::result::Result<T, ModelError>;

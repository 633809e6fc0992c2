//! Destination data structures
//!
//! A destination is one materialized history entry. `id` is fresh on every
//! appearance in the entry list; `key` names the logical slot and is reused
//! when the slot is replaced, reloaded, or revisited.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::{Origin, Url};
use uuid::Uuid;

use crate::marker::StateMarker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Unique per materialization, never reused.
    pub id: Uuid,
    /// Stable across revisits of the same logical slot.
    pub key: Uuid,
    /// Absolute URL of the entry.
    pub url: Url,
    /// Opaque caller state.
    pub state: Option<Value>,
    /// Whether the URL shares the engine's configured origin.
    pub same_document: bool,
}

/// A destination a caller has proposed but the engine has not yet given
/// identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedDestination {
    pub url: Url,
    pub state: Option<Value>,
    pub same_document: bool,
}

impl Destination {
    /// Materialize a destination with fresh identity.
    ///
    /// When the state value carries a patched marker, the embedded
    /// identifiers and caller state are adopted instead, so identity
    /// survives rehydration from a host history store.
    pub fn new(url: Url, state: Option<Value>, origin: &Origin) -> Self {
        let same_document = url.origin() == *origin;

        match StateMarker::decode_opt(state.as_ref()) {
            Some(marker) => Self {
                id: marker.id,
                key: marker.key,
                url,
                state: marker.state,
                same_document,
            },
            None => Self {
                id: Uuid::new_v4(),
                key: Uuid::new_v4(),
                url,
                state,
                same_document,
            },
        }
    }

    /// Materialize a candidate for a navigation away from `current`.
    ///
    /// A candidate that shares origin and path with the current entry
    /// (differing only in query or fragment) targets the same logical slot:
    /// the current key is reused and only a fresh id is minted. Anything
    /// else is a new slot.
    pub fn new_or_update(current: &Destination, url: Url, state: Option<Value>, origin: &Origin) -> Self {
        if StateMarker::decode_opt(state.as_ref()).is_some() {
            return Self::new(url, state, origin);
        }

        if url.origin() == current.url.origin() && url.path() == current.url.path() {
            return Self {
                id: Uuid::new_v4(),
                key: current.key,
                url: url.clone(),
                state,
                same_document: url.origin() == *origin,
            };
        }

        Self::new(url, state, origin)
    }

    /// Re-materialize this destination in place: same slot, fresh id.
    pub fn remint(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Re-materialize with replacement caller state: same slot, fresh id.
    pub fn with_state(&self, state: Option<Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
            ..self.clone()
        }
    }

    /// The marker envelope persisting this destination in a host store.
    pub fn marker(&self) -> StateMarker {
        StateMarker::new(self.id, self.key, self.state.clone())
    }
}

impl ProposedDestination {
    pub fn new(url: Url, state: Option<Value>, origin: &Origin) -> Self {
        let same_document = url.origin() == *origin;
        Self {
            url,
            state,
            same_document,
        }
    }

    /// Assign fresh identity, preserving url, state, and document-sameness.
    pub fn upgrade(self) -> Destination {
        Destination {
            id: Uuid::new_v4(),
            key: Uuid::new_v4(),
            url: self.url,
            state: self.state,
            same_document: self.same_document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn origin() -> Origin {
        Url::parse("https://example.com").unwrap().origin()
    }

    #[test]
    fn test_new_mints_distinct_identity() {
        let url = Url::parse("https://example.com/foo/1").unwrap();
        let dest = Destination::new(url.clone(), Some(json!({"x": 1})), &origin());

        assert_ne!(dest.id, dest.key);
        assert!(dest.same_document);

        let other = Destination::new(url, None, &origin());
        assert_ne!(dest.id, other.id);
        assert_ne!(dest.key, other.key);
    }

    #[test]
    fn test_cross_origin_is_not_same_document() {
        let url = Url::parse("https://other.example/foo").unwrap();
        let dest = Destination::new(url, None, &origin());
        assert!(!dest.same_document);
    }

    #[test]
    fn test_marker_state_adopts_identity() {
        let marker = StateMarker::new(Uuid::new_v4(), Uuid::new_v4(), Some(json!({"x": 0.5})));
        let url = Url::parse("https://example.com/foo/1").unwrap();
        let dest = Destination::new(url, Some(marker.encode()), &origin());

        assert_eq!(dest.id, marker.id);
        assert_eq!(dest.key, marker.key);
        assert_eq!(dest.state, Some(json!({"x": 0.5})));
    }

    #[test]
    fn test_same_path_navigation_reuses_key() {
        let current = Destination::new(
            Url::parse("https://example.com/foo/1").unwrap(),
            None,
            &origin(),
        );

        let next = Destination::new_or_update(
            &current,
            Url::parse("https://example.com/foo/1?page=2#top").unwrap(),
            None,
            &origin(),
        );
        assert_eq!(next.key, current.key);
        assert_ne!(next.id, current.id);

        let elsewhere = Destination::new_or_update(
            &current,
            Url::parse("https://example.com/foo/2").unwrap(),
            None,
            &origin(),
        );
        assert_ne!(elsewhere.key, current.key);
    }

    #[test]
    fn test_upgrade_preserves_payload() {
        let url = Url::parse("https://example.com/bar").unwrap();
        let proposed = ProposedDestination::new(url.clone(), Some(json!(7)), &origin());
        let dest = proposed.clone().upgrade();

        assert_eq!(dest.url, url);
        assert_eq!(dest.state, Some(json!(7)));
        assert_eq!(dest.same_document, proposed.same_document);
    }

    #[test]
    fn test_remint_keeps_slot() {
        let dest = Destination::new(
            Url::parse("https://example.com/foo").unwrap(),
            Some(json!(1)),
            &origin(),
        );
        let again = dest.remint();

        assert_ne!(again.id, dest.id);
        assert_eq!(again.key, dest.key);
        assert_eq!(again.url, dest.url);
        assert_eq!(again.state, dest.state);
    }
}

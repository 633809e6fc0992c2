//! Patched state marker
//!
//! Envelope written into a host history store so that entry identity and
//! caller state survive a page load. Any state value that is not shaped
//! exactly like the envelope is treated as raw caller state.

use serde_json::{Map, Value};
use uuid::Uuid;

pub const ID_FIELD: &str = "__typed__navigation__id__";
pub const KEY_FIELD: &str = "__typed__navigation__key__";
pub const STATE_FIELD: &str = "__typed__navigation__state__";

/// Decoded form of the marker envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMarker {
    pub id: Uuid,
    pub key: Uuid,
    pub state: Option<Value>,
}

impl StateMarker {
    pub fn new(id: Uuid, key: Uuid, state: Option<Value>) -> Self {
        Self { id, key, state }
    }

    /// Decode a marker from a raw host state value.
    ///
    /// Detection requires a JSON object carrying both identifier fields as
    /// valid UUID strings. Everything else is raw caller state.
    pub fn decode(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let id = object.get(ID_FIELD)?.as_str()?.parse().ok()?;
        let key = object.get(KEY_FIELD)?.as_str()?.parse().ok()?;

        let state = match object.get(STATE_FIELD) {
            None | Some(Value::Null) => None,
            Some(state) => Some(state.clone()),
        };

        Some(Self { id, key, state })
    }

    /// Decode from an optional state value.
    pub fn decode_opt(value: Option<&Value>) -> Option<Self> {
        value.and_then(Self::decode)
    }

    /// Encode into the envelope persisted in the host store.
    ///
    /// The state field is omitted when there is no caller state, so a bare
    /// entry round-trips as `None` rather than `null`.
    pub fn encode(&self) -> Value {
        let mut object = Map::new();
        object.insert(ID_FIELD.to_string(), Value::String(self.id.to_string()));
        object.insert(KEY_FIELD.to_string(), Value::String(self.key.to_string()));
        if let Some(state) = &self.state {
            object.insert(STATE_FIELD.to_string(), state.clone());
        }
        Value::Object(object)
    }
}

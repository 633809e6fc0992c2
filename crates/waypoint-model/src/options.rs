//! Navigation options

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    Push,
    Replace,
    /// Replace when the candidate targets the current entry's slot,
    /// push otherwise.
    #[default]
    Auto,
}

impl HistoryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryMode::Push => "push",
            HistoryMode::Replace => "replace",
            HistoryMode::Auto => "auto",
        }
    }
}

impl std::fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HistoryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "push" => Ok(HistoryMode::Push),
            "replace" => Ok(HistoryMode::Replace),
            "auto" => Ok(HistoryMode::Auto),
            _ => Err(format!("Unknown history mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigateOptions {
    pub history: HistoryMode,
    pub state: Option<Value>,
    pub info: Option<Value>,
}

impl NavigateOptions {
    pub fn push() -> Self {
        Self {
            history: HistoryMode::Push,
            ..Self::default()
        }
    }

    pub fn replace() -> Self {
        Self {
            history: HistoryMode::Replace,
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_info(mut self, info: Value) -> Self {
        self.info = Some(info);
        self
    }
}

/// Options carried by a redirect raised from a before-handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedirectOptions {
    pub state: Option<Value>,
    pub info: Option<Value>,
}

//! Model error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid navigation state: {0}")]
    InvalidState(String),
}

impl From<url::ParseError> for ModelError {
    fn from(err: url::ParseError) -> Self {
        ModelError::InvalidUrl(err.to_string())
    }
}

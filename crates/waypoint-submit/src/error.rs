//! Submit error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormSubmitError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Invalid form action: {0}")]
    Action(#[from] waypoint_model::ModelError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] waypoint_engine::NavigationError),
}

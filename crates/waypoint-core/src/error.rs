//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Model error: {0}")]
    Model(#[from] waypoint_model::ModelError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] waypoint_engine::NavigationError),

    #[error("Form submit error: {0}")]
    Submit(#[from] waypoint_submit::FormSubmitError),
}

//! Engine error types

use thiserror::Error;
use waypoint_model::{ModelError, RedirectOptions};

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Redirect loop detected after {0} redirects")]
    RedirectLoop(u32),
}

/// Control-flow outcome a before-handler can fail with.
///
/// Redirect and cancel are recovered by the engine and never surface to the
/// caller; anything fatal bubbles as a [`NavigationError`].
#[derive(Debug)]
pub enum BeforeInterrupt {
    Redirect {
        path: String,
        options: RedirectOptions,
    },
    Cancel,
    Fatal(NavigationError),
}

impl BeforeInterrupt {
    pub fn redirect(path: impl Into<String>) -> Self {
        BeforeInterrupt::Redirect {
            path: path.into(),
            options: RedirectOptions::default(),
        }
    }

    pub fn redirect_with(path: impl Into<String>, options: RedirectOptions) -> Self {
        BeforeInterrupt::Redirect {
            path: path.into(),
            options,
        }
    }
}

impl From<NavigationError> for BeforeInterrupt {
    fn from(err: NavigationError) -> Self {
        BeforeInterrupt::Fatal(err)
    }
}

//! Waypoint form submission
//!
//! Performs HTTP GET/POST on behalf of a form and translates redirect
//! responses into replace-navigations on the engine.

mod client;
mod error;
mod form;
mod submit;
pub mod testing;

pub use client::{HttpClient, ReqwestClient, SubmitRequest, SubmitResponse};
pub use error::FormSubmitError;
pub use form::{FormMethod, FormSubmission};
pub use submit::submit;

pub type Result<T> = std::result::Result<T, FormSubmitError>;

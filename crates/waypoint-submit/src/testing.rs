//! Canned HTTP client for tests

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{HttpClient, SubmitRequest, SubmitResponse};
use crate::error::FormSubmitError;
use crate::Result;

/// Replays queued responses and records every request it saw.
pub struct CannedClient {
    responses: Mutex<Vec<SubmitResponse>>,
    requests: Mutex<Vec<SubmitRequest>>,
    failure: Option<String>,
}

impl CannedClient {
    pub fn respond(response: SubmitResponse) -> Self {
        Self {
            responses: Mutex::new(vec![response]),
            requests: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn respond_all(responses: Vec<SubmitResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn requests(&self) -> Vec<SubmitRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpClient for CannedClient {
    async fn send(&self, request: SubmitRequest) -> Result<SubmitResponse> {
        self.requests.lock().push(request);
        if let Some(message) = &self.failure {
            return Err(FormSubmitError::Http(message.clone()));
        }

        let mut responses = self.responses.lock();
        if responses.is_empty() {
            return Err(FormSubmitError::Http("no canned response left".to_string()));
        }
        Ok(responses.remove(0))
    }
}

//! HTTP client seam

use async_trait::async_trait;
use url::Url;

use crate::error::FormSubmitError;
use crate::form::FormMethod;
use crate::Result;

/// A prepared form request.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub method: FormMethod,
    pub url: Url,
    /// URL-encoded body for POST submissions.
    pub body: Option<String>,
}

/// The response surface the submit helper needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SubmitResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: SubmitRequest) -> Result<SubmitResponse>;
}

/// reqwest-backed client.
///
/// Redirects are not followed: the submit helper needs the 3xx response
/// itself to translate its Location into a navigation.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| FormSubmitError::Http(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: SubmitRequest) -> Result<SubmitResponse> {
        let builder = match request.method {
            FormMethod::Get => self.client.get(request.url.clone()),
            FormMethod::Post => {
                let body = request.body.clone().unwrap_or_default();
                self.client
                    .post(request.url.clone())
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(body)
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|err| FormSubmitError::Http(err.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|err| FormSubmitError::Http(err.to_string()))?;

        Ok(SubmitResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = SubmitResponse {
            status: 302,
            headers: vec![("Location".to_string(), "https://example.com/bar".to_string())],
            body: String::new(),
        };
        assert_eq!(response.location(), Some("https://example.com/bar"));
        assert!(response.is_redirect());
    }

    #[test]
    fn test_redirect_range() {
        for status in [200u16, 299, 400, 500] {
            let response = SubmitResponse {
                status,
                headers: vec![],
                body: String::new(),
            };
            assert!(!response.is_redirect());
        }
    }
}

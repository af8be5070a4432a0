//! HTTP transport seam
//!
//! Adapters never talk to `reqwest` directly; they hand an [`ApiRequest`] to
//! an [`HttpTransport`] and get back the raw status and body. Tests swap in
//! a stub transport that replays canned responses.

use super::error::ApiError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::fmt;
use std::time::Duration;

/// Header the source site uses to recognise AJAX requests. With it, auth
/// failures come back as 403 instead of a redirect to the login page.
pub const AJAX_HEADER: &str = "X-Requested-With";
pub const AJAX_HEADER_VALUE: &str = "XMLHttpRequest";

/// A GET request against a source endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Absolute URL without query string
    pub url: String,
    /// Query parameters, in the order they should be sent
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request with no query parameters
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter
    #[must_use]
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Look up the first value of a query parameter
    #[must_use]
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// Raw response: status line and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl ApiResponse {
    /// Convenience constructor for a 200 response
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            body: body.into(),
        }
    }

    /// Convenience constructor for an arbitrary status
    #[must_use]
    pub fn with_status(status: u16, reason: &str, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            body: body.into(),
        }
    }
}

/// Performs GET requests on behalf of the resource adapters
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return whatever the server answered
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` when no response was received. Non-2xx
    /// statuses are NOT errors at this layer.
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// `reqwest`-backed transport used by the CLI
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ReqwestTransport")
            .field("client", &self.client)
            .finish()
    }
}

impl ReqwestTransport {
    /// Build a client that sends the AJAX header, asks for JSON and keeps
    /// cookies for the lifetime of the process
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(AJAX_HEADER, HeaderValue::from_static(AJAX_HEADER_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("transfer-chooser/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Transport(format!("failed to initialize HTTP client: {err}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        tracing::debug!(url = %request, "GET");

        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(format!("failed to read response body: {err}")))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %request, "non-success status");
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

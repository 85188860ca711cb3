use std::time::Duration;

use async_trait::async_trait;

use super::http_trait::{HttpTransport, RawResponse};
use crate::{error::TransportError, HttpMethod, Request};

/// Async HTTP transport using reqwest.
///
/// Fully async, built on top of tokio/hyper; requests must be awaited inside a
/// tokio runtime. Non-2xx responses are handed back as responses, not errors.
///
/// # Example
///
/// ```ignore
/// use http_utility::{HttpUtility, ReqwestTransport};
///
/// #[tokio::main]
/// async fn main() {
///     let client = HttpUtility::with_token(ReqwestTransport::new(), Some("token".into()));
///     let url = "https://example.com/api/users".parse().unwrap();
///     let users: Vec<serde_json::Value> = client.get(url).await.unwrap();
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport with reqwest's default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new reqwest transport with a total request timeout.
    pub fn with_timeout(timeout_secs: u64) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(method(request.method()), request.url().clone());

        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send().await.map_err(|e| {
            TransportError::new(
                format!("HTTP {} request failed: {}", request.method(), e),
                e.status().map(|s| s.as_u16()),
            )
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            TransportError::new(format!("Failed to read response body: {}", e), Some(status))
        })?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

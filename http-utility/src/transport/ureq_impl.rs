use std::{io::Read, time::Duration};

use async_trait::async_trait;

use super::http_trait::{HttpTransport, RawResponse};
use crate::{error::TransportError, Request};

/// Minimal HTTP transport using ureq.
///
/// A lightweight, blocking HTTP client. The request runs on whatever thread
/// polls the future, so pair it with a simple executor such as
/// `futures::executor::block_on` rather than a shared async runtime.
///
/// # Example
///
/// ```ignore
/// use futures::executor::block_on;
/// use http_utility::{HttpUtility, UreqTransport};
///
/// let client = HttpUtility::new(UreqTransport::new());
/// let url = "https://example.com/api/status".parse().unwrap();
/// let status: serde_json::Value = block_on(client.get(url)).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a new ureq transport with ureq's default settings.
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Create a new ureq transport with a total request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(timeout_secs))
                .build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for UreqTransport {
    async fn execute(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let mut call = self
            .agent
            .request(request.method().as_str(), request.url().as_str());

        for (name, value) in request.headers() {
            call = call.set(name, value);
        }

        // Perform blocking request (wrapped in async for trait compatibility)
        let result = match request.body() {
            Some(body) => call.send_bytes(body),
            None => call.call(),
        };

        let response = match result {
            Ok(response) => response,
            // ureq reports 4xx/5xx as errors; they are still responses here
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => {
                return Err(TransportError::new(
                    format!("HTTP {} request failed: {}", request.method(), e),
                    None,
                ))
            }
        };

        let status = response.status();
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| {
                TransportError::new(format!("Failed to read response body: {}", e), Some(status))
            })?;

        Ok(RawResponse::new(status, body))
    }
}

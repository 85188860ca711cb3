use async_trait::async_trait;

use crate::{error::TransportError, Request};

/// What came back from the server, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal async HTTP transport that can be implemented with any HTTP library.
///
/// This allows consumers to bring their own HTTP stack: hyper, isahc, surf,
/// platform-specific APIs, or one of the bundled implementations
/// (`ReqwestTransport`, `UreqTransport`).
///
/// # Implementing the trait
///
/// ```ignore
/// use async_trait::async_trait;
/// use http_utility::{HttpTransport, RawResponse, Request, TransportError};
///
/// #[derive(Clone)]
/// struct MyTransport;
///
/// #[async_trait]
/// impl HttpTransport for MyTransport {
///     async fn execute(&self, request: &Request) -> Result<RawResponse, TransportError> {
///         // Send request.method() to request.url() with request.headers()
///         // and request.body(), then hand back status and body bytes.
///         Ok(RawResponse::new(200, b"{}".to_vec()))
///     }
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync + Clone {
    /// Send `request` once.
    ///
    /// Every header from [`Request::headers`] must be sent, and the body only
    /// when present. A response with any status code is `Ok`; `Err` is reserved
    /// for failures where no usable response was received.
    async fn execute(&self, request: &Request) -> Result<RawResponse, TransportError>;
}

use thiserror::Error;

/// Reason carried by every [`NetworkError`] of kind [`ErrorKind::Decode`].
pub const DECODING_ERROR: &str = "decoding error";

/// Reason used when the server answered without a body.
pub const EMPTY_RESPONSE_BODY: &str = "empty response body";

/// Fallback reason when the transport failed without saying why.
pub const TRANSPORT_ERROR: &str = "transport error";

/// Which step of a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// DNS, connection refused, TLS, timeout or a body that could not be read.
    Transport,
    /// The transport completed but the response body was empty.
    EmptyBody,
    /// The body was not valid JSON for the requested type.
    Decode,
}

/// The single error type returned by [`HttpUtility`](crate::HttpUtility).
///
/// Holds an optional human readable reason and the HTTP status code observed,
/// if any. Status codes are reported as-is and never used to classify the
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct NetworkError {
    kind: ErrorKind,
    reason: Option<String>,
    status_code: Option<u16>,
    detail: Option<String>,
}

impl NetworkError {
    pub fn transport(reason: impl Into<String>, status_code: Option<u16>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            TRANSPORT_ERROR.to_string()
        } else {
            reason
        };
        Self {
            kind: ErrorKind::Transport,
            reason: Some(reason),
            status_code,
            detail: None,
        }
    }

    pub fn empty_body(status_code: Option<u16>) -> Self {
        Self {
            kind: ErrorKind::EmptyBody,
            reason: Some(EMPTY_RESPONSE_BODY.to_string()),
            status_code,
            detail: None,
        }
    }

    /// `detail` keeps the decoder's own message, the reason stays fixed.
    pub fn decoding(status_code: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            reason: Some(DECODING_ERROR.to_string()),
            status_code,
            detail: Some(detail.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    fn describe(&self) -> String {
        let mut out = self.reason.clone().unwrap_or_else(|| "network error".to_string());
        if let Some(status) = self.status_code {
            out.push_str(&format!(" (status {status})"));
        }
        if let Some(detail) = &self.detail {
            out.push_str(": ");
            out.push_str(detail);
        }
        out
    }
}

impl From<TransportError> for NetworkError {
    fn from(e: TransportError) -> Self {
        NetworkError::transport(e.message, e.status_code)
    }
}

/// Failure reported by an [`HttpTransport`](crate::HttpTransport) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub status_code: Option<u16>,
}

impl TransportError {
    pub fn new(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

mod client;
mod date;
mod decoder;
pub mod error;
mod method;
mod request;
mod transport;

pub use client::{ClientConfig, HttpUtility};
pub use date::{DateStrategy, Timestamp};
pub use decoder::JsonDecoder;
pub use error::{ErrorKind, NetworkError, TransportError};
pub use method::HttpMethod;
pub use request::Request;
pub use transport::{HttpTransport, RawResponse};

#[cfg(feature = "reqwest-client")]
pub use transport::ReqwestTransport;
#[cfg(feature = "ureq-client")]
pub use transport::UreqTransport;

// Re-export for callers building requests
pub use url::Url;

mod http_trait;
#[cfg(feature = "reqwest-client")]
mod reqwest_impl;
#[cfg(feature = "ureq-client")]
mod ureq_impl;

pub use http_trait::{HttpTransport, RawResponse};

#[cfg(feature = "reqwest-client")]
pub use reqwest_impl::ReqwestTransport;
#[cfg(feature = "ureq-client")]
pub use ureq_impl::UreqTransport;

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::{
    error::{NetworkError, TransportError},
    HttpTransport, JsonDecoder, RawResponse, Request,
};

/// Construction-time settings of an [`HttpUtility`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Sent verbatim as the `authorization` header of every request.
    #[serde(default)]
    pub token: Option<String>,
    /// Falls back to an ISO-8601 [`JsonDecoder`] when unset.
    #[serde(default)]
    pub decoder: Option<JsonDecoder>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("decoder", &self.decoder)
            .finish()
    }
}

/// Sends requests through an [`HttpTransport`] and decodes JSON responses.
///
/// Generic over the transport, so consumers can plug in their own HTTP client
/// by implementing [`HttpTransport`]. The client is read-only once built and
/// can be cloned and shared between concurrent requests.
#[derive(Clone)]
pub struct HttpUtility<H: HttpTransport> {
    transport: H,
    token: Option<String>,
    decoder: JsonDecoder,
}

impl<H: HttpTransport> HttpUtility<H> {
    /// No token, ISO-8601 dates.
    pub fn new(transport: H) -> Self {
        Self::from_config(transport, ClientConfig::default())
    }

    pub fn with_token(transport: H, token: Option<String>) -> Self {
        Self::from_config(
            transport,
            ClientConfig {
                token,
                decoder: None,
            },
        )
    }

    pub fn with_token_and_decoder(
        transport: H,
        token: Option<String>,
        decoder: Option<JsonDecoder>,
    ) -> Self {
        Self::from_config(transport, ClientConfig { token, decoder })
    }

    pub fn with_decoder(transport: H, decoder: JsonDecoder) -> Self {
        Self::from_config(
            transport,
            ClientConfig {
                token: None,
                decoder: Some(decoder),
            },
        )
    }

    pub fn from_config(transport: H, config: ClientConfig) -> Self {
        Self {
            transport,
            token: config.token,
            decoder: config.decoder.unwrap_or_default(),
        }
    }

    pub fn transport(&self) -> &H {
        &self.transport
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn decoder(&self) -> &JsonDecoder {
        &self.decoder
    }

    /// Send `request` and decode the response body as `T`.
    ///
    /// Resolves exactly once. Declare `T` as `Option<U>` to accept a JSON
    /// `null` body. The status code is not checked: any response whose body
    /// decodes as `T` is a success.
    pub async fn request<T: DeserializeOwned>(&self, request: Request) -> Result<T, NetworkError> {
        let request = match &self.token {
            Some(token) => request.authorized(token),
            None => request,
        };

        log::debug!("{} {}", request.method(), request.url());
        let outcome = self.transport.execute(&request).await;
        self.complete(&request, outcome)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, NetworkError> {
        self.request(Request::get(url)).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: impl Into<Vec<u8>>,
    ) -> Result<T, NetworkError> {
        self.request(Request::post(url, body)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, url: Url) -> Result<T, NetworkError> {
        self.request(Request::put(url)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, NetworkError> {
        self.request(Request::delete(url)).await
    }

    fn complete<T: DeserializeOwned>(
        &self,
        request: &Request,
        outcome: Result<RawResponse, TransportError>,
    ) -> Result<T, NetworkError> {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} {} failed: {}", request.method(), request.url(), e);
                return Err(e.into());
            }
        };

        log::debug!(
            "{} {} -> {} ({} bytes)",
            request.method(),
            request.url(),
            response.status,
            response.body.len()
        );

        if response.body.is_empty() {
            return Err(NetworkError::empty_body(Some(response.status)));
        }

        self.decoder.decode(&response.body).map_err(|e| {
            log::debug!("decoding error for {}: {}", request.url(), e);
            NetworkError::decoding(Some(response.status), e.to_string())
        })
    }
}

#[cfg(feature = "runtime")]
impl<H: HttpTransport + 'static> HttpUtility<H> {
    /// Spawn `request` on the current tokio runtime and hand its result to
    /// `completion`, which runs exactly once on a runtime worker.
    ///
    /// Returns immediately. Panics when called outside a tokio runtime.
    pub fn dispatch<T, F>(&self, request: Request, completion: F) -> tokio::task::JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, NetworkError>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let result = client.request(request).await;
            completion(result);
        })
    }
}

#[cfg(feature = "reqwest-client")]
impl Default for HttpUtility<crate::ReqwestTransport> {
    fn default() -> Self {
        Self::new(crate::ReqwestTransport::new())
    }
}

impl<H: HttpTransport> fmt::Debug for HttpUtility<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpUtility")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

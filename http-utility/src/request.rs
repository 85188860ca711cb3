use std::fmt;

use serde::Serialize;
use url::Url;

use crate::HttpMethod;

pub(crate) const AUTHORIZATION: &str = "authorization";
pub(crate) const CONTENT_TYPE: &str = "content-type";
pub(crate) const APPLICATION_JSON: &str = "application/json";

/// A single outbound request.
///
/// Only POST carries a body, and [`Request::post`] is the only way to build
/// one, so a POST without a body cannot be expressed. The bearer token is
/// attached by [`HttpUtility`](crate::HttpUtility) and never by callers.
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    method: HttpMethod,
    url: Url,
    body: Option<Vec<u8>>,
    token: Option<String>,
}

impl Request {
    fn new(method: HttpMethod, url: Url, body: Option<Vec<u8>>) -> Self {
        Self {
            method,
            url,
            body,
            token: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(HttpMethod::Get, url, None)
    }

    /// POST with raw JSON bytes, sent untouched.
    pub fn post(url: Url, body: impl Into<Vec<u8>>) -> Self {
        Self::new(HttpMethod::Post, url, Some(body.into()))
    }

    /// POST with a body serialized by `serde_json`.
    pub fn post_json<B: Serialize + ?Sized>(url: Url, body: &B) -> serde_json::Result<Self> {
        Ok(Self::post(url, serde_json::to_vec(body)?))
    }

    pub fn put(url: Url) -> Self {
        Self::new(HttpMethod::Put, url, None)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(HttpMethod::Delete, url, None)
    }

    pub(crate) fn authorized(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Headers every transport must send with this request.
    ///
    /// The token goes out verbatim, without a `Bearer ` prefix.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(token) = &self.token {
            headers.push((AUTHORIZATION, token.as_str()));
        }
        if self.body.is_some() {
            headers.push((CONTENT_TYPE, APPLICATION_JSON));
        }
        headers
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("body", &self.body.as_ref().map(|b| b.len()))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url() -> Url {
        Url::parse("https://api.example.com/users").unwrap()
    }

    #[test]
    fn test_get_has_no_headers_without_token() {
        let request = Request::get(url());
        assert_eq!(request.method(), HttpMethod::Get);
        assert!(request.body().is_none());
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_token_is_sent_verbatim() {
        let request = Request::delete(url()).authorized("abc123");
        assert!(request.has_token());
        assert_eq!(request.headers(), vec![(AUTHORIZATION, "abc123")]);
    }

    #[test]
    fn test_post_sets_json_content_type() {
        let request = Request::post(url(), b"{\"name\":\"cat\"}".to_vec()).authorized("t");
        assert_eq!(request.body(), Some(&b"{\"name\":\"cat\"}"[..]));
        assert_eq!(
            request.headers(),
            vec![(AUTHORIZATION, "t"), (CONTENT_TYPE, APPLICATION_JSON)]
        );
    }

    #[test]
    fn test_post_json_serializes_body() {
        let request = Request::post_json(url(), &json!({ "id": 7 })).unwrap();
        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.body(), Some(&b"{\"id\":7}"[..]));
    }

    #[test]
    fn test_debug_redacts_token() {
        let printed = format!("{:?}", Request::get(url()).authorized("s3cret-token"));
        assert!(!printed.contains("s3cret-token"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("https://api.example.com/users"));
    }

    #[test]
    fn test_put_carries_no_body() {
        let request = Request::put(url());
        assert_eq!(request.method(), HttpMethod::Put);
        assert!(request.body().is_none());
        assert!(request.headers().is_empty());
    }
}

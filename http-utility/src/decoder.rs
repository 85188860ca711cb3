use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::date::{DateStrategy, StrategyScope};

/// JSON decoding configuration held by a client for its whole lifetime.
///
/// The only knob is the [`DateStrategy`] applied to [`Timestamp`](crate::Timestamp)
/// fields. The default reads ISO-8601.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonDecoder {
    #[serde(default)]
    date_strategy: DateStrategy,
}

impl JsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode dates with `date_strategy` instead of ISO-8601.
    ///
    /// Only fields declared as [`Timestamp`](crate::Timestamp) (or
    /// `Option<Timestamp>`) follow the strategy. Plain `chrono::DateTime<Utc>`
    /// fields keep chrono's own RFC 3339 parsing whatever the strategy is.
    pub fn with_date_strategy(date_strategy: DateStrategy) -> Self {
        Self { date_strategy }
    }

    pub fn date_strategy(&self) -> &DateStrategy {
        &self.date_strategy
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> serde_json::Result<T> {
        let _scope = StrategyScope::enter(self.date_strategy.clone());
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;

    #[derive(Debug, Deserialize)]
    struct Post {
        id: u32,
        published: Timestamp,
        edited: Option<Timestamp>,
    }

    #[test]
    fn test_default_decoder_reads_iso8601() {
        let post: Post = JsonDecoder::new()
            .decode(br#"{"id":1,"published":"2020-05-17T10:30:00Z","edited":null}"#)
            .unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.published.timestamp(), 1_589_711_400);
        assert!(post.edited.is_none());
    }

    #[test]
    fn test_custom_strategy_replaces_iso8601() {
        let body = br#"{"id":2,"published":1589711400,"edited":1589711460}"#;

        assert!(JsonDecoder::new().decode::<Post>(body).is_err());

        let decoder = JsonDecoder::with_date_strategy(DateStrategy::SecondsSince1970);
        let post: Post = decoder.decode(body).unwrap();
        assert_eq!(post.published.timestamp(), 1_589_711_400);
        assert_eq!(post.edited.unwrap().timestamp(), 1_589_711_460);
    }

    #[test]
    fn test_strategy_only_applies_to_timestamp_fields() {
        #[derive(Debug, Deserialize)]
        struct Mixed {
            custom: Timestamp,
            plain: chrono::DateTime<chrono::Utc>,
        }

        let decoder = JsonDecoder::with_date_strategy(DateStrategy::SecondsSince1970);
        let mixed: Mixed = decoder
            .decode(br#"{"custom":1589711400,"plain":"2020-05-17T10:30:00Z"}"#)
            .unwrap();
        assert_eq!(mixed.custom.into_inner(), mixed.plain);

        let err = decoder.decode::<Mixed>(br#"{"custom":1589711400,"plain":1589711400}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_null_body_into_option() {
        let value: Option<Post> = JsonDecoder::new().decode(b"null").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_strategy_does_not_leak_after_decode() {
        let decoder = JsonDecoder::with_date_strategy(DateStrategy::MillisecondsSince1970);
        let _: Timestamp = decoder.decode(b"1000").unwrap();
        assert!(serde_json::from_slice::<Timestamp>(b"1000").is_err());
    }

    #[test]
    fn test_decoder_config_from_json() {
        let decoder: JsonDecoder =
            serde_json::from_str(r#"{"date_strategy":"milliseconds_since_1970"}"#).unwrap();
        assert_eq!(decoder.date_strategy(), &DateStrategy::MillisecondsSince1970);

        let decoder: JsonDecoder = serde_json::from_str("{}").unwrap();
        assert_eq!(decoder, JsonDecoder::default());
    }
}

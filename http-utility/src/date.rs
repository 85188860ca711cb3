use std::{cell::RefCell, fmt, ops::Deref};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// How [`Timestamp`] fields are read from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateStrategy {
    /// RFC 3339 / ISO-8601 strings, fractional seconds allowed.
    #[default]
    #[serde(rename = "iso8601")]
    Iso8601,
    /// Unix time in seconds, integer or fractional.
    #[serde(rename = "seconds_since_1970")]
    SecondsSince1970,
    /// Unix time in milliseconds.
    #[serde(rename = "milliseconds_since_1970")]
    MillisecondsSince1970,
    /// A chrono `strftime` pattern. Values without an offset are taken as UTC.
    #[serde(rename = "formatted")]
    Formatted(String),
}

/// Raw JSON shapes a date can arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Int(i64),
    Float(f64),
    Text(String),
}

impl DateStrategy {
    fn parse(&self, raw: RawDate) -> Result<DateTime<Utc>, String> {
        match (self, raw) {
            (DateStrategy::Iso8601, RawDate::Text(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| format!("invalid ISO-8601 date {s:?}: {e}")),
            (DateStrategy::SecondsSince1970, RawDate::Int(secs)) => {
                DateTime::from_timestamp(secs, 0).ok_or_else(|| out_of_range(secs))
            }
            (DateStrategy::SecondsSince1970, RawDate::Float(secs)) => from_fractional_secs(secs),
            (DateStrategy::MillisecondsSince1970, RawDate::Int(millis)) => {
                DateTime::from_timestamp_millis(millis).ok_or_else(|| out_of_range(millis))
            }
            (DateStrategy::MillisecondsSince1970, RawDate::Float(millis)) => {
                from_fractional_millis(millis)
            }
            (DateStrategy::Formatted(fmt), RawDate::Text(s)) => parse_formatted(&s, fmt),
            (strategy, RawDate::Text(s)) => Err(format!("expected a number for {strategy:?}, got {s:?}")),
            (strategy, _) => Err(format!("expected a string for {strategy:?}, got a number")),
        }
    }
}

fn out_of_range(value: i64) -> String {
    format!("timestamp {value} out of range")
}

fn from_fractional_secs(secs: f64) -> Result<DateTime<Utc>, String> {
    if !secs.is_finite() {
        return Err(format!("timestamp {secs} is not finite"));
    }
    let whole = secs.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return Err(format!("timestamp {secs} out of range"));
    }
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos).ok_or_else(|| format!("timestamp {secs} out of range"))
}

fn from_fractional_millis(millis: f64) -> Result<DateTime<Utc>, String> {
    if !millis.is_finite() {
        return Err(format!("timestamp {millis} is not finite"));
    }
    let whole_ms = millis.floor();
    if whole_ms < i64::MIN as f64 || whole_ms > i64::MAX as f64 {
        return Err(format!("timestamp {millis} out of range"));
    }
    // only the sub-millisecond remainder is scaled
    let nanos = (((millis - whole_ms) * 1e6).round() as i64).min(999_999);
    DateTime::from_timestamp_millis(whole_ms as i64)
        .and_then(|d| d.checked_add_signed(Duration::nanoseconds(nanos)))
        .ok_or_else(|| format!("timestamp {millis} out of range"))
}

fn parse_formatted(s: &str, fmt: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(d) = DateTime::parse_from_str(s, fmt) {
        return Ok(d.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
        return Ok(d.and_utc());
    }
    NaiveDate::parse_from_str(s, fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| format!("date {s:?} does not match format {fmt:?}"))
}

thread_local! {
    static ACTIVE_STRATEGY: RefCell<Option<DateStrategy>> = const { RefCell::new(None) };
}

/// Makes `strategy` the one [`Timestamp`] uses on this thread until dropped.
pub(crate) struct StrategyScope {
    previous: Option<DateStrategy>,
}

impl StrategyScope {
    pub(crate) fn enter(strategy: DateStrategy) -> Self {
        let previous = ACTIVE_STRATEGY.with(|active| active.replace(Some(strategy)));
        Self { previous }
    }
}

impl Drop for StrategyScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE_STRATEGY.with(|active| *active.borrow_mut() = previous);
    }
}

fn parse_with_active(raw: RawDate) -> Result<DateTime<Utc>, String> {
    ACTIVE_STRATEGY.with(|active| match &*active.borrow() {
        Some(strategy) => strategy.parse(raw),
        None => DateStrategy::Iso8601.parse(raw),
    })
}

/// A UTC date decoded with the [`DateStrategy`] of the [`JsonDecoder`](crate::JsonDecoder)
/// doing the decoding. Outside a decoder it reads ISO-8601.
///
/// Always serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

impl Deref for Timestamp {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(d: DateTime<Utc>) -> Self {
        Timestamp(d)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(t: Timestamp) -> Self {
        t.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawDate::deserialize(deserializer)?;
        parse_with_active(raw).map(Timestamp).map_err(de::Error::custom)
    }
}

//! Timestamp rendering.
//!
//! A timestamp can reasonably become an ISO-8601 string, a calendar date or a
//! number, so the converter delegates to a [`TimestampEncoder`].

use crate::error::{JsonTypesError, Result};
use crate::JsonObject;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use event_core::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Write;
use tracing::warn;

/// ISO-8601 with millisecond precision and a literal `Z` suffix.
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Renders a [`Timestamp`] as JSON.
///
/// Only [`encode`](Self::encode) is required. The field and element forms
/// default to inserting or pushing its result; override them to place the
/// value differently (or not at all).
pub trait TimestampEncoder: Send + Sync {
    fn encode(&self, timestamp: &Timestamp) -> Value;

    /// Write the timestamp as field `key` of `object`.
    fn encode_field(&self, object: &mut JsonObject, key: &str, timestamp: &Timestamp) {
        object.insert(key.to_string(), self.encode(timestamp));
    }

    /// Append the timestamp to `array`.
    fn encode_element(&self, array: &mut Vec<Value>, timestamp: &Timestamp) {
        array.push(self.encode(timestamp));
    }
}

/// Serializable settings for [`PatternTimestampEncoder`].
///
/// ```
/// use json_types::TimestampFormat;
///
/// let format: TimestampFormat = serde_json::from_str(r#"{"pattern": "%Y"}"#).unwrap();
/// assert_eq!(format.utc_offset_seconds, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampFormat {
    /// chrono `strftime` pattern
    pub pattern: String,
    /// Offset from UTC the instant is shown in, in seconds east
    pub utc_offset_seconds: i32,
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            utc_offset_seconds: 0,
        }
    }
}

/// Formats the instant as a string with a `strftime` pattern at a fixed offset.
///
/// Precision beyond what the pattern shows is truncated. Timestamps outside
/// the calendar range render as JSON null.
#[derive(Debug, Clone)]
pub struct PatternTimestampEncoder {
    pattern: String,
    offset: FixedOffset,
}

impl Default for PatternTimestampEncoder {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            offset: Utc.fix(),
        }
    }
}

impl PatternTimestampEncoder {
    /// Create an encoder, rejecting patterns chrono cannot format.
    ///
    /// Some specifiers (`%#z`) parse but are only valid for parsing, so the
    /// pattern is also rendered once against the epoch.
    pub fn new(pattern: impl Into<String>, offset: FixedOffset) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(JsonTypesError::InvalidPattern(pattern));
        }
        let encoder = Self { pattern, offset };
        if encoder.render(DateTime::UNIX_EPOCH).is_none() {
            return Err(JsonTypesError::InvalidPattern(encoder.pattern));
        }
        Ok(encoder)
    }

    /// Create an encoder that renders at UTC.
    pub fn with_pattern(pattern: impl Into<String>) -> Result<Self> {
        Self::new(pattern, Utc.fix())
    }

    pub fn from_format(format: &TimestampFormat) -> Result<Self> {
        let offset = FixedOffset::east_opt(format.utc_offset_seconds)
            .ok_or(JsonTypesError::InvalidOffset(format.utc_offset_seconds))?;
        Self::new(format.pattern.clone(), offset)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Render the timestamp, or `None` if it is outside the calendar range
    /// or cannot be shown with this pattern.
    pub fn format(&self, timestamp: &Timestamp) -> Option<String> {
        self.render(timestamp.to_datetime()?)
    }

    fn render(&self, instant: DateTime<Utc>) -> Option<String> {
        let mut out = String::new();
        write!(
            out,
            "{}",
            instant.with_timezone(&self.offset).format(&self.pattern)
        )
        .ok()?;
        Some(out)
    }
}

impl TimestampEncoder for PatternTimestampEncoder {
    fn encode(&self, timestamp: &Timestamp) -> Value {
        match self.format(timestamp) {
            Some(text) => Value::String(text),
            None => {
                warn!(
                    "Timestamp seconds={} nanos={} cannot be rendered, writing null",
                    timestamp.seconds, timestamp.nanos
                );
                Value::Null
            }
        }
    }
}

/// Renders the instant as integral milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochMillisTimestampEncoder;

impl TimestampEncoder for EpochMillisTimestampEncoder {
    fn encode(&self, timestamp: &Timestamp) -> Value {
        json!(timestamp.epoch_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern() {
        let encoder = PatternTimestampEncoder::default();
        assert_eq!(
            encoder.encode(&Timestamp::new(1709001600, 0)),
            json!("2024-02-27T00:00:00.000Z")
        );
        assert_eq!(
            encoder.encode(&Timestamp::new(1708989535, 296_000_000)),
            json!("2024-02-26T23:18:55.296Z")
        );
    }

    #[test]
    fn test_fraction_is_truncated() {
        let encoder = PatternTimestampEncoder::default();
        assert_eq!(
            encoder.encode(&Timestamp::new(1709001600, 999_999_999)),
            json!("2024-02-27T00:00:00.999Z")
        );
    }

    #[test]
    fn test_year_only_and_date_only_patterns() {
        let year = PatternTimestampEncoder::with_pattern("%Y").unwrap();
        assert_eq!(year.encode(&Timestamp::new(1709001600, 0)), json!("2024"));

        let date = PatternTimestampEncoder::with_pattern("%Y-%m-%d").unwrap();
        assert_eq!(
            date.encode(&Timestamp::new(1708989535, 296_000_000)),
            json!("2024-02-26")
        );
    }

    #[test]
    fn test_offset_shifts_wall_clock() {
        let encoder = PatternTimestampEncoder::new(
            "%Y-%m-%dT%H:%M:%S%:z",
            FixedOffset::east_opt(2 * 3600).unwrap(),
        )
        .unwrap();
        assert_eq!(
            encoder.encode(&Timestamp::new(1709001600, 0)),
            json!("2024-02-27T02:00:00+02:00")
        );
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = PatternTimestampEncoder::with_pattern("%Y-%").unwrap_err();
        assert_eq!(err, JsonTypesError::InvalidPattern("%Y-%".to_string()));
    }

    #[test]
    fn test_parse_only_specifier_rejected() {
        for pattern in ["%#z", "%Y %#z"] {
            let err = PatternTimestampEncoder::with_pattern(pattern).unwrap_err();
            assert_eq!(err, JsonTypesError::InvalidPattern(pattern.to_string()));
        }
    }

    #[test]
    fn test_from_format() {
        let format = TimestampFormat {
            pattern: "%H:%M".to_string(),
            utc_offset_seconds: -3600,
        };
        let encoder = PatternTimestampEncoder::from_format(&format).unwrap();
        assert_eq!(encoder.pattern(), "%H:%M");
        assert_eq!(encoder.encode(&Timestamp::new(1709001600, 0)), json!("23:00"));

        let bad = TimestampFormat {
            utc_offset_seconds: 90_000,
            ..TimestampFormat::default()
        };
        assert_eq!(
            PatternTimestampEncoder::from_format(&bad).unwrap_err(),
            JsonTypesError::InvalidOffset(90_000)
        );
    }

    #[test]
    fn test_out_of_range_renders_null() {
        let encoder = PatternTimestampEncoder::default();
        assert_eq!(encoder.encode(&Timestamp::new(i64::MAX, 0)), Value::Null);
    }

    #[test]
    fn test_epoch_millis() {
        let encoder = EpochMillisTimestampEncoder;
        assert_eq!(
            encoder.encode(&Timestamp::new(1709001600, 123_456_789)),
            json!(1709001600123i64)
        );
    }

    #[test]
    fn test_field_and_element_forms() {
        let encoder = PatternTimestampEncoder::with_pattern("%Y").unwrap();
        let ts = Timestamp::new(1709001600, 0);

        let mut object = JsonObject::new();
        encoder.encode_field(&mut object, "when", &ts);
        assert_eq!(Value::Object(object), json!({"when": "2024"}));

        let mut array = vec![json!(1)];
        encoder.encode_element(&mut array, &ts);
        assert_eq!(array, vec![json!(1), json!("2024")]);
    }
}

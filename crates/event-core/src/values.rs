//! Value representations for decoded document fields.
//!
//! A document is a tree: every field holds one [`TypedValue`], and the two
//! container variants ([`TypedValue::Array`] and [`TypedValue::Map`]) nest
//! further values. Exactly one variant is populated per value, so the
//! "no kind" and "several kinds" states of the wire encoding cannot be
//! expressed here.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;

/// Insertion-ordered mapping of field name to value.
///
/// Iteration order is the order in which the fields appeared in the source,
/// and conversion preserves it.
pub type FieldMap = IndexMap<String, TypedValue>;

/// One field's content.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Explicit null
    Null,

    /// Boolean value
    Boolean(bool),

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point
    Double(f64),

    /// UTF-8 text
    String(String),

    /// Opaque document reference path
    Reference(String),

    /// Point in time
    Timestamp(Timestamp),

    /// Latitude/longitude pair
    GeoPoint(GeoPoint),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Ordered sequence of values
    Array(Vec<TypedValue>),

    /// Nested map of values
    Map(FieldMap),
}

impl TypedValue {
    /// Create a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a reference value.
    pub fn reference(path: impl Into<String>) -> Self {
        Self::Reference(path.into())
    }

    /// Create a timestamp value.
    pub fn timestamp(seconds: i64, nanos: i32) -> Self {
        Self::Timestamp(Timestamp::new(seconds, nanos))
    }

    /// Create a geo-point value.
    pub fn geo_point(latitude: f64, longitude: f64) -> Self {
        Self::GeoPoint(GeoPoint::new(latitude, longitude))
    }

    /// Create a map value from `(name, value)` pairs, keeping their order.
    pub fn map<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TypedValue)>,
    {
        Self::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the populated variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Reference(_) => "reference",
            Self::Timestamp(_) => "timestamp",
            Self::GeoPoint(_) => "geo_point",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }
}

/// Seconds and nanoseconds since the Unix epoch.
///
/// Stored exactly as received; `nanos` is not required to be normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Absolute UTC instant for this timestamp.
    ///
    /// Negative or oversized `nanos` carry into `seconds`. Returns `None` when
    /// the instant falls outside the representable calendar range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = i64::from(self.nanos);
        let seconds = self
            .seconds
            .checked_add(nanos.div_euclid(NANOS_PER_SECOND))?;
        let subsec = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
        DateTime::<Utc>::from_timestamp(seconds, subsec)
    }

    /// Milliseconds since the epoch, sub-millisecond precision truncated
    /// toward negative infinity. Saturates instead of overflowing.
    pub fn epoch_millis(&self) -> i64 {
        self.seconds
            .saturating_mul(1000)
            .saturating_add(i64::from(self.nanos).div_euclid(NANOS_PER_MILLI))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos() as i32,
        }
    }
}

/// Geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

//! JSON conversion for event-core types.
//!
//! This crate converts decoded document trees (`TypedValue`, `FieldMap`) into
//! `serde_json` values, keeping field order and numeric precision.
//!
//! # Modules
//!
//! - [`forward`] - [`JsonConverter`]: TypedValue/FieldMap → JSON
//! - [`timestamp`] - Pluggable timestamp rendering
//! - [`geo_point`] - Pluggable geo-point rendering
//! - [`bytes`] - Pluggable bytes rendering
//! - [`error`] - Construction-time errors
//!
//! Timestamps, geo-points and bytes have no single obvious JSON form, so the
//! converter hands them to an encoder chosen when it is built. Every other
//! variant has a fixed mapping.
//!
//! # Example
//!
//! ```ignore
//! use json_types::{JsonConverter, PatternTimestampEncoder};
//!
//! let converter = JsonConverter::new()
//!     .with_timestamp_encoder(PatternTimestampEncoder::with_pattern("%Y-%m-%d")?);
//! let object = converter.convert_fields(&document.fields);
//! ```

pub mod bytes;
pub mod error;
pub mod forward;
pub mod geo_point;
pub mod timestamp;

/// A JSON object with insertion-ordered keys.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

pub use bytes::{Base64BytesEncoder, BytesEncoder};
pub use error::{JsonTypesError, Result};
pub use forward::JsonConverter;
pub use geo_point::{ArrayGeoPointEncoder, GeoPointEncoder, ObjectGeoPointEncoder};
pub use timestamp::{
    EpochMillisTimestampEncoder, PatternTimestampEncoder, TimestampEncoder, TimestampFormat,
    DEFAULT_TIMESTAMP_PATTERN,
};

//! firestore-event-json
//!
//! Converts Firestore document change events into JSON for logging, routing
//! and further processing.
//!
//! # Features
//!
//! - Accepts decoded events, raw protobuf bytes, or base64 text
//! - Keeps field order, 64-bit integer precision and explicit nulls
//! - Pluggable rendering for timestamps, geo-points and bytes
//! - Stateless: one converter can serve any number of threads
//!
//! # Crates
//!
//! - `event_core` - decoded value and event types
//! - `firestore_types` - protobuf wire decoding
//! - `json_types` - value → JSON conversion and leaf encoders
//!
//! # Usage
//!
//! ```ignore
//! use firestore_event_json::{ChangeEventConverter, EventInput};
//!
//! let converter = ChangeEventConverter::new();
//! let after = converter.current_json(EventInput::base64(&payload))?;
//! let before = converter.previous_json(EventInput::base64(&payload))?;
//! ```

pub mod converter;
pub mod error;
pub mod input;

pub use converter::{to_json_string, ChangeEventConverter};
pub use error::{Error, Result};
pub use input::EventInput;

pub use event_core::{
    ChangeEvent, ChangeKind, Document, FieldMap, GeoPoint, Timestamp, TypedValue,
};
pub use firestore_types::{DecodeError, EventDecoder, ProtobufEventDecoder};
pub use json_types::{
    ArrayGeoPointEncoder, Base64BytesEncoder, BytesEncoder, EpochMillisTimestampEncoder,
    GeoPointEncoder, JsonConverter, JsonObject, JsonTypesError, ObjectGeoPointEncoder,
    PatternTimestampEncoder, TimestampEncoder, TimestampFormat, DEFAULT_TIMESTAMP_PATTERN,
};

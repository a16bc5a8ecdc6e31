//! Firestore wire decoding for firestore-event-json.
//!
//! This crate turns the protobuf encoding of a Firestore `DocumentEventData`
//! message into the [`event_core::ChangeEvent`] tree consumed by the JSON
//! converter.
//!
//! # Architecture
//!
//! ```text
//! encoded bytes → ProtobufEventDecoder → ChangeEvent → (json-types) → JSON
//! ```
//!
//! # Modules
//!
//! - [`decoder`] - [`EventDecoder`] trait and the protobuf implementation
//! - [`error`] - Error types for decoding
//! - `testing` - Wire encoder for building fixtures (feature `testing`)
//!
//! # Example
//!
//! ```ignore
//! use firestore_types::{EventDecoder, ProtobufEventDecoder};
//!
//! let event = ProtobufEventDecoder.decode(&bytes)?;
//! println!("{:?}", event.kind());
//! ```

pub mod decoder;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use decoder::{decode_event, EventDecoder, ProtobufEventDecoder, MAX_NESTING_DEPTH};
pub use error::{DecodeError, Result};

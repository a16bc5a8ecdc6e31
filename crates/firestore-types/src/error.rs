//! Error types for firestore-types crate.

use thiserror::Error;

/// Errors that can occur while decoding a change event from wire bytes.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Protobuf decoding error: {0}")]
    Protobuf(#[from] protobuf::Error),

    #[error("Invalid field tag {0}")]
    InvalidTag(u32),

    #[error("Unexpected wire type {actual} for field {field} of {message} (expected {expected})")]
    WireType {
        message: &'static str,
        field: u32,
        expected: u32,
        actual: u32,
    },

    #[error("Unsupported wire type {wire_type} for field {field} of {message}")]
    UnsupportedWireType {
        message: &'static str,
        field: u32,
        wire_type: u32,
    },

    #[error("Nested message ends early: {missing} of {expected} bytes missing")]
    Truncated { expected: u32, missing: u64 },

    #[error("Value for '{0}' has no kind set")]
    MissingValueKind(String),

    #[error("Nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

/// Result type alias for firestore-types operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

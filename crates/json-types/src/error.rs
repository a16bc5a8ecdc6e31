//! Error types for json-types crate.

use thiserror::Error;

/// Errors raised while configuring a converter or one of its encoders.
///
/// Conversion itself never fails once the converter is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonTypesError {
    #[error("Invalid timestamp pattern: {0:?}")]
    InvalidPattern(String),

    #[error("UTC offset out of range: {0} seconds")]
    InvalidOffset(i32),
}

/// Result type alias for json-types operations.
pub type Result<T> = std::result::Result<T, JsonTypesError>;

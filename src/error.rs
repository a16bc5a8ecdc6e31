//! Error types for firestore-event-json.

use firestore_types::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input text is not valid base64.
    #[error("Invalid base64 input: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Input bytes are not a valid change event.
    #[error("Failed to decode change event: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// True for failures caused by malformed input (base64 or wire format).
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Encoding(_) | Error::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

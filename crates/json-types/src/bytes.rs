//! Bytes rendering.

use crate::JsonObject;
use base64::Engine;
use serde_json::Value;

/// Renders raw bytes as JSON.
pub trait BytesEncoder: Send + Sync {
    fn encode(&self, bytes: &[u8]) -> Value;

    fn encode_field(&self, object: &mut JsonObject, key: &str, bytes: &[u8]) {
        object.insert(key.to_string(), self.encode(bytes));
    }

    fn encode_element(&self, array: &mut Vec<Value>, bytes: &[u8]) {
        array.push(self.encode(bytes));
    }
}

/// Standard-alphabet, padded base64 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64BytesEncoder;

impl BytesEncoder for Base64BytesEncoder {
    fn encode(&self, bytes: &[u8]) -> Value {
        Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

//! Change event → JSON conversion.
//!
//! [`ChangeEventConverter`] ties the pieces together: it decodes the input
//! when needed, picks the current or previous snapshot, and converts that
//! snapshot's fields with a [`JsonConverter`]. A missing snapshot is reported
//! as `None`, never as an empty object.

use crate::error::Result;
use crate::input::EventInput;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use event_core::{ChangeEvent, FieldMap};
use firestore_types::{EventDecoder, ProtobufEventDecoder};
use json_types::{BytesEncoder, GeoPointEncoder, JsonConverter, JsonObject, TimestampEncoder};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Standard alphabet; trailing padding optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Converts change events into JSON objects or JSON text.
///
/// Built once and passed to call sites; holds only immutable configuration.
///
/// ```ignore
/// use firestore_event_json::{ChangeEventConverter, EventInput, PatternTimestampEncoder};
///
/// let converter = ChangeEventConverter::new()
///     .with_timestamp_encoder(PatternTimestampEncoder::with_pattern("%Y-%m-%d")?);
///
/// if let Some(text) = converter.current_json(EventInput::base64(&payload))? {
///     println!("{text}");
/// }
/// ```
#[derive(Clone)]
pub struct ChangeEventConverter {
    json: JsonConverter,
    decoder: Arc<dyn EventDecoder>,
}

impl Default for ChangeEventConverter {
    fn default() -> Self {
        Self {
            json: JsonConverter::default(),
            decoder: Arc::new(ProtobufEventDecoder),
        }
    }
}

impl fmt::Debug for ChangeEventConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEventConverter")
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}

impl ChangeEventConverter {
    /// Create a converter with the default decoder and encoders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fully configured [`JsonConverter`].
    pub fn with_json_converter(mut self, json: JsonConverter) -> Self {
        self.json = json;
        self
    }

    pub fn with_timestamp_encoder(mut self, encoder: impl TimestampEncoder + 'static) -> Self {
        self.json = self.json.with_timestamp_encoder(encoder);
        self
    }

    pub fn with_geo_point_encoder(mut self, encoder: impl GeoPointEncoder + 'static) -> Self {
        self.json = self.json.with_geo_point_encoder(encoder);
        self
    }

    pub fn with_bytes_encoder(mut self, encoder: impl BytesEncoder + 'static) -> Self {
        self.json = self.json.with_bytes_encoder(encoder);
        self
    }

    /// Replace the wire decoder used for byte and base64 input.
    pub fn with_decoder(mut self, decoder: impl EventDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// JSON object for the document state after the change, if there is one.
    pub fn current_value(&self, event: &ChangeEvent) -> Option<JsonObject> {
        event.current_fields().map(|fields| self.convert(fields))
    }

    /// JSON object for the document state before the change, if there is one.
    pub fn previous_value(&self, event: &ChangeEvent) -> Option<JsonObject> {
        event.previous_fields().map(|fields| self.convert(fields))
    }

    /// Resolve any input shape to a change event.
    ///
    /// Decoded events are passed through without copying.
    pub fn decode<'a>(&self, input: impl Into<EventInput<'a>>) -> Result<Cow<'a, ChangeEvent>> {
        match input.into() {
            EventInput::Decoded(event) => Ok(Cow::Borrowed(event)),
            EventInput::Bytes(bytes) => {
                trace!("Decoding change event from {} bytes", bytes.len());
                Ok(Cow::Owned(self.decoder.decode(bytes)?))
            }
            EventInput::Base64(text) => {
                trace!("Decoding change event from {} base64 characters", text.len());
                let bytes = BASE64.decode(text.trim())?;
                Ok(Cow::Owned(self.decoder.decode(&bytes)?))
            }
        }
    }

    /// [`current_value`](Self::current_value) for any input shape.
    pub fn current_object<'a>(
        &self,
        input: impl Into<EventInput<'a>>,
    ) -> Result<Option<JsonObject>> {
        let event = self.decode(input)?;
        Ok(self.current_value(&event))
    }

    /// [`previous_value`](Self::previous_value) for any input shape.
    pub fn previous_object<'a>(
        &self,
        input: impl Into<EventInput<'a>>,
    ) -> Result<Option<JsonObject>> {
        let event = self.decode(input)?;
        Ok(self.previous_value(&event))
    }

    /// Current document as JSON text; `None` when the event has no current state.
    pub fn current_json<'a>(&self, input: impl Into<EventInput<'a>>) -> Result<Option<String>> {
        to_json_string(self.current_object(input)?)
    }

    /// Previous document as JSON text; `None` when the event has no previous state.
    pub fn previous_json<'a>(&self, input: impl Into<EventInput<'a>>) -> Result<Option<String>> {
        to_json_string(self.previous_object(input)?)
    }

    fn convert(&self, fields: &FieldMap) -> JsonObject {
        self.json.convert_fields(fields)
    }
}

/// Compact JSON text for `object`, keeping null fields. `None` stays `None`.
pub fn to_json_string(object: Option<JsonObject>) -> Result<Option<String>> {
    match object {
        Some(object) => Ok(Some(serde_json::to_string(&object)?)),
        None => Ok(None),
    }
}

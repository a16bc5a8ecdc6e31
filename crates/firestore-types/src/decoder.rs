//! Protobuf decoder for Firestore change events.
//!
//! Reads the `google.events.cloud.firestore.v1.DocumentEventData` wire format
//! field by field with [`CodedInputStream`] and builds the [`ChangeEvent`]
//! tree directly, without generated message types.

use crate::error::{DecodeError, Result};
use event_core::{ChangeEvent, Document, FieldMap, GeoPoint, Timestamp, TypedValue};
use protobuf::CodedInputStream;
use tracing::{debug, trace};

/// Maximum depth of nested messages accepted by the decoder.
///
/// Each map or array level costs several message levels, so this comfortably
/// covers the 20 levels of map nesting a document may use.
pub const MAX_NESTING_DEPTH: usize = 100;

pub(crate) mod wire {
    pub const VARINT: u32 = 0;
    pub const FIXED64: u32 = 1;
    pub const LEN: u32 = 2;
    pub const FIXED32: u32 = 5;
}

/// `DocumentEventData`
pub(crate) mod event_field {
    pub const VALUE: u32 = 1;
    pub const OLD_VALUE: u32 = 2;
    pub const UPDATE_MASK: u32 = 3;
}

/// `DocumentMask`
pub(crate) mod mask_field {
    pub const FIELD_PATHS: u32 = 1;
}

/// `Document`
pub(crate) mod document_field {
    pub const NAME: u32 = 1;
    pub const FIELDS: u32 = 2;
    pub const CREATE_TIME: u32 = 3;
    pub const UPDATE_TIME: u32 = 4;
}

/// Map entries (`Document.fields`, `MapValue.fields`)
pub(crate) mod entry_field {
    pub const KEY: u32 = 1;
    pub const VALUE: u32 = 2;
}

/// `Value` oneof members
pub(crate) mod value_field {
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const DOUBLE: u32 = 3;
    pub const REFERENCE: u32 = 5;
    pub const MAP: u32 = 6;
    pub const GEO_POINT: u32 = 8;
    pub const ARRAY: u32 = 9;
    pub const TIMESTAMP: u32 = 10;
    pub const NULL: u32 = 11;
    pub const STRING: u32 = 17;
    pub const BYTES: u32 = 18;
}

/// `MapValue.fields` and `ArrayValue.values` share field number 1.
pub(crate) const CONTAINER_FIELD: u32 = 1;

/// `google.protobuf.Timestamp`
pub(crate) mod timestamp_field {
    pub const SECONDS: u32 = 1;
    pub const NANOS: u32 = 2;
}

/// `google.type.LatLng`
pub(crate) mod lat_lng_field {
    pub const LATITUDE: u32 = 1;
    pub const LONGITUDE: u32 = 2;
}

/// Turns encoded bytes into a [`ChangeEvent`].
///
/// Implementations must be shareable across threads; the converter holds one
/// for its whole lifetime.
pub trait EventDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<ChangeEvent>;
}

/// Decoder for the protobuf `DocumentEventData` encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufEventDecoder;

impl EventDecoder for ProtobufEventDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ChangeEvent> {
        decode_event(bytes)
    }
}

/// Decode a `DocumentEventData` message.
pub fn decode_event(bytes: &[u8]) -> Result<ChangeEvent> {
    let mut stream = CodedInputStream::from_bytes(bytes);
    let event = decode_event_data(&mut stream, 0)?;
    debug!(
        "Decoded change event ({} bytes): kind={:?}, document={:?}",
        bytes.len(),
        event.kind(),
        event.document_name()
    );
    Ok(event)
}

fn next_tag(stream: &mut CodedInputStream<'_>) -> Result<Option<(u32, u32)>> {
    if stream.eof()? {
        return Ok(None);
    }
    let tag = stream.read_raw_varint32()?;
    let field = tag >> 3;
    if field == 0 {
        return Err(DecodeError::InvalidTag(tag));
    }
    Ok(Some((field, tag & 7)))
}

fn expect_wire_type(message: &'static str, field: u32, expected: u32, actual: u32) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(DecodeError::WireType {
            message,
            field,
            expected,
            actual,
        })
    }
}

fn skip_field(
    stream: &mut CodedInputStream<'_>,
    message: &'static str,
    field: u32,
    wire_type: u32,
) -> Result<()> {
    trace!("Skipping unknown field {field} (wire type {wire_type}) in {message}");
    match wire_type {
        wire::VARINT => {
            stream.read_raw_varint64()?;
        }
        wire::FIXED64 => {
            stream.read_fixed64()?;
        }
        wire::LEN => {
            let len = stream.read_raw_varint32()?;
            stream.read_raw_bytes(len)?;
        }
        wire::FIXED32 => {
            stream.read_fixed32()?;
        }
        _ => {
            return Err(DecodeError::UnsupportedWireType {
                message,
                field,
                wire_type,
            })
        }
    }
    Ok(())
}

/// Read a length-delimited sub-message with `read`, confined to its length.
fn read_nested<T>(
    stream: &mut CodedInputStream<'_>,
    depth: usize,
    read: impl FnOnce(&mut CodedInputStream<'_>, usize) -> Result<T>,
) -> Result<T> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(DecodeError::NestingTooDeep(MAX_NESTING_DEPTH));
    }
    let len = stream.read_raw_varint32()?;
    let old_limit = stream.push_limit(u64::from(len))?;
    let value = read(stream, depth + 1)?;
    let missing = stream.bytes_until_limit();
    if missing != 0 {
        return Err(DecodeError::Truncated { expected: len, missing });
    }
    stream.pop_limit(old_limit);
    Ok(value)
}

fn decode_event_data(stream: &mut CodedInputStream<'_>, depth: usize) -> Result<ChangeEvent> {
    const MESSAGE: &str = "DocumentEventData";
    let mut event = ChangeEvent::default();

    while let Some((field, wire_type)) = next_tag(stream)? {
        match field {
            event_field::VALUE => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                event.current = Some(read_nested(stream, depth, decode_document)?);
            }
            event_field::OLD_VALUE => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                event.previous = Some(read_nested(stream, depth, decode_document)?);
            }
            event_field::UPDATE_MASK => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                let paths = read_nested(stream, depth, decode_document_mask)?;
                event.update_mask.extend(paths);
            }
            _ => skip_field(stream, MESSAGE, field, wire_type)?,
        }
    }

    Ok(event)
}

fn decode_document_mask(stream: &mut CodedInputStream<'_>, _depth: usize) -> Result<Vec<String>> {
    const MESSAGE: &str = "DocumentMask";
    let mut paths = Vec::new();

    while let Some((field, wire_type)) = next_tag(stream)? {
        match field {
            mask_field::FIELD_PATHS => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                paths.push(stream.read_string()?);
            }
            _ => skip_field(stream, MESSAGE, field, wire_type)?,
        }
    }

    Ok(paths)
}

fn decode_document(stream: &mut CodedInputStream<'_>, depth: usize) -> Result<Document> {
    const MESSAGE: &str = "Document";
    let mut document = Document::default();

    while let Some((field, wire_type)) = next_tag(stream)? {
        match field {
            document_field::NAME => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                document.name = stream.read_string()?;
            }
            document_field::FIELDS => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                let (key, value) = read_nested(stream, depth, decode_map_entry)?;
                document.fields.insert(key, value);
            }
            document_field::CREATE_TIME => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                document.create_time = Some(read_nested(stream, depth, decode_timestamp)?);
            }
            document_field::UPDATE_TIME => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                document.update_time = Some(read_nested(stream, depth, decode_timestamp)?);
            }
            _ => skip_field(stream, MESSAGE, field, wire_type)?,
        }
    }

    Ok(document)
}

fn decode_map_entry(
    stream: &mut CodedInputStream<'_>,
    depth: usize,
) -> Result<(String, TypedValue)> {
    const MESSAGE: &str = "FieldsEntry";
    let mut key = String::new();
    let mut value = None;

    while let Some((field, wire_type)) = next_tag(stream)? {
        match field {
            entry_field::KEY => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                key = stream.read_string()?;
            }
            entry_field::VALUE => {
                expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
                value = read_nested(stream, depth, decode_value)?;
            }
            _ => skip_field(stream, MESSAGE, field, wire_type)?,
        }
    }

    match value {
        Some(value) => Ok((key, value)),
        None => Err(DecodeError::MissingValueKind(key)),
    }
}

fn decode_map_value(stream: &mut CodedInputStream<'_>, depth: usize) -> Result<FieldMap> {
    const MESSAGE: &str = "MapValue";
    let mut fields = FieldMap::new();

    while let Some((field, wire_type)) = next_tag(stream)? {
        if field == CONTAINER_FIELD {
            expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
            let (key, value) = read_nested(stream, depth, decode_map_entry)?;
            fields.insert(key, value);
        } else {
            skip_field(stream, MESSAGE, field, wire_type)?;
        }
    }

    Ok(fields)
}

fn decode_array_value(stream: &mut CodedInputStream<'_>, depth: usize) -> Result<Vec<TypedValue>> {
    const MESSAGE: &str = "ArrayValue";
    let mut values = Vec::new();

    while let Some((field, wire_type)) = next_tag(stream)? {
        if field == CONTAINER_FIELD {
            expect_wire_type(MESSAGE, field, wire::LEN, wire_type)?;
            let value = read_nested(stream, depth, decode_value)?.ok_or_else(|| {
                DecodeError::MissingValueKind(format!("array element {}", values.len()))
            })?;
            values.push(value);
        } else {
            skip_field(stream, MESSAGE, field, wire_type)?;
        }
    }

    Ok(values)
}

/// Wire type each `Value` oneof member must arrive with.
fn value_wire_type(field: u32) -> Option<u32> {
    match field {
        value_field::BOOLEAN | value_field::INTEGER | value_field::NULL => Some(wire::VARINT),
        value_field::DOUBLE => Some(wire::FIXED64),
        value_field::REFERENCE
        | value_field::MAP
        | value_field::GEO_POINT
        | value_field::ARRAY
        | value_field::TIMESTAMP
        | value_field::STRING
        | value_field::BYTES => Some(wire::LEN),
        _ => None,
    }
}

/// Decode a `Value`. Returns `None` when no oneof member was present.
///
/// When several members appear, the last one wins.
fn decode_value(stream: &mut CodedInputStream<'_>, depth: usize) -> Result<Option<TypedValue>> {
    const MESSAGE: &str = "Value";
    let mut kind = None;

    while let Some((field, wire_type)) = next_tag(stream)? {
        if let Some(expected) = value_wire_type(field) {
            expect_wire_type(MESSAGE, field, expected, wire_type)?;
        }

        let value = match field {
            value_field::NULL => {
                // NullValue has a single member; the number itself carries nothing.
                stream.read_int32()?;
                TypedValue::Null
            }
            value_field::BOOLEAN => TypedValue::Boolean(stream.read_bool()?),
            value_field::INTEGER => TypedValue::Integer(stream.read_int64()?),
            value_field::DOUBLE => TypedValue::Double(stream.read_double()?),
            value_field::STRING => TypedValue::String(stream.read_string()?),
            value_field::REFERENCE => TypedValue::Reference(stream.read_string()?),
            value_field::BYTES => TypedValue::Bytes(stream.read_bytes()?),
            value_field::TIMESTAMP => {
                TypedValue::Timestamp(read_nested(stream, depth, decode_timestamp)?)
            }
            value_field::GEO_POINT => {
                TypedValue::GeoPoint(read_nested(stream, depth, decode_lat_lng)?)
            }
            value_field::ARRAY => TypedValue::Array(read_nested(stream, depth, decode_array_value)?),
            value_field::MAP => TypedValue::Map(read_nested(stream, depth, decode_map_value)?),
            _ => {
                skip_field(stream, MESSAGE, field, wire_type)?;
                continue;
            }
        };
        kind = Some(value);
    }

    Ok(kind)
}

fn decode_timestamp(stream: &mut CodedInputStream<'_>, _depth: usize) -> Result<Timestamp> {
    const MESSAGE: &str = "Timestamp";
    let mut timestamp = Timestamp::default();

    while let Some((field, wire_type)) = next_tag(stream)? {
        match field {
            timestamp_field::SECONDS => {
                expect_wire_type(MESSAGE, field, wire::VARINT, wire_type)?;
                timestamp.seconds = stream.read_int64()?;
            }
            timestamp_field::NANOS => {
                expect_wire_type(MESSAGE, field, wire::VARINT, wire_type)?;
                timestamp.nanos = stream.read_int32()?;
            }
            _ => skip_field(stream, MESSAGE, field, wire_type)?,
        }
    }

    Ok(timestamp)
}

fn decode_lat_lng(stream: &mut CodedInputStream<'_>, _depth: usize) -> Result<GeoPoint> {
    const MESSAGE: &str = "LatLng";
    let mut point = GeoPoint::default();

    while let Some((field, wire_type)) = next_tag(stream)? {
        match field {
            lat_lng_field::LATITUDE => {
                expect_wire_type(MESSAGE, field, wire::FIXED64, wire_type)?;
                point.latitude = stream.read_double()?;
            }
            lat_lng_field::LONGITUDE => {
                expect_wire_type(MESSAGE, field, wire::FIXED64, wire_type)?;
                point.longitude = stream.read_double()?;
            }
            _ => skip_field(stream, MESSAGE, field, wire_type)?,
        }
    }

    Ok(point)
}

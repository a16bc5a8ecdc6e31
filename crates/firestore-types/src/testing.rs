//! Wire encoder for building `DocumentEventData` fixtures.
//!
//! Mirrors the decoder's field layout so tests can describe events as
//! [`ChangeEvent`] values instead of opaque base64 blobs. Nested messages are
//! encoded into their own buffer first and written as length-delimited bytes.

use crate::decoder::{
    document_field, entry_field, event_field, lat_lng_field, mask_field, timestamp_field,
    value_field, CONTAINER_FIELD,
};
use event_core::{ChangeEvent, Document, FieldMap, GeoPoint, Timestamp, TypedValue};
use protobuf::CodedOutputStream;

type EncodeResult = protobuf::Result<Vec<u8>>;

/// Encode a full change event.
pub fn encode_event(event: &ChangeEvent) -> EncodeResult {
    let current = event.current.as_ref().map(encode_document).transpose()?;
    let previous = event.previous.as_ref().map(encode_document).transpose()?;
    let mask = if event.update_mask.is_empty() {
        None
    } else {
        Some(encode_mask(&event.update_mask)?)
    };

    let mut buffer = Vec::new();
    {
        let mut stream = CodedOutputStream::vec(&mut buffer);
        if let Some(current) = &current {
            stream.write_bytes(event_field::VALUE, current)?;
        }
        if let Some(previous) = &previous {
            stream.write_bytes(event_field::OLD_VALUE, previous)?;
        }
        if let Some(mask) = &mask {
            stream.write_bytes(event_field::UPDATE_MASK, mask)?;
        }
        stream.flush()?;
    }
    Ok(buffer)
}

/// Encode the body of a single `Value` message.
pub fn encode_value_message(value: &TypedValue) -> EncodeResult {
    let mut buffer = Vec::new();
    {
        let mut stream = CodedOutputStream::vec(&mut buffer);
        match value {
            TypedValue::Null => stream.write_enum(value_field::NULL, 0)?,
            TypedValue::Boolean(b) => stream.write_bool(value_field::BOOLEAN, *b)?,
            TypedValue::Integer(i) => stream.write_int64(value_field::INTEGER, *i)?,
            TypedValue::Double(d) => stream.write_double(value_field::DOUBLE, *d)?,
            TypedValue::String(s) => stream.write_string(value_field::STRING, s)?,
            TypedValue::Reference(r) => stream.write_string(value_field::REFERENCE, r)?,
            TypedValue::Bytes(b) => stream.write_bytes(value_field::BYTES, b)?,
            TypedValue::Timestamp(ts) => {
                stream.write_bytes(value_field::TIMESTAMP, &encode_timestamp(ts)?)?
            }
            TypedValue::GeoPoint(point) => {
                stream.write_bytes(value_field::GEO_POINT, &encode_lat_lng(point)?)?
            }
            TypedValue::Array(values) => {
                let mut array = Vec::new();
                {
                    let mut inner = CodedOutputStream::vec(&mut array);
                    for element in values {
                        inner.write_bytes(CONTAINER_FIELD, &encode_value_message(element)?)?;
                    }
                    inner.flush()?;
                }
                stream.write_bytes(value_field::ARRAY, &array)?
            }
            TypedValue::Map(fields) => {
                let map = encode_entries(CONTAINER_FIELD, fields)?;
                stream.write_bytes(value_field::MAP, &map)?
            }
        }
        stream.flush()?;
    }
    Ok(buffer)
}

fn encode_document(document: &Document) -> EncodeResult {
    let entries = encode_entries(document_field::FIELDS, &document.fields)?;
    let mut buffer = Vec::new();
    {
        let mut stream = CodedOutputStream::vec(&mut buffer);
        if !document.name.is_empty() {
            stream.write_string(document_field::NAME, &document.name)?;
        }
        stream.write_raw_bytes(&entries)?;
        if let Some(ts) = &document.create_time {
            stream.write_bytes(document_field::CREATE_TIME, &encode_timestamp(ts)?)?;
        }
        if let Some(ts) = &document.update_time {
            stream.write_bytes(document_field::UPDATE_TIME, &encode_timestamp(ts)?)?;
        }
        stream.flush()?;
    }
    Ok(buffer)
}

/// Encode every entry of `fields` as a repeated map-entry field numbered `field_number`.
fn encode_entries(field_number: u32, fields: &FieldMap) -> EncodeResult {
    let mut buffer = Vec::new();
    {
        let mut stream = CodedOutputStream::vec(&mut buffer);
        for (key, value) in fields {
            let mut entry = Vec::new();
            {
                let mut inner = CodedOutputStream::vec(&mut entry);
                inner.write_string(entry_field::KEY, key)?;
                inner.write_bytes(entry_field::VALUE, &encode_value_message(value)?)?;
                inner.flush()?;
            }
            stream.write_bytes(field_number, &entry)?;
        }
        stream.flush()?;
    }
    Ok(buffer)
}

fn encode_mask(paths: &[String]) -> EncodeResult {
    let mut buffer = Vec::new();
    {
        let mut stream = CodedOutputStream::vec(&mut buffer);
        for path in paths {
            stream.write_string(mask_field::FIELD_PATHS, path)?;
        }
        stream.flush()?;
    }
    Ok(buffer)
}

fn encode_timestamp(ts: &Timestamp) -> EncodeResult {
    let mut buffer = Vec::new();
    {
        let mut stream = CodedOutputStream::vec(&mut buffer);
        stream.write_int64(timestamp_field::SECONDS, ts.seconds)?;
        stream.write_int32(timestamp_field::NANOS, ts.nanos)?;
        stream.flush()?;
    }
    Ok(buffer)
}

fn encode_lat_lng(point: &GeoPoint) -> EncodeResult {
    let mut buffer = Vec::new();
    {
        let mut stream = CodedOutputStream::vec(&mut buffer);
        stream.write_double(lat_lng_field::LATITUDE, point.latitude)?;
        stream.write_double(lat_lng_field::LONGITUDE, point.longitude)?;
        stream.flush()?;
    }
    Ok(buffer)
}

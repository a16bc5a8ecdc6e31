//! Forward conversion: TypedValue → JSON value.
//!
//! [`JsonConverter`] walks a value tree and builds the equivalent
//! `serde_json` tree. Scalars map directly; timestamps, geo-points and bytes
//! go through the configured encoders; maps and arrays recurse in source
//! order.

use crate::bytes::{Base64BytesEncoder, BytesEncoder};
use crate::geo_point::{GeoPointEncoder, ObjectGeoPointEncoder};
use crate::timestamp::{PatternTimestampEncoder, TimestampEncoder};
use crate::JsonObject;
use event_core::{FieldMap, TypedValue};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Where a converted value is written.
enum Slot<'a> {
    /// Standalone value
    Root(&'a mut Value),
    /// Named field of an object
    Field {
        object: &'a mut JsonObject,
        key: &'a str,
    },
    /// Element of an array
    Element(&'a mut Vec<Value>),
}

impl Slot<'_> {
    fn put(self, value: Value) {
        match self {
            Slot::Root(out) => *out = value,
            Slot::Field { object, key } => {
                object.insert(key.to_string(), value);
            }
            Slot::Element(array) => array.push(value),
        }
    }
}

/// Converts values and field maps to JSON.
///
/// Holds only the installed encoders, so one converter can be shared across
/// threads and reused for any number of conversions.
///
/// ```
/// use event_core::{FieldMap, TypedValue};
/// use json_types::JsonConverter;
///
/// let mut fields = FieldMap::new();
/// fields.insert("active".to_string(), TypedValue::Boolean(true));
/// fields.insert("where".to_string(), TypedValue::geo_point(37.42, -122.08));
///
/// let object = JsonConverter::new().convert_fields(&fields);
/// assert_eq!(
///     serde_json::Value::Object(object),
///     serde_json::json!({"active": true, "where": {"latitude": 37.42, "longitude": -122.08}})
/// );
/// ```
#[derive(Clone)]
pub struct JsonConverter {
    timestamp_encoder: Arc<dyn TimestampEncoder>,
    geo_point_encoder: Arc<dyn GeoPointEncoder>,
    bytes_encoder: Arc<dyn BytesEncoder>,
}

impl Default for JsonConverter {
    fn default() -> Self {
        Self {
            timestamp_encoder: Arc::new(PatternTimestampEncoder::default()),
            geo_point_encoder: Arc::new(ObjectGeoPointEncoder),
            bytes_encoder: Arc::new(Base64BytesEncoder),
        }
    }
}

impl fmt::Debug for JsonConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonConverter").finish_non_exhaustive()
    }
}

impl JsonConverter {
    /// Create a converter with the default encoders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the timestamp encoder.
    pub fn with_timestamp_encoder(mut self, encoder: impl TimestampEncoder + 'static) -> Self {
        self.timestamp_encoder = Arc::new(encoder);
        self
    }

    /// Replace the geo-point encoder.
    pub fn with_geo_point_encoder(mut self, encoder: impl GeoPointEncoder + 'static) -> Self {
        self.geo_point_encoder = Arc::new(encoder);
        self
    }

    /// Replace the bytes encoder.
    pub fn with_bytes_encoder(mut self, encoder: impl BytesEncoder + 'static) -> Self {
        self.bytes_encoder = Arc::new(encoder);
        self
    }

    /// Convert every field of `fields` into one JSON object, in field order.
    pub fn convert_fields(&self, fields: &FieldMap) -> JsonObject {
        let mut object = JsonObject::new();
        for (key, value) in fields {
            self.append(
                Slot::Field {
                    object: &mut object,
                    key,
                },
                value,
            );
        }
        object
    }

    /// Convert a single value outside of any object or array.
    pub fn convert_value(&self, value: &TypedValue) -> Value {
        let mut out = Value::Null;
        self.append(Slot::Root(&mut out), value);
        out
    }

    /// Convert `value` as a field named `key` of `object`.
    pub fn append_field(&self, object: &mut JsonObject, key: &str, value: &TypedValue) {
        self.append(Slot::Field { object, key }, value);
    }

    /// Convert `value` as the next element of `array`.
    ///
    /// Arrays directly inside arrays are skipped.
    pub fn append_element(&self, array: &mut Vec<Value>, value: &TypedValue) {
        self.append(Slot::Element(array), value);
    }

    fn convert_elements(&self, values: &[TypedValue]) -> Vec<Value> {
        let mut array = Vec::with_capacity(values.len());
        for value in values {
            self.append(Slot::Element(&mut array), value);
        }
        array
    }

    fn append(&self, slot: Slot<'_>, value: &TypedValue) {
        match value {
            TypedValue::Null => slot.put(Value::Null),
            TypedValue::Boolean(b) => slot.put(Value::Bool(*b)),
            TypedValue::Integer(i) => slot.put(Value::from(*i)),
            // Non-finite doubles have no JSON number form and become null.
            TypedValue::Double(d) => slot.put(Value::from(*d)),
            TypedValue::String(s) => slot.put(Value::String(s.clone())),
            TypedValue::Reference(path) => slot.put(Value::String(path.clone())),
            TypedValue::Timestamp(ts) => match slot {
                Slot::Root(out) => *out = self.timestamp_encoder.encode(ts),
                Slot::Field { object, key } => {
                    self.timestamp_encoder.encode_field(object, key, ts)
                }
                Slot::Element(array) => self.timestamp_encoder.encode_element(array, ts),
            },
            TypedValue::GeoPoint(point) => match slot {
                Slot::Root(out) => *out = self.geo_point_encoder.encode(point),
                Slot::Field { object, key } => {
                    self.geo_point_encoder.encode_field(object, key, point)
                }
                Slot::Element(array) => self.geo_point_encoder.encode_element(array, point),
            },
            TypedValue::Bytes(bytes) => match slot {
                Slot::Root(out) => *out = self.bytes_encoder.encode(bytes),
                Slot::Field { object, key } => self.bytes_encoder.encode_field(object, key, bytes),
                Slot::Element(array) => self.bytes_encoder.encode_element(array, bytes),
            },
            TypedValue::Array(values) => match slot {
                // Arrays cannot hold arrays upstream; one that slips through is left out.
                Slot::Element(_) => {
                    debug!("Skipping nested array of {} values", values.len())
                }
                slot => slot.put(Value::Array(self.convert_elements(values))),
            },
            TypedValue::Map(fields) => slot.put(Value::Object(self.convert_fields(fields))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_point::ArrayGeoPointEncoder;
    use crate::timestamp::EpochMillisTimestampEncoder;
    use event_core::{GeoPoint, Timestamp};
    use serde_json::json;

    fn fields<const N: usize>(entries: [(&str, TypedValue); N]) -> FieldMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_scalar_conversion() {
        let converter = JsonConverter::new();
        assert_eq!(converter.convert_value(&TypedValue::Null), Value::Null);
        assert_eq!(converter.convert_value(&TypedValue::Boolean(false)), json!(false));
        assert_eq!(converter.convert_value(&TypedValue::Integer(-7)), json!(-7));
        assert_eq!(converter.convert_value(&TypedValue::Double(2.5)), json!(2.5));
        assert_eq!(converter.convert_value(&TypedValue::string("hi")), json!("hi"));
        assert_eq!(
            converter.convert_value(&TypedValue::reference("projects/p/databases/d/documents/c/1")),
            json!("projects/p/databases/d/documents/c/1")
        );
    }

    #[test]
    fn test_integer_precision() {
        let converter = JsonConverter::new();
        for i in [i64::MAX, i64::MIN, 9_007_199_254_740_993] {
            let value = converter.convert_value(&TypedValue::Integer(i));
            assert_eq!(value.as_i64(), Some(i));
            assert_eq!(serde_json::to_string(&value).unwrap(), i.to_string());
        }
    }

    #[test]
    fn test_double_precision() {
        let converter = JsonConverter::new();
        for d in [0.1, -122.08, f64::MAX, f64::MIN_POSITIVE, 1e-300] {
            let value = converter.convert_value(&TypedValue::Double(d));
            assert_eq!(value.as_f64(), Some(d));
            assert!(value.is_f64());
        }
    }

    #[test]
    fn test_non_finite_double_is_null() {
        let converter = JsonConverter::new();
        assert_eq!(converter.convert_value(&TypedValue::Double(f64::NAN)), Value::Null);
        assert_eq!(
            converter.convert_value(&TypedValue::Double(f64::INFINITY)),
            Value::Null
        );
    }

    #[test]
    fn test_field_order_preserved() {
        let converter = JsonConverter::new();
        let object = converter.convert_fields(&fields([
            ("zulu", TypedValue::Integer(1)),
            ("alpha", TypedValue::Integer(2)),
            ("mike", TypedValue::Null),
            ("bravo", TypedValue::Boolean(true)),
        ]));
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike", "bravo"]);
        assert_eq!(
            serde_json::to_string(&object).unwrap(),
            r#"{"zulu":1,"alpha":2,"mike":null,"bravo":true}"#
        );
    }

    #[test]
    fn test_nested_map_and_array() {
        let converter = JsonConverter::new();
        let object = converter.convert_fields(&fields([(
            "outer",
            TypedValue::map([
                (
                    "list",
                    TypedValue::Array(vec![
                        TypedValue::string("a"),
                        TypedValue::map([("x", TypedValue::Integer(1))]),
                        TypedValue::Null,
                    ]),
                ),
                ("flag", TypedValue::Boolean(true)),
            ]),
        )]));
        assert_eq!(
            Value::Object(object),
            json!({"outer": {"list": ["a", {"x": 1}, null], "flag": true}})
        );
    }

    #[test]
    fn test_nested_array_element_is_dropped() {
        let converter = JsonConverter::new();
        let input = vec![
            TypedValue::Integer(1),
            TypedValue::Array(vec![TypedValue::Integer(2)]),
            TypedValue::string("three"),
            TypedValue::Array(vec![]),
            TypedValue::Boolean(false),
        ];
        let value = converter.convert_value(&TypedValue::Array(input.clone()));
        assert_eq!(value, json!([1, "three", false]));
        assert_eq!(value.as_array().unwrap().len(), input.len() - 2);
    }

    #[test]
    fn test_array_field_is_kept() {
        let converter = JsonConverter::new();
        let object = converter.convert_fields(&fields([("empty", TypedValue::Array(vec![]))]));
        assert_eq!(Value::Object(object), json!({"empty": []}));
    }

    #[test]
    fn test_leaf_types_default_encoders() {
        let converter = JsonConverter::new();
        let object = converter.convert_fields(&fields([
            ("ts", TypedValue::timestamp(1709001600, 0)),
            ("geo", TypedValue::geo_point(37.42, -122.08)),
            ("raw", TypedValue::Bytes(b"hi".to_vec())),
            (
                "list",
                TypedValue::Array(vec![
                    TypedValue::timestamp(1709001600, 0),
                    TypedValue::geo_point(1.0, 2.0),
                ]),
            ),
        ]));
        assert_eq!(
            Value::Object(object),
            json!({
                "ts": "2024-02-27T00:00:00.000Z",
                "geo": {"latitude": 37.42, "longitude": -122.08},
                "raw": "aGk=",
                "list": ["2024-02-27T00:00:00.000Z", {"latitude": 1.0, "longitude": 2.0}],
            })
        );
    }

    #[test]
    fn test_custom_encoders() {
        let converter = JsonConverter::new()
            .with_timestamp_encoder(EpochMillisTimestampEncoder)
            .with_geo_point_encoder(ArrayGeoPointEncoder);
        let object = converter.convert_fields(&fields([
            ("ts", TypedValue::timestamp(1, 500_000_000)),
            ("geo", TypedValue::geo_point(37.42, -122.08)),
        ]));
        assert_eq!(
            Value::Object(object),
            json!({"ts": 1500, "geo": [37.42, -122.08]})
        );
    }

    /// Writes `<key>_seconds` and `<key>_nanos` instead of a single field.
    struct SplitTimestampEncoder;

    impl TimestampEncoder for SplitTimestampEncoder {
        fn encode(&self, timestamp: &Timestamp) -> Value {
            json!([timestamp.seconds, timestamp.nanos])
        }

        fn encode_field(&self, object: &mut JsonObject, key: &str, timestamp: &Timestamp) {
            object.insert(format!("{key}_seconds"), json!(timestamp.seconds));
            object.insert(format!("{key}_nanos"), json!(timestamp.nanos));
        }
    }

    #[test]
    fn test_encoder_field_form_override() {
        let converter = JsonConverter::new().with_timestamp_encoder(SplitTimestampEncoder);
        let object = converter.convert_fields(&fields([
            ("at", TypedValue::timestamp(10, 20)),
            ("list", TypedValue::Array(vec![TypedValue::timestamp(1, 2)])),
        ]));
        assert_eq!(
            Value::Object(object),
            json!({"at_seconds": 10, "at_nanos": 20, "list": [[1, 2]]})
        );
    }

    #[test]
    fn test_top_level_leaf_uses_plain_encode() {
        let converter = JsonConverter::new().with_timestamp_encoder(SplitTimestampEncoder);
        assert_eq!(
            converter.convert_value(&TypedValue::Timestamp(Timestamp::new(3, 4))),
            json!([3, 4])
        );
        assert_eq!(
            JsonConverter::new().convert_value(&TypedValue::GeoPoint(GeoPoint::new(0.5, 1.5))),
            json!({"latitude": 0.5, "longitude": 1.5})
        );
    }

    #[test]
    fn test_append_forms() {
        let converter = JsonConverter::new();
        let mut object = JsonObject::new();
        converter.append_field(&mut object, "n", &TypedValue::Null);
        assert_eq!(Value::Object(object), json!({"n": null}));

        let mut array = Vec::new();
        converter.append_element(&mut array, &TypedValue::Array(vec![]));
        converter.append_element(&mut array, &TypedValue::Integer(5));
        assert_eq!(array, vec![json!(5)]);
    }

    #[test]
    fn test_converter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonConverter>();
    }
}

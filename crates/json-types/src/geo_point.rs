//! Geo-point rendering.

use crate::JsonObject;
use event_core::GeoPoint;
use serde_json::{json, Value};

/// Renders a [`GeoPoint`] as JSON.
///
/// Same shape as [`TimestampEncoder`](crate::TimestampEncoder): implement
/// `encode`, optionally override the field and element forms.
pub trait GeoPointEncoder: Send + Sync {
    fn encode(&self, point: &GeoPoint) -> Value;

    fn encode_field(&self, object: &mut JsonObject, key: &str, point: &GeoPoint) {
        object.insert(key.to_string(), self.encode(point));
    }

    fn encode_element(&self, array: &mut Vec<Value>, point: &GeoPoint) {
        array.push(self.encode(point));
    }
}

/// `{"latitude": …, "longitude": …}`, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectGeoPointEncoder;

impl GeoPointEncoder for ObjectGeoPointEncoder {
    fn encode(&self, point: &GeoPoint) -> Value {
        json!({
            "latitude": point.latitude,
            "longitude": point.longitude,
        })
    }
}

/// `[latitude, longitude]`
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayGeoPointEncoder;

impl GeoPointEncoder for ArrayGeoPointEncoder {
    fn encode(&self, point: &GeoPoint) -> Value {
        json!([point.latitude, point.longitude])
    }
}

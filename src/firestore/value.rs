//! Typed Firestore values as they appear in the REST API's JSON.
//!
//! Every value is an object with exactly one key naming its type, e.g.
//! `{"integerValue": "42"}` or `{"timestampValue": "2023-11-14T22:13:20Z"}`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Document fields keyed by field name.
pub type Fields = BTreeMap<String, Value>;

/// A single Firestore value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Value {
    #[serde(rename = "nullValue")]
    Null(()),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    /// 64-bit integers are sent as decimal strings.
    #[serde(rename = "integerValue")]
    Integer(String),
    #[serde(rename = "doubleValue")]
    Double(f64),
    /// RFC 3339, up to nanosecond precision.
    #[serde(rename = "timestampValue")]
    Timestamp(String),
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "bytesValue")]
    Bytes(String),
    #[serde(rename = "referenceValue")]
    Reference(String),
    #[serde(rename = "geoPointValue")]
    GeoPoint(GeoPoint),
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
    #[serde(rename = "mapValue")]
    Map(MapValue),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: Fields,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view of a numeric value. Doubles are truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(s) => s.parse().ok(),
            Value::Double(d) if d.is_finite() => Some(d.trunc() as i64),
            _ => None,
        }
    }

    /// Parse a timestamp value into a UTC datetime.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }
}

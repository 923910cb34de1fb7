// JSON <-> Firestore typed value encoding.
//
// Firestore's REST API wraps every field in a single-key object naming its
// type: `{"stringValue": "x"}`, `{"integerValue": "3"}` (int64 as string),
// `{"mapValue": {"fields": {..}}}` and so on.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::error::{FirestoreError, FirestoreResult};

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

pub fn encode_timestamp(at: &DateTime<Utc>) -> Value {
    json!({ "timestampValue": at.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

pub fn decode_value(value: &Value) -> FirestoreResult<Value> {
    let obj = value
        .as_object()
        .ok_or_else(|| FirestoreError::decode("typed value is not an object"))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| FirestoreError::decode("typed value is empty"))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| FirestoreError::decode("booleanValue is not a bool")),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| FirestoreError::decode(format!("bad integerValue {inner}")))
        }
        "doubleValue" => Ok(inner.clone()),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|vs| vs.iter().map(decode_value).collect::<FirestoreResult<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = match inner.get("fields").and_then(Value::as_object) {
                Some(f) => decode_fields(f)?,
                None => Map::new(),
            };
            Ok(Value::Object(fields))
        }
        other => Err(FirestoreError::decode(format!("unknown value type {other}"))),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> FirestoreResult<Map<String, Value>> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect()
}

pub fn decode_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value
        .get("timestampValue")
        .and_then(Value::as_str)
        .or_else(|| value.as_str())?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Last path segment of a resource name (`projects/../documents/gallery/abc` -> `abc`).
pub fn document_id(name: &str) -> Option<&str> {
    name.rsplit('/').next().filter(|s| !s.is_empty())
}

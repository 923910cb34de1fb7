use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::{Document, RecordId};
use crate::errors::FolioError;

/// Field every record is sorted by.
pub const ORDER_FIELD: &str = "order";

/// Field the store stamps at creation time.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Fields that belong to the store, never to a record payload.
pub const RESERVED_FIELDS: [&str; 2] = ["id", CREATED_AT_FIELD];

/// A content type persisted in its own collection.
///
/// The serialized form must carry the sort position under
/// [`ORDER_FIELD`]; `id` and `createdAt` are owned by the store.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name in the document backend.
    const COLLECTION: &'static str;

    /// Presentation sort position.
    fn order(&self) -> i64;
}

/// A record together with the metadata the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub record: T,
}

impl<T: Record> Stored<T> {
    pub fn from_document(doc: Document) -> Result<Self> {
        let record: T = serde_json::from_value(Value::Object(doc.fields)).map_err(|e| {
            FolioError::store_unavailable(format!(
                "Malformed {} document {}: {e}",
                T::COLLECTION,
                doc.id
            ))
            .into_anyhow()
        })?;

        Ok(Self {
            id: doc.id,
            created_at: doc.created_at,
            record,
        })
    }
}

/// Serialize a record into backend fields, dropping store-owned keys.
pub fn record_fields<T: Record>(record: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(mut map) => {
            for key in RESERVED_FIELDS {
                map.remove(key);
            }
            Ok(map)
        }
        other => Err(anyhow::anyhow!(
            "{} record must serialize to an object, got {other}",
            T::COLLECTION
        )),
    }
}

/// A partial update: only the named fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    fields: Map<String, Value>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Fields that differ between `before` and `after`.
    ///
    /// A field present before and absent after is cleared with `null`.
    pub fn diff<T: Record>(before: &T, after: &T) -> Result<Self> {
        let before = record_fields(before)?;
        let after = record_fields(after)?;

        let mut fields = Map::new();
        for (k, v) in &after {
            if before.get(k) != Some(v) {
                fields.insert(k.clone(), v.clone());
            }
        }
        for k in before.keys() {
            if !after.contains_key(k) {
                fields.insert(k.clone(), Value::Null);
            }
        }

        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// The writable fields, store-owned keys removed.
    pub fn into_fields(mut self) -> Map<String, Value> {
        for key in RESERVED_FIELDS {
            self.fields.remove(key);
        }
        self.fields
    }
}

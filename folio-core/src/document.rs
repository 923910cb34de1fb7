use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Store-assigned identity of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a new random id (used by backends that assign ids locally).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document as returned by a backend.
///
/// `fields` never contains the identity or the creation stamp; those
/// live in their own slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

/// Payload for a document insert. The backend assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub created_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

/// Client contract of a hosted document database.
///
/// Implementations report a missing document with
/// `FolioError::not_found` so callers can tell it apart from
/// transport failures.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection, ascending by the integer field `order_by`.
    async fn list(&self, collection: &str, order_by: &str) -> Result<Vec<Document>>;

    /// One document by id.
    async fn get(&self, collection: &str, id: &RecordId) -> Result<Document>;

    /// Insert a new document and return it with its assigned id.
    async fn insert(&self, collection: &str, doc: NewDocument) -> Result<Document>;

    /// Merge `fields` into an existing document. Fields not named are left alone.
    async fn patch(&self, collection: &str, id: &RecordId, fields: Map<String, Value>) -> Result<()>;

    /// Remove a document.
    async fn delete(&self, collection: &str, id: &RecordId) -> Result<()>;
}

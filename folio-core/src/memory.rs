use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::document::{Document, DocumentStore, NewDocument, RecordId};
use crate::errors::FolioError;

/// In-process document backend.
///
/// Documents are kept per collection in insertion order, so records
/// sharing an `order` value come back in the order they were created.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(collection: &str, id: &RecordId) -> anyhow::Error {
        FolioError::not_found(format!("{collection}/{id}")).into_anyhow()
    }

    /// Seed a document with a fixed id, replacing any existing one.
    pub async fn put(&self, collection: &str, doc: Document) {
        let mut by_name = self.collections.write().await;
        let docs = by_name.entry(collection.to_string()).or_default();
        docs.retain(|d| d.id != doc.id);
        docs.push(doc);
    }

    /// Number of documents currently held in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        let by_name = self.collections.read().await;
        by_name.get(collection).map(|d| d.len()).unwrap_or(0)
    }
}

fn order_key(doc: &Document, order_by: &str) -> i64 {
    doc.fields
        .get(order_by)
        .and_then(Value::as_i64)
        .unwrap_or(i64::MAX)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str, order_by: &str) -> Result<Vec<Document>> {
        let by_name = self.collections.read().await;
        let mut docs: Vec<Document> = by_name.get(collection).cloned().unwrap_or_default();
        docs.sort_by_key(|d| order_key(d, order_by));
        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &RecordId) -> Result<Document> {
        let by_name = self.collections.read().await;
        by_name
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| &d.id == id))
            .cloned()
            .ok_or_else(|| Self::not_found(collection, id))
    }

    async fn insert(&self, collection: &str, doc: NewDocument) -> Result<Document> {
        let stored = Document {
            id: RecordId::generate(),
            created_at: doc.created_at,
            fields: doc.fields,
        };

        let mut by_name = self.collections.write().await;
        by_name
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    async fn patch(&self, collection: &str, id: &RecordId, fields: Map<String, Value>) -> Result<()> {
        let mut by_name = self.collections.write().await;
        let existing = by_name
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
            .ok_or_else(|| Self::not_found(collection, id))?;

        for (k, v) in fields {
            existing.fields.insert(k, v);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> Result<()> {
        let mut by_name = self.collections.write().await;
        let docs = by_name
            .get_mut(collection)
            .ok_or_else(|| Self::not_found(collection, id))?;

        let before = docs.len();
        docs.retain(|d| &d.id != id);
        if docs.len() == before {
            return Err(Self::not_found(collection, id));
        }
        Ok(())
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::store::{public_url, BlobStore, PutResult};
use crate::{BlobError, BlobResult};

#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// In-process object store serving URLs under a fixed base.
pub struct MemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, MemoryObject>>,
}

impl MemoryBlobStore {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn object(&self, key: &str) -> Option<MemoryObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> BlobResult<PutResult> {
        let size_bytes = body.len() as u64;
        self.objects.write().await.insert(
            key.to_string(),
            MemoryObject {
                content_type: content_type.map(|s| s.to_string()),
                body,
            },
        );
        Ok(PutResult {
            etag: None,
            size_bytes,
        })
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.objects
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::not_found(key))
    }

    fn url_for(&self, key: &str) -> String {
        public_url(&self.base_url, key)
    }
}

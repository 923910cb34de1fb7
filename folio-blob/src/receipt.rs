use serde::{Deserialize, Serialize};

/// Receipt returned after successfully storing an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobReceipt {
    pub key: String,
    pub url: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub filename: String,
    pub etag: Option<String>,
    pub created_at: i64,
}

impl BlobReceipt {
    pub fn new(key: String, url: String, size_bytes: u64) -> Self {
        Self {
            key,
            url,
            size_bytes,
            content_type: "application/octet-stream".to_string(),
            filename: String::new(),
            etag: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_content_type(mut self, content_type: String) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_filename(mut self, filename: String) -> Self {
        self.filename = filename;
        self
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }
}

/// What `delete_by_url` ended up doing. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Externally hosted asset; storage was not touched.
    NotOwned,
    Deleted,
    /// Deletion was attempted and failed; the blob may be orphaned.
    Failed,
}

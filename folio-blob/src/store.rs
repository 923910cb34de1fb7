use async_trait::async_trait;
use bytes::Bytes;

use crate::BlobResult;

/// Core object storage operations - must be implemented by all storage backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store an object under `key`
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> BlobResult<PutResult>;

    /// Delete an object
    async fn delete(&self, key: &str) -> BlobResult<()>;

    /// Publicly fetchable URL for a stored key
    fn url_for(&self, key: &str) -> String;
}

/// Result of a successful put operation
#[derive(Debug, Clone)]
pub struct PutResult {
    pub etag: Option<String>,
    pub size_bytes: u64,
}

/// Public URL for `key` under `base`, each path segment percent-encoded.
pub fn public_url(base: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", base.trim_end_matches('/'), encoded.join("/"))
}

/// Strategy for generating object keys
pub trait BlobKeyStrategy: Send + Sync {
    /// Key for a new upload of `filename` under `prefix` at `unix_millis`
    fn object_key(&self, prefix: &str, filename: &str, unix_millis: i64) -> String;
}

/// Default key strategy: `{prefix}/{unixMillis}_{filename}`
///
/// Two uploads of the same filename within one millisecond share a key.
#[derive(Debug, Clone, Default)]
pub struct TimestampKeyStrategy;

impl BlobKeyStrategy for TimestampKeyStrategy {
    fn object_key(&self, prefix: &str, filename: &str, unix_millis: i64) -> String {
        // a slash in the filename would escape the type namespace
        let filename = filename.replace(['/', '\\'], "_");
        format!("{}/{}_{}", prefix.trim_matches('/'), unix_millis, filename)
    }
}

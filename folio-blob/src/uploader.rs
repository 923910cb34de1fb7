use std::sync::Arc;

use url::Url;

use crate::receipt::CleanupOutcome;
use crate::{
    BlobConfig, BlobError, BlobKeyStrategy, BlobReceipt, BlobResult, BlobStore, BlobUpload,
    TimestampKeyStrategy,
};

/// Uploads assets for one content type under its key prefix.
///
/// This is what the console embeds per content type:
/// `gallery`, `contractors` and `partners` each get their own uploader
/// sharing one store.
pub struct BlobUploader {
    store: Arc<dyn BlobStore>,
    keys: Arc<dyn BlobKeyStrategy>,
    prefix: String,
    config: BlobConfig,
}

impl BlobUploader {
    pub fn new<S: Into<String>>(store: Arc<dyn BlobStore>, prefix: S, config: BlobConfig) -> Self {
        Self {
            store,
            keys: Arc::new(TimestampKeyStrategy),
            prefix: prefix.into(),
            config,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// Store an asset under `{prefix}/{unixMillis}_{filename}` and return its receipt.
    ///
    /// Every failure comes back as [`BlobError::UploadFailed`].
    pub async fn upload(&self, upload: BlobUpload) -> BlobResult<BlobReceipt> {
        if upload.filename.trim().is_empty() {
            return Err(BlobError::upload_failed("Asset has no filename"));
        }
        if upload.size_bytes() > self.config.max_blob_bytes {
            return Err(BlobError::upload_failed(format!(
                "Asset size {} exceeds maximum {}",
                upload.size_bytes(),
                self.config.max_blob_bytes
            )));
        }

        let content_type = upload.resolved_content_type();
        if let Some(accept) = &self.config.accept {
            if !content_type.starts_with(accept.as_str()) {
                return Err(BlobError::upload_failed(format!(
                    "Content type {content_type} is not accepted"
                )));
            }
        }

        let now = chrono::Utc::now().timestamp_millis();
        let key = self.keys.object_key(&self.prefix, &upload.filename, now);

        let result = self
            .store
            .put(&key, Some(&content_type), upload.bytes)
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "asset upload failed");
                BlobError::upload_failed(e.to_string())
            })?;

        let url = self.store.url_for(&key);
        tracing::debug!(key = %key, size = result.size_bytes, "asset uploaded");

        Ok(BlobReceipt::new(key, url, result.size_bytes)
            .with_content_type(content_type)
            .with_filename(upload.filename)
            .with_etag(result.etag))
    }

    /// Whether `url` points at the managed storage domain.
    pub fn owns(&self, url: &str) -> bool {
        let (Ok(candidate), Ok(base)) = (Url::parse(url), Url::parse(&self.config.public_base_url))
        else {
            return false;
        };
        candidate.host_str().is_some() && candidate.host_str() == base.host_str()
    }

    /// Object key of an owned URL, if it lies under the managed base path.
    pub fn key_for_url(&self, url: &str) -> Option<String> {
        if !self.owns(url) {
            return None;
        }
        let candidate = Url::parse(url).ok()?;
        let base = Url::parse(&self.config.public_base_url).ok()?;

        let base_path = base.path().trim_end_matches('/');
        let rest = candidate.path().strip_prefix(base_path)?;
        if !rest.starts_with('/') {
            return None;
        }
        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            return None;
        }
        urlencoding::decode(rest).ok().map(|k| k.into_owned())
    }

    /// Best-effort deletion of an owned asset.
    ///
    /// External URLs never reach the store. Failures are logged and
    /// reported as [`CleanupOutcome::Failed`]; this never errors.
    pub async fn delete_by_url(&self, url: &str) -> CleanupOutcome {
        if url.trim().is_empty() || !self.owns(url) {
            tracing::debug!(url = %url, "asset not owned, skipping cleanup");
            return CleanupOutcome::NotOwned;
        }

        let Some(key) = self.key_for_url(url) else {
            tracing::warn!(url = %url, "owned asset url has no object key, leaving blob in place");
            return CleanupOutcome::Failed;
        };

        match self.store.delete(&key).await {
            Ok(()) => {
                tracing::debug!(key = %key, "asset deleted");
                CleanupOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "asset cleanup failed");
                CleanupOutcome::Failed
            }
        }
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use folio_blob::prelude::*;
use folio_blob::PutResult;

const BASE: &str = "https://storage.folio.test/site";

/// Records every call and fails on demand.
#[derive(Default)]
struct SpyStore {
    puts: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    fail_puts: bool,
    fail_deletes: bool,
}

#[async_trait]
impl BlobStore for SpyStore {
    async fn put(&self, _key: &str, _ct: Option<&str>, body: Bytes) -> BlobResult<PutResult> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts {
            return Err(BlobError::backend(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset by peer",
            )));
        }
        Ok(PutResult {
            etag: Some("\"abc\"".to_string()),
            size_bytes: body.len() as u64,
        })
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        if self.fail_deletes {
            return Err(BlobError::backend(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )));
        }
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        folio_blob::store::public_url(BASE, key)
    }
}

fn uploader(store: Arc<SpyStore>) -> BlobUploader {
    BlobUploader::new(store, "gallery", BlobConfig::new().with_public_base_url(BASE))
}

#[tokio::test]
async fn upload_uses_prefixed_timestamp_key() {
    let store = Arc::new(SpyStore::default());
    let up = uploader(store.clone());

    let receipt = up
        .upload(BlobUpload::new(vec![1u8, 2, 3], "kitchen.jpg"))
        .await
        .unwrap();

    let (prefix, rest) = receipt.key.split_once('/').unwrap();
    let (millis, name) = rest.split_once('_').unwrap();
    assert_eq!(prefix, "gallery");
    assert!(millis.parse::<i64>().unwrap() > 0);
    assert_eq!(name, "kitchen.jpg");
    assert_eq!(receipt.url, format!("{BASE}/{}", receipt.key));
    assert_eq!(receipt.content_type, "image/jpeg");
    assert_eq!(receipt.size_bytes, 3);
    assert_eq!(store.puts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn transport_failure_is_upload_failed() {
    let store = Arc::new(SpyStore {
        fail_puts: true,
        ..Default::default()
    });
    let err = uploader(store)
        .upload(BlobUpload::new(vec![1u8], "a.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, BlobError::UploadFailed { .. }));
}

#[tokio::test]
async fn oversized_and_rejected_types_never_reach_the_store() {
    let store = Arc::new(SpyStore::default());
    let up = BlobUploader::new(
        store.clone(),
        "partners",
        BlobConfig::new()
            .with_public_base_url(BASE)
            .with_max_blob_bytes(2)
            .accepting("image/"),
    );

    let err = up.upload(BlobUpload::new(vec![0u8; 3], "big.png")).await.unwrap_err();
    assert!(matches!(err, BlobError::UploadFailed { .. }));

    let err = up.upload(BlobUpload::new(vec![0u8], "notes.txt")).await.unwrap_err();
    assert!(matches!(err, BlobError::UploadFailed { .. }));

    assert_eq!(store.puts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn external_urls_are_never_deleted() {
    let store = Arc::new(SpyStore::default());
    let up = uploader(store.clone());

    let outcome = up.delete_by_url("https://images.unsplash.com/photo-1.jpg").await;
    assert_eq!(outcome, CleanupOutcome::NotOwned);
    assert_eq!(up.delete_by_url("").await, CleanupOutcome::NotOwned);
    assert_eq!(up.delete_by_url("not a url").await, CleanupOutcome::NotOwned);
    assert!(store.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn owned_url_is_deleted_once_by_decoded_key() {
    let store = Arc::new(SpyStore::default());
    let up = uploader(store.clone());

    let outcome = up
        .delete_by_url(&format!("{BASE}/gallery/17_my%20deck.jpg"))
        .await;

    assert_eq!(outcome, CleanupOutcome::Deleted);
    assert_eq!(*store.deleted.lock().unwrap(), vec!["gallery/17_my deck.jpg".to_string()]);
}

#[tokio::test]
async fn cleanup_failure_is_swallowed() {
    let store = Arc::new(SpyStore {
        fail_deletes: true,
        ..Default::default()
    });
    let up = uploader(store.clone());

    let outcome = up.delete_by_url(&format!("{BASE}/gallery/1_a.jpg")).await;
    assert_eq!(outcome, CleanupOutcome::Failed);
    assert_eq!(store.deleted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn memory_store_round_trip() {
    let store = Arc::new(MemoryBlobStore::new(BASE));
    let up = BlobUploader::new(store.clone(), "contractors", BlobConfig::new().with_public_base_url(BASE));

    let receipt = up.upload(BlobUpload::new(vec![9u8; 8], "jo.png")).await.unwrap();
    assert_eq!(store.keys().await, vec![receipt.key.clone()]);

    assert_eq!(up.delete_by_url(&receipt.url).await, CleanupOutcome::Deleted);
    assert!(store.object(&receipt.key).await.is_none());
}

#[test]
fn key_for_url_requires_base_path() {
    let up = uploader(Arc::new(SpyStore::default()));
    assert_eq!(
        up.key_for_url(&format!("{BASE}/partners/1_x.png")).as_deref(),
        Some("partners/1_x.png")
    );
    assert_eq!(up.key_for_url("https://storage.folio.test/other/1_x.png"), None);
    assert_eq!(up.key_for_url("https://storage.folio.test/site2/1_x.png"), None);
}

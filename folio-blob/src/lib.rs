//! # folio-blob: asset storage for Folio content types
//!
//! Each content type with an image field embeds a [`BlobUploader`]
//! namespaced by a key prefix (`gallery`, `contractors`, `partners`).
//! Uploads land under `{prefix}/{unixMillis}_{filename}` and come back
//! as a public URL; deletion is best-effort and only ever touches URLs
//! on the managed storage domain.
//!
//! ```text
//! ┌─────────────────┐
//! │  Editor / Screen│  ← content logic
//! ├─────────────────┤
//! │  BlobUploader   │  ← keys, size guard, ownership
//! ├─────────────────┤
//! │  BlobStore      │  ← storage primitives (memory, S3)
//! └─────────────────┘
//! ```
//!
//! ```rust
//! use std::sync::Arc;
//! use folio_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let config = BlobConfig::new().with_public_base_url("https://cdn.example.com/site");
//! let store = Arc::new(MemoryBlobStore::new(config.public_base_url.clone()));
//! let uploader = BlobUploader::new(store, "gallery", config);
//!
//! let receipt = uploader.upload(BlobUpload::new(vec![0u8; 4], "deck.jpg")).await?;
//! assert!(uploader.owns(&receipt.url));
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod memory;
mod receipt;
mod s3_store;
pub mod store;
mod types;
mod uploader;

pub use config::{BlobConfig, DEFAULT_PUBLIC_BASE_URL};
pub use error::{BlobError, BlobResult};
pub use memory::{MemoryBlobStore, MemoryObject};
pub use receipt::{BlobReceipt, CleanupOutcome};
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{BlobKeyStrategy, BlobStore, PutResult, TimestampKeyStrategy};
pub use types::{content_type_for, BlobUpload};
pub use uploader::BlobUploader;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobConfig, BlobError, BlobReceipt, BlobResult, BlobStore, BlobUpload, BlobUploader,
        CleanupOutcome, MemoryBlobStore,
    };
}

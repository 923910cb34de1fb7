use std::sync::Arc;

use anyhow::{bail, Result};
use folio_auth::{
    AllowList, AuthContext, AuthProvider, DocumentAllowList, IdentityToolkitProvider,
    MemoryAuthProvider, DEFAULT_IDENTITY_BASE_URL,
};
use folio_blob::{
    BlobConfig, BlobStore, BlobUploader, MemoryBlobStore, S3CompatibleStore, S3Config,
    DEFAULT_PUBLIC_BASE_URL,
};
use folio_core::{DocumentStore, FolioConfigSnapshot, MemoryDocumentStore, Record};
use folio_firestore::{FirestoreConfig, FirestoreStore};

use crate::console::{AdminConsole, ConsoleParts};
use crate::content::{Contractor, GalleryItem, Partner};
use crate::notify::Notifier;

const DEFAULT_BUCKET: &str = "folio";

/// The external collaborators a console runs against.
pub struct Backends {
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub auth: Arc<dyn AuthProvider>,
}

pub async fn backends(config: &FolioConfigSnapshot) -> Result<Backends> {
    let identity = config.get_string("auth.api_key").map(|key| {
        Arc::new(
            IdentityToolkitProvider::new(key)
                .with_base_url(config.get_or("auth.identity_base_url", DEFAULT_IDENTITY_BASE_URL)),
        )
    });

    let documents: Arc<dyn DocumentStore> = match config.get_or("store.backend", "memory").as_str() {
        "memory" => Arc::new(MemoryDocumentStore::new()),
        "firestore" => {
            let mut store = FirestoreStore::new(FirestoreConfig::from_snapshot(config)?);
            // requests run as the signed-in user once there is one
            if let Some(provider) = &identity {
                let provider = Arc::clone(provider);
                store = store.with_token_source(Arc::new(move || provider.id_token()));
            }
            Arc::new(store)
        }
        other => bail!("unknown store.backend '{other}' (expected memory or firestore)"),
    };

    let public_base_url = blob_config(config).public_base_url;
    let blobs: Arc<dyn BlobStore> = match config.get_or("storage.backend", "memory").as_str() {
        "memory" => Arc::new(MemoryBlobStore::new(public_base_url)),
        "s3" => {
            let bucket = config.get_or("storage.bucket", DEFAULT_BUCKET);
            let s3 = S3Config::from_lookup(&bucket, &public_base_url, |k| config.get_string(k))?;
            Arc::new(S3CompatibleStore::connect(s3).await)
        }
        other => bail!("unknown storage.backend '{other}' (expected memory or s3)"),
    };

    let auth: Arc<dyn AuthProvider> = match identity {
        Some(provider) => provider as Arc<dyn AuthProvider>,
        None => {
            let provider = MemoryAuthProvider::new();
            if let (Some(email), Some(password)) =
                (config.get("auth.email"), config.get("auth.password"))
            {
                provider.add_account(email, password).await;
            }
            Arc::new(provider)
        }
    };

    Ok(Backends {
        documents,
        blobs,
        auth,
    })
}

pub fn blob_config(config: &FolioConfigSnapshot) -> BlobConfig {
    let mut blob = BlobConfig::new()
        .with_public_base_url(config.get_or("storage.public_base_url", DEFAULT_PUBLIC_BASE_URL))
        .accepting("image/");
    if let Some(max) = config.get_u64("storage.max_blob_bytes") {
        blob = blob.with_max_blob_bytes(max);
    }
    blob
}

/// Static `auth.admin_emails`, plus `settings/adminWhitelist` unless
/// `auth.remote_allow_list` is false.
pub fn allow_list(config: &FolioConfigSnapshot, documents: Arc<dyn DocumentStore>) -> AllowList {
    let list = AllowList::new(config.get_list("auth.admin_emails"));
    let remote = config.get_bool("auth.remote_allow_list").unwrap_or(true);
    tracing::info!(static_admins = list.static_len(), remote, "admin allow-list configured");
    if remote {
        list.with_remote(Arc::new(DocumentAllowList::new(documents)))
    } else {
        list
    }
}

/// Wire a console over `backends`. Must run inside a tokio runtime.
pub fn assemble(
    backends: Backends,
    config: &FolioConfigSnapshot,
    notifier: Arc<dyn Notifier>,
) -> AdminConsole {
    let blob = blob_config(config);
    let uploader = |prefix: &str| {
        Arc::new(BlobUploader::new(
            Arc::clone(&backends.blobs),
            prefix,
            blob.clone(),
        ))
    };

    let auth = AuthContext::initialize(
        backends.auth,
        allow_list(config, Arc::clone(&backends.documents)),
    );

    AdminConsole::new(ConsoleParts {
        gallery_assets: uploader(GalleryItem::COLLECTION),
        contractor_assets: uploader(Contractor::COLLECTION),
        partner_assets: uploader(Partner::COLLECTION),
        documents: backends.documents,
        auth,
        notifier,
    })
}

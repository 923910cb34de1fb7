/// Default public base URL of the managed bucket.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://storage.folio.local/folio";

/// Configuration for asset uploads
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Absolute max size allowed for a single asset (safety guard)
    pub max_blob_bytes: u64,

    /// Public base URL of the managed storage. URLs on this host are owned
    /// by the system and may be deleted; anything else is external.
    pub public_base_url: String,

    /// Accepted content-type prefix for uploads (`None` accepts anything)
    pub accept: Option<String>,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: 10 * 1024 * 1024, // 10MB
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            accept: None,
        }
    }
}

impl BlobConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max blob size
    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }

    /// Set the managed storage base URL
    pub fn with_public_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.public_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Only accept content types starting with `prefix` (e.g. `image/`)
    pub fn accepting<S: Into<String>>(mut self, prefix: S) -> Self {
        self.accept = Some(prefix.into());
        self
    }
}

use bytes::Bytes;

/// An asset picked by the user, held in memory until the record is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobUpload {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: Option<String>,
}

impl BlobUpload {
    pub fn new<B: Into<Bytes>, S: Into<String>>(bytes: B, filename: S) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            content_type: None,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Explicit content type, else one inferred from the file extension.
    pub fn resolved_content_type(&self) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| content_type_for(&self.filename).to_string())
    }
}

/// Content type for a filename, by extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

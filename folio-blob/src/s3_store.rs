use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{primitives::ByteStream as AwsByteStream, Client};
use bytes::Bytes;

use crate::store::{public_url, BlobStore, PutResult};
use crate::{BlobError, BlobResult};

/// Connection settings for an S3-compatible bucket
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Custom endpoint (MinIO, RustFS, R2...); `None` uses AWS
    pub endpoint_url: Option<String>,
    /// Base URL objects are publicly served from
    pub public_base_url: String,
}

impl S3Config {
    /// Required keys are `s3.region`, `s3.access_key_id` and `s3.secret_access_key`.
    pub fn from_lookup<F>(bucket: &str, public_base_url: &str, get: F) -> BlobResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            get(key).ok_or_else(|| BlobError::invalid(format!("{key} is required for s3 storage")))
        };

        Ok(Self {
            bucket: bucket.to_string(),
            region: require("s3.region")?,
            access_key_id: require("s3.access_key_id")?,
            secret_access_key: require("s3.secret_access_key")?,
            endpoint_url: get("s3.endpoint_url"),
            public_base_url: public_base_url.to_string(),
        })
    }
}

/// S3-compatible object store using the AWS SDK
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3CompatibleStore {
    pub async fn connect(config: S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "folio",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials);
        let path_style = config.endpoint_url.is_some();
        if let Some(endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let aws_config = loader.load().await;

        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                // custom endpoints rarely support virtual-hosted buckets
                .force_path_style(path_style)
                .build(),
        );

        Self {
            client,
            bucket: config.bucket,
            public_base_url: config.public_base_url,
        }
    }
}

#[async_trait]
impl BlobStore for S3CompatibleStore {
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> BlobResult<PutResult> {
        let size_bytes = body.len() as u64;
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(AwsByteStream::from(body.to_vec()));
        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        let output = request.send().await.map_err(BlobError::backend)?;
        Ok(PutResult {
            etag: output.e_tag().map(|s| s.to_string()),
            size_bytes,
        })
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(BlobError::backend)?;
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        public_url(&self.public_base_url, key)
    }
}

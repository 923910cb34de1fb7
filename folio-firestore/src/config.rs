use folio_core::FolioConfigSnapshot;

use crate::error::{FirestoreError, FirestoreResult};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_DATABASE: &str = "(default)";
pub const DEFAULT_PAGE_SIZE: u32 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub page_size: u32,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Read the `firestore.*` keys.
    pub fn from_snapshot(config: &FolioConfigSnapshot) -> FirestoreResult<Self> {
        let project_id = config
            .get_string("firestore.project_id")
            .ok_or(FirestoreError::MissingConfig("firestore.project_id"))?;

        let mut cfg = Self::new(project_id)
            .with_database(config.get_or("firestore.database", DEFAULT_DATABASE))
            .with_base_url(config.get_or("firestore.base_url", DEFAULT_BASE_URL));
        cfg.bearer_token = config.get_string("firestore.bearer_token");
        Ok(cfg)
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// `{base}/projects/{project}/databases/{database}/documents`
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database
        )
    }
}

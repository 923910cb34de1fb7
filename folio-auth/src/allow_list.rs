// Admin allow-list.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{DocumentStore, ErrorKind, FolioError, RecordId};
use serde_json::Value;

use crate::identity::{normalize_email, Identity};

pub const SETTINGS_COLLECTION: &str = "settings";
pub const ALLOW_LIST_DOCUMENT: &str = "adminWhitelist";
pub const ALLOW_LIST_FIELD: &str = "emails";

/// Outcome of checking an identity against the allow-list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminStatus {
    Allowed,
    Denied,
    /// The remote list could not be read. Treated as not-admin.
    Unverified { reason: String },
}

impl AdminStatus {
    pub fn is_admin(&self) -> bool {
        matches!(self, AdminStatus::Allowed)
    }
}

/// Source of remotely managed admin emails.
#[async_trait]
pub trait AllowListSource: Send + Sync {
    async fn emails(&self) -> anyhow::Result<Vec<String>>;
}

/// Reads `settings/adminWhitelist.emails` from the document store.
pub struct DocumentAllowList {
    store: Arc<dyn DocumentStore>,
}

impl DocumentAllowList {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AllowListSource for DocumentAllowList {
    async fn emails(&self) -> anyhow::Result<Vec<String>> {
        let id = RecordId::from(ALLOW_LIST_DOCUMENT);
        let doc = match self.store.get(SETTINGS_COLLECTION, &id).await {
            Ok(doc) => doc,
            Err(err) if FolioError::kind_of(&err) == Some(ErrorKind::NotFound) => {
                return Ok(Vec::new())
            }
            Err(err) => return Err(err),
        };

        let emails = match doc.fields.get(ALLOW_LIST_FIELD) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        Ok(emails)
    }
}

/// Static emails from configuration plus an optional remote list.
#[derive(Clone, Default)]
pub struct AllowList {
    static_emails: HashSet<String>,
    remote: Option<Arc<dyn AllowListSource>>,
}

impl AllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let static_emails = emails
            .into_iter()
            .map(|e| normalize_email(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            static_emails,
            remote: None,
        }
    }

    pub fn with_remote(mut self, source: Arc<dyn AllowListSource>) -> Self {
        self.remote = Some(source);
        self
    }

    pub fn static_len(&self) -> usize {
        self.static_emails.len()
    }

    /// Static list first, then the remote list. Any failure fails closed.
    pub async fn check(&self, identity: &Identity) -> AdminStatus {
        let Some(email) = identity.normalized_email() else {
            return AdminStatus::Denied;
        };

        if self.static_emails.contains(&email) {
            return AdminStatus::Allowed;
        }

        let Some(remote) = &self.remote else {
            return AdminStatus::Denied;
        };

        match remote.emails().await {
            Ok(list) => {
                if list.iter().any(|e| normalize_email(e) == email) {
                    AdminStatus::Allowed
                } else {
                    AdminStatus::Denied
                }
            }
            Err(err) => {
                tracing::warn!(email = %email, error = %err, "admin allow-list unavailable");
                AdminStatus::Unverified {
                    reason: err.to_string(),
                }
            }
        }
    }
}

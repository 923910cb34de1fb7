// Authentication providers.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};

use crate::error::AuthError;
use crate::identity::{normalize_email, Identity};

/// Client contract of the hosted authentication service.
///
/// The provider owns the session; Folio only observes who is signed in.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Stream of the current identity (`None` when signed out).
    fn identity_changes(&self) -> watch::Receiver<Option<Identity>>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// In-process provider with a fixed set of accounts.
pub struct MemoryAuthProvider {
    accounts: RwLock<HashMap<String, (String, Identity)>>,
    current: watch::Sender<Option<Identity>>,
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            current,
        }
    }

    pub async fn add_account(&self, email: &str, password: &str) -> Identity {
        let email = normalize_email(email);
        let identity = Identity::new(format!("uid-{email}"), email.clone());
        self.accounts
            .write()
            .await
            .insert(email, (password.to_string(), identity.clone()));
        identity
    }

    /// Replace the current identity as if the provider's session changed on its own.
    pub fn set_identity(&self, identity: Option<Identity>) {
        self.current.send_replace(identity);
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    fn identity_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let accounts = self.accounts.read().await;
        let (expected, identity) = accounts
            .get(&normalize_email(email))
            .ok_or(AuthError::InvalidCredentials)?;
        if expected != password {
            return Err(AuthError::InvalidCredentials);
        }

        self.current.send_replace(Some(identity.clone()));
        Ok(identity.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.current.send_replace(None);
        Ok(())
    }
}

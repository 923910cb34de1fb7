// Admin session context.

use std::sync::{Arc, Mutex};

use folio_core::{FolioError, FolioResult};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::allow_list::{AdminStatus, AllowList};
use crate::error::AuthError;
use crate::identity::Identity;
use crate::provider::AuthProvider;

/// Snapshot of who is signed in and whether they may administer the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<Identity>,
    pub admin: AdminStatus,
    /// True until the first identity report has been resolved.
    pub loading: bool,
}

impl AuthState {
    fn initial() -> Self {
        Self {
            user: None,
            admin: AdminStatus::Denied,
            loading: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_some() && self.admin.is_admin()
    }

    pub fn gate(&self) -> AuthGate {
        if self.loading {
            AuthGate::Pending
        } else if self.is_admin() {
            AuthGate::Granted
        } else {
            AuthGate::RedirectToLogin
        }
    }
}

/// What an admin screen should do for the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthGate {
    Pending,
    Granted,
    RedirectToLogin,
}

/// Session object shared by every admin screen.
///
/// Created once per session with [`AuthContext::initialize`]; a background
/// task follows the provider's identity stream and re-checks the allow-list
/// on every change. Call [`AuthContext::teardown`] when the session ends.
pub struct AuthContext {
    provider: Arc<dyn AuthProvider>,
    allow_list: AllowList,
    state: Arc<watch::Sender<AuthState>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthContext {
    pub fn initialize(provider: Arc<dyn AuthProvider>, allow_list: AllowList) -> Arc<Self> {
        let (tx, _) = watch::channel(AuthState::initial());
        let state = Arc::new(tx);

        let mut identities = provider.identity_changes();
        let task_state = Arc::clone(&state);
        let task_list = allow_list.clone();
        let listener = tokio::spawn(async move {
            loop {
                let identity = identities.borrow_and_update().clone();
                let resolved = resolve(&task_list, identity.clone()).await;

                // a newer identity arrived while checking; resolve that one instead
                if *identities.borrow() == identity {
                    task_state.send_replace(resolved);
                }

                if identities.changed().await.is_err() {
                    break;
                }
            }
            tracing::debug!("identity stream closed");
        });

        Arc::new(Self {
            provider,
            allow_list,
            state,
            listener: Mutex::new(Some(listener)),
        })
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Wait for the first identity report to be resolved.
    pub async fn ready(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(|s| !s.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }

    /// Sign in and resolve admin status before returning.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthState, AuthError> {
        let identity = self.provider.sign_in_with_password(email, password).await?;
        let resolved = resolve(&self.allow_list, Some(identity)).await;
        tracing::debug!(admin = resolved.is_admin(), "signed in");
        self.state.send_replace(resolved.clone());
        Ok(resolved)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        self.state.send_replace(AuthState {
            user: None,
            admin: AdminStatus::Denied,
            loading: false,
        });
        tracing::debug!("signed out");
        Ok(())
    }

    /// The signed-in admin, or `NotAuthenticated` / `Forbidden`.
    pub fn require_admin(&self) -> FolioResult<Identity> {
        let state = self.state();
        match state.user {
            None => Err(FolioError::not_authenticated("Sign in required").into_anyhow()),
            Some(_) if !state.admin.is_admin() => {
                Err(FolioError::forbidden("Access denied").into_anyhow())
            }
            Some(user) => Ok(user),
        }
    }

    /// Stop following identity changes.
    pub fn teardown(&self) {
        if let Ok(mut slot) = self.listener.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for AuthContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn resolve(allow_list: &AllowList, identity: Option<Identity>) -> AuthState {
    let admin = match &identity {
        Some(who) => allow_list.check(who).await,
        None => AdminStatus::Denied,
    };
    AuthState {
        user: identity,
        admin,
        loading: false,
    }
}

// Hosted identity REST provider (password sign-in).

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;

use crate::error::AuthError;
use crate::identity::Identity;
use crate::provider::AuthProvider;

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Error codes the identity service uses for bad credentials.
const CREDENTIAL_ERRORS: [&str; 5] = [
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_EMAIL",
    "USER_DISABLED",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct IdentityToolkitProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    id_token: Mutex<Option<String>>,
    current: watch::Sender<Option<Identity>>,
}

impl IdentityToolkitProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            api_key: api_key.into(),
            id_token: Mutex::new(None),
            current,
        }
    }

    /// Point at an emulator or proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Token of the current session, for use as a bearer credential.
    pub fn id_token(&self) -> Option<String> {
        self.id_token.lock().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.id_token.lock() {
            *slot = token;
        }
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitProvider {
    fn identity_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let url = format!("{}/accounts:signInWithPassword", self.base_url);
        let res = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let code = res
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            // codes may carry a suffix: "INVALID_PASSWORD : ..."
            let head = code.split(':').next().unwrap_or("").trim();
            if CREDENTIAL_ERRORS.contains(&head) {
                return Err(AuthError::InvalidCredentials);
            }
            tracing::error!(status = %status, code = %code, "password sign-in rejected");
            return Err(AuthError::Provider(code));
        }

        let body: SignInResponse = res.json().await?;
        let identity = Identity {
            uid: body.local_id,
            email: body.email,
            display_name: body.display_name,
        };

        self.set_token(Some(body.id_token));
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_token(None);
        self.current.send_replace(None);
        Ok(())
    }
}

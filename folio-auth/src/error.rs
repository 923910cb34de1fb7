use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Sign-in failed: {0}")]
    Provider(String),

    #[error("Identity service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

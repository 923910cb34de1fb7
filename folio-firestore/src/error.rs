use thiserror::Error;

#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("firestore returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("firestore request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed firestore payload: {0}")]
    Decode(String),
}

impl FirestoreError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

pub type FirestoreResult<T> = Result<T, FirestoreError>;

//! # Errors
//!
//! Folio carries one structured error through every layer.
//! Core goals:
//! - one closed taxonomy the console can map to notifications
//! - can be carried through anyhow::Error (backends return `anyhow::Result`)
//! - keeps the underlying transport error as `source` for logging
//!
//! Leaf crates that wrap a transport (blob storage, Firestore, identity)
//! keep their own `thiserror` enums and convert at the boundary.

use std::fmt;

use anyhow::Error as AnyError;

/// A convenience result type for Folio core APIs.
pub type FolioResult<T> = std::result::Result<T, AnyError>;

/// Error classes surfaced by the content layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing required field or asset. Local, never reaches a backend.
    Validation,
    /// Asset transport or storage failure.
    UploadFailed,
    /// Record create/update failure.
    SaveFailed,
    /// Backing collection could not be reached.
    StoreUnavailable,
    NotFound,
    /// Best-effort blob deletion failed. Logged, never surfaced.
    CleanupFailed,
    NotAuthenticated,
    Forbidden,
    /// An editor transition was attempted from the wrong state.
    InvalidState,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::UploadFailed => "UploadFailed",
            ErrorKind::SaveFailed => "SaveFailed",
            ErrorKind::StoreUnavailable => "StoreUnavailable",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::CleanupFailed => "CleanupFailed",
            ErrorKind::NotAuthenticated => "NotAuthenticated",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::InvalidState => "InvalidState",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::UploadFailed => "upload-failed",
            ErrorKind::SaveFailed => "save-failed",
            ErrorKind::StoreUnavailable => "store-unavailable",
            ErrorKind::NotFound => "not-found",
            ErrorKind::CleanupFailed => "cleanup-failed",
            ErrorKind::NotAuthenticated => "not-authenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::InvalidState => "invalid-state",
        }
    }

    /// Whether a user can reasonably retry the operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::UploadFailed | ErrorKind::SaveFailed | ErrorKind::StoreUnavailable
        )
    }
}

/// A structured Folio error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct FolioError {
    pub kind: ErrorKind,
    pub message: String,
    pub source: Option<AnyError>,
}

impl FolioError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Downcast an `anyhow::Error` to a `FolioError` if possible.
    pub fn from_anyhow(err: &AnyError) -> Option<&FolioError> {
        err.downcast_ref::<FolioError>()
    }

    /// The kind of an `anyhow::Error`, if it carries a `FolioError`.
    pub fn kind_of(err: &AnyError) -> Option<ErrorKind> {
        Self::from_anyhow(err).map(|e| e.kind)
    }

    /// Turn any error into a FolioError:
    /// - if it's already a FolioError, keep it (lossless)
    /// - otherwise wrap it with the given fallback kind
    pub fn normalize(err: AnyError, fallback: ErrorKind) -> FolioError {
        match err.downcast::<FolioError>() {
            Ok(folio) => folio,
            Err(other) => FolioError::new(fallback, other.to_string()).with_source(other),
        }
    }

    /// Re-classify a backend error, keeping `NotFound` intact.
    pub fn reclassify(err: AnyError, kind: ErrorKind, message: impl Into<String>) -> AnyError {
        if Self::kind_of(&err) == Some(ErrorKind::NotFound) {
            return err;
        }
        FolioError::new(kind, message).with_source(err).into_anyhow()
    }

    // ---- Constructors ----

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, msg)
    }
    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::UploadFailed, msg)
    }
    pub fn save_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::SaveFailed, msg)
    }
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn cleanup_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::CleanupFailed, msg)
    }
    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthenticated, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, msg)
    }
}

impl fmt::Display for FolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.message)
    }
}

impl std::error::Error for FolioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Convenience helper for "bail with FolioError".
#[macro_export]
macro_rules! bail_folio {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::FolioError::$ctor($msg).into_anyhow());
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::FolioError::$ctor(format!($fmt, $($arg)*)).into_anyhow());
    };
}

//! folio-auth: who may use the admin console.
//!
//! An [`AuthProvider`] reports the signed-in [`Identity`]; the
//! [`AllowList`] decides whether that identity is an admin; the
//! [`AuthContext`] ties both together for the lifetime of a session.

pub mod allow_list;
pub mod context;
pub mod error;
pub mod identity;
pub mod identity_toolkit;
pub mod provider;

pub use allow_list::{
    AdminStatus, AllowList, AllowListSource, DocumentAllowList, ALLOW_LIST_DOCUMENT,
    ALLOW_LIST_FIELD, SETTINGS_COLLECTION,
};
pub use context::{AuthContext, AuthGate, AuthState};
pub use error::AuthError;
pub use identity::{normalize_email, Identity};
pub use identity_toolkit::{IdentityToolkitProvider, DEFAULT_IDENTITY_BASE_URL};
pub use provider::{AuthProvider, MemoryAuthProvider};

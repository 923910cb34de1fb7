//! folio-firestore: Firestore REST backend for Folio.
//!
//! [`FirestoreStore`] implements [`folio_core::DocumentStore`] over the
//! `documents` REST resource. Field values are translated between plain
//! JSON and Firestore's typed values by [`codec`].

pub mod codec;
pub mod config;
pub mod error;
pub mod store;

pub use config::{FirestoreConfig, DEFAULT_BASE_URL, DEFAULT_DATABASE};
pub use error::{FirestoreError, FirestoreResult};
pub use store::{FirestoreStore, TokenSource};

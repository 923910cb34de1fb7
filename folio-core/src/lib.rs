//! folio-core: backend-agnostic core for Folio.
//!
//! Ordered content collections over a document backend: the
//! [`DocumentStore`] client contract, a typed [`RecordStore`] per
//! content type, the shared error taxonomy and configuration.

pub mod config;
pub mod document;
pub mod errors;
pub mod labels;
pub mod memory;
pub mod record;
pub mod store;

pub use config::{FolioConfig, FolioConfigSnapshot};
pub use document::{Document, DocumentStore, NewDocument, RecordId};
pub use errors::{ErrorKind, FolioError, FolioResult};
pub use labels::LabelSet;
pub use memory::MemoryDocumentStore;
pub use record::{Record, RecordPatch, Stored, CREATED_AT_FIELD, ORDER_FIELD};
pub use store::RecordStore;

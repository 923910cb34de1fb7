//! The four content types managed by the console.

use folio_core::{FolioResult, Record};

pub mod contractors;
pub mod gallery;
pub mod partners;
pub mod services;

pub use contractors::{Contractor, ContractorForm};
pub use gallery::{GalleryCategory, GalleryForm, GalleryItem};
pub use partners::{Partner, PartnerForm};
pub use services::{Service, ServiceForm, ServiceIcon};

/// Whether a content type carries an uploaded image, and if it must.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetPolicy {
    Required,
    Optional,
    None,
}

impl AssetPolicy {
    pub fn has_asset(self) -> bool {
        !matches!(self, AssetPolicy::None)
    }
}

/// Notification titles shown for one content type.
#[derive(Clone, Copy, Debug)]
pub struct Messages {
    pub load_failed: &'static str,
    pub added: &'static str,
    pub updated: &'static str,
    pub save_failed: &'static str,
    pub upload_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
    pub missing_fields: &'static str,
    pub missing_asset: &'static str,
}

/// A record type editable through the console.
///
/// `Form` is the editor buffer: the user-editable fields without the
/// asset URL or sort position, which the editor resolves at save time.
pub trait Content: Record {
    type Form: Clone + Default + PartialEq + Send + Sync + 'static;

    /// Heading of the list screen.
    const TITLE: &'static str;
    const ASSET: AssetPolicy;
    const MESSAGES: Messages;

    fn form_from(&self) -> Self::Form;

    /// Required-field check. Never touches a backend.
    fn validate(form: &Self::Form) -> FolioResult<()>;

    fn build(form: &Self::Form, asset_url: Option<String>, order: i64) -> Self;

    /// Current asset URL, `None` when unset or empty.
    fn asset_url(&self) -> Option<&str>;

    /// Name used in lists and the delete prompt.
    fn display_name(&self) -> &str;
}

/// Empty strings mean "no asset".
pub(crate) fn non_empty(url: &str) -> Option<&str> {
    Some(url).filter(|u| !u.trim().is_empty())
}

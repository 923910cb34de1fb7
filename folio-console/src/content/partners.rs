use folio_core::{FolioResult, Record};
use serde::{Deserialize, Serialize};

use super::{non_empty, AssetPolicy, Content, Messages};
use crate::utils::validator::require_non_empty;

/// A partner company with an optional logo and link.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Partner {
    pub name: String,
    pub description: String,
    pub website_url: String,
    pub logo_url: String,
    pub order: i64,
}

impl Record for Partner {
    const COLLECTION: &'static str = "partners";

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartnerForm {
    pub name: String,
    pub description: String,
    pub website_url: String,
}

impl Content for Partner {
    type Form = PartnerForm;

    const TITLE: &'static str = "Partners";
    const ASSET: AssetPolicy = AssetPolicy::Optional;
    const MESSAGES: Messages = Messages {
        load_failed: "Error loading partners",
        added: "Partner added",
        updated: "Partner updated",
        save_failed: "Error saving",
        upload_failed: "Error uploading logo",
        deleted: "Partner deleted",
        delete_failed: "Error deleting",
        missing_fields: "Please enter a name",
        missing_asset: "Please upload a logo",
    };

    fn form_from(&self) -> PartnerForm {
        PartnerForm {
            name: self.name.clone(),
            description: self.description.clone(),
            website_url: self.website_url.clone(),
        }
    }

    fn validate(form: &PartnerForm) -> FolioResult<()> {
        require_non_empty(&form.name, Self::MESSAGES.missing_fields)
    }

    fn build(form: &PartnerForm, asset_url: Option<String>, order: i64) -> Self {
        Self {
            name: form.name.clone(),
            description: form.description.clone(),
            website_url: form.website_url.clone(),
            logo_url: asset_url.unwrap_or_default(),
            order,
        }
    }

    fn asset_url(&self) -> Option<&str> {
        non_empty(&self.logo_url)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

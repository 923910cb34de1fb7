use folio_core::{FolioResult, Record};
use serde::{Deserialize, Serialize};

use super::{non_empty, AssetPolicy, Content, Messages};
use crate::utils::validator::require_all;

/// A team member profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contractor {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo_url: String,
    pub order: i64,
}

impl Record for Contractor {
    const COLLECTION: &'static str = "contractors";

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContractorForm {
    pub name: String,
    pub role: String,
    pub bio: String,
}

impl Content for Contractor {
    type Form = ContractorForm;

    const TITLE: &'static str = "Contractors";
    const ASSET: AssetPolicy = AssetPolicy::Optional;
    const MESSAGES: Messages = Messages {
        load_failed: "Error loading contractors",
        added: "Contractor added",
        updated: "Contractor updated",
        save_failed: "Error saving",
        upload_failed: "Error uploading photo",
        deleted: "Contractor deleted",
        delete_failed: "Error deleting",
        missing_fields: "Please fill in name and role",
        missing_asset: "Please upload a photo",
    };

    fn form_from(&self) -> ContractorForm {
        ContractorForm {
            name: self.name.clone(),
            role: self.role.clone(),
            bio: self.bio.clone(),
        }
    }

    fn validate(form: &ContractorForm) -> FolioResult<()> {
        require_all(&[form.name.as_str(), form.role.as_str()], Self::MESSAGES.missing_fields)
    }

    fn build(form: &ContractorForm, asset_url: Option<String>, order: i64) -> Self {
        Self {
            name: form.name.clone(),
            role: form.role.clone(),
            bio: form.bio.clone(),
            photo_url: asset_url.unwrap_or_default(),
            order,
        }
    }

    fn asset_url(&self) -> Option<&str> {
        non_empty(&self.photo_url)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

use folio_core::{label_set_strings, FolioResult, LabelSet, Record};
use serde::{Deserialize, Serialize};

use super::{non_empty, AssetPolicy, Content, Messages};
use crate::utils::validator::require_all;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GalleryCategory {
    Kitchen,
    Bathroom,
    LivingRoom,
    Bedroom,
    Exterior,
    CustomCabinetry,
    WindowsAndDoors,
    Other,
}

impl LabelSet for GalleryCategory {
    const ALL: &'static [Self] = &[
        Self::Kitchen,
        Self::Bathroom,
        Self::LivingRoom,
        Self::Bedroom,
        Self::Exterior,
        Self::CustomCabinetry,
        Self::WindowsAndDoors,
        Self::Other,
    ];
    const FALLBACK: Self = Self::Other;

    // stored as the display label
    fn key(&self) -> &'static str {
        self.label()
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Kitchen => "Kitchen",
            Self::Bathroom => "Bathroom",
            Self::LivingRoom => "Living Room",
            Self::Bedroom => "Bedroom",
            Self::Exterior => "Exterior",
            Self::CustomCabinetry => "Custom Cabinetry",
            Self::WindowsAndDoors => "Windows & Doors",
            Self::Other => "Other",
        }
    }
}

label_set_strings!(GalleryCategory);

/// A project photo.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryItem {
    pub title: String,
    pub description: String,
    pub category: GalleryCategory,
    pub image_url: String,
    pub order: i64,
}

impl Record for GalleryItem {
    const COLLECTION: &'static str = "gallery";

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GalleryForm {
    pub title: String,
    pub description: String,
    /// Category label as picked; blank until chosen.
    pub category: String,
}

impl Content for GalleryItem {
    type Form = GalleryForm;

    const TITLE: &'static str = "Gallery";
    const ASSET: AssetPolicy = AssetPolicy::Required;
    const MESSAGES: Messages = Messages {
        load_failed: "Error loading gallery",
        added: "Gallery item added",
        updated: "Gallery item updated",
        save_failed: "Error saving item",
        upload_failed: "Error uploading image",
        deleted: "Gallery item deleted",
        delete_failed: "Error deleting item",
        missing_fields: "Please fill in all required fields",
        missing_asset: "Please upload an image",
    };

    fn form_from(&self) -> GalleryForm {
        GalleryForm {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.key().to_string(),
        }
    }

    fn validate(form: &GalleryForm) -> FolioResult<()> {
        require_all(&[form.title.as_str(), form.category.as_str()], Self::MESSAGES.missing_fields)
    }

    fn build(form: &GalleryForm, asset_url: Option<String>, order: i64) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            category: GalleryCategory::lookup(&form.category),
            image_url: asset_url.unwrap_or_default(),
            order,
        }
    }

    fn asset_url(&self) -> Option<&str> {
        non_empty(&self.image_url)
    }

    fn display_name(&self) -> &str {
        &self.title
    }
}

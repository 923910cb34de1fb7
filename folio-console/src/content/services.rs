use folio_core::{label_set_strings, FolioResult, LabelSet, Record};
use serde::{Deserialize, Serialize};

use super::{AssetPolicy, Content, Messages};
use crate::utils::validator::require_non_empty;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceIcon {
    Wrench,
    Home,
    Hammer,
    Paintbrush,
    Ruler,
    Settings,
    Lightbulb,
}

impl LabelSet for ServiceIcon {
    const ALL: &'static [Self] = &[
        Self::Wrench,
        Self::Home,
        Self::Hammer,
        Self::Paintbrush,
        Self::Ruler,
        Self::Settings,
        Self::Lightbulb,
    ];
    const FALLBACK: Self = Self::Wrench;

    fn key(&self) -> &'static str {
        match self {
            Self::Wrench => "wrench",
            Self::Home => "home",
            Self::Hammer => "hammer",
            Self::Paintbrush => "paintbrush",
            Self::Ruler => "ruler",
            Self::Settings => "settings",
            Self::Lightbulb => "lightbulb",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Wrench => "Wrench",
            Self::Home => "Home",
            Self::Hammer => "Hammer",
            Self::Paintbrush => "Paintbrush",
            Self::Ruler => "Ruler",
            Self::Settings => "Settings",
            Self::Lightbulb => "Lightbulb",
        }
    }
}

label_set_strings!(ServiceIcon);

/// A service offering. Services have no image; the icon is picked from a fixed set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub title: String,
    pub description: String,
    pub icon: ServiceIcon,
    pub order: i64,
}

impl Record for Service {
    const COLLECTION: &'static str = "services";

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceForm {
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            icon: ServiceIcon::FALLBACK.key().to_string(),
        }
    }
}

impl Content for Service {
    type Form = ServiceForm;

    const TITLE: &'static str = "Services";
    const ASSET: AssetPolicy = AssetPolicy::None;
    const MESSAGES: Messages = Messages {
        load_failed: "Error loading services",
        added: "Service added",
        updated: "Service updated",
        save_failed: "Error saving",
        upload_failed: "Error saving",
        deleted: "Service deleted",
        delete_failed: "Error deleting",
        missing_fields: "Please enter a title",
        missing_asset: "",
    };

    fn form_from(&self) -> ServiceForm {
        ServiceForm {
            title: self.title.clone(),
            description: self.description.clone(),
            icon: self.icon.key().to_string(),
        }
    }

    fn validate(form: &ServiceForm) -> FolioResult<()> {
        require_non_empty(&form.title, Self::MESSAGES.missing_fields)
    }

    fn build(form: &ServiceForm, _asset_url: Option<String>, order: i64) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            // blank picks the fallback
            icon: ServiceIcon::lookup(&form.icon),
            order,
        }
    }

    fn asset_url(&self) -> Option<&str> {
        None
    }

    fn display_name(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_icon_saves_as_wrench() {
        let form = ServiceForm {
            title: "Decks".into(),
            description: String::new(),
            icon: String::new(),
        };
        let svc = Service::build(&form, None, 0);
        assert_eq!(serde_json::to_value(&svc).unwrap()["icon"], json!("wrench"));
    }

    #[test]
    fn icon_lookup_accepts_labels() {
        assert_eq!(ServiceIcon::lookup("Paintbrush"), ServiceIcon::Paintbrush);
        assert_eq!(ServiceIcon::lookup("sparkles"), ServiceIcon::Wrench);
        assert_eq!(ServiceIcon::keys().len(), 7);
    }

    #[test]
    fn service_without_icon_still_decodes() {
        let svc: Service = serde_json::from_value(json!({ "title": "Roofing", "order": 4 })).unwrap();
        assert_eq!(svc.icon, ServiceIcon::Wrench);
        assert_eq!(svc.description, "");
        assert_eq!(svc.order, 4);
    }
}

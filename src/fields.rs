//! Field-selection strings sent with listing and metadata requests

use clap::ValueEnum;

/// Fields requested when the caller does not choose any.
pub const DEFAULT_FIELDS: [&str; 3] = ["id", "name", "mimeType"];

/// Which metadata namespaces are fetched and returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PropertyNamespaces {
    /// Both public and app properties
    #[default]
    Both,
    /// Public properties only
    #[value(name = "properties")]
    Public,
    /// App properties only
    #[value(name = "app-properties")]
    App,
    None,
}

impl PropertyNamespaces {
    pub fn public(self) -> bool {
        matches!(self, PropertyNamespaces::Both | PropertyNamespaces::Public)
    }

    pub fn app(self) -> bool {
        matches!(self, PropertyNamespaces::Both | PropertyNamespaces::App)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub fields: Vec<String>,
    pub namespaces: PropertyNamespaces,
    pub include_permissions: bool,
    /// Request every field (`*`). Only honoured for single-entry fetches.
    pub all_fields: bool,
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            namespaces: PropertyNamespaces::default(),
            include_permissions: false,
            all_fields: false,
        }
    }
}

impl FieldSelection {
    /// Selection for listing requests: `files(...),nextPageToken`.
    ///
    /// `id` and `mimeType` are always requested since the walker cannot expand
    /// folders without them, and `parents` since placement and flat records need it.
    pub fn listing(&self) -> String {
        let fields = with_required(self.fields.clone(), &["id", "mimeType", "parents"]);
        format!("files({}),nextPageToken", self.with_extras(fields).join(","))
    }

    /// Selection for a single-entry metadata fetch.
    ///
    /// `mimeType` and `name` are always present since the download path needs both.
    pub fn entry(&self) -> String {
        if self.all_fields {
            return "*".to_string();
        }
        let fields = with_required(self.fields.clone(), &["mimeType", "name"]);
        self.with_extras(fields).join(",")
    }

    fn with_extras(&self, mut fields: Vec<String>) -> Vec<String> {
        if self.namespaces.public() {
            fields.push("properties".to_string());
        }
        if self.namespaces.app() {
            fields.push("appProperties".to_string());
        }
        if self.include_permissions {
            fields.push("permissions".to_string());
        }
        fields
    }
}

fn with_required(mut fields: Vec<String>, required: &[&str]) -> Vec<String> {
    for name in required {
        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listing_fields() {
        let selection = FieldSelection::default();
        assert_eq!(
            selection.listing(),
            "files(id,name,mimeType,parents,properties,appProperties),nextPageToken"
        );
    }

    #[test]
    fn test_listing_does_not_duplicate_parents() {
        let selection = FieldSelection {
            fields: vec!["id".into(), "parents".into()],
            namespaces: PropertyNamespaces::None,
            include_permissions: true,
            all_fields: false,
        };
        assert_eq!(
            selection.listing(),
            "files(id,parents,mimeType,permissions),nextPageToken"
        );
    }

    #[test]
    fn test_listing_always_requests_id_and_mime_type() {
        let selection = FieldSelection {
            fields: vec!["name".into()],
            namespaces: PropertyNamespaces::None,
            ..Default::default()
        };
        assert_eq!(
            selection.listing(),
            "files(name,id,mimeType,parents),nextPageToken"
        );
    }

    #[test]
    fn test_entry_fields_add_name_and_mime() {
        let selection = FieldSelection {
            fields: vec!["id".into(), "size".into()],
            namespaces: PropertyNamespaces::App,
            ..Default::default()
        };
        assert_eq!(selection.entry(), "id,size,mimeType,name,appProperties");
    }

    #[test]
    fn test_all_fields_wins_for_entry() {
        let selection = FieldSelection {
            all_fields: true,
            include_permissions: true,
            ..Default::default()
        };
        assert_eq!(selection.entry(), "*");
    }
}

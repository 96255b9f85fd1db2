//! Remote directory entries as returned by the listing API

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MIME type the remote uses to mark folders.
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Prefix shared by native Workspace documents, which have no raw bytes.
pub const WORKSPACE_MIME_PREFIX: &str = "application/vnd.google-apps.";

/// Well-known identifier of the user's top-level folder.
pub const ROOT_ID: &str = "root";

/// Key-value metadata bag attached to an entry.
pub type PropertyBag = BTreeMap<String, String>;

/// One file-or-folder record returned by the remote.
///
/// Only `id`, `name` and `mimeType` are guaranteed; everything else depends on
/// the field selection sent with the request. Fields not modelled here are kept
/// in `extra` so they survive into download metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_properties: Option<PropertyBag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trashed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DirectoryEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            ..Default::default()
        }
    }

    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, FOLDER_MIME)
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.get_or_insert_with(Vec::new).push(parent.into());
        self
    }

    pub fn with_property(mut self, namespace: Namespace, key: &str, value: &str) -> Self {
        let bag = match namespace {
            Namespace::Public => self.properties.get_or_insert_with(PropertyBag::new),
            Namespace::App => self.app_properties.get_or_insert_with(PropertyBag::new),
        };
        bag.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME
    }

    pub fn is_trashed(&self) -> bool {
        self.trashed.unwrap_or(false)
    }

    /// Parent used for tree placement. Additional parents are ignored.
    pub fn first_parent(&self) -> Option<&str> {
        self.parents
            .as_ref()
            .and_then(|p| p.first())
            .map(String::as_str)
    }

    pub fn has_parent(&self, parent: &str) -> bool {
        self.parents
            .as_ref()
            .is_some_and(|p| p.iter().any(|id| id == parent))
    }

    /// Metadata bag for a namespace; a missing bag reads as absent, never as an error.
    pub fn bag(&self, namespace: Namespace) -> Option<&PropertyBag> {
        match namespace {
            Namespace::Public => self.properties.as_ref(),
            Namespace::App => self.app_properties.as_ref(),
        }
    }
}

/// The two independent metadata namespaces of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Namespace {
    /// Custom properties visible to every app
    #[default]
    #[value(name = "properties", alias = "public")]
    Public,
    /// Properties private to the requesting app
    #[value(name = "app-properties", alias = "app")]
    App,
}

/// Named Workspace kinds accepted by the type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileKind {
    Audio,
    Document,
    Drawing,
    File,
    Folder,
    Form,
    Map,
    Photo,
    Presentation,
    Script,
    Shortcut,
    Spreadsheet,
    Video,
}

impl FileKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            FileKind::Audio => "application/vnd.google-apps.audio",
            FileKind::Document => "application/vnd.google-apps.document",
            FileKind::Drawing => "application/vnd.google-apps.drawing",
            FileKind::File => "application/vnd.google-apps.file",
            FileKind::Folder => FOLDER_MIME,
            FileKind::Form => "application/vnd.google-apps.form",
            FileKind::Map => "application/vnd.google-apps.map",
            FileKind::Photo => "application/vnd.google-apps.photo",
            FileKind::Presentation => "application/vnd.google-apps.presentation",
            FileKind::Script => "application/vnd.google-apps.script",
            FileKind::Shortcut => "application/vnd.google-apps.shortcut",
            FileKind::Spreadsheet => "application/vnd.google-apps.spreadsheet",
            FileKind::Video => "application/vnd.google-apps.video",
        }
    }
}

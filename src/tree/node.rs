//! Serializable output types for tree and flat-list results

use serde::Serialize;
use serde_json::Value;

use crate::entry::{DirectoryEntry, FOLDER_MIME, PropertyBag};
use crate::fields::PropertyNamespaces;

/// Display name of the synthetic node standing in for the traversal start.
pub const VIRTUAL_ROOT_NAME: &str = "(root)";

/// Which optional metadata is copied from entries into output records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Projection {
    pub namespaces: PropertyNamespaces,
    pub include_permissions: bool,
}

impl Projection {
    fn properties(&self, entry: &DirectoryEntry) -> Option<PropertyBag> {
        self.namespaces
            .public()
            .then(|| entry.properties.clone())
            .flatten()
    }

    fn app_properties(&self, entry: &DirectoryEntry) -> Option<PropertyBag> {
        self.namespaces
            .app()
            .then(|| entry.app_properties.clone())
            .flatten()
    }

    fn permissions(&self, entry: &DirectoryEntry) -> Option<Vec<Value>> {
        self.include_permissions
            .then(|| entry.permissions.clone())
            .flatten()
    }
}

/// One node of the assembled tree. Children keep the order entries arrived in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_properties: Option<PropertyBag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Value>>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn from_entry(entry: &DirectoryEntry, projection: &Projection) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            mime_type: entry.mime_type.clone(),
            properties: projection.properties(entry),
            app_properties: projection.app_properties(entry),
            permissions: projection.permissions(entry),
            children: Vec::new(),
        }
    }

    /// Placeholder for a start folder that is not among the collected entries.
    pub fn virtual_root(start: &str, children: Vec<TreeNode>) -> Self {
        Self {
            id: start.to_string(),
            name: VIRTUAL_ROOT_NAME.to_string(),
            mime_type: FOLDER_MIME.to_string(),
            properties: None,
            app_properties: None,
            permissions: None,
            children,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME
    }

    /// Identifiers of every node below this one, depth first.
    pub fn descendant_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        let mut stack: Vec<&TreeNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            ids.push(node.id.as_str());
            stack.extend(node.children.iter().rev());
        }
        ids
    }

    /// Count (folders, files) below this node.
    pub fn count(&self) -> (usize, usize) {
        self.children.iter().fold((0, 0), |(dirs, files), child| {
            let (d, f) = child.count();
            if child.is_folder() {
                (dirs + d + 1, files + f)
            } else {
                (dirs + d, files + f + 1)
            }
        })
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// One record of flat-list output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub parents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_properties: Option<PropertyBag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Value>>,
}

impl FileRecord {
    pub fn from_entry(entry: &DirectoryEntry, projection: &Projection) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            mime_type: entry.mime_type.clone(),
            parents: entry.parents.clone().unwrap_or_default(),
            properties: projection.properties(entry),
            app_properties: projection.app_properties(entry),
            permissions: projection.permissions(entry),
        }
    }
}

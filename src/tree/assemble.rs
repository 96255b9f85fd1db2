//! Shaping a flat traversal result into a tree or a list

use std::collections::{HashMap, HashSet};

use crate::entry::DirectoryEntry;

use super::node::{FileRecord, Projection, TreeNode};

/// Where an entry is placed in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentResolution<'a> {
    /// Its first parent is itself part of the tree
    RealParent(&'a str),
    /// No parent, or a parent that was filtered out or never fetched
    VirtualRoot,
}

/// Resolve an entry's placement against the set of identifiers in the tree.
pub fn resolve_parent<'a>(
    entry: &'a DirectoryEntry,
    present: &HashMap<&str, &DirectoryEntry>,
) -> ParentResolution<'a> {
    match entry.first_parent() {
        Some(parent) if present.contains_key(parent) => ParentResolution::RealParent(parent),
        _ => ParentResolution::VirtualRoot,
    }
}

/// Assemble surviving entries into a tree rooted at `start`.
///
/// Returns the node for `start` when it is among the entries, otherwise a
/// virtual root holding every entry whose parent is not present.
pub fn build_tree(entries: &[DirectoryEntry], start: &str, projection: &Projection) -> TreeNode {
    let mut by_id: HashMap<&str, &DirectoryEntry> = HashMap::new();
    for entry in entries {
        by_id.insert(entry.id.as_str(), entry);
    }

    let mut children: HashMap<&str, Vec<&DirectoryEntry>> = HashMap::new();
    let mut orphans = Vec::new();
    for entry in entries {
        match resolve_parent(entry, &by_id) {
            ParentResolution::RealParent(parent) => children.entry(parent).or_default().push(entry),
            ParentResolution::VirtualRoot => orphans.push(entry),
        }
    }

    let builder = TreeBuilder {
        children,
        projection,
    };
    let mut path = HashSet::new();

    match by_id.get(start) {
        Some(&entry) => builder.build(entry, &mut path),
        None => TreeNode::virtual_root(
            start,
            orphans
                .into_iter()
                .map(|e| builder.build(e, &mut path))
                .collect(),
        ),
    }
}

/// Map surviving entries to flat records, preserving order.
pub fn build_list(entries: &[DirectoryEntry], projection: &Projection) -> Vec<FileRecord> {
    entries
        .iter()
        .map(|e| FileRecord::from_entry(e, projection))
        .collect()
}

struct TreeBuilder<'a, 'p> {
    children: HashMap<&'a str, Vec<&'a DirectoryEntry>>,
    projection: &'p Projection,
}

impl<'a> TreeBuilder<'a, '_> {
    /// `path` holds the identifiers from the root down to `entry`; a child
    /// already on it would close a cycle and is emitted without children.
    fn build(&self, entry: &'a DirectoryEntry, path: &mut HashSet<&'a str>) -> TreeNode {
        let mut node = TreeNode::from_entry(entry, self.projection);
        if !path.insert(entry.id.as_str()) {
            return node;
        }
        if let Some(kids) = self.children.get(entry.id.as_str()) {
            node.children = kids.iter().map(|&kid| self.build(kid, path)).collect();
        }
        path.remove(entry.id.as_str());
        node
    }
}

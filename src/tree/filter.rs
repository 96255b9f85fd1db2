//! Post-traversal filtering of collected entries
//!
//! Filters never influence what the walker fetches; they only prune the flat
//! collection afterwards, in a fixed order: type, metadata, query. Folder
//! exclusion is separate because it only applies to flat-list output.

use std::fmt;
use std::str::FromStr;

use glob::Pattern;

use crate::entry::{DirectoryEntry, Namespace};
use crate::error::{DriveError, Result};
use crate::query::Query;

/// Requires `key` to map to exactly `value` in one metadata namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    pub namespace: Namespace,
    pub key: String,
    pub value: String,
}

impl PropertyFilter {
    pub fn new(namespace: Namespace, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace,
            key: key.into(),
            value: value.into(),
        }
    }

    /// A filter with an empty key or value is always satisfied.
    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        if self.key.is_empty() || self.value.is_empty() {
            return true;
        }
        entry
            .bag(self.namespace)
            .and_then(|bag| bag.get(&self.key))
            .is_some_and(|v| *v == self.value)
    }
}

/// Parses `key=value`, `properties:key=value` or `app-properties:key=value`.
impl FromStr for PropertyFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (namespace, pair) = match s.split_once(':') {
            Some((ns, pair)) if !ns.contains('=') => {
                let namespace = match ns {
                    "properties" | "public" => Namespace::Public,
                    "app-properties" | "appProperties" | "app" => Namespace::App,
                    other => return Err(format!("unknown property namespace '{other}'")),
                };
                (namespace, pair)
            }
            _ => (Namespace::Public, s),
        };
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{pair}'"))?;
        Ok(Self::new(namespace, key.trim(), value.trim()))
    }
}

impl fmt::Display for PropertyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = match self.namespace {
            Namespace::Public => "properties",
            Namespace::App => "app-properties",
        };
        write!(f, "{}:{}={}", ns, self.key, self.value)
    }
}

/// The user-facing filter set applied to a traversal result.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    types: Vec<Pattern>,
    properties: Vec<PropertyFilter>,
    query: Query,
}

impl EntryFilter {
    /// Build a filter. Types are MIME types or glob patterns over them.
    pub fn new(types: &[String], properties: Vec<PropertyFilter>, query: &str) -> Result<Self> {
        let types = types
            .iter()
            .map(|t| {
                Pattern::new(t)
                    .map_err(|e| DriveError::Config(format!("invalid type pattern '{t}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            types,
            properties,
            query: Query::parse(query)?,
        })
    }

    /// An empty allowed set admits every type.
    pub fn matches_type(&self, entry: &DirectoryEntry) -> bool {
        self.types.is_empty() || self.types.iter().any(|p| p.matches(&entry.mime_type))
    }

    pub fn matches_properties(&self, entry: &DirectoryEntry) -> bool {
        self.properties.iter().all(|f| f.matches(entry))
    }

    pub fn matches_query(&self, entry: &DirectoryEntry) -> bool {
        self.query.matches(entry)
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        self.matches_type(entry) && self.matches_properties(entry) && self.matches_query(entry)
    }

    pub fn apply(&self, entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
        entries
            .into_iter()
            .filter(|e| self.matches_type(e))
            .filter(|e| self.matches_properties(e))
            .filter(|e| self.matches_query(e))
            .collect()
    }
}

/// Drop folders unless they were asked for. Flat-list output only.
pub fn retain_folders(entries: Vec<DirectoryEntry>, include_folders: bool) -> Vec<DirectoryEntry> {
    if include_folders {
        return entries;
    }
    entries.into_iter().filter(|e| !e.is_folder()).collect()
}

//! Configuration types for the directory walker

use clap::ValueEnum;

use crate::entry::ROOT_ID;
use crate::fields::FieldSelection;

/// When folders found in a listing are queued for expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EnqueuePolicy {
    /// Scan every page of a listing for new folders
    #[default]
    EveryPage,
    /// Scan only the last page of each listing; folders that appear solely on
    /// earlier pages are collected but never expanded
    TerminalPage,
}

/// Configuration for one traversal.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Folder the traversal starts from
    pub start: String,
    pub fields: FieldSelection,
    pub enqueue: EnqueuePolicy,
    /// Include shared drives in every listing
    pub all_drives: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            start: ROOT_ID.to_string(),
            fields: FieldSelection::default(),
            enqueue: EnqueuePolicy::default(),
            all_drives: true,
        }
    }
}

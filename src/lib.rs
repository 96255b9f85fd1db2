//! Drivetree - Walk a remote drive folder hierarchy and shape it into a tree or a flat list

pub mod config;
pub mod download;
pub mod entry;
pub mod error;
pub mod fields;
pub mod output;
pub mod query;
pub mod reference;
pub mod remote;
pub mod run;
pub mod search;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ClientConfig;
pub use download::{ConversionFormats, DownloadOptions, download_file};
pub use entry::{DirectoryEntry, FileKind, Namespace};
pub use error::{DriveError, Result};
pub use fields::{FieldSelection, PropertyNamespaces};
pub use output::{OutputConfig, TreeFormatter, print_json, write_json};
pub use remote::{DirectoryService, HttpDirectoryService, MemoryDirectoryService};
pub use run::{Operation, OutputRecord, RunOptions, execute};
pub use search::{SearchResult, SortOrder, search_files, search_folders};
pub use tree::{
    DirectoryWalker, EnqueuePolicy, EntryFilter, FileRecord, PropertyFilter, TreeNode,
    WalkerConfig, build_list, build_tree,
};

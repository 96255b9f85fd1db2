//! Running one operation over a batch of items
//!
//! Each item is processed on its own, in order, with its own traversal state.
//! Failures either abort the batch or become an error record for that item.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::download::{DownloadOptions, download_file};
use crate::entry::DirectoryEntry;
use crate::error::Result;
use crate::reference::parse_folder_ref;
use crate::remote::DirectoryService;
use crate::search::{SearchResult, SortOrder, search_files, search_folders};
use crate::tree::{
    DirectoryWalker, EntryFilter, FileRecord, Projection, TreeNode, WalkerConfig,
    build_list, build_tree, retain_folders,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Operation {
    /// Nested folder/file tree
    #[default]
    Tree,
    /// Flat list of entries with parent references
    List,
    /// Download one file
    Download,
    /// Search folders by name
    SearchFolders,
    /// List files in a folder
    SearchFiles,
}

/// Settings shared by every item of a batch.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub operation: Operation,
    pub filter: EntryFilter,
    pub walker: WalkerConfig,
    pub include_folders: bool,
    /// Emit one record per flat-list entry instead of one array
    pub split: bool,
    pub download: DownloadOptions,
    pub sort: SortOrder,
    /// Name fragment for the file picker
    pub search: Option<String>,
    /// Turn item failures into error records instead of aborting
    pub continue_on_fail: bool,
}

impl RunOptions {
    pub fn projection(&self) -> Projection {
        Projection {
            namespaces: self.walker.fields.namespaces,
            include_permissions: self.walker.fields.include_permissions,
        }
    }
}

/// One output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputRecord {
    Tree(TreeNode),
    List(Vec<FileRecord>),
    Entry(FileRecord),
    Download(Value),
    Search(Vec<SearchResult>),
    Error { error: String },
}

impl OutputRecord {
    pub fn is_error(&self) -> bool {
        matches!(self, OutputRecord::Error { .. })
    }
}

/// Run `options.operation` for every item.
///
/// Items are folder references for tree, list and file search, file references
/// for download, and name fragments for folder search.
pub fn execute<S: DirectoryService>(
    service: &S,
    items: &[String],
    options: &RunOptions,
) -> Result<Vec<OutputRecord>> {
    let mut records = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match run_item(service, item, options) {
            Ok(mut produced) => records.append(&mut produced),
            Err(err) if options.continue_on_fail => {
                warn!(index, item = %item, error = %err, "item failed");
                records.push(OutputRecord::Error {
                    error: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }
    info!(items = items.len(), records = records.len(), "run complete");
    Ok(records)
}

fn run_item<S: DirectoryService>(
    service: &S,
    item: &str,
    options: &RunOptions,
) -> Result<Vec<OutputRecord>> {
    match options.operation {
        Operation::Tree => Ok(vec![OutputRecord::Tree(tree(service, item, options)?)]),
        Operation::List => {
            let records = list(service, item, options)?;
            if options.split {
                Ok(records.into_iter().map(OutputRecord::Entry).collect())
            } else {
                Ok(vec![OutputRecord::List(records)])
            }
        }
        Operation::Download => Ok(vec![OutputRecord::Download(download_file(
            service,
            item,
            &options.download,
        )?)]),
        Operation::SearchFolders => Ok(vec![OutputRecord::Search(search_folders(
            service,
            Some(item),
            options.sort,
        ))]),
        Operation::SearchFiles => {
            let folder = parse_folder_ref(item)?;
            Ok(vec![OutputRecord::Search(search_files(
                service,
                &folder,
                options.search.as_deref(),
            ))])
        }
    }
}

/// Walk from `folder_ref` and assemble the filtered tree. Folders are always kept.
pub fn tree<S: DirectoryService>(
    service: &S,
    folder_ref: &str,
    options: &RunOptions,
) -> Result<TreeNode> {
    let start = parse_folder_ref(folder_ref)?;
    let entries = walk(service, &start, options)?;
    let entries = options.filter.apply(entries);
    Ok(build_tree(&entries, &start, &options.projection()))
}

/// Walk from `folder_ref` and return the filtered flat list.
pub fn list<S: DirectoryService>(
    service: &S,
    folder_ref: &str,
    options: &RunOptions,
) -> Result<Vec<FileRecord>> {
    let start = parse_folder_ref(folder_ref)?;
    let entries = walk(service, &start, options)?;
    let entries = retain_folders(options.filter.apply(entries), options.include_folders);
    Ok(build_list(&entries, &options.projection()))
}

fn walk<S: DirectoryService>(
    service: &S,
    start: &str,
    options: &RunOptions,
) -> Result<Vec<DirectoryEntry>> {
    let config = WalkerConfig {
        start: start.to_string(),
        ..options.walker.clone()
    };
    Ok(DirectoryWalker::new(service, config).walk()?.entries)
}

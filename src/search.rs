//! Folder and file pickers
//!
//! These back interactive selection of a start folder or a file to download.
//! Their sort order is a picker setting only; traversal output is never sorted.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use tracing::warn;

use crate::entry::{DirectoryEntry, ROOT_ID};
use crate::error::Result;
use crate::query::{file_search_query, folder_search_query};
use crate::remote::{DirectoryService, ListRequest};

/// Most results a picker shows.
pub const MAX_RESULTS: usize = 20;

pub const MY_DRIVE_NAME: &str = "My Drive";
pub const MY_DRIVE_URL: &str = "https://drive.google.com";

const FOLDER_FIELDS: &str = "files(id,name,modifiedTime,createdTime,webViewLink),nextPageToken";
const FILE_FIELDS: &str = "files(id,name,mimeType,webViewLink),nextPageToken";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    /// Name, A to Z
    #[default]
    NameAsc,
    /// Name, Z to A
    NameDesc,
    /// Modified, newest first
    ModifiedDesc,
    /// Modified, oldest first
    ModifiedAsc,
    /// Created, newest first
    CreatedDesc,
    /// Created, oldest first
    CreatedAsc,
}

impl SortOrder {
    /// Server-side ordering requested alongside the listing.
    pub fn order_by(self) -> &'static str {
        match self {
            SortOrder::NameAsc | SortOrder::NameDesc => "name",
            SortOrder::ModifiedDesc | SortOrder::ModifiedAsc => "modifiedTime desc",
            SortOrder::CreatedDesc | SortOrder::CreatedAsc => "createdTime desc",
        }
    }

    pub fn compare(self, a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
        match self {
            SortOrder::NameAsc => compare_names(a, b),
            SortOrder::NameDesc => compare_names(b, a),
            SortOrder::ModifiedDesc => timestamp(&b.modified_time).cmp(&timestamp(&a.modified_time)),
            SortOrder::ModifiedAsc => timestamp(&a.modified_time).cmp(&timestamp(&b.modified_time)),
            SortOrder::CreatedDesc => timestamp(&b.created_time).cmp(&timestamp(&a.created_time)),
            SortOrder::CreatedAsc => timestamp(&a.created_time).cmp(&timestamp(&b.created_time)),
        }
    }
}

/// One picker option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SearchResult {
    fn my_drive() -> Self {
        Self {
            name: MY_DRIVE_NAME.to_string(),
            value: ROOT_ID.to_string(),
            url: Some(MY_DRIVE_URL.to_string()),
        }
    }

    fn from_entry(entry: DirectoryEntry) -> Self {
        Self {
            name: entry.name,
            value: entry.id,
            url: entry.web_view_link,
        }
    }
}

/// Folders whose name contains `filter`, with "My Drive" first when it matches.
///
/// A failing remote degrades to just the "My Drive" option.
pub fn search_folders<S: DirectoryService>(
    service: &S,
    filter: Option<&str>,
    sort: SortOrder,
) -> Vec<SearchResult> {
    let filter = filter.map(str::trim).filter(|f| !f.is_empty());
    match try_search_folders(service, filter, sort) {
        Ok(results) => results,
        Err(err) => {
            warn!(error = %err, "folder search failed");
            vec![SearchResult::my_drive()]
        }
    }
}

fn try_search_folders<S: DirectoryService>(
    service: &S,
    filter: Option<&str>,
    sort: SortOrder,
) -> Result<Vec<SearchResult>> {
    let mut results = Vec::new();
    let shows_my_drive = filter.is_none_or(|f| {
        MY_DRIVE_NAME
            .to_lowercase()
            .contains(&f.to_lowercase())
    });
    if shows_my_drive {
        results.push(SearchResult::my_drive());
    }

    let request =
        ListRequest::new(folder_search_query(filter), FOLDER_FIELDS).with_order_by(sort.order_by());
    let mut folders = service.list_all(&request)?;
    folders.sort_by(|a, b| sort.compare(a, b));

    let limit = MAX_RESULTS - results.len();
    results.extend(folders.into_iter().take(limit).map(SearchResult::from_entry));
    Ok(results)
}

/// Non-folder entries directly inside `folder`, sorted by name.
///
/// A failing remote degrades to an empty list.
pub fn search_files<S: DirectoryService>(
    service: &S,
    folder: &str,
    filter: Option<&str>,
) -> Vec<SearchResult> {
    let filter = filter.map(str::trim).filter(|f| !f.is_empty());
    let request =
        ListRequest::new(file_search_query(folder, filter), FILE_FIELDS).with_order_by("name");
    match service.list_all(&request) {
        Ok(mut files) => {
            files.sort_by(compare_names);
            files
                .into_iter()
                .take(MAX_RESULTS)
                .map(SearchResult::from_entry)
                .collect()
        }
        Err(err) => {
            warn!(error = %err, folder, "file search failed");
            Vec::new()
        }
    }
}

fn compare_names(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Missing or unparseable timestamps sort as the oldest possible time.
fn timestamp(raw: &Option<String>) -> DateTime<Utc> {
    raw.as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

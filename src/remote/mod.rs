//! Remote file directory service
//!
//! `DirectoryService` is the seam between the traversal core and whatever
//! actually answers listing requests:
//!
//! - `HttpDirectoryService`: the Drive v3 REST API over HTTPS
//! - `MemoryDirectoryService`: an in-memory snapshot, for offline runs and tests

mod http;
mod memory;

pub use http::HttpDirectoryService;
pub use memory::{MemoryDirectoryService, RecordedRequest};

use serde::Deserialize;
use serde_json::Value;

use crate::entry::DirectoryEntry;
use crate::error::Result;

/// Page size used for every listing request.
pub const PAGE_SIZE: usize = 1000;

/// One paginated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub query: String,
    /// Field selection, e.g. `files(id,name),nextPageToken`
    pub fields: String,
    pub page_size: usize,
    pub page_token: Option<String>,
    pub supports_all_drives: bool,
    pub include_items_from_all_drives: bool,
    pub order_by: Option<String>,
}

impl ListRequest {
    pub fn new(query: impl Into<String>, fields: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fields: fields.into(),
            page_size: PAGE_SIZE,
            page_token: None,
            supports_all_drives: true,
            include_items_from_all_drives: true,
            order_by: None,
        }
    }

    pub fn with_page_token(mut self, token: Option<String>) -> Self {
        self.page_token = token;
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }
}

/// One page of a listing. Absence of `next_page_token` marks the last page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    #[serde(default)]
    pub files: Vec<DirectoryEntry>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ListPage {
    pub fn is_last(&self) -> bool {
        self.next_page_token.as_deref().is_none_or(str::is_empty)
    }
}

/// A remote hierarchical directory. Every call blocks until the remote answers.
pub trait DirectoryService {
    fn list(&self, request: &ListRequest) -> Result<ListPage>;

    /// Fetch one entry's metadata with the given field selection.
    fn get(&self, id: &str, fields: &str) -> Result<Value>;

    /// Raw content of a regular file.
    fn download(&self, id: &str) -> Result<Vec<u8>>;

    /// Content of a native Workspace document converted to `mime_type`.
    fn export(&self, id: &str, mime_type: &str) -> Result<Vec<u8>>;

    /// Fetch every page of a listing.
    fn list_all(&self, request: &ListRequest) -> Result<Vec<DirectoryEntry>> {
        let mut request = request.clone();
        let mut entries = Vec::new();
        loop {
            let page = self.list(&request)?;
            let done = page.is_last();
            entries.extend(page.files);
            if done {
                return Ok(entries);
            }
            request.page_token = page.next_page_token;
        }
    }
}

impl<S: DirectoryService + ?Sized> DirectoryService for &S {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        (**self).list(request)
    }

    fn get(&self, id: &str, fields: &str) -> Result<Value> {
        (**self).get(id, fields)
    }

    fn download(&self, id: &str) -> Result<Vec<u8>> {
        (**self).download(id)
    }

    fn export(&self, id: &str, mime_type: &str) -> Result<Vec<u8>> {
        (**self).export(id, mime_type)
    }
}

impl<S: DirectoryService + ?Sized> DirectoryService for Box<S> {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        (**self).list(request)
    }

    fn get(&self, id: &str, fields: &str) -> Result<Value> {
        (**self).get(id, fields)
    }

    fn download(&self, id: &str) -> Result<Vec<u8>> {
        (**self).download(id)
    }

    fn export(&self, id: &str, mime_type: &str) -> Result<Vec<u8>> {
        (**self).export(id, mime_type)
    }
}

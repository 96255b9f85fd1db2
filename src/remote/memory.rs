//! In-memory directory backed by a JSON snapshot

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::entry::DirectoryEntry;
use crate::error::{DriveError, Result};
use crate::query::{Query, quote};

use super::{DirectoryService, ListPage, ListRequest};

/// A call made against a `MemoryDirectoryService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    List(ListRequest),
    Get(String),
    Download(String),
    Export { id: String, mime_type: String },
}

/// Snapshot file layout: either a bare array of entries or an object with
/// `files` and optional text `content` keyed by entry id.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Entries(Vec<DirectoryEntry>),
    Full {
        files: Vec<DirectoryEntry>,
        #[serde(default)]
        content: BTreeMap<String, String>,
    },
}

/// Answers listing queries from a fixed set of entries.
///
/// Listing order is snapshot order. `orderBy` is recorded but not applied.
#[derive(Debug, Default)]
pub struct MemoryDirectoryService {
    entries: Vec<DirectoryEntry>,
    content: BTreeMap<String, Vec<u8>>,
    page_size: Option<usize>,
    failing_literals: HashSet<String>,
    /// `None` unless `with_request_log` was called
    requests: Option<RefCell<Vec<RecordedRequest>>>,
}

impl MemoryDirectoryService {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let service = match serde_json::from_str(json)? {
            Snapshot::Entries(entries) => Self::new(entries),
            Snapshot::Full { files, content } => {
                let mut service = Self::new(files);
                for (id, text) in content {
                    service.content.insert(id, text.into_bytes());
                }
                service
            }
        };
        Ok(service)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Cap every page at `page_size` entries, below whatever the caller asks for.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    pub fn with_content(mut self, id: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.content.insert(id.to_string(), bytes.into());
        self
    }

    /// Make every listing whose query mentions the quoted `literal` fail
    /// with a server error.
    pub fn with_failing_literal(mut self, literal: &str) -> Self {
        self.failing_literals.insert(literal.to_string());
        self
    }

    /// Keep every request made from now on, for `requests` and `list_queries`.
    pub fn with_request_log(mut self) -> Self {
        self.requests = Some(RefCell::default());
        self
    }

    /// Recorded requests in issue order. Empty without a request log.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .as_ref()
            .map(|log| log.borrow().clone())
            .unwrap_or_default()
    }

    /// Queries of every listing request, in the order they were issued.
    pub fn list_queries(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                RecordedRequest::List(req) => Some(req.query),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: RecordedRequest) {
        if let Some(log) = &self.requests {
            log.borrow_mut().push(request);
        }
    }

    fn find(&self, id: &str) -> Result<&DirectoryEntry> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found(id))
    }
}

impl DirectoryService for MemoryDirectoryService {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        self.record(RecordedRequest::List(request.clone()));

        if let Some(literal) = self
            .failing_literals
            .iter()
            .find(|l| request.query.contains(&quote(l)))
        {
            return Err(DriveError::Status {
                status: 500,
                body: format!("listing {literal} failed"),
            });
        }

        let query = Query::parse(&request.query)?;
        let offset = match request.page_token.as_deref() {
            Some(token) => token.parse::<usize>().map_err(|_| DriveError::Status {
                status: 400,
                body: format!("invalid page token: {token}"),
            })?,
            None => 0,
        };
        let page_size = self
            .page_size
            .map_or(request.page_size, |cap| cap.min(request.page_size))
            .max(1);

        let matching: Vec<&DirectoryEntry> =
            self.entries.iter().filter(|e| query.matches(e)).collect();
        let end = (offset + page_size).min(matching.len());
        let files = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|e| (*e).clone())
            .collect();
        let next_page_token = (end < matching.len()).then(|| end.to_string());

        Ok(ListPage {
            files,
            next_page_token,
        })
    }

    fn get(&self, id: &str, _fields: &str) -> Result<Value> {
        self.record(RecordedRequest::Get(id.to_string()));
        Ok(serde_json::to_value(self.find(id)?)?)
    }

    fn download(&self, id: &str) -> Result<Vec<u8>> {
        self.record(RecordedRequest::Download(id.to_string()));
        self.find(id)?;
        Ok(self.content.get(id).cloned().unwrap_or_default())
    }

    fn export(&self, id: &str, mime_type: &str) -> Result<Vec<u8>> {
        self.record(RecordedRequest::Export {
            id: id.to_string(),
            mime_type: mime_type.to_string(),
        });
        self.find(id)?;
        Ok(self.content.get(id).cloned().unwrap_or_default())
    }
}

fn not_found(id: &str) -> DriveError {
    DriveError::Status {
        status: 404,
        body: format!("File not found: {id}"),
    }
}

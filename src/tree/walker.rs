//! DirectoryWalker - breadth-first traversal of a remote folder hierarchy

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info};

use crate::entry::DirectoryEntry;
use crate::error::Result;
use crate::query::children_query;
use crate::remote::{DirectoryService, ListRequest};

use super::config::{EnqueuePolicy, WalkerConfig};

/// Folders waiting to be expanded, plus every folder ever queued.
///
/// A folder enters the queue at most once, so shared parentage or cycles in
/// the remote graph never cause a second expansion.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new(start: &str) -> Self {
        Self {
            queue: VecDeque::from([start.to_string()]),
            seen: HashSet::from([start.to_string()]),
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Queue `id` unless it was queued before. Returns whether it was added.
    pub fn offer(&mut self, id: &str) -> bool {
        if !self.seen.insert(id.to_string()) {
            return false;
        }
        self.queue.push_back(id.to_string());
        true
    }

    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }
}

/// Everything one traversal collected.
#[derive(Debug, Default)]
pub struct Traversal {
    /// Every entry of every page, in arrival order. An entry reachable through
    /// several listed parents appears once per listing that returned it.
    pub entries: Vec<DirectoryEntry>,
    /// Folders whose children were listed, in expansion order
    pub expanded: Vec<String>,
    /// Number of listing requests issued
    pub requests: usize,
}

pub struct DirectoryWalker<S> {
    service: S,
    config: WalkerConfig,
}

impl<S: DirectoryService> DirectoryWalker<S> {
    pub fn new(service: S, config: WalkerConfig) -> Self {
        Self { service, config }
    }

    /// Walk the hierarchy below the configured start folder.
    ///
    /// The first failed request aborts the walk; nothing collected so far is returned.
    pub fn walk(&self) -> Result<Traversal> {
        let mut frontier = Frontier::new(&self.config.start);
        let mut traversal = Traversal::default();
        let fields = self.config.fields.listing();

        while let Some(current) = frontier.pop() {
            let mut request = ListRequest::new(children_query(&current), fields.clone());
            request.supports_all_drives = self.config.all_drives;
            request.include_items_from_all_drives = self.config.all_drives;

            loop {
                let page = self.service.list(&request)?;
                traversal.requests += 1;
                let last = page.is_last();
                debug!(
                    folder = %current,
                    entries = page.files.len(),
                    last,
                    "listed page"
                );

                if last || self.config.enqueue == EnqueuePolicy::EveryPage {
                    for entry in page.files.iter().filter(|e| e.is_folder()) {
                        frontier.offer(&entry.id);
                    }
                }
                traversal.entries.extend(page.files);

                if last {
                    break;
                }
                request.page_token = page.next_page_token;
            }

            traversal.expanded.push(current);
        }

        info!(
            start = %self.config.start,
            folders = traversal.expanded.len(),
            entries = traversal.entries.len(),
            requests = traversal.requests,
            "traversal complete"
        );
        Ok(traversal)
    }
}

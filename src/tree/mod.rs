//! Remote folder traversal and result shaping
//!
//! The traversal runs in two phases:
//!
//! - `DirectoryWalker`: breadth-first walk of a remote hierarchy, collecting a flat list of entries
//! - `EntryFilter` + `build_tree` / `build_list`: post-filtering and shaping of that list

mod assemble;
mod config;
mod filter;
mod node;
mod walker;

// Re-export public types
pub use assemble::{ParentResolution, build_list, build_tree, resolve_parent};
pub use config::{EnqueuePolicy, WalkerConfig};
pub use filter::{EntryFilter, PropertyFilter, retain_folders};
pub use node::{FileRecord, Projection, TreeNode, VIRTUAL_ROOT_NAME};
pub use walker::{DirectoryWalker, Frontier, Traversal};

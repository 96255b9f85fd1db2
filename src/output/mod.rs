//! Result formatting and display
//!
//! - `config` - Output configuration types
//! - `json` - JSON and NDJSON output
//! - `tree` - Console tree formatter

mod config;
mod json;
mod tree;

pub use config::OutputConfig;
pub use json::{print_json, write_json};
pub use tree::TreeFormatter;

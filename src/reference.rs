//! Resolving user-supplied file and folder references to remote identifiers
//!
//! A reference is either a bare identifier or a browser URL copied from the
//! Drive web UI.

use std::sync::LazyLock;

use regex::Regex;

use crate::entry::ROOT_ID;
use crate::error::{DriveError, Result};

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("ID_PATTERN regex is invalid"));

static FILE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"drive\.google\.com/file/d/([a-zA-Z0-9_-]+)")
        .expect("FILE_URL_PATTERN regex is invalid")
});

static FOLDER_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"drive\.google\.com/drive/(?:u/\d+/)?folders/([a-zA-Z0-9_-]+)")
        .expect("FOLDER_URL_PATTERN regex is invalid")
});

/// Resolve a file reference. Empty input is a missing identifier, not a bad one.
pub fn parse_file_ref(reference: &str) -> Result<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(DriveError::MissingFileId);
    }
    extract(reference, &FILE_URL_PATTERN)
}

/// Resolve a folder reference, defaulting to the root folder when empty.
pub fn parse_folder_ref(reference: &str) -> Result<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Ok(ROOT_ID.to_string());
    }
    extract(reference, &FOLDER_URL_PATTERN)
}

fn extract(reference: &str, url_pattern: &Regex) -> Result<String> {
    if ID_PATTERN.is_match(reference) {
        return Ok(reference.to_string());
    }
    url_pattern
        .captures(reference)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DriveError::InvalidFileReference(reference.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_ids() {
        assert_eq!(parse_file_ref("1ABC123XYZ789").unwrap(), "1ABC123XYZ789");
        assert_eq!(parse_folder_ref("root").unwrap(), "root");
        assert_eq!(parse_folder_ref("  a_b-c ").unwrap(), "a_b-c");
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            parse_file_ref("https://drive.google.com/file/d/1ABC-123_x/edit?usp=sharing").unwrap(),
            "1ABC-123_x"
        );
        assert_eq!(
            parse_folder_ref("https://drive.google.com/drive/u/0/folders/0BxFolder").unwrap(),
            "0BxFolder"
        );
    }

    #[test]
    fn test_empty_references() {
        assert!(matches!(parse_file_ref(""), Err(DriveError::MissingFileId)));
        assert_eq!(parse_folder_ref("").unwrap(), ROOT_ID);
    }

    #[test]
    fn test_invalid_references() {
        assert!(matches!(
            parse_file_ref("not an id"),
            Err(DriveError::InvalidFileReference(_))
        ));
        assert!(matches!(
            parse_folder_ref("https://example.com/folders/x y"),
            Err(DriveError::InvalidFileReference(_))
        ));
    }
}

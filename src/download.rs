//! Downloading a single file, exporting native documents on the way

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::entry::WORKSPACE_MIME_PREFIX;
use crate::error::{DriveError, Result};
use crate::fields::FieldSelection;
use crate::reference::parse_file_ref;
use crate::remote::DirectoryService;

/// Export format used when no conversion was chosen for a document kind.
pub const DEFAULT_EXPORT_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocsFormat {
    Html,
    Docx,
    Odt,
    Pdf,
    Rtf,
    Txt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SheetsFormat {
    Csv,
    Xlsx,
    Ods,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlidesFormat {
    Pptx,
    Odp,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DrawingsFormat {
    Jpeg,
    Pdf,
    Png,
    Svg,
}

impl DocsFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            DocsFormat::Html => "text/html",
            DocsFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocsFormat::Odt => "application/vnd.oasis.opendocument.text",
            DocsFormat::Pdf => DEFAULT_EXPORT_MIME,
            DocsFormat::Rtf => "application/rtf",
            DocsFormat::Txt => "text/plain",
        }
    }
}

impl SheetsFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            SheetsFormat::Csv => "text/csv",
            SheetsFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            SheetsFormat::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            SheetsFormat::Pdf => DEFAULT_EXPORT_MIME,
        }
    }
}

impl SlidesFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            SlidesFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            SlidesFormat::Odp => "application/vnd.oasis.opendocument.presentation",
            SlidesFormat::Pdf => DEFAULT_EXPORT_MIME,
        }
    }
}

impl DrawingsFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            DrawingsFormat::Jpeg => "image/jpeg",
            DrawingsFormat::Pdf => DEFAULT_EXPORT_MIME,
            DrawingsFormat::Png => "image/png",
            DrawingsFormat::Svg => "image/svg+xml",
        }
    }
}

/// Target formats for native documents, per document kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionFormats {
    pub docs: Option<DocsFormat>,
    pub sheets: Option<SheetsFormat>,
    pub slides: Option<SlidesFormat>,
    pub drawings: Option<DrawingsFormat>,
}

impl ConversionFormats {
    /// Export MIME type for `mime_type`, or `None` when the file has raw content.
    pub fn export_mime_type(&self, mime_type: &str) -> Option<&'static str> {
        let kind = mime_type.strip_prefix(WORKSPACE_MIME_PREFIX)?;
        let chosen = match kind {
            "document" => self.docs.map(DocsFormat::mime_type),
            "spreadsheet" => self.sheets.map(SheetsFormat::mime_type),
            "presentation" => self.slides.map(SlidesFormat::mime_type),
            "drawing" => self.drawings.map(DrawingsFormat::mime_type),
            _ => None,
        };
        Some(chosen.unwrap_or(DEFAULT_EXPORT_MIME))
    }
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub fields: FieldSelection,
    pub conversion: ConversionFormats,
    /// Key under `binary` describing the written file
    pub binary_property: String,
    pub output_dir: PathBuf,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            fields: FieldSelection::default(),
            conversion: ConversionFormats::default(),
            binary_property: "data".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Download one file and write it to `options.output_dir`.
///
/// Returns the fetched metadata with a `binary` object describing the written file.
pub fn download_file<S: DirectoryService>(
    service: &S,
    file_ref: &str,
    options: &DownloadOptions,
) -> Result<Value> {
    let id = parse_file_ref(file_ref)?;
    let mut metadata = service.get(&id, &options.fields.entry())?;

    let remote_mime = metadata
        .get("mimeType")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let file_name = metadata
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or("file")
        .to_string();

    let (bytes, mime_type) = match options.conversion.export_mime_type(&remote_mime) {
        Some(export_mime) => (service.export(&id, export_mime)?, export_mime.to_string()),
        None => (service.download(&id)?, remote_mime),
    };

    let path = write_output(&options.output_dir, &file_name, &bytes)?;
    info!(id = %id, path = %path.display(), size = bytes.len(), "downloaded file");

    let mut binary = Map::new();
    binary.insert(
        options.binary_property.clone(),
        json!({
            "fileName": file_name,
            "mimeType": mime_type,
            "path": path,
            "size": bytes.len(),
        }),
    );

    let Some(object) = metadata.as_object_mut() else {
        return Err(DriveError::Status {
            status: 502,
            body: format!("metadata for {id} is not an object"),
        });
    };
    object.insert("binary".to_string(), Value::Object(binary));
    Ok(metadata)
}

fn write_output(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let mut safe_name: String = file_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    // Must name a file inside `dir`.
    if matches!(safe_name.as_str(), "" | "." | "..") {
        safe_name = "file".to_string();
    }
    let path = dir.join(safe_name);
    fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::entry::DirectoryEntry;
    use crate::remote::{MemoryDirectoryService, RecordedRequest};

    fn options(dir: &TempDir) -> DownloadOptions {
        DownloadOptions {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_export_mime_selection() {
        let defaults = ConversionFormats::default();
        assert_eq!(defaults.export_mime_type("application/pdf"), None);
        assert_eq!(
            defaults.export_mime_type("application/vnd.google-apps.spreadsheet"),
            Some(DEFAULT_EXPORT_MIME)
        );

        let chosen = ConversionFormats {
            sheets: Some(SheetsFormat::Csv),
            drawings: Some(DrawingsFormat::Svg),
            ..Default::default()
        };
        assert_eq!(
            chosen.export_mime_type("application/vnd.google-apps.spreadsheet"),
            Some("text/csv")
        );
        assert_eq!(
            chosen.export_mime_type("application/vnd.google-apps.drawing"),
            Some("image/svg+xml")
        );
        assert_eq!(
            chosen.export_mime_type("application/vnd.google-apps.document"),
            Some(DEFAULT_EXPORT_MIME)
        );
    }

    #[test]
    fn test_downloads_raw_file() {
        let dir = TempDir::new().unwrap();
        let service = MemoryDirectoryService::new(vec![DirectoryEntry::new(
            "f1",
            "notes.txt",
            "text/plain",
        )])
        .with_content("f1", "hello")
        .with_request_log();

        let result = download_file(&service, "f1", &options(&dir)).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "hello");
        assert_eq!(result["name"], "notes.txt");
        assert_eq!(result["binary"]["data"]["mimeType"], "text/plain");
        assert_eq!(result["binary"]["data"]["size"], 5);
        assert!(service.requests().contains(&RecordedRequest::Download("f1".into())));
    }

    #[test]
    fn test_exports_native_document() {
        let dir = TempDir::new().unwrap();
        let service = MemoryDirectoryService::new(vec![DirectoryEntry::new(
            "d1",
            "Plan",
            "application/vnd.google-apps.document",
        )])
        .with_content("d1", "exported")
        .with_request_log();
        let mut opts = options(&dir);
        opts.conversion.docs = Some(DocsFormat::Txt);
        opts.binary_property = "file".to_string();

        let result = download_file(&service, "https://drive.google.com/file/d/d1/view", &opts)
            .unwrap();

        assert_eq!(result["binary"]["file"]["mimeType"], "text/plain");
        assert!(service.requests().contains(&RecordedRequest::Export {
            id: "d1".into(),
            mime_type: "text/plain".into()
        }));
        assert!(dir.path().join("Plan").exists());
    }

    #[test]
    fn test_missing_file_id() {
        let dir = TempDir::new().unwrap();
        let service = MemoryDirectoryService::default().with_request_log();
        assert!(matches!(
            download_file(&service, "", &options(&dir)),
            Err(DriveError::MissingFileId)
        ));
        assert!(service.requests().is_empty());
    }

    #[test]
    fn test_unknown_file_propagates_remote_error() {
        let dir = TempDir::new().unwrap();
        let service = MemoryDirectoryService::default();
        assert!(matches!(
            download_file(&service, "nope", &options(&dir)),
            Err(DriveError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn test_path_separators_in_name_are_replaced() {
        let dir = TempDir::new().unwrap();
        let service =
            MemoryDirectoryService::new(vec![DirectoryEntry::new("f", "a/b.txt", "text/plain")]);
        download_file(&service, "f", &options(&dir)).unwrap();
        assert!(dir.path().join("a_b.txt").exists());
    }

    #[test]
    fn test_dot_names_fall_back_to_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let service = MemoryDirectoryService::new(vec![
            DirectoryEntry::new("up", "..", "text/plain"),
            DirectoryEntry::new("here", ".", "text/plain"),
        ])
        .with_content("up", "parent")
        .with_content("here", "current");
        let mut opts = options(&dir);
        opts.output_dir = out.clone();

        download_file(&service, "up", &opts).unwrap();
        assert_eq!(fs::read_to_string(out.join("file")).unwrap(), "parent");

        download_file(&service, "here", &opts).unwrap();
        assert_eq!(fs::read_to_string(out.join("file")).unwrap(), "current");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}

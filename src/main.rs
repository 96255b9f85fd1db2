//! CLI entry point for drivetree

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use drivetree::download::{DocsFormat, DrawingsFormat, SheetsFormat, SlidesFormat};
use drivetree::{
    ClientConfig, ConversionFormats, DirectoryService, DownloadOptions, EnqueuePolicy, EntryFilter,
    FieldSelection, FileKind, HttpDirectoryService, MemoryDirectoryService, Operation,
    OutputConfig, OutputRecord, PropertyFilter, PropertyNamespaces, RunOptions, SortOrder,
    TreeFormatter, WalkerConfig, execute, print_json,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// JSON records on stdout
    #[default]
    Json,
    /// Console tree view (tree operation only)
    Pretty,
}

#[derive(Parser, Debug)]
#[command(name = "drivetree")]
#[command(about = "Walk a Google Drive folder hierarchy and print it as a tree or a flat list")]
#[command(version)]
struct Args {
    /// Items to process: folder ids or URLs, file ids or URLs, or search text
    #[arg(value_name = "ITEM")]
    items: Vec<String>,

    /// Operation to run for every item
    #[arg(short = 'o', long = "operation", default_value = "tree")]
    operation: Operation,

    /// Answer requests from a JSON snapshot instead of the Drive API
    #[arg(long = "snapshot", value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Keep only entries of this kind (can be used multiple times)
    #[arg(short = 't', long = "type")]
    kinds: Vec<FileKind>,

    /// Keep only entries whose MIME type matches this glob (can be used multiple times)
    #[arg(short = 'm', long = "mime-type")]
    mime_types: Vec<String>,

    /// Keep only entries with this property: [properties:|app-properties:]KEY=VALUE
    #[arg(short = 'p', long = "property", value_name = "FILTER")]
    properties: Vec<PropertyFilter>,

    /// Keep only entries matching this query, e.g. "name contains 'report'"
    #[arg(short = 'q', long = "query", default_value = "")]
    query: String,

    /// Fields requested for every entry (comma separated)
    #[arg(long = "fields", value_delimiter = ',', default_value = "id,name,mimeType")]
    fields: Vec<String>,

    /// Property namespaces copied into output records
    #[arg(long = "properties", default_value = "both")]
    namespaces: PropertyNamespaces,

    /// Include permissions in output records
    #[arg(long = "include-permissions")]
    include_permissions: bool,

    /// Include folders in flat-list output
    #[arg(long = "include-folders")]
    include_folders: bool,

    /// Emit one JSON line per flat-list entry
    #[arg(long = "split")]
    split: bool,

    /// When folders found in a listing are queued for expansion
    #[arg(long = "enqueue", default_value = "every-page")]
    enqueue: EnqueuePolicy,

    /// Leave shared drives out of listings
    #[arg(long = "no-shared-drives")]
    no_shared_drives: bool,

    /// Sort order of folder search results
    #[arg(long = "sort", default_value = "name-asc")]
    sort: SortOrder,

    /// Name filter for file search
    #[arg(long = "search", value_name = "TEXT")]
    search: Option<String>,

    /// Export format for Google Docs
    #[arg(long = "docs-format")]
    docs_format: Option<DocsFormat>,

    /// Export format for Google Sheets
    #[arg(long = "sheets-format")]
    sheets_format: Option<SheetsFormat>,

    /// Export format for Google Slides
    #[arg(long = "slides-format")]
    slides_format: Option<SlidesFormat>,

    /// Export format for Google Drawings
    #[arg(long = "drawings-format")]
    drawings_format: Option<DrawingsFormat>,

    /// Key of the binary descriptor in download output
    #[arg(long = "binary-property", default_value = "data")]
    binary_property: String,

    /// Directory downloaded files are written to
    #[arg(long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// Fetch every metadata field of downloaded files
    #[arg(long = "all-fields")]
    all_fields: bool,

    /// Record failing items as errors and keep going
    #[arg(long = "continue-on-fail")]
    continue_on_fail: bool,

    /// Output format
    #[arg(long = "format", default_value = "json")]
    format: OutputFormat,

    /// Show MIME types in the console tree view
    #[arg(long = "show-mime")]
    show_mime: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

impl Args {
    fn run_options(&self) -> drivetree::Result<RunOptions> {
        let mut types: Vec<String> = self
            .kinds
            .iter()
            .map(|k| k.mime_type().to_string())
            .collect();
        types.extend(self.mime_types.iter().cloned());
        let filter = EntryFilter::new(&types, self.properties.clone(), &self.query)?;

        let fields = FieldSelection {
            fields: self.fields.clone(),
            namespaces: self.namespaces,
            include_permissions: self.include_permissions,
            all_fields: self.all_fields,
        };

        Ok(RunOptions {
            operation: self.operation,
            filter,
            walker: WalkerConfig {
                fields: fields.clone(),
                enqueue: self.enqueue,
                all_drives: !self.no_shared_drives,
                ..Default::default()
            },
            include_folders: self.include_folders,
            split: self.split,
            download: DownloadOptions {
                fields,
                conversion: ConversionFormats {
                    docs: self.docs_format,
                    sheets: self.sheets_format,
                    slides: self.slides_format,
                    drawings: self.drawings_format,
                },
                binary_property: self.binary_property.clone(),
                output_dir: self.output_dir.clone(),
            },
            sort: self.sort,
            search: self.search.clone(),
            continue_on_fail: self.continue_on_fail,
        })
    }

    /// An empty item list means one item with default settings.
    fn items(&self) -> Vec<String> {
        if self.items.is_empty() {
            vec![String::new()]
        } else {
            self.items.clone()
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<S: DirectoryService>(service: &S, args: &Args) -> drivetree::Result<()> {
    let options = args.run_options()?;
    let records = execute(service, &args.items(), &options)?;

    match (args.format, options.operation) {
        (OutputFormat::Pretty, Operation::Tree) => {
            let formatter = TreeFormatter::new(OutputConfig {
                use_color: should_use_color(args.color),
                show_mime: args.show_mime,
            });
            for record in &records {
                match record {
                    OutputRecord::Tree(node) => formatter.print(node)?,
                    OutputRecord::Error { error } => eprintln!("drivetree: {}", error),
                    _ => {}
                }
            }
        }
        _ => print_json(&records, options.split)?,
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging();

    let result = match &args.snapshot {
        Some(path) => MemoryDirectoryService::from_path(path).and_then(|s| run(&s, &args)),
        None => ClientConfig::from_env()
            .and_then(HttpDirectoryService::new)
            .and_then(|s| run(&s, &args)),
    };

    if let Err(e) = result {
        eprintln!("drivetree: {}", e);
        process::exit(1);
    }
}

//! fieldprobe - Report which protobuf fields a corpus of messages populates
//!
//! This tool decodes every file under the given paths as one message type,
//! using a schema loaded at runtime, and prints the deduplicated tree of
//! field paths that any document populates.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use fieldprobe_core::{
    render, Collector, CollectorConfig, Format, IndentWriter, PathWriter, SchemaCatalog,
    StatsSink,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Report which protobuf fields a corpus of messages populates
#[derive(Parser, Debug)]
#[command(name = "fieldprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Fully-qualified name of the top-level message in every input file
    #[arg(short, long, env = "FIELDPROBE_MESSAGE")]
    message: String,

    /// File containing a serialized FileDescriptorSet with the schema
    #[arg(long, env = "FIELDPROBE_PROTOSET")]
    protoset: Option<PathBuf>,

    /// Document format: json (or text), otherwise binary protobuf
    #[arg(long, default_value = "json")]
    format: String,

    /// Keep repeated-element indices as distinct paths
    #[arg(long)]
    keep_indices: bool,

    /// Print the top-level message type as a `(pkg.Type)` root line.
    ///
    /// Off by default, so the tree starts at the top-level fields.
    #[arg(long)]
    include_root: bool,

    /// Output style
    #[arg(long, value_enum, default_value = "tree")]
    output: OutputStyle,

    /// Spaces per level in tree output
    #[arg(long, default_value = "3")]
    indent: usize,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Files or directories of documents to inspect
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

/// How the usage tree is printed
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputStyle {
    /// One path element per line, indented by depth
    Tree,
    /// One full path per line
    Paths,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Nothing is printed unless every document was processed
    let output = run(&cli)?;
    print!("{}", output);

    Ok(())
}

/// Build the catalog, process every document, and render the tree
fn run(cli: &Cli) -> Result<String> {
    let catalog = load_catalog(cli.protoset.as_deref())?;
    catalog
        .get_message(&cli.message)
        .with_context(|| format!("Cannot unmarshal top-level objects as {}", cli.message))?;

    let files = collect_files(&cli.paths)?;
    info!("Found {} input files", files.len());

    let format = Format::from_name(&cli.format);
    let config = CollectorConfig::new()
        .elide_list_index(!cli.keep_indices)
        .include_root(cli.include_root);
    let mut collector = Collector::new(config);

    for file in &files {
        debug!("Processing {} as {}", file.display(), format);
        collector
            .process_file(&cli.message, file, format, &catalog)
            .with_context(|| format!("Error getting field usage from {}", file.display()))?;
    }

    let documents = collector.documents();
    let trie = collector.into_trie();

    let mut stats = StatsSink::default();
    render(&trie, &mut stats)?;
    info!("Summary: {} documents, {}", documents, stats);

    let mut output = String::new();
    match cli.output {
        OutputStyle::Tree => {
            let mut writer = IndentWriter::new(&mut output).indent_str(" ".repeat(cli.indent));
            render(&trie, &mut writer)?;
        }
        OutputStyle::Paths => {
            render(&trie, &mut PathWriter::new(&mut output))?;
        }
    }

    Ok(output)
}

/// Load the schema catalog, falling back to the built-in global pool
fn load_catalog(protoset: Option<&Path>) -> Result<SchemaCatalog> {
    let Some(path) = protoset else {
        let catalog = SchemaCatalog::global();
        if catalog.is_empty() {
            warn!("No --protoset given and no schemas are built in");
        }
        return Ok(catalog);
    };

    let catalog = SchemaCatalog::from_file(path).with_context(|| {
        format!(
            "Could not create the type catalog from protoset {}",
            path.display()
        )
    })?;
    info!("Loaded {} types from {}", catalog.len(), path.display());

    Ok(catalog)
}

/// Expand the input paths into the files to process, in walk order
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in paths {
        if !root.exists() {
            bail!("Input path does not exist: {}", root.display());
        }

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if entry.file_type().is_dir() {
                continue;
            }
            trace!("Queued {}", entry.path().display());
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

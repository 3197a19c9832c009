//! unnest: Flatten nested JSON entries into an ID-keyed map
//!
//! Usage:
//!   # Read from file, pretty map to stdout
//!   unnest post.json
//!
//!   # Read from stdin with custom field names
//!   echo '{"_id": "p1", "__typename": "Post"}' | unnest --id-key _id --type-key __typename
//!
//!   # Merge every record of an NDJSON file, one entry per output line
//!   unnest --ndjson events.jsonl --lines
//!
//!   # Write one .jsonl file per entry type
//!   unnest response.json --output-dir ./entries

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unnest::{
    unwrap_json, EntryMap, LineWriter, MapWriter, TypeWriter, UnwrapOptions, Unwrapper,
};

#[derive(Parser, Debug)]
#[command(name = "unnest")]
#[command(about = "Flatten nested JSON entries into an ID-keyed map", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Process newline-delimited JSON and merge every record into one map
    #[arg(long)]
    ndjson: bool,

    /// JSON file with `idKey` / `typeKey` settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Field holding each entry's ID (default: "id")
    #[arg(long)]
    id_key: Option<String>,

    /// Field holding each entry's type (default: "type")
    #[arg(long)]
    type_key: Option<String>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Write one JSON line per entry instead of a single map
    #[arg(long, conflicts_with = "output_dir")]
    lines: bool,

    /// Output directory for separate .jsonl files per entry type
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let options = load_options(&args)?;
    let unwrapper = Unwrapper::from_options(Some(&options));
    tracing::debug!(config = ?unwrapper.config(), "resolved options");

    let content = read_input(args.input.as_ref())?;
    let entries = if args.ndjson {
        unwrap_json(content.as_slice(), &unwrapper)?
    } else {
        unwrap_document(content, &unwrapper)?
    };

    tracing::info!(entries = entries.len(), "unwrapped input");
    write_output(&args, &entries, &unwrapper)
}

/// Layer defaults, the optional config file and command-line flags
fn load_options(args: &Args) -> Result<UnwrapOptions> {
    let mut options = UnwrapOptions::new();

    if let Some(path) = &args.config {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config: {}", path.display()))?;
        let from_file: UnwrapOptions = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        options = options.layer(from_file);
    }

    Ok(options.layer(UnwrapOptions {
        id_key: args.id_key.clone(),
        type_key: args.type_key.clone(),
    }))
}

fn read_input(input: Option<&PathBuf>) -> Result<Vec<u8>> {
    let reader = if let Some(path) = input {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input: {}", path.display()))?;
        Box::new(file) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };

    let mut content = Vec::new();
    BufReader::new(reader)
        .read_to_end(&mut content)
        .context("Failed to read input")?;
    Ok(content)
}

/// Unwrap a single JSON document; a top-level array is a list of roots
fn unwrap_document(content: Vec<u8>, unwrapper: &Unwrapper) -> Result<EntryMap> {
    // Try SIMD parsing first, fall back to serde_json for a precise error
    let value: Value = match simd_json::serde::from_slice(&mut content.clone()) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "simd-json parse failed, retrying with serde_json");
            serde_json::from_slice(&content).context("Failed to parse JSON")?
        }
    };

    let entries = match &value {
        Value::Array(roots) => unwrapper.unwrap_entry_list(roots),
        root => unwrapper.unwrap_value(root),
    }
    .context("Failed to unwrap input")?;

    Ok(entries)
}

fn write_output(args: &Args, entries: &EntryMap, unwrapper: &Unwrapper) -> Result<()> {
    if let Some(output_dir) = &args.output_dir {
        let mut writer = TypeWriter::new(output_dir, unwrapper.config())?;
        writer.write_entries(entries)?;
        return writer.flush();
    }

    let stdout = std::io::stdout().lock();
    if args.lines {
        let mut writer = LineWriter::new(stdout);
        writer.write_entries(entries)?;
        writer.flush()
    } else {
        let mut writer = MapWriter::new(stdout);
        if args.compact {
            writer = writer.compact();
        }
        writer.write_map(entries)?;
        writer.flush()
    }
}

use crate::unwrap::types::{EntryMap, UnwrapConfig};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes a whole entry map as a single JSON object
pub struct MapWriter<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> MapWriter<W> {
    pub fn new(writer: W) -> Self {
        MapWriter { writer, pretty: true }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn write_map(&mut self, entries: &EntryMap) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(entries)
        } else {
            serde_json::to_string(entries)
        }
        .context("Failed to serialize entry map")?;

        writeln!(self.writer, "{}", json).context("Failed to write entry map")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

/// Writes one JSON line per entry, tagged with its map key
pub struct LineWriter<W: Write> {
    writer: W,
}

impl<W: Write> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        LineWriter { writer }
    }

    pub fn write_entries(&mut self, entries: &EntryMap) -> Result<()> {
        for (id, entry) in entries.iter() {
            let mut data = entry.clone();
            data.insert("_entry_id".to_string(), Value::String(id.to_string()));

            let json = serde_json::to_string(&data).context("Failed to serialize entry")?;
            writeln!(self.writer, "{}", json).context("Failed to write entry")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

/// Writes entries to JSON Lines files in a directory, one file per entry type
pub struct TypeWriter {
    output_dir: PathBuf,
    type_key: String,
    writers: HashMap<String, BufWriter<File>>,
}

impl TypeWriter {
    /// Create the output directory and a writer grouping by `config.type_key`
    pub fn new<P: AsRef<Path>>(output_dir: P, config: &UnwrapConfig) -> Result<Self> {
        std::fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

        Ok(TypeWriter {
            output_dir: output_dir.as_ref().to_path_buf(),
            type_key: config.type_key.clone(),
            writers: HashMap::new(),
        })
    }

    /// File stem for a type discriminator; non-string types use their JSON text
    fn file_stem(entry_type: Option<&Value>) -> String {
        let raw = match entry_type {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::from("untyped"),
        };

        raw.chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }

    pub fn write_entries(&mut self, entries: &EntryMap) -> Result<()> {
        for (_, entry) in entries.iter() {
            let stem = Self::file_stem(entry.get(&self.type_key));

            if !self.writers.contains_key(&stem) {
                let path = self.output_dir.join(format!("{}.jsonl", stem));
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("Failed to open file: {}", path.display()))?;
                tracing::debug!(path = %path.display(), "opened type file");
                self.writers.insert(stem.clone(), BufWriter::new(file));
            }

            let Some(writer) = self.writers.get_mut(&stem) else {
                continue;
            };
            let json = serde_json::to_string(entry).context("Failed to serialize entry")?;
            writeln!(writer, "{}", json).context("Failed to write entry")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        for writer in self.writers.values_mut() {
            writer.flush().context("Failed to flush writer")?;
        }
        Ok(())
    }
}

//! Append-only JSON-lines save files shared by the simulation modules.
use std::{
    fs::{create_dir_all, File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::{de::DeserializeOwned, Serialize};

/// Asks every module with saved state to append a snapshot this tick.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct SaveRequested;

/// Buffered writer for one `.jsonl` save file.
#[derive(Resource, Debug)]
pub struct JsonLinesLog<T: Send + Sync + 'static> {
    output_path: PathBuf,
    pending: Vec<T>,
}

impl<T: Serialize + Send + Sync + 'static> JsonLinesLog<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: T) {
        self.pending.push(record);
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        let records = std::mem::take(&mut self.pending);
        for record in &records {
            serde_json::to_writer(&mut file, record)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(records.len())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Reads every parseable record from a save file. Blank lines are skipped;
/// malformed lines (such as a torn final append) are skipped with a warning.
pub fn read_json_lines<T: DeserializeOwned>(path: impl AsRef<Path>) -> std::io::Result<Vec<T>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                "Skipping malformed line {} in {:?}: {}",
                index + 1,
                path,
                err
            ),
        }
    }
    Ok(records)
}

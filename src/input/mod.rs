//! Loads the MAC → status plan from CSV.
//!
//! The first row is a header and is discarded. Each data row is read
//! positionally as `mac,status`; further columns are ignored. Fields are
//! taken verbatim, surrounding whitespace included.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacStatusEntry {
    pub mac: String,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read CSV file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected at least 2 fields (mac,status), found {fields}")]
    Format { line: u64, fields: usize },
    #[error("malformed CSV: {0}")]
    Syntax(#[from] csv::Error),
}

/// Read the plan from `path`, preserving row order.
pub fn load_mac_statuses(path: &Path) -> Result<Vec<MacStatusEntry>, InputError> {
    let file = File::open(path).map_err(|source| InputError::File {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Reading MAC statuses from {}", path.display());
    parse_mac_statuses(file)
}

pub fn parse_mac_statuses<R: Read>(reader: R) -> Result<Vec<MacStatusEntry>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < 2 {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(InputError::Format {
                line,
                fields: record.len(),
            });
        }

        entries.push(MacStatusEntry {
            mac: record[0].to_string(),
            status: record[1].to_string(),
        });
    }

    Ok(entries)
}

//! Flat-table readers for the annotation sources.

pub mod pathway;
pub mod sl_pairs;
pub mod string;

use std::path::Path;

use anyhow::{Context, Result};
use lethyx_common::LethyxError;

/// Open a delimited table. The delimiter must be a single ASCII character.
pub(crate) fn open_table(
    path: &Path,
    delimiter: char,
    has_headers: bool,
) -> Result<csv::Reader<std::fs::File>> {
    if !delimiter.is_ascii() {
        return Err(LethyxError::Config(format!(
            "table delimiter must be ASCII, got {:?}",
            delimiter
        ))
        .into());
    }
    csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))
}

/// Position of the first header matching any of `names` (case-insensitive).
pub(crate) fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

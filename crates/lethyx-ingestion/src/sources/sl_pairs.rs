//! Known synthetic lethal pairs.
//!
//! Pair tables (e.g. SynLethDB exports) carry a relationship source column;
//! pairs whose source is a computational prediction are separated from
//! experimentally supported pairs before training.

use std::path::Path;

use anyhow::{Context, Result};
use lethyx_common::{KnownPairSet, LethyxError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{find_column, open_table};

/// Relationship source marking predicted (not experimentally observed) pairs.
pub const COMPUTATIONAL_SOURCE: &str = "Computational Prediction";

/// One known SL pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlPairRecord {
    pub gene_a: String,
    pub gene_b: String,
    pub rel_source: Option<String>,
}

impl SlPairRecord {
    pub fn new(gene_a: impl Into<String>, gene_b: impl Into<String>) -> Self {
        Self {
            gene_a: gene_a.into(),
            gene_b: gene_b.into(),
            rel_source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.rel_source = Some(source.into());
        self
    }

    pub fn is_computational(&self) -> bool {
        self.rel_source.as_deref() == Some(COMPUTATIONAL_SOURCE)
    }
}

/// Load a pair table with a header row.
///
/// Gene columns: `gene_a`/`gene_b` (also `n1.name`/`n2.name`).
/// The source column is `rel_source` (also `r.rel_source`); a header spelled
/// `rel_surce` is accepted as the same column.
pub fn load(path: &Path, delimiter: char) -> Result<Vec<SlPairRecord>> {
    let mut reader = open_table(path, delimiter, true)?;
    let headers = reader.headers()?.clone();

    let col_a = find_column(&headers, &["gene_a", "n1.name", "gene1"])
        .ok_or_else(|| LethyxError::schema(path.display().to_string(), "missing gene_a column"))?;
    let col_b = find_column(&headers, &["gene_b", "n2.name", "gene2"])
        .ok_or_else(|| LethyxError::schema(path.display().to_string(), "missing gene_b column"))?;
    let col_source = find_column(&headers, &["rel_source", "r.rel_source"]).or_else(|| {
        let misspelled = find_column(&headers, &["rel_surce", "r.rel_surce"]);
        if misspelled.is_some() {
            warn!("Pair table uses misspelled 'rel_surce' header; reading it as rel_source");
        }
        misspelled
    });

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.with_context(|| format!("Failed to read {:?}", path))?;
        let (Some(a), Some(b)) = (row.get(col_a), row.get(col_b)) else {
            continue;
        };
        if a.is_empty() || b.is_empty() {
            continue;
        }
        records.push(SlPairRecord {
            gene_a: a.to_string(),
            gene_b: b.to_string(),
            rel_source: col_source
                .and_then(|c| row.get(c))
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        });
    }

    info!(n_pairs = records.len(), "Loaded known SL pairs");
    Ok(records)
}

/// Split records into (observed, computationally predicted).
pub fn partition_by_source(records: Vec<SlPairRecord>) -> (Vec<SlPairRecord>, Vec<SlPairRecord>) {
    let (computational, observed): (Vec<_>, Vec<_>) =
        records.into_iter().partition(SlPairRecord::is_computational);
    info!(
        n_observed = observed.len(),
        n_computational = computational.len(),
        "Separated computationally predicted SL pairs"
    );
    (observed, computational)
}

/// Canonicalized set of the given pairs.
pub fn known_pair_set(records: &[SlPairRecord]) -> KnownPairSet {
    records
        .iter()
        .map(|r| (r.gene_a.as_str(), r.gene_b.as_str()))
        .collect()
}

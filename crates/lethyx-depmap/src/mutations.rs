//! Binary somatic mutation matrix.
//!
//! Accepts either a ready binary matrix (cell lines x genes, any value > 0 is
//! mutated) or long-form mutation calls (`ModelID`, `HugoSymbol`, optional
//! `isDeleterious`) which are collapsed into a matrix.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use lethyx_common::LethyxError;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::gene_symbol_from_header;

/// One mutation call from a long-form mutation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationCall {
    pub cell_line: String,
    pub gene: String,
    /// `Some(false)` calls are dropped whenever the table carries the flag.
    pub deleterious: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawMutationCall {
    #[serde(rename = "ModelID")]
    model_id: String,
    #[serde(rename = "HugoSymbol")]
    hugo_symbol: String,
    #[serde(rename = "isDeleterious", default)]
    is_deleterious: Option<String>,
}

/// Immutable binary mutation matrix.
#[derive(Debug, Clone)]
pub struct MutationMatrix {
    cell_lines: Vec<String>,
    cell_index: HashMap<String, usize>,
    genes: Vec<String>,
    gene_index: HashMap<String, usize>,
    columns: Vec<Vec<bool>>,
}

impl MutationMatrix {
    /// Build from per-gene columns aligned to `cell_lines`.
    pub fn from_columns<I>(cell_lines: Vec<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<bool>)>,
    {
        let cell_index = cell_lines
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut genes = Vec::new();
        let mut gene_index = HashMap::new();
        let mut values = Vec::new();
        for (gene, column) in columns {
            if column.len() != cell_lines.len() {
                return Err(LethyxError::schema(
                    "mutation matrix",
                    format!(
                        "column {} has {} values, expected {}",
                        gene,
                        column.len(),
                        cell_lines.len()
                    ),
                )
                .into());
            }
            if gene_index.contains_key(&gene) {
                warn!(gene = %gene, "Duplicate mutation column, keeping first occurrence");
                continue;
            }
            gene_index.insert(gene.clone(), genes.len());
            genes.push(gene);
            values.push(column);
        }

        Ok(Self {
            cell_lines,
            cell_index,
            genes,
            gene_index,
            columns: values,
        })
    }

    /// Collapse long-form calls into a binary matrix.
    ///
    /// When any call carries a deleterious flag, only calls flagged
    /// deleterious are kept. Cell lines and genes are sorted.
    pub fn from_calls(calls: &[MutationCall]) -> Result<Self> {
        let filter_deleterious = calls.iter().any(|c| c.deleterious.is_some());
        let kept: Vec<&MutationCall> = calls
            .iter()
            .filter(|c| !filter_deleterious || c.deleterious == Some(true))
            .collect();
        if filter_deleterious {
            info!(n_calls = kept.len(), "Filtered to damaging mutations");
        }

        let cell_lines: Vec<String> = kept
            .iter()
            .map(|c| c.cell_line.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let row_of: HashMap<&str, usize> = cell_lines
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut columns: BTreeMap<String, Vec<bool>> = BTreeMap::new();
        for call in kept {
            let row = row_of[call.cell_line.as_str()];
            columns
                .entry(call.gene.clone())
                .or_insert_with(|| vec![false; cell_lines.len()])[row] = true;
        }

        Self::from_columns(cell_lines, columns)
    }

    /// Load a mutation table, detecting long-form calls by their
    /// `ModelID`/`HugoSymbol` header; anything else is read as a matrix.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading mutations from {:?}", path);
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open mutation file {:?}", path))?;
        let headers = reader.headers()?.clone();
        let long_form = headers.iter().any(|h| h == "ModelID") && headers.iter().any(|h| h == "HugoSymbol");
        drop(reader);

        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open mutation file {:?}", path))?;
        let matrix = if long_form {
            Self::calls_from_reader(file)
        } else {
            Self::matrix_from_reader(file)
        }
        .with_context(|| format!("Failed to parse mutation file {:?}", path))?;

        info!(
            n_genes = matrix.gene_count(),
            n_cell_lines = matrix.cell_line_count(),
            long_form,
            "Loaded mutation data"
        );
        Ok(matrix)
    }

    /// Parse a binary matrix CSV (first column cell line ID, gene columns).
    pub fn matrix_from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        let gene_names: Vec<String> = headers
            .iter()
            .skip(1)
            .map(|h| gene_symbol_from_header(h).to_string())
            .collect();

        let mut cell_lines = Vec::new();
        let mut columns: Vec<Vec<bool>> = vec![Vec::new(); gene_names.len()];
        for result in reader.records() {
            let record = result?;
            let Some(cell_line) = record.get(0) else {
                continue;
            };
            cell_lines.push(cell_line.trim().to_string());
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(record.get(i + 1).map(parse_mutated).unwrap_or(false));
            }
        }

        Self::from_columns(cell_lines, gene_names.into_iter().zip(columns))
    }

    /// Parse a long-form call table and collapse it.
    pub fn calls_from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut calls = Vec::new();
        for result in reader.deserialize::<RawMutationCall>() {
            let raw = result?;
            calls.push(MutationCall {
                cell_line: raw.model_id.trim().to_string(),
                gene: raw.hugo_symbol.trim().to_string(),
                deleterious: raw.is_deleterious.as_deref().and_then(parse_flag),
            });
        }
        Self::from_calls(&calls)
    }

    /// Mutation status of a gene across this matrix's own cell lines.
    pub fn column(&self, gene: &str) -> Option<&[bool]> {
        self.gene_index
            .get(gene)
            .map(|&idx| self.columns[idx].as_slice())
    }

    pub fn has_gene(&self, gene: &str) -> bool {
        self.gene_index.contains_key(gene)
    }

    /// Fraction of this matrix's cell lines in which the gene is mutated.
    pub fn frequency(&self, gene: &str) -> Option<f64> {
        let column = self.column(gene)?;
        if column.is_empty() {
            return Some(0.0);
        }
        let mutated = column.iter().filter(|&&m| m).count();
        Some(mutated as f64 / column.len() as f64)
    }

    /// Mutation mask re-indexed onto another cell-line ordering.
    ///
    /// Cell lines absent from this matrix were never profiled and map to
    /// `None`, not to wild-type.
    pub fn aligned_mask(&self, gene: &str, cell_lines: &[String]) -> Option<Vec<Option<bool>>> {
        let column = self.column(gene)?;
        Some(
            cell_lines
                .iter()
                .map(|id| self.cell_index.get(id).map(|&row| column[row]))
                .collect(),
        )
    }

    pub fn is_profiled(&self, cell_line: &str) -> bool {
        self.cell_index.contains_key(cell_line)
    }

    pub fn cell_lines(&self) -> &[String] {
        &self.cell_lines
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn cell_line_count(&self) -> usize {
        self.cell_lines.len()
    }
}

fn parse_mutated(raw: &str) -> bool {
    let raw = raw.trim();
    parse_flag(raw).unwrap_or_else(|| raw.parse::<f64>().map(|v| v > 0.0).unwrap_or(false))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

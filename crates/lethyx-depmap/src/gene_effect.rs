//! Gene effect matrix: cell lines x genes, column-major.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use lethyx_common::LethyxError;
use tracing::{debug, info, warn};

use crate::{gene_symbol_from_header, parse_effect};

/// Immutable gene effect matrix.
///
/// Values are stored per gene in cell-line order; missing scores are NaN.
#[derive(Debug, Clone)]
pub struct GeneEffectMatrix {
    cell_lines: Vec<String>,
    genes: Vec<String>,
    gene_index: HashMap<String, usize>,
    columns: Vec<Vec<f64>>,
}

impl GeneEffectMatrix {
    /// Build from per-gene columns aligned to `cell_lines`.
    ///
    /// Duplicate gene symbols keep the first column.
    pub fn from_columns<I>(cell_lines: Vec<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        let mut genes = Vec::new();
        let mut gene_index = HashMap::new();
        let mut values = Vec::new();

        for (gene, column) in columns {
            if column.len() != cell_lines.len() {
                return Err(LethyxError::schema(
                    "gene effect",
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
                warn!(gene = %gene, "Duplicate gene column, keeping first occurrence");
                continue;
            }
            gene_index.insert(gene.clone(), genes.len());
            genes.push(gene);
            values.push(column);
        }

        Ok(Self {
            cell_lines,
            genes,
            gene_index,
            columns: values,
        })
    }

    /// Load from a CSV whose first column is the cell line ID and whose
    /// remaining header cells are gene symbols.
    pub fn load_csv(path: &Path) -> Result<Self> {
        debug!("Loading gene effects from {:?}", path);
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open gene effect file {:?}", path))?;
        let matrix = Self::from_reader(file)
            .with_context(|| format!("Failed to parse gene effect file {:?}", path))?;
        info!(
            n_genes = matrix.gene_count(),
            n_cell_lines = matrix.cell_line_count(),
            "Loaded CRISPR gene effect data"
        );
        Ok(matrix)
    }

    /// Parse CSV content from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(LethyxError::schema(
                "gene effect",
                "expected a cell line column followed by gene columns",
            )
            .into());
        }
        let gene_names: Vec<String> = headers
            .iter()
            .skip(1)
            .map(|h| gene_symbol_from_header(h).to_string())
            .collect();

        let mut cell_lines = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); gene_names.len()];

        for result in reader.records() {
            let record = result?;
            let Some(cell_line) = record.get(0) else {
                continue;
            };
            cell_lines.push(cell_line.trim().to_string());
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(record.get(i + 1).map(parse_effect).unwrap_or(f64::NAN));
            }
        }

        Self::from_columns(cell_lines, gene_names.into_iter().zip(columns))
    }

    /// Effect scores of a gene across all cell lines, in cell-line order.
    pub fn column(&self, gene: &str) -> Option<&[f64]> {
        self.gene_index
            .get(gene)
            .map(|&idx| self.columns[idx].as_slice())
    }

    pub fn has_gene(&self, gene: &str) -> bool {
        self.gene_index.contains_key(gene)
    }

    /// Cell line identifiers, in row order.
    pub fn cell_lines(&self) -> &[String] {
        &self.cell_lines
    }

    /// Gene symbols, in column order. This is the gene universe for sampling.
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

//! STRING protein-protein interaction evidence.
//!
//! STRING scores every interaction on a 0–1000 scale, overall
//! (`combined_score`) and per evidence channel:
//!   - experimental: lab-verified interactions
//!   - database: curated interaction databases
//!   - coexpression: correlated expression patterns
//!   - neighborhood: chromosomal proximity
//!   - fusion: gene fusion events
//!   - cooccurrence: phylogenetic co-occurrence
//!   - textmining: literature co-mentions
//!
//! The index is keyed by gene symbol. Raw STRING link files name proteins
//! by STRING id (`9606.ENSP…`); those are mapped to symbols through the
//! STRING protein info table before indexing.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use lethyx_common::{GenePair, LethyxError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{find_column, open_table};

/// Upper bound of every STRING score.
pub const STRING_SCORE_SCALE: f64 = 1000.0;

/// Per-channel evidence scores for one interaction (0–1000 each).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceScores {
    pub neighborhood: u32,
    pub fusion: u32,
    pub cooccurrence: u32,
    pub coexpression: u32,
    pub experimental: u32,
    pub database: u32,
    pub textmining: u32,
    pub combined_score: u32,
}

impl EvidenceScores {
    /// The six non-textmining channels, used for evidence diversity.
    pub fn structured_channels(&self) -> [u32; 6] {
        [
            self.experimental,
            self.database,
            self.coexpression,
            self.neighborhood,
            self.fusion,
            self.cooccurrence,
        ]
    }
}

/// STRING protein id → preferred gene symbol.
#[derive(Debug, Clone, Default)]
pub struct ProteinNames {
    names: HashMap<String, String>,
}

impl ProteinNames {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }

    /// Load a STRING protein info table (`#string_protein_id`, `preferred_name`).
    pub fn load(path: &Path, delimiter: char) -> Result<Self> {
        let mut reader = open_table(path, delimiter, true)?;
        let headers = reader.headers()?.clone();
        let col_id = find_column(&headers, &["#string_protein_id", "string_protein_id", "protein_external_id"])
            .ok_or_else(|| LethyxError::schema(path.display().to_string(), "missing #string_protein_id column"))?;
        let col_name = find_column(&headers, &["preferred_name"])
            .ok_or_else(|| LethyxError::schema(path.display().to_string(), "missing preferred_name column"))?;

        let mut names = HashMap::new();
        for result in reader.records() {
            let row = result.with_context(|| format!("Failed to read {:?}", path))?;
            if let (Some(id), Some(name)) = (row.get(col_id), row.get(col_name)) {
                if !id.is_empty() && !name.is_empty() {
                    names.insert(id.to_string(), name.to_string());
                }
            }
        }
        info!(n_proteins = names.len(), "Loaded STRING protein names");
        Ok(Self { names })
    }

    pub fn resolve(&self, protein_id: &str) -> Option<&str> {
        self.names.get(protein_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One row of an interaction table.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub gene_a: String,
    pub gene_b: String,
    pub scores: EvidenceScores,
}

/// Interaction evidence keyed by canonicalized gene pair.
#[derive(Debug, Clone, Default)]
pub struct InteractionIndex {
    pairs: HashMap<GenePair, EvidenceScores>,
    min_combined_score: u32,
}

impl InteractionIndex {
    /// Build from records, keeping pairs with `combined_score >= min_combined_score`.
    ///
    /// Self-interactions are dropped. When a pair appears more than once
    /// (e.g. both orientations) the record with the higher combined score wins.
    pub fn from_records<I>(records: I, min_combined_score: u32) -> Self
    where
        I: IntoIterator<Item = InteractionRecord>,
    {
        let mut pairs: HashMap<GenePair, EvidenceScores> = HashMap::new();
        let mut below_threshold = 0usize;

        for record in records {
            if record.scores.combined_score < min_combined_score {
                below_threshold += 1;
                continue;
            }
            let pair = GenePair::new(record.gene_a, record.gene_b);
            if pair.is_self_pair() {
                continue;
            }
            pairs
                .entry(pair)
                .and_modify(|existing| {
                    if record.scores.combined_score > existing.combined_score {
                        *existing = record.scores;
                    }
                })
                .or_insert(record.scores);
        }

        debug!(
            n_pairs = pairs.len(),
            below_threshold,
            min_combined_score,
            "Built interaction index"
        );
        Self {
            pairs,
            min_combined_score,
        }
    }

    /// Load an interaction table with a header row.
    ///
    /// Gene columns: `gene_a`/`gene_b` (also `gene1`/`gene2`). A raw STRING
    /// table with `protein1`/`protein2` columns needs `names` to map its ids
    /// to gene symbols; rows with an unknown id are dropped. Channel columns
    /// are matched by name; absent channels read as 0.
    pub fn load(
        path: &Path,
        delimiter: char,
        min_combined_score: u32,
        names: Option<&ProteinNames>,
    ) -> Result<Self> {
        let mut reader = open_table(path, delimiter, true)?;
        let headers = reader.headers()?.clone();
        let source = path.display().to_string();

        let symbol_cols = (
            find_column(&headers, &["gene_a", "gene1", "preferred_name_a"]),
            find_column(&headers, &["gene_b", "gene2", "preferred_name_b"]),
        );
        let protein_cols = (
            find_column(&headers, &["protein1"]),
            find_column(&headers, &["protein2"]),
        );
        let (col_a, col_b, names) = match (symbol_cols, protein_cols) {
            ((Some(a), Some(b)), _) => (a, b, None),
            (_, (Some(a), Some(b))) => {
                let names = names.ok_or_else(|| {
                    LethyxError::schema(
                        source.clone(),
                        "protein1/protein2 hold STRING protein ids; a protein info table is required",
                    )
                })?;
                (a, b, Some(names))
            }
            _ => return Err(LethyxError::schema(source.clone(), "missing gene_a/gene_b columns").into()),
        };
        let col_combined = find_column(&headers, &["combined_score"])
            .ok_or_else(|| LethyxError::schema(source.clone(), "missing combined_score column"))?;

        let channel = |names: &[&str]| find_column(&headers, names);
        let cols = ChannelColumns {
            neighborhood: channel(&["neighborhood"]),
            fusion: channel(&["fusion"]),
            cooccurrence: channel(&["cooccurrence", "cooccurence"]),
            coexpression: channel(&["coexpression"]),
            experimental: channel(&["experimental", "experiments"]),
            database: channel(&["database"]),
            textmining: channel(&["textmining"]),
        };

        let mut records = Vec::new();
        let mut unmapped = 0usize;
        for result in reader.records() {
            let row = result.with_context(|| format!("Failed to read {:?}", path))?;
            let (Some(a), Some(b)) = (row.get(col_a), row.get(col_b)) else {
                continue;
            };
            let (a, b) = match names {
                Some(names) => match (names.resolve(a), names.resolve(b)) {
                    (Some(a), Some(b)) => (a, b),
                    _ => {
                        unmapped += 1;
                        continue;
                    }
                },
                None => (a, b),
            };
            let score = |col: Option<usize>| {
                col.and_then(|c| row.get(c))
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(0)
            };
            records.push(InteractionRecord {
                gene_a: a.to_string(),
                gene_b: b.to_string(),
                scores: EvidenceScores {
                    neighborhood: score(cols.neighborhood),
                    fusion: score(cols.fusion),
                    cooccurrence: score(cols.cooccurrence),
                    coexpression: score(cols.coexpression),
                    experimental: score(cols.experimental),
                    database: score(cols.database),
                    textmining: score(cols.textmining),
                    combined_score: score(Some(col_combined)),
                },
            });
        }

        if unmapped > 0 {
            warn!(unmapped, "Dropped interactions with unknown STRING protein ids");
        }
        let n_rows = records.len();
        let index = Self::from_records(records, min_combined_score);
        info!(
            n_rows,
            n_pairs = index.len(),
            min_combined_score,
            "Loaded interaction data"
        );
        Ok(index)
    }

    /// Evidence for a pair, in either order.
    pub fn get(&self, gene_a: &str, gene_b: &str) -> Option<&EvidenceScores> {
        self.pairs.get(&GenePair::new(gene_a, gene_b))
    }

    pub fn contains(&self, gene_a: &str, gene_b: &str) -> bool {
        self.get(gene_a, gene_b).is_some()
    }

    pub fn min_combined_score(&self) -> u32 {
        self.min_combined_score
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

struct ChannelColumns {
    neighborhood: Option<usize>,
    fusion: Option<usize>,
    cooccurrence: Option<usize>,
    coexpression: Option<usize>,
    experimental: Option<usize>,
    database: Option<usize>,
    textmining: Option<usize>,
}

// ── Tests ───────────────────────────────────────────────────────────────────

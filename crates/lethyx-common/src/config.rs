//! Configuration for feature extraction runs.
//!
//! Read from a TOML file: the path in `LETHYX_CONFIG`, else `lethyx.toml` in
//! the working directory, else the built-in defaults. Every field has a
//! default so a partial file is enough.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{LethyxError, Result};

/// Environment variable holding the config file path.
pub const CONFIG_ENV: &str = "LETHYX_CONFIG";

/// Environment variable overriding `data.dir`.
pub const DATA_DIR_ENV: &str = "LETHYX_DATA_DIR";

/// Default config file name in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lethyx.toml";

/// Complete run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LethyxConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub interaction: InteractionConfig,

    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

// ── Data Files ────────────────────────────────────────────────────────────────

/// Locations of the cleaned input tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding all input tables
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// Gene effect matrix (cell lines x genes)
    #[serde(default = "default_gene_effect_file")]
    pub gene_effect_file: String,

    /// Binary mutation matrix (cell lines x genes); optional input
    #[serde(default = "default_mutation_file")]
    pub mutation_file: Option<String>,

    /// Interaction table with evidence channels, keyed by gene symbol or
    /// by STRING protein id; optional input
    #[serde(default = "default_interaction_file")]
    pub interaction_file: Option<String>,

    /// STRING protein info table (`#string_protein_id`, `preferred_name`),
    /// needed when the interaction table is keyed by protein id
    #[serde(default = "default_protein_info_file")]
    pub protein_info_file: Option<String>,

    /// Gene → pathway link table; optional input
    #[serde(default = "default_pathway_file")]
    pub pathway_file: Option<String>,

    /// Known synthetic lethal pairs
    #[serde(default = "default_sl_pairs_file")]
    pub sl_pairs_file: String,
}

/// `<cache dir>/lethyx/data`, or `./data` when no cache dir is known.
fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("lethyx").join("data"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn default_gene_effect_file() -> String { "CRISPRGeneEffect.csv".to_string() }
fn default_mutation_file() -> Option<String> { Some("OmicsSomaticMutationsMatrixDamaging.csv".to_string()) }
fn default_interaction_file() -> Option<String> { Some("string_interactions.txt".to_string()) }
fn default_protein_info_file() -> Option<String> { Some("string_protein_info.txt".to_string()) }
fn default_pathway_file() -> Option<String> { Some("kegg_gene_pathways.tsv".to_string()) }
fn default_sl_pairs_file() -> String { "sl_pairs.csv".to_string() }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            gene_effect_file: default_gene_effect_file(),
            mutation_file: default_mutation_file(),
            interaction_file: default_interaction_file(),
            protein_info_file: default_protein_info_file(),
            pathway_file: default_pathway_file(),
            sl_pairs_file: default_sl_pairs_file(),
        }
    }
}

impl DataConfig {
    pub fn gene_effect_path(&self) -> PathBuf {
        self.dir.join(&self.gene_effect_file)
    }

    pub fn mutation_path(&self) -> Option<PathBuf> {
        self.mutation_file.as_ref().map(|f| self.dir.join(f))
    }

    pub fn interaction_path(&self) -> Option<PathBuf> {
        self.interaction_file.as_ref().map(|f| self.dir.join(f))
    }

    pub fn protein_info_path(&self) -> Option<PathBuf> {
        self.protein_info_file.as_ref().map(|f| self.dir.join(f))
    }

    pub fn pathway_path(&self) -> Option<PathBuf> {
        self.pathway_file.as_ref().map(|f| self.dir.join(f))
    }

    pub fn sl_pairs_path(&self) -> PathBuf {
        self.dir.join(&self.sl_pairs_file)
    }
}

// ── Interaction Index ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Minimum combined score (0–1000) for a pair to enter the index
    #[serde(default = "default_min_combined_score")]
    pub min_combined_score: u32,

    /// Column delimiter of the interaction table
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Column delimiter of the protein info table
    #[serde(default = "default_protein_info_delimiter")]
    pub protein_info_delimiter: char,
}

fn default_min_combined_score() -> u32 { 400 }
fn default_delimiter() -> char { ' ' }
fn default_protein_info_delimiter() -> char { '\t' }

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_combined_score: default_min_combined_score(),
            delimiter: default_delimiter(),
            protein_info_delimiter: default_protein_info_delimiter(),
        }
    }
}

// ── Negative Sampling ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// RNG seed for negative sampling
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Attempt budget multiplier: at most `attempt_factor * n` draws
    #[serde(default = "default_attempt_factor")]
    pub attempt_factor: usize,

    /// Negatives per positive when assembling a training set
    #[serde(default = "default_negative_ratio")]
    pub negative_ratio: f64,
}

fn default_seed() -> u64 { 42 }
fn default_attempt_factor() -> usize { 10 }
fn default_negative_ratio() -> f64 { 1.0 }

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            attempt_factor: default_attempt_factor(),
            negative_ratio: default_negative_ratio(),
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl LethyxConfig {
    /// Load configuration from `LETHYX_CONFIG`, `lethyx.toml`, or defaults.
    /// `LETHYX_DATA_DIR` overrides the data directory in every case.
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Like [`Self::load`], but an explicit `path` wins and must exist.
    pub fn load_with(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => {
                let path = std::env::var(CONFIG_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
                if path.exists() {
                    Self::from_toml_file(&path)?
                } else {
                    debug!(path = %path.display(), "No config file found, using defaults");
                    Self::default()
                }
            }
        };

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.data.dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Reject values the sampler and index builder cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.sampling.attempt_factor == 0 {
            return Err(LethyxError::Config(
                "sampling.attempt_factor must be at least 1".to_string(),
            ));
        }
        if !(self.sampling.negative_ratio > 0.0) {
            return Err(LethyxError::Config(format!(
                "sampling.negative_ratio must be positive, got {}",
                self.sampling.negative_ratio
            )));
        }
        if self.interaction.min_combined_score > 1000 {
            return Err(LethyxError::Config(format!(
                "interaction.min_combined_score must be within 0..=1000, got {}",
                self.interaction.min_combined_score
            )));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

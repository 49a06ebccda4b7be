//! DepMap (Cancer Dependency Map) data products for pair feature extraction.
//!
//! Holds the two cell-line-indexed matrices the feature layer consumes:
//!
//! - [`GeneEffectMatrix`]: CRISPR gene effect (Chronos/CERES) scores,
//!   cell lines x genes, with missing values stored as NaN.
//! - [`MutationMatrix`]: binary somatic mutation status, cell lines x genes.
//!
//! # Gene Effect Interpretation
//!
//! | Gene effect | Interpretation |
//! |-------------|----------------|
//! | < -1.0 | Strongly essential (knockout kills cell) |
//! | -1.0 to -0.5 | Moderately essential |
//! | -0.5 to 0 | Weak dependency |
//! | > 0 | Not essential / proliferation advantage |
//!
//! # Example
//!
//! ```rust,no_run
//! use lethyx_depmap::{GeneEffectMatrix, MutationMatrix};
//!
//! fn main() -> anyhow::Result<()> {
//!     let effects = GeneEffectMatrix::load_csv("data/CRISPRGeneEffect.csv".as_ref())?;
//!     let mutations = MutationMatrix::load("data/OmicsSomaticMutations.csv".as_ref())?;
//!
//!     if let Some(freq) = mutations.frequency("BRCA1") {
//!         println!("BRCA1 mutated in {:.1}% of lines", freq * 100.0);
//!     }
//!     println!("{} genes over {} cell lines", effects.gene_count(), effects.cell_line_count());
//!     Ok(())
//! }
//! ```

pub mod gene_effect;
pub mod mutations;

pub use gene_effect::GeneEffectMatrix;
pub use mutations::{MutationCall, MutationMatrix};

/// CRISPR gene effect filename used by the DepMap portal.
pub const CRISPR_GENE_EFFECT_FILE: &str = "CRISPRGeneEffect.csv";

/// Strip the Entrez suffix DepMap appends to gene columns ("KRAS (3845)" → "KRAS").
pub fn gene_symbol_from_header(header: &str) -> &str {
    let header = header.trim();
    header.split(" (").next().unwrap_or(header).trim()
}

/// Parse a gene effect cell. Empty, `NA` and non-finite values are missing.
pub(crate) fn parse_effect(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("na") {
        return f64::NAN;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

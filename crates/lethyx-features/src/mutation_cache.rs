//! Precomputed per-gene mutation statistics.
//!
//! Extracting many pairs from one dataset would otherwise re-align the
//! mutation matrix to the effect matrix for every pair. The cache stores,
//! per mutated gene, its mutation frequency and its mutation mask aligned
//! to the effect matrix's cell-line order, together with that order so a
//! cache built against one matrix is never applied to another.

use std::collections::HashMap;

use lethyx_depmap::{GeneEffectMatrix, MutationMatrix};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct MutationStatsCache {
    /// Cell-line order every mask is aligned to.
    cell_lines: Vec<String>,
    frequencies: HashMap<String, f64>,
    masks: HashMap<String, Vec<Option<bool>>>,
}

impl MutationStatsCache {
    /// Precompute statistics for every gene in `mutations`.
    ///
    /// Cell lines of `effects` without mutation data are `None` in every mask.
    pub fn precompute(mutations: &MutationMatrix, effects: &GeneEffectMatrix) -> Self {
        let cell_lines = effects.cell_lines().to_vec();
        let mut frequencies = HashMap::with_capacity(mutations.gene_count());
        let mut masks = HashMap::with_capacity(mutations.gene_count());

        for gene in mutations.genes() {
            if let Some(freq) = mutations.frequency(gene) {
                frequencies.insert(gene.clone(), freq);
            }
            if let Some(mask) = mutations.aligned_mask(gene, &cell_lines) {
                masks.insert(gene.clone(), mask);
            }
        }

        info!(
            n_genes = masks.len(),
            n_cell_lines = cell_lines.len(),
            "Precomputed mutation statistics"
        );
        Self {
            cell_lines,
            frequencies,
            masks,
        }
    }

    /// Mutation frequency over the mutation matrix's cell lines.
    pub fn frequency(&self, gene: &str) -> Option<f64> {
        self.frequencies.get(gene).copied()
    }

    /// Mask aligned to [`Self::cell_lines`]; `None` marks unprofiled lines.
    pub fn mask(&self, gene: &str) -> Option<&[Option<bool>]> {
        self.masks.get(gene).map(Vec::as_slice)
    }

    pub fn cell_lines(&self) -> &[String] {
        &self.cell_lines
    }

    /// Whether the masks line up row-for-row with `effects`.
    pub fn is_aligned_to(&self, effects: &GeneEffectMatrix) -> bool {
        self.cell_lines.as_slice() == effects.cell_lines()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_precompute_aligns_to_effect_order() {
        let mutations = MutationMatrix::from_columns(
            lines(&["L1", "L2", "L3", "L4"]),
            vec![("KRAS".to_string(), vec![true, false, false, true])],
        )
        .unwrap();
        // effect matrix lists lines in a different order and has one extra
        let effects = GeneEffectMatrix::from_columns(
            lines(&["L4", "L5", "L1", "L2"]),
            vec![("KRAS".to_string(), vec![0.0; 4])],
        )
        .unwrap();

        let cache = MutationStatsCache::precompute(&mutations, &effects);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.mask("KRAS").unwrap(),
            &[Some(true), None, Some(true), Some(false)]
        );
        assert_eq!(cache.frequency("KRAS"), Some(0.5));
        assert!(cache.mask("TP53").is_none());
        assert!(cache.is_aligned_to(&effects));
    }

    #[test]
    fn test_detects_misaligned_matrix() {
        let mutations = MutationMatrix::from_columns(
            lines(&["L1", "L2"]),
            vec![("KRAS".to_string(), vec![true, false])],
        )
        .unwrap();
        let effects =
            GeneEffectMatrix::from_columns(lines(&["L1", "L2"]), vec![("KRAS".to_string(), vec![0.0; 2])])
                .unwrap();
        let reordered =
            GeneEffectMatrix::from_columns(lines(&["L2", "L1"]), vec![("KRAS".to_string(), vec![0.0; 2])])
                .unwrap();

        let cache = MutationStatsCache::precompute(&mutations, &effects);
        assert!(!cache.is_aligned_to(&reordered));
    }
}

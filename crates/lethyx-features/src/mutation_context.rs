//! Mutation-context features.
//!
//! Captures whether losing one gene (by damaging mutation) makes cell lines
//! more dependent on its partner, which is the classic synthetic lethal
//! signature, along with how the two genes' mutations co-occur.

use lethyx_depmap::{GeneEffectMatrix, MutationMatrix};
use serde::Serialize;
use tracing::{debug, warn};

use crate::codependency::PairedEffects;
use crate::mutation_cache::MutationStatsCache;
use crate::schema::FeatureGroup;
use crate::stats;

/// A directional context effect needs more mutated lines than this.
pub const MIN_MUTATED_LINES: usize = 5;

/// Mutation-context summary; `None` fields were not estimated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MutationContextFeatures {
    /// Wild-type minus mutant mean effect of B, over lines split by A's status.
    pub context_dependency_a_to_b: Option<f64>,
    pub effect_b_in_mutant_a: Option<f64>,
    pub context_dependency_b_to_a: Option<f64>,
    pub effect_a_in_mutant_b: Option<f64>,
    pub frequency_a: Option<f64>,
    pub frequency_b: Option<f64>,
    /// Lines mutated in both over lines mutated in either.
    pub co_occurrence_ratio: Option<f64>,
    pub both_mutated_count: Option<usize>,
    pub either_mutated_count: Option<usize>,
}

impl MutationContextFeatures {
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }
}

impl FeatureGroup for MutationContextFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "mutation_context_dependency_a_to_b",
        "mutation_effect_b_in_mutant_a",
        "mutation_context_dependency_b_to_a",
        "mutation_effect_a_in_mutant_b",
        "mutation_frequency_a",
        "mutation_frequency_b",
        "mutation_co_occurrence_ratio",
        "mutation_both_mutated_count",
        "mutation_either_mutated_count",
    ];

    fn values(&self) -> Vec<Option<f64>> {
        vec![
            self.context_dependency_a_to_b,
            self.effect_b_in_mutant_a,
            self.context_dependency_b_to_a,
            self.effect_a_in_mutant_b,
            self.frequency_a,
            self.frequency_b,
            self.co_occurrence_ratio,
            self.both_mutated_count.map(|c| c as f64),
            self.either_mutated_count.map(|c| c as f64),
        ]
    }
}

/// Where per-gene masks and frequencies come from.
enum MaskSource<'a> {
    Cached(&'a MutationStatsCache),
    OnDemand(&'a MutationMatrix, &'a GeneEffectMatrix),
}

impl MaskSource<'_> {
    /// Mask aligned to the effect matrix's cell lines; `None` is unprofiled.
    fn mask(&self, gene: &str) -> Option<Vec<Option<bool>>> {
        match self {
            Self::Cached(cache) => cache.mask(gene).map(<[Option<bool>]>::to_vec),
            Self::OnDemand(mutations, effects) => mutations.aligned_mask(gene, effects.cell_lines()),
        }
    }

    fn frequency(&self, gene: &str) -> Option<f64> {
        match self {
            Self::Cached(cache) => cache.frequency(gene),
            Self::OnDemand(mutations, _) => mutations.frequency(gene),
        }
    }
}

/// Compute mutation-context features for `(gene_a, gene_b)`.
///
/// Everything is `None` without mutation data or when either gene is absent
/// from the effect matrix. Context effects and co-occurrence only use lines
/// that have both effect scores and a mutation profile. A cache aligned to a
/// different cell-line order is ignored in favour of on-demand alignment.
pub fn compute_mutation_context(
    gene_a: &str,
    gene_b: &str,
    effects: &GeneEffectMatrix,
    mutations: Option<&MutationMatrix>,
    cache: Option<&MutationStatsCache>,
) -> MutationContextFeatures {
    let Some(mutations) = mutations else {
        return MutationContextFeatures::default();
    };
    let Some(paired) = PairedEffects::extract(gene_a, gene_b, effects) else {
        debug!(gene_a, gene_b, "Gene missing from effect matrix; no mutation context");
        return MutationContextFeatures::default();
    };

    let source = match cache {
        Some(cache) if cache.is_aligned_to(effects) => MaskSource::Cached(cache),
        Some(_) => {
            warn!("Mutation cache aligned to a different cell-line order; computing on demand");
            MaskSource::OnDemand(mutations, effects)
        }
        None => MaskSource::OnDemand(mutations, effects),
    };

    let restrict = |mask: Vec<Option<bool>>| -> Vec<Option<bool>> {
        mask.into_iter()
            .zip(&paired.mask)
            .filter(|(_, &keep)| keep)
            .map(|(m, _)| m)
            .collect()
    };
    let mask_a = source.mask(gene_a).map(&restrict);
    let mask_b = source.mask(gene_b).map(&restrict);

    let mut features = MutationContextFeatures {
        frequency_a: source.frequency(gene_a),
        frequency_b: source.frequency(gene_b),
        ..Default::default()
    };

    if let Some(mask) = &mask_a {
        if let Some((dependency, mutant_mean)) = context_effect(mask, &paired.b) {
            features.context_dependency_a_to_b = Some(dependency);
            features.effect_b_in_mutant_a = Some(mutant_mean);
        }
    }
    if let Some(mask) = &mask_b {
        if let Some((dependency, mutant_mean)) = context_effect(mask, &paired.a) {
            features.context_dependency_b_to_a = Some(dependency);
            features.effect_a_in_mutant_b = Some(mutant_mean);
        }
    }

    if let (Some(a), Some(b)) = (&mask_a, &mask_b) {
        let profiled: Vec<(bool, bool)> = a
            .iter()
            .zip(b)
            .filter_map(|(&x, &y)| Some((x?, y?)))
            .collect();
        let both = profiled.iter().filter(|&&(x, y)| x && y).count();
        let either = profiled.iter().filter(|&&(x, y)| x || y).count();
        features.co_occurrence_ratio = Some(if either > 0 {
            both as f64 / either as f64
        } else {
            0.0
        });
        features.both_mutated_count = Some(both);
        features.either_mutated_count = Some(either);
    }

    features
}

/// `(wild_type_mean - mutant_mean, mutant_mean)` of `partner` split by `mutated`.
///
/// Unprofiled lines (`None`) are skipped. `None` unless more than
/// [`MIN_MUTATED_LINES`] lines are mutated. The wild-type mean is 0 when every
/// profiled line is mutated.
fn context_effect(mutated: &[Option<bool>], partner: &[f64]) -> Option<(f64, f64)> {
    let (mutant, wild_type): (Vec<(f64, bool)>, Vec<(f64, bool)>) = partner
        .iter()
        .copied()
        .zip(mutated.iter().copied())
        .filter_map(|(v, m)| Some((v, m?)))
        .partition(|&(_, m)| m);
    if mutant.len() <= MIN_MUTATED_LINES {
        return None;
    }

    let mutant: Vec<f64> = mutant.into_iter().map(|(v, _)| v).collect();
    let wild_type: Vec<f64> = wild_type.into_iter().map(|(v, _)| v).collect();
    let mutant_mean = stats::mean(&mutant);
    let wild_type_mean = stats::mean(&wild_type);
    Some((wild_type_mean - mutant_mean, mutant_mean))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("ACH-{:06}", i)).collect()
    }

    /// 12 lines; A is mutated in the first 6, B effects are low exactly there.
    fn fixture() -> (GeneEffectMatrix, MutationMatrix) {
        let b: Vec<f64> = (0..12).map(|i| if i < 6 { -1.0 } else { 0.0 }).collect();
        let a: Vec<f64> = (0..12).map(|i| -0.1 * i as f64).collect();
        let effects = GeneEffectMatrix::from_columns(
            lines(12),
            vec![("A".to_string(), a), ("B".to_string(), b)],
        )
        .unwrap();
        let mutations = MutationMatrix::from_columns(
            lines(12),
            vec![
                ("A".to_string(), (0..12).map(|i| i < 6).collect()),
                ("B".to_string(), (0..12).map(|i| i == 0 || i == 11).collect()),
            ],
        )
        .unwrap();
        (effects, mutations)
    }

    #[test]
    fn test_no_mutation_data_is_empty() {
        let (effects, _) = fixture();
        let f = compute_mutation_context("A", "B", &effects, None, None);
        assert!(f.is_empty());
        assert!(f.entries().is_empty());
    }

    #[test]
    fn test_context_dependency_direction() {
        let (effects, mutations) = fixture();
        let f = compute_mutation_context("A", "B", &effects, Some(&mutations), None);

        assert_eq!(f.effect_b_in_mutant_a, Some(-1.0));
        assert_eq!(f.context_dependency_a_to_b, Some(1.0));
        // B is mutated in only two lines
        assert_eq!(f.context_dependency_b_to_a, None);
        assert_eq!(f.effect_a_in_mutant_b, None);

        assert_eq!(f.frequency_a, Some(0.5));
        assert_eq!(f.both_mutated_count, Some(1));
        assert_eq!(f.either_mutated_count, Some(7));
        assert!((f.co_occurrence_ratio.unwrap() - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_cache_matches_on_demand() {
        let (effects, mutations) = fixture();
        let cache = MutationStatsCache::precompute(&mutations, &effects);
        let cached = compute_mutation_context("A", "B", &effects, Some(&mutations), Some(&cache));
        let direct = compute_mutation_context("A", "B", &effects, Some(&mutations), None);
        assert_eq!(cached, direct);
    }

    #[test]
    fn test_all_lines_mutated_uses_zero_wild_type_mean() {
        let (dependency, mutant) = context_effect(&[Some(true); 6], &[-0.5; 6]).unwrap();
        assert_eq!(mutant, -0.5);
        assert_eq!(dependency, 0.5);
        assert!(context_effect(&[Some(true); 5], &[-0.5; 5]).is_none());
    }

    #[test]
    fn test_unprofiled_lines_are_not_wild_type() {
        // 20 lines with effects, only the first 12 have a mutation profile
        let a: Vec<f64> = (0..20).map(|i| -0.05 * i as f64).collect();
        let b: Vec<f64> = (0..20)
            .map(|i| match i {
                0..=5 => -1.0,
                6..=11 => 0.0,
                _ => -2.0,
            })
            .collect();
        let effects = GeneEffectMatrix::from_columns(
            lines(20),
            vec![("A".to_string(), a), ("B".to_string(), b)],
        )
        .unwrap();
        let mutations = MutationMatrix::from_columns(
            lines(12),
            vec![
                ("A".to_string(), (0..12).map(|i| i < 6).collect()),
                ("B".to_string(), vec![false; 12]),
            ],
        )
        .unwrap();

        let direct = compute_mutation_context("A", "B", &effects, Some(&mutations), None);
        assert_eq!(direct.frequency_a, Some(0.5));
        assert_eq!(direct.effect_b_in_mutant_a, Some(-1.0));
        assert_eq!(direct.context_dependency_a_to_b, Some(1.0));
        assert_eq!(direct.either_mutated_count, Some(6));

        let cache = MutationStatsCache::precompute(&mutations, &effects);
        let cached = compute_mutation_context("A", "B", &effects, Some(&mutations), Some(&cache));
        assert_eq!(cached, direct);
    }

    #[test]
    fn test_no_mutated_lines_gives_zero_co_occurrence() {
        let (effects, _) = fixture();
        let mutations = MutationMatrix::from_columns(
            lines(12),
            vec![
                ("A".to_string(), vec![false; 12]),
                ("B".to_string(), vec![false; 12]),
            ],
        )
        .unwrap();
        let f = compute_mutation_context("A", "B", &effects, Some(&mutations), None);
        assert_eq!(f.either_mutated_count, Some(0));
        assert_eq!(f.both_mutated_count, Some(0));
        assert_eq!(f.co_occurrence_ratio, Some(0.0));
        assert_eq!(f.context_dependency_a_to_b, None);
    }

    #[test]
    fn test_gene_without_mutation_column() {
        let (effects, mutations) = fixture();
        let effects = GeneEffectMatrix::from_columns(
            effects.cell_lines().to_vec(),
            vec![
                ("A".to_string(), effects.column("A").unwrap().to_vec()),
                ("C".to_string(), vec![0.0; 12]),
            ],
        )
        .unwrap();
        let f = compute_mutation_context("A", "C", &effects, Some(&mutations), None);
        assert_eq!(f.frequency_b, None);
        assert_eq!(f.co_occurrence_ratio, None);
        assert!(f.frequency_a.is_some());
    }
}

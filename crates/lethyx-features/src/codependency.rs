//! DepMap co-dependency features.
//!
//! Summarises how two genes' knockout effects move together across the
//! cell lines where both were screened. SL partners tend to show
//! conditional dependency: lines that depend strongly on one gene lean
//! on the other as well, or the two are essential in complementary
//! subsets of lines.

use lethyx_depmap::GeneEffectMatrix;
use serde::Serialize;
use tracing::debug;

use crate::schema::FeatureGroup;
use crate::stats;

/// Minimum number of cell lines with effects for both genes.
pub const MIN_PAIRED_OBSERVATIONS: usize = 10;

/// Percentile below which a cell line counts as strongly dependent on a gene.
pub const DEPENDENCY_PERCENTILE: f64 = 25.0;

/// Mean effect below which a gene is flagged essential.
pub const ESSENTIAL_MEAN_THRESHOLD: f64 = -0.5;

/// Effects of two genes restricted to cell lines where both are observed.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedEffects {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    /// Over all matrix cell lines: `true` where both values are present.
    pub mask: Vec<bool>,
}

impl PairedEffects {
    /// `None` when either gene is absent from the matrix.
    pub fn extract(gene_a: &str, gene_b: &str, effects: &GeneEffectMatrix) -> Option<Self> {
        let col_a = effects.column(gene_a)?;
        let col_b = effects.column(gene_b)?;

        let mask: Vec<bool> = col_a
            .iter()
            .zip(col_b)
            .map(|(a, b)| !a.is_nan() && !b.is_nan())
            .collect();
        let (a, b) = col_a
            .iter()
            .zip(col_b)
            .zip(&mask)
            .filter(|(_, &keep)| keep)
            .map(|((&a, &b), _)| (a, b))
            .unzip();

        Some(Self { a, b, mask })
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

/// Co-dependency summary for an ordered gene pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodependencyFeatures {
    pub pearson_correlation: f64,
    pub spearman_correlation: f64,
    /// Mean effect of B in lines strongly dependent on A.
    pub conditional_dependency: f64,
    /// Fraction of lines strongly dependent on both genes.
    pub mutual_essentiality: f64,
    pub essentiality_diff_std: f64,
    /// Mean absolute difference between the two genes' effects.
    pub essentiality_diff_mean: f64,
    pub mean_effect_a: f64,
    pub mean_effect_b: f64,
    pub std_effect_a: f64,
    pub std_effect_b: f64,
    pub is_essential_a: bool,
    pub is_essential_b: bool,
    /// Exactly one of the two genes is essential.
    pub complementary: bool,
}

impl CodependencyFeatures {
    /// The value reported when co-dependency cannot be estimated.
    pub fn zeroed() -> Self {
        Self::default()
    }
}

impl FeatureGroup for CodependencyFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "depmap_pearson_correlation",
        "depmap_spearman_correlation",
        "depmap_conditional_dependency",
        "depmap_mutual_essentiality",
        "depmap_essentiality_diff_std",
        "depmap_essentiality_diff_mean",
        "depmap_mean_effect_a",
        "depmap_mean_effect_b",
        "depmap_std_effect_a",
        "depmap_std_effect_b",
        "depmap_is_essential_a",
        "depmap_is_essential_b",
        "depmap_complementary",
    ];

    fn values(&self) -> Vec<Option<f64>> {
        [
            self.pearson_correlation,
            self.spearman_correlation,
            self.conditional_dependency,
            self.mutual_essentiality,
            self.essentiality_diff_std,
            self.essentiality_diff_mean,
            self.mean_effect_a,
            self.mean_effect_b,
            self.std_effect_a,
            self.std_effect_b,
            flag(self.is_essential_a),
            flag(self.is_essential_b),
            flag(self.complementary),
        ]
        .into_iter()
        .map(Some)
        .collect()
    }
}

pub(crate) fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Compute co-dependency features for `(gene_a, gene_b)`.
///
/// Returns [`CodependencyFeatures::zeroed`] when either gene is missing from
/// the matrix or fewer than [`MIN_PAIRED_OBSERVATIONS`] lines carry both.
/// Undefined correlations (a constant profile) are reported as 0.
pub fn compute_codependency(
    gene_a: &str,
    gene_b: &str,
    effects: &GeneEffectMatrix,
) -> CodependencyFeatures {
    let Some(paired) = PairedEffects::extract(gene_a, gene_b, effects) else {
        debug!(gene_a, gene_b, "Gene missing from effect matrix; co-dependency zeroed");
        return CodependencyFeatures::zeroed();
    };
    if paired.len() < MIN_PAIRED_OBSERVATIONS {
        debug!(
            gene_a,
            gene_b,
            n_paired = paired.len(),
            "Too few paired observations; co-dependency zeroed"
        );
        return CodependencyFeatures::zeroed();
    }
    from_paired(&paired.a, &paired.b)
}

fn from_paired(a: &[f64], b: &[f64]) -> CodependencyFeatures {
    let n = a.len() as f64;

    let threshold_a = stats::percentile(a, DEPENDENCY_PERCENTILE);
    let threshold_b = stats::percentile(b, DEPENDENCY_PERCENTILE);
    let dependent_a: Vec<bool> = a.iter().map(|&v| v <= threshold_a).collect();
    let dependent_b: Vec<bool> = b.iter().map(|&v| v <= threshold_b).collect();

    let b_given_a: Vec<f64> = b
        .iter()
        .zip(&dependent_a)
        .filter(|(_, &d)| d)
        .map(|(&v, _)| v)
        .collect();
    let conditional_dependency = stats::mean(&b_given_a);

    let both = dependent_a
        .iter()
        .zip(&dependent_b)
        .filter(|(&x, &y)| x && y)
        .count();

    let diff: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    let abs_diff: Vec<f64> = diff.iter().map(|d| d.abs()).collect();

    let mean_effect_a = stats::mean(a);
    let mean_effect_b = stats::mean(b);
    let is_essential_a = mean_effect_a < ESSENTIAL_MEAN_THRESHOLD;
    let is_essential_b = mean_effect_b < ESSENTIAL_MEAN_THRESHOLD;

    CodependencyFeatures {
        pearson_correlation: stats::pearson(a, b).unwrap_or(0.0),
        spearman_correlation: stats::spearman(a, b).unwrap_or(0.0),
        conditional_dependency,
        mutual_essentiality: both as f64 / n,
        essentiality_diff_std: stats::std_dev(&diff),
        essentiality_diff_mean: stats::mean(&abs_diff),
        mean_effect_a,
        mean_effect_b,
        std_effect_a: stats::std_dev(a),
        std_effect_b: stats::std_dev(b),
        is_essential_a,
        is_essential_b,
        complementary: is_essential_a != is_essential_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(columns: Vec<(&str, Vec<f64>)>) -> GeneEffectMatrix {
        let n = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let lines = (0..n).map(|i| format!("ACH-{:06}", i)).collect();
        GeneEffectMatrix::from_columns(
            lines,
            columns.into_iter().map(|(g, v)| (g.to_string(), v)),
        )
        .unwrap()
    }

    #[test]
    fn test_paired_effects_drop_missing() {
        let m = matrix(vec![
            ("A", vec![1.0, f64::NAN, 3.0, 4.0]),
            ("B", vec![1.0, 2.0, f64::NAN, 4.0]),
        ]);
        let paired = PairedEffects::extract("A", "B", &m).unwrap();
        assert_eq!(paired.a, vec![1.0, 4.0]);
        assert_eq!(paired.b, vec![1.0, 4.0]);
        assert_eq!(paired.mask, vec![true, false, false, true]);
        assert!(PairedEffects::extract("A", "Z", &m).is_none());
    }

    #[test]
    fn test_too_few_observations_zeroed() {
        let a: Vec<f64> = (0..9).map(|i| -(i as f64) / 10.0).collect();
        let m = matrix(vec![("A", a.clone()), ("B", a)]);
        assert_eq!(compute_codependency("A", "B", &m), CodependencyFeatures::zeroed());
    }

    #[test]
    fn test_missing_gene_zeroed() {
        let a: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let m = matrix(vec![("A", a)]);
        let f = compute_codependency("A", "NOPE", &m);
        assert_eq!(f, CodependencyFeatures::zeroed());
        assert!(f.values().iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_essentiality_flags() {
        let a = vec![-1.0; 10];
        let b: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();
        let m = matrix(vec![("A", a), ("B", b)]);
        let f = compute_codependency("A", "B", &m);
        assert!(f.is_essential_a);
        assert!(!f.is_essential_b);
        assert!(f.complementary);
        // constant profile: correlation undefined
        assert_eq!(f.pearson_correlation, 0.0);
        assert_eq!(f.spearman_correlation, 0.0);
        assert!((f.mean_effect_a + 1.0).abs() < 1e-12);
        assert_eq!(f.std_effect_a, 0.0);
    }

    #[test]
    fn test_identical_profiles() {
        let a: Vec<f64> = (0..20).map(|i| -2.0 + i as f64 * 0.1).collect();
        let m = matrix(vec![("A", a.clone()), ("B", a)]);
        let f = compute_codependency("A", "B", &m);
        assert!((f.pearson_correlation - 1.0).abs() < 1e-12);
        assert!((f.spearman_correlation - 1.0).abs() < 1e-12);
        assert_eq!(f.essentiality_diff_mean, 0.0);
        assert_eq!(f.essentiality_diff_std, 0.0);
        // bottom quartile coincides for both genes
        assert!((f.mutual_essentiality - 5.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_values_align_with_columns() {
        let f = CodependencyFeatures {
            is_essential_b: true,
            ..Default::default()
        };
        let values = f.values();
        assert_eq!(values.len(), CodependencyFeatures::COLUMNS.len());
        let idx = CodependencyFeatures::COLUMNS
            .iter()
            .position(|c| *c == "depmap_is_essential_b")
            .unwrap();
        assert_eq!(values[idx], Some(1.0));
    }
}

//! Labeled training pairs.

use std::collections::HashSet;

use lethyx_common::{GenePair, KnownPairSet};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::negatives::NegativeSampler;

/// A gene pair with a class label (1 = known SL, 0 = sampled negative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledPair {
    pub gene_a: String,
    pub gene_b: String,
    pub label: u8,
}

/// Combine known positives with sampled negatives.
///
/// Positives are kept (deduplicated, in input order) when both genes are in
/// `universe`. `ceil(negative_ratio * positives)` negatives are then drawn
/// from the universe, avoiding every pair in `exclude` and every given
/// positive, including ones dropped for lying outside the universe.
pub fn assemble_training_pairs<R: Rng + ?Sized>(
    positives: &[(String, String)],
    exclude: &KnownPairSet,
    universe: &[String],
    negative_ratio: f64,
    attempt_factor: usize,
    rng: &mut R,
) -> Vec<LabeledPair> {
    let mut known = exclude.clone();
    for (a, b) in positives {
        known.insert(a, b);
    }
    let in_universe: HashSet<&str> = universe.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let mut pairs: Vec<LabeledPair> = positives
        .iter()
        .filter(|(a, b)| in_universe.contains(a.as_str()) && in_universe.contains(b.as_str()))
        .filter(|(a, b)| a != b && seen.insert(GenePair::new(a.as_str(), b.as_str())))
        .map(|(a, b)| LabeledPair {
            gene_a: a.clone(),
            gene_b: b.clone(),
            label: 1,
        })
        .collect();
    let n_positive = pairs.len();

    let n_negative = (negative_ratio.max(0.0) * n_positive as f64).ceil() as usize;
    let negatives = NegativeSampler::new(universe, &known)
        .with_attempt_factor(attempt_factor)
        .sample(n_negative, rng);
    pairs.extend(negatives.into_iter().map(|pair| {
        let (gene_a, gene_b) = pair.into_parts();
        LabeledPair {
            gene_a,
            gene_b,
            label: 0,
        }
    }));

    info!(
        n_positive,
        n_negative = pairs.len() - n_positive,
        n_dropped = positives.len() - n_positive,
        "Assembled training pairs"
    );
    pairs
}

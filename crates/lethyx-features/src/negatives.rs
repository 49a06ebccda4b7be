//! Negative pair sampling.
//!
//! Negatives are random gene pairs from the screened universe that are not
//! known SL pairs. Sampling is bounded: once the attempt budget is spent the
//! sampler returns what it has rather than looping on a saturated universe.

use lethyx_common::{GenePair, KnownPairSet};
use rand::seq::index;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Attempt budget multiplier used when none is configured.
pub const DEFAULT_ATTEMPT_FACTOR: usize = 10;

/// Outcome of one sampling run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleReport {
    pub pairs: Vec<GenePair>,
    /// Draws made, accepted or not.
    pub attempts: usize,
    pub rejected: usize,
}

/// Draws candidate negatives uniformly from a gene universe.
#[derive(Debug, Clone)]
pub struct NegativeSampler<'a> {
    universe: &'a [String],
    known: &'a KnownPairSet,
    attempt_factor: usize,
}

impl<'a> NegativeSampler<'a> {
    pub fn new(universe: &'a [String], known: &'a KnownPairSet) -> Self {
        Self {
            universe,
            known,
            attempt_factor: DEFAULT_ATTEMPT_FACTOR,
        }
    }

    pub fn with_attempt_factor(mut self, attempt_factor: usize) -> Self {
        self.attempt_factor = attempt_factor.max(1);
        self
    }

    /// Sample up to `n_pairs` canonical pairs.
    ///
    /// Every draw counts as an attempt, accepted or not, and at most
    /// `n_pairs * attempt_factor` draws are made. Self-pairs and known pairs
    /// are rejected. Duplicates are not removed.
    pub fn sample<R: Rng + ?Sized>(&self, n_pairs: usize, rng: &mut R) -> Vec<GenePair> {
        self.sample_with_report(n_pairs, rng).pairs
    }

    /// [`Self::sample`], also reporting how many draws were made.
    pub fn sample_with_report<R: Rng + ?Sized>(&self, n_pairs: usize, rng: &mut R) -> SampleReport {
        if n_pairs == 0 {
            return SampleReport::default();
        }
        if self.universe.len() < 2 {
            warn!(
                n_genes = self.universe.len(),
                "Gene universe too small to sample negative pairs"
            );
            return SampleReport::default();
        }

        let max_attempts = n_pairs.saturating_mul(self.attempt_factor);
        let mut pairs = Vec::with_capacity(n_pairs);
        let mut attempts = 0usize;
        let mut rejected = 0usize;

        while pairs.len() < n_pairs && attempts < max_attempts {
            attempts += 1;
            let picked = index::sample(rng, self.universe.len(), 2);
            let pair = GenePair::new(
                self.universe[picked.index(0)].as_str(),
                self.universe[picked.index(1)].as_str(),
            );
            if pair.is_self_pair() || self.known.contains_pair(&pair) {
                rejected += 1;
                continue;
            }
            pairs.push(pair);
        }

        if pairs.len() < n_pairs {
            warn!(
                requested = n_pairs,
                generated = pairs.len(),
                attempts,
                "Attempt budget exhausted before enough negatives were found"
            );
        } else {
            debug!(n_pairs, attempts, rejected, "Sampled negative pairs");
        }
        SampleReport {
            pairs,
            attempts,
            rejected,
        }
    }
}

/// Convenience wrapper around [`NegativeSampler::sample`].
pub fn generate_negative_pairs<R: Rng + ?Sized>(
    n_pairs: usize,
    known: &KnownPairSet,
    universe: &[String],
    attempt_factor: usize,
    rng: &mut R,
) -> Vec<GenePair> {
    NegativeSampler::new(universe, known)
        .with_attempt_factor(attempt_factor)
        .sample(n_pairs, rng)
}

/// Result of filtering candidate negatives against known positives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NegativeValidation {
    /// Surviving candidates, in input order and orientation.
    pub kept: Vec<(String, String)>,
    pub removed: usize,
}

/// Drop every candidate whose canonical form is a known pair.
pub fn validate_negative_pairs<I>(candidates: I, known: &KnownPairSet) -> NegativeValidation
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut report = NegativeValidation::default();
    for (a, b) in candidates {
        if known.contains(&a, &b) {
            report.removed += 1;
        } else {
            report.kept.push((a, b));
        }
    }

    if report.removed > 0 {
        warn!(
            removed = report.removed,
            kept = report.kept.len(),
            "Removed known SL pairs from negatives"
        );
    } else {
        info!(kept = report.kept.len(), "All negatives are clean");
    }
    report
}

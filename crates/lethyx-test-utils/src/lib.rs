//! Shared fixtures for Lethyx tests.
//!
//! Builders panic on malformed input; they are only meant for tests.

use std::path::PathBuf;

use lethyx_depmap::{GeneEffectMatrix, MutationMatrix};
use lethyx_ingestion::{EvidenceScores, InteractionIndex, InteractionRecord, PathwayMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};

/// `n` DepMap-style model identifiers.
pub fn cell_lines(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("ACH-{:06}", i)).collect()
}

/// `G0..G{n-1}`.
pub fn gene_universe(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("G{}", i)).collect()
}

/// Effect matrix over `cell_lines(n)`, `n` taken from the first column.
pub fn effect_matrix(columns: &[(&str, Vec<f64>)]) -> GeneEffectMatrix {
    let n = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    GeneEffectMatrix::from_columns(
        cell_lines(n),
        columns.iter().map(|(g, v)| (g.to_string(), v.clone())),
    )
    .expect("fixture columns must have equal length")
}

/// Mutation matrix over `cell_lines(n)`, `n` taken from the first column.
pub fn mutation_matrix(columns: &[(&str, Vec<bool>)]) -> MutationMatrix {
    let n = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    MutationMatrix::from_columns(
        cell_lines(n),
        columns.iter().map(|(g, v)| (g.to_string(), v.clone())),
    )
    .expect("fixture columns must have equal length")
}

/// Two effect profiles of length `n` with population correlation `rho`.
pub fn correlated_profiles(n: usize, rho: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = (1.0 - rho * rho).max(0.0).sqrt();
    (0..n)
        .map(|_| {
            let x: f64 = rng.sample(StandardNormal);
            let z: f64 = rng.sample(StandardNormal);
            (x * 0.3 - 0.4, (rho * x + noise * z) * 0.3 - 0.4)
        })
        .unzip()
}

/// Random effect matrix of `n_genes` independent genes named by [`gene_universe`].
pub fn random_effect_matrix(n_lines: usize, n_genes: usize, seed: u64) -> GeneEffectMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let effect = Normal::new(-0.2, 0.3).expect("valid normal parameters");
    let columns: Vec<(String, Vec<f64>)> = gene_universe(n_genes)
        .into_iter()
        .map(|g| {
            let values = (0..n_lines).map(|_| effect.sample(&mut rng)).collect();
            (g, values)
        })
        .collect();
    GeneEffectMatrix::from_columns(cell_lines(n_lines), columns)
        .expect("generated columns have equal length")
}

/// Interaction index from `(gene_a, gene_b, scores)` rows, no threshold.
pub fn interaction_index(rows: &[(&str, &str, EvidenceScores)]) -> InteractionIndex {
    InteractionIndex::from_records(
        rows.iter().map(|(a, b, scores)| InteractionRecord {
            gene_a: a.to_string(),
            gene_b: b.to_string(),
            scores: *scores,
        }),
        0,
    )
}

pub fn pathway_map(links: &[(&str, &str)]) -> PathwayMap {
    PathwayMap::from_links(links.iter().copied())
}

/// Write `content` to `dir/name` and return the path.
pub fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("failed to write fixture");
    path
}

//! Per-pair feature assembly.
//!
//! Runs every domain extractor for a pair against the loaded data products
//! and flattens the result into one named feature record.

use std::collections::BTreeMap;

use lethyx_depmap::{GeneEffectMatrix, MutationMatrix};
use lethyx_ingestion::{InteractionIndex, PathwayMap};
use serde::Serialize;
use tracing::{debug, info};

use crate::codependency::{compute_codependency, CodependencyFeatures};
use crate::interaction::{compute_interaction, InteractionFeatures};
use crate::mutation_cache::MutationStatsCache;
use crate::mutation_context::{compute_mutation_context, MutationContextFeatures};
use crate::pathway::{compute_pathway, PathwayFeatures};
use crate::schema::FeatureGroup;

/// Batches at least this large are processed in parallel.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 64;

/// Read-only data products a pair is scored against.
///
/// Only the gene-effect matrix is required.
#[derive(Debug, Clone, Copy)]
pub struct FeatureInputs<'a> {
    pub gene_effects: &'a GeneEffectMatrix,
    pub mutations: Option<&'a MutationMatrix>,
    pub mutation_cache: Option<&'a MutationStatsCache>,
    pub interactions: Option<&'a InteractionIndex>,
    pub pathways: Option<&'a PathwayMap>,
}

impl<'a> FeatureInputs<'a> {
    pub fn new(gene_effects: &'a GeneEffectMatrix) -> Self {
        Self {
            gene_effects,
            mutations: None,
            mutation_cache: None,
            interactions: None,
            pathways: None,
        }
    }

    pub fn with_mutations(
        mut self,
        mutations: &'a MutationMatrix,
        cache: Option<&'a MutationStatsCache>,
    ) -> Self {
        self.mutations = Some(mutations);
        self.mutation_cache = cache;
        self
    }

    pub fn with_interactions(mut self, interactions: &'a InteractionIndex) -> Self {
        self.interactions = Some(interactions);
        self
    }

    pub fn with_pathways(mut self, pathways: &'a PathwayMap) -> Self {
        self.pathways = Some(pathways);
        self
    }
}

/// Products of features from different sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossDomainFeatures {
    /// Normalized combined interaction score times |Pearson correlation|.
    pub string_depmap_interaction: f64,
    /// Physical interaction score, kept only when exactly one gene is essential.
    pub physical_complementary: f64,
}

impl CrossDomainFeatures {
    fn new(codependency: &CodependencyFeatures, interaction: &InteractionFeatures) -> Self {
        Self {
            string_depmap_interaction: interaction.combined_score
                * codependency.pearson_correlation.abs(),
            physical_complementary: if codependency.complementary {
                interaction.physical_interaction
            } else {
                0.0
            },
        }
    }
}

impl FeatureGroup for CrossDomainFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "combined_string_depmap_interaction",
        "combined_physical_complementary",
    ];

    fn values(&self) -> Vec<Option<f64>> {
        vec![
            Some(self.string_depmap_interaction),
            Some(self.physical_complementary),
        ]
    }
}

/// All features of one gene pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairFeatures {
    pub gene_a: String,
    pub gene_b: String,
    pub codependency: CodependencyFeatures,
    pub mutation_context: MutationContextFeatures,
    pub interaction: InteractionFeatures,
    /// `None` when no pathway map was loaded.
    pub pathway: Option<PathwayFeatures>,
    pub cross: CrossDomainFeatures,
}

impl PairFeatures {
    /// Every column a pair can carry, in output order.
    pub fn columns() -> Vec<&'static str> {
        [
            CodependencyFeatures::COLUMNS,
            MutationContextFeatures::COLUMNS,
            InteractionFeatures::COLUMNS,
            PathwayFeatures::COLUMNS,
            CrossDomainFeatures::COLUMNS,
        ]
        .concat()
    }

    /// Values aligned with [`Self::columns`]; missing values are NaN.
    pub fn to_row(&self) -> Vec<f64> {
        let pathway = match &self.pathway {
            Some(p) => p.values(),
            None => vec![None; PathwayFeatures::COLUMNS.len()],
        };
        self.codependency
            .values()
            .into_iter()
            .chain(self.mutation_context.values())
            .chain(self.interaction.values())
            .chain(pathway)
            .chain(self.cross.values())
            .map(|v| v.unwrap_or(f64::NAN))
            .collect()
    }

    /// Flat name → value mapping of the features that were estimated.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        let mut map = BTreeMap::new();
        map.extend(self.codependency.entries());
        map.extend(self.mutation_context.entries());
        map.extend(self.interaction.entries());
        if let Some(p) = &self.pathway {
            map.extend(p.entries());
        }
        map.extend(self.cross.entries());
        map
    }
}

/// Extract all features for `(gene_a, gene_b)`.
///
/// Never fails: an unknown gene or a missing data product degrades to the
/// zero-filled or absent values documented on each feature group.
pub fn extract_pair_features(gene_a: &str, gene_b: &str, inputs: &FeatureInputs<'_>) -> PairFeatures {
    let codependency = compute_codependency(gene_a, gene_b, inputs.gene_effects);
    let mutation_context = compute_mutation_context(
        gene_a,
        gene_b,
        inputs.gene_effects,
        inputs.mutations,
        inputs.mutation_cache,
    );
    let interaction = compute_interaction(gene_a, gene_b, inputs.interactions);
    let pathway = compute_pathway(gene_a, gene_b, inputs.pathways);
    let cross = CrossDomainFeatures::new(&codependency, &interaction);

    PairFeatures {
        gene_a: gene_a.to_string(),
        gene_b: gene_b.to_string(),
        codependency,
        mutation_context,
        interaction,
        pathway,
        cross,
    }
}

/// Extract features for many pairs, preserving input order.
pub fn extract_batch<S: AsRef<str> + Sync>(
    pairs: &[(S, S)],
    inputs: &FeatureInputs<'_>,
) -> Vec<PairFeatures> {
    info!(n_pairs = pairs.len(), "Extracting pair features");

    let extract = |(a, b): &(S, S)| extract_pair_features(a.as_ref(), b.as_ref(), inputs);

    #[cfg(feature = "parallel")]
    let features: Vec<PairFeatures> = if pairs.len() >= PARALLEL_THRESHOLD {
        use rayon::prelude::*;
        pairs.par_iter().map(extract).collect()
    } else {
        pairs.iter().map(extract).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let features: Vec<PairFeatures> = pairs.iter().map(extract).collect();

    debug!(n_features = PairFeatures::columns().len(), "Feature extraction complete");
    features
}

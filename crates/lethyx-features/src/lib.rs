//! lethyx-features: Gene-pair feature extraction for SL prediction.
//! Turns a candidate gene pair into a flat numeric feature record drawn
//! from four evidence domains (co-dependency, mutation context, protein
//! interactions, pathway overlap) plus cross-domain terms, and samples
//! negative pairs for training.

pub mod codependency;
pub mod combined;
pub mod dataset;
pub mod interaction;
pub mod mutation_cache;
pub mod mutation_context;
pub mod negatives;
pub mod pathway;
pub mod schema;
pub mod stats;
pub mod table;

pub use codependency::{compute_codependency, CodependencyFeatures};
pub use combined::{extract_batch, extract_pair_features, FeatureInputs, PairFeatures};
pub use dataset::{assemble_training_pairs, LabeledPair};
pub use interaction::{compute_interaction, InteractionFeatures};
pub use mutation_cache::MutationStatsCache;
pub use mutation_context::{compute_mutation_context, MutationContextFeatures};
pub use negatives::{
    generate_negative_pairs, validate_negative_pairs, NegativeSampler, NegativeValidation, SampleReport,
};
pub use pathway::{compute_pathway, PathwayFeatures};
pub use schema::FeatureGroup;

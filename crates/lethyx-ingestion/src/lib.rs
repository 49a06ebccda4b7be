//! lethyx-ingestion: Annotation sources for pair features.
//! Covers the non-DepMap inputs of the feature layer:
//! - STRING-style protein interaction evidence, indexed by gene pair
//! - KEGG-style gene → pathway membership
//! - Known synthetic lethal pairs (positives for training)

pub mod sources;

pub use sources::pathway::PathwayMap;
pub use sources::sl_pairs::{SlPairRecord, COMPUTATIONAL_SOURCE};
pub use sources::string::{EvidenceScores, InteractionIndex, InteractionRecord, ProteinNames};

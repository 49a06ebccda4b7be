//! Pathway-overlap features.
//!
//! The pair is canonicalized first, so the per-gene counts refer to the
//! lexicographically smaller gene as `a` whatever order it was given in.

use std::collections::BTreeSet;

use lethyx_common::GenePair;
use lethyx_ingestion::PathwayMap;
use serde::Serialize;

use crate::codependency::flag;
use crate::schema::FeatureGroup;

/// KEGG DNA-repair pathways (BER, NER, MMR, HR, NHEJ, Fanconi anemia).
pub const DNA_REPAIR_PATHWAYS: &[&str] = &[
    "hsa03410", "hsa03420", "hsa03430", "hsa03440", "hsa03450", "hsa03460",
];

/// KEGG cell-cycle and checkpoint pathways.
pub const CELL_CYCLE_PATHWAYS: &[&str] = &[
    "hsa04110", "hsa04111", "hsa04112", "hsa04113", "hsa04114", "hsa04115",
];

/// Length of the identifier prefix that names a pathway category.
const CATEGORY_PREFIX_LEN: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathwayFeatures {
    pub shared_pathways: usize,
    pub in_same_pathway: bool,
    pub pathway_jaccard: f64,
    pub pathways_a: usize,
    pub pathways_b: usize,
    /// Size of the union.
    pub total_pathways: usize,
    pub shared_categories: usize,
    pub both_in_dna_repair: bool,
    pub both_in_cell_cycle: bool,
    /// Pathways belonging to exactly one of the genes.
    pub complementary_pathways: usize,
}

impl PathwayFeatures {
    fn from_sets(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Self {
        let shared = a.intersection(b).count();
        let union = a.union(b).count();

        Self {
            shared_pathways: shared,
            in_same_pathway: shared > 0,
            pathway_jaccard: if union > 0 {
                shared as f64 / union as f64
            } else {
                0.0
            },
            pathways_a: a.len(),
            pathways_b: b.len(),
            total_pathways: union,
            shared_categories: categories(a).intersection(&categories(b)).count(),
            both_in_dna_repair: touches(a, DNA_REPAIR_PATHWAYS) && touches(b, DNA_REPAIR_PATHWAYS),
            both_in_cell_cycle: touches(a, CELL_CYCLE_PATHWAYS) && touches(b, CELL_CYCLE_PATHWAYS),
            complementary_pathways: a.len() + b.len() - 2 * shared,
        }
    }
}

impl FeatureGroup for PathwayFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "kegg_shared_pathways",
        "kegg_in_same_pathway",
        "kegg_pathway_jaccard",
        "kegg_pathways_a",
        "kegg_pathways_b",
        "kegg_total_pathways",
        "kegg_shared_categories",
        "kegg_both_in_dna_repair",
        "kegg_both_in_cell_cycle",
        "kegg_complementary_pathways",
    ];

    fn values(&self) -> Vec<Option<f64>> {
        [
            self.shared_pathways as f64,
            flag(self.in_same_pathway),
            self.pathway_jaccard,
            self.pathways_a as f64,
            self.pathways_b as f64,
            self.total_pathways as f64,
            self.shared_categories as f64,
            flag(self.both_in_dna_repair),
            flag(self.both_in_cell_cycle),
            self.complementary_pathways as f64,
        ]
        .into_iter()
        .map(Some)
        .collect()
    }
}

/// Pathway features for a pair.
///
/// `None` when no pathway map is loaded. A gene without annotations counts
/// as having no pathways.
pub fn compute_pathway(
    gene_a: &str,
    gene_b: &str,
    pathways: Option<&PathwayMap>,
) -> Option<PathwayFeatures> {
    let map = pathways?;
    let pair = GenePair::new(gene_a, gene_b);
    let empty = BTreeSet::new();
    let a = map.pathways(pair.first()).unwrap_or(&empty);
    let b = map.pathways(pair.second()).unwrap_or(&empty);
    Some(PathwayFeatures::from_sets(a, b))
}

fn categories(pathways: &BTreeSet<String>) -> BTreeSet<&str> {
    pathways
        .iter()
        .filter_map(|p| p.get(..CATEGORY_PREFIX_LEN))
        .collect()
}

fn touches(pathways: &BTreeSet<String>, group: &[&str]) -> bool {
    group.iter().any(|p| pathways.contains(*p))
}

//! Protein-interaction evidence features.

use lethyx_ingestion::sources::string::STRING_SCORE_SCALE;
use lethyx_ingestion::{EvidenceScores, InteractionIndex};
use serde::Serialize;

use crate::codependency::flag;
use crate::schema::FeatureGroup;

/// Combined score at which an interaction counts as medium confidence.
pub const MEDIUM_CONFIDENCE: u32 = 400;
/// Combined score at which an interaction counts as high confidence.
pub const HIGH_CONFIDENCE: u32 = 700;

/// Interaction summary; all zero when the pair has no recorded interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InteractionFeatures {
    pub combined_score: f64,
    pub experimental: f64,
    pub database: f64,
    pub coexpression: f64,
    pub neighborhood: f64,
    pub fusion: f64,
    pub cooccurrence: f64,
    pub textmining: f64,
    pub has_interaction: bool,
    pub medium_confidence: bool,
    pub high_confidence: bool,
    /// Non-zero channels among the six structured ones (textmining excluded).
    pub evidence_count: u32,
    pub physical_interaction: f64,
    pub functional_association: f64,
    pub physical_vs_functional: f64,
}

impl InteractionFeatures {
    pub fn from_scores(scores: &EvidenceScores) -> Self {
        let norm = |v: u32| v as f64 / STRING_SCORE_SCALE;
        let physical = (scores.experimental + scores.database) as f64 / (2.0 * STRING_SCORE_SCALE);
        let functional =
            (scores.coexpression + scores.cooccurrence) as f64 / (2.0 * STRING_SCORE_SCALE);

        Self {
            combined_score: norm(scores.combined_score),
            experimental: norm(scores.experimental),
            database: norm(scores.database),
            coexpression: norm(scores.coexpression),
            neighborhood: norm(scores.neighborhood),
            fusion: norm(scores.fusion),
            cooccurrence: norm(scores.cooccurrence),
            textmining: norm(scores.textmining),
            has_interaction: scores.combined_score > 0,
            medium_confidence: scores.combined_score >= MEDIUM_CONFIDENCE,
            high_confidence: scores.combined_score >= HIGH_CONFIDENCE,
            evidence_count: scores
                .structured_channels()
                .iter()
                .filter(|&&s| s > 0)
                .count() as u32,
            physical_interaction: physical,
            functional_association: functional,
            physical_vs_functional: physical - functional,
        }
    }
}

impl FeatureGroup for InteractionFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "string_combined_score",
        "string_experimental",
        "string_database",
        "string_coexpression",
        "string_neighborhood",
        "string_fusion",
        "string_cooccurrence",
        "string_textmining",
        "string_has_interaction",
        "string_medium_confidence",
        "string_high_confidence",
        "string_evidence_count",
        "string_physical_interaction",
        "string_functional_association",
        "string_physical_vs_functional",
    ];

    fn values(&self) -> Vec<Option<f64>> {
        [
            self.combined_score,
            self.experimental,
            self.database,
            self.coexpression,
            self.neighborhood,
            self.fusion,
            self.cooccurrence,
            self.textmining,
            flag(self.has_interaction),
            flag(self.medium_confidence),
            flag(self.high_confidence),
            self.evidence_count as f64,
            self.physical_interaction,
            self.functional_association,
            self.physical_vs_functional,
        ]
        .into_iter()
        .map(Some)
        .collect()
    }
}

/// Interaction features for a pair, in either order.
///
/// Zero-filled when no index is loaded or the pair is not in it.
pub fn compute_interaction(
    gene_a: &str,
    gene_b: &str,
    index: Option<&InteractionIndex>,
) -> InteractionFeatures {
    index
        .and_then(|idx| idx.get(gene_a, gene_b))
        .map(InteractionFeatures::from_scores)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lethyx_ingestion::InteractionRecord;

    fn index() -> InteractionIndex {
        InteractionIndex::from_records(
            vec![InteractionRecord {
                gene_a: "BRCA1".to_string(),
                gene_b: "PARP1".to_string(),
                scores: EvidenceScores {
                    experimental: 800,
                    database: 900,
                    coexpression: 100,
                    textmining: 950,
                    combined_score: 720,
                    ..Default::default()
                },
            }],
            400,
        )
    }

    #[test]
    fn test_known_interaction() {
        let idx = index();
        let f = compute_interaction("PARP1", "BRCA1", Some(&idx));
        assert!((f.combined_score - 0.72).abs() < 1e-12);
        assert!(f.has_interaction);
        assert!(f.medium_confidence);
        assert!(f.high_confidence);
        assert_eq!(f.evidence_count, 3);
        assert!((f.physical_interaction - 0.85).abs() < 1e-12);
        assert!((f.functional_association - 0.05).abs() < 1e-12);
        assert!((f.physical_vs_functional - 0.80).abs() < 1e-12);
        assert_eq!(f, compute_interaction("BRCA1", "PARP1", Some(&idx)));
    }

    #[test]
    fn test_absent_pair_is_all_zero() {
        let idx = index();
        for f in [
            compute_interaction("TP53", "MYC", Some(&idx)),
            compute_interaction("BRCA1", "PARP1", None),
        ] {
            let values = f.values();
            assert_eq!(values.len(), 15);
            assert!(values.iter().all(|v| *v == Some(0.0)));
        }
    }
}

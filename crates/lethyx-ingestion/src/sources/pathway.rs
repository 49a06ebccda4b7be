//! Gene → pathway membership.
//!
//! Pathway identifiers follow the KEGG convention `hsa#####`, where the
//! leading characters encode the broad functional category.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::open_table;

/// Immutable mapping from gene symbol to the set of pathways it belongs to.
#[derive(Debug, Clone, Default)]
pub struct PathwayMap {
    memberships: HashMap<String, BTreeSet<String>>,
}

impl PathwayMap {
    /// Build from (gene, pathway) links. A leading `path:` prefix is stripped.
    pub fn from_links<I, G, P>(links: I) -> Self
    where
        I: IntoIterator<Item = (G, P)>,
        G: Into<String>,
        P: AsRef<str>,
    {
        let mut memberships: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (gene, pathway) in links {
            let pathway = normalise_pathway_id(pathway.as_ref());
            if pathway.is_empty() {
                continue;
            }
            memberships
                .entry(gene.into())
                .or_default()
                .insert(pathway.to_string());
        }
        Self { memberships }
    }

    /// Load a two-column gene/pathway link table (no header required; a
    /// first row naming `gene`/`gene_symbol` is skipped).
    pub fn load(path: &Path, delimiter: char) -> Result<Self> {
        debug!("Loading pathway links from {:?}", path);
        let mut reader = open_table(path, delimiter, false)?;

        let mut links = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = result.with_context(|| format!("Failed to read {:?}", path))?;
            let (Some(gene), Some(pathway)) = (row.get(0), row.get(1)) else {
                continue;
            };
            if i == 0 && (gene.eq_ignore_ascii_case("gene") || gene.eq_ignore_ascii_case("gene_symbol")) {
                continue;
            }
            if gene.is_empty() {
                continue;
            }
            links.push((gene.to_string(), pathway.to_string()));
        }

        let map = Self::from_links(links);
        info!(
            n_genes = map.gene_count(),
            n_pathways = map.pathway_count(),
            "Loaded pathway annotations"
        );
        Ok(map)
    }

    /// Pathways of a gene; `None` when the gene has no annotation.
    pub fn pathways(&self, gene: &str) -> Option<&BTreeSet<String>> {
        self.memberships.get(gene)
    }

    pub fn has_gene(&self, gene: &str) -> bool {
        self.memberships.contains_key(gene)
    }

    pub fn gene_count(&self) -> usize {
        self.memberships.len()
    }

    /// Number of distinct pathways across all genes.
    pub fn pathway_count(&self) -> usize {
        self.memberships
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }
}

fn normalise_pathway_id(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix("path:").unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_links_groups_by_gene() {
        let map = PathwayMap::from_links(vec![
            ("BRCA1", "path:hsa03440"),
            ("BRCA1", "hsa03460"),
            ("BRCA1", "hsa03440"),
            ("CDK1", "hsa04110"),
        ]);
        assert_eq!(map.gene_count(), 2);
        let brca1: Vec<&str> = map.pathways("BRCA1").unwrap().iter().map(|s| s.as_str()).collect();
        assert_eq!(brca1, vec!["hsa03440", "hsa03460"]);
        assert_eq!(map.pathway_count(), 3);
        assert!(map.pathways("TP53").is_none());
    }
}

//! Source loader tests against files on disk.

use lethyx_ingestion::sources::{sl_pairs, string};
use lethyx_ingestion::{InteractionIndex, PathwayMap, ProteinNames};
use pretty_assertions::assert_eq;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_string_detailed_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "string.txt",
        "gene_a gene_b neighborhood fusion cooccurence coexpression experimental database textmining combined_score\n\
         BRCA1 PARP1 0 0 0 62 823 900 954 999\n\
         TP53 MYC 0 0 0 80 0 0 120 150\n\
         ATR ATM 43 0 160 0 290 540 870 712\n",
    );

    let index = InteractionIndex::load(&path, ' ', 400, None).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.min_combined_score(), 400);

    let scores = index.get("PARP1", "BRCA1").unwrap();
    assert_eq!(scores.experimental, 823);
    assert_eq!(scores.database, 900);
    assert_eq!(scores.combined_score, 999);

    let scores = index.get("ATM", "ATR").unwrap();
    assert_eq!(scores.cooccurrence, 160);
    assert_eq!(scores.neighborhood, 43);
}

#[test]
fn test_load_string_requires_combined_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "string.tsv", "gene_a\tgene_b\texperimental\nA\tB\t100\n");
    assert!(InteractionIndex::load(&path, '\t', 0, None).is_err());
}

#[test]
fn test_load_string_missing_channels_read_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "string.tsv", "gene_a\tgene_b\tcombined_score\nA\tB\t500\n");
    let index = InteractionIndex::load(&path, '\t', 0, None).unwrap();
    assert_eq!(
        *index.get("A", "B").unwrap(),
        string::EvidenceScores {
            combined_score: 500,
            ..Default::default()
        }
    );
}

#[test]
fn test_load_string_protein_ids_map_to_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let info = write_file(
        &dir,
        "protein_info.txt",
        "#string_protein_id\tpreferred_name\tprotein_size\tannotation\n\
         9606.ENSP00000418960\tBRCA1\t1863\tBreast cancer type 1 susceptibility protein\n\
         9606.ENSP00000355759\tPARP1\t1014\tPoly [ADP-ribose] polymerase 1\n",
    );
    let links = write_file(
        &dir,
        "links.txt",
        "protein1 protein2 experimental combined_score\n\
         9606.ENSP00000418960 9606.ENSP00000355759 823 999\n\
         9606.ENSP00000418960 9606.ENSP00000999999 500 900\n",
    );

    let names = ProteinNames::load(&info, '\t').unwrap();
    assert_eq!(names.len(), 2);
    assert_eq!(names.resolve("9606.ENSP00000355759"), Some("PARP1"));

    let index = InteractionIndex::load(&links, ' ', 400, Some(&names)).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("PARP1", "BRCA1").unwrap().experimental, 823);
    assert!(!index.contains("9606.ENSP00000418960", "9606.ENSP00000355759"));
}

#[test]
fn test_load_string_protein_ids_without_names_fails() {
    let dir = tempfile::tempdir().unwrap();
    let links = write_file(
        &dir,
        "links.txt",
        "protein1 protein2 combined_score\n9606.ENSP1 9606.ENSP2 999\n",
    );
    let err = InteractionIndex::load(&links, ' ', 0, None).unwrap_err();
    assert!(format!("{:#}", err).contains("protein info table"));
}

#[test]
fn test_load_pathway_links() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "pathways.tsv",
        "gene_symbol\tpathway\nBRCA1\tpath:hsa03440\nBRCA1\tpath:hsa03460\nCDK1\thsa04110\n",
    );
    let map = PathwayMap::load(&path, '\t').unwrap();
    assert_eq!(map.gene_count(), 2);
    assert_eq!(map.pathways("BRCA1").unwrap().len(), 2);
    assert!(map.pathways("CDK1").unwrap().contains("hsa04110"));
    assert!(!map.has_gene("gene_symbol"));
}

#[test]
fn test_load_sl_pairs_with_misspelled_source_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "sl.csv",
        "n1.name,n2.name,rel_surce\nBRCA1,PARP1,Synthetic Lethality\nATM,ATR,Computational Prediction\n",
    );
    let records = sl_pairs::load(&path, ',').unwrap();
    assert_eq!(records.len(), 2);

    let (observed, computational) = sl_pairs::partition_by_source(records);
    assert_eq!(observed, vec![
        sl_pairs::SlPairRecord::new("BRCA1", "PARP1").with_source("Synthetic Lethality")
    ]);
    assert_eq!(computational.len(), 1);
}

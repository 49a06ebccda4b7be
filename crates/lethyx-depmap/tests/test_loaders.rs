//! Loader tests against files on disk.

use std::io::Write;

use lethyx_depmap::{GeneEffectMatrix, MutationMatrix};
use pretty_assertions::assert_eq;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_gene_effect_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "CRISPRGeneEffect.csv",
        ",PARP1 (142),BRCA1 (672)\nACH-000001,-0.9,-1.4\nACH-000002,-0.2,\n",
    );

    let matrix = GeneEffectMatrix::load_csv(&path).unwrap();
    assert_eq!(matrix.genes().to_vec(), vec!["PARP1".to_string(), "BRCA1".to_string()]);
    assert_eq!(
        matrix.cell_lines().to_vec(),
        vec!["ACH-000001".to_string(), "ACH-000002".to_string()]
    );
    assert!(matrix.column("BRCA1").unwrap()[1].is_nan());
}

#[test]
fn test_load_gene_effect_missing_file() {
    let err = GeneEffectMatrix::load_csv("does/not/exist.csv".as_ref()).unwrap_err();
    assert!(err.to_string().contains("Failed to open gene effect file"));
}

#[test]
fn test_load_gene_effect_ragged_row_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "bad.csv", "ModelID,A,B\nACH-1,1.0\n");
    assert!(GeneEffectMatrix::load_csv(&path).is_err());
}

#[test]
fn test_load_mutation_matrix_and_calls_agree() {
    let dir = tempfile::tempdir().unwrap();
    let matrix_path = write_file(
        &dir,
        "matrix.csv",
        "ModelID,TP53,ATM\nA,1,0\nB,0,1\n",
    );
    let calls_path = write_file(
        &dir,
        "calls.csv",
        "ModelID,HugoSymbol,VariantInfo\nA,TP53,MISSENSE\nB,ATM,NONSENSE\n",
    );

    let from_matrix = MutationMatrix::load(&matrix_path).unwrap();
    let from_calls = MutationMatrix::load(&calls_path).unwrap();

    for gene in ["TP53", "ATM"] {
        assert_eq!(from_matrix.column(gene), from_calls.column(gene), "gene {gene}");
    }
    assert_eq!(from_matrix.cell_lines(), from_calls.cell_lines());
}

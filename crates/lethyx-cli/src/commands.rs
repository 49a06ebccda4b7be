//! Subcommand implementations.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lethyx_common::config::{DataConfig, OutputFormat};
use lethyx_common::{KnownPairSet, LethyxConfig};
use lethyx_depmap::{GeneEffectMatrix, MutationMatrix};
use lethyx_features::{table, FeatureInputs, MutationStatsCache, PairFeatures};
use lethyx_ingestion::sources::sl_pairs::{self, SlPairRecord};
use lethyx_ingestion::{InteractionIndex, PathwayMap, ProteinNames};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::cli::{Commands, DatasetArgs, FeaturesArgs, NegativesArgs, ValidateArgs};

const PATHWAY_DELIMITER: char = '\t';
const SL_PAIRS_DELIMITER: char = ',';

pub fn run(command: Commands, config: &LethyxConfig) -> Result<()> {
    match command {
        Commands::Features(args) => run_features(args, config),
        Commands::Negatives(args) => run_negatives(args, config),
        Commands::ValidateNegatives(args) => run_validate(args, config),
        Commands::Dataset(args) => run_dataset(args, config),
    }
}

// ── Data products ────────────────────────────────────────────────────────────

/// Everything the feature extractors read, loaded once per run.
pub struct DataProducts {
    pub gene_effects: GeneEffectMatrix,
    pub mutations: Option<MutationMatrix>,
    pub mutation_cache: Option<MutationStatsCache>,
    pub interactions: Option<InteractionIndex>,
    pub pathways: Option<PathwayMap>,
}

impl DataProducts {
    /// Load the effect matrix (required) and whichever optional inputs exist.
    pub fn load(config: &LethyxConfig) -> Result<Self> {
        let data = &config.data;
        let gene_effects = GeneEffectMatrix::load_csv(&data.gene_effect_path())?;

        let mutations = load_optional(data.mutation_path(), "mutation matrix", |p| {
            MutationMatrix::load(p)
        })?;
        let mutation_cache = mutations
            .as_ref()
            .map(|m| MutationStatsCache::precompute(m, &gene_effects));

        let interaction = &config.interaction;
        // Only consulted when the interaction table is keyed by STRING protein id.
        let names = match data.protein_info_path() {
            Some(path) if path.exists() => Some(
                ProteinNames::load(&path, interaction.protein_info_delimiter)
                    .with_context(|| format!("Failed to load protein info table from {:?}", path))?,
            ),
            _ => None,
        };
        let interactions = load_optional(data.interaction_path(), "interaction table", |p| {
            InteractionIndex::load(
                p,
                interaction.delimiter,
                interaction.min_combined_score,
                names.as_ref(),
            )
        })?;
        let pathways = load_optional(data.pathway_path(), "pathway table", |p| {
            PathwayMap::load(p, PATHWAY_DELIMITER)
        })?;

        Ok(Self {
            gene_effects,
            mutations,
            mutation_cache,
            interactions,
            pathways,
        })
    }

    pub fn inputs(&self) -> FeatureInputs<'_> {
        let mut inputs = FeatureInputs::new(&self.gene_effects);
        if let Some(m) = &self.mutations {
            inputs = inputs.with_mutations(m, self.mutation_cache.as_ref());
        }
        if let Some(i) = &self.interactions {
            inputs = inputs.with_interactions(i);
        }
        if let Some(p) = &self.pathways {
            inputs = inputs.with_pathways(p);
        }
        inputs
    }
}

/// Run `load` when the file is configured and present; otherwise skip with a warning.
fn load_optional<T>(
    path: Option<PathBuf>,
    what: &str,
    load: impl FnOnce(&Path) -> Result<T>,
) -> Result<Option<T>> {
    let Some(path) = path else {
        info!("No {} configured; related features will be absent", what);
        return Ok(None);
    };
    if !path.exists() {
        warn!(path = %path.display(), "{} not found; related features will be absent", what);
        return Ok(None);
    }
    load(&path)
        .with_context(|| format!("Failed to load {} from {:?}", what, path))
        .map(Some)
}

fn load_sl_pairs(data: &DataConfig) -> Result<Vec<SlPairRecord>> {
    let path = data.sl_pairs_path();
    sl_pairs::load(&path, SL_PAIRS_DELIMITER)
        .with_context(|| format!("Failed to load known SL pairs from {:?}", path))
}

// ── Pair tables ──────────────────────────────────────────────────────────────

/// Pairs read from a `gene_a,gene_b[,label]` table.
#[derive(Debug, Default, PartialEq)]
pub struct PairTable {
    pub pairs: Vec<(String, String)>,
    pub labels: Option<Vec<u8>>,
}

/// Read a pair table; `.tsv`/`.txt` files are tab-separated.
pub fn read_pair_table(path: &Path) -> Result<PairTable> {
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("txt") => b'\t',
        _ => b',',
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open pair table {:?}", path))?;

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let col_a = position("gene_a").context("Pair table has no gene_a column")?;
    let col_b = position("gene_b").context("Pair table has no gene_b column")?;
    let col_label = position("label");

    let mut table = PairTable {
        labels: col_label.map(|_| Vec::new()),
        ..Default::default()
    };
    for (line, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("Failed to read {:?}", path))?;
        let (Some(a), Some(b)) = (row.get(col_a), row.get(col_b)) else {
            continue;
        };
        if let (Some(col), Some(labels)) = (col_label, table.labels.as_mut()) {
            let raw = row.get(col).unwrap_or("");
            let label = raw
                .parse::<u8>()
                .with_context(|| format!("Invalid label {:?} on row {}", raw, line + 2))?;
            labels.push(label);
        }
        table.pairs.push((a.to_string(), b.to_string()));
    }

    info!(n_pairs = table.pairs.len(), path = %path.display(), "Read pair table");
    Ok(table)
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    Ok(BufWriter::new(file))
}

fn write_features(
    path: &Path,
    format: OutputFormat,
    features: &[PairFeatures],
    labels: Option<&[u8]>,
) -> Result<()> {
    let writer = create_output(path)?;
    match format {
        OutputFormat::Csv => table::write_features_csv(writer, features, labels)?,
        OutputFormat::Json => table::write_features_jsonl(writer, features, labels)?,
    }
    info!(n_rows = features.len(), path = %path.display(), "Wrote feature table");
    Ok(())
}

// ── Commands ─────────────────────────────────────────────────────────────────

fn run_features(args: FeaturesArgs, config: &LethyxConfig) -> Result<()> {
    let table = read_pair_table(&args.pairs)?;
    let products = DataProducts::load(config)?;

    let features = lethyx_features::extract_batch(&table.pairs, &products.inputs());
    let format = args.format.map(Into::into).unwrap_or(config.output.format);
    write_features(&args.output, format, &features, table.labels.as_deref())
}

fn run_negatives(args: NegativesArgs, config: &LethyxConfig) -> Result<()> {
    let gene_effects = GeneEffectMatrix::load_csv(&config.data.gene_effect_path())?;
    let known = sl_pairs::known_pair_set(&load_sl_pairs(&config.data)?);

    let seed = args.seed.unwrap_or(config.sampling.seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let negatives = lethyx_features::generate_negative_pairs(
        args.count,
        &known,
        gene_effects.genes(),
        config.sampling.attempt_factor,
        &mut rng,
    );

    let n = table::write_pairs_csv(create_output(&args.output)?, negatives)?;
    info!(n_pairs = n, seed, path = %args.output.display(), "Wrote negative pairs");
    Ok(())
}

fn run_validate(args: ValidateArgs, config: &LethyxConfig) -> Result<()> {
    let candidates = read_pair_table(&args.input)?;
    let known = sl_pairs::known_pair_set(&load_sl_pairs(&config.data)?);
    validate_against(candidates, &known, &args.output)
}

fn validate_against(candidates: PairTable, known: &KnownPairSet, output: &Path) -> Result<()> {
    let report = lethyx_features::validate_negative_pairs(candidates.pairs, known);
    table::write_pairs_csv(create_output(output)?, report.kept)?;
    Ok(())
}

fn run_dataset(args: DatasetArgs, config: &LethyxConfig) -> Result<()> {
    let records = load_sl_pairs(&config.data)?;
    // Computational predictions are still excluded from negatives.
    let known_all = sl_pairs::known_pair_set(&records);
    let positives: Vec<(String, String)> = if args.include_computational {
        records.iter().map(|r| (r.gene_a.clone(), r.gene_b.clone())).collect()
    } else {
        let (observed, _) = sl_pairs::partition_by_source(records);
        observed.into_iter().map(|r| (r.gene_a, r.gene_b)).collect()
    };

    let products = DataProducts::load(config)?;
    let seed = args.seed.unwrap_or(config.sampling.seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let labeled = lethyx_features::assemble_training_pairs(
        &positives,
        &known_all,
        products.gene_effects.genes(),
        config.sampling.negative_ratio,
        config.sampling.attempt_factor,
        &mut rng,
    );
    let (pairs, labels): (Vec<(String, String)>, Vec<u8>) = labeled
        .into_iter()
        .map(|p| ((p.gene_a, p.gene_b), p.label))
        .unzip();

    let features = lethyx_features::extract_batch(&pairs, &products.inputs());
    let format = args.format.map(Into::into).unwrap_or(config.output.format);
    write_features(&args.output, format, &features, Some(&labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lethyx_test_utils::write_fixture;

    fn data_dir() -> (tempfile::TempDir, LethyxConfig) {
        let dir = tempfile::tempdir().unwrap();
        let lines: Vec<String> = (0..12).map(|i| format!("ACH-{:06}", i)).collect();
        let mut csv = String::from("ModelID,BRCA1 (672),PARP1 (142),TP53 (7157),MYC (4609)\n");
        for (i, line) in lines.iter().enumerate() {
            let x = i as f64 / 10.0;
            csv.push_str(&format!("{},{},{},{},{}\n", line, -x, x - 1.0, 0.1 * x, -0.3));
        }
        write_fixture(&dir, "CRISPRGeneEffect.csv", &csv);
        write_fixture(
            &dir,
            "sl_pairs.csv",
            "gene_a,gene_b,rel_source\nBRCA1,PARP1,Synthetic Lethality\nTP53,MYC,Computational Prediction\n",
        );
        write_fixture(&dir, "kegg_gene_pathways.tsv", "BRCA1\thsa03440\nPARP1\thsa03410\n");

        let mut config = LethyxConfig::default();
        config.data.dir = dir.path().to_path_buf();
        (dir, config)
    }

    #[test]
    fn test_data_products_skip_missing_optional_inputs() {
        let (_dir, config) = data_dir();
        let products = DataProducts::load(&config).unwrap();
        assert_eq!(products.gene_effects.gene_count(), 4);
        assert!(products.mutations.is_none());
        assert!(products.mutation_cache.is_none());
        assert!(products.interactions.is_none());
        assert!(products.pathways.is_some());
    }

    #[test]
    fn test_data_products_map_string_protein_ids() {
        let (dir, config) = data_dir();
        write_fixture(
            &dir,
            "string_interactions.txt",
            "protein1 protein2 experimental combined_score\n9606.ENSP01 9606.ENSP02 700 950\n",
        );
        write_fixture(
            &dir,
            "string_protein_info.txt",
            "#string_protein_id\tpreferred_name\n9606.ENSP01\tBRCA1\n9606.ENSP02\tPARP1\n",
        );
        let products = DataProducts::load(&config).unwrap();
        let interactions = products.interactions.unwrap();
        assert_eq!(interactions.get("PARP1", "BRCA1").unwrap().combined_score, 950);
    }

    #[test]
    fn test_read_pair_table_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "pairs.csv", "gene_a,gene_b,label\nBRCA1,PARP1,1\nTP53,MYC,0\n");
        let table = read_pair_table(&path).unwrap();
        assert_eq!(table.pairs.len(), 2);
        assert_eq!(table.labels, Some(vec![1, 0]));

        let bad = write_fixture(&dir, "bad.csv", "gene_a,gene_b,label\nA,B,yes\n");
        assert!(read_pair_table(&bad).is_err());
    }

    #[test]
    fn test_features_command_writes_table() {
        let (dir, config) = data_dir();
        let pairs = write_fixture(&dir, "pairs.tsv", "gene_a\tgene_b\nBRCA1\tPARP1\n");
        let output = dir.path().join("out").join("features.csv");
        run_features(
            FeaturesArgs {
                pairs,
                output: output.clone(),
                format: None,
            },
            &config,
        )
        .unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("gene_a,gene_b,depmap_pearson_correlation"));
    }

    #[test]
    fn test_negatives_exclude_known_pairs() {
        let (dir, config) = data_dir();
        let output = dir.path().join("negatives.csv");
        run_negatives(
            NegativesArgs {
                count: 4,
                output: output.clone(),
                seed: Some(1),
            },
            &config,
        )
        .unwrap();

        let table = read_pair_table(&output).unwrap();
        assert!(!table.pairs.is_empty());
        for (a, b) in &table.pairs {
            assert_ne!(a, b);
            let pair = lethyx_common::GenePair::new(a.as_str(), b.as_str());
            assert_ne!(pair, lethyx_common::GenePair::new("BRCA1", "PARP1"));
            assert_ne!(pair, lethyx_common::GenePair::new("MYC", "TP53"));
        }
    }

    #[test]
    fn test_validate_drops_known() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clean.csv");
        let mut known = KnownPairSet::new();
        known.insert("BRCA1", "PARP1");
        let candidates = PairTable {
            pairs: vec![
                ("PARP1".to_string(), "BRCA1".to_string()),
                ("TP53".to_string(), "BRCA1".to_string()),
            ],
            labels: None,
        };
        validate_against(candidates, &known, &output).unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "gene_a,gene_b\nTP53,BRCA1\n"
        );
    }

    #[test]
    fn test_dataset_labels_observed_positives() {
        let (dir, config) = data_dir();
        let output = dir.path().join("train.csv");
        run_dataset(
            DatasetArgs {
                output: output.clone(),
                include_computational: false,
                seed: None,
                format: None,
            },
            &config,
        )
        .unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert!(rows[0].starts_with("BRCA1,PARP1,1,"));
        assert_eq!(rows.iter().filter(|r| r.split(',').nth(2) == Some("1")).count(), 1);
        assert_eq!(rows.len(), 2);
    }
}

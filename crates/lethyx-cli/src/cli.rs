use clap::{Parser, Subcommand, ValueEnum};
use lethyx_common::config::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lethyx: gene-pair features for synthetic lethality prediction
#[derive(Parser, Debug)]
#[command(name = "lethyx")]
#[command(about = "Gene-pair feature extraction for synthetic lethality prediction")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to $LETHYX_CONFIG, then ./lethyx.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract features for the pairs in a table
    Features(FeaturesArgs),

    /// Sample negative pairs from the screened gene universe
    Negatives(NegativesArgs),

    /// Remove known SL pairs from a table of negatives
    ValidateNegatives(ValidateArgs),

    /// Build a labeled feature table from known pairs and sampled negatives
    Dataset(DatasetArgs),
}

#[derive(Parser, Debug)]
pub struct FeaturesArgs {
    /// Pair table with gene_a and gene_b columns (and an optional label)
    #[arg(short, long)]
    pub pairs: PathBuf,

    /// Output feature table
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Parser, Debug)]
pub struct NegativesArgs {
    /// Number of pairs to sample
    #[arg(short = 'n', long)]
    pub count: usize,

    /// Output pair table
    #[arg(short, long)]
    pub output: PathBuf,

    /// Random seed (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Candidate negative pair table
    #[arg(short, long)]
    pub input: PathBuf,

    /// Cleaned pair table
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct DatasetArgs {
    /// Output feature table with a label column
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep computationally predicted pairs as positives
    #[arg(long)]
    pub include_computational: bool,

    /// Random seed (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `verbose`.
pub fn setup_logging(verbose: bool) {
    let default = if verbose { "lethyx=debug,info" } else { "lethyx=info,warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_parse() {
        let cli = Cli::parse_from(["lethyx", "features", "-p", "pairs.csv", "-o", "out.csv"]);
        assert!(!cli.verbose);
        match cli.command {
            Commands::Features(args) => {
                assert_eq!(args.pairs, PathBuf::from("pairs.csv"));
                assert_eq!(args.output, PathBuf::from("out.csv"));
                assert_eq!(args.format, None);
            }
            _ => panic!("Expected Features command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "lethyx", "negatives", "-n", "500", "-o", "neg.csv", "--seed", "7", "-v", "--config", "run.toml",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("run.toml")));
        match cli.command {
            Commands::Negatives(args) => {
                assert_eq!(args.count, 500);
                assert_eq!(args.seed, Some(7));
            }
            _ => panic!("Expected Negatives command"),
        }
    }

    #[test]
    fn test_validate_negatives_subcommand_name() {
        let cli = Cli::parse_from(["lethyx", "validate-negatives", "-i", "neg.csv", "-o", "clean.csv"]);
        assert!(matches!(cli.command, Commands::ValidateNegatives(_)));
    }

    #[test]
    fn test_dataset_format() {
        let cli = Cli::parse_from(["lethyx", "dataset", "-o", "train.jsonl", "--format", "json"]);
        match cli.command {
            Commands::Dataset(args) => {
                assert_eq!(args.format.map(OutputFormat::from), Some(OutputFormat::Json));
                assert!(!args.include_computational);
            }
            _ => panic!("Expected Dataset command"),
        }
    }

    #[test]
    fn test_count_required() {
        assert!(Cli::try_parse_from(["lethyx", "negatives", "-o", "neg.csv"]).is_err());
    }
}

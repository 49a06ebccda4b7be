//! Lethyx: gene-pair feature extraction for synthetic lethality prediction.
//! Entry point for the `lethyx` binary.

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use lethyx_common::LethyxConfig;
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    cli::setup_logging(cli.verbose);

    info!("Lethyx {}", env!("CARGO_PKG_VERSION"));

    let config = LethyxConfig::load_with(cli.config.as_deref())
        .context("Failed to load configuration")?;
    debug!(data_dir = %config.data.dir.display(), "Configuration ready");

    commands::run(cli.command, &config)
}

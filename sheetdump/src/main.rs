use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use sheetroster_core::analyzer::{self, Outcome};
use sheetroster_core::{Config, SheetSelector, logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetdump")]
#[command(about = "Dump the first rows of a workbook sheet to a text report")]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS file (defaults to the configured workbook)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Read the sheet with this name
    #[arg(long, value_name = "NAME", conflicts_with_all = ["sheet_index", "active_sheet"])]
    sheet: Option<String>,

    /// Read the sheet at this zero-based position
    #[arg(long, value_name = "N", conflicts_with = "active_sheet")]
    sheet_index: Option<usize>,

    /// Read the sheet that was active when the workbook was saved
    #[arg(long)]
    active_sheet: bool,

    /// Number of rows to dump
    #[arg(long)]
    rows: Option<u32>,

    /// Number of columns to dump per row
    #[arg(long)]
    columns: Option<u32>,

    /// Report file to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = build_config(&cli)?;

    let outcome = analyzer::run(&config).with_context(|| {
        format!(
            "Failed to write report file: {}",
            config.analyze.output.display()
        )
    })?;

    match outcome {
        Outcome::Saved { path, .. } => println!("Analysis saved to {}", path.display()),
        Outcome::Failed { error, .. } => println!("{} {}", "Error:".red().bold(), error),
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(file) = &cli.file {
        config.workbook = file.clone();
    }
    if let Some(name) = &cli.sheet {
        config.sheet = SheetSelector::Name(name.clone());
    } else if let Some(index) = cli.sheet_index {
        config.sheet = SheetSelector::Index(index);
    } else if cli.active_sheet {
        config.sheet = SheetSelector::Active;
    }
    if let Some(rows) = cli.rows {
        config.analyze.rows = rows;
    }
    if let Some(columns) = cli.columns {
        config.analyze.columns = columns;
    }
    if let Some(output) = &cli.output {
        config.analyze.output = output.clone();
    }

    config.validate().context("Invalid configuration")?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

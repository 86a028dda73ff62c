use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use sheetroster_core::{Config, Presence, SheetSelector, extractor, logging, sql};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "sheetsql")]
#[command(about = "Extract client (index, name) blocks from a roster workbook as SQL value tuples", long_about = None)]
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

    /// First row to scan (1-based, inclusive)
    #[arg(long)]
    first_row: Option<u32>,

    /// Last row to scan (1-based, inclusive)
    #[arg(long)]
    last_row: Option<u32>,

    /// When an index or name cell counts as present
    #[arg(long, value_enum)]
    presence: Option<PresenceArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "sql")]
    format: OutputFormat,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresenceArg {
    /// Zero, false and empty text count as missing
    Truthy,
    /// Only empty cells count as missing
    NonEmpty,
}

impl From<PresenceArg> for Presence {
    fn from(arg: PresenceArg) -> Self {
        match arg {
            PresenceArg::Truthy => Presence::Truthy,
            PresenceArg::NonEmpty => Presence::NonEmpty,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Status lines followed by SQL value tuples
    Sql,
    /// JSON array of records
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = build_config(&cli)?;

    match cli.format {
        OutputFormat::Sql => {
            println!("Extracting clients...");
            match extractor::run(&config) {
                Ok(records) => print!("{}", sql::render_summary(&records)),
                Err(e) => println!("{} {}", "Error:".red().bold(), e),
            }
        }
        OutputFormat::Json => match extractor::run(&config) {
            Ok(records) => formatter::print_json(&records)?,
            Err(e) => println!("{} {}", "Error:".red().bold(), e),
        },
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
    if let Some(first_row) = cli.first_row {
        config.extract.first_row = first_row;
    }
    if let Some(last_row) = cli.last_row {
        config.extract.last_row = last_row;
    }
    if let Some(presence) = cli.presence {
        config.extract.presence = presence.into();
    }

    config.validate().context("Invalid configuration")?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

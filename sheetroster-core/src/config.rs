//! Configuration for the analyzer and the extractor
//!
//! Every field defaults to the layout of the Cayhuayna roster template, so an
//! empty (or missing) config file reproduces the historical behavior.

use crate::error::{Error, Result};
use crate::reader::SheetSelector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "sheetroster.toml";

pub const DEFAULT_WORKBOOK: &str = "Repartidor Cayhuayna 30.xlsx";
pub const DEFAULT_REPORT: &str = "excel_analysis.txt";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_workbook")]
    pub workbook: PathBuf,
    #[serde(default)]
    pub sheet: SheetSelector,
    #[serde(default)]
    pub analyze: AnalyzeConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Use `explicit` if given, else the default file in the working directory
    /// if it exists, else built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.analyze.rows == 0 || self.analyze.columns == 0 {
            return Err(Error::Config(
                "analyze.rows and analyze.columns must be at least 1".to_string(),
            ));
        }

        let extract = &self.extract;
        if extract.first_row == 0 {
            return Err(Error::Config(
                "extract.first_row is 1-based and must be at least 1".to_string(),
            ));
        }
        if extract.first_row > extract.last_row {
            return Err(Error::Config(format!(
                "extract.first_row ({}) is after extract.last_row ({})",
                extract.first_row, extract.last_row
            )));
        }
        if extract.blocks.is_empty() {
            return Err(Error::Config(
                "extract.blocks needs at least one column block".to_string(),
            ));
        }
        for block in &extract.blocks {
            if block.index == block.name {
                return Err(Error::Config(format!(
                    "column block {} uses the same column for index and name",
                    block
                )));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook: default_workbook(),
            sheet: SheetSelector::default(),
            analyze: AnalyzeConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

/// Settings for the text dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    /// Rows to dump, starting at row 1
    pub rows: u32,
    /// Columns to dump per row, starting at column A
    pub columns: u32,
    /// Report file, overwritten on every run
    pub output: PathBuf,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            columns: 20,
            output: PathBuf::from(DEFAULT_REPORT),
        }
    }
}

/// Settings for the (index, name) extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// First row to scan (1-based, inclusive)
    pub first_row: u32,
    /// Last row to scan (1-based, inclusive)
    pub last_row: u32,
    pub blocks: Vec<ColumnBlock>,
    pub presence: Presence,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            first_row: 7,
            last_row: 31,
            blocks: vec![
                ColumnBlock::new(0, 1),
                ColumnBlock::new(11, 12),
                ColumnBlock::new(22, 23),
            ],
            presence: Presence::default(),
        }
    }
}

/// A pair of zero-based column offsets holding one (index, name) record.
///
/// Written in TOML as a two-element array: `blocks = [[0, 1], [11, 12]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct ColumnBlock {
    pub index: u32,
    pub name: u32,
}

impl ColumnBlock {
    pub fn new(index: u32, name: u32) -> Self {
        Self { index, name }
    }

    /// Row width needed to read both columns
    pub fn required_width(&self) -> u32 {
        self.index.max(self.name) + 1
    }
}

impl From<[u32; 2]> for ColumnBlock {
    fn from([index, name]: [u32; 2]) -> Self {
        Self { index, name }
    }
}

impl From<ColumnBlock> for [u32; 2] {
    fn from(block: ColumnBlock) -> Self {
        [block.index, block.name]
    }
}

impl std::fmt::Display for ColumnBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.index, self.name)
    }
}

/// When an index or name cell counts as present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Presence {
    /// Zero, `false`, empty text and empty cells are all missing
    #[default]
    Truthy,
    /// Only empty cells and whitespace-only text are missing
    NonEmpty,
}

fn default_workbook() -> PathBuf {
    PathBuf::from(DEFAULT_WORKBOOK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_template_layout() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.workbook, PathBuf::from("Repartidor Cayhuayna 30.xlsx"));
        assert_eq!(config.analyze.rows, 20);
        assert_eq!(config.analyze.output, PathBuf::from("excel_analysis.txt"));
        assert_eq!(config.extract.first_row, 7);
        assert_eq!(config.extract.last_row, 31);
        assert_eq!(
            config.extract.blocks,
            vec![
                ColumnBlock::new(0, 1),
                ColumnBlock::new(11, 12),
                ColumnBlock::new(22, 23)
            ]
        );
        assert_eq!(config.extract.presence, Presence::Truthy);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
workbook = "roster.xlsx"
sheet = { name = "Clientes" }

[analyze]
rows = 5
output = "dump.txt"

[extract]
first_row = 2
last_row = 9
blocks = [[0, 1], [3, 4]]
presence = "non-empty"
"#,
        )
        .unwrap();

        assert_eq!(config.workbook, PathBuf::from("roster.xlsx"));
        assert_eq!(config.sheet, SheetSelector::Name("Clientes".to_string()));
        assert_eq!(config.analyze.rows, 5);
        assert_eq!(config.analyze.columns, 20);
        assert_eq!(config.analyze.output, PathBuf::from("dump.txt"));
        assert_eq!(
            config.extract.blocks,
            vec![ColumnBlock::new(0, 1), ColumnBlock::new(3, 4)]
        );
        assert_eq!(config.extract.presence, Presence::NonEmpty);
    }

    #[test]
    fn test_sheet_selector_forms() {
        let config = Config::from_toml(r#"sheet = "active""#).unwrap();
        assert_eq!(config.sheet, SheetSelector::Active);

        let config = Config::from_toml(r#"sheet = { index = 1 }"#).unwrap();
        assert_eq!(config.sheet, SheetSelector::Index(1));
    }

    #[test]
    fn test_validation() {
        assert!(Config::from_toml("[extract]\nfirst_row = 0").is_err());
        assert!(Config::from_toml("[extract]\nfirst_row = 10\nlast_row = 3").is_err());
        assert!(Config::from_toml("[extract]\nblocks = []").is_err());
        assert!(Config::from_toml("[extract]\nblocks = [[2, 2]]").is_err());
        assert!(Config::from_toml("[analyze]\ncolumns = 0").is_err());
        assert!(Config::from_toml("[extract]\npresence = \"maybe\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let err = Config::load(Some(Path::new("no/such/sheetroster.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_block_width() {
        assert_eq!(ColumnBlock::new(22, 23).required_width(), 24);
        assert_eq!(ColumnBlock::new(5, 2).required_width(), 6);
    }
}

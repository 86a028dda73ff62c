//! Error types shared by the analyzer and the extractor

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading or processing a roster workbook
#[derive(Error, Debug)]
pub enum Error {
    /// The workbook file does not exist
    #[error("workbook not found: {}", .0.display())]
    NotFound(PathBuf),

    /// calamine could not open or parse the workbook
    #[error("malformed workbook {}: {source}", .path.display())]
    MalformedWorkbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The sheet selector did not match any sheet
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// The sheet layout does not fit the configured column blocks
    #[error("unexpected sheet shape: {0}")]
    UnexpectedShape(String),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

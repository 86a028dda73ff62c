//! sheetroster-core: reading client-roster workbooks
//!
//! Two views over the same sheet: a plain-text dump of its top-left corner
//! ([`analyzer`]) and the (index, name) records held in fixed column blocks,
//! formatted as SQL value tuples ([`extractor`], [`sql`]).

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod reader;
pub mod sql;

pub use config::{AnalyzeConfig, ColumnBlock, Config, ExtractConfig, Presence};
pub use error::{Error, Result};
pub use extractor::ClientRecord;
pub use reader::{CellValue, Sheet, SheetSelector};

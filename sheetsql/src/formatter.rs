//! JSON output for extracted records

use anyhow::Result;
use serde::Serialize;
use sheetroster_core::ClientRecord;

#[derive(Serialize)]
struct RecordOutput {
    row: u32,
    block: usize,
    index: String,
    name: String,
}

impl From<&ClientRecord> for RecordOutput {
    fn from(record: &ClientRecord) -> Self {
        Self {
            row: record.row,
            block: record.block,
            index: record.index_literal(),
            name: record.name_text(),
        }
    }
}

/// Print records as a pretty JSON array
pub fn print_json(records: &[ClientRecord]) -> Result<()> {
    let output: Vec<RecordOutput> = records.iter().map(RecordOutput::from).collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

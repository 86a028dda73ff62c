//! SQL value-tuple formatting for extracted records

use crate::extractor::ClientRecord;

/// Escape text for use inside a single-quoted SQL literal
pub fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// `(index, 'name')` for one record
pub fn value_tuple(record: &ClientRecord) -> String {
    format!(
        "({}, '{}')",
        record.index_literal(),
        escape_literal(&record.name_text())
    )
}

/// All tuples, indented and joined with `,\n`, ready to follow `VALUES`
pub fn values_list(records: &[ClientRecord]) -> String {
    records
        .iter()
        .map(|r| format!("  {}", value_tuple(r)))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Console summary printed after a successful extraction
pub fn render_summary(records: &[ClientRecord]) -> String {
    format!(
        "Found {} clients.\n\nSQL VALUES:\n{}\n",
        records.len(),
        values_list(records)
    )
}

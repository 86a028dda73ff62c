//! Plain-text dump of the top-left corner of a sheet

use crate::config::{AnalyzeConfig, Config};
use crate::error::{Error, Result};
use crate::reader::{self, Sheet};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// The stringified grid of one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sheet_name: String,
    /// One entry per scanned row, each as wide as the configured column count
    pub rows: Vec<Vec<String>>,
}

impl Report {
    /// Render the report file contents
    pub fn render(&self) -> String {
        let mut out = format!("Sheet Name: {}\n", self.sheet_name);
        out.push_str(&"-".repeat(50));
        out.push('\n');
        out.push_str(&format!("Scanning first {} rows:\n", self.rows.len()));

        for (i, cells) in self.rows.iter().enumerate() {
            out.push_str(&format!("Row {}: {}\n", i + 1, format_cell_list(cells)));
        }

        out
    }
}

/// Result of a full analyzer run; either way the report file was written
#[derive(Debug)]
pub enum Outcome {
    Saved { path: PathBuf, report: Report },
    Failed { path: PathBuf, error: Error },
}

/// Stringify the first `rows` × `columns` cells. Values are trimmed and
/// missing cells become empty strings.
pub fn analyze(sheet: &Sheet, config: &AnalyzeConfig) -> Report {
    let rows = (0..config.rows)
        .map(|r| {
            sheet
                .row(r)
                .cells(config.columns as usize)
                .map(|value| value.to_string().trim().to_string())
                .collect()
        })
        .collect();

    Report {
        sheet_name: sheet.name.clone(),
        rows,
    }
}

/// Load the configured sheet and write the report file. Read failures are
/// written to the report file instead; only failing to write it is an error.
pub fn run(config: &Config) -> Result<Outcome> {
    let path = config.analyze.output.clone();

    match reader::read_sheet(&config.workbook, &config.sheet) {
        Ok(sheet) => {
            let report = analyze(&sheet, &config.analyze);
            fs::write(&path, report.render())?;
            debug!("wrote {} rows to {}", report.rows.len(), path.display());
            Ok(Outcome::Saved { path, report })
        }
        Err(error) => {
            warn!("analysis failed: {}", error);
            fs::write(&path, format!("Error reading file: {}", error))?;
            Ok(Outcome::Failed { path, error })
        }
    }
}

/// Bracketed, comma-separated list of quoted cell strings
pub fn format_cell_list(cells: &[String]) -> String {
    let quoted: Vec<String> = cells.iter().map(|c| quote_cell(c)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Quote a cell string. Single quotes are used unless the text contains a
/// single quote and no double quote; backslashes, the chosen quote and
/// non-printable characters are escaped.
pub fn quote_cell(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x100 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out.push(quote);
    out
}

/// False for controls, format characters, separators other than the plain
/// space, private-use code points and noncharacters. Unassigned code points
/// are not tracked and count as printable.
fn is_printable(c: char) -> bool {
    let cp = c as u32;
    if c == ' ' {
        return true;
    }
    if c.is_control() {
        return false;
    }
    !matches!(
        cp,
        // Space separators
        0xA0 | 0x1680 | 0x2000..=0x200A | 0x202F | 0x205F | 0x3000
        // Line and paragraph separators
        | 0x2028 | 0x2029
        // Format characters
        | 0xAD | 0x600..=0x605 | 0x61C | 0x6DD | 0x70F | 0x890..=0x891 | 0x8E2
        | 0x180E | 0x200B..=0x200F | 0x202A..=0x202E | 0x2060..=0x2064
        | 0x2066..=0x206F | 0xFEFF | 0xFFF9..=0xFFFB | 0x110BD | 0x110CD
        | 0x13430..=0x1343F | 0x1BCA0..=0x1BCA3 | 0x1D173..=0x1D17A
        | 0xE0001 | 0xE0020..=0xE007F
        // Private use
        | 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD
        // Noncharacters
        | 0xFDD0..=0xFDEF
    ) && cp & 0xFFFE != 0xFFFE
}

//! Workbook reader using calamine

use crate::error::{Error, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

pub mod workbook;
pub mod xml_parser;

pub use workbook::{CellValue, Row, Sheet};

/// Which sheet of the workbook to read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetSelector {
    /// The first sheet in workbook order
    #[default]
    First,
    /// The sheet that was active when the workbook was saved
    Active,
    /// Zero-based position in workbook order
    Index(usize),
    Name(String),
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::First => f.write_str("first sheet"),
            SheetSelector::Active => f.write_str("active sheet"),
            SheetSelector::Index(i) => write!(f, "sheet #{}", i),
            SheetSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Read a single sheet of a workbook, with formulas resolved to cached values
pub fn read_sheet<P: AsRef<Path>>(path: P, selector: &SheetSelector) -> Result<Sheet> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let malformed = |source| Error::MalformedWorkbook {
        path: path.to_path_buf(),
        source,
    };

    let mut excel = open_workbook_auto(path).map_err(malformed)?;
    let sheet_names = excel.sheet_names();

    let name = match selector {
        SheetSelector::First => sheet_names.first().cloned(),
        SheetSelector::Active => {
            let index = active_sheet_index(path).unwrap_or(0);
            sheet_names
                .get(index)
                .or_else(|| sheet_names.first())
                .cloned()
        }
        SheetSelector::Index(i) => sheet_names.get(*i).cloned(),
        SheetSelector::Name(wanted) => sheet_names.iter().find(|n| *n == wanted).cloned(),
    }
    .ok_or_else(|| Error::SheetNotFound(selector.to_string()))?;

    let range = excel.worksheet_range(&name).map_err(malformed)?;
    let sheet = parse_sheet(&name, &range);

    debug!(
        sheet = %sheet.name,
        rows = sheet.height(),
        columns = sheet.width(),
        "loaded sheet from {}",
        path.display()
    );

    Ok(sheet)
}

/// Active tab recorded in an XLSX package; `None` for other formats or when
/// the workbook does not record one
fn active_sheet_index(path: &Path) -> Option<usize> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    if !matches!(ext.as_deref(), Some("xlsx") | Some("xlsm")) {
        debug!("no active sheet metadata for {}, using first sheet", path.display());
        return None;
    }

    let archive = File::open(path)
        .map_err(|e| e.to_string())
        .and_then(|f| zip::ZipArchive::new(BufReader::new(f)).map_err(|e| e.to_string()));

    match archive {
        Ok(mut archive) => match xml_parser::extract_active_tab_from_xlsx(&mut archive) {
            Ok(index) => index,
            Err(e) => {
                warn!("could not read active sheet from {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            warn!("could not open {} as a zip archive: {}", path.display(), e);
            None
        }
    }
}

fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);

    let Some((start_row, start_col)) = range.start() else {
        return sheet;
    };

    for (rel_row, rel_col, data) in range.used_cells() {
        sheet.insert(
            start_row + rel_row as u32,
            start_col + rel_col as u32,
            parse_cell_value(data),
        );
    }

    // Trailing empty cells inside the range still count towards its size
    if let Some((end_row, end_col)) = range.end() {
        sheet.used_range = Some((end_row + 1, end_col + 1));
    }

    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return CellValue::Number(dt.as_f64());
            }
            match dt.as_datetime() {
                // Serials below one day carry no date part
                Some(value) if dt.as_f64() < 1.0 => CellValue::Time(value.time()),
                Some(value) => CellValue::DateTime(value),
                None => CellValue::Number(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn parse_iso_datetime(s: &str) -> CellValue {
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        CellValue::DateTime(dt)
    } else if let Ok(date) = s.parse::<NaiveDate>() {
        CellValue::DateTime(date.and_time(NaiveTime::MIN))
    } else if let Ok(time) = s.parse::<NaiveTime>() {
        CellValue::Time(time)
    } else {
        CellValue::Text(s.to_string())
    }
}

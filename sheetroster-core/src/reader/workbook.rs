//! Sheet data structures

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use std::collections::HashMap;
use std::fmt;

static EMPTY: CellValue = CellValue::Empty;

/// Represents a worksheet as a sparse grid of resolved values
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    /// Non-empty values keyed by zero-based absolute (row, col)
    pub cells: HashMap<(u32, u32), CellValue>,
    pub used_range: Option<(u32, u32)>, // (rows, cols), counted from A1
}

impl Sheet {
    /// Create an empty sheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
            used_range: None,
        }
    }

    /// Build a sheet from rows starting at A1. Every position given counts
    /// towards the used range, including `CellValue::Empty` ones.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut sheet = Self::new(name);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                sheet.insert(r as u32, c as u32, value);
            }
        }
        sheet
    }

    /// Place a value, growing the used range to cover it
    pub fn insert(&mut self, row: u32, col: u32, value: CellValue) {
        let (rows, cols) = self.used_range.unwrap_or((0, 0));
        self.used_range = Some((rows.max(row + 1), cols.max(col + 1)));

        if !value.is_empty() {
            self.cells.insert((row, col), value);
        }
    }

    /// Value at the given position, `Empty` when nothing is stored there
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.cells.get(&(row, col)).unwrap_or(&EMPTY)
    }

    /// Number of rows up to the last used one
    pub fn height(&self) -> u32 {
        self.used_range.map(|(rows, _)| rows).unwrap_or(0)
    }

    /// Number of columns up to the last used one
    pub fn width(&self) -> u32 {
        self.used_range.map(|(_, cols)| cols).unwrap_or(0)
    }

    /// Zero-based row view; rows past the used range read as empty
    pub fn row(&self, index: u32) -> Row<'_> {
        Row { sheet: self, index }
    }
}

/// One row of a sheet, as wide as the sheet's used range
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    sheet: &'a Sheet,
    index: u32,
}

impl<'a> Row<'a> {
    /// 1-based row number as shown by spreadsheet applications
    pub fn number(&self) -> u32 {
        self.index + 1
    }

    pub fn len(&self) -> usize {
        self.sheet.width() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `col`, or `None` when the column lies beyond the row width
    pub fn get(&self, col: usize) -> Option<&'a CellValue> {
        let sheet: &'a Sheet = self.sheet;
        (col < self.len()).then(|| sheet.value(self.index, col as u32))
    }

    /// The first `count` values, padding with `Empty` past the row width
    pub fn cells(self, count: usize) -> impl Iterator<Item = &'a CellValue> + 'a {
        let sheet = self.sheet;
        let index = self.index;
        (0..count as u32).map(move |col| sheet.value(index, col))
    }
}

/// Cell value types, with formulas already resolved to their cached result
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty, or text made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Loose truth value: empty cells, zero, empty text and `false` are falsy.
    /// Whitespace-only text is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Number(n) => *n != 0.0,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Boolean(b) => *b,
            CellValue::Error(_) | CellValue::DateTime(_) | CellValue::Time(_) => true,
        }
    }

    /// Integer reading of the value: integral numbers, booleans as 0/1 and
    /// text made only of ASCII digits. Anything else yields `None`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) if is_integral(*n) => Some(*n as i64),
            CellValue::Boolean(b) => Some(i64::from(*b)),
            CellValue::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().ok()
            }
            _ => None,
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15
}

/// Plain string form of a value; `Empty` renders as an empty string
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) if is_integral(*n) => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Boolean(true) => f.write_str("True"),
            CellValue::Boolean(false) => f.write_str("False"),
            CellValue::Error(e) => f.write_str(e),
            CellValue::DateTime(dt) if dt.nanosecond() == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
            }
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f")),
            CellValue::Time(t) if t.nanosecond() == 0 => write!(f, "{}", t.format("%H:%M:%S")),
            CellValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.6f")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_display_forms() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(-12.0).to_string(), "-12");
        assert_eq!(CellValue::Number(3.5).to_string(), "3.5");
        assert_eq!(CellValue::Boolean(true).to_string(), "True");
        assert_eq!(CellValue::Error("#N/A".into()).to_string(), "#N/A");
        assert_eq!(CellValue::text("  Ana ").to_string(), "  Ana ");

        let dt = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(dt).to_string(), "2024-01-05 00:00:00");

        let dt = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_milli_opt(10, 30, 0, 500)
            .unwrap();
        assert_eq!(
            CellValue::DateTime(dt).to_string(),
            "2024-01-05 10:30:00.500000"
        );

        let t = NaiveTime::from_hms_opt(8, 15, 0).unwrap();
        assert_eq!(CellValue::Time(t).to_string(), "08:15:00");
    }

    #[test]
    fn test_truthiness() {
        assert!(!CellValue::Empty.is_truthy());
        assert!(!CellValue::Number(0.0).is_truthy());
        assert!(!CellValue::text("").is_truthy());
        assert!(!CellValue::Boolean(false).is_truthy());
        assert!(CellValue::text(" ").is_truthy());
        assert!(CellValue::Number(7.0).is_truthy());

        assert!(CellValue::text(" ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(CellValue::Number(12.0).as_integer(), Some(12));
        assert_eq!(CellValue::Number(12.5).as_integer(), None);
        assert_eq!(CellValue::text("007").as_integer(), Some(7));
        assert_eq!(CellValue::text(" 7").as_integer(), None);
        assert_eq!(CellValue::text("N/A").as_integer(), None);
        assert_eq!(CellValue::text("").as_integer(), None);
        assert_eq!(CellValue::Boolean(true).as_integer(), Some(1));
        assert_eq!(CellValue::Empty.as_integer(), None);
    }

    #[test]
    fn test_row_view() {
        let sheet = Sheet::from_rows(
            "Hoja1",
            vec![
                vec![CellValue::Number(1.0), CellValue::text("Ana")],
                vec![CellValue::Empty, CellValue::Empty, CellValue::text("x")],
            ],
        );

        assert_eq!(sheet.width(), 3);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.cells.len(), 3);
        assert_eq!(sheet.cells.get(&(0, 1)), Some(&CellValue::text("Ana")));
        assert!(!sheet.cells.contains_key(&(1, 0)));

        let row = sheet.row(0);
        assert_eq!(row.number(), 1);
        assert_eq!(row.len(), 3);
        assert_eq!(row.get(1), Some(&CellValue::text("Ana")));
        assert_eq!(row.get(2), Some(&CellValue::Empty));
        assert_eq!(row.get(3), None);

        // Rows past the end still have the sheet's width
        let past = sheet.row(10);
        assert_eq!(past.get(0), Some(&CellValue::Empty));
        assert_eq!(past.cells(5).count(), 5);
    }
}

//! Client (index, name) extraction from fixed column blocks

use crate::config::{Config, ExtractConfig, Presence};
use crate::error::{Error, Result};
use crate::reader::{self, CellValue, Sheet};
use tracing::{debug, info, warn};

/// One (index, name) pair read from a column block
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    /// 1-based sheet row the pair came from
    pub row: u32,
    /// 1-based position of the block in the configured block list
    pub block: usize,
    pub index: CellValue,
    pub name: CellValue,
}

impl ClientRecord {
    pub fn sort_key(&self) -> SortKey {
        if let Some(n) = self.index.as_integer() {
            return SortKey::Ranked(n);
        }
        match &self.index {
            // Digit strings too long for i64
            CellValue::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                let digits = s.trim_start_matches('0');
                SortKey::Oversized(digits.len(), digits.to_string())
            }
            _ => SortKey::Unranked,
        }
    }

    /// Index exactly as the cell reads
    pub fn index_literal(&self) -> String {
        self.index.to_string()
    }

    /// Name with surrounding whitespace removed
    pub fn name_text(&self) -> String {
        self.name.to_string().trim().to_string()
    }
}

/// Ordering key: integer indices ascending, then everything else
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Ranked(i64),
    /// Digit text beyond `i64::MAX`, compared by digit count then digits
    Oversized(usize, String),
    Unranked,
}

/// Load the configured sheet and extract its sorted records
pub fn run(config: &Config) -> Result<Vec<ClientRecord>> {
    let sheet = reader::read_sheet(&config.workbook, &config.sheet)?;
    extract(&sheet, &config.extract)
}

/// Scan the row window and return the valid records sorted by index
pub fn extract(sheet: &Sheet, config: &ExtractConfig) -> Result<Vec<ClientRecord>> {
    let mut records = scan(sheet, config)?;
    sort_records(&mut records);
    info!(count = records.len(), sheet = %sheet.name, "extracted client records");
    Ok(records)
}

/// Stable sort by `SortKey`; ties and unranked records keep scan order
pub fn sort_records(records: &mut [ClientRecord]) {
    records.sort_by_key(ClientRecord::sort_key);
}

/// Collect valid pairs in scan order: row by row, blocks left to right
pub fn scan(sheet: &Sheet, config: &ExtractConfig) -> Result<Vec<ClientRecord>> {
    let width = sheet.width();
    if let Some(first) = config.blocks.first() {
        if width < first.required_width() {
            return Err(Error::UnexpectedShape(format!(
                "sheet '{}' is {} column(s) wide but block {} needs {}",
                sheet.name,
                width,
                first,
                first.required_width()
            )));
        }
    }

    let mut records = Vec::new();

    for number in config.first_row..=config.last_row {
        let row = sheet.row(number - 1);

        for (position, block) in config.blocks.iter().enumerate() {
            let (Some(index), Some(name)) =
                (row.get(block.index as usize), row.get(block.name as usize))
            else {
                // Row too narrow for this block
                continue;
            };

            match judge(index, name, config.presence) {
                Verdict::Kept => {
                    debug!(row = number, block = %block, "kept {} / {}", index, name);
                    records.push(ClientRecord {
                        row: number,
                        block: position + 1,
                        index: index.clone(),
                        name: name.clone(),
                    });
                }
                // Both cells empty: no pair here at all
                Verdict::Missing if index.is_empty() && name.is_empty() => {}
                Verdict::Missing => {
                    debug!(
                        row = number,
                        block = %block,
                        "dropped {:?} / {:?}: missing value",
                        index,
                        name
                    );
                }
                Verdict::Falsy => {
                    warn!(
                        row = number,
                        block = %block,
                        "dropping pair with falsy value ({:?}, {:?}); use presence = \"non-empty\" to keep it",
                        index,
                        name
                    );
                }
            }
        }
    }

    Ok(records)
}

/// What the presence rule makes of one (index, name) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Kept,
    /// A cell is empty or whitespace-only text
    Missing,
    /// Both cells hold something, but a zero or `false` fails the truthy rule
    Falsy,
}

pub fn judge(index: &CellValue, name: &CellValue, presence: Presence) -> Verdict {
    if index.is_blank() || name.is_blank() {
        // Whitespace-only text still passes the truthy rule
        if presence == Presence::Truthy && index.is_truthy() && name.is_truthy() {
            return Verdict::Kept;
        }
        return Verdict::Missing;
    }

    match presence {
        Presence::NonEmpty => Verdict::Kept,
        Presence::Truthy if index.is_truthy() && name.is_truthy() => Verdict::Kept,
        Presence::Truthy => Verdict::Falsy,
    }
}

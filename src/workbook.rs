use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use calamine::{Data, Reader};
use sha2::{Digest, Sha256};

use crate::error::{Result, SalesError};

/// The only sheet the dashboard reads.
pub const SHEET_NAME: &str = "DATA_BK";

/// A raw cell value as decoded from the workbook, before any coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Error(String),
}

impl CellValue {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            // Date-formatted cells keep their serial so DT coercion sees a number
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(format!("{e:?}")),
            _ => CellValue::Empty,
        }
    }

    /// Render the cell as a trimmed label. Blank cells yield `None`.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Empty | CellValue::Error(_) => None,
            CellValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Header names plus data rows, exactly as laid out in the sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Index of the first column whose header equals `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `col`); short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// No data rows. A header row alone still counts as empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode the `DATA_BK` sheet from workbook bytes. Row 0 becomes the header.
pub fn decode(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
    if !workbook.sheet_names().iter().any(|name| name == SHEET_NAME) {
        return Err(SalesError::MissingSheet(SHEET_NAME.to_string()));
    }
    let range = workbook.worksheet_range(SHEET_NAME)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(RawTable::default());
    };
    let headers = header_row
        .iter()
        .map(|d| CellValue::from_data(d).as_label().unwrap_or_default())
        .collect();
    let rows = rows
        .map(|r| r.iter().map(CellValue::from_data).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

/// Content hash of an uploaded file; two uploads with the same bytes share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity(String);

impl FileIdentity {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        FileIdentity(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single-slot memo of the last decoded workbook.
#[derive(Debug, Default)]
pub struct WorkbookCache {
    slot: Option<(FileIdentity, Arc<RawTable>)>,
    decodes: usize,
}

impl WorkbookCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the decoded table for `bytes`, decoding only when the content
    /// differs from what is cached. A failed decode empties the slot.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Arc<RawTable>> {
        let identity = FileIdentity::of(bytes);
        let short = &identity.as_str()[..12];
        if let Some((cached, table)) = &self.slot {
            if *cached == identity {
                tracing::debug!(file = short, "workbook cache hit");
                return Ok(Arc::clone(table));
            }
        }

        tracing::debug!(file = short, "workbook cache miss");
        self.slot = None;
        self.decodes += 1;
        let table = Arc::new(decode(bytes)?);
        tracing::info!(
            rows = table.rows.len(),
            columns = table.headers.len(),
            sheet = SHEET_NAME,
            "decoded workbook sheet"
        );
        self.slot = Some((identity, Arc::clone(&table)));
        Ok(table)
    }

    /// Read `path` and load it through the cache.
    pub fn load_path(&mut self, path: &Path) -> Result<Arc<RawTable>> {
        let bytes = std::fs::read(path)?;
        self.load(&bytes)
    }

    /// Number of real decodes performed (cache misses).
    pub fn decode_count(&self) -> usize {
        self.decodes
    }

    pub fn identity(&self) -> Option<&FileIdentity> {
        self.slot.as_ref().map(|(id, _)| id)
    }
}

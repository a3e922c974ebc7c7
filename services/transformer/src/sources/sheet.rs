//! Header-addressed tables read from workbooks or CSV files.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::clean;

/// A rectangular table of cleaned cell text. Blank cells are `None`.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    /// Reads `.csv` files with the csv reader and anything else as a
    /// workbook, using its first sheet.
    pub fn read(path: &Path) -> Result<Self> {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv {
            let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
            Self::from_csv(file)
        } else {
            Self::from_workbook(path)
        }
    }

    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| clean(Some(cell))).collect());
        }
        Ok(Self { headers, rows })
    }

    fn from_workbook(path: &Path) -> Result<Self> {
        let workbook_error = |message: String| Error::Workbook {
            path: path.to_path_buf(),
            message,
        };
        let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| workbook_error("workbook has no sheets".to_string()))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| workbook_error(e.to_string()))?;
        debug!(sheet = %sheet_name, size = ?range.get_size(), "read worksheet");

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header) => header
                .iter()
                .map(|cell| cell_text(cell).unwrap_or_default())
                .collect(),
            None => Vec::new(),
        };
        let rows = rows
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        Ok(Self { headers, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first header equal, ignoring case and surrounding
    /// whitespace, to one of `candidates`.
    pub fn column(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|candidate| {
            self.headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(candidate))
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { cells })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cells: &'a [Option<String>],
}

impl<'a> Row<'a> {
    /// Cell text at `column`; absent columns and short rows read as blank.
    pub fn get(&self, column: Option<usize>) -> Option<&'a str> {
        self.cells.get(column?)?.as_deref()
    }

    pub fn text(&self, column: Option<usize>) -> Option<String> {
        self.get(column).map(str::to_string)
    }
}

/// Renders a workbook cell as text. Whole floats print without a fraction
/// so class codes stored as `1.0` read as `1`; dates print as `YYYY-MM-DD`.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => dt.as_f64().to_string(),
        },
    };
    clean(Some(&text))
}

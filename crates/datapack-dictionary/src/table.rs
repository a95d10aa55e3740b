use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;

use crate::error::DictionaryError;

/// A data dictionary loaded into memory: one header row plus data rows
/// of optional cells.
///
/// Cells that were empty in the source, or that carried the spreadsheet
/// not-a-number artifact `nan`, are `None`. Everything else is kept as
/// trimmed text; type interpretation happens downstream.
#[derive(Debug, Clone)]
pub struct DictionaryTable {
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl DictionaryTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, DictionaryError> {
        self.column_index(name)
            .ok_or_else(|| DictionaryError::MissingColumn {
                path: self.source.clone(),
                column: name.to_string(),
            })
    }

    /// Cell at (row, column), `None` when absent or out of range.
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_deref())
    }
}

/// Read a dictionary file, dispatching on extension: `.csv` directly,
/// spreadsheet formats through calamine.
pub fn read_dictionary(path: &Path) -> Result<DictionaryTable, DictionaryError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let table = match extension.as_deref() {
        Some("csv") => read_csv_dictionary(path)?,
        Some("xlsx" | "xlsm" | "xls" | "ods") => read_workbook_dictionary(path)?,
        _ => {
            return Err(DictionaryError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Read data dictionary"
    );
    Ok(table)
}

fn read_csv_dictionary(path: &Path) -> Result<DictionaryTable, DictionaryError> {
    let bytes = std::fs::read(path).map_err(|e| DictionaryError::io(path, e))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DictionaryError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DictionaryError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let row: Vec<Option<String>> = (0..headers.len())
            .map(|idx| normalize_cell(record.get(idx).unwrap_or("")))
            .collect();
        if row.iter().all(Option::is_none) {
            continue;
        }
        rows.push(row);
    }

    Ok(DictionaryTable {
        source: path.to_path_buf(),
        headers,
        rows,
    })
}

fn read_workbook_dictionary(path: &Path) -> Result<DictionaryTable, DictionaryError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| DictionaryError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Dictionaries are single-sheet documents; use the first sheet.
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(DictionaryError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    };
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| DictionaryError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut cells = range.rows();
    let headers: Vec<String> = cells
        .next()
        .map(|row| row.iter().map(|cell| normalize_header(&cell_text(cell))).collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for record in cells {
        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|cell| normalize_cell(&cell_text(cell)))
            .collect();
        row.resize(headers.len(), None);
        if row.iter().all(Option::is_none) {
            continue;
        }
        rows.push(row);
    }

    Ok(DictionaryTable {
        source: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Render one worksheet cell as text.
///
/// Numeric cells print the way Rust formats the value, so whole-number
/// floats come out without a trailing `.0` (a vintage column header
/// stored as the number 1980 reads back as `1980`).
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Trim a cell and collapse the spreadsheet null spellings to `None`.
fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    if trimmed.is_empty() || trimmed == "nan" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

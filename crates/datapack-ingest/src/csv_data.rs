use std::path::Path;

use csv::ReaderBuilder;

use crate::error::IngestError;
use crate::table::DataTable;

/// Read a CSV dataset with every column as text.
///
/// Only genuinely empty cells become `None`; whitespace and sentinel
/// spellings are preserved for the normalizer to judge.
pub fn read_csv_dataset(path: &Path) -> Result<DataTable, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|header| header.trim().trim_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let row: Vec<Option<String>> = (0..columns.len())
            .map(|idx| match record.get(idx) {
                None | Some("") => None,
                Some(value) => Some(value.to_string()),
            })
            .collect();
        rows.push(row);
    }

    Ok(DataTable {
        source: path.to_path_buf(),
        columns,
        rows,
        geometry: None,
    })
}

use std::path::{Path, PathBuf};

use geo_types::Geometry;

use crate::csv_data::read_csv_dataset;
use crate::error::IngestError;
use crate::shp::read_shapefile_dataset;

/// A source dataset held in memory as text columns.
///
/// Values stay exactly as they appear in the source; no numeric
/// interpretation happens here, so identifier columns keep their
/// leading zeros. An absent cell is `None`. Shapefiles additionally
/// carry one geometry per row, separate from the attribute columns.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub source: PathBuf,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub geometry: Option<Vec<Option<Geometry<f64>>>>,
}

impl DataTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_deref())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}

/// Read a dataset by extension: `.csv` as a plain table, `.shp` as an
/// attribute table plus geometries. Anything else is unsupported.
pub fn read_dataset(path: &Path) -> Result<DataTable, IngestError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let table = match extension.as_deref() {
        Some("csv") => read_csv_dataset(path)?,
        Some("shp") => read_shapefile_dataset(path)?,
        _ => {
            return Err(IngestError::UnsupportedDataset {
                path: path.to_path_buf(),
            });
        }
    };
    tracing::debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.len(),
        geometry = table.has_geometry(),
        "Read dataset"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extensions_are_rejected() {
        for name in ["records.parquet", "records.geojson", "records"] {
            let err = read_dataset(Path::new(name)).expect_err("should reject");
            assert!(matches!(err, IngestError::UnsupportedDataset { .. }));
        }
    }
}

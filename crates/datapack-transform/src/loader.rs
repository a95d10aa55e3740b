use std::collections::BTreeSet;
use std::path::Path;

use datapack_ingest::{DataTable, read_dataset};
use datapack_model::ResourceSchema;
use geojson::Geometry as GeoJsonGeometry;
use serde_json::{Map, Value};

use crate::coerce::{coerce_value, is_sentinel, zero_fill};
use crate::error::TransformError;

/// Column name under which shapefile geometry is published.
pub const GEOMETRY_FIELD: &str = "geom";

/// A row that could not be serialized. The remaining rows are
/// unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// Outcome of loading one resource: serialized row records in input
/// order, data-quality warnings, and per-row failures.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<String>,
    pub warnings: Vec<String>,
    pub row_errors: Vec<RowError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.row_errors.is_empty()
    }
}

/// Load and normalize every row of the dataset a resource points at.
///
/// The resource must reference exactly one local `.csv` or `.shp`
/// file. Data-quality problems (unknown columns, sentinel values,
/// unparseable cells) are collected as warnings, never failures; only
/// an unreadable dataset aborts the load.
pub fn load_rows(resource: &ResourceSchema) -> Result<LoadReport, TransformError> {
    let entries = resource.path.entries();
    if entries.len() != 1 {
        return Err(TransformError::NotASingleFile {
            name: resource.name.clone(),
            count: entries.len(),
        });
    }
    let entry = entries[0];
    if entry.starts_with("http://") || entry.starts_with("https://") {
        return Err(TransformError::RemoteDataset {
            name: resource.name.clone(),
            url: entry.to_string(),
        });
    }

    let table = read_dataset(Path::new(entry))?;
    Ok(normalize_table(resource, &table))
}

/// Normalize an already-loaded table against a resource schema.
///
/// Records come out as self-contained JSON object strings with fields
/// in schema order, geometry last. This never fails as a whole: bad
/// cells become nulls with warnings and a bad row becomes a
/// `RowError`.
pub fn normalize_table(resource: &ResourceSchema, table: &DataTable) -> LoadReport {
    let mut report = LoadReport::default();
    let emit_geometry =
        table.has_geometry() && resource.schema.field(GEOMETRY_FIELD).is_some();

    // Schema-ordered plan: each readable field paired with its source
    // column.
    let mut plans = Vec::new();
    let mut missing = Vec::new();
    for field in &resource.schema.fields {
        if field.name == GEOMETRY_FIELD && table.has_geometry() {
            continue;
        }
        let Some(src_name) = field.src_name.as_deref() else {
            report.warnings.push(format!(
                "field `{}` has no src_name and cannot be read from the source",
                field.name
            ));
            continue;
        };
        match table.column_index(src_name) {
            Some(column) => plans.push((field, column)),
            None => missing.push(field.name.as_str()),
        }
    }
    let used: BTreeSet<usize> = plans.iter().map(|(_, column)| *column).collect();
    let mut dropped: Vec<&str> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(index, _)| !used.contains(index))
        .map(|(_, name)| name.as_str())
        .collect();
    if table.has_geometry() && !emit_geometry {
        dropped.push(GEOMETRY_FIELD);
    }
    if !dropped.is_empty() {
        report.warnings.push(format!(
            "dropped {} source columns not in the schema: {}",
            dropped.len(),
            dropped.join(", ")
        ));
    }
    if !missing.is_empty() {
        report.warnings.push(format!(
            "{} schema fields missing from the source: {}",
            missing.len(),
            missing.join(", ")
        ));
    }

    'rows: for row in 0..table.len() {
        let mut object = Map::new();
        for (field, column) in &plans {
            let value = match table.value(row, *column) {
                None => Value::Null,
                Some(raw) if is_sentinel(raw) => Value::Null,
                Some(raw) => {
                    let coerced = if field.zfill == Some(true)
                        && let Some(width) = field.max_length
                    {
                        coerce_value(&zero_fill(raw, width), field.schema_type)
                    } else {
                        coerce_value(raw, field.schema_type)
                    };
                    match coerced {
                        Some(value) => value,
                        None => {
                            report.warnings.push(format!(
                                "row {row}: field `{}` value `{raw}` is not a valid {}",
                                field.name, field.schema_type
                            ));
                            Value::Null
                        }
                    }
                }
            };
            object.insert(field.name.clone(), value);
        }

        if emit_geometry {
            let geometry = table
                .geometry
                .as_ref()
                .and_then(|geometries| geometries.get(row))
                .and_then(Option::as_ref);
            let value = match geometry {
                Some(geometry) => {
                    let geojson = GeoJsonGeometry::new(geojson::Value::from(geometry));
                    match serde_json::to_string(&geojson) {
                        Ok(text) => Value::String(text),
                        Err(e) => {
                            report.row_errors.push(RowError {
                                row,
                                message: format!("geometry serialization failed: {e}"),
                            });
                            continue 'rows;
                        }
                    }
                }
                None => Value::Null,
            };
            object.insert(GEOMETRY_FIELD.to_string(), value);
        }

        match serde_json::to_string(&Value::Object(object)) {
            Ok(serialized) => report.records.push(serialized),
            Err(e) => report.row_errors.push(RowError {
                row,
                message: e.to_string(),
            }),
        }
    }

    tracing::debug!(
        resource = %resource.name,
        records = report.records.len(),
        warnings = report.warnings.len(),
        row_errors = report.row_errors.len(),
        "Normalized rows"
    );
    report
}

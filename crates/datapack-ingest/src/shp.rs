use std::path::Path;

use geo_types::Geometry;
use shapefile::Shape;
use shapefile::dbase::{self, FieldValue};

use crate::error::IngestError;
use crate::table::DataTable;

/// Read a shapefile as an attribute table plus one geometry per row.
///
/// Attribute values are rendered to text the same way CSV cells are
/// read, so the normalizer treats both sources alike. Null shapes
/// become rows without geometry rather than errors.
pub fn read_shapefile_dataset(path: &Path) -> Result<DataTable, IngestError> {
    let shapefile_error = |message: String| IngestError::Shapefile {
        path: path.to_path_buf(),
        message,
    };

    // Column order comes from the dbf header; the record API alone
    // does not guarantee it.
    let columns = attribute_columns(path)?;

    let mut reader =
        shapefile::Reader::from_path(path).map_err(|e| shapefile_error(e.to_string()))?;

    let mut rows = Vec::new();
    let mut geometry = Vec::new();
    for (index, pair) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) =
            pair.map_err(|e| shapefile_error(format!("record {index}: {e}")))?;

        let row: Vec<Option<String>> = columns
            .iter()
            .map(|column| record.get(column).and_then(attribute_text))
            .collect();
        rows.push(row);

        geometry.push(match shape {
            Shape::NullShape => None,
            shape => Some(
                Geometry::<f64>::try_from(shape)
                    .map_err(|e| shapefile_error(format!("record {index}: {e}")))?,
            ),
        });
    }

    Ok(DataTable {
        source: path.to_path_buf(),
        columns,
        rows,
        geometry: Some(geometry),
    })
}

/// Attribute column names in dbf declaration order.
fn attribute_columns(path: &Path) -> Result<Vec<String>, IngestError> {
    let dbf_path = path.with_extension("dbf");
    if !dbf_path.exists() {
        return Err(IngestError::MissingSidecar { path: dbf_path });
    }
    let dbf = dbase::Reader::from_path(&dbf_path).map_err(|e| IngestError::Shapefile {
        path: dbf_path.clone(),
        message: e.to_string(),
    })?;
    Ok(dbf
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect())
}

/// Render a dbf attribute value as text, `None` for stored nulls.
///
/// Numeric values print the way Rust formats them, so whole numbers
/// carry no trailing `.0`. Timestamp attributes have no text rendering
/// here and read as absent.
fn attribute_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(value) => value
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned),
        FieldValue::Numeric(value) => value.map(|number| number.to_string()),
        FieldValue::Float(value) => value.map(|number| number.to_string()),
        FieldValue::Logical(value) => value.map(|flag| flag.to_string()),
        FieldValue::Integer(number) => Some(number.to_string()),
        FieldValue::Double(number) => Some(number.to_string()),
        FieldValue::Currency(number) => Some(number.to_string()),
        FieldValue::Date(value) => value
            .as_ref()
            .map(|date| format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())),
        FieldValue::Memo(text) => Some(text.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_values_trim_padding_and_blank_to_none() {
        let padded = FieldValue::Character(Some("04013   ".to_string()));
        assert_eq!(attribute_text(&padded).as_deref(), Some("04013"));

        let blank = FieldValue::Character(Some("   ".to_string()));
        assert_eq!(attribute_text(&blank), None);

        let null = FieldValue::Character(None);
        assert_eq!(attribute_text(&null), None);
    }

    #[test]
    fn whole_numerics_print_without_decimal_suffix() {
        let whole = FieldValue::Numeric(Some(1632480.0));
        assert_eq!(attribute_text(&whole).as_deref(), Some("1632480"));

        let fractional = FieldValue::Numeric(Some(0.05));
        assert_eq!(attribute_text(&fractional).as_deref(), Some("0.05"));

        let null = FieldValue::Numeric(None);
        assert_eq!(attribute_text(&null), None);
    }

    #[test]
    fn logicals_render_as_lowercase_words() {
        assert_eq!(
            attribute_text(&FieldValue::Logical(Some(true))).as_deref(),
            Some("true")
        );
        assert_eq!(attribute_text(&FieldValue::Logical(None)), None);
    }

    #[test]
    fn missing_dbf_sidecar_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let shp = dir.path().join("states.shp");
        std::fs::write(&shp, b"").expect("write stub");

        let err = read_shapefile_dataset(&shp).expect_err("missing dbf");
        assert!(matches!(err, IngestError::MissingSidecar { ref path } if path.ends_with("states.dbf")));
    }
}

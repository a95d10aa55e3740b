use std::path::{Path, PathBuf};

use datapack_model::{
    GeoScale, JOIN_KEY, ResourcePath, ResourceSchema, TableSchema, Vintage,
};

use crate::error::DictionaryError;
use crate::fields::{GEOGRAPHY_KEY_FIELDS, build_fields_for_rows};
use crate::table::{DictionaryTable, read_dictionary};

/// Published location of the aggregated full-table CSVs.
pub const FULL_TABLES_URL: &str =
    "https://raw.githubusercontent.com/GeoDaCenter/opioid-policy-scan/main/data_final/full_tables";

/// Warehouse dataset every generated tabular resource belongs to.
const TABULAR_DATASET: &str = "tabular";

/// Marker in a vintage column that includes the row in that vintage.
const INCLUDE_FLAG: &str = "x";

/// Generate one resource schema file per valid vintage of the scale
/// named by the dictionary filename, returning the written paths in
/// vintage order.
///
/// The dictionary filename encodes the scale as the prefix before the
/// first underscore (`S_BuiltEnvironment.xlsx` covers states). Each
/// vintage column holds an `x` flag per included variable.
pub fn generate_schemas(
    dictionary: &Path,
    destination: &Path,
) -> Result<Vec<PathBuf>, DictionaryError> {
    let scale = scale_from_filename(dictionary)?;
    let table = read_dictionary(dictionary)?;

    let mut written = Vec::with_capacity(scale.vintages().len());
    for vintage in scale.vintages() {
        let schema = build_resource_schema(&table, scale, *vintage)?;
        let out_path = destination.join(format!(
            "{TABULAR_DATASET}_{}_{}.json",
            scale.code(),
            vintage
        ));
        schema.write(&out_path)?;
        tracing::debug!(
            resource = %schema.name,
            fields = schema.schema.fields.len(),
            path = %out_path.display(),
            "Generated table definition"
        );
        written.push(out_path);
    }
    Ok(written)
}

fn build_resource_schema(
    table: &DictionaryTable,
    scale: GeoScale,
    vintage: Vintage,
) -> Result<ResourceSchema, DictionaryError> {
    let flag_column = table.require_column(vintage.as_str())?;
    let flagged_rows = (0..table.rows.len())
        .filter(|&row| table.value(row, flag_column) == Some(INCLUDE_FLAG));
    let fields = build_fields_for_rows(table, flagged_rows, GEOGRAPHY_KEY_FIELDS)?;

    let geography = scale.geography_name();
    Ok(ResourceSchema {
        bq_dataset_name: Some(TABULAR_DATASET.to_string()),
        bq_table_name: Some(format!("{}_{vintage}", scale.code())),
        name: format!("{}-{vintage}", scale.code()),
        path: ResourcePath::One(format!("{FULL_TABLES_URL}/{}_{vintage}.csv", scale.code())),
        title: Some(format!("OEPS Data Aggregated by {geography} ({vintage})")),
        description: Some(format!(
            "This CSV aggregates all {vintage} data variables from the OEPS v2 release at the {geography} level."
        )),
        schema: TableSchema {
            primary_key: Some(JOIN_KEY.to_string()),
            fields,
        },
    })
}

/// Scale code from the dictionary filename: everything before the
/// first underscore.
fn scale_from_filename(path: &Path) -> Result<GeoScale, DictionaryError> {
    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
    let code = file_name.split('_').next().unwrap_or("");
    Ok(GeoScale::from_code(code)?)
}

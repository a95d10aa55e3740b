use datapack_model::{FieldDescriptor, SchemaType, warehouse_type};

use crate::error::DictionaryError;
use crate::table::DictionaryTable;

/// Structural geography key columns that never become schema fields.
/// They exist in the dictionaries for provenance but the published join
/// column is `HEROP_ID`.
pub const GEOGRAPHY_KEY_FIELDS: &[&str] = &[
    "GEOID",
    "G_STATEFP",
    "STUSPS",
    "TRACTCE",
    "STATEFP",
    "COUNTYFP",
    "ZIP",
];

const VARIABLE_COLUMN: &str = "Variable";
const TYPE_COLUMN: &str = "Type";

/// Resolved positions of the dictionary columns the builder reads.
/// `Variable` and `Type` must exist; descriptive columns are optional.
struct BuilderColumns {
    variable: usize,
    data_type: usize,
    example: Option<usize>,
    description: Option<usize>,
    constraints: Option<usize>,
    theme: Option<usize>,
    source: Option<usize>,
    comments: Option<usize>,
}

impl BuilderColumns {
    fn resolve(table: &DictionaryTable) -> Result<Self, DictionaryError> {
        Ok(Self {
            variable: table.require_column(VARIABLE_COLUMN)?,
            data_type: table.require_column(TYPE_COLUMN)?,
            example: table.column_index("Example"),
            description: table.column_index("Description"),
            constraints: table.column_index("Data Limitations"),
            theme: table.column_index("Theme"),
            source: table.column_index("Source Long"),
            comments: table.column_index("Comments"),
        })
    }
}

/// Build descriptors for every dictionary row, in file order.
pub fn build_fields(
    table: &DictionaryTable,
    denylist: &[&str],
) -> Result<Vec<FieldDescriptor>, DictionaryError> {
    build_fields_for_rows(table, 0..table.rows.len(), denylist)
}

/// Build descriptors for a subset of dictionary rows, in the order
/// given. Rows whose `Variable` is on the denylist are skipped before
/// any further interpretation, so a denylisted row never fails the
/// build.
pub fn build_fields_for_rows(
    table: &DictionaryTable,
    rows: impl IntoIterator<Item = usize>,
    denylist: &[&str],
) -> Result<Vec<FieldDescriptor>, DictionaryError> {
    let columns = BuilderColumns::resolve(table)?;
    let mut fields = Vec::new();
    for row in rows {
        let variable = required_value(table, row, columns.variable, VARIABLE_COLUMN)?;
        if denylist.contains(&variable) {
            continue;
        }
        fields.push(build_field(table, row, &columns)?);
    }
    Ok(fields)
}

fn build_field(
    table: &DictionaryTable,
    row: usize,
    columns: &BuilderColumns,
) -> Result<FieldDescriptor, DictionaryError> {
    let variable = required_value(table, row, columns.variable, VARIABLE_COLUMN)?;
    let type_label = required_value(table, row, columns.data_type, TYPE_COLUMN)?;

    let schema_type = SchemaType::from_label(type_label)?;
    let mut field = FieldDescriptor::new(variable, schema_type);
    field.src_name = Some(variable.to_string());
    field.example = optional_value(table, row, columns.example);
    field.description = optional_value(table, row, columns.description);
    field.constraints = optional_value(table, row, columns.constraints);
    field.theme = optional_value(table, row, columns.theme);
    field.source = optional_value(table, row, columns.source);
    field.comments = optional_value(table, row, columns.comments);
    field.bq_data_type = Some(warehouse_type(type_label));
    Ok(field)
}

fn required_value<'t>(
    table: &'t DictionaryTable,
    row: usize,
    column: usize,
    name: &str,
) -> Result<&'t str, DictionaryError> {
    table
        .value(row, column)
        .ok_or_else(|| DictionaryError::MissingValue {
            path: table.source.clone(),
            row: row + 1,
            column: name.to_string(),
        })
}

fn optional_value(table: &DictionaryTable, row: usize, column: Option<usize>) -> Option<String> {
    column
        .and_then(|idx| table.value(row, idx))
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use datapack_model::ModelError;

    use super::*;

    fn table(headers: &[&str], rows: &[&[Option<&str>]]) -> DictionaryTable {
        DictionaryTable {
            source: PathBuf::from("S_dict.csv"),
            headers: headers.iter().copied().map(String::from).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.map(ToOwned::to_owned)).collect())
                .collect(),
        }
    }

    fn dictionary() -> DictionaryTable {
        table(
            &[
                "Variable",
                "Type",
                "Example",
                "Description",
                "Data Limitations",
                "Theme",
                "Source Long",
                "Comments",
            ],
            &[
                &[
                    Some("TotPop"),
                    Some("Integer"),
                    Some("1632480"),
                    Some("Total population"),
                    None,
                    Some("Social"),
                    Some("ACS 2018"),
                    None,
                ],
                &[
                    Some("GEOID"),
                    Some("Mystery"),
                    None,
                    None,
                    None,
                    None,
                    None,
                    None,
                ],
                &[
                    Some("NoGasPct"),
                    Some("Float"),
                    Some("0.05"),
                    None,
                    Some("Survey-based estimate"),
                    Some("Environment"),
                    None,
                    None,
                ],
            ],
        )
    }

    #[test]
    fn builds_descriptors_in_file_order() {
        let fields = build_fields(&dictionary(), GEOGRAPHY_KEY_FIELDS).expect("build");
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["TotPop", "NoGasPct"]);

        let tot_pop = &fields[0];
        assert_eq!(tot_pop.src_name.as_deref(), Some("TotPop"));
        assert_eq!(tot_pop.schema_type, SchemaType::Integer);
        assert_eq!(tot_pop.example.as_deref(), Some("1632480"));
        assert_eq!(tot_pop.bq_data_type.as_deref(), Some("INTEGER"));
        assert!(tot_pop.description.is_some());
        assert!(tot_pop.constraints.is_none());
    }

    #[test]
    fn denylisted_rows_are_skipped_before_type_mapping() {
        // GEOID carries an unmappable type label; skipping must happen first.
        let fields = build_fields(&dictionary(), GEOGRAPHY_KEY_FIELDS).expect("build");
        assert!(fields.iter().all(|f| f.name != "GEOID"));
    }

    #[test]
    fn empty_denylist_surfaces_the_bad_type_label() {
        let err = build_fields(&dictionary(), &[]).expect_err("should fail on GEOID type");
        assert!(matches!(
            err,
            DictionaryError::Model(ModelError::UnrecognizedType { ref label }) if label == "Mystery"
        ));
    }

    #[test]
    fn absent_cells_become_none() {
        let fields = build_fields(&dictionary(), GEOGRAPHY_KEY_FIELDS).expect("build");
        let no_gas = &fields[1];
        assert!(no_gas.description.is_none());
        assert!(no_gas.source.is_none());
        assert!(no_gas.comments.is_none());
        assert_eq!(no_gas.constraints.as_deref(), Some("Survey-based estimate"));
    }

    #[test]
    fn missing_variable_value_is_an_error() {
        let broken = table(
            &["Variable", "Type"],
            &[&[None, Some("Integer")]],
        );
        let err = build_fields(&broken, &[]).expect_err("missing variable");
        assert!(matches!(err, DictionaryError::MissingValue { row: 1, .. }));
    }

    #[test]
    fn missing_type_column_is_an_error() {
        let broken = table(&["Variable"], &[&[Some("TotPop")]]);
        let err = build_fields(&broken, &[]).expect_err("missing type column");
        assert!(matches!(
            err,
            DictionaryError::MissingColumn { ref column, .. } if column == "Type"
        ));
    }

    #[test]
    fn subset_rows_preserve_given_order() {
        let fields =
            build_fields_for_rows(&dictionary(), [2, 0], GEOGRAPHY_KEY_FIELDS).expect("build");
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["NoGasPct", "TotPop"]);
    }
}

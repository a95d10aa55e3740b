use std::fs;
use std::path::Path;

use datapack_model::{
    FieldDescriptor, ResourcePath, ResourceSchema, SchemaType, TableSchema,
};
use datapack_transform::load_rows;
use tempfile::TempDir;

fn write_csv(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write csv");
    path.to_string_lossy().into_owned()
}

fn field(name: &str, src_name: &str, schema_type: SchemaType) -> FieldDescriptor {
    let mut field = FieldDescriptor::new(name, schema_type);
    field.src_name = Some(src_name.to_string());
    field
}

fn resource(path: String, fields: Vec<FieldDescriptor>) -> ResourceSchema {
    ResourceSchema {
        bq_dataset_name: Some("tabular".to_string()),
        bq_table_name: Some("S_Latest".to_string()),
        name: "S-Latest".to_string(),
        path: ResourcePath::One(path),
        title: Some("OEPS Data Aggregated by State (Latest)".to_string()),
        description: None,
        schema: TableSchema {
            primary_key: Some("HEROP_ID".to_string()),
            fields,
        },
    }
}

#[test]
fn csv_rows_come_back_typed_in_schema_order() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        dir.path(),
        "S_Latest.csv",
        "HEROP_ID,TOT_POP,PovP\n04013,12,11.4\n04017,nan,NA\n04019,7.9,3.05\n",
    );
    let schema = resource(
        path,
        vec![
            field("HEROP_ID", "HEROP_ID", SchemaType::String),
            field("TotPop", "TOT_POP", SchemaType::Integer),
            field("PovP", "PovP", SchemaType::Number),
        ],
    );

    let report = load_rows(&schema).expect("load");
    assert_eq!(
        report.records,
        vec![
            "{\"HEROP_ID\":\"04013\",\"TotPop\":12,\"PovP\":11.4}",
            "{\"HEROP_ID\":\"04017\",\"TotPop\":null,\"PovP\":null}",
            "{\"HEROP_ID\":\"04019\",\"TotPop\":8,\"PovP\":3.05}",
        ]
    );
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    assert!(report.row_errors.is_empty());
}

#[test]
fn extra_and_missing_columns_only_warn() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        dir.path(),
        "C_2010.csv",
        "HEROP_ID,STATEFP,COUNTYFP\n05013,05,013\n",
    );
    let schema = resource(
        path,
        vec![
            field("HEROP_ID", "HEROP_ID", SchemaType::String),
            field("TotPop", "TOT_POP", SchemaType::Integer),
        ],
    );

    let report = load_rows(&schema).expect("load");
    assert_eq!(report.records, vec!["{\"HEROP_ID\":\"05013\"}"]);
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings[0].contains("STATEFP, COUNTYFP"));
    assert!(report.warnings[1].contains("missing from the source: TotPop"));
}

#[test]
fn identifier_columns_are_zero_padded() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(dir.path(), "Z_Latest.csv", "ZCTA\n4013\n501\nnan\n");
    let mut zip = field("ZCTA", "ZCTA", SchemaType::String);
    zip.zfill = Some(true);
    zip.max_length = Some(5);
    let schema = resource(path, vec![zip]);

    let report = load_rows(&schema).expect("load");
    assert_eq!(
        report.records,
        vec![
            "{\"ZCTA\":\"04013\"}",
            "{\"ZCTA\":\"00501\"}",
            "{\"ZCTA\":null}",
        ]
    );
}

#[test]
fn booleans_accept_spreadsheet_spellings() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        dir.path(),
        "S_Latest.csv",
        "MOUD\nYes\nFALSE\n1\nmaybe\n",
    );
    let schema = resource(path, vec![field("MoudFlag", "MOUD", SchemaType::Boolean)]);

    let report = load_rows(&schema).expect("load");
    assert_eq!(
        report.records,
        vec![
            "{\"MoudFlag\":true}",
            "{\"MoudFlag\":false}",
            "{\"MoudFlag\":true}",
            "{\"MoudFlag\":null}",
        ]
    );
    // Unmatched spellings are an ordinary null, not a data problem.
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
}

#[test]
fn unreadable_dataset_is_fatal() {
    let schema = resource(
        "/nonexistent/S_Latest.csv".to_string(),
        vec![field("HEROP_ID", "HEROP_ID", SchemaType::String)],
    );
    load_rows(&schema).expect_err("missing file should fail the load");
}

use std::fs;
use std::path::Path;

use datapack_model::{
    FieldDescriptor, ModelError, ResourcePath, ResourceSchema, SchemaType, TableSchema,
};
use datapack_output::{PackageError, build_package};
use serde_json::Value;
use tempfile::TempDir;

fn field(name: &str, schema_type: SchemaType) -> FieldDescriptor {
    let mut field = FieldDescriptor::new(name, schema_type);
    field.src_name = Some(name.to_string());
    field.bq_data_type = Some("STRING".to_string());
    field
}

fn write_schema(dir: &Path, file_name: &str, name: &str, data_path: &str) {
    let resource = ResourceSchema {
        bq_dataset_name: Some("tabular".to_string()),
        bq_table_name: Some(name.replace('-', "_")),
        name: name.to_string(),
        path: ResourcePath::One(data_path.to_string()),
        title: Some(format!("Resource {name}")),
        description: None,
        schema: TableSchema {
            primary_key: Some("HEROP_ID".to_string()),
            fields: vec![
                field("HEROP_ID", SchemaType::String),
                field("TotPop", SchemaType::Integer),
            ],
        },
    };
    resource.write(&dir.join(file_name)).expect("write schema");
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("read json");
    serde_json::from_str(&text).expect("parse json")
}

#[test]
fn manifest_lists_every_schema_with_live_paths() {
    let dir = TempDir::new().expect("tempdir");
    let schemas = dir.path().join("schemas-in");
    fs::create_dir_all(&schemas).unwrap();
    let csv = dir.path().join("T_2010.csv");
    fs::write(&csv, "HEROP_ID,TOT_POP\n04013,12\n").unwrap();
    for ext in ["shp", "dbf", "shx"] {
        fs::write(dir.path().join(format!("tracts.{ext}")), b"stub").unwrap();
    }
    write_schema(&schemas, "tabular_T_2010.json", "T-2010", &csv.to_string_lossy());
    write_schema(
        &schemas,
        "geometry_tracts.json",
        "tracts-2010",
        &dir.path().join("tracts.shp").to_string_lossy(),
    );

    let destination = dir.path().join("package");
    let build = build_package(&schemas, &destination, false).expect("build");

    assert_eq!(build.resources.len(), 2);
    let manifest = read_json(&build.manifest_path);
    assert_eq!(manifest["profile"], "data-package");
    assert_eq!(manifest["name"], "oeps");
    assert_eq!(manifest["title"], "Opioid Environment Policy Scan (OEPS) v2");
    assert_eq!(manifest["homepage"], "https://oeps.healthyregions.org");
    assert_eq!(manifest["licenses"][0]["name"], "ODC-PDDL-1.0");

    let resources = manifest["resources"].as_array().expect("resources array");
    assert_eq!(resources.len(), 2);
    // Sorted by schema file name: geometry_tracts before tabular_T_2010.
    assert_eq!(resources[0]["name"], "tracts-2010");
    assert_eq!(resources[1]["name"], "T-2010");
    for resource in resources {
        let schema_rel = resource["schema"].as_str().expect("schema path");
        assert!(destination.join(schema_rel).is_file(), "missing {schema_rel}");
        for path in resource["path"].as_array().expect("path array") {
            let rel = path.as_str().expect("path string");
            assert!(destination.join(rel).is_file(), "missing {rel}");
        }
    }
}

#[test]
fn published_fields_keep_order_and_drop_internal_attributes() {
    let dir = TempDir::new().expect("tempdir");
    let schemas = dir.path().join("schemas-in");
    fs::create_dir_all(&schemas).unwrap();
    let csv = dir.path().join("S_Latest.csv");
    fs::write(&csv, "HEROP_ID\n04\n").unwrap();

    let mut described = field("PovP", SchemaType::Number);
    described.title = Some("Poverty Rate".to_string());
    described.example = Some("11.4".to_string());
    described.description = Some("Share of population below poverty line.".to_string());
    described.theme = Some("Economic".to_string());
    let resource = ResourceSchema {
        bq_dataset_name: Some("tabular".to_string()),
        bq_table_name: Some("S_Latest".to_string()),
        name: "S-Latest".to_string(),
        path: ResourcePath::One(csv.to_string_lossy().into_owned()),
        title: None,
        description: None,
        schema: TableSchema {
            primary_key: Some("HEROP_ID".to_string()),
            fields: vec![
                field("HEROP_ID", SchemaType::String),
                field("TotPop", SchemaType::Integer),
                described,
            ],
        },
    };
    resource.write(&schemas.join("tabular_S_Latest.json")).unwrap();

    let destination = dir.path().join("package");
    build_package(&schemas, &destination, false).expect("build");

    let published = read_json(&destination.join("schemas/S-Latest.json"));
    assert_eq!(published["primaryKey"], "HEROP_ID");
    let names: Vec<&str> = published["fields"]
        .as_array()
        .expect("fields")
        .iter()
        .map(|f| f["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["HEROP_ID", "TotPop", "PovP"]);

    let allowed = ["name", "title", "type", "example", "description"];
    for field in published["fields"].as_array().expect("fields") {
        for key in field.as_object().expect("object").keys() {
            assert!(allowed.contains(&key.as_str()), "unexpected key {key}");
        }
    }
    assert_eq!(published["fields"][2]["title"], "Poverty Rate");
    assert_eq!(published["fields"][2]["example"], "11.4");
}

#[test]
fn foreign_keys_follow_the_resource_name() {
    let dir = TempDir::new().expect("tempdir");
    let schemas = dir.path().join("schemas-in");
    fs::create_dir_all(&schemas).unwrap();
    let csv = dir.path().join("any.csv");
    fs::write(&csv, "HEROP_ID\n04013\n").unwrap();
    for ext in ["shp", "dbf", "shx"] {
        fs::write(dir.path().join(format!("zctas.{ext}")), b"stub").unwrap();
    }
    write_schema(&schemas, "a_T_2010.json", "T-2010", &csv.to_string_lossy());
    write_schema(&schemas, "b_Z_Latest.json", "Z-Latest", &csv.to_string_lossy());
    write_schema(
        &schemas,
        "c_zctas.json",
        "zctas-2018",
        &dir.path().join("zctas.shp").to_string_lossy(),
    );

    let destination = dir.path().join("package");
    let build = build_package(&schemas, &destination, false).expect("build");

    let tract = read_json(&destination.join("schemas/T-2010.json"));
    assert_eq!(tract["foreignKeys"][0]["fields"], "HEROP_ID");
    assert_eq!(tract["foreignKeys"][0]["reference"]["resource"], "tracts-2010");
    assert_eq!(tract["foreignKeys"][0]["reference"]["fields"], "HEROP_ID");

    let zcta = read_json(&destination.join("schemas/Z-Latest.json"));
    assert_eq!(zcta["foreignKeys"][0]["reference"]["resource"], "zctas-2018");

    // Geometry resources are shapefile-backed and carry no key.
    let geometry = read_json(&destination.join("schemas/zctas-2018.json"));
    assert!(geometry.get("foreignKeys").is_none());

    let linked: Vec<Option<&str>> = build
        .resources
        .iter()
        .map(|r| r.linked_resource.as_deref())
        .collect();
    assert_eq!(linked, vec![Some("tracts-2010"), Some("zctas-2018"), None]);
}

#[test]
fn unanticipated_resource_name_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let schemas = dir.path().join("schemas-in");
    fs::create_dir_all(&schemas).unwrap();
    let csv = dir.path().join("X_2010.csv");
    fs::write(&csv, "HEROP_ID\n04013\n").unwrap();
    write_schema(&schemas, "tabular_X_2010.json", "X-2010", &csv.to_string_lossy());

    let destination = dir.path().join("package");
    let err = build_package(&schemas, &destination, false).expect_err("bad scale code");
    assert!(matches!(
        err,
        PackageError::Model(ModelError::UnrecognizedResourceName { ref name }) if name == "X-2010"
    ));
}

#[test]
fn zip_flag_archives_the_finished_tree() {
    let dir = TempDir::new().expect("tempdir");
    let schemas = dir.path().join("schemas-in");
    fs::create_dir_all(&schemas).unwrap();
    let csv = dir.path().join("S_2010.csv");
    fs::write(&csv, "HEROP_ID\n04\n").unwrap();
    write_schema(&schemas, "tabular_S_2010.json", "S-2010", &csv.to_string_lossy());

    let destination = dir.path().join("package");
    let build = build_package(&schemas, &destination, true).expect("build");

    let archive_path = build.archive.expect("archive path");
    assert_eq!(archive_path, dir.path().join("package.zip"));
    let mut archive =
        zip::ZipArchive::new(fs::File::open(&archive_path).expect("open zip")).expect("read zip");
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect();
    assert!(names.contains(&"data-package.json".to_string()));
    assert!(names.contains(&"schemas/S-2010.json".to_string()));
    assert!(names.contains(&"data/S_2010.csv".to_string()));
}

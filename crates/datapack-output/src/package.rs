use std::fs;
use std::path::{Path, PathBuf};

use datapack_ingest::resolve_data_paths;
use datapack_model::{
    ForeignKey, JOIN_KEY, License, PackageManifest, PublishedField, PublishedSchema, ResourceRef,
    ResourceSchema, foreign_key_target, write_json_file,
};

use crate::archive::zip_directory;
use crate::error::PackageError;

pub const PACKAGE_PROFILE: &str = "data-package";
pub const PACKAGE_NAME: &str = "oeps";
pub const PACKAGE_TITLE: &str = "Opioid Environment Policy Scan (OEPS) v2";
pub const PACKAGE_HOMEPAGE: &str = "https://oeps.healthyregions.org";

fn package_license() -> License {
    License {
        name: "ODC-PDDL-1.0".to_string(),
        path: "http://opendatacommons.org/licenses/pddl/".to_string(),
        title: "Open Data Commons Public Domain Dedication and License v1.0".to_string(),
    }
}

/// One resource as it landed in the built package.
#[derive(Debug, Clone)]
pub struct BuiltResource {
    pub name: String,
    pub title: Option<String>,
    pub data_paths: Vec<String>,
    pub schema_path: String,
    pub fields: usize,
    pub linked_resource: Option<String>,
}

/// Result of a package build, for reporting.
#[derive(Debug)]
pub struct PackageBuild {
    pub destination: PathBuf,
    pub manifest_path: PathBuf,
    pub resources: Vec<BuiltResource>,
    pub archive: Option<PathBuf>,
}

/// Gather the resource schema files to package: either one explicit
/// file, or every `.json` directly under a directory, sorted by name
/// so the manifest order is stable across runs.
pub fn collect_schema_files(source: &Path) -> Result<Vec<PathBuf>, PackageError> {
    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }
    let entries = fs::read_dir(source).map_err(|e| PackageError::io(source, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PackageError::io(source, e))?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(PackageError::NoSchemas {
            path: source.to_path_buf(),
        });
    }
    Ok(files)
}

/// Assemble a distributable data package under `destination`.
///
/// For every schema file under `source` this stages the referenced
/// data files into `data/`, writes the published (trimmed) schema into
/// `schemas/`, and records the resource in `data-package.json` at the
/// package root. With `zip` set the finished tree is also archived to
/// a sibling `{destination}.zip`.
pub fn build_package(
    source: &Path,
    destination: &Path,
    zip: bool,
) -> Result<PackageBuild, PackageError> {
    let schema_files = collect_schema_files(source)?;
    let schemas_dir = destination.join("schemas");
    let data_dir = destination.join("data");
    fs::create_dir_all(&schemas_dir).map_err(|e| PackageError::io(&schemas_dir, e))?;
    fs::create_dir_all(&data_dir).map_err(|e| PackageError::io(&data_dir, e))?;

    let mut references = Vec::new();
    let mut resources = Vec::new();
    for schema_file in &schema_files {
        let resource = ResourceSchema::from_file(schema_file)?;
        let staged = resolve_data_paths(&resource.path, &data_dir)?;
        let data_paths: Vec<String> = staged
            .iter()
            .map(|path| format!("data/{}", file_name(path)))
            .collect();

        // The published schema keeps the source file's extension so a
        // schema named `T-2010.json` stays `schemas/T-2010.json`.
        let schema_name = published_schema_name(&resource.name, schema_file);
        let schema_path = format!("schemas/{schema_name}");

        let foreign_keys = match data_paths.first() {
            Some(first) if first.ends_with(".csv") => {
                let target = foreign_key_target(&resource.name)?;
                Some(vec![ForeignKey::same_column(JOIN_KEY, target)])
            }
            _ => None,
        };
        let linked_resource = foreign_keys
            .as_deref()
            .and_then(<[ForeignKey]>::first)
            .map(|key| key.reference.resource.clone());

        let published = PublishedSchema {
            primary_key: resource.schema.primary_key.clone(),
            fields: resource
                .schema
                .fields
                .iter()
                .map(PublishedField::from_descriptor)
                .collect(),
            foreign_keys,
        };
        write_json_file(&schemas_dir.join(&schema_name), &published)?;
        tracing::debug!(
            resource = %resource.name,
            files = data_paths.len(),
            fields = published.fields.len(),
            "Packaged resource"
        );

        references.push(ResourceRef {
            name: resource.name.clone(),
            title: resource.title.clone(),
            description: resource.description.clone(),
            path: data_paths.clone(),
            schema: schema_path.clone(),
        });
        resources.push(BuiltResource {
            name: resource.name,
            title: resource.title,
            data_paths,
            schema_path,
            fields: published.fields.len(),
            linked_resource,
        });
    }

    let manifest = PackageManifest {
        profile: PACKAGE_PROFILE.to_string(),
        name: PACKAGE_NAME.to_string(),
        title: PACKAGE_TITLE.to_string(),
        homepage: PACKAGE_HOMEPAGE.to_string(),
        resources: references,
        licenses: vec![package_license()],
    };
    let manifest_path = destination.join("data-package.json");
    write_json_file(&manifest_path, &manifest)?;

    let archive = if zip {
        Some(zip_directory(destination)?)
    } else {
        None
    };

    Ok(PackageBuild {
        destination: destination.to_path_buf(),
        manifest_path,
        resources,
        archive,
    })
}

fn published_schema_name(resource_name: &str, source: &Path) -> String {
    match source.extension() {
        Some(ext) => format!("{resource_name}.{}", ext.to_string_lossy()),
        None => resource_name.to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned())
}

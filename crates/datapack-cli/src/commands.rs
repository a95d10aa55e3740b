//! Command implementations shared by the binary and integration tests.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use datapack_dictionary::generate_schemas;
use datapack_ingest::resolve_data_paths;
use datapack_model::{ResourcePath, ResourceSchema};
use datapack_output::{PackageBuild, build_package};
use datapack_transform::{LoadReport, load_rows};

/// Result of materializing rows for one resource.
#[derive(Debug)]
pub struct RowsOutcome {
    pub resource: String,
    pub report: LoadReport,
    pub output: Option<PathBuf>,
}

/// Generate resource schemas from a data dictionary.
pub fn run_schema(dictionary: &Path, destination: &Path) -> Result<Vec<PathBuf>> {
    let span = info_span!("schema", dictionary = %dictionary.display());
    let _guard = span.enter();
    let start = Instant::now();

    let written = generate_schemas(dictionary, destination)
        .with_context(|| format!("generate schemas from {}", dictionary.display()))?;
    info!(
        schemas = written.len(),
        destination = %destination.display(),
        duration_ms = start.elapsed().as_millis(),
        "schema generation complete"
    );
    Ok(written)
}

/// Assemble a data package from a schema file or directory.
pub fn run_export(source: &Path, destination: &Path, zip: bool) -> Result<PackageBuild> {
    let span = info_span!("export", destination = %destination.display());
    let _guard = span.enter();
    let start = Instant::now();

    let build = build_package(source, destination, zip)
        .with_context(|| format!("build package from {}", source.display()))?;
    info!(
        resources = build.resources.len(),
        archived = build.archive.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "export complete"
    );
    Ok(build)
}

/// Load and normalize the rows behind one resource schema, optionally
/// writing them to `output` as newline-delimited JSON.
pub fn run_rows(schema: &Path, output: Option<&Path>) -> Result<RowsOutcome> {
    let span = info_span!("rows", schema = %schema.display());
    let _guard = span.enter();
    let start = Instant::now();

    let resource = ResourceSchema::from_file(schema)
        .with_context(|| format!("read resource schema {}", schema.display()))?;
    let resource = stage_remote_data(resource)?;
    let report =
        load_rows(&resource).with_context(|| format!("load rows for {}", resource.name))?;
    let written = match output {
        Some(path) => {
            write_records(path, &report.records)?;
            Some(path.to_path_buf())
        }
        None => None,
    };
    info!(
        resource = %resource.name,
        records = report.records.len(),
        warnings = report.warnings.len(),
        row_errors = report.row_errors.len(),
        duration_ms = start.elapsed().as_millis(),
        "row load complete"
    );
    Ok(RowsOutcome {
        resource: resource.name,
        report,
        output: written,
    })
}

/// The row loader only reads local files; a schema still pointing at
/// its remote source is staged into a temp directory first.
fn stage_remote_data(mut resource: ResourceSchema) -> Result<ResourceSchema> {
    let remote = resource
        .path
        .entries()
        .iter()
        .any(|entry| entry.starts_with("http://") || entry.starts_with("https://"));
    if !remote {
        return Ok(resource);
    }

    let staging = std::env::temp_dir().join("datapack-rows");
    let local = resolve_data_paths(&resource.path, &staging)
        .with_context(|| format!("stage remote data for {}", resource.name))?;
    let mut paths: Vec<String> = local
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    resource.path = if paths.len() == 1 {
        ResourcePath::One(paths.remove(0))
    } else {
        ResourcePath::Many(paths)
    };
    Ok(resource)
}

fn write_records(path: &Path, records: &[String]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{record}").with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))
}

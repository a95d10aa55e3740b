use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use datapack_model::ResourcePath;
use reqwest::blocking::Client;

use crate::error::IngestError;

/// HTTP request timeout for data downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Sidecar extensions a shapefile cannot be read without.
const REQUIRED_SIDECARS: &[&str] = &["dbf", "shx"];

/// Sidecar extensions worth carrying along when available.
const OPTIONAL_SIDECARS: &[&str] = &["prj", "cpg"];

/// Materialize every source a resource points at into `destination`,
/// returning the local paths in declaration order.
///
/// HTTP(S) sources are downloaded, local sources copied; either way the
/// local filename is the source basename, so resolving the same source
/// twice lands on the same file. A `.shp` source pulls its sidecar
/// files along, since the geometry is unreadable without them.
pub fn resolve_data_paths(
    path: &ResourcePath,
    destination: &Path,
) -> Result<Vec<PathBuf>, IngestError> {
    fs::create_dir_all(destination).map_err(|e| IngestError::io(destination, e))?;

    let mut resolved = Vec::new();
    for entry in path.entries() {
        if is_remote(entry) {
            resolved.push(download_source(entry, destination)?);
        } else {
            resolved.push(copy_source(Path::new(entry), destination)?);
        }
    }
    Ok(resolved)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn download_source(url: &str, destination: &Path) -> Result<PathBuf, IngestError> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| IngestError::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let local = destination.join(remote_file_name(url)?);
    fetch_to_file(&client, url, &local)?;

    if has_extension(&local, "shp") {
        for ext in REQUIRED_SIDECARS {
            let sidecar_url = swap_url_extension(url, ext)?;
            fetch_to_file(&client, &sidecar_url, &local.with_extension(ext))?;
        }
        for ext in OPTIONAL_SIDECARS {
            let sidecar_url = swap_url_extension(url, ext)?;
            if fetch_to_file(&client, &sidecar_url, &local.with_extension(ext)).is_err() {
                tracing::warn!(url = %sidecar_url, "Optional shapefile sidecar not available");
            }
        }
    }
    Ok(local)
}

fn fetch_to_file(client: &Client, url: &str, local: &Path) -> Result<(), IngestError> {
    let download_error = |message: String| IngestError::Download {
        url: url.to_string(),
        message,
    };

    tracing::debug!(url, path = %local.display(), "Downloading source file");
    let response = client
        .get(url)
        .send()
        .map_err(|e| download_error(e.to_string()))?;
    if !response.status().is_success() {
        return Err(download_error(format!("HTTP status {}", response.status())));
    }
    let bytes = response.bytes().map_err(|e| download_error(e.to_string()))?;
    fs::write(local, &bytes).map_err(|e| IngestError::io(local, e))?;
    Ok(())
}

fn copy_source(source: &Path, destination: &Path) -> Result<PathBuf, IngestError> {
    if has_extension(source, "shp") {
        for ext in REQUIRED_SIDECARS {
            let sidecar = source.with_extension(ext);
            if !sidecar.exists() {
                return Err(IngestError::MissingSidecar { path: sidecar });
            }
        }
    }

    let local = copy_one(source, destination)?;

    if has_extension(&local, "shp") {
        for ext in REQUIRED_SIDECARS {
            copy_one(&source.with_extension(ext), destination)?;
        }
        for ext in OPTIONAL_SIDECARS {
            let sidecar = source.with_extension(ext);
            if sidecar.exists() {
                copy_one(&sidecar, destination)?;
            } else {
                tracing::warn!(path = %sidecar.display(), "Optional shapefile sidecar not found");
            }
        }
    }
    Ok(local)
}

fn copy_one(source: &Path, destination: &Path) -> Result<PathBuf, IngestError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| IngestError::io(source, std::io::Error::other("source has no file name")))?;
    let local = destination.join(file_name);

    // Re-exporting over a destination that already holds the source
    // file must not truncate it.
    if let (Ok(from), Ok(to)) = (source.canonicalize(), local.canonicalize())
        && from == to
    {
        return Ok(local);
    }

    tracing::debug!(from = %source.display(), to = %local.display(), "Copying source file");
    fs::copy(source, &local).map_err(|e| IngestError::io(source, e))?;
    Ok(local)
}

fn remote_file_name(url: &str) -> Result<String, IngestError> {
    let name = url
        .split(['?', '#'])
        .next()
        .and_then(|base| base.rsplit('/').next())
        .filter(|name| !name.is_empty());
    match name {
        Some(name) => Ok(name.to_string()),
        None => Err(IngestError::Download {
            url: url.to_string(),
            message: "cannot derive a file name from URL".to_string(),
        }),
    }
}

fn swap_url_extension(url: &str, extension: &str) -> Result<String, IngestError> {
    let stem = url
        .strip_suffix(".shp")
        .ok_or_else(|| IngestError::Download {
            url: url.to_string(),
            message: "expected a .shp URL".to_string(),
        })?;
    Ok(format!("{stem}.{extension}"))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::PackageError;

/// Archive a package directory to a sibling `{directory}.zip`.
///
/// Entry names are relative to the directory itself, so unpacking
/// yields `data-package.json`, `schemas/...` and `data/...` directly,
/// with no wrapper directory. Entries are written in sorted path order
/// so identical trees produce identical archives.
pub fn zip_directory(directory: &Path) -> Result<PathBuf, PackageError> {
    let archive_path = sibling_archive_path(directory);
    let mut files = Vec::new();
    collect_files(directory, &mut files)?;

    let archive_error = |message: String| PackageError::Archive {
        path: archive_path.clone(),
        message,
    };

    let file = File::create(&archive_path).map_err(|e| PackageError::io(&archive_path, e))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for path in &files {
        let name = path
            .strip_prefix(directory)
            .map_err(|e| archive_error(e.to_string()))?
            .to_string_lossy()
            .replace('\\', "/");
        writer
            .start_file(name, options)
            .map_err(|e| archive_error(e.to_string()))?;
        let contents = fs::read(path).map_err(|e| PackageError::io(path, e))?;
        writer
            .write_all(&contents)
            .map_err(|e| archive_error(e.to_string()))?;
    }
    writer.finish().map_err(|e| archive_error(e.to_string()))?;

    tracing::debug!(
        path = %archive_path.display(),
        entries = files.len(),
        "Archived package"
    );
    Ok(archive_path)
}

fn sibling_archive_path(directory: &Path) -> PathBuf {
    let mut name = directory
        .file_name()
        .map_or_else(|| "package".into(), ToOwned::to_owned);
    name.push(".zip");
    directory.with_file_name(name)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), PackageError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| PackageError::io(dir, e))? {
        let entry = entry.map_err(|e| PackageError::io(dir, e))?;
        entries.push(entry.path());
    }
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

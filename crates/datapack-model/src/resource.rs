use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::field::FieldDescriptor;

/// Source location(s) for a resource: a single file or an ordered list.
///
/// Spreadsheet-era schemas recorded one path per resource; later ones
/// record several CSV fragments that are concatenated on load. Both
/// shapes round-trip through the same JSON attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourcePath {
    One(String),
    Many(Vec<String>),
}

impl ResourcePath {
    /// All paths, in declaration order.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            Self::One(path) => vec![path.as_str()],
            Self::Many(paths) => paths.iter().map(String::as_str).collect(),
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(path) => Some(path.as_str()),
            Self::Many(paths) => paths.first().map(String::as_str),
        }
    }
}

/// The tabular contract for one resource: ordered fields plus an
/// optional primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(rename = "primaryKey", default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl TableSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// A full resource definition as stored on disk: identity, provenance
/// paths, display metadata, and the table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bq_dataset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bq_table_name: Option<String>,
    pub name: String,
    pub path: ResourcePath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: TableSchema,
}

impl ResourceSchema {
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        read_json_file(path)
    }

    pub fn write(&self, path: &Path) -> Result<(), ModelError> {
        write_json_file(path, self)
    }
}

/// Read and deserialize a JSON document, attributing failures to `path`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let file = File::open(path).map_err(|source| ModelError::io(path, source))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| ModelError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as pretty JSON and move it into place atomically.
///
/// The document is staged next to the destination and renamed so a
/// failed write never leaves a truncated schema behind.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), ModelError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ModelError::io(parent, source))?;
    }
    let staged = staging_path(path);
    {
        let file = File::create(&staged).map_err(|source| ModelError::io(&staged, source))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| ModelError::Json {
            path: staged.clone(),
            source,
        })?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|source| ModelError::io(&staged, source))?;
    }
    fs::rename(&staged, path).map_err(|source| ModelError::io(path, source))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| "staged".into(), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}

use std::path::PathBuf;

use datapack_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("workbook {path} contains no worksheets")]
    EmptyWorkbook { path: PathBuf },

    #[error("unsupported dictionary format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("dictionary {path} is missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: String },

    #[error("dictionary {path} row {row} has no value for `{column}`")]
    MissingValue {
        path: PathBuf,
        row: usize,
        column: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl DictionaryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

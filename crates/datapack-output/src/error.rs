use std::path::PathBuf;

use datapack_ingest::IngestError;
use datapack_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no schema files found under {path}")]
    NoSchemas { path: PathBuf },

    #[error("failed to archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl PackageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("failed to read shapefile {path}: {message}")]
    Shapefile { path: PathBuf, message: String },

    #[error("unsupported dataset: {path}")]
    UnsupportedDataset { path: PathBuf },

    #[error("required shapefile sidecar missing: {path}")]
    MissingSidecar { path: PathBuf },

    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

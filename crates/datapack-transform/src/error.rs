use datapack_ingest::IngestError;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("resource `{name}` must point at exactly one dataset file, found {count}")]
    NotASingleFile { name: String, count: usize },

    #[error("resource `{name}` points at remote dataset {url}; resolve it locally first")]
    RemoteDataset { name: String, url: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

use thiserror::Error;

/// The extractor could not resolve or probe a URL.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No URL provided")]
    MissingUrl,
    #[error("{0}")]
    Extractor(String),
}

/// Fetching, merging or storing a chosen format failed.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Missing {0}")]
    MissingField(&'static str),
    #[error("{0}")]
    Metadata(String),
    #[error("{0}")]
    Fetch(String),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<anyhow::Error> for ExtractionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Extractor(format!("{err:#}"))
    }
}

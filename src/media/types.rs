use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the extractor reports about a URL when probing without downloading.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogInfo {
    pub title: Option<String>,
    #[serde(default)]
    pub formats: Vec<CatalogFormat>,
}

/// A single row of the extractor's format catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFormat {
    pub format_id: String,
    pub ext: Option<String>,
    pub vcodec: Option<String>,
    pub height: Option<u32>,
}

/// A selectable resolution offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    pub format_id: String,
    pub height: u32,
    pub ext: String,
}

/// Form fields posted by a resolution button.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
}

/// A finished download sitting in the output directory.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub path: PathBuf,
    pub filename: String,
}

use super::types::CatalogInfo;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable name of the extractor
    fn name(&self) -> &'static str;

    /// Resolve a URL into its title and format catalog without downloading media
    async fn probe(&self, url: &str) -> Result<CatalogInfo>;

    /// Fetch the streams matched by `format_selector` and mux them into an MP4 at `output`,
    /// replacing any existing file there
    async fn fetch_and_merge(&self, url: &str, format_selector: &str, output: &Path)
        -> Result<()>;

    /// Test if this extractor is available on the system
    async fn test_availability(&self) -> bool;
}

use super::{
    errors::DownloadError,
    extractor::Extractor,
    types::{DownloadRequest, MediaFile},
};
use crate::utils::{file_stem, media_filename, media_path};
use std::path::Path;
use tracing::{info, warn};

/// Selector asking for the chosen video stream plus the best audio track,
/// falling back to the best single file.
pub fn format_selector(format_id: &str) -> String {
    format!("{format_id}+bestaudio/best")
}

/// Downloads the requested format into `output_dir` as `<title>.mp4`.
///
/// An existing file with the same name is overwritten. A partially written
/// file is left in place when the extractor fails.
pub async fn download(
    extractor: &dyn Extractor,
    output_dir: &Path,
    request: &DownloadRequest,
) -> Result<MediaFile, DownloadError> {
    let url = request.url.trim();
    let format_id = request.format_id.trim();
    if url.is_empty() {
        return Err(DownloadError::MissingField("url"));
    }
    if format_id.is_empty() {
        return Err(DownloadError::MissingField("format_id"));
    }

    let catalog = extractor.probe(url).await.map_err(|e| {
        warn!("{} failed to probe {}: {:#}", extractor.name(), url, e);
        DownloadError::Metadata(format!("{e:#}"))
    })?;

    let stem = file_stem(catalog.title.as_deref());
    let path = media_path(output_dir, &stem);
    tokio::fs::create_dir_all(output_dir).await?;

    extractor
        .fetch_and_merge(url, &format_selector(format_id), &path)
        .await
        .map_err(|e| {
            warn!("{} failed to download {}: {:#}", extractor.name(), url, e);
            DownloadError::Fetch(format!("{e:#}"))
        })?;

    info!("Downloaded {} to {}", url, path.display());
    Ok(MediaFile {
        path,
        filename: media_filename(&stem),
    })
}

mod download;
mod errors;
mod extractor;
mod formats;
mod retention;
mod types;
mod ytdlp;

#[cfg(test)]
pub(crate) mod test_support;

pub use download::download;
pub use errors::DownloadError;
pub use extractor::Extractor;
pub use formats::list_formats;
pub use retention::spawn_sweeper;
pub use types::{DownloadRequest, FormatDescriptor};
pub use ytdlp::{YtDlpExtractor, DEFAULT_YTDLP_BINARY};

#[cfg(test)]
pub(crate) use types::CatalogFormat;

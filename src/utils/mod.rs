use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const MEDIA_EXTENSION: &str = "mp4";

/// Leaves room under the 255-byte name limit for yt-dlp's
/// `.fNNN.mp4.part` temporary names.
pub const MAX_STEM_LEN: usize = 200;

/// Replaces every character outside `[A-Za-z0-9 _.-]` with an underscore.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Name used when the extractor reports no usable title.
pub fn fallback_title() -> String {
    format!("video_{}", Uuid::new_v4())
}

/// File stem for a download: the sanitized title cut to [`MAX_STEM_LEN`]
/// bytes, or a fresh unique name.
pub fn file_stem(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.trim().is_empty() => {
            let mut stem = sanitize_title(title);
            // sanitized output is ASCII, so any byte index is a char boundary
            stem.truncate(MAX_STEM_LEN);
            stem
        }
        _ => fallback_title(),
    }
}

pub fn media_filename(stem: &str) -> String {
    format!("{stem}.{MEDIA_EXTENSION}")
}

pub fn media_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(media_filename(stem))
}

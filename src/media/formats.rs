use super::{
    errors::ExtractionError,
    extractor::Extractor,
    types::{CatalogFormat, FormatDescriptor},
};
use std::{cmp::Reverse, collections::HashSet};
use tracing::{info, warn};

const CONTAINER: &str = "mp4";

/// Lists one MP4 video format per distinct height, tallest first.
pub async fn list_formats(
    extractor: &dyn Extractor,
    url: &str,
) -> Result<Vec<FormatDescriptor>, ExtractionError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ExtractionError::MissingUrl);
    }

    let catalog = extractor.probe(url).await.map_err(|e| {
        warn!("{} failed to probe {}: {:#}", extractor.name(), url, e);
        ExtractionError::from(e)
    })?;

    let formats = select_formats(&catalog.formats);
    info!(
        "Found {} resolutions among {} formats for {}",
        formats.len(),
        catalog.formats.len(),
        url
    );
    Ok(formats)
}

/// Keeps video-bearing MP4 formats with a known height and collapses
/// duplicates. When several formats share a height, the one listed first
/// by the extractor wins.
pub fn select_formats(catalog: &[CatalogFormat]) -> Vec<FormatDescriptor> {
    let mut candidates: Vec<FormatDescriptor> = catalog
        .iter()
        .filter(|f| f.vcodec.as_deref() != Some("none"))
        .filter(|f| f.ext.as_deref() == Some(CONTAINER))
        .filter_map(|f| match f.height {
            Some(height) if height > 0 => Some(FormatDescriptor {
                format_id: f.format_id.clone(),
                height,
                ext: CONTAINER.to_string(),
            }),
            _ => None,
        })
        .collect();

    // stable, so ties keep catalog order
    candidates.sort_by_key(|f| Reverse(f.height));

    let mut seen = HashSet::new();
    candidates.retain(|f| seen.insert(f.height));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::test_support::FakeExtractor;

    fn video(id: &str, ext: &str, height: Option<u32>) -> CatalogFormat {
        CatalogFormat {
            format_id: id.to_string(),
            ext: Some(ext.to_string()),
            vcodec: Some("avc1.4d401f".to_string()),
            height,
        }
    }

    fn audio(id: &str) -> CatalogFormat {
        CatalogFormat {
            format_id: id.to_string(),
            ext: Some("m4a".to_string()),
            vcodec: Some("none".to_string()),
            height: None,
        }
    }

    fn heights(formats: &[FormatDescriptor]) -> Vec<u32> {
        formats.iter().map(|f| f.height).collect()
    }

    #[test]
    fn test_duplicate_heights_collapse() {
        let catalog = vec![
            video("135", "mp4", Some(480)),
            video("136", "mp4", Some(720)),
            video("137", "mp4", Some(1080)),
            video("22", "mp4", Some(720)),
            audio("140"),
        ];

        let formats = select_formats(&catalog);
        assert_eq!(heights(&formats), vec![1080, 720, 480]);
        assert_eq!(formats[1].format_id, "136");
        assert!(formats.iter().all(|f| f.ext == "mp4"));
    }

    #[test]
    fn test_non_mp4_and_unknown_heights_dropped() {
        let catalog = vec![
            video("248", "webm", Some(1080)),
            video("sb0", "mp4", None),
            video("zero", "mp4", Some(0)),
            CatalogFormat {
                format_id: "noext".to_string(),
                ext: None,
                vcodec: None,
                height: Some(360),
            },
            audio("140"),
        ];

        assert!(select_formats(&catalog).is_empty());
    }

    #[test]
    fn test_missing_vcodec_is_kept() {
        let catalog = vec![CatalogFormat {
            format_id: "18".to_string(),
            ext: Some("mp4".to_string()),
            vcodec: None,
            height: Some(360),
        }];

        let formats = select_formats(&catalog);
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].format_id, "18");
    }

    #[test]
    fn test_heights_strictly_descending() {
        let catalog: Vec<CatalogFormat> = [144, 2160, 360, 144, 1440, 360, 240, 2160]
            .iter()
            .enumerate()
            .map(|(i, h)| video(&i.to_string(), "mp4", Some(*h)))
            .collect();

        let formats = select_formats(&catalog);
        assert_eq!(heights(&formats), vec![2160, 1440, 360, 240, 144]);
        assert!(formats.windows(2).all(|w| w[0].height > w[1].height));
        assert_eq!(formats[0].format_id, "1");
    }

    #[tokio::test]
    async fn test_list_formats_is_repeatable() {
        let extractor = FakeExtractor::with_catalog(
            Some("Clip"),
            vec![
                video("137", "mp4", Some(1080)),
                video("136", "mp4", Some(720)),
                video("22", "mp4", Some(720)),
                video("135", "mp4", Some(480)),
                audio("140"),
            ],
        );

        let first = list_formats(&extractor, "https://example.com/v").await.unwrap();
        let second = list_formats(&extractor, "https://example.com/v").await.unwrap();
        assert_eq!(heights(&first), vec![1080, 720, 480]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_formats_reports_extractor_failure() {
        let extractor = FakeExtractor::failing_probe("ERROR: Unsupported URL: nope");
        let err = list_formats(&extractor, "nope").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Extractor(_)));
        assert!(err.to_string().contains("Unsupported URL"));
    }

    #[tokio::test]
    async fn test_list_formats_rejects_blank_url() {
        let extractor = FakeExtractor::with_catalog(Some("Clip"), vec![]);
        let err = list_formats(&extractor, "   ").await.unwrap_err();
        assert!(matches!(err, ExtractionError::MissingUrl));
        assert_eq!(extractor.probe_calls(), 0);
    }
}

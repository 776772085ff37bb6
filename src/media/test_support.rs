use super::{
    extractor::Extractor,
    types::{CatalogFormat, CatalogInfo},
};
use anyhow::Result;
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

pub const FAKE_MEDIA: &[u8] = b"\x00\x00\x00\x18ftypmp42fake";

/// In-process extractor that serves a fixed catalog and writes
/// [`FAKE_MEDIA`] on fetch.
pub struct FakeExtractor {
    catalog: CatalogInfo,
    probe_error: Option<String>,
    fetch_error: Option<String>,
    probes: AtomicUsize,
    fetches: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeExtractor {
    pub fn with_catalog(title: Option<&str>, formats: Vec<CatalogFormat>) -> Self {
        Self {
            catalog: CatalogInfo {
                title: title.map(str::to_string),
                formats,
            },
            probe_error: None,
            fetch_error: None,
            probes: AtomicUsize::new(0),
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_probe(message: &str) -> Self {
        Self {
            probe_error: Some(message.to_string()),
            ..Self::with_catalog(None, Vec::new())
        }
    }

    pub fn failing_fetch(title: Option<&str>, message: &str) -> Self {
        Self {
            fetch_error: Some(message.to_string()),
            ..Self::with_catalog(title, Vec::new())
        }
    }

    pub fn probe_calls(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Selector and output path of every fetch, in call order.
    pub fn fetches(&self) -> Vec<(String, PathBuf)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn probe(&self, _url: &str) -> Result<CatalogInfo> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        match &self.probe_error {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(self.catalog.clone()),
        }
    }

    async fn fetch_and_merge(
        &self,
        _url: &str,
        format_selector: &str,
        output: &Path,
    ) -> Result<()> {
        self.fetches
            .lock()
            .unwrap()
            .push((format_selector.to_string(), output.to_path_buf()));
        if let Some(message) = &self.fetch_error {
            return Err(anyhow::anyhow!(message.clone()));
        }
        tokio::fs::write(output, FAKE_MEDIA).await?;
        Ok(())
    }

    async fn test_availability(&self) -> bool {
        true
    }
}

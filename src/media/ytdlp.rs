use super::{extractor::Extractor, types::CatalogInfo};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{ffi::OsString, path::Path, process::Output, time::Duration};
use tokio::process::Command;
use tracing::{debug, info, warn};

pub const DEFAULT_YTDLP_BINARY: &str = "yt-dlp";

pub struct YtDlpExtractor {
    binary: String,
    timeout: Option<Duration>,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    async fn run(&self, args: Vec<OsString>, what: &str) -> Result<Output> {
        debug!("Running {} {:?}", self.binary, args);

        let mut command = Command::new(&self.binary);
        command.args(&args).kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .with_context(|| format!("{what} timed out"))?,
            None => command.output().await,
        }
        .with_context(|| format!("Failed to run {}", self.binary))?;

        if !output.status.success() {
            return Err(anyhow::anyhow!(failure_message(&output)));
        }

        Ok(output)
    }
}

fn probe_args(url: &str) -> Vec<OsString> {
    [
        "--dump-single-json",
        "--skip-download",
        "--no-playlist",
        "--no-warnings",
        "--",
        url,
    ]
    .into_iter()
    .map(OsString::from)
    .collect()
}

fn fetch_args(url: &str, format_selector: &str, output: &Path) -> Vec<OsString> {
    // `%` starts a field in yt-dlp output templates
    let template = output.to_string_lossy().replace('%', "%%");

    let mut args: Vec<OsString> = vec![
        "--format".into(),
        format_selector.into(),
        "--merge-output-format".into(),
        "mp4".into(),
        "--output".into(),
        template.into(),
    ];
    args.extend(
        [
            "--force-overwrites",
            // retention is keyed on mtime, so it must be the download time
            "--no-mtime",
            "--no-playlist",
            "--no-warnings",
            "--quiet",
            "--",
            url,
        ]
        .into_iter()
        .map(OsString::from),
    );
    args
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("yt-dlp exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}

fn parse_catalog(raw: &[u8]) -> Result<CatalogInfo> {
    serde_json::from_slice(raw).context("Failed to parse media metadata")
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<CatalogInfo> {
        debug!("Probing formats with yt-dlp for: {}", url);

        let output = self.run(probe_args(url), "Media metadata extraction").await?;
        debug!("yt-dlp returned {} bytes of metadata", output.stdout.len());

        parse_catalog(&output.stdout)
    }

    async fn fetch_and_merge(
        &self,
        url: &str,
        format_selector: &str,
        output: &Path,
    ) -> Result<()> {
        info!(
            "Downloading {} with format {} to {}",
            url,
            format_selector,
            output.display()
        );

        self.run(fetch_args(url, format_selector, output), "Media download")
            .await?;
        Ok(())
    }

    async fn test_availability(&self) -> bool {
        let yt_dlp = probe_tool(&self.binary, "--version").await;
        // Merging separate video and audio streams needs ffmpeg
        let ffmpeg = probe_tool("ffmpeg", "-version").await;

        if yt_dlp.is_some() && ffmpeg.is_none() {
            warn!("⚠️  yt-dlp will work but formats without audio cannot be merged");
        }

        yt_dlp.is_some()
    }
}

/// Runs `program arg` and returns the first line it prints, or `None` when
/// the program is missing or exits with an error.
async fn probe_tool(program: &str, arg: &str) -> Option<String> {
    match Command::new(program).arg(arg).output().await {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string();
            info!("✅ {} is available: {}", program, version);
            Some(version)
        }
        Ok(output) => {
            warn!("❌ {} {} exited with {}", program, arg, output.status);
            None
        }
        Err(e) => {
            warn!("❌ {} not found: {}", program, e);
            None
        }
    }
}

use anyhow::{Context, Result};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Removes regular files in `dir` last modified more than `max_age` ago.
/// Returns how many files were deleted.
pub async fn sweep_expired(dir: &Path, max_age: Duration) -> Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", dir.display()));
        }
    };

    let now = SystemTime::now();
    let mut removed = 0;

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to read {}", dir.display()))?
    {
        let path = entry.path();
        let metadata = match entry.metadata().await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if !matches!(age, Some(age) if age > max_age) {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed expired download {}", path.display());
                removed += 1;
            }
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }

    Ok(removed)
}

/// Sweeps `dir` every `interval` for as long as the runtime lives.
pub fn spawn_sweeper(dir: PathBuf, max_age: Duration, interval: Duration) -> JoinHandle<()> {
    info!(
        "Removing downloads older than {}h from {} every {}m",
        max_age.as_secs() / 3600,
        dir.display(),
        interval.as_secs() / 60
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match sweep_expired(&dir, max_age).await {
                Ok(0) => {}
                Ok(n) => info!("Removed {} expired downloads", n),
                Err(e) => warn!("Download cleanup failed: {:#}", e),
            }
        }
    })
}

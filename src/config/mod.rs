use crate::media::DEFAULT_YTDLP_BINARY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    time::Duration,
};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";
pub const DEFAULT_RETENTION_HOURS: u64 = 24;
pub const DEFAULT_SWEEP_INTERVAL_MINUTES: u64 = 30;
const MAX_SWEEP_INTERVAL_MINUTES: u64 = 365 * 24 * 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DownloadsConfig {
    pub output_dir: PathBuf,
    /// Downloads older than this are deleted; `0` keeps them forever
    pub retention_hours: u64,
    pub sweep_interval_minutes: u64,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            retention_hours: DEFAULT_RETENTION_HOURS,
            sweep_interval_minutes: DEFAULT_SWEEP_INTERVAL_MINUTES,
        }
    }
}

impl DownloadsConfig {
    pub fn retention(&self) -> Option<Duration> {
        (self.retention_hours > 0)
            .then(|| Duration::from_secs(self.retention_hours.saturating_mul(3600)))
    }

    pub fn sweep_interval(&self) -> Duration {
        let minutes = self
            .sweep_interval_minutes
            .clamp(1, MAX_SWEEP_INTERVAL_MINUTES);
        Duration::from_secs(minutes * 60)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ExtractorConfig {
    pub binary: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_YTDLP_BINARY.to_string(),
            timeout_secs: None,
        }
    }
}

impl ExtractorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub downloads: DownloadsConfig,
    pub extractor: ExtractorConfig,
    pub logging: LoggingConfig,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }

    /// Applies environment variables, then command line overrides.
    pub fn apply(self, overrides: Overrides) -> Result<Self> {
        self.apply_with(env_var, overrides)
    }

    fn apply_with(
        mut self,
        env_lookup: impl Fn(&str) -> Option<String>,
        overrides: Overrides,
    ) -> Result<Self> {
        self.apply_env(env_lookup)?;

        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.downloads.output_dir = output_dir;
        }
        Ok(self)
    }

    fn apply_env(&mut self, env_lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = env_lookup("VIDGRAB_HOST") {
            self.server.host = host
                .parse()
                .with_context(|| format!("VIDGRAB_HOST must be an IP address, got {host:?}"))?;
        }
        if let Some(port) = env_lookup("PORT") {
            self.server.port = port.parse().with_context(|| {
                format!("PORT must be a number between 0 and 65535, got {port:?}")
            })?;
        }
        if let Some(dir) = env_lookup("VIDGRAB_OUTPUT_DIR") {
            self.downloads.output_dir = PathBuf::from(dir);
        }
        if let Some(hours) = env_lookup("VIDGRAB_RETENTION_HOURS") {
            self.downloads.retention_hours = hours.parse().with_context(|| {
                format!("VIDGRAB_RETENTION_HOURS must be a number, got {hours:?}")
            })?;
        }
        if let Some(binary) = env_lookup("YTDLP_BIN") {
            self.extractor.binary = binary;
        }
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

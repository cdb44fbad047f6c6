//! Configuration module
//!
//! All configuration is environment-driven. `Config::from_env()` loads a
//! `.env` file if present, applies defaults, and validates credential groups
//! that only make sense together (the WebDAV settings).

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};

// Defaults
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_VIDEOS_DIR: &str = "/data/videos";
const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_PUSH_GATEWAY_URL: &str = "https://exp.host/--/api/v2/push/send";
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 60;
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 15;
const DEFAULT_DELIVERY_QUEUE_SIZE: usize = 1000;
const DEFAULT_MAX_CONCURRENT_DELIVERIES: usize = 2;
const DEFAULT_MAX_REPLAYS: u32 = 5;
const DEFAULT_MAX_RETRIES: u32 = 10;
const DEFAULT_RETRY_DELAY_SECS: u64 = 20;

/// Object store (WebDAV) settings. All five are required together: a partial
/// group means a misconfigured deployment, and upload-dependent functionality
/// must refuse to start rather than attempt a half-configured call.
#[derive(Clone, Debug)]
pub struct WebdavConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub upload_path: String,
    /// Internet-facing base URL for fetching uploaded objects. Deliberately
    /// separate from `host`, which may not be reachable from receivers.
    pub public_host: String,
}

/// Receiver-side playback tunables. These are configuration values with
/// stated defaults, not literals baked into the controller logic.
#[derive(Clone, Copy, Debug)]
pub struct PlaybackTunables {
    pub max_replays: u32,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
}

impl Default for PlaybackTunables {
    fn default() -> Self {
        Self {
            max_replays: DEFAULT_MAX_REPLAYS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
        }
    }
}

impl PlaybackTunables {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Source directory for uploaded media; converted output lands in
    /// `{videos_dir}/processed`.
    pub videos_dir: PathBuf,
    /// Public base URL used to derive `publicUrl` for processed media.
    pub server_url: String,
    pub ffmpeg_path: String,
    pub push_gateway_url: String,
    pub webdav: Option<WebdavConfig>,
    pub probe_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub notify_timeout_secs: u64,
    pub delivery_queue_size: usize,
    pub max_concurrent_deliveries: usize,
    pub playback: PlaybackTunables,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let webdav = Self::webdav_from_env()?;

        let config = Self {
            server_port: env_parse("PORT", DEFAULT_SERVER_PORT),
            videos_dir: PathBuf::from(env_or("VIDEOS_DIR", DEFAULT_VIDEOS_DIR)),
            server_url: env_or("SERVER_URL", DEFAULT_SERVER_URL)
                .trim_end_matches('/')
                .to_string(),
            ffmpeg_path: env_or("FFMPEG_PATH", DEFAULT_FFMPEG_PATH),
            push_gateway_url: env_or("PUSH_GATEWAY_URL", DEFAULT_PUSH_GATEWAY_URL),
            webdav,
            probe_timeout_secs: env_parse("WEBDAV_PROBE_TIMEOUT_SECS", DEFAULT_PROBE_TIMEOUT_SECS),
            upload_timeout_secs: env_parse(
                "WEBDAV_UPLOAD_TIMEOUT_SECS",
                DEFAULT_UPLOAD_TIMEOUT_SECS,
            ),
            notify_timeout_secs: env_parse("PUSH_TIMEOUT_SECS", DEFAULT_NOTIFY_TIMEOUT_SECS),
            delivery_queue_size: env_parse("DELIVERY_QUEUE_SIZE", DEFAULT_DELIVERY_QUEUE_SIZE),
            max_concurrent_deliveries: env_parse(
                "MAX_CONCURRENT_DELIVERIES",
                DEFAULT_MAX_CONCURRENT_DELIVERIES,
            ),
            playback: PlaybackTunables {
                max_replays: env_parse("PLAYBACK_MAX_REPLAYS", DEFAULT_MAX_REPLAYS),
                max_retries: env_parse("PLAYBACK_MAX_RETRIES", DEFAULT_MAX_RETRIES),
                retry_delay_secs: env_parse("PLAYBACK_RETRY_DELAY_SECS", DEFAULT_RETRY_DELAY_SECS),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Read the WebDAV group. Returns `None` when no WebDAV variable is set,
    /// the full config when all five are set, and an error for a partial group.
    fn webdav_from_env() -> Result<Option<WebdavConfig>> {
        let vars = [
            ("WEBDAV_HOST", env_opt("WEBDAV_HOST")),
            ("WEBDAV_USERNAME", env_opt("WEBDAV_USERNAME")),
            ("WEBDAV_PASSWORD", env_opt("WEBDAV_PASSWORD")),
            ("WEBDAV_UPLOAD_PATH", env_opt("WEBDAV_UPLOAD_PATH")),
            ("WEBDAV_PUBLIC_HOST", env_opt("WEBDAV_PUBLIC_HOST")),
        ];

        if vars.iter().all(|(_, v)| v.is_none()) {
            return Ok(None);
        }

        let missing: Vec<&str> = vars
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect();
        if !missing.is_empty() {
            bail!(
                "Incomplete WebDAV configuration: missing {}. \
                 All of WEBDAV_HOST, WEBDAV_USERNAME, WEBDAV_PASSWORD, \
                 WEBDAV_UPLOAD_PATH, and WEBDAV_PUBLIC_HOST must be set together.",
                missing.join(", ")
            );
        }

        let mut values = vars.into_iter().map(|(_, v)| v.unwrap_or_default());
        Ok(Some(WebdavConfig {
            host: values.next().unwrap_or_default(),
            username: values.next().unwrap_or_default(),
            password: values.next().unwrap_or_default(),
            upload_path: values.next().unwrap_or_default(),
            public_host: values.next().unwrap_or_default(),
        }))
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_empty() {
            bail!("SERVER_URL must not be empty");
        }
        if self.delivery_queue_size == 0 {
            bail!("DELIVERY_QUEUE_SIZE must be at least 1");
        }
        if self.max_concurrent_deliveries == 0 {
            bail!("MAX_CONCURRENT_DELIVERIES must be at least 1");
        }
        Ok(())
    }

    /// Directory where converted output is written.
    pub fn processed_dir(&self) -> PathBuf {
        self.videos_dir.join("processed")
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }

    /// A config with defaults for everything, rooted at the given media
    /// directory. Intended for tests and embedded use.
    pub fn for_videos_dir(videos_dir: impl AsRef<Path>) -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            videos_dir: videos_dir.as_ref().to_path_buf(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            ffmpeg_path: DEFAULT_FFMPEG_PATH.to_string(),
            push_gateway_url: DEFAULT_PUSH_GATEWAY_URL.to_string(),
            webdav: None,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
            notify_timeout_secs: DEFAULT_NOTIFY_TIMEOUT_SECS,
            delivery_queue_size: DEFAULT_DELIVERY_QUEUE_SIZE,
            max_concurrent_deliveries: DEFAULT_MAX_CONCURRENT_DELIVERIES,
            playback: PlaybackTunables::default(),
        }
    }
}

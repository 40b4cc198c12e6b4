//! Configuration loading for Reflow.
//!
//! Reads `~/.reflow/config.toml`. Every section and every field is optional;
//! a missing file is not an error.
//!
//! ```toml
//! [engine]
//! slot_capacity = 8
//!
//! [app]
//! tick_ms = 250
//! step = 1
//! limit = 0
//! paused = false
//! high_contrast = false
//!
//! [log]
//! filter = "info"
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment override for `[app] tick_ms`.
pub const TICK_MS_ENV: &str = "REFLOW_TICK_MS";

pub const DEFAULT_TICK_MS: u64 = 250;
pub const MIN_TICK_MS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Default, Deserialize)]
pub struct ReflowConfig {
    pub engine: Option<EngineConfig>,
    pub app: Option<AppConfig>,
    pub log: Option<LogConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Session engine tuning.
#[derive(Debug, Default, Deserialize)]
pub struct EngineConfig {
    /// Slots preallocated for each session's first cycle.
    pub slot_capacity: Option<usize>,
}

/// Demo application settings.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Timer period in milliseconds. Clamped to at least 10.
    pub tick_ms: Option<u64>,
    /// Counter increment per tick. Clamped to at least 1.
    pub step: Option<u64>,
    /// Quit once the counter reaches this value. 0 disables the limit.
    #[serde(default)]
    pub limit: u64,
    /// Start with the timer stopped.
    #[serde(default)]
    pub paused: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

/// Resolved settings with defaults and overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub slot_capacity: usize,
    pub tick: Duration,
    pub step: u64,
    pub limit: Option<u64>,
    pub paused: bool,
    pub high_contrast: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        ReflowConfig::default().settings()
    }
}

impl ReflowConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path. `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        Self::parse(&content)
            .map(Some)
            .map_err(|source| {
                tracing::warn!("Failed to parse config at {:?}: {}", path, source);
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolve defaults, clamps, and the `REFLOW_TICK_MS` override.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings_with_tick_override(tick_ms_from_env())
    }

    fn settings_with_tick_override(&self, tick_override: Option<u64>) -> Settings {
        let engine = self.engine.as_ref();
        let app = self.app.as_ref();

        let tick_ms = tick_override
            .or_else(|| app.and_then(|app| app.tick_ms))
            .unwrap_or(DEFAULT_TICK_MS)
            .max(MIN_TICK_MS);
        let step = app.and_then(|app| app.step).unwrap_or(1).max(1);
        let limit = app.map(|app| app.limit).filter(|limit| *limit > 0);

        Settings {
            slot_capacity: engine.and_then(|engine| engine.slot_capacity).unwrap_or(0),
            tick: Duration::from_millis(tick_ms),
            step,
            limit,
            paused: app.is_some_and(|app| app.paused),
            high_contrast: app.is_some_and(|app| app.high_contrast),
            log_filter: self
                .log
                .as_ref()
                .and_then(|log| log.filter.as_deref())
                .map(str::trim)
                .filter(|filter| !filter.is_empty())
                .unwrap_or(DEFAULT_LOG_FILTER)
                .to_string(),
        }
    }
}

fn tick_ms_from_env() -> Option<u64> {
    let raw = env::var(TICK_MS_ENV).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {TICK_MS_ENV}={raw:?}: not a number of milliseconds");
            None
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".reflow").join("config.toml"))
}

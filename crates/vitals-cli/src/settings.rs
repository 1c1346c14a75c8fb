//! TOML settings.
//!
//! Looked up at `--config PATH` when given, otherwise in the platform
//! configuration folder:
//! - macOS: ~/Library/Application Support/com.vitals-pipeline.Vitals/
//! - Windows: %APPDATA%/vitals-pipeline/Vitals/config/
//! - Linux: ~/.config/vitals/
//!
//! ```toml
//! [store]
//! path = "patients.json"
//!
//! [feed]
//! candidates = ["vitalsign_output.txt", "simulator_output.txt"]
//! mode = "playback"
//! default_delay_ms = 1000
//!
//! [defaults]
//! temperature = "37.0"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use vitals_ingest::{MonitorMode, MonitorOptions};
use vitals_model::DEFAULT_FEED_TEMPERATURE;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "vitals-pipeline";
const APP_NAME: &str = "Vitals";
const CONFIG_FILENAME: &str = "settings.toml";

const FEED_FILENAME: &str = "vitalsign_output.txt";
const SIMULATOR_FILENAME: &str = "simulator_output.txt";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub feed: FeedSettings,
    pub defaults: DefaultSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// JSON record store.
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("patients.json"),
        }
    }
}

/// Feed playback mode as written in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    #[default]
    Playback,
    Tail,
}

impl From<FeedMode> for MonitorMode {
    fn from(mode: FeedMode) -> Self {
        match mode {
            FeedMode::Playback => Self::Playback,
            FeedMode::Tail => Self::Tail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Feed locations, tried in order.
    pub candidates: Vec<PathBuf>,
    pub mode: FeedMode,
    pub default_delay_ms: u64,
    pub tail_interval_ms: u64,
    pub stop_poll_ms: u64,
    pub channel_capacity: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        let mut candidates = vec![
            PathBuf::from(FEED_FILENAME),
            PathBuf::from(SIMULATOR_FILENAME),
        ];
        let documents = UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|dir| dir.join(FEED_FILENAME)));
        candidates.extend(documents);
        Self {
            candidates,
            mode: FeedMode::Playback,
            default_delay_ms: 1000,
            tail_interval_ms: 500,
            stop_poll_ms: 100,
            channel_capacity: 256,
        }
    }
}

impl FeedSettings {
    /// Worker options for these settings.
    pub fn monitor_options(&self, temperature: &str) -> MonitorOptions {
        MonitorOptions::default()
            .with_mode(self.mode.into())
            .with_default_delay(Duration::from_millis(self.default_delay_ms))
            .with_tail_interval(Duration::from_millis(self.tail_interval_ms))
            .with_stop_poll(Duration::from_millis(self.stop_poll_ms))
            .with_channel_capacity(self.channel_capacity)
            .with_temperature(temperature)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    /// Temperature attached to feed readings.
    pub temperature: String,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_FEED_TEMPERATURE.to_string(),
        }
    }
}

/// Platform settings file, if the platform has a configuration folder.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings.
///
/// An explicit path must exist and parse. The implicit platform file is
/// optional: when it is missing or unreadable the defaults are used.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        let settings = parse_settings(&content)
            .with_context(|| format!("parse settings file {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded settings");
        return Ok(settings);
    }

    let Some(path) = settings_path() else {
        tracing::warn!("could not determine settings path, using defaults");
        return Ok(Settings::default());
    };

    match fs::read_to_string(&path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                Ok(settings)
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "invalid settings file, using defaults"
                );
                Ok(Settings::default())
            }
        },
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no settings file found, using defaults");
            Ok(Settings::default())
        }
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                %error,
                "failed to read settings file, using defaults"
            );
            Ok(Settings::default())
        }
    }
}

pub fn parse_settings(content: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(content)
}

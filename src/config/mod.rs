//! Configuration: generator backend, notification timing, voice probe.
//!
//! User-level config: `~/.etlgen/config.yaml`
//! Project-level config: `.etlgen/config.yaml` (overrides user values)
//!
//! Resolution: defaults → user file → project file → CLI flags.
//! Missing files are fine; malformed files are an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::{voice, SessionOptions};
use crate::generation::{GenerationClient, HttpClient, SimulatedClient};
use crate::notify::NotificationTiming;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("generation backend 'http' requires generation.base_url")]
    MissingBaseUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Simulated,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: Backend,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Simulated,
            latency_ms: 2000,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub ttl_ms: u64,
    pub exit_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 5000,
            exit_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VoiceConfig {
    /// Speech recognizer command probed on `PATH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognizer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub notifications: NotificationConfig,
    pub voice: VoiceConfig,
}

/// Same shape as `AppConfig` but every field optional, so a file only
/// overrides what it mentions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialConfig {
    generation: PartialGeneration,
    notifications: PartialNotifications,
    voice: PartialVoice,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialGeneration {
    backend: Option<Backend>,
    latency_ms: Option<u64>,
    base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialNotifications {
    ttl_ms: Option<u64>,
    exit_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialVoice {
    recognizer: Option<String>,
}

/// Path to `~/.etlgen/`.
fn dirs_path() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|p| PathBuf::from(p).join(".etlgen"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".etlgen"))
    }
}

/// Path to the user-level config file.
pub fn user_config_path() -> Option<PathBuf> {
    dirs_path().map(|p| p.join("config.yaml"))
}

/// Path to the project-level config file.
pub fn project_config_path() -> PathBuf {
    PathBuf::from(".etlgen").join("config.yaml")
}

impl AppConfig {
    /// Load user then project config.
    pub fn load() -> Result<Self, ConfigError> {
        let mut paths = Vec::new();
        if let Some(user) = user_config_path() {
            paths.push(user);
        }
        paths.push(project_config_path());
        Self::load_layered(&paths)
    }

    /// Load an explicit file on top of the defaults. The file must exist.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let partial = read_partial(path)?.ok_or_else(|| ConfigError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })?;
        config.merge(partial);
        Ok(config)
    }

    /// Apply each existing file in order; later files win.
    pub fn load_layered(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for path in paths {
            if let Some(partial) = read_partial(path)? {
                config.merge(partial);
            }
        }
        Ok(config)
    }

    /// Parse a YAML document on top of the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let partial: PartialConfig = parse_partial(yaml)?;
        let mut config = Self::default();
        config.merge(partial);
        Ok(config)
    }

    fn merge(&mut self, partial: PartialConfig) {
        let g = partial.generation;
        if let Some(backend) = g.backend {
            self.generation.backend = backend;
        }
        if let Some(latency) = g.latency_ms {
            self.generation.latency_ms = latency;
        }
        if g.base_url.is_some() {
            self.generation.base_url = g.base_url;
        }
        let n = partial.notifications;
        if let Some(ttl) = n.ttl_ms {
            self.notifications.ttl_ms = ttl;
        }
        if let Some(exit) = n.exit_ms {
            self.notifications.exit_ms = exit;
        }
        if partial.voice.recognizer.is_some() {
            self.voice.recognizer = partial.voice.recognizer;
        }
    }

    /// Notification durations.
    pub fn timing(&self) -> NotificationTiming {
        NotificationTiming {
            ttl: Duration::from_millis(self.notifications.ttl_ms),
            exit: Duration::from_millis(self.notifications.exit_ms),
        }
    }

    /// Session options, probing the voice recognizer.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            timing: self.timing(),
            speech_available: voice::recognizer_available(self.voice.recognizer.as_deref()),
        }
    }

    /// Build the configured generation backend.
    pub fn build_client(&self) -> Result<Arc<dyn GenerationClient>, ConfigError> {
        match self.generation.backend {
            Backend::Simulated => Ok(Arc::new(SimulatedClient::new(Duration::from_millis(
                self.generation.latency_ms,
            )))),
            Backend::Http => {
                let base_url = self
                    .generation
                    .base_url
                    .as_deref()
                    .ok_or(ConfigError::MissingBaseUrl)?;
                Ok(Arc::new(HttpClient::new(base_url)))
            }
        }
    }

    /// Serialize for display (`etlgen config`).
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Empty documents parse as "no overrides".
fn parse_partial(yaml: &str) -> Result<PartialConfig, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(PartialConfig::default());
    }
    serde_yaml::from_str(yaml)
}

fn read_partial(path: &Path) -> Result<Option<PartialConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_partial(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

//! TOML-based configuration for remote-bridge.
//!
//! The config file is optional. When `--config` is not given, the bridge
//! looks for it at:
//! - `$XDG_CONFIG_HOME/remote-bridge/config.toml`, or
//! - `~/.config/remote-bridge/config.toml`
//!
//! and falls back to built-in defaults if neither exists.
//!
//! ```toml
//! [device]
//! path = "/dev/input/event3"
//! on_short_read = "skip"
//!
//! [logging]
//! level = "info"
//! format = "text"
//!
//! [[keymap]]
//! code = 164
//! char = "p"
//! label = "Play/Pause"
//! ```
//!
//! # Serde default values
//!
//! Every section and field has a default, so an empty file is a valid config.
//! Leaving out `[[keymap]]` entirely selects the FiiO RM3 table; writing
//! `keymap = []` maps nothing.

use std::path::{Path, PathBuf};

use remote_bridge_core::keymap::{consumer, KeyMap, KeyMapError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::relay_events::ShortReadPolicy;
use crate::infrastructure::diagnostics::LogFormat;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML")]
    Parse(#[from] toml::de::Error),

    /// A `CODE=CHAR` mapping argument is malformed.
    #[error("invalid key mapping '{0}': expected CODE=CHAR with CODE in 0..=65535")]
    InvalidMapping(String),

    /// The key map entries do not form a valid [`KeyMap`].
    #[error(transparent)]
    KeyMap(#[from] KeyMapError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_keymap")]
    pub keymap: Vec<KeyMapEntry>,
}

/// Which device to read and how to treat short reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Path of the evdev node for the remote.
    #[serde(default = "default_device_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub on_short_read: ShortReadPolicy,
}

/// Diagnostics channel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"remote_bridge=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// One key code to character mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyMapEntry {
    pub code: u16,
    /// Must be exactly one character; checked by [`BridgeConfig::key_map`].
    #[serde(rename = "char")]
    pub ch: String,
    /// Display name for the startup banner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_device_path() -> PathBuf {
    PathBuf::from("/dev/input/event3")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_keymap() -> Vec<KeyMapEntry> {
    KeyMap::fiio_rm3()
        .iter()
        .map(|(code, ch)| KeyMapEntry {
            code,
            ch: ch.to_string(),
            label: consumer::key_label(code).map(str::to_string),
        })
        .collect()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            logging: LoggingConfig::default(),
            keymap: default_keymap(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: default_device_path(),
            on_short_read: ShortReadPolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl BridgeConfig {
    /// Validates the `[[keymap]]` entries and builds the immutable [`KeyMap`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KeyMap`] for a value that is not one character
    /// or a code that appears twice.
    pub fn key_map(&self) -> Result<KeyMap, ConfigError> {
        let entries = self.keymap.iter().map(|e| (e.code, e.ch.as_str()));
        Ok(KeyMap::from_text(entries)?)
    }

    /// The configured banner label for `code`, if any.
    pub fn label_for(&self, code: u16) -> Option<String> {
        self.keymap
            .iter()
            .find(|e| e.code == code)
            .and_then(|e| e.label.clone())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses a `CODE=CHAR` argument such as `164=p`.
///
/// Only the first `=` separates code from character, so `61==` maps code 61
/// to `=`. The character itself is validated later by
/// [`BridgeConfig::key_map`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidMapping`] if there is no `=` or the code is
/// not a `u16`.
pub fn parse_mapping_arg(arg: &str) -> Result<KeyMapEntry, ConfigError> {
    let (code, ch) = arg
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidMapping(arg.to_string()))?;
    let code = code
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidMapping(arg.to_string()))?;
    Ok(KeyMapEntry {
        code,
        ch: ch.to_string(),
        label: None,
    })
}

/// Resolves the default config file path from the environment.
///
/// Returns `None` when neither `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("remote-bridge").join("config.toml"))
}

/// Loads a config from `path`. The file must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Loads the effective config.
///
/// An explicit path must exist. Without one, the default location is used if
/// a file is there, otherwise [`BridgeConfig::default()`] is returned.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config(explicit: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let Some(path) = default_config_path() else {
        return Ok(BridgeConfig::default());
    };
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BridgeConfig::default()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

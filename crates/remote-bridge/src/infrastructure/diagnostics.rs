//! Diagnostics channel setup.
//!
//! Banner and per-button notices go through `tracing` to **stderr**; fatal
//! errors are printed there directly. Stdout is reserved for mapped characters and must
//! never see a log line, so the subscriber is always built with an explicit
//! stderr writer.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the configured
//! level (default `info`). A filter that names no usable level falls back to
//! `info` with a warning.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use remote_bridge_core::keymap::consumer::key_label;
use remote_bridge_core::KeyMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt as fmt_layer, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Output format of the diagnostics stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Text,
    /// One JSON object per line, for log collectors.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Parses a filter directive string such as `debug` or
/// `remote_bridge=trace,info`.
///
/// Every bare word must be a level (`off`, `error` .. `trace`). `EnvFilter`
/// itself would read an unknown bare word as a target name and silence
/// everything else.
///
/// # Errors
///
/// Returns a description of the first directive that is not usable.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, String> {
    for directive in directives.split(',').map(str::trim) {
        if directive.is_empty() || directive.contains('=') || directive.contains('[') {
            continue;
        }
        directive
            .parse::<LevelFilter>()
            .map_err(|_| format!("'{directive}' is not a log level"))?;
    }
    EnvFilter::try_new(directives).map_err(|err| err.to_string())
}

/// Picks the filter: `RUST_LOG` when set, otherwise `level`.
///
/// An unusable filter falls back to `info`; the second value then carries
/// the warning to log once the subscriber is up.
fn select_filter(level: &str) -> (EnvFilter, Option<String>) {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());
    let directives = from_env.as_deref().unwrap_or(level);

    match parse_filter(directives) {
        Ok(filter) => (filter, None),
        Err(reason) => (
            EnvFilter::new("info"),
            Some(format!("ignoring log filter \"{directives}\" ({reason}), using info")),
        ),
    }
}

/// Installs the stderr subscriber once for the process.
///
/// Later calls are no-ops, so tests may call this freely.
pub fn init_tracing(level: &str, format: LogFormat) {
    TRACING_INIT.get_or_init(|| {
        let (env_filter, rejected) = select_filter(level);

        let result = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer::layer().json().with_writer(std::io::stderr))
                .try_init(),
            LogFormat::Text => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer::layer().compact().with_writer(std::io::stderr))
                .try_init(),
        };

        match result {
            Ok(()) => {
                if let Some(warning) = rejected {
                    warn!("{warning}");
                }
            }
            Err(err) => eprintln!("tracing init skipped: {err}"),
        }
    });
}

/// Reports a fatal error on stderr.
///
/// Bypasses `tracing`, so the message is printed under any log filter,
/// including `off`.
pub fn report_fatal(err: &anyhow::Error) {
    eprintln!("Error: {err:#}");
}

/// Builds the startup banner lines.
///
/// `label_for` supplies a display name per key code; codes without one fall
/// back to the consumer key table, then to `"Key"`.
pub fn banner_lines<F>(device: &Path, key_map: &KeyMap, label_for: F) -> Vec<String>
where
    F: Fn(u16) -> Option<String>,
{
    let mut lines = vec![
        "Remote bridge starting...".to_string(),
        format!("Reading from: {}", device.display()),
        "Key mappings:".to_string(),
    ];

    if key_map.is_empty() {
        lines.push("  (none; every button press will be ignored)".to_string());
    }
    for (code, ch) in key_map.iter() {
        let label = label_for(code)
            .or_else(|| key_label(code).map(str::to_string))
            .unwrap_or_else(|| "Key".to_string());
        lines.push(format!("  {label} ({code}) -> \"{ch}\""));
    }

    lines.push(String::new());
    lines.push("Waiting for button presses...".to_string());
    lines
}

/// Logs the startup banner at `info`.
pub fn log_startup_banner<F>(device: &Path, key_map: &KeyMap, label_for: F)
where
    F: Fn(u16) -> Option<String>,
{
    for line in banner_lines(device, key_map, label_for) {
        info!("{line}");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

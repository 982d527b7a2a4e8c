//! remote-bridge entry point.
//!
//! Reads button presses from a media remote's input device and writes one
//! character per press to stdout, for a separate listener process to consume.
//!
//! # Usage
//!
//! ```text
//! remote-bridge [OPTIONS]
//!
//! Options:
//!   --device <PATH>            Input device to read [default: /dev/input/event3]
//!   --config <PATH>            Config file [default: ~/.config/remote-bridge/config.toml]
//!   --map <CODE=CHAR>          Key mapping; repeat to map several keys
//!   --on-short-read <POLICY>   skip | fail [default: skip]
//!   --log-level <FILTER>       tracing filter [default: info]
//!   --log-format <FORMAT>      text | json [default: text]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable               | Description                        |
//! |------------------------|------------------------------------|
//! | `REMOTE_BRIDGE_DEVICE` | Same as `--device`                 |
//! | `REMOTE_BRIDGE_CONFIG` | Same as `--config`                 |
//! | `RUST_LOG`             | Overrides the configured log level |
//!
//! Precedence: CLI flag, then environment variable, then config file, then
//! built-in default.
//!
//! # Exit status
//!
//! The relay loop never finishes on its own. Any failure to open or read the
//! device, or to write stdout, is reported on stderr and the process exits
//! with status 1 so a supervisor can restart it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use remote_bridge::application::relay_events::{EventRelay, ShortReadPolicy};
use remote_bridge::infrastructure::device::EventDevice;
use remote_bridge::infrastructure::diagnostics::{
    init_tracing, log_startup_banner, report_fatal, LogFormat,
};
use remote_bridge::infrastructure::storage::config::{
    load_config, parse_mapping_arg, BridgeConfig, KeyMapEntry,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Media remote to stdout character bridge.
#[derive(Debug, Parser)]
#[command(
    name = "remote-bridge",
    about = "Relays media-remote button presses from a Linux input device to stdout",
    version
)]
struct Cli {
    /// Input event device to read, e.g. /dev/input/event3.
    #[arg(long, env = "REMOTE_BRIDGE_DEVICE")]
    device: Option<PathBuf>,

    /// Config file to load instead of the default location.
    #[arg(long, env = "REMOTE_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Key mapping as CODE=CHAR, e.g. `--map 164=p`.
    ///
    /// When given at least once, replaces the configured key map entirely.
    #[arg(long = "map", value_name = "CODE=CHAR", value_parser = parse_mapping_arg)]
    map: Vec<KeyMapEntry>,

    /// What to do with reads shorter than one record: skip or fail.
    #[arg(long, value_name = "POLICY")]
    on_short_read: Option<ShortReadPolicy>,

    /// tracing filter directive for stderr diagnostics.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Diagnostics format: text or json.
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

impl Cli {
    /// Loads the config file and applies CLI overrides on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    fn into_bridge_config(self) -> anyhow::Result<BridgeConfig> {
        let mut config = load_config(self.config.as_deref()).context("failed to load config")?;

        if let Some(device) = self.device {
            config.device.path = device;
        }
        if let Some(policy) = self.on_short_read {
            config.device.on_short_read = policy;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if !self.map.is_empty() {
            config.keymap = self.map;
        }

        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

/// Builds the relay and runs it until the device fails or ends.
///
/// Only returns `Ok` if nothing fails, which a real device never allows.
fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_bridge_config()?;

    init_tracing(&config.logging.level, config.logging.format);

    let key_map = config.key_map().context("invalid key map")?;
    log_startup_banner(&config.device.path, &key_map, |code| config.label_for(code));

    let mut device = EventDevice::open(&config.device.path)?;

    let stdout = std::io::stdout().lock();
    let mut relay =
        EventRelay::new(key_map, stdout).with_short_read_policy(config.device.on_short_read);

    let stats = relay.run(&mut device)?;
    info!(
        "relayed {} of {} records before the stream ended",
        stats.emitted, stats.records_read
    );
    anyhow::bail!("device stream ended: {}", config.device.path.display())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["remote-bridge"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_cli_defaults_are_all_unset() {
        let cli = Cli::parse_from(["remote-bridge", "--config", "/dev/null"]);
        assert_eq!(cli.device, None);
        assert!(cli.map.is_empty());
        assert_eq!(cli.on_short_read, None);
        assert_eq!(cli.log_format, None);
    }

    #[test]
    fn test_cli_device_overrides_config() {
        let config = parse(&["--config", "/dev/null", "--device", "/dev/input/event9"])
            .into_bridge_config()
            .expect("empty config file is valid");

        assert_eq!(config.device.path, PathBuf::from("/dev/input/event9"));
    }

    #[test]
    fn test_cli_map_replaces_key_map() {
        let config = parse(&["--config", "/dev/null", "--map", "115=+", "--map", "114=-"])
            .into_bridge_config()
            .unwrap();

        let map = config.key_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(115), Some('+'));
        assert_eq!(map.get(164), None);
    }

    #[test]
    fn test_cli_rejects_malformed_map() {
        let result = Cli::try_parse_from(["remote-bridge", "--map", "play=p"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_short_read_and_log_format() {
        let config = parse(&[
            "--config",
            "/dev/null",
            "--on-short-read",
            "fail",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])
        .into_bridge_config()
        .unwrap();

        assert_eq!(config.device.on_short_read, ShortReadPolicy::Fail);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = parse(&["--config", "/nonexistent/remote-bridge.toml"]).into_bridge_config();
        assert!(result.is_err());
    }
}

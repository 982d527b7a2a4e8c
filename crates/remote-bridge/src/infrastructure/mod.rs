//! Infrastructure layer for remote-bridge.
//!
//! Contains OS-facing adapters: the event device reader, the TOML config
//! file, and the stderr diagnostics setup.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `remote_bridge_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`device`** – `EventDevice`, the `RecordSource` backed by a file such as
//!   `/dev/input/event3`, plus `ScriptedSource` for tests.
//!
//! - **`storage`** – Loads `config.toml` (device path, short-read policy,
//!   logging, key map) and applies defaults for anything missing.
//!
//! - **`diagnostics`** – Installs the `tracing` subscriber on stderr and prints
//!   the startup banner.

pub mod device;
pub mod diagnostics;
pub mod storage;

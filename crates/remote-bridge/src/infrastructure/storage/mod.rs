//! Persistent storage infrastructure.
//!
//! - **`config`** – Reads `config.toml` and resolves the effective key map.

pub mod config;

//! remote-bridge library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does remote-bridge do? (for beginners)
//!
//! A media remote such as the FiiO RM3 shows up on Linux as an input device,
//! `/dev/input/eventN`. Every button press makes the kernel hand out a few
//! 24-byte `input_event` records on that file. remote-bridge:
//!
//! 1. Opens the device file and reads it one record at a time.
//! 2. Decodes each record into (type, code, value).
//! 3. Keeps only key presses (`EV_KEY` with value 1).
//! 4. Looks the key code up in a fixed table (Play/Pause -> `p`, ...).
//! 5. Writes the character to stdout for whatever program is listening.
//!
//! Everything human-readable goes to stderr, so stdout carries nothing but
//! the mapped characters.

/// Application layer: the relay use case and the record source it reads from.
pub mod application;

/// Infrastructure layer: device files, configuration, and diagnostics.
pub mod infrastructure;

//! # remote-bridge-core
//!
//! Shared library for remote-bridge containing the Linux input event record
//! layout, the record decoder, and the key-code-to-character tables.
//!
//! This crate has no dependencies on device files, terminals, or processes;
//! everything here operates on byte slices and plain values so it can be
//! tested on any platform.
//!
//! # Architecture overview (for beginners)
//!
//! remote-bridge turns button presses on a media remote (the reference device
//! is a FiiO RM3) into single characters on standard output, so a separate
//! program can react to them as if they had been typed.
//!
//! - **`event`** – How bytes from `/dev/input/eventN` become typed values.
//!   The kernel hands out fixed 24-byte records; the decoder pulls the event
//!   type, key code, and key value out of fixed little-endian offsets.
//!
//! - **`keymap`** – The immutable table from key code to output character,
//!   plus the named consumer-control key codes a media remote sends.

pub mod event;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `remote_bridge_core::KeyMap` instead of `remote_bridge_core::keymap::KeyMap`.
pub use event::record::{decode_record, encode_record, RawRecord, RecordError, RECORD_SIZE};
pub use event::types::{InputEvent, KeyState, EV_KEY, EV_MSC, EV_SYN};
pub use keymap::{KeyMap, KeyMapError};

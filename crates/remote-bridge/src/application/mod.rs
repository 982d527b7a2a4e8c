//! Application layer use cases for remote-bridge.
//!
//! - **`relay_events`** – Reads records from a `RecordSource`, filters them
//!   down to key presses, and writes the mapped character for each one. The
//!   source is injected at construction time, so the same loop runs against
//!   a real device file or a scripted source in tests.

pub mod relay_events;

//! RelayEventsUseCase: turns device records into characters on the data stream.
//!
//! This use case sits at the application layer and reads from a
//! [`RecordSource`] trait object. The device-file implementation lives in the
//! infrastructure layer; tests drive the relay with scripted or mocked sources.
//!
//! # Per-read policy
//!
//! ```text
//! read ──► Short(len)    ──► ShortReadPolicy (skip by default)
//!      ──► Full(record)  ──► decode ──► EV_KEY && value == 1 ? ──► KeyMap ──► write + flush
//!      ──► EndOfStream   ──► run() returns
//! ```
//!
//! Nothing is buffered between reads: a short read is never stitched
//! together with the next one.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use remote_bridge_core::event::record::decode_raw;
use remote_bridge_core::{KeyMap, KeyState, RawRecord, RECORD_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Error type for relay operations. Every variant is fatal to the process.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The device could not be opened for reading.
    #[error("failed to open device {path}")]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A read call on the device failed.
    #[error("failed to read from device")]
    DeviceRead {
        #[source]
        source: io::Error,
    },

    /// A short read under [`ShortReadPolicy::Fail`].
    #[error("short read of {len} bytes from device (expected {})", RECORD_SIZE)]
    ShortRead { len: usize },

    /// Writing or flushing the data stream failed.
    #[error("failed to write to output stream")]
    Output {
        #[source]
        source: io::Error,
    },
}

// ── Record source ─────────────────────────────────────────────────────────────

/// Result of one blocking read on a [`RecordSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRead {
    /// Exactly [`RECORD_SIZE`] bytes arrived.
    Full(RawRecord),
    /// Between 1 and `RECORD_SIZE - 1` bytes arrived. The bytes are dropped.
    Short(usize),
    /// The source has nothing more to give.
    EndOfStream,
}

/// A blocking producer of fixed-size device records.
///
/// The sequence is lazy and cannot be restarted; each call blocks until the
/// next read completes.
#[cfg_attr(test, mockall::automock)]
pub trait RecordSource {
    /// Performs one read of up to [`RECORD_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the read itself fails.
    fn read_record(&mut self) -> io::Result<RecordRead>;
}

// ── Short-read policy ─────────────────────────────────────────────────────────

/// What to do when a read returns fewer than [`RECORD_SIZE`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortReadPolicy {
    /// Drop the partial bytes and read again.
    #[default]
    Skip,
    /// Treat the short read as a fatal read error.
    Fail,
}

impl FromStr for ShortReadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(ShortReadPolicy::Skip),
            "fail" => Ok(ShortReadPolicy::Fail),
            other => Err(format!("unknown short-read policy '{other}' (expected skip or fail)")),
        }
    }
}

impl fmt::Display for ShortReadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortReadPolicy::Skip => f.write_str("skip"),
            ShortReadPolicy::Fail => f.write_str("fail"),
        }
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Why a full record produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `type` was not `EV_KEY`.
    NotKeyEvent,
    /// `EV_KEY`, but a release, autorepeat, or undefined value.
    NotPress(KeyState),
    /// A key press whose code is not in the key map.
    Unmapped(u16),
}

/// What a single read led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// A character was written and flushed to the data stream.
    Emitted { code: u16, ch: char },
    /// A full record was decoded and dropped.
    Ignored(IgnoreReason),
    /// A short read was dropped under [`ShortReadPolicy::Skip`].
    ShortReadSkipped { len: usize },
}

/// Counters accumulated over the life of a relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub records_read: u64,
    pub emitted: u64,
    pub ignored: u64,
    pub short_reads: u64,
}

// ── Use case ──────────────────────────────────────────────────────────────────

/// The Relay Events use case.
///
/// Owns the key map and the data stream. Diagnostics never go to `output`;
/// they go through `tracing`, which the binary points at stderr.
pub struct EventRelay<W> {
    key_map: KeyMap,
    output: W,
    short_read_policy: ShortReadPolicy,
    stats: RelayStats,
}

impl<W: Write> EventRelay<W> {
    /// Creates a relay writing mapped characters to `output`.
    pub fn new(key_map: KeyMap, output: W) -> Self {
        Self {
            key_map,
            output,
            short_read_policy: ShortReadPolicy::default(),
            stats: RelayStats::default(),
        }
    }

    /// Replaces the short-read policy.
    pub fn with_short_read_policy(mut self, policy: ShortReadPolicy) -> Self {
        self.short_read_policy = policy;
        self
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    pub fn short_read_policy(&self) -> ShortReadPolicy {
        self.short_read_policy
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Consumes the relay and hands back the data stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads from `source` until it reports end of stream.
    ///
    /// A device never ends, so in production this only returns on error.
    ///
    /// # Errors
    ///
    /// Returns the first [`RelayError`]; nothing is retried.
    pub fn run<S>(&mut self, source: &mut S) -> Result<RelayStats, RelayError>
    where
        S: RecordSource + ?Sized,
    {
        while self.step(source)?.is_some() {}
        debug!(
            "record source ended after {} records, {} characters emitted",
            self.stats.records_read, self.stats.emitted
        );
        Ok(self.stats)
    }

    /// Performs one blocking read and handles its result.
    ///
    /// Returns `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::DeviceRead`] if the read fails, plus anything
    /// [`Self::handle_record`] or [`Self::handle_short_read`] return.
    pub fn step<S>(&mut self, source: &mut S) -> Result<Option<RelayOutcome>, RelayError>
    where
        S: RecordSource + ?Sized,
    {
        let read = source
            .read_record()
            .map_err(|source| RelayError::DeviceRead { source })?;

        match read {
            RecordRead::Full(raw) => self.handle_record(&raw).map(Some),
            RecordRead::Short(len) => self.handle_short_read(len).map(Some),
            RecordRead::EndOfStream => Ok(None),
        }
    }

    /// Decodes one full record and emits its character if it qualifies.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Output`] if the data stream rejects the write.
    pub fn handle_record(&mut self, raw: &RawRecord) -> Result<RelayOutcome, RelayError> {
        self.stats.records_read += 1;
        let event = decode_raw(raw);

        let reason = if !event.is_key_event() {
            IgnoreReason::NotKeyEvent
        } else {
            match event.key_state() {
                KeyState::Pressed => match self.key_map.get(event.code) {
                    Some(ch) => {
                        self.emit(ch)?;
                        self.stats.emitted += 1;
                        info!("Button pressed: {} -> \"{ch}\"", event.code);
                        return Ok(RelayOutcome::Emitted {
                            code: event.code,
                            ch,
                        });
                    }
                    None => IgnoreReason::Unmapped(event.code),
                },
                state => IgnoreReason::NotPress(state),
            }
        };

        trace!(?event, ?reason, "record ignored");
        self.stats.ignored += 1;
        Ok(RelayOutcome::Ignored(reason))
    }

    /// Applies the short-read policy to a read of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ShortRead`] under [`ShortReadPolicy::Fail`].
    pub fn handle_short_read(&mut self, len: usize) -> Result<RelayOutcome, RelayError> {
        match self.short_read_policy {
            ShortReadPolicy::Skip => {
                self.stats.short_reads += 1;
                debug!("discarding short read of {len} bytes");
                Ok(RelayOutcome::ShortReadSkipped { len })
            }
            ShortReadPolicy::Fail => Err(RelayError::ShortRead { len }),
        }
    }

    /// Writes `ch` and flushes so the consumer sees it before the next read blocks.
    fn emit(&mut self, ch: char) -> Result<(), RelayError> {
        let mut buf = [0u8; 4];
        self.output
            .write_all(ch.encode_utf8(&mut buf).as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(|source| RelayError::Output { source })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

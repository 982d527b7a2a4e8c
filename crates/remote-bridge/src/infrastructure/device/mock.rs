//! Scripted record source for tests.
//!
//! Allows tests to play back a fixed sequence of device reads (whole records,
//! short reads, read errors) without opening any file. Once the script is
//! used up the source reports end of stream, so `EventRelay::run` returns.
//!
//! ```ignore
//! let mut source = ScriptedSource::new().press(164).release(164).short(8);
//! let mut relay = EventRelay::new(KeyMap::fiio_rm3(), Vec::new());
//! relay.run(&mut source).unwrap();
//! assert_eq!(relay.into_output(), b"p");
//! ```

use std::collections::VecDeque;
use std::io;

use remote_bridge_core::{encode_record, InputEvent, RawRecord, EV_SYN};

use crate::application::relay_events::{RecordRead, RecordSource};

/// One scripted read.
#[derive(Debug)]
enum Step {
    Read(RecordRead),
    Fail(io::ErrorKind, String),
}

/// A [`RecordSource`] that replays a prepared script.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    reads: usize,
    timestamp_us: u64,
}

impl ScriptedSource {
    /// Creates an empty script. Reading from it yields end of stream at once.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a full record carrying `event`.
    pub fn event(mut self, event: InputEvent) -> Self {
        // Advance the fake clock so records are distinguishable in hex dumps.
        self.timestamp_us += 1_000;
        let raw = encode_record(&event, self.timestamp_us);
        self.steps.push_back(Step::Read(RecordRead::Full(raw)));
        self
    }

    /// Appends a full record given as raw bytes.
    pub fn raw(mut self, raw: RawRecord) -> Self {
        self.steps.push_back(Step::Read(RecordRead::Full(raw)));
        self
    }

    /// Appends a key press of `code`, followed by `SYN_REPORT` as the kernel sends it.
    pub fn press(self, code: u16) -> Self {
        self.event(InputEvent::key(code, 1)).syn()
    }

    /// Appends a key release of `code`, followed by `SYN_REPORT`.
    pub fn release(self, code: u16) -> Self {
        self.event(InputEvent::key(code, 0)).syn()
    }

    /// Appends an autorepeat of `code`, followed by `SYN_REPORT`.
    pub fn repeat(self, code: u16) -> Self {
        self.event(InputEvent::key(code, 2)).syn()
    }

    /// Appends a `SYN_REPORT` record.
    pub fn syn(self) -> Self {
        self.event(InputEvent::new(EV_SYN, 0, 0))
    }

    /// Appends a read that returned only `len` bytes.
    pub fn short(mut self, len: usize) -> Self {
        self.steps.push_back(Step::Read(RecordRead::Short(len)));
        self
    }

    /// Appends a read that fails with `kind`.
    pub fn error(mut self, kind: io::ErrorKind, message: impl Into<String>) -> Self {
        self.steps.push_back(Step::Fail(kind, message.into()));
        self
    }

    /// Number of reads performed so far, including the final end-of-stream read.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Number of scripted reads not yet consumed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl RecordSource for ScriptedSource {
    fn read_record(&mut self) -> io::Result<RecordRead> {
        self.reads += 1;
        match self.steps.pop_front() {
            Some(Step::Read(read)) => Ok(read),
            Some(Step::Fail(kind, message)) => Err(io::Error::new(kind, message)),
            None => Ok(RecordRead::EndOfStream),
        }
    }
}

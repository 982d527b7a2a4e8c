//! Event device infrastructure.
//!
//! [`EventDevice`] reads a Linux evdev character device (`/dev/input/eventN`).
//! The kernel hands out whole `input_event` records per `read`, so a single
//! `read` into a 24-byte buffer normally yields exactly one record.
//!
//! # One read, one verdict
//!
//! Each call to [`RecordSource::read_record`] performs one `read`:
//!
//! | Bytes returned | Result                          |
//! |----------------|---------------------------------|
//! | 24             | `RecordRead::Full`              |
//! | 1..=23         | `RecordRead::Short` (discarded) |
//! | 0              | `RecordRead::EndOfStream`       |
//!
//! A read interrupted by a signal (`EINTR`) is restarted; every other error
//! is returned to the caller.
//!
//! # Testability
//!
//! [`EventDevice`] is generic over any [`Read`], and [`mock::ScriptedSource`]
//! lets tests feed the relay without any file at all.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use remote_bridge_core::{RawRecord, RECORD_SIZE};
use tracing::debug;

use crate::application::relay_events::{RecordRead, RecordSource, RelayError};

pub mod mock;

/// A [`RecordSource`] reading fixed-size records from a byte stream.
pub struct EventDevice<R = File> {
    path: PathBuf,
    reader: R,
}

impl EventDevice<File> {
    /// Opens the device at `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::DeviceOpen`] if the path does not exist, cannot
    /// be opened, or is a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RelayError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| RelayError::DeviceOpen {
            path: path.clone(),
            source,
        };

        let file = File::open(&path).map_err(open_error)?;
        let metadata = file.metadata().map_err(open_error)?;
        if metadata.is_dir() {
            return Err(open_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "is a directory, not a readable byte source",
            )));
        }

        debug!("opened event device {}", path.display());
        Ok(Self { path, reader: file })
    }
}

impl<R: Read> EventDevice<R> {
    /// Wraps an already-open reader. `path` is only used in diagnostics.
    pub fn from_reader(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            reader,
        }
    }

    /// The path this device was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Read> RecordSource for EventDevice<R> {
    fn read_record(&mut self) -> io::Result<RecordRead> {
        let mut buf: RawRecord = [0u8; RECORD_SIZE];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(RecordRead::EndOfStream),
                Ok(RECORD_SIZE) => return Ok(RecordRead::Full(buf)),
                Ok(len) => return Ok(RecordRead::Short(len)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;
    use remote_bridge_core::{encode_record, InputEvent};

    /// A reader that hands out pre-sized chunks, one per `read` call.
    struct Chunked {
        chunks: Vec<io::Result<Vec<u8>>>,
    }

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks.remove(0)?;
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_open_nonexistent_path_is_device_open_error() {
        let result = EventDevice::open("/nonexistent/input/event99");

        match result {
            Err(RelayError::DeviceOpen { path, source }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/input/event99"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            Err(other) => panic!("expected DeviceOpen, got {other:?}"),
            Ok(_) => panic!("expected DeviceOpen, got a device"),
        }
    }

    #[test]
    fn test_open_directory_is_device_open_error() {
        let dir = tempfile::tempdir().expect("tempdir");

        let result = EventDevice::open(dir.path());

        assert!(matches!(result, Err(RelayError::DeviceOpen { .. })));
    }

    #[test]
    fn test_open_regular_file_and_read_records() {
        // Arrange: two whole records in a regular file
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&encode_record(&InputEvent::key(164, 1), 0)).unwrap();
        file.write_all(&encode_record(&InputEvent::key(164, 0), 0)).unwrap();
        file.flush().unwrap();

        // Act
        let mut device = EventDevice::open(file.path()).expect("open temp file");

        // Assert
        assert_eq!(device.path(), file.path());
        assert!(matches!(device.read_record().unwrap(), RecordRead::Full(_)));
        assert!(matches!(device.read_record().unwrap(), RecordRead::Full(_)));
        assert_eq!(device.read_record().unwrap(), RecordRead::EndOfStream);
    }

    #[test]
    fn test_trailing_partial_record_is_a_short_read() {
        let mut bytes = encode_record(&InputEvent::key(163, 1), 0).to_vec();
        bytes.extend_from_slice(&[0u8; 10]);
        let mut device = EventDevice::from_reader("cursor", Cursor::new(bytes));

        assert!(matches!(device.read_record().unwrap(), RecordRead::Full(_)));
        assert_eq!(device.read_record().unwrap(), RecordRead::Short(10));
        assert_eq!(device.read_record().unwrap(), RecordRead::EndOfStream);
    }

    #[test]
    fn test_short_reads_are_not_reassembled() {
        // Arrange: one record split across two reads
        let raw = encode_record(&InputEvent::key(164, 1), 0);
        let reader = Chunked {
            chunks: vec![Ok(raw[..12].to_vec()), Ok(raw[12..].to_vec())],
        };
        let mut device = EventDevice::from_reader("split", reader);

        // Act / Assert: each half is reported as its own short read
        assert_eq!(device.read_record().unwrap(), RecordRead::Short(12));
        assert_eq!(device.read_record().unwrap(), RecordRead::Short(12));
    }

    #[test]
    fn test_interrupted_read_is_restarted() {
        let raw = encode_record(&InputEvent::key(165, 1), 0);
        let reader = Chunked {
            chunks: vec![
                Err(io::Error::new(io::ErrorKind::Interrupted, "EINTR")),
                Ok(raw.to_vec()),
            ],
        };
        let mut device = EventDevice::from_reader("eintr", reader);

        assert_eq!(device.read_record().unwrap(), RecordRead::Full(raw));
    }

    #[test]
    fn test_other_read_errors_are_returned() {
        let reader = Chunked {
            chunks: vec![Err(io::Error::new(io::ErrorKind::Other, "No such device"))],
        };
        let mut device = EventDevice::from_reader("gone", reader);

        let err = device.read_record().expect_err("read must fail");

        assert_eq!(err.to_string(), "No such device");
    }
}

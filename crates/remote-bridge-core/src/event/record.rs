//! Binary layout of a Linux `struct input_event` on 64-bit systems.
//!
//! Wire format:
//! ```text
//! [tv_sec:8][tv_usec:8][type:2][code:2][value:4]
//! ```
//! Total record size: 24 bytes. All multi-byte integers are little-endian.
//! The timestamp is read past and never interpreted.

use thiserror::Error;

use super::types::InputEvent;

/// Size of one record as delivered by a single `read` on an event device.
pub const RECORD_SIZE: usize = 24;

/// Byte offset of the `type` field.
pub const TYPE_OFFSET: usize = 16;
/// Byte offset of the `code` field.
pub const CODE_OFFSET: usize = 18;
/// Byte offset of the `value` field.
pub const VALUE_OFFSET: usize = 20;

/// One complete record, exactly as read from the device.
pub type RawRecord = [u8; RECORD_SIZE];

/// Errors that can occur while decoding a record from a byte slice.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The slice does not hold exactly one record.
    #[error("record must be exactly {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes a complete record into an [`InputEvent`].
///
/// # Examples
///
/// ```rust
/// use remote_bridge_core::event::record::{decode_raw, RECORD_SIZE};
///
/// let mut raw = [0u8; RECORD_SIZE];
/// raw[16] = 0x01; // EV_KEY
/// raw[18] = 0xA4; // KEY_PLAYPAUSE (164), low byte first
/// raw[20] = 0x01; // pressed
/// let event = decode_raw(&raw);
/// assert_eq!((event.event_type, event.code, event.value), (1, 164, 1));
/// ```
pub fn decode_raw(raw: &RawRecord) -> InputEvent {
    InputEvent {
        event_type: u16::from_le_bytes([raw[TYPE_OFFSET], raw[TYPE_OFFSET + 1]]),
        code: u16::from_le_bytes([raw[CODE_OFFSET], raw[CODE_OFFSET + 1]]),
        value: u32::from_le_bytes([
            raw[VALUE_OFFSET],
            raw[VALUE_OFFSET + 1],
            raw[VALUE_OFFSET + 2],
            raw[VALUE_OFFSET + 3],
        ]),
    }
}

/// Decodes a record from a byte slice.
///
/// Partial records are never decoded: anything other than exactly
/// [`RECORD_SIZE`] bytes is rejected.
///
/// # Errors
///
/// Returns [`RecordError::WrongLength`] if `bytes.len() != RECORD_SIZE`.
pub fn decode_record(bytes: &[u8]) -> Result<InputEvent, RecordError> {
    let raw: &RawRecord = bytes.try_into().map_err(|_| RecordError::WrongLength {
        expected: RECORD_SIZE,
        actual: bytes.len(),
    })?;
    Ok(decode_raw(raw))
}

/// Encodes an [`InputEvent`] into a record with the given timestamp.
///
/// The bridge itself never writes records; this exists for synthetic sources
/// and test fixtures that need byte-exact device output.
pub fn encode_record(event: &InputEvent, timestamp_us: u64) -> RawRecord {
    let mut raw = [0u8; RECORD_SIZE];

    let tv_sec = timestamp_us / 1_000_000;
    let tv_usec = timestamp_us % 1_000_000;
    raw[0..8].copy_from_slice(&tv_sec.to_le_bytes());
    raw[8..16].copy_from_slice(&tv_usec.to_le_bytes());
    raw[TYPE_OFFSET..CODE_OFFSET].copy_from_slice(&event.event_type.to_le_bytes());
    raw[CODE_OFFSET..VALUE_OFFSET].copy_from_slice(&event.code.to_le_bytes());
    raw[VALUE_OFFSET..RECORD_SIZE].copy_from_slice(&event.value.to_le_bytes());

    raw
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types::{EV_KEY, EV_SYN};

    #[test]
    fn test_record_size_is_24() {
        assert_eq!(RECORD_SIZE, 24);
        assert_eq!(VALUE_OFFSET + 4, RECORD_SIZE);
    }

    #[test]
    fn test_decode_reads_fields_at_fixed_offsets() {
        // Arrange
        let mut raw = [0u8; RECORD_SIZE];
        raw[16..18].copy_from_slice(&[0x01, 0x00]);
        raw[18..20].copy_from_slice(&[0xA3, 0x00]);
        raw[20..24].copy_from_slice(&[0x02, 0x00, 0x00, 0x00]);

        // Act
        let event = decode_raw(&raw);

        // Assert
        assert_eq!(event, InputEvent::new(EV_KEY, 163, 2));
    }

    #[test]
    fn test_code_field_is_little_endian() {
        let mut raw = [0u8; RECORD_SIZE];
        raw[18] = 0xA4;
        raw[19] = 0x00;

        let event = decode_raw(&raw);

        assert_eq!(event.code, 164, "must not be read as 0xA400");
    }

    #[test]
    fn test_value_field_uses_all_four_bytes() {
        let mut raw = [0u8; RECORD_SIZE];
        raw[20..24].copy_from_slice(&[0x01, 0x00, 0x00, 0x80]);

        let event = decode_raw(&raw);

        assert_eq!(event.value, 0x8000_0001);
    }

    #[test]
    fn test_timestamp_bytes_do_not_leak_into_fields() {
        // Arrange: all timestamp bytes set, event fields zero
        let mut raw = [0u8; RECORD_SIZE];
        raw[..16].fill(0xFF);

        // Act
        let event = decode_raw(&raw);

        // Assert
        assert_eq!(event, InputEvent::new(EV_SYN, 0, 0));
    }

    #[test]
    fn test_decode_record_rejects_short_slice() {
        let bytes = [0u8; 23];
        assert_eq!(
            decode_record(&bytes),
            Err(RecordError::WrongLength {
                expected: RECORD_SIZE,
                actual: 23
            })
        );
    }

    #[test]
    fn test_decode_record_rejects_long_slice() {
        let bytes = [0u8; 25];
        assert!(matches!(
            decode_record(&bytes),
            Err(RecordError::WrongLength { actual: 25, .. })
        ));
    }

    #[test]
    fn test_decode_record_rejects_empty_slice() {
        assert!(decode_record(&[]).is_err());
    }

    #[test]
    fn test_encode_places_timestamp_in_first_sixteen_bytes() {
        // Arrange
        let event = InputEvent::key(165, 1);

        // Act
        let raw = encode_record(&event, 3_000_250);

        // Assert
        assert_eq!(u64::from_le_bytes(raw[0..8].try_into().unwrap()), 3);
        assert_eq!(u64::from_le_bytes(raw[8..16].try_into().unwrap()), 250);
        assert_eq!(decode_raw(&raw), event);
    }
}

//! Linux input event records and their decoded form.

pub mod record;
pub mod types;

pub use record::{decode_record, encode_record, RawRecord, RecordError, RECORD_SIZE};
pub use types::{InputEvent, KeyState};

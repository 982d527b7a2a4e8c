//! Consumer-control key codes sent by media remotes.
//!
//! Values are the Linux `KEY_*` codes from `linux/input-event-codes.h`, which
//! is what the kernel reports in the `code` field of an `EV_KEY` record. A
//! Bluetooth or USB media remote such as the FiiO RM3 registers as a
//! "Consumer Control" device and only ever sends a handful of these.

/// `KEY_MUTE`
pub const KEY_MUTE: u16 = 113;
/// `KEY_VOLUMEDOWN`
pub const KEY_VOLUMEDOWN: u16 = 114;
/// `KEY_VOLUMEUP`
pub const KEY_VOLUMEUP: u16 = 115;
/// `KEY_NEXTSONG`
pub const KEY_NEXTSONG: u16 = 163;
/// `KEY_PLAYPAUSE`
pub const KEY_PLAYPAUSE: u16 = 164;
/// `KEY_PREVIOUSSONG`
pub const KEY_PREVIOUSSONG: u16 = 165;
/// `KEY_STOPCD`
pub const KEY_STOPCD: u16 = 166;

/// Returns a human-readable label for a consumer key code.
///
/// Used only for diagnostics; returns `None` for codes outside this table.
pub fn key_label(code: u16) -> Option<&'static str> {
    match code {
        KEY_MUTE => Some("Mute"),
        KEY_VOLUMEDOWN => Some("Volume Down"),
        KEY_VOLUMEUP => Some("Volume Up"),
        KEY_NEXTSONG => Some("Next"),
        KEY_PLAYPAUSE => Some("Play/Pause"),
        KEY_PREVIOUSSONG => Some("Previous"),
        KEY_STOPCD => Some("Stop"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_transport_codes_match_kernel_header() {
        assert_eq!(KEY_NEXTSONG, 163);
        assert_eq!(KEY_PLAYPAUSE, 164);
        assert_eq!(KEY_PREVIOUSSONG, 165);
    }

    #[test]
    fn test_key_label_known_codes() {
        assert_eq!(key_label(KEY_PLAYPAUSE), Some("Play/Pause"));
        assert_eq!(key_label(KEY_NEXTSONG), Some("Next"));
        assert_eq!(key_label(KEY_PREVIOUSSONG), Some("Previous"));
        assert_eq!(key_label(KEY_VOLUMEUP), Some("Volume Up"));
    }

    #[test]
    fn test_key_label_unknown_code_is_none() {
        assert_eq!(key_label(30), None); // KEY_A
        assert_eq!(key_label(999), None);
    }
}

//! Decoded input event values and the event-type constants they are filtered on.
//!
//! Constant values follow `linux/input-event-codes.h`.

// ── Event types ───────────────────────────────────────────────────────────────

/// Synchronization marker emitted after every batch of events.
pub const EV_SYN: u16 = 0x00;

/// Keyboard and button events. The only type the bridge acts on.
pub const EV_KEY: u16 = 0x01;

/// Miscellaneous events (e.g. `MSC_SCAN` scan codes sent alongside key events).
pub const EV_MSC: u16 = 0x04;

// ── Key state ─────────────────────────────────────────────────────────────────

/// Meaning of the `value` field of an [`EV_KEY`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// `0`: the key went up.
    Released,
    /// `1`: the key went down.
    Pressed,
    /// `2`: the key is held and the kernel is auto-repeating it.
    Repeated,
    /// Any value the kernel does not define for key events.
    Other(u32),
}

impl From<u32> for KeyState {
    fn from(value: u32) -> Self {
        match value {
            0 => KeyState::Released,
            1 => KeyState::Pressed,
            2 => KeyState::Repeated,
            other => KeyState::Other(other),
        }
    }
}

// ── Decoded event ─────────────────────────────────────────────────────────────

/// One input event pulled out of a 24-byte record.
///
/// The record timestamp is deliberately not carried: nothing downstream of the
/// decoder orders or times events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// Event type (`EV_KEY`, `EV_SYN`, ...).
    pub event_type: u16,
    /// Key or axis code, e.g. `164` for `KEY_PLAYPAUSE`.
    pub code: u16,
    /// For key events: 0 = release, 1 = press, 2 = autorepeat.
    pub value: u32,
}

impl InputEvent {
    /// Creates an event from its three fields.
    pub const fn new(event_type: u16, code: u16, value: u32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    /// Shorthand for an `EV_KEY` event with the given code and value.
    pub const fn key(code: u16, value: u32) -> Self {
        Self::new(EV_KEY, code, value)
    }

    /// Returns `true` if this is an `EV_KEY` event.
    pub fn is_key_event(&self) -> bool {
        self.event_type == EV_KEY
    }

    /// Interprets `value` as a key state.
    pub fn key_state(&self) -> KeyState {
        KeyState::from(self.value)
    }

    /// Returns `true` only for the key-down transition of an `EV_KEY` event.
    ///
    /// Releases and autorepeats are not presses.
    pub fn is_key_press(&self) -> bool {
        self.is_key_event() && self.key_state() == KeyState::Pressed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ev_key_constant_matches_kernel_header() {
        assert_eq!(EV_KEY, 0x01);
        assert_eq!(EV_SYN, 0x00);
        assert_eq!(EV_MSC, 0x04);
    }

    #[test]
    fn test_key_state_from_defined_values() {
        assert_eq!(KeyState::from(0), KeyState::Released);
        assert_eq!(KeyState::from(1), KeyState::Pressed);
        assert_eq!(KeyState::from(2), KeyState::Repeated);
    }

    #[test]
    fn test_key_state_from_undefined_value_is_other() {
        assert_eq!(KeyState::from(7), KeyState::Other(7));
        assert_eq!(KeyState::from(u32::MAX), KeyState::Other(u32::MAX));
    }

    #[test]
    fn test_is_key_press_requires_ev_key_and_value_one() {
        // Arrange
        let press = InputEvent::key(164, 1);
        let release = InputEvent::key(164, 0);
        let repeat = InputEvent::key(164, 2);
        let scan = InputEvent::new(EV_MSC, 4, 1);

        // Act / Assert
        assert!(press.is_key_press());
        assert!(!release.is_key_press());
        assert!(!repeat.is_key_press());
        assert!(!scan.is_key_press(), "value 1 on a non-key event is not a press");
    }

    #[test]
    fn test_syn_report_is_not_a_key_event() {
        let syn = InputEvent::new(EV_SYN, 0, 0);
        assert!(!syn.is_key_event());
    }
}

//! Key code to output character translation.
//!
//! A [`KeyMap`] is built once at startup and is read-only afterwards. The relay
//! owns it and consults it for every key press; there is no global table.

use std::collections::BTreeMap;

use thiserror::Error;

pub mod consumer;

use consumer::{KEY_NEXTSONG, KEY_PLAYPAUSE, KEY_PREVIOUSSONG};

/// Errors raised while building a [`KeyMap`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyMapError {
    /// The mapped value is not exactly one character.
    #[error("key code {code} must map to exactly one character, got {value:?}")]
    NotSingleChar { code: u16, value: String },

    /// The same key code was mapped twice.
    #[error("key code {0} is mapped more than once")]
    DuplicateCode(u16),
}

/// Immutable table from key code to the single character emitted for it.
///
/// Entries iterate in ascending key-code order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    entries: BTreeMap<u16, char>,
}

impl KeyMap {
    /// Builds a map from `(code, char)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::DuplicateCode`] if a code appears more than once.
    pub fn new<I>(entries: I) -> Result<Self, KeyMapError>
    where
        I: IntoIterator<Item = (u16, char)>,
    {
        let mut map = BTreeMap::new();
        for (code, ch) in entries {
            if map.insert(code, ch).is_some() {
                return Err(KeyMapError::DuplicateCode(code));
            }
        }
        Ok(Self { entries: map })
    }

    /// Builds a map from `(code, text)` pairs where each text must be a
    /// single character, as found in configuration files and CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::NotSingleChar`] for a value that is empty or
    /// longer than one character, and [`KeyMapError::DuplicateCode`] for a
    /// repeated code.
    pub fn from_text<I, S>(entries: I) -> Result<Self, KeyMapError>
    where
        I: IntoIterator<Item = (u16, S)>,
        S: AsRef<str>,
    {
        let parsed = entries
            .into_iter()
            .map(|(code, text)| parse_single_char(code, text.as_ref()).map(|ch| (code, ch)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    /// The FiiO RM3 table: Play/Pause -> `p`, Next -> `n`, Previous -> `b`.
    pub fn fiio_rm3() -> Self {
        let entries = BTreeMap::from([
            (KEY_NEXTSONG, 'n'),
            (KEY_PLAYPAUSE, 'p'),
            (KEY_PREVIOUSSONG, 'b'),
        ]);
        Self { entries }
    }

    /// Returns the character mapped to `code`, if any.
    pub fn get(&self, code: u16) -> Option<char> {
        self.entries.get(&code).copied()
    }

    /// Number of mapped codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no code is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(code, char)` in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, char)> + '_ {
        self.entries.iter().map(|(&code, &ch)| (code, ch))
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::fiio_rm3()
    }
}

/// Parses `text` as exactly one character.
///
/// # Errors
///
/// Returns [`KeyMapError::NotSingleChar`] if `text` has zero or several chars.
pub fn parse_single_char(code: u16, text: &str) -> Result<char, KeyMapError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(KeyMapError::NotSingleChar {
            code,
            value: text.to_string(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiio_rm3_table_has_three_entries() {
        let map = KeyMap::fiio_rm3();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(164), Some('p'));
        assert_eq!(map.get(163), Some('n'));
        assert_eq!(map.get(165), Some('b'));
    }

    #[test]
    fn test_default_is_fiio_rm3() {
        assert_eq!(KeyMap::default(), KeyMap::fiio_rm3());
    }

    #[test]
    fn test_unmapped_code_returns_none() {
        let map = KeyMap::fiio_rm3();
        assert_eq!(map.get(999), None);
        assert_eq!(map.get(0), None);
    }

    #[test]
    fn test_new_rejects_duplicate_code() {
        let result = KeyMap::new([(164, 'p'), (164, 'x')]);
        assert_eq!(result, Err(KeyMapError::DuplicateCode(164)));
    }

    #[test]
    fn test_iter_is_sorted_by_code() {
        // Arrange
        let map = KeyMap::new([(200, 'z'), (100, 'a'), (150, 'm')]).expect("valid map");

        // Act
        let codes: Vec<u16> = map.iter().map(|(code, _)| code).collect();

        // Assert
        assert_eq!(codes, vec![100, 150, 200]);
    }

    #[test]
    fn test_from_text_accepts_single_characters() {
        let map = KeyMap::from_text([(115, "+"), (114, "-"), (113, "é")]).expect("valid map");
        assert_eq!(map.get(115), Some('+'));
        assert_eq!(map.get(113), Some('é'));
    }

    #[test]
    fn test_from_text_rejects_multi_character_value() {
        let result = KeyMap::from_text([(164, "pp")]);
        assert_eq!(
            result,
            Err(KeyMapError::NotSingleChar {
                code: 164,
                value: "pp".to_string()
            })
        );
    }

    #[test]
    fn test_from_text_rejects_empty_value() {
        assert!(matches!(
            KeyMap::from_text([(164, "")]),
            Err(KeyMapError::NotSingleChar { code: 164, .. })
        ));
    }

    #[test]
    fn test_empty_map_is_allowed() {
        let map = KeyMap::new(std::iter::empty()).expect("empty map is valid");
        assert!(map.is_empty());
    }
}

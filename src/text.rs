//! UTF-16 addressing of message text.
//!
//! The Bot API counts entity offsets and lengths in UTF-16 code units, so a
//! character outside the Basic Multilingual Plane (most emoji) takes two.
//! Rust strings are UTF-8, hence the explicit re-encoding here.

use crate::error::{MessageError, Result};

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Returns the code units `[offset, offset + length)` of `text`.
///
/// A range running past the end is clamped to the text. A range whose edge
/// falls between the two halves of a surrogate pair is rejected.
pub fn slice_utf16(text: &str, offset: usize, length: usize) -> Result<String> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let start = offset.min(units.len());
    let end = offset.saturating_add(length).min(units.len());

    String::from_utf16(&units[start..end]).map_err(|_| MessageError::InvalidRange {
        offset,
        length,
        text_len: units.len(),
    })
}

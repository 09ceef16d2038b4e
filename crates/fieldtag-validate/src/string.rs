//! Standalone string bounds check, independent of the tag engine.

use crate::error::ErrorKind;

/// Check that `value` is non-empty and at most `max_len` bytes long.
///
/// ```rust
/// use fieldtag_validate::{validate_string, ErrorKind};
///
/// assert!(validate_string("alice", 16).is_ok());
/// assert_eq!(validate_string("", 16), Err(ErrorKind::EmptyString));
/// ```
pub fn validate_string(value: &str, max_len: usize) -> Result<(), ErrorKind> {
    if value.len() > max_len {
        return Err(ErrorKind::TooLong {
            max: i64::try_from(max_len).unwrap_or(i64::MAX),
        });
    }
    if value.is_empty() {
        return Err(ErrorKind::EmptyString);
    }
    Ok(())
}

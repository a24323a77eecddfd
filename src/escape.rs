//! Escaping, with the allocating forms at the top.

use std::borrow::Cow;

pub use callex_core::escape::*;


/// Escape every special byte by preceding it with `\`, so that the result
/// evaluates as atomic and unescapes back to the given bytes.  Borrows the
/// given bytes when none are special.
pub fn escape(bytes: &[u8]) -> Cow<'_, [u8]> {
    if needs_escape(bytes) {
        let mut escaped = Vec::with_capacity(escaped_len(bytes));
        escaped.extend(Escaped::new(bytes.iter().copied()));
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(bytes)
    }
}

/// Remove each escape byte, keeping the byte after it literally.  An escape
/// byte at the very end is dropped.  Borrows the given bytes when there are no
/// escape bytes.
pub fn unescape(bytes: &[u8]) -> Cow<'_, [u8]> {
    if needs_unescape(bytes) {
        Cow::Owned(Unescaped::new(bytes.iter().copied()).collect())
    } else {
        Cow::Borrowed(bytes)
    }
}

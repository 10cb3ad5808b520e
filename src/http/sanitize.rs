//! Inline filter for request-line tokens.
//!
//! The URL and query string are scanned byte by byte and four characters that
//! are commonly used to smuggle markup into reflected output are dropped:
//! `<`, `>`, `"` and `'`. Nothing is replaced or escaped and no
//! percent-decoding happens, so `%3C` passes through untouched.

/// Returns `true` for the bytes the filter removes.
#[inline]
pub fn is_unsafe(byte: u8) -> bool {
    matches!(byte, b'<' | b'>' | b'"' | b'\'')
}

/// Appends `byte` to `token` unless the filter drops it.
#[inline]
pub fn push_filtered(token: &mut Vec<u8>, byte: u8) {
    if !is_unsafe(byte) {
        token.push(byte);
    }
}

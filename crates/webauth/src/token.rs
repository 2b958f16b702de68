//! Token splitting and field decoding
//!
//! A WLS token is a list of fields joined by `!`, each percent-encoded on
//! its own. Splitting keeps empty fields, so `"!!!"` is four empty fields.

use crate::error::ParseError;
use percent_encoding::percent_decode_str;

/// Separator between response fields.
pub const RESPONSE_SEPARATOR: char = '!';

/// Split without decoding.
pub fn split_raw(sep: char, s: &str) -> Vec<&str> {
    s.split(sep).collect()
}

/// Split on `sep` and percent-decode every field as UTF-8.
///
/// Decoding is all-or-nothing: one bad field fails the whole token.
///
/// # Errors
///
/// Returns [`ParseError::Decode`] for a `%` not followed by two hex digits,
/// or for bytes that do not decode to UTF-8.
pub fn split(sep: char, s: &str) -> Result<Vec<String>, ParseError> {
    split_raw(sep, s)
        .into_iter()
        .enumerate()
        .map(|(index, field)| decode_field(field).map_err(|reason| ParseError::Decode { index, reason }))
        .collect()
}

/// Percent-decode a single field.
///
/// `+` is left alone: the WLS escapes with `%XX` only.
pub fn decode_field(field: &str) -> Result<String, String> {
    check_escapes(field)?;
    percent_decode_str(field)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| format!("invalid UTF-8 after decoding: {}", e))
}

fn check_escapes(field: &str) -> Result<(), String> {
    let bytes = field.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(format!("malformed escape at byte {}", i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

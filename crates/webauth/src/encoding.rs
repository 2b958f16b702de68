//! Signature wire encoding
//!
//! The WLS transmits signatures in a URL-safe base64 variant: `+` becomes
//! `-`, `/` becomes `.` and the `=` padding becomes `_`. Padding may also be
//! left off entirely.

use base64::alphabet::Alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine as _};

const WLS_ALPHABET: Alphabet =
    match Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-.") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("WLS base64 alphabet is invalid"),
    };

const WLS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &WLS_ALPHABET,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const WLS_PAD: char = '_';

/// Decode a signature field into raw signature bytes.
///
/// # Errors
///
/// Returns the underlying [`DecodeError`] for characters outside the
/// alphabet or an impossible length.
pub fn decode_signature(sig: &str) -> Result<Vec<u8>, DecodeError> {
    WLS_ENGINE.decode(sig.trim_end_matches(WLS_PAD))
}

/// Encode raw signature bytes the way the WLS does, with `_` padding.
pub fn encode_signature(bytes: &[u8]) -> String {
    WLS_ENGINE.encode(bytes).replace('=', "_")
}

//! Short code generation.
//!
//! Codes follow the KSUID layout: a 4-byte big-endian timestamp followed by
//! 16 random bytes, base62-encoded into a fixed 27-character string. Codes
//! sort lexicographically by creation second and are safe in URL paths and
//! as store keys.

use chrono::{DateTime, Utc};

/// Seconds between the Unix epoch and the KSUID epoch (2014-05-13T16:53:20Z).
const KSUID_EPOCH: i64 = 1_400_000_000;

/// Random bytes appended after the timestamp.
const PAYLOAD_BYTES: usize = 16;

/// Total raw length: timestamp plus payload.
const RAW_BYTES: usize = 4 + PAYLOAD_BYTES;

/// Length of the encoded code.
pub const CODE_LENGTH: usize = 27;

/// Base62 alphabet in ASCII order so that encoded strings sort like the raw bytes.
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generates a new time-ordered short code.
///
/// # Errors
///
/// Returns an error if the operating system RNG is unavailable.
pub fn generate_code() -> Result<String, getrandom::Error> {
    let mut payload = [0u8; PAYLOAD_BYTES];
    getrandom::fill(&mut payload)?;

    Ok(encode_code(Utc::now(), &payload))
}

/// Encodes a timestamp and payload into a short code.
///
/// Timestamps before the KSUID epoch clamp to zero; timestamps past the
/// 32-bit range clamp to the maximum.
pub fn encode_code(timestamp: DateTime<Utc>, payload: &[u8; PAYLOAD_BYTES]) -> String {
    let seconds = (timestamp.timestamp() - KSUID_EPOCH).clamp(0, u32::MAX as i64) as u32;

    let mut raw = [0u8; RAW_BYTES];
    raw[..4].copy_from_slice(&seconds.to_be_bytes());
    raw[4..].copy_from_slice(payload);

    base62_encode(&raw)
}

/// Encodes a big-endian number as zero-padded base62 of [`CODE_LENGTH`] digits.
fn base62_encode(raw: &[u8; RAW_BYTES]) -> String {
    let mut number = raw.to_vec();
    let mut digits = [ALPHABET[0]; CODE_LENGTH];
    let mut pos = CODE_LENGTH;

    while number.iter().any(|&b| b != 0) && pos > 0 {
        let mut remainder: u32 = 0;
        for byte in number.iter_mut() {
            let acc = (remainder << 8) | u32::from(*byte);
            *byte = (acc / 62) as u8;
            remainder = acc % 62;
        }
        pos -= 1;
        digits[pos] = ALPHABET[remainder as usize];
    }

    digits.iter().map(|&b| b as char).collect()
}

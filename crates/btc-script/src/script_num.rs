//! Minimal script-number encoding.
//!
//! Script numbers are little-endian sign-magnitude integers: the high bit
//! of the last byte is the sign, and zero is the empty byte string.

use crate::ScriptError;

/// Largest encoding `decode` accepts; wider numbers cannot round-trip an `i64`.
pub const MAX_SCRIPT_NUM_LEN: usize = 8;

/// Encode an integer as a minimal script number.
///
/// # Arguments
/// * `n` - The value to encode.
///
/// # Returns
/// The minimal little-endian sign-magnitude bytes (empty for zero).
pub fn encode(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }

    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut result = Vec::with_capacity(9);
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    // If the top byte already uses the sign bit, append a byte to carry it;
    // otherwise fold the sign into the top byte.
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        result[last] |= 0x80;
    }
    result
}

/// Decode a script number.
///
/// # Arguments
/// * `bytes` - The encoded number.
/// * `max_len` - Maximum accepted length (capped at `MAX_SCRIPT_NUM_LEN`).
/// * `require_minimal` - Reject encodings with a redundant top byte.
///
/// # Returns
/// The decoded value, or `InvalidScriptNumber` if the input is too long or
/// not minimally encoded when that is required.
pub fn decode(bytes: &[u8], max_len: usize, require_minimal: bool) -> Result<i64, ScriptError> {
    let limit = max_len.min(MAX_SCRIPT_NUM_LEN);
    if bytes.len() > limit {
        return Err(ScriptError::InvalidScriptNumber(format!(
            "numeric value encoded as {} is {} bytes which exceeds the max allowed of {}",
            hex::encode(bytes),
            bytes.len(),
            limit
        )));
    }

    let (last, rest) = match bytes.split_last() {
        Some(split) => split,
        None => return Ok(0),
    };

    if require_minimal && last & 0x7f == 0 {
        // A top byte of 0x00/0x80 is only needed when the next byte uses bit 7.
        match rest.last() {
            Some(prev) if prev & 0x80 != 0 => {}
            _ => {
                return Err(ScriptError::InvalidScriptNumber(format!(
                    "non-minimally encoded script number {}",
                    hex::encode(bytes)
                )))
            }
        }
    }

    let mut magnitude: u64 = 0;
    for (i, &b) in rest.iter().enumerate() {
        magnitude |= (b as u64) << (8 * i);
    }
    magnitude |= ((last & 0x7f) as u64) << (8 * rest.len());

    // At most 63 magnitude bits fit in 8 bytes with a sign bit.
    let value = magnitude as i64;
    Ok(if last & 0x80 != 0 { -value } else { value })
}

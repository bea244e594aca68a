//! Chain hash type for transaction identification.
//!
//! Provides `ChainHash`, a 32-byte value stored in internal (little-endian)
//! byte order and displayed as byte-reversed hex, matching the way
//! transaction ids are shown by block explorers and RPC interfaces.

use std::fmt;
use std::str::FromStr;
use crate::PrimitivesError;

/// Size of a ChainHash in bytes.
pub const HASH_SIZE: usize = 32;

/// Maximum hex string length for a ChainHash (64 hex characters).
pub const MAX_HASH_STRING_SIZE: usize = HASH_SIZE * 2;

/// A 32-byte hash used for transaction ids.
///
/// The wrapped bytes are the ones that appear on the wire. `Display` and
/// `from_hex` work on the reversed, human-readable form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct ChainHash([u8; HASH_SIZE]);

impl ChainHash {
    /// Create a ChainHash from a raw 32-byte array in internal order.
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        ChainHash(bytes)
    }

    /// Create a ChainHash from a byte slice in internal order.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(ChainHash)` if the slice is 32 bytes, or an error otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != HASH_SIZE {
            return Err(PrimitivesError::InvalidHash(
                format!("invalid hash length of {}, want {}", bytes.len(), HASH_SIZE)
            ));
        }
        let mut arr = [0u8; HASH_SIZE];
        arr.copy_from_slice(bytes);
        Ok(ChainHash(arr))
    }

    /// Create a ChainHash from a display-order (byte-reversed) hex string.
    ///
    /// A transaction id such as `fd21...bbad` is decoded and reversed so
    /// that the stored bytes are `adbb...21fd`. Unlike block hashes, txids
    /// are always given in full, so the string must be exactly 64 hex
    /// characters.
    ///
    /// # Arguments
    /// * `hex_str` - A 64-character hex string.
    ///
    /// # Returns
    /// `Ok(ChainHash)` on success, or an error for invalid input.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != MAX_HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "hash string must be {} hex characters, got {}",
                MAX_HASH_STRING_SIZE,
                hex_str.len()
            )));
        }

        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(hex_str, &mut bytes)?;
        bytes.reverse();
        Ok(ChainHash(bytes))
    }

    /// Access the internal byte array.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Return the bytes in display order (reversed from internal storage).
    pub fn to_display_bytes(&self) -> [u8; HASH_SIZE] {
        let mut reversed = self.0;
        reversed.reverse();
        reversed
    }
}

impl From<[u8; HASH_SIZE]> for ChainHash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        ChainHash(bytes)
    }
}

/// Display the hash as byte-reversed hex.
impl fmt::Display for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_display_bytes()))
    }
}

impl FromStr for ChainHash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChainHash::from_hex(s)
    }
}

//! Signing keys.
//!
//! Keys are only ever loaded from a known scalar (bytes or hex), since the
//! codec signs with keys supplied by its caller.

use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// Size of a raw private scalar.
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// A secp256k1 signing key. `Debug` shows only the public key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Load a big-endian 32-byte scalar.
    ///
    /// # Returns
    /// `InvalidKeyLength` for any other size, or `InvalidPrivateKey` for
    /// zero or a value not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PRIVATE_KEY_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Load a scalar from 64 hex characters. The decoded bytes are wiped
    /// once the key is built.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte digest. See `Signature::sign`.
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pub_key", &self.pub_key().to_string())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

#[cfg(test)]
mod tests {
    use super::*;

    const FUNDING_KEY: &str = "6bd078650fcee8444e4e09825227b801a1ca928debb750eb36e6d56124bb20e8";

    #[test]
    fn test_funding_key_pub_key() {
        let key = PrivateKey::from_hex(FUNDING_KEY).unwrap();
        assert_eq!(
            key.pub_key().to_string(),
            "03535b32d5eb0a6ed0982a0479bbadc9868d9836f6ba94dd5a63be16d875069184"
        );
    }

    #[test]
    fn test_hex_and_bytes_roundtrip() {
        let key = PrivateKey::from_hex(FUNDING_KEY).unwrap();
        assert_eq!(key.to_hex(), FUNDING_KEY);

        let from_bytes = PrivateKey::from_bytes(&key.to_bytes()).unwrap();
        assert_eq!(key, from_bytes);
    }

    #[test]
    fn test_private_key_from_invalid_hex() {
        assert!(PrivateKey::from_hex("").is_err());
        assert!(PrivateKey::from_hex("zz").is_err());
        assert!(matches!(
            PrivateKey::from_hex("6bd078"),
            Err(PrimitivesError::InvalidKeyLength { expected: 32, got: 3 })
        ));
        // Zero scalar is not a valid key.
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err());
        // Curve order N is out of range.
        assert!(PrivateKey::from_hex(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        )
        .is_err());
    }

    #[test]
    fn test_debug_hides_scalar() {
        let key = PrivateKey::from_hex(FUNDING_KEY).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(FUNDING_KEY));
    }
}

//! Public keys as they appear in scripts.
//!
//! Keys parse from either SEC1 form but always serialize compressed, which
//! is the form committed to by P2PKH and P2WPKH hashes.

use k256::ecdsa::VerifyingKey;
use std::fmt;
use std::str::FromStr;

use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// `02`/`03` tag plus X.
pub const COMPRESSED_LEN: usize = 33;

/// `04` tag plus X and Y.
pub const UNCOMPRESSED_LEN: usize = 65;

/// A point on secp256k1. `Display` prints the compressed hex.
#[derive(Clone, Debug)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse a SEC1 key whose tag agrees with its length: `02`/`03` on 33
    /// bytes or `04` on 65 bytes.
    ///
    /// # Returns
    /// `InvalidKeyLength` for any other length. `InvalidPublicKey` for a
    /// mismatched tag or a point that is not on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        match (bytes.len(), bytes.first()) {
            (COMPRESSED_LEN, Some(0x02 | 0x03)) | (UNCOMPRESSED_LEN, Some(0x04)) => {}
            (COMPRESSED_LEN | UNCOMPRESSED_LEN, Some(prefix)) => {
                return Err(PrimitivesError::InvalidPublicKey(format!(
                    "prefix {:#04x} does not match a {}-byte key",
                    prefix,
                    bytes.len()
                )));
            }
            _ => {
                return Err(PrimitivesError::InvalidKeyLength {
                    expected: COMPRESSED_LEN,
                    got: bytes.len(),
                });
            }
        }
        let vk = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;
        Ok(PublicKey { inner: vk })
    }

    /// Hex form of `from_bytes`.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Tag byte for the parity of Y, then X.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Key hash used by P2PKH and P2WPKH.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// See `Signature::verify`.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: *vk }
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL_FUNDING: &str = "023da092f6980e58d2c037173180e9a465476026ee50f96695963e8efe436f54eb";
    const LOCAL_FUNDING_UNCOMPRESSED: &str = "043da092f6980e58d2c037173180e9a465476026ee50f96695963e8efe436f54ebffd0f8b7a5bd8c2e21c538092bee96be2b5dc1a87e66e70dddd488811b3c9dc4";
    const REMOTE_FUNDING: &str = "030e9f7b623d2ccc7c9bd44d66d5ce21ce504c0acf6385a132cec6d3c39fa711c1";

    #[test]
    fn test_pub_keys_compressed_roundtrip() {
        for key_hex in [LOCAL_FUNDING, REMOTE_FUNDING] {
            let pk = PublicKey::from_hex(key_hex).unwrap();
            assert_eq!(pk.to_hex(), key_hex);
            assert_eq!(pk.to_string(), key_hex);
        }
    }

    #[test]
    fn test_uncompressed_parses_to_same_key() {
        let pk = PublicKey::from_hex(LOCAL_FUNDING).unwrap();
        let parsed = PublicKey::from_hex(LOCAL_FUNDING_UNCOMPRESSED).unwrap();
        assert_eq!(parsed, pk);
        assert_eq!(parsed.to_hex(), LOCAL_FUNDING);
    }

    #[test]
    fn test_prefix_must_match_length() {
        // SEC1 compact tag on a 33-byte key.
        let mut compact = hex::decode(LOCAL_FUNDING).unwrap();
        compact[0] = 0x05;
        assert!(matches!(
            PublicKey::from_bytes(&compact),
            Err(PrimitivesError::InvalidPublicKey(_))
        ));

        // Compressed prefix on a 65-byte key.
        let mut wrong = hex::decode(LOCAL_FUNDING_UNCOMPRESSED).unwrap();
        wrong[0] = 0x02;
        assert!(matches!(
            PublicKey::from_bytes(&wrong),
            Err(PrimitivesError::InvalidPublicKey(_))
        ));

        // Hybrid encoding.
        wrong[0] = 0x06;
        assert!(PublicKey::from_bytes(&wrong).is_err());
    }

    #[test]
    fn test_pub_key_invalid() {
        assert!(matches!(
            PublicKey::from_bytes(&[]),
            Err(PrimitivesError::InvalidKeyLength { got: 0, .. })
        ));
        assert!(matches!(
            PublicKey::from_bytes(&[0x02; 32]),
            Err(PrimitivesError::InvalidKeyLength { got: 32, .. })
        ));
        // Bad prefix byte.
        let mut bad = hex::decode(LOCAL_FUNDING).unwrap();
        bad[0] = 0x05;
        assert!(matches!(
            PublicKey::from_bytes(&bad),
            Err(PrimitivesError::InvalidPublicKey(_))
        ));
        assert!(PublicKey::from_hex("not hex").is_err());
    }

    #[test]
    fn test_hash160_of_funding_key() {
        let pk = PublicKey::from_hex(
            "03535b32d5eb0a6ed0982a0479bbadc9868d9836f6ba94dd5a63be16d875069184",
        )
        .unwrap();
        assert_eq!(
            hex::encode(pk.hash160()),
            "3ca33c2e4446f4a305f23c80df8ad1afdcf652f9"
        );
    }
}

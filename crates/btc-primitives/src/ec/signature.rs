//! ECDSA signatures over secp256k1.
//!
//! Signatures are produced with RFC6979 nonces and normalized to low S.
//! The DER form is the strict BIP66 one: each integer is minimal and gets
//! a `0x00` guard byte only when its top bit is set.

use k256::ecdsa;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// Length of a compact `r || s` signature.
pub const COMPACT_SIGNATURE_LEN: usize = 64;

const DER_SEQUENCE: u8 = 0x30;
const DER_INTEGER: u8 = 0x02;

/// Group order n of secp256k1, big-endian.
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// floor(n / 2). An S at or below this is "low".
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// An ECDSA signature as two big-endian 32-byte scalars.
///
/// `to_der` encodes the stored values as they are. Use `normalize_s` to
/// move a high S into the lower half of the order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Split a 64-byte `r || s` buffer into a signature.
    ///
    /// # Returns
    /// `InvalidSignature` unless `bytes` is exactly 64 bytes long.
    pub fn from_compact(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != COMPACT_SIGNATURE_LEN {
            return Err(PrimitivesError::InvalidSignature(format!(
                "compact signature must be {} bytes, got {}",
                COMPACT_SIGNATURE_LEN,
                bytes.len()
            )));
        }
        let (r, s) = bytes.split_at(32);
        Ok(Signature { r: fixed_32(r), s: fixed_32(s) })
    }

    /// Join R and S into the 64-byte compact form.
    pub fn to_compact(&self) -> [u8; COMPACT_SIGNATURE_LEN] {
        let mut out = [0u8; COMPACT_SIGNATURE_LEN];
        let (r, s) = out.split_at_mut(32);
        r.copy_from_slice(&self.r);
        s.copy_from_slice(&self.s);
        out
    }

    /// Parse `30 <len> 02 <rlen> <r> 02 <slen> <s>` with no sighash byte.
    ///
    /// The sequence length must cover the input exactly. Leading zero
    /// bytes are accepted here; `is_strict_der` is the canonical check.
    ///
    /// # Returns
    /// `InvalidSignature` naming the part that is malformed.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let malformed =
            |what: &str| PrimitivesError::InvalidSignature(format!("malformed DER signature: {}", what));

        if bytes.len() < 8 {
            return Err(malformed("too short"));
        }
        if bytes[0] != DER_SEQUENCE {
            return Err(malformed("missing sequence tag"));
        }
        if bytes[1] as usize + 2 != bytes.len() {
            return Err(malformed("sequence length does not match input"));
        }

        let mut pos = 2;
        let r = read_der_integer(bytes, &mut pos).ok_or_else(|| malformed("bad R integer"))?;
        let s = read_der_integer(bytes, &mut pos).ok_or_else(|| malformed("bad S integer"))?;
        if pos != bytes.len() {
            return Err(malformed("bytes after S"));
        }

        Ok(Signature { r: scalar_from_der(r)?, s: scalar_from_der(s)? })
    }

    /// Encode as a minimal DER sequence (BIP66). A zero scalar encodes as
    /// the single byte `0x00`.
    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);

        let mut out = Vec::with_capacity(6 + r.len() + s.len());
        out.push(DER_SEQUENCE);
        out.push((4 + r.len() + s.len()) as u8);
        for int in [&r, &s] {
            out.push(DER_INTEGER);
            out.push(int.len() as u8);
            out.extend_from_slice(int);
        }
        out
    }

    /// Whether S is at most n/2.
    pub fn is_low_s(&self) -> bool {
        self.s <= HALF_ORDER
    }

    /// Copy of this signature with S replaced by n - S if S is high (BIP62).
    pub fn normalize_s(&self) -> Self {
        if self.is_low_s() {
            return self.clone();
        }
        Signature { r: self.r, s: order_minus(&self.s) }
    }

    /// Sign a digest with an RFC6979 nonce. The result is always low-S.
    ///
    /// # Arguments
    /// * `hash` - Message digest. Anything other than 32 bytes is left-padded
    ///   or truncated to 32.
    /// * `priv_key` - Signing key.
    pub fn sign(hash: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let prehash = digest_bytes(hash);
        let sig: ecdsa::Signature = priv_key
            .signing_key()
            .sign_prehash(&prehash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r, s) = sig.split_bytes();
        Ok(Signature { r: fixed_32(&r), s: fixed_32(&s) }.normalize_s())
    }

    /// Check this signature over `hash` against `pub_key`.
    ///
    /// Returns `false` for out-of-range scalars instead of an error.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        let Ok(sig) = ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        ) else {
            return false;
        };
        pub_key
            .verifying_key()
            .verify_prehash(&digest_bytes(hash), &sig)
            .is_ok()
    }
}

/// Whether `sig` (without a sighash byte) passes the BIP66 encoding rules.
///
/// Lengths must be consistent, both integers must carry the INTEGER tag,
/// neither may be negative, and a leading zero is allowed only as a sign
/// guard.
pub fn is_strict_der(sig: &[u8]) -> bool {
    // 30 06 02 01 xx 02 01 xx up to two 33-byte integers.
    if !(8..=72).contains(&sig.len()) {
        return false;
    }
    if sig[0] != DER_SEQUENCE || sig[1] as usize != sig.len() - 2 {
        return false;
    }

    let r_len = sig[3] as usize;
    let Some(&s_len) = sig.get(5 + r_len) else {
        return false;
    };
    if r_len + s_len as usize + 6 != sig.len() {
        return false;
    }

    sig[2] == DER_INTEGER
        && strict_der_integer(&sig[4..4 + r_len])
        && sig[4 + r_len] == DER_INTEGER
        && strict_der_integer(&sig[6 + r_len..])
}

fn strict_der_integer(int: &[u8]) -> bool {
    match int {
        [] => false,
        [first, ..] if first & 0x80 != 0 => false,
        [0x00, next, ..] => next & 0x80 != 0,
        _ => true,
    }
}

/// Read one `02 <len> <bytes>` element at `*pos` and advance past it.
fn read_der_integer<'a>(data: &'a [u8], pos: &mut usize) -> Option<&'a [u8]> {
    let (&tag, rest) = data.get(*pos..)?.split_first()?;
    let (&len, rest) = rest.split_first()?;
    if tag != DER_INTEGER || len == 0 {
        return None;
    }
    let body = rest.get(..len as usize)?;
    *pos += 2 + body.len();
    Some(body)
}

/// Left-pad a DER integer body into a scalar, dropping sign padding.
fn scalar_from_der(int: &[u8]) -> Result<[u8; 32], PrimitivesError> {
    let zeros = int.iter().take_while(|&&b| b == 0).count();
    let digits = &int[zeros.min(int.len() - 1)..];
    if digits.len() > 32 {
        return Err(PrimitivesError::InvalidSignature(format!(
            "DER integer has {} significant bytes, max 32",
            digits.len()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - digits.len()..].copy_from_slice(digits);
    Ok(out)
}

/// Minimal big-endian body for a scalar, with a guard byte if needed.
fn der_integer(scalar: &[u8; 32]) -> Vec<u8> {
    let zeros = scalar.iter().take_while(|&&b| b == 0).count();
    let digits = &scalar[zeros.min(31)..];
    let mut out = Vec::with_capacity(digits.len() + 1);
    if digits[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(digits);
    out
}

/// n - val, for val < n.
fn order_minus(val: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0u16;
    for i in (0..32).rev() {
        let sub = val[i] as u16 + borrow;
        let n = CURVE_ORDER[i] as u16;
        if n >= sub {
            out[i] = (n - sub) as u8;
            borrow = 0;
        } else {
            out[i] = (n + 0x100 - sub) as u8;
            borrow = 1;
        }
    }
    out
}

fn digest_bytes(hash: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    if hash.len() >= 32 {
        out.copy_from_slice(&hash[..32]);
    } else {
        out[32 - hash.len()..].copy_from_slice(hash);
    }
    out
}

fn fixed_32(bytes: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(bytes);
    out
}

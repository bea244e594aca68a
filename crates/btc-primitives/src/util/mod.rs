//! Compact-size integers and the little-endian cursors used by the
//! transaction codec.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A compact-size integer, as used for counts and script lengths.
///
/// | value            | encoding              |
/// |------------------|-----------------------|
/// | `< 0xfd`         | the byte itself       |
/// | `<= 0xffff`      | `fd` + u16 LE         |
/// | `<= 0xffff_ffff` | `fe` + u32 LE         |
/// | otherwise        | `ff` + u64 LE         |
///
/// Encoding always picks the shortest form. Decoding accepts any form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode from the front of `data`.
    ///
    /// # Returns
    /// The value and the number of bytes it occupied, or `UnexpectedEof`.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let mut reader = ByteReader::new(data);
        let value = reader.read_varint()?;
        Ok((value, data.len() - reader.remaining()))
    }

    /// Encoded size in bytes: 1, 3, 5 or 9.
    pub fn length(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = [0u8; 9];
        let n = self.put_bytes(&mut buf);
        buf[..n].to_vec()
    }

    /// Write the encoding to the front of `dst` and return its length.
    ///
    /// Panics if `dst` is shorter than `self.length()`.
    pub fn put_bytes(&self, dst: &mut [u8]) -> usize {
        let n = self.length();
        match n {
            1 => dst[0] = self.0 as u8,
            3 => {
                dst[0] = 0xfd;
                dst[1..3].copy_from_slice(&(self.0 as u16).to_le_bytes());
            }
            5 => {
                dst[0] = 0xfe;
                dst[1..5].copy_from_slice(&(self.0 as u32).to_le_bytes());
            }
            _ => {
                dst[0] = 0xff;
                dst[1..9].copy_from_slice(&self.0.to_le_bytes());
            }
        }
        n
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// Forward-only cursor over borrowed wire bytes.
///
/// Reads past the end fail with `UnexpectedEof`.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Borrow the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        let rest = &self.data[self.pos..];
        let taken = rest.get(..n).ok_or(PrimitivesError::UnexpectedEof)?;
        self.pos += n;
        Ok(taken)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        let [b] = self.read_array()?;
        Ok(b)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32_le(&mut self) -> Result<i32, PrimitivesError> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Read a compact-size integer in any of its four forms.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let value = match self.read_u8()? {
            0xfd => self.read_u16_le()? as u64,
            0xfe => self.read_u32_le()? as u64,
            0xff => self.read_u64_le()?,
            b => b as u64,
        };
        Ok(VarInt(value))
    }

    /// Read a compact-size length and then that many bytes.
    ///
    /// The length is checked against what is left before anything is
    /// allocated, so a huge announced length fails fast.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_varint()?.value();
        let len = usize::try_from(len).map_err(|_| PrimitivesError::VarIntTooLarge)?;
        self.read_bytes(len)
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// Append-only little-endian buffer, the growable counterpart of
/// `ByteReader`.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that can hold `capacity` bytes before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter { buf: Vec::with_capacity(capacity) }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u32_le(&mut self, val: u32) {
        self.write_bytes(&val.to_le_bytes());
    }

    pub fn write_i32_le(&mut self, val: i32) {
        self.write_bytes(&val.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, val: u64) {
        self.write_bytes(&val.to_le_bytes());
    }

    /// Append the shortest compact-size form of `varint`.
    pub fn write_varint(&mut self, varint: VarInt) {
        let mut tmp = [0u8; 9];
        let n = varint.put_bytes(&mut tmp);
        self.write_bytes(&tmp[..n]);
    }

    /// Append a compact-size length and then `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

//! Shared field walk for transaction serialization.
//!
//! `write_fields` visits every wire field of a transaction in order and
//! hands it to a `WireSink`. Counting bytes (`SizeCounter`), writing into a
//! fixed slice (`SliceWriter`) and writing into a growable buffer
//! (`ByteWriter`) are all sinks, so sizes and encodings come from the same
//! code path.

use btc_primitives::util::{ByteWriter, VarInt};

use crate::transaction::Transaction;

/// A destination for transaction wire fields.
pub trait WireSink {
    /// Accept raw bytes.
    fn put_bytes(&mut self, bytes: &[u8]);

    fn put_u32_le(&mut self, val: u32) {
        self.put_bytes(&val.to_le_bytes());
    }

    fn put_i32_le(&mut self, val: i32) {
        self.put_bytes(&val.to_le_bytes());
    }

    fn put_u64_le(&mut self, val: u64) {
        self.put_bytes(&val.to_le_bytes());
    }

    fn put_varint(&mut self, val: VarInt) {
        let mut buf = [0u8; 9];
        let n = val.put_bytes(&mut buf);
        self.put_bytes(&buf[..n]);
    }

    /// Accept a varint length prefix followed by the bytes.
    fn put_var_bytes(&mut self, bytes: &[u8]) {
        self.put_varint(VarInt::from(bytes.len()));
        self.put_bytes(bytes);
    }
}

/// Sink that only counts bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeCounter(usize);

impl SizeCounter {
    pub fn new() -> Self {
        SizeCounter(0)
    }

    /// Bytes counted so far.
    pub fn total(&self) -> usize {
        self.0
    }
}

impl WireSink for SizeCounter {
    fn put_bytes(&mut self, bytes: &[u8]) {
        self.0 += bytes.len();
    }

    fn put_varint(&mut self, val: VarInt) {
        self.0 += val.length();
    }
}

/// Sink that writes into a caller-provided slice.
///
/// Writes past the end of the slice are dropped and recorded; callers check
/// `written()` against the size they expected.
#[derive(Debug)]
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    overflowed: bool,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        SliceWriter { buf, pos: 0, overflowed: false }
    }

    /// Number of bytes written.
    pub fn written(&self) -> usize {
        self.pos
    }

    /// Whether any write did not fit.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

impl WireSink for SliceWriter<'_> {
    fn put_bytes(&mut self, bytes: &[u8]) {
        if self.overflowed {
            return;
        }
        let end = self.pos + bytes.len();
        match self.buf.get_mut(self.pos..end) {
            Some(dst) => {
                dst.copy_from_slice(bytes);
                self.pos = end;
            }
            None => self.overflowed = true,
        }
    }
}

impl WireSink for ByteWriter {
    fn put_bytes(&mut self, bytes: &[u8]) {
        self.write_bytes(bytes);
    }

    fn put_u32_le(&mut self, val: u32) {
        self.write_u32_le(val);
    }

    fn put_i32_le(&mut self, val: i32) {
        self.write_i32_le(val);
    }

    fn put_u64_le(&mut self, val: u64) {
        self.write_u64_le(val);
    }

    fn put_varint(&mut self, val: VarInt) {
        self.write_varint(val);
    }

    fn put_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_bytes(bytes);
    }
}

/// Walk the legacy wire fields of `tx` into `sink`.
///
/// Order: version (i32 LE), varint input count, each input (hash, index
/// u32 LE, varint script, sequence u32 LE), varint output count, each
/// output (value u64 LE, varint script), lock time (u32 LE).
pub fn write_fields<S: WireSink + ?Sized>(sink: &mut S, tx: &Transaction) {
    sink.put_i32_le(tx.version);

    sink.put_varint(VarInt::from(tx.inputs.len()));
    for input in &tx.inputs {
        sink.put_bytes(&input.prev_tx_hash);
        sink.put_u32_le(input.prev_output_index);
        sink.put_var_bytes(input.script.to_bytes());
        sink.put_u32_le(input.sequence);
    }

    sink.put_varint(VarInt::from(tx.outputs.len()));
    for output in &tx.outputs {
        sink.put_u64_le(output.value);
        sink.put_var_bytes(output.script.to_bytes());
    }

    sink.put_u32_le(tx.lock_time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TransactionInput;
    use crate::output::TransactionOutput;
    use btc_script::Script;

    #[test]
    fn test_size_counter_counts_varint_length() {
        let mut counter = SizeCounter::new();
        counter.put_varint(VarInt(0xfc));
        counter.put_varint(VarInt(0xfd));
        counter.put_varint(VarInt(0x1_0000));
        counter.put_varint(VarInt(0x1_0000_0000));
        assert_eq!(counter.total(), 1 + 3 + 5 + 9);
    }

    #[test]
    fn test_slice_writer_overflow() {
        let mut buf = [0u8; 3];
        let mut writer = SliceWriter::new(&mut buf);
        writer.put_bytes(&[1, 2]);
        writer.put_bytes(&[3, 4]);
        assert!(writer.overflowed());
        assert_eq!(writer.written(), 2);
        assert_eq!(buf, [1, 2, 0]);
    }

    #[test]
    fn test_sinks_agree() {
        let tx = Transaction::new();
        let mut counter = SizeCounter::new();
        write_fields(&mut counter, &tx);

        let mut writer = ByteWriter::new();
        write_fields(&mut writer, &tx);
        assert_eq!(writer.len(), counter.total());
        assert_eq!(hex::encode(writer.as_bytes()), "02000000000000000000");
    }

    /// The growable and fixed-slice sinks emit the same bytes.
    #[test]
    fn test_byte_writer_matches_slice_writer() {
        let mut tx = Transaction::new();
        let mut input = TransactionInput::new([0xab; 32], 7);
        input.script = Script::from_bytes(&[0x51; 300]);
        tx.add_input(input);
        tx.add_output(TransactionOutput::new(1_000, Script::from_bytes(&[0x6a])));

        let mut writer = ByteWriter::new();
        write_fields(&mut writer, &tx);
        assert_eq!(writer.into_bytes(), tx.to_bytes().unwrap());
    }
}

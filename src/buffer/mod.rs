//! Growable, cursor-based byte storage underlying all encoding and decoding.
//!
//! Role
//! - [`ByteBuffer`] owns a contiguous byte region and two cursors: the write
//!   cursor (equal to the stored length) and a read cursor that trails it.
//!   Writes append at the write cursor; reads consume at the read cursor and
//!   never advance past the write cursor.
//! - Primitive writers/readers cover every wire scalar: fixed-width
//!   big-endian integers and floats, single bytes, booleans, zigzag varints,
//!   length-prefixed strings, and raw byte spans.
//!
//! Performance
//! - Backed by `smallvec`, so buffers up to 32 bytes never touch the heap.
//! - Growth reallocates to `max(capacity * 2, required)`, preserving written
//!   bytes verbatim; repeated small writes are amortized O(1) per byte.
//! - The buffer never shrinks on its own; [`ByteBuffer::compact`] discards
//!   the consumed prefix when the caller wants the space back.
//!
//! A buffer is strictly single-threaded state: every operation mutates the
//! cursors in place, and concurrent use of one instance requires external
//! synchronization. Distinct instances are fully independent.
use smallvec::SmallVec;

use crate::error::{WireError, WireResult};

pub mod varint;

use varint::{MAX_VARINT32_BYTES, MAX_VARINT64_BYTES, zigzag32, zigzag64, unzigzag32, unzigzag64};

/// Growable byte buffer with separate write and read cursors.
///
/// Invariant: `0 <= read_pos <= write_pos <= capacity`, where the write
/// cursor is the length of the stored data.
#[derive(Debug, Clone, Default)]
pub struct ByteBuffer {
    data: SmallVec<[u8; 32]>,
    read_pos: usize,
}

impl ByteBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            data: SmallVec::new(),
            read_pos: 0,
        }
    }

    /// Create an empty buffer with at least `capacity` bytes preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: SmallVec::with_capacity(capacity),
            read_pos: 0,
        }
    }

    /// Number of bytes written so far (the write cursor).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written (or everything was cleared).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The write cursor. Alias of [`ByteBuffer::len`].
    pub fn write_pos(&self) -> usize {
        self.data.len()
    }

    /// The read cursor.
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// Number of unread bytes between the read and write cursors.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_pos
    }

    /// Currently allocated capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// All written bytes, including the already-consumed prefix.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The unread span `[read_pos, write_pos)`.
    pub fn unread(&self) -> &[u8] {
        &self.data[self.read_pos..]
    }

    /// Reset both cursors to zero without releasing capacity.
    pub fn clear(&mut self) {
        self.data.clear();
        self.read_pos = 0;
    }

    /// Discard the consumed prefix, shifting the unread span to offset 0.
    ///
    /// Afterwards the read cursor is `0` and the write cursor equals the
    /// previous [`ByteBuffer::remaining`]. Capacity is unchanged.
    pub fn compact(&mut self) {
        if self.read_pos == 0 {
            return;
        }
        self.data.drain(..self.read_pos);
        self.read_pos = 0;
    }

    /// Advance the read cursor by `count` bytes without decoding them.
    pub fn skip(&mut self, count: usize) -> WireResult<()> {
        self.check_remaining(count)?;
        self.read_pos += count;
        Ok(())
    }

    fn check_remaining(&self, needed: usize) -> WireResult<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(WireError::BufferUnderflow { needed, remaining });
        }
        Ok(())
    }

    /// Ensure room for `additional` more bytes, reallocating to
    /// `max(capacity * 2, required)` when needed.
    fn reserve_for(&mut self, additional: usize) {
        let required = self.data.len() + additional;
        if required <= self.data.capacity() {
            return;
        }
        let new_cap = required.max(self.data.capacity() * 2);
        log::trace!(
            "growing buffer: capacity {} -> {}",
            self.data.capacity(),
            new_cap
        );
        self.data.reserve_exact(new_cap - self.data.len());
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.reserve_for(1);
        self.data.push(value);
    }

    /// Consume a single byte.
    pub fn read_u8(&mut self) -> WireResult<u8> {
        self.check_remaining(1)?;
        let byte = self.data[self.read_pos];
        self.read_pos += 1;
        Ok(byte)
    }

    /// Append a boolean as one byte, `0` or `1`.
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    /// Consume one byte as a boolean. Any non-zero byte reads as `true`, to
    /// tolerate encoder drift across protocol versions.
    pub fn read_bool(&mut self) -> WireResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Append raw bytes with no length prefix.
    pub fn write_bytes(&mut self, src: &[u8]) {
        self.reserve_for(src.len());
        self.data.extend_from_slice(src);
    }

    /// Consume exactly `count` raw bytes, returning the span.
    pub fn read_bytes(&mut self, count: usize) -> WireResult<&[u8]> {
        self.check_remaining(count)?;
        let start = self.read_pos;
        self.read_pos += count;
        Ok(&self.data[start..start + count])
    }

    fn read_array<const N: usize>(&mut self) -> WireResult<[u8; N]> {
        self.check_remaining(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.read_pos..self.read_pos + N]);
        self.read_pos += N;
        Ok(out)
    }

    /// Append a fixed-width big-endian 16-bit integer.
    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Consume a fixed-width big-endian 16-bit integer.
    pub fn read_i16(&mut self) -> WireResult<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    /// Append a fixed-width big-endian 32-bit integer.
    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Consume a fixed-width big-endian 32-bit integer.
    pub fn read_i32(&mut self) -> WireResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Append a fixed-width big-endian 64-bit integer.
    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Consume a fixed-width big-endian 64-bit integer.
    pub fn read_i64(&mut self) -> WireResult<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    /// Append an IEEE-754 single-precision float, big-endian bit pattern.
    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Consume an IEEE-754 single-precision float.
    pub fn read_f32(&mut self) -> WireResult<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    /// Append an IEEE-754 double-precision float, big-endian bit pattern.
    pub fn write_f64(&mut self, value: f64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Consume an IEEE-754 double-precision float.
    pub fn read_f64(&mut self) -> WireResult<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    fn write_raw_varint(&mut self, mut value: u64) -> usize {
        let mut written = 0;
        while value >= 0x80 {
            self.write_u8((value as u8 & 0x7F) | 0x80);
            value >>= 7;
            written += 1;
        }
        self.write_u8(value as u8);
        written + 1
    }

    fn read_raw_varint(&mut self, max_bytes: usize) -> WireResult<u64> {
        let mut value = 0u64;
        for group in 0..max_bytes {
            let byte = self.read_u8()?;
            value |= ((byte & 0x7F) as u64) << (7 * group);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(WireError::MalformedVarInt { max_bytes })
    }

    /// Append a zigzag varint encoding of a 32-bit value (1–5 bytes).
    ///
    /// Returns the number of bytes written.
    pub fn write_var_i32(&mut self, value: i32) -> usize {
        self.write_raw_varint(zigzag32(value) as u64)
    }

    /// Consume a zigzag varint encoding of a 32-bit value.
    ///
    /// Fails with [`WireError::MalformedVarInt`] when the continuation chain
    /// exceeds 5 bytes, or [`WireError::BufferUnderflow`] when the buffer
    /// ends mid-value.
    pub fn read_var_i32(&mut self) -> WireResult<i32> {
        let raw = self.read_raw_varint(MAX_VARINT32_BYTES)?;
        Ok(unzigzag32(raw as u32))
    }

    /// Append a zigzag varint encoding of a 64-bit value (1–10 bytes).
    ///
    /// Returns the number of bytes written.
    pub fn write_var_i64(&mut self, value: i64) -> usize {
        self.write_raw_varint(zigzag64(value))
    }

    /// Consume a zigzag varint encoding of a 64-bit value.
    pub fn read_var_i64(&mut self) -> WireResult<i64> {
        let raw = self.read_raw_varint(MAX_VARINT64_BYTES)?;
        Ok(unzigzag64(raw))
    }

    /// Append a string: varint byte-length prefix, then raw UTF-8 bytes.
    ///
    /// The empty string is the single zero-length prefix byte.
    pub fn write_str(&mut self, value: &str) {
        debug_assert!(value.len() <= i32::MAX as usize);
        self.write_var_i32(value.len() as i32);
        self.write_bytes(value.as_bytes());
    }

    /// Consume a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> WireResult<String> {
        let len = self.read_var_i32()?;
        if len < 0 {
            return Err(WireError::InvalidLength { len: len as i64 });
        }
        let bytes = self.read_bytes(len as usize)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(_) => Err(WireError::InvalidUtf8),
        }
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<&[u8]> for ByteBuffer {
    /// Build a buffer whose unread span is a copy of `bytes`.
    fn from(bytes: &[u8]) -> Self {
        Self {
            data: SmallVec::from_slice(bytes),
            read_pos: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_shape_examples() {
        // Byte-exact encodings other implementations must reproduce.
        let cases: &[(i32, &[u8])] = &[
            (0, &[0x00]),
            (-1, &[0x01]),
            (1, &[0x02]),
            (63, &[0x7E]),
            (-64, &[0x7F]),
            (64, &[0x80, 0x01]),
            (300, &[0xD8, 0x04]),
        ];
        for &(value, bytes) in cases {
            let mut buf = ByteBuffer::new();
            let written = buf.write_var_i32(value);
            assert_eq!(buf.as_slice(), bytes, "value {value}");
            assert_eq!(written, bytes.len());
        }
    }

    #[test]
    fn fixed_width_is_big_endian() {
        let mut buf = ByteBuffer::new();
        buf.write_i16(1);
        buf.write_i32(1);
        buf.write_i64(1);
        assert_eq!(
            buf.as_slice(),
            &[0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn read_never_passes_write() {
        let mut buf = ByteBuffer::new();
        buf.write_u8(7);
        assert_eq!(buf.read_u8().unwrap(), 7);
        let err = buf.read_u8().unwrap_err();
        assert!(err.is_buffer_underflow());
    }

    #[test]
    fn bool_reads_nonzero_as_true() {
        let mut buf = ByteBuffer::from(&[0u8, 1, 2, 0xFF][..]);
        assert!(!buf.read_bool().unwrap());
        assert!(buf.read_bool().unwrap());
        assert!(buf.read_bool().unwrap());
        assert!(buf.read_bool().unwrap());
    }

    #[test]
    fn compact_shifts_unread_span() {
        let mut buf = ByteBuffer::new();
        buf.write_bytes(&[1, 2, 3, 4, 5]);
        buf.skip(2).unwrap();
        buf.compact();
        assert_eq!(buf.read_pos(), 0);
        assert_eq!(buf.write_pos(), 3);
        assert_eq!(buf.unread(), &[3, 4, 5]);
    }

    #[test]
    fn growth_spills_inline_storage_to_heap() {
        let mut buf = ByteBuffer::new();
        for i in 0..1000u32 {
            buf.write_u8(i as u8);
        }
        for i in 0..1000u32 {
            assert_eq!(buf.read_u8().unwrap(), i as u8);
        }
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let mut buf = ByteBuffer::new();
        buf.write_var_i32(2);
        buf.write_bytes(&[0xC0, 0x2F]);
        assert!(buf.read_string().unwrap_err().is_invalid_utf_8());
    }

    #[test]
    fn string_rejects_negative_length() {
        let mut buf = ByteBuffer::new();
        buf.write_var_i32(-1);
        assert!(buf.read_string().unwrap_err().is_invalid_length());
    }
}

//! Zigzag and varint size helpers for the compact integer encoding.
//!
//! The wire layout is the classic base-128 scheme: 7 payload bits per byte,
//! least-significant group first, MSB set on every byte except the last.
//! Signed values are zigzag-mapped beforehand so that small-magnitude
//! negative numbers stay short. The read/write loops themselves live on
//! [`ByteBuffer`](crate::buffer::ByteBuffer), which owns the cursors.

/// Longest legal encoding of a 32-bit value.
pub const MAX_VARINT32_BYTES: usize = 5;
/// Longest legal encoding of a 64-bit value.
pub const MAX_VARINT64_BYTES: usize = 10;

/// Map a signed 32-bit value to its zigzag-encoded unsigned form.
///
/// `0 -> 0`, `-1 -> 1`, `1 -> 2`, `-2 -> 3`, ... so small magnitudes of
/// either sign encode to small unsigned values.
#[inline]
pub fn zigzag32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag32`].
#[inline]
pub fn unzigzag32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Map a signed 64-bit value to its zigzag-encoded unsigned form.
#[inline]
pub fn zigzag64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag64`].
#[inline]
pub fn unzigzag64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Encoded size in bytes of an unsigned value under the varint scheme.
///
/// Useful for preallocating buffers or estimating storage requirements.
pub fn encoded_len_u64(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let sig_bits = 64 - value.leading_zeros() as usize;
    sig_bits.div_ceil(7)
}

/// 32-bit counterpart of [`encoded_len_u64`].
pub fn encoded_len_u32(value: u32) -> usize {
    encoded_len_u64(value as u64)
}

//! Recursive serialization of typed values over a [`ByteBuffer`].
//!
//! The codec walks a value tree and emits a self-describing byte sequence:
//! scalars through the buffer's fixed or varint writers, strings and lists
//! with varint length prefixes, optional fields behind a one-byte presence
//! flag, and composite records as their fields in fixed declaration order.
//! Decoding mirrors encoding exactly, consuming the buffer cursor-
//! sequentially.
//!
//! Encoding policy
//! - `i32`/`i64` default to the compact zigzag varint form; wrap a field in
//!   [`Fixed32`]/[`Fixed64`] when it must occupy its full width on the wire.
//! - Field order within a record is part of the wire contract. There are no
//!   per-field tags, so a reader's field list must match the writer's.
//!
//! Untrusted input
//! - Wire bytes may be hostile, so nesting depth is bounded by an injected
//!   limit ([`DEFAULT_MAX_DEPTH`] unless overridden) instead of the call
//!   stack, and wire-supplied element counts are never trusted for
//!   preallocation. Exceeding the limit fails with
//!   [`WireError::MaxDepthExceeded`].
//!
//! Composite record implementations wrap their field walk in
//! [`Encoder::nested`]/[`Decoder::nested`] so that recursion through records,
//! lists of records, and so on is counted once per level:
//!
//! ```
//! use picowire::{ByteBuffer, Decode, Decoder, Encode, Encoder, WireError, WireResult};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! impl Encode for Point {
//!     fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
//!         enc.nested(|enc| {
//!             self.x.encode(enc)?;
//!             self.y.encode(enc)
//!         })
//!     }
//! }
//!
//! impl Decode for Point {
//!     fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
//!         dec.nested(|dec| {
//!             Ok(Point { x: i32::decode(dec)?, y: i32::decode(dec)? })
//!         })
//!     }
//! }
//!
//! let mut buf = ByteBuffer::new();
//! picowire::encode(&Point { x: -1, y: 300 }, &mut buf)?;
//! let back: Point = picowire::decode(&mut buf)?;
//! assert_eq!(back, Point { x: -1, y: 300 });
//! # Ok::<(), WireError>(())
//! ```
use std::collections::BTreeMap;

use crate::buffer::ByteBuffer;
use crate::error::{WireError, WireResult};
use crate::list::DynamicList;

pub mod registry;

pub use registry::{Polymorphic, TypeRegistry};

/// Default bound on value-tree nesting for both encode and decode.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Never preallocate more than this many elements on the say-so of a wire
/// count; longer lists grow organically while decoding.
const MAX_TRUSTED_PREALLOC: usize = 1024;

/// Types that can write themselves into an [`Encoder`].
pub trait Encode {
    /// Append this value's wire encoding.
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()>;
}

/// Types that can reconstruct themselves from a [`Decoder`].
pub trait Decode: Sized {
    /// Consume this value's wire encoding.
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self>;
}

/// Encode `value` into `buffer` with the default depth limit.
pub fn encode<T: Encode + ?Sized>(value: &T, buffer: &mut ByteBuffer) -> WireResult<()> {
    value.encode(&mut Encoder::new(buffer))
}

/// Decode a `T` from `buffer` with the default depth limit.
pub fn decode<T: Decode>(buffer: &mut ByteBuffer) -> WireResult<T> {
    T::decode(&mut Decoder::new(buffer))
}

/// Write half of the codec: a buffer plus the current nesting depth.
pub struct Encoder<'a> {
    buf: &'a mut ByteBuffer,
    depth: usize,
    max_depth: usize,
}

impl<'a> Encoder<'a> {
    /// Wrap `buf` with the default depth limit.
    pub fn new(buf: &'a mut ByteBuffer) -> Self {
        Self::with_max_depth(buf, DEFAULT_MAX_DEPTH)
    }

    /// Wrap `buf` with an explicit depth limit.
    pub fn with_max_depth(buf: &'a mut ByteBuffer, max_depth: usize) -> Self {
        Self {
            buf,
            depth: 0,
            max_depth,
        }
    }

    /// Direct access to the underlying buffer.
    pub fn buffer(&mut self) -> &mut ByteBuffer {
        self.buf
    }

    /// Run `f` one nesting level deeper, failing with
    /// [`WireError::MaxDepthExceeded`] at the limit.
    pub fn nested<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> WireResult<R>,
    ) -> WireResult<R> {
        if self.depth == self.max_depth {
            return Err(WireError::MaxDepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Write a polymorphic value: its varint type tag, then its fields.
    pub fn write_tagged(&mut self, value: &dyn Polymorphic) -> WireResult<()> {
        self.buf.write_var_i32(value.type_tag());
        value.encode(self)
    }
}

/// Read half of the codec: a buffer plus the current nesting depth.
pub struct Decoder<'a> {
    buf: &'a mut ByteBuffer,
    depth: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    /// Wrap `buf` with the default depth limit.
    pub fn new(buf: &'a mut ByteBuffer) -> Self {
        Self::with_max_depth(buf, DEFAULT_MAX_DEPTH)
    }

    /// Wrap `buf` with an explicit depth limit.
    pub fn with_max_depth(buf: &'a mut ByteBuffer, max_depth: usize) -> Self {
        Self {
            buf,
            depth: 0,
            max_depth,
        }
    }

    /// Direct access to the underlying buffer.
    pub fn buffer(&mut self) -> &mut ByteBuffer {
        self.buf
    }

    /// Run `f` one nesting level deeper, failing with
    /// [`WireError::MaxDepthExceeded`] at the limit.
    pub fn nested<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> WireResult<R>,
    ) -> WireResult<R> {
        if self.depth == self.max_depth {
            return Err(WireError::MaxDepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Read a varint count prefix, rejecting negatives.
fn read_count(dec: &mut Decoder<'_>) -> WireResult<usize> {
    let count = dec.buffer().read_var_i32()?;
    if count < 0 {
        return Err(WireError::InvalidLength { len: count as i64 });
    }
    Ok(count as usize)
}

impl Encode for bool {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_bool(*self);
        Ok(())
    }
}

impl Decode for bool {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.buffer().read_bool()
    }
}

impl Encode for i8 {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_u8(*self as u8);
        Ok(())
    }
}

impl Decode for i8 {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        Ok(dec.buffer().read_u8()? as i8)
    }
}

impl Encode for i16 {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_i16(*self);
        Ok(())
    }
}

impl Decode for i16 {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.buffer().read_i16()
    }
}

impl Encode for i32 {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_var_i32(*self);
        Ok(())
    }
}

impl Decode for i32 {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.buffer().read_var_i32()
    }
}

impl Encode for i64 {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_var_i64(*self);
        Ok(())
    }
}

impl Decode for i64 {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.buffer().read_var_i64()
    }
}

impl Encode for f32 {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_f32(*self);
        Ok(())
    }
}

impl Decode for f32 {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.buffer().read_f32()
    }
}

impl Encode for f64 {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_f64(*self);
        Ok(())
    }
}

impl Decode for f64 {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.buffer().read_f64()
    }
}

/// Explicitly fixed-width 32-bit field, four big-endian bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed32(pub i32);

/// Explicitly fixed-width 64-bit field, eight big-endian bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed64(pub i64);

impl From<i32> for Fixed32 {
    fn from(value: i32) -> Self {
        Fixed32(value)
    }
}

impl From<i64> for Fixed64 {
    fn from(value: i64) -> Self {
        Fixed64(value)
    }
}

impl Encode for Fixed32 {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_i32(self.0);
        Ok(())
    }
}

impl Decode for Fixed32 {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        Ok(Fixed32(dec.buffer().read_i32()?))
    }
}

impl Encode for Fixed64 {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_i64(self.0);
        Ok(())
    }
}

impl Decode for Fixed64 {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        Ok(Fixed64(dec.buffer().read_i64()?))
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_str(self);
        Ok(())
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.buffer().write_str(self);
        Ok(())
    }
}

impl Decode for String {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.buffer().read_string()
    }
}

impl<T: Encode> Encode for Option<T> {
    /// One presence byte (`0` absent, `1` present), then the value.
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        match self {
            None => {
                enc.buffer().write_bool(false);
                Ok(())
            }
            Some(value) => {
                enc.buffer().write_bool(true);
                value.encode(enc)
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        if dec.buffer().read_bool()? {
            Ok(Some(T::decode(dec)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        (*self).encode(enc)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        (**self).encode(enc)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        Ok(Box::new(T::decode(dec)?))
    }
}

fn encode_seq<'s, T: Encode + 's>(
    items: impl ExactSizeIterator<Item = &'s T>,
    enc: &mut Encoder<'_>,
) -> WireResult<()> {
    debug_assert!(items.len() <= i32::MAX as usize);
    enc.buffer().write_var_i32(items.len() as i32);
    enc.nested(|enc| {
        for item in items {
            item.encode(enc)?;
        }
        Ok(())
    })
}

impl<T: Encode> Encode for DynamicList<T> {
    /// Varint element count, then each element in order.
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        encode_seq(self.iter(), enc)
    }
}

impl<T: Decode> Decode for DynamicList<T> {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        let count = read_count(dec)?;
        dec.nested(|dec| {
            let mut list = DynamicList::with_capacity(count.min(MAX_TRUSTED_PREALLOC));
            for _ in 0..count {
                list.push(T::decode(dec)?);
            }
            Ok(list)
        })
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        encode_seq(self.iter(), enc)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        let count = read_count(dec)?;
        dec.nested(|dec| {
            let mut items = Vec::with_capacity(count.min(MAX_TRUSTED_PREALLOC));
            for _ in 0..count {
                items.push(T::decode(dec)?);
            }
            Ok(items)
        })
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    /// Varint pair count, then alternating key/value. `BTreeMap` rather than
    /// a hash map so the encoding order is deterministic.
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        debug_assert!(self.len() <= i32::MAX as usize);
        enc.buffer().write_var_i32(self.len() as i32);
        enc.nested(|enc| {
            for (key, value) in self {
                key.encode(enc)?;
                value.encode(enc)?;
            }
            Ok(())
        })
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        let count = read_count(dec)?;
        dec.nested(|dec| {
            let mut map = BTreeMap::new();
            for _ in 0..count {
                let key = K::decode(dec)?;
                let value = V::decode(dec)?;
                map.insert(key, value);
            }
            Ok(map)
        })
    }
}

//! Picowire: a compact, cursor-based binary wire format.
//!
//! This crate defines how structured values — primitives, strings, lists,
//! and nested composite records — are written to and read from a contiguous
//! byte buffer, independent of any host language. Two endpoints compiled
//! from different implementations of the format exchange byte-identical
//! wire data.
//!
//! Three building blocks:
//! - [`ByteBuffer`]: growable byte storage with a write cursor and a read
//!   cursor, primitive fixed-width big-endian writers/readers, and compact
//!   zigzag varint encodings (see [`buffer`]).
//! - [`DynamicList`]: growable ordered sequence with amortized O(1) append
//!   and order-preserving removal, the in-memory form of wire lists (see
//!   [`list`]).
//! - The codec: [`Encode`]/[`Decode`] traits walked recursively by
//!   [`Encoder`]/[`Decoder`], with a [`TypeRegistry`] dispatching
//!   polymorphic records by varint type tag and an injected depth limit
//!   guarding against hostile nesting (see [`codec`]).
//!
//! Wire shape
//! - Fixed-width scalars are big-endian; `i32`/`i64` default to zigzag
//!   varints (1–5 / 1–10 bytes, least-significant 7-bit group first).
//! - Strings and lists carry a varint length/count prefix, no terminator.
//! - Records encode their fields in fixed declaration order; every optional
//!   field is preceded by a one-byte presence flag. Field order is part of
//!   the wire contract.
//!
//! Errors are never silent: reads past the write cursor, unterminated
//! varints, unknown type tags, and over-deep nesting each surface a precise
//! [`WireError`] kind.
//!
//! ```
//! use picowire::{ByteBuffer, WireError};
//!
//! let mut buf = ByteBuffer::new();
//! buf.write_var_i32(-64); // one byte, thanks to zigzag
//! buf.write_str("wire");
//! assert_eq!(buf.read_var_i32()?, -64);
//! assert_eq!(buf.read_string()?, "wire");
//! # Ok::<(), WireError>(())
//! ```
#![deny(missing_docs)]

/// Cursor-based byte storage and the primitive wire encodings.
pub mod buffer;
/// Recursive value codec: traits, encoder/decoder, polymorphic registry.
pub mod codec;
/// Error taxonomy and the crate-wide result alias.
pub mod error;
/// Growable ordered sequence backing wire list fields.
pub mod list;

pub use buffer::ByteBuffer;
pub use codec::{
    DEFAULT_MAX_DEPTH, Decode, Decoder, Encode, Encoder, Fixed32, Fixed64, Polymorphic,
    TypeRegistry, decode, encode,
};
pub use error::{WireError, WireResult};
pub use list::DynamicList;

//! Error taxonomy shared by the buffer, list, and codec layers.
//!
//! Every failure is local, deterministic, and unrecoverable at this layer:
//! the caller decides whether to drop the connection, log, or retry higher
//! up. No operation returns a sentinel value in place of an error.
use strum::EnumIs;
use thiserror::Error;

/// Result alias used across the crate.
pub type WireResult<T> = Result<T, WireError>;

/// Failure kinds surfaced by buffer reads, list accesses, and decoding.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum WireError {
    /// A read reached past the write cursor.
    #[error("buffer underflow: needed {needed} byte(s) but only {remaining} remain unread")]
    BufferUnderflow {
        /// Number of bytes the read required.
        needed: usize,
        /// Number of unread bytes remaining in the buffer.
        remaining: usize,
    },

    /// A varint continuation chain never terminated within the ceiling for
    /// the target integer width.
    #[error("malformed varint: no terminating byte within {max_bytes} byte(s)")]
    MalformedVarInt {
        /// Maximum number of encoded bytes allowed for the target width.
        max_bytes: usize,
    },

    /// A list access outside `[0, len)`.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the list.
        len: usize,
    },

    /// A polymorphic type tag with no registered decoder.
    #[error("unknown type tag {tag}: no decoder registered")]
    UnknownTypeTag {
        /// The unrecognized type tag.
        tag: i32,
    },

    /// Value nesting exceeded the configured limit during encode or decode.
    #[error("maximum nesting depth {limit} exceeded")]
    MaxDepthExceeded {
        /// The configured nesting depth limit.
        limit: usize,
    },

    /// A length prefix that cannot describe a valid payload.
    #[error("invalid length prefix {len}")]
    InvalidLength {
        /// The offending length value.
        len: i64,
    },

    /// A string payload that is not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
}

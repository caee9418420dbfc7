//! Tag-based dispatch for polymorphic composite records.
//!
//! When a field's declared type admits several concrete record types, the
//! wire carries a varint type tag ahead of the fields. The registry maps
//! each tag to a decode function producing the caller's base representation
//! `B` (typically a boxed trait object or an enum). It is explicit,
//! process-scoped state: built once at startup and passed by reference into
//! decode calls, never discovered through global runtime machinery.
use std::collections::HashMap;

use log::{trace, warn};

use crate::codec::{Decoder, Encode};
use crate::error::{WireError, WireResult};

/// Decode function registered for one concrete record type.
pub type DecodeFn<B> = fn(&mut Decoder<'_>) -> WireResult<B>;

/// Encodable values that carry a wire type tag.
pub trait Polymorphic: Encode {
    /// The varint tag written ahead of this value's fields.
    fn type_tag(&self) -> i32;
}

/// Maps varint type tags to decoders for a polymorphic base type `B`.
pub struct TypeRegistry<B> {
    decoders: HashMap<i32, DecodeFn<B>>,
}

impl<B> TypeRegistry<B> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register `decoder` for `tag`. Re-registering a tag replaces the
    /// previous decoder.
    pub fn register(&mut self, tag: i32, decoder: DecodeFn<B>) {
        if self.decoders.insert(tag, decoder).is_some() {
            warn!("decoder for type tag {tag} replaced");
        } else {
            trace!("decoder registered for type tag {tag}");
        }
    }

    /// Whether a decoder is registered for `tag`.
    pub fn contains(&self, tag: i32) -> bool {
        self.decoders.contains_key(&tag)
    }

    /// Number of registered decoders.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether no decoders are registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Read a varint type tag and dispatch to its registered decoder.
    ///
    /// Fails with [`WireError::UnknownTypeTag`] when the tag has no
    /// registration. Depth accounting is left to the concrete decoder,
    /// which walks its fields inside [`Decoder::nested`].
    pub fn decode(&self, dec: &mut Decoder<'_>) -> WireResult<B> {
        let tag = dec.buffer().read_var_i32()?;
        let decoder = self
            .decoders
            .get(&tag)
            .ok_or(WireError::UnknownTypeTag { tag })?;
        decoder(dec)
    }
}

impl<B> Default for TypeRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> std::fmt::Debug for TypeRegistry<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.decoders.keys().collect();
        tags.sort();
        f.debug_struct("TypeRegistry").field("tags", &tags).finish()
    }
}

//! Growable ordered sequence used for protocol list fields.
//!
//! Role
//! - [`DynamicList`] is the in-memory representation of wire lists and a
//!   general-purpose container: amortized O(1) append, O(1) indexed access,
//!   and an order-preserving remove (the wire contract treats lists as
//!   sequences, so order matters).
//! - Fallible accessors return [`WireError::IndexOutOfRange`] instead of
//!   panicking, so decoders can surface bad indices like any other wire
//!   fault; slice-style `list[i]` indexing is still available for code that
//!   has already validated bounds.
//!
//! Performance
//! - Push/pop are O(1); `remove_at` shifts and is O(n); `swap_remove_at`
//!   trades order for O(1).
//! - Growth doubles capacity (minimum 4), matching the byte buffer's policy.
use std::slice::SliceIndex;

use crate::error::{WireError, WireResult};

/// Growable ordered sequence with bounds-checked, fallible accessors.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DynamicList<T> {
    items: Vec<T>,
}

impl<T> DynamicList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty list with at least `capacity` slots preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Current number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currently allocated capacity in elements.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Append `value` at the end, doubling capacity when full.
    pub fn push(&mut self, value: T) {
        if self.items.len() == self.items.capacity() {
            let new_cap = (self.items.capacity() * 2).max(4);
            self.items.reserve_exact(new_cap - self.items.len());
        }
        self.items.push(value);
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Borrow the element at `index`.
    pub fn get(&self, index: usize) -> WireResult<&T> {
        self.items.get(index).ok_or(WireError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Mutably borrow the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> WireResult<&mut T> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(WireError::IndexOutOfRange { index, len })
    }

    /// Replace the element at `index`, returning the previous value.
    pub fn set(&mut self, index: usize, value: T) -> WireResult<T> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Remove the element at `index`, shifting later elements left. O(n),
    /// order-preserving.
    pub fn remove_at(&mut self, index: usize) -> WireResult<T> {
        if index >= self.items.len() {
            return Err(WireError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Remove the element at `index` by swapping the last element into its
    /// place. O(1), order not preserved.
    pub fn swap_remove_at(&mut self, index: usize) -> WireResult<T> {
        if index >= self.items.len() {
            return Err(WireError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.swap_remove(index))
    }

    /// Drop all elements, keeping capacity for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Immutable slice of the elements.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Mutable slice of the elements.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Iterator over immutable references.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterator over mutable references.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T> Default for DynamicList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DynamicList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> From<Vec<T>> for DynamicList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> From<DynamicList<T>> for Vec<T> {
    fn from(list: DynamicList<T>) -> Self {
        list.items
    }
}

impl<T> AsRef<[T]> for DynamicList<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> std::ops::Deref for DynamicList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> std::ops::DerefMut for DynamicList<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> std::ops::Index<I> for DynamicList<T> {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        &self.items[index]
    }
}

impl<T, I: SliceIndex<[T]>> std::ops::IndexMut<I> for DynamicList<T> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        &mut self.items[index]
    }
}

impl<T> IntoIterator for DynamicList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynamicList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicList<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> FromIterator<T> for DynamicList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: Vec::from_iter(iter),
        }
    }
}

impl<T> Extend<T> for DynamicList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

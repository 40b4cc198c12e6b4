//! Ordered batches of effect descriptors.
//!
//! An [`Effects`] value is the effect sink of one cycle: descriptors are only
//! ever appended, never reordered, deduplicated, or executed here. The host
//! runtime receives the whole batch at the end of the cycle.

use std::slice;
use std::vec;

/// An append-only, order-preserving batch of effect descriptors.
///
/// `E` is opaque to the engine. A batch is "composable" by concatenation:
/// [`Effects::then`] keeps the left batch in front of the right one, which is
/// the only ordering rule the engine guarantees.
///
/// A `Vec` converts either way: `From<E>` also accepts a `Vec` as a single
/// descriptor. Unless the descriptor type is already fixed by the context,
/// name it (`Effects::<E>::from(vec)`) or `collect()` into `Effects<E>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Effects<E> {
    items: Vec<E>,
}

impl<E> Effects<E> {
    /// An empty batch.
    pub const fn none() -> Self {
        Self { items: Vec::new() }
    }

    /// A batch holding exactly one descriptor.
    pub fn one(effect: E) -> Self {
        Self {
            items: vec![effect],
        }
    }

    pub fn push(&mut self, effect: E) {
        self.items.push(effect);
    }

    /// Append another batch (or anything convertible into one) after the
    /// descriptors already held.
    pub fn append(&mut self, other: impl Into<Effects<E>>) {
        let mut other = other.into();
        self.items.append(&mut other.items);
    }

    /// Concatenate: `self` first, then `other`.
    pub fn then(mut self, other: impl Into<Effects<E>>) -> Self {
        self.append(other);
        self
    }

    /// Convert every descriptor, preserving order.
    ///
    /// Used to lift a child session's effects into the parent's descriptor
    /// type before composing.
    pub fn map<U, F>(self, f: F) -> Effects<U>
    where
        F: FnMut(E) -> U,
    {
        Effects {
            items: self.items.into_iter().map(f).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, E> {
        self.items.iter()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<E> {
        self.items
    }
}

impl<E> Default for Effects<E> {
    fn default() -> Self {
        Self::none()
    }
}

impl<E> From<E> for Effects<E> {
    fn from(effect: E) -> Self {
        Self::one(effect)
    }
}

impl<E> From<Option<E>> for Effects<E> {
    fn from(effect: Option<E>) -> Self {
        Self {
            items: effect.into_iter().collect(),
        }
    }
}

impl<E> From<Vec<E>> for Effects<E> {
    fn from(items: Vec<E>) -> Self {
        Self { items }
    }
}

impl<E> FromIterator<E> for Effects<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<E> Extend<E> for Effects<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<E> IntoIterator for Effects<E> {
    type Item = E;
    type IntoIter = vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a Effects<E> {
    type Item = &'a E;
    type IntoIter = slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Immutable states of a [`CowList`](crate::CowList).
use std::fmt;
use std::ops::Deref;

/// An immutable, fixed-length sequence of elements.
///
/// Writers build a snapshot privately and then publish it in one atomic
/// store. Once published, a snapshot never changes its contents or its
/// length, so any number of readers may hold on to it without
/// synchronization.
///
/// Snapshots are compared by identity ([`Arc::ptr_eq`](std::sync::Arc::ptr_eq)),
/// never by content: two snapshots with equal elements are still different
/// states of a list.
pub struct Snapshot<T> {
    elements: Box<[T]>,
}

impl<T> Snapshot<T> {
    /// Creates a snapshot with no elements.
    pub(crate) fn empty() -> Self {
        Self {
            elements: Box::default(),
        }
    }

    /// Returns the number of elements in the snapshot.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the snapshot contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns a reference to the element at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// Returns the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Returns an iterator over references to the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T: Clone> Snapshot<T> {
    /// Returns a fresh, independent copy of the elements.
    pub fn to_vec(&self) -> Vec<T> {
        self.elements.to_vec()
    }
}

impl<T> From<Vec<T>> for Snapshot<T> {
    fn from(elements: Vec<T>) -> Self {
        Self {
            elements: elements.into_boxed_slice(),
        }
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.elements
    }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

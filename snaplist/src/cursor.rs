//! Read-only traversal over one snapshot.
use std::fmt;
use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use crate::sync::Arc;

/// A bidirectional, read-only cursor over a range of one [`Snapshot`].
///
/// The cursor captures the snapshot that was live when it was created and
/// never rebinds to a newer one. Iterating is therefore always safe while
/// other threads mutate the list: the cursor keeps yielding exactly the
/// elements that were visible at creation time.
///
/// The position `idx` always lies in `from..=to`. Running off either end is
/// reported as [`Error::NoSuchElement`] by [`try_next`](Cursor::try_next) and
/// [`try_previous`](Cursor::try_previous), or as `None` by the `Option` forms.
pub struct Cursor<T> {
    snapshot: Arc<Snapshot<T>>,
    from: usize,
    to: usize,
    idx: usize,
}

impl<T> Cursor<T> {
    /// Creates a cursor over `snapshot[from..to]`, positioned at `idx`.
    ///
    /// Callers validate `from <= idx <= to <= snapshot.len()`.
    pub(crate) fn new(snapshot: Arc<Snapshot<T>>, from: usize, to: usize, idx: usize) -> Self {
        debug_assert!(from <= idx && idx <= to && to <= snapshot.len());
        Self {
            snapshot,
            from,
            to,
            idx,
        }
    }

    /// Returns the snapshot this cursor traverses.
    pub fn snapshot(&self) -> &Arc<Snapshot<T>> {
        &self.snapshot
    }

    /// Returns `true` if moving forward would yield an element.
    pub fn has_next(&self) -> bool {
        self.idx < self.to
    }

    /// Returns `true` if moving backward would yield an element.
    pub fn has_previous(&self) -> bool {
        self.idx > self.from
    }

    /// Returns the index, relative to the start of the range, of the element
    /// that [`try_next`](Cursor::try_next) would return.
    pub fn next_index(&self) -> usize {
        self.idx - self.from
    }

    /// Returns the index, relative to the start of the range, of the element
    /// that [`try_previous`](Cursor::try_previous) would return, or `None` at
    /// the start of the range.
    pub fn previous_index(&self) -> Option<usize> {
        self.next_index().checked_sub(1)
    }

    /// Always fails: a cursor cannot add to the snapshot it traverses.
    pub fn insert(&mut self, _value: T) -> Result<()> {
        Err(Error::UnsupportedOperation("insert"))
    }

    /// Always fails: a cursor cannot overwrite elements of its snapshot.
    pub fn replace(&mut self, _value: T) -> Result<()> {
        Err(Error::UnsupportedOperation("replace"))
    }

    /// Always fails: a cursor cannot remove elements from its snapshot.
    pub fn remove_current(&mut self) -> Result<()> {
        Err(Error::UnsupportedOperation("remove_current"))
    }
}

impl<T: Clone> Cursor<T> {
    /// Returns the next element and advances the cursor.
    pub fn try_next(&mut self) -> Result<T> {
        if !self.has_next() {
            return Err(Error::NoSuchElement);
        }
        let value = self.snapshot[self.idx].clone();
        self.idx += 1;
        Ok(value)
    }

    /// Moves the cursor back and returns the element it moved over.
    pub fn try_previous(&mut self) -> Result<T> {
        if !self.has_previous() {
            return Err(Error::NoSuchElement);
        }
        self.idx -= 1;
        Ok(self.snapshot[self.idx].clone())
    }

    /// Like [`try_previous`](Cursor::try_previous), returning `None` at the start.
    pub fn previous(&mut self) -> Option<T> {
        self.try_previous().ok()
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.to - self.idx;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Cursor<T> {}

impl<T: Clone> FusedIterator for Cursor<T> {}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            from: self.from,
            to: self.to,
            idx: self.idx,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("next_index", &self.next_index())
            .field("range", &&self.snapshot[self.from..self.to])
            .finish()
    }
}

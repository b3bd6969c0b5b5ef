//! Bounded windows onto a [`CowList`].
use std::fmt;

use tracing::debug;

use crate::cursor::Cursor;
use crate::error::{check_element_index, check_position_index, check_range, Error, Result};
use crate::list::CowList;
use crate::sequence::Sequence;
use crate::snapshot::Snapshot;
use crate::sync::Arc;

/// The snapshot a view was last synchronized with, and the view's bounds
/// within it.
struct Slice<T> {
    expected: Arc<Snapshot<T>>,
    from: usize,
    to: usize,
}

impl<T> Slice<T> {
    fn new(expected: Arc<Snapshot<T>>, from: usize, to: usize) -> Self {
        Self { expected, from, to }
    }

    fn len(&self) -> usize {
        self.to - self.from
    }

    fn elements(&self) -> &[T] {
        &self.expected[self.from..self.to]
    }
}

/// A window `from..to` onto a [`CowList`].
///
/// A view remembers the snapshot it was built against. Every operation first
/// compares that snapshot, by identity, with the list's live snapshot and
/// fails with [`Error::ConcurrentModification`] if they differ. The list may
/// only change underneath a view through the view itself: mutations made
/// through the view run under the list's writer lock and rebind the view to
/// the snapshot they publish. Mutations made any other way, directly on the
/// list or through a sibling view, invalidate this view for good.
///
/// Indices passed to a view are relative to its start and are checked
/// against its own length.
///
/// # Examples
///
/// ```
/// use snaplist::{CowList, Error};
///
/// let list = CowList::from(vec!["A", "B", "C", "D"]);
/// let mut view = list.view(1, 3).unwrap();
/// assert_eq!(view.get(0), Ok("B"));
///
/// view.push("X").unwrap();
/// assert_eq!(view.len(), Ok(3));
/// assert_eq!(list.to_vec(), vec!["A", "B", "C", "X", "D"]);
///
/// list.push("E");
/// assert_eq!(view.len(), Err(Error::ConcurrentModification));
/// ```
pub struct View<'a, T> {
    list: &'a CowList<T>,
    slice: Slice<T>,
}

impl<'a, T> View<'a, T> {
    /// Creates a view over `snapshot[from..to]`. Callers validate the range.
    pub(crate) fn new(
        list: &'a CowList<T>,
        snapshot: Arc<Snapshot<T>>,
        from: usize,
        to: usize,
    ) -> Self {
        Self {
            list,
            slice: Slice::new(snapshot, from, to),
        }
    }

    /// Returns the slice if its snapshot is still the list's live snapshot.
    fn checked(&self) -> Result<&Slice<T>> {
        let live = self.list.load();
        if Arc::ptr_eq(&*live, &self.slice.expected) {
            Ok(&self.slice)
        } else {
            debug!(
                expected_len = self.slice.expected.len(),
                live_len = live.len(),
                "view detected a modification made outside of it"
            );
            Err(Error::ConcurrentModification)
        }
    }

    /// Runs a list mutation at offset-adjusted indices and rebinds the view
    /// to the resulting snapshot.
    ///
    /// `mutation` receives the list and the view's current bounds, and
    /// returns its result along with the view's new end bound.
    fn mutate<R, F>(&mut self, mutation: F) -> Result<R>
    where
        F: FnOnce(&CowList<T>, usize, usize) -> Result<(R, usize)>,
    {
        let list = self.list;
        let _guard = list.lock();
        self.checked()?;
        let from = self.slice.from;
        let (result, to) = mutation(list, from, self.slice.to)?;
        self.slice = Slice::new(list.snapshot(), from, to);
        Ok(result)
    }

    /// Returns the number of elements in the view.
    pub fn len(&self) -> Result<usize> {
        Ok(self.checked()?.len())
    }

    /// Returns `true` if the view has no elements.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns a cursor over the view, positioned before its first element.
    pub fn cursor(&self) -> Result<Cursor<T>> {
        let slice = self.checked()?;
        Ok(Cursor::new(
            Arc::clone(&slice.expected),
            slice.from,
            slice.to,
            slice.from,
        ))
    }

    /// Returns a cursor over the view, positioned before `index`.
    pub fn cursor_at(&self, index: usize) -> Result<Cursor<T>> {
        let slice = self.checked()?;
        check_position_index(index, slice.len())?;
        Ok(Cursor::new(
            Arc::clone(&slice.expected),
            slice.from,
            slice.to,
            slice.from + index,
        ))
    }

    /// Returns a view of `from..to` within this view.
    ///
    /// The child is validated against the list directly, so it notices
    /// modifications made through any path, including through this view.
    pub fn subview(&self, from: usize, to: usize) -> Result<View<'a, T>> {
        let slice = self.checked()?;
        check_range(from, to, slice.len())?;
        Ok(View::new(
            self.list,
            Arc::clone(&slice.expected),
            slice.from + from,
            slice.from + to,
        ))
    }
}

impl<'a, T: Clone> View<'a, T> {
    /// Returns a copy of the element at `index` within the view.
    pub fn get(&self, index: usize) -> Result<T> {
        let slice = self.checked()?;
        check_element_index(index, slice.len())?;
        Ok(slice.expected[slice.from + index].clone())
    }

    /// Returns a fresh copy of the elements of the view.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.checked()?.elements().to_vec())
    }

    /// Appends `value` at the end of the view, shifting the rest of the list.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.mutate(|list, _, to| {
            list.insert(to, value)?;
            Ok(((), to + 1))
        })
    }

    /// Inserts `value` at `index` within the view.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        self.mutate(|list, from, to| {
            check_position_index(index, to - from)?;
            list.insert(from + index, value)?;
            Ok(((), to + 1))
        })
    }

    /// Appends every element of `values` at the end of the view. Returns
    /// `true` if the list changed.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<bool> {
        let incoming: Vec<T> = values.into_iter().collect();
        let added = incoming.len();
        self.mutate(|list, _, to| {
            let changed = list.insert_all(to, incoming)?;
            Ok((changed, to + added))
        })
    }

    /// Inserts every element of `values` at `index` within the view.
    pub fn insert_all<I>(&mut self, index: usize, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        let incoming: Vec<T> = values.into_iter().collect();
        let added = incoming.len();
        self.mutate(|list, from, to| {
            check_position_index(index, to - from)?;
            let changed = list.insert_all(from + index, incoming)?;
            Ok((changed, to + added))
        })
    }

    /// Removes and returns the element at `index` within the view.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.mutate(|list, from, to| {
            check_element_index(index, to - from)?;
            let removed = list.remove_at(from + index)?;
            Ok((removed, to - 1))
        })
    }

    /// Replaces the element at `index` within the view, returning the previous element.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        self.mutate(|list, from, to| {
            check_element_index(index, to - from)?;
            let previous = list.set(from + index, value)?;
            Ok((previous, to))
        })
    }

    /// Removes every element of the view from the list.
    pub fn clear(&mut self) -> Result<()> {
        self.mutate(|list, from, to| {
            list.remove_matching_range(from, to, |_| true, false);
            Ok(((), from))
        })
    }

    /// Removes elements of the view that match, or keeps only those that
    /// match when `retain` is `true`. Returns the number of elements removed.
    pub fn remove_matching<F>(&mut self, matches: F, retain: bool) -> Result<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.mutate(|list, from, to| {
            let removed = list.remove_matching_range(from, to, matches, retain);
            Ok((removed, to - removed))
        })
    }

    /// Removes every element of the view for which `predicate` returns `true`.
    pub fn remove_if<F: FnMut(&T) -> bool>(&mut self, predicate: F) -> Result<usize> {
        self.remove_matching(predicate, false)
    }
}

impl<'a, T: Clone + PartialEq> View<'a, T> {
    /// Returns `true` if the view contains `value`.
    pub fn contains(&self, value: &T) -> Result<bool> {
        Ok(self.checked()?.elements().contains(value))
    }

    /// Returns the index, within the view, of the first occurrence of `value`.
    pub fn index_of(&self, value: &T) -> Result<Option<usize>> {
        Ok(self.checked()?.elements().iter().position(|e| e == value))
    }

    /// Returns the index, within the view, of the last occurrence of `value`.
    pub fn last_index_of(&self, value: &T) -> Result<Option<usize>> {
        Ok(self.checked()?.elements().iter().rposition(|e| e == value))
    }

    /// Removes the first occurrence of `value` within the view. Returns
    /// `true` if it was present.
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        self.mutate(|list, from, to| {
            let found = list.load()[from..to].iter().position(|e| e == value);
            match found {
                Some(index) => {
                    list.remove_at(from + index)?;
                    Ok((true, to - 1))
                }
                None => Ok((false, to)),
            }
        })
    }

    /// Removes every element of the view equal to some element of `values`.
    pub fn remove_all(&mut self, values: &[T]) -> Result<usize> {
        self.remove_matching(|e| values.contains(e), false)
    }

    /// Keeps only the elements of the view equal to some element of `values`.
    pub fn retain_all(&mut self, values: &[T]) -> Result<usize> {
        self.remove_matching(|e| values.contains(e), true)
    }
}

impl<'a, T: Clone> Sequence for View<'a, T> {
    type Item = T;

    fn len(&self) -> Result<usize> {
        View::len(self)
    }

    fn get(&self, index: usize) -> Result<T> {
        View::get(self, index)
    }

    fn cursor(&self) -> Result<Cursor<T>> {
        View::cursor(self)
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for View<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("from", &self.slice.from)
            .field("to", &self.slice.to)
            .field("elements", &self.slice.elements())
            .finish()
    }
}

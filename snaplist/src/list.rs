//! A copy-on-write list.
//!
//! See [`CowList`].
use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use crate::cursor::Cursor;
use crate::error::{check_element_index, check_position_index, check_range, Error, Result};
use crate::sequence::Sequence;
use crate::snapshot::Snapshot;
use crate::sync::{self, Arc, ArcSwap, Guard, ReentrantMutex, ReentrantMutexGuard};
use crate::view::View;

/// A thread-safe ordered list with lock-free, always-consistent reads.
///
/// The list holds a single atomically replaceable reference to its current
/// [`Snapshot`]. Reads load that reference once, with acquire ordering, and
/// operate only on the snapshot they loaded, so a read never observes a
/// partially applied write and never blocks.
///
/// Writes are serialized by one reentrant lock. Every mutation copies the
/// live snapshot into a private buffer, applies its change, and publishes the
/// result with a single release store. A mutation that fails, or that turns
/// out to change nothing, publishes nothing.
///
/// Callbacks passed to a mutation, such as the predicate of
/// [`remove_if`](CowList::remove_if), run while the writer lock is held.
/// They must not mutate the list themselves: the outer mutation panics
/// rather than overwrite their change.
///
/// Mutations are `O(n)` in the length of the list. The structure suits
/// workloads where reads vastly outnumber writes.
///
/// # Examples
///
/// ```
/// use snaplist::CowList;
///
/// let list = CowList::from(vec!["a", "b", "c"]);
/// let cursor = list.cursor();
///
/// list.push("d");
/// assert_eq!(list.len(), 4);
///
/// // The cursor still sees the list as it was when the cursor was created.
/// assert_eq!(cursor.collect::<Vec<_>>(), vec!["a", "b", "c"]);
/// ```
pub struct CowList<T> {
    current: ArcSwap<Snapshot<T>>,
    lock: ReentrantMutex<()>,
}

impl<T> CowList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::from_shared(Arc::new(Snapshot::empty()))
    }

    fn from_shared(snapshot: Arc<Snapshot<T>>) -> Self {
        Self {
            current: ArcSwap::new(snapshot),
            lock: ReentrantMutex::new(()),
        }
    }

    /// Returns the live snapshot.
    ///
    /// All reads against the returned snapshot observe one consistent state,
    /// regardless of what writers do afterwards.
    pub fn snapshot(&self) -> Arc<Snapshot<T>> {
        self.current.load_full()
    }

    /// Borrows the live snapshot without bumping its reference count.
    pub(crate) fn load(&self) -> Guard<Arc<Snapshot<T>>> {
        self.current.load()
    }

    /// Acquires the writer lock. The lock is reentrant, so mutations may be
    /// called while it is held.
    pub(crate) fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Publishes a new snapshot. Must be called with the writer lock held.
    ///
    /// # Panics
    ///
    /// Panics if `previous` is no longer the live snapshot. Since the lock
    /// is reentrant, that only happens when a callback run by `operation`
    /// mutated this list, and publishing would discard that write.
    fn publish(&self, operation: &'static str, previous: &Snapshot<T>, elements: Vec<T>) {
        sync::yield_point();
        assert!(
            std::ptr::eq(&**self.load(), previous),
            "`{operation}` raced with a mutation made from inside its own callback"
        );
        trace!(
            op = operation,
            old_len = previous.len(),
            new_len = elements.len(),
            "publishing snapshot"
        );
        self.current.store(Arc::new(Snapshot::from(elements)));
    }

    /// Returns the number of elements in the live snapshot.
    pub fn len(&self) -> usize {
        self.load().len()
    }

    /// Returns `true` if the live snapshot has no elements.
    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    /// Returns a cursor over the whole list, positioned before the first element.
    pub fn cursor(&self) -> Cursor<T> {
        let snapshot = self.snapshot();
        let len = snapshot.len();
        Cursor::new(snapshot, 0, len, 0)
    }

    /// Returns a cursor over the whole list, positioned before `index`.
    ///
    /// `index` may equal the length of the list, producing a cursor that is
    /// only able to move backwards.
    pub fn cursor_at(&self, index: usize) -> Result<Cursor<T>> {
        let snapshot = self.snapshot();
        let len = snapshot.len();
        check_position_index(index, len)?;
        Ok(Cursor::new(snapshot, 0, len, index))
    }

    /// Returns a view of the elements in `from..to`.
    ///
    /// The view is bound to the live snapshot. Mutations made through the
    /// view keep it in sync; any other mutation of the list makes the view
    /// fail with [`Error::ConcurrentModification`].
    pub fn view(&self, from: usize, to: usize) -> Result<View<'_, T>> {
        let snapshot = self.snapshot();
        check_range(from, to, snapshot.len())?;
        Ok(View::new(self, snapshot, from, to))
    }

    /// Removes every element.
    pub fn clear(&self) {
        let _guard = self.lock();
        let current = self.snapshot();
        if current.is_empty() {
            return;
        }
        self.publish("clear", &current, Vec::new());
    }
}

impl<T: Clone> CowList<T> {
    /// Creates a list holding a copy of `elements`.
    pub fn from_slice(elements: &[T]) -> Self {
        Self::from(elements.to_vec())
    }

    /// Returns a copy of the element at `index`.
    pub fn get(&self, index: usize) -> Result<T> {
        let snapshot = self.load();
        snapshot.get(index).cloned().ok_or(Error::OutOfRange {
            index,
            len: snapshot.len(),
        })
    }

    /// Returns a fresh copy of the contents. Changing the copy has no effect
    /// on the list.
    pub fn to_vec(&self) -> Vec<T> {
        self.load().to_vec()
    }

    /// Returns an iterator over the live snapshot. Same as [`cursor`](CowList::cursor).
    pub fn iter(&self) -> Cursor<T> {
        self.cursor()
    }

    /// Appends `value` to the end of the list.
    pub fn push(&self, value: T) {
        let _guard = self.lock();
        let current = self.snapshot();
        let mut elements = Vec::with_capacity(current.len() + 1);
        elements.extend_from_slice(&current);
        elements.push(value);
        self.publish("push", &current, elements);
    }

    /// Inserts `value` at `index`, shifting later elements to the right.
    pub fn insert(&self, index: usize, value: T) -> Result<()> {
        let _guard = self.lock();
        let current = self.snapshot();
        check_position_index(index, current.len())?;
        let mut elements = Vec::with_capacity(current.len() + 1);
        elements.extend_from_slice(&current[..index]);
        elements.push(value);
        elements.extend_from_slice(&current[index..]);
        self.publish("insert", &current, elements);
        Ok(())
    }

    /// Appends every element of `values`. Returns `true` if the list changed.
    pub fn extend<I: IntoIterator<Item = T>>(&self, values: I) -> bool {
        let incoming: Vec<T> = values.into_iter().collect();
        if incoming.is_empty() {
            return false;
        }
        let _guard = self.lock();
        let current = self.snapshot();
        let mut elements = Vec::with_capacity(current.len() + incoming.len());
        elements.extend_from_slice(&current);
        elements.extend(incoming);
        self.publish("extend", &current, elements);
        true
    }

    /// Inserts every element of `values` at `index`, in order. Returns `true`
    /// if the list changed.
    pub fn insert_all<I: IntoIterator<Item = T>>(&self, index: usize, values: I) -> Result<bool> {
        let incoming: Vec<T> = values.into_iter().collect();
        let _guard = self.lock();
        let current = self.snapshot();
        check_position_index(index, current.len())?;
        if incoming.is_empty() {
            return Ok(false);
        }
        let mut elements = Vec::with_capacity(current.len() + incoming.len());
        elements.extend_from_slice(&current[..index]);
        elements.extend(incoming);
        elements.extend_from_slice(&current[index..]);
        self.publish("insert_all", &current, elements);
        Ok(true)
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&self, index: usize) -> Result<T> {
        let _guard = self.lock();
        let current = self.snapshot();
        check_element_index(index, current.len())?;
        let removed = current[index].clone();
        let mut elements = Vec::with_capacity(current.len() - 1);
        elements.extend_from_slice(&current[..index]);
        elements.extend_from_slice(&current[index + 1..]);
        self.publish("remove_at", &current, elements);
        Ok(removed)
    }

    /// Replaces the element at `index` with `value`, returning the previous element.
    pub fn set(&self, index: usize, value: T) -> Result<T> {
        let _guard = self.lock();
        let current = self.snapshot();
        check_element_index(index, current.len())?;
        let mut elements = current.to_vec();
        let previous = std::mem::replace(&mut elements[index], value);
        self.publish("set", &current, elements);
        Ok(previous)
    }

    /// Removes matching elements, or keeps only matching elements when
    /// `retain` is `true`. Returns the number of elements removed.
    ///
    /// `matches` acts as a membership test for a set of elements: an element
    /// is kept when `matches(element) == retain`.
    pub fn remove_matching<F>(&self, matches: F, retain: bool) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let _guard = self.lock();
        let len = self.load().len();
        self.remove_matching_range(0, len, matches, retain)
    }

    /// Like [`remove_matching`](CowList::remove_matching), restricted to
    /// `from..to`. Elements outside the range are carried over unchanged.
    ///
    /// Callers validate the range against the live snapshot while holding
    /// the writer lock.
    pub(crate) fn remove_matching_range<F>(
        &self,
        from: usize,
        to: usize,
        mut matches: F,
        retain: bool,
    ) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let _guard = self.lock();
        let current = self.snapshot();

        // Nothing is copied until the first element that has to go.
        let Some(first) = (from..to).find(|&i| matches(&current[i]) != retain) else {
            return 0;
        };

        let mut elements = Vec::with_capacity(current.len() - 1);
        elements.extend_from_slice(&current[..first]);
        for element in &current[first + 1..to] {
            if matches(element) == retain {
                elements.push(element.clone());
            }
        }
        elements.extend_from_slice(&current[to..]);

        let removed = current.len() - elements.len();
        self.publish("remove_matching", &current, elements);
        removed
    }

    /// Removes every element for which `predicate` returns `true`. Returns
    /// the number of elements removed.
    pub fn remove_if<F: FnMut(&T) -> bool>(&self, predicate: F) -> usize {
        self.remove_matching(predicate, false)
    }

    /// Replaces every element with the result of applying `f` to it.
    pub fn replace_all<F: FnMut(&T) -> T>(&self, f: F) {
        let _guard = self.lock();
        let current = self.snapshot();
        if current.is_empty() {
            return;
        }
        let elements = current.iter().map(f).collect();
        self.publish("replace_all", &current, elements);
    }

    /// Sorts the list with a stable sort using `compare`.
    pub fn sort_by<F: FnMut(&T, &T) -> Ordering>(&self, compare: F) {
        let _guard = self.lock();
        let current = self.snapshot();
        if current.len() < 2 {
            return;
        }
        let mut elements = current.to_vec();
        elements.sort_by(compare);
        self.publish("sort_by", &current, elements);
    }
}

impl<T: Clone + PartialEq> CowList<T> {
    /// Returns `true` if the live snapshot contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.load().contains(value)
    }

    /// Returns the index of the first occurrence of `value`.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.load().iter().position(|e| e == value)
    }

    /// Returns the index of the first occurrence of `value` at or after `from`.
    ///
    /// A `from` past the end of the list finds nothing.
    pub fn index_of_from(&self, value: &T, from: usize) -> Option<usize> {
        let snapshot = self.load();
        snapshot
            .as_slice()
            .get(from..)?
            .iter()
            .position(|e| e == value)
            .map(|i| i + from)
    }

    /// Returns the index of the last occurrence of `value`.
    pub fn last_index_of(&self, value: &T) -> Option<usize> {
        self.load().iter().rposition(|e| e == value)
    }

    /// Returns the index of the last occurrence of `value` at or before `index`.
    pub fn last_index_of_from(&self, value: &T, index: usize) -> Result<Option<usize>> {
        let snapshot = self.load();
        check_element_index(index, snapshot.len())?;
        Ok(snapshot[..=index].iter().rposition(|e| e == value))
    }

    /// Appends `value` unless it is already present. Returns `true` if it was added.
    pub fn push_if_absent(&self, value: T) -> bool {
        // Lock-free fast path; rechecked below under the lock.
        if self.contains(&value) {
            return false;
        }
        let _guard = self.lock();
        let current = self.snapshot();
        if current.contains(&value) {
            return false;
        }
        let mut elements = Vec::with_capacity(current.len() + 1);
        elements.extend_from_slice(&current);
        elements.push(value);
        self.publish("push_if_absent", &current, elements);
        true
    }

    /// Appends each element of `values` that is not already present, in
    /// order. Duplicates within `values` are only added once. Returns the
    /// number of elements added.
    pub fn extend_absent<I: IntoIterator<Item = T>>(&self, values: I) -> usize {
        let incoming: Vec<T> = values.into_iter().collect();
        if incoming.is_empty() {
            return 0;
        }
        let _guard = self.lock();
        let current = self.snapshot();
        let mut elements = Vec::with_capacity(current.len() + incoming.len());
        elements.extend_from_slice(&current);
        for value in incoming {
            if !elements.contains(&value) {
                elements.push(value);
            }
        }
        let added = elements.len() - current.len();
        if added == 0 {
            return 0;
        }
        elements.shrink_to_fit();
        self.publish("extend_absent", &current, elements);
        added
    }

    /// Removes the first occurrence of `value`. Returns `true` if it was present.
    pub fn remove(&self, value: &T) -> bool {
        let _guard = self.lock();
        let current = self.snapshot();
        let Some(index) = current.iter().position(|e| e == value) else {
            return false;
        };
        let mut elements = Vec::with_capacity(current.len() - 1);
        elements.extend_from_slice(&current[..index]);
        elements.extend_from_slice(&current[index + 1..]);
        self.publish("remove", &current, elements);
        true
    }

    /// Removes every element that is equal to some element of `values`.
    pub fn remove_all(&self, values: &[T]) -> usize {
        self.remove_matching(|e| values.contains(e), false)
    }

    /// Keeps only the elements that are equal to some element of `values`.
    pub fn retain_all(&self, values: &[T]) -> usize {
        self.remove_matching(|e| values.contains(e), true)
    }
}

impl<T: Clone> Sequence for CowList<T> {
    type Item = T;

    fn len(&self) -> Result<usize> {
        Ok(CowList::len(self))
    }

    fn get(&self, index: usize) -> Result<T> {
        CowList::get(self, index)
    }

    fn cursor(&self) -> Result<Cursor<T>> {
        Ok(CowList::cursor(self))
    }
}

/// Creates a list sharing the live snapshot of `self`.
///
/// Snapshots are immutable, so sharing one is equivalent to copying it. The
/// two lists evolve independently from here on.
impl<T> Clone for CowList<T> {
    fn clone(&self) -> Self {
        Self::from_shared(self.snapshot())
    }
}

impl<T> Default for CowList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for CowList<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_shared(Arc::new(Snapshot::from(elements)))
    }
}

impl<T: Clone> From<&[T]> for CowList<T> {
    fn from(elements: &[T]) -> Self {
        Self::from_slice(elements)
    }
}

impl<T> FromIterator<T> for CowList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T: Clone> IntoIterator for &'a CowList<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Cursor<T> {
        self.cursor()
    }
}

impl<T: fmt::Debug> fmt::Debug for CowList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self.load(), f)
    }
}

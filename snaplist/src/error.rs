//! Errors reported by list, view and cursor operations.
//!
//! Every error is local to the call that produced it. A failed mutation never
//! publishes, so an `Err` leaves the list exactly as it was.
use thiserror::Error;

/// An error produced by an operation on a [`CowList`](crate::CowList),
/// a [`View`](crate::View) or a [`Cursor`](crate::Cursor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An index fell outside the bounds of the list or view it addressed.
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the list or view at the time of the call.
        len: usize,
    },

    /// A view's snapshot is no longer the list's live snapshot, because the
    /// list was modified through some other path.
    #[error("list was modified outside of this view")]
    ConcurrentModification,

    /// A cursor was asked to mutate the snapshot it traverses.
    #[error("cursor does not support `{0}`")]
    UnsupportedOperation(&'static str),

    /// A cursor has no element left in the requested direction.
    #[error("no more elements")]
    NoSuchElement,
}

/// Result type alias for list operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Checks that `index` addresses an existing element of a sequence of length `len`.
pub(crate) fn check_element_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::OutOfRange { index, len })
    }
}

/// Checks that `index` is a valid insertion point (`0..=len`).
pub(crate) fn check_position_index(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(Error::OutOfRange { index, len })
    }
}

/// Checks that `from..to` is a valid range inside a sequence of length `len`.
pub(crate) fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
    check_position_index(to, len)?;
    if from > to {
        return Err(Error::OutOfRange {
            index: from,
            len: to,
        });
    }
    Ok(())
}

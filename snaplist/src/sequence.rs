//! Read access shared by lists and views.
//!
//! See [`Sequence`].
use crate::cursor::Cursor;
use crate::error::Result;

/// An ordered sequence that can be sized, indexed and traversed.
///
/// Implemented by [`CowList`](crate::CowList), whose reads never fail on
/// account of concurrent writers, and by [`View`](crate::View), whose reads
/// fail with [`Error::ConcurrentModification`](crate::Error::ConcurrentModification)
/// once the list has been changed behind its back.
pub trait Sequence {
    type Item: Clone;

    /// Returns the number of elements in the sequence.
    fn len(&self) -> Result<usize>;

    /// Returns `true` if the sequence has no elements.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns a copy of the element at `index`.
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Returns a cursor positioned before the first element.
    fn cursor(&self) -> Result<Cursor<Self::Item>>;
}

// Shares one battery of tests across every implementation of `Sequence`.
//
// Each entry names a test module, builds an owner from `elements` (a
// `Vec<u32>`), and then derives the sequence under test from that owner.
#[macro_export]
macro_rules! sequence_tests {
    ($($name:ident: |$elements:ident| $owner:expr => |$o:ident| $sequence:expr,)*) => {
    $(
        mod $name {
            use super::*;
            use $crate::{Error, Sequence};

            #[test]
            fn len_counts_elements() {
                let $elements: Vec<u32> = vec![10, 20, 30];
                let $o = $owner;
                let sequence = $sequence;
                assert_eq!(Sequence::len(&sequence), Ok(3));
                assert_eq!(Sequence::is_empty(&sequence), Ok(false));
            }

            #[test]
            fn empty_sequence_has_nothing_to_get() {
                let $elements: Vec<u32> = vec![];
                let $o = $owner;
                let sequence = $sequence;
                assert_eq!(Sequence::is_empty(&sequence), Ok(true));
                assert_eq!(
                    Sequence::get(&sequence, 0),
                    Err(Error::OutOfRange { index: 0, len: 0 })
                );
                assert!(!Sequence::cursor(&sequence).unwrap().has_next());
            }

            #[test]
            fn get_returns_elements_in_order() {
                let $elements: Vec<u32> = vec![10, 20, 30];
                let $o = $owner;
                let sequence = $sequence;
                assert_eq!(Sequence::get(&sequence, 0), Ok(10));
                assert_eq!(Sequence::get(&sequence, 1), Ok(20));
                assert_eq!(Sequence::get(&sequence, 2), Ok(30));
            }

            #[test]
            fn get_past_end_is_out_of_range() {
                let $elements: Vec<u32> = vec![10, 20, 30];
                let $o = $owner;
                let sequence = $sequence;
                assert_eq!(
                    Sequence::get(&sequence, 3),
                    Err(Error::OutOfRange { index: 3, len: 3 })
                );
            }

            #[test]
            fn cursor_yields_every_element() {
                let $elements: Vec<u32> = vec![10, 20, 30];
                let $o = $owner;
                let sequence = $sequence;
                let cursor = Sequence::cursor(&sequence).unwrap();
                assert_eq!(cursor.collect::<Vec<_>>(), vec![10, 20, 30]);
            }
        }
    )*
    }
}

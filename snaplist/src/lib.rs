//! A copy-on-write list with lock-free snapshot reads.
//!
//! [`CowList`] holds its elements in an immutable [`Snapshot`] behind an
//! atomic reference. Readers load the reference once and work on that
//! snapshot alone, so reads never block and always observe one consistent
//! state. Writers are serialized by a lock; each mutation builds a complete
//! new snapshot in private and publishes it with a single atomic store.
//!
//! Two ways of reading sit on top of the list:
//! * A [`Cursor`] is bound to the snapshot that was live when it was created
//!   and keeps traversing it no matter what writers do.
//! * A [`View`] is a window onto a range of the list. It detects, and refuses
//!   to work after, any modification of the list it did not make itself.
//!
//! # Examples
//!
//! Many threads push concurrently; no update is lost.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use snaplist::CowList;
//!
//! const NUM_THREADS: usize = 4;
//! const PUSHES_PER_THREAD: usize = 25;
//!
//! let list = Arc::new(CowList::new());
//!
//! let mut handles = Vec::new();
//! for i in 0..NUM_THREADS {
//!     let list = list.clone();
//!     handles.push(thread::spawn(move || {
//!         for j in 0..PUSHES_PER_THREAD {
//!             list.push((i, j));
//!         }
//!     }));
//! }
//!
//! // Reading while writers are running is always safe.
//! let partial: Vec<(usize, usize)> = list.iter().collect();
//! assert!(partial.len() <= NUM_THREADS * PUSHES_PER_THREAD);
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(list.len(), NUM_THREADS * PUSHES_PER_THREAD);
//! ```
pub mod cursor;
pub mod error;
pub mod list;
pub mod sequence;
pub mod snapshot;
pub mod view;

#[cfg(feature = "serde")]
mod serialize;
pub(crate) mod sync;

pub use cursor::Cursor;
pub use error::{Error, Result};
pub use list::CowList;
pub use sequence::Sequence;
pub use snapshot::Snapshot;
pub use view::View;

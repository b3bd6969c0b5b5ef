//! `serde` support for [`CowList`].
//!
//! A list serializes as a plain sequence read from one snapshot, and
//! deserializes through the bulk constructor. No byte format is implied.
use ::serde::de::{Deserialize, Deserializer};
use ::serde::ser::{Serialize, Serializer};

use crate::list::CowList;

impl<T: Serialize> Serialize for CowList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.snapshot().iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CowList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(CowList::from)
    }
}

//! Checked variants of [OMap] API, for callers whose keys are optional.
//!
//! A missing key, or a missing source for bulk load, is rejected with
//! [Error::InvalidArgument] before touching the tree. Absent entries are
//! not errors, they are reported as `None` / `false` like the unchecked
//! API.

use std::borrow::Borrow;

use crate::{Error, OMap, Result};

impl<K, V> OMap<K, V> {
    /// Checked version of [OMap::set].
    pub fn try_set(&mut self, key: Option<K>, value: V) -> Result<Option<V>>
    where
        K: Ord,
    {
        match key {
            Some(key) => Ok(self.set(key, value)),
            None => err_at!(InvalidArgument, msg: "set with null key"),
        }
    }

    /// Checked version of [OMap::get].
    pub fn try_get<Q>(&self, key: Option<&Q>) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match key {
            Some(key) => Ok(self.get(key)),
            None => err_at!(InvalidArgument, msg: "get with null key"),
        }
    }

    /// Checked version of [OMap::contains_key].
    pub fn try_contains_key<Q>(&self, key: Option<&Q>) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match key {
            Some(key) => Ok(self.contains_key(key)),
            None => err_at!(InvalidArgument, msg: "contains_key with null key"),
        }
    }

    /// Checked version of [OMap::remove].
    pub fn try_remove<Q>(&mut self, key: Option<&Q>) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match key {
            Some(key) => {
                self.remove(key);
                Ok(())
            }
            None => err_at!(InvalidArgument, msg: "remove with null key"),
        }
    }

    /// Checked version of [OMap::put_all]. Entries are set in source
    /// order and loading stops at the first null key, entries set before
    /// that are retained.
    pub fn try_put_all<I>(&mut self, source: Option<I>) -> Result<()>
    where
        K: Ord,
        I: IntoIterator<Item = (Option<K>, V)>,
    {
        let source = match source {
            Some(source) => source,
            None => err_at!(InvalidArgument, msg: "put_all with null source")?,
        };

        for (i, (key, value)) in source.into_iter().enumerate() {
            match key {
                Some(key) => {
                    self.set(key, value);
                }
                None => err_at!(InvalidArgument, msg: "put_all null key at {}", i)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "checked_test.rs"]
mod checked_test;

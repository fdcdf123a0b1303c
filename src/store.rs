//! # Store Module
//!
//! A generic in-memory key/value store shared by every request handler of an
//! application.
//!
//! ## Thread Safety
//!
//! The mapping sits behind a single reader/writer lock:
//! - Any number of [`Store::get`] calls proceed in parallel
//! - [`Store::set`] takes the lock exclusively, so a concurrent reader sees
//!   either the old or the new value for a key, never a partial write
//!
//! `parking_lot::RwLock` is used so there is no poisoning path; a panicking
//! writer cannot turn every later read into an error.
//!
//! The lock is an OS-level lock, not a `may` coroutine primitive. A waiter
//! parks its whole worker thread rather than yielding. Critical sections are a
//! single map lookup or insert plus a clone, so the wait is bounded by that
//! copy. Coroutine-aware locking (`may::sync::RwLock`) was deliberately not
//! used, so the store stays usable from plain threads too.
//!
//! ## Usage
//!
//! ```rust
//! use mplex::store::Store;
//! use std::sync::Arc;
//!
//! let store: Arc<Store<u32>> = Arc::new(Store::new());
//! assert!(!store.set("answer", 42));
//! assert_eq!(store.get("answer"), Some(42));
//! assert!(store.set("answer", 43));
//! ```

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

/// Concurrent mapping from string keys to values of a single type `T`.
///
/// Entries are created on the first [`set`](Store::set), overwritten by later
/// calls with the same key and never evicted.
#[derive(Debug)]
pub struct Store<T> {
    data: RwLock<HashMap<String, T>>,
}

impl<T> Store<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or overwrite the value at `key`.
    ///
    /// Returns `true` when the key was already present before this call.
    pub fn set(&self, key: impl Into<String>, value: T) -> bool {
        let key = key.into();
        let mut data = self.data.write();
        let existed = data.insert(key, value).is_some();
        trace!(existed, entries = data.len(), "Store entry written");
        existed
    }

    /// Whether `key` currently has a value
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl<T: Clone> Store<T> {
    /// Fetch a copy of the value stored at `key`.
    ///
    /// Readers never block each other; they only wait behind an in-progress
    /// [`set`](Store::set).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<T> {
        self.data.read().get(key).cloned()
    }
}

impl<T: Clone + Default> Store<T> {
    /// Fetch the value at `key` together with a presence flag.
    ///
    /// A missing key yields `(T::default(), false)`.
    #[must_use]
    pub fn get_or_default(&self, key: &str) -> (T, bool) {
        match self.get(key) {
            Some(value) => (value, true),
            None => (T::default(), false),
        }
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Store<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self {
            data: RwLock::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

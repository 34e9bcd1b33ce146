//! Persistent campaign flags.
//!
//! Flags back one-time trigger semantics and script guard conditions. Keys
//! are opaque strings chosen by content authors and must round-trip
//! byte-exact through save/load. The store supports no deletion - campaign
//! progression flags are monotonic by convention.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Value stored under a campaign flag key.
///
/// Absence of a key is semantically distinct from any falsy stored value:
/// `get` returning `None` and `get` returning `Some(Bool(false))` mean
/// different things to guard scripts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Process-durable key/value store scoped to a campaign session.
///
/// Constructed once per campaign (from a loaded save or empty) and injected
/// into every dispatcher that needs it - never a global. Interior locking
/// makes `set_if_absent` a safe check-and-set under concurrent trigger
/// dispatch: exactly one caller wins for a given key.
#[derive(Debug, Default)]
pub struct PersistentFlagStore {
    entries: RwLock<BTreeMap<String, FlagValue>>,
}

impl PersistentFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a loaded save table.
    pub fn from_entries(entries: BTreeMap<String, FlagValue>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Returns the value stored under `key`, or `None` if never written.
    pub fn get(&self, key: &str) -> Option<FlagValue> {
        self.read().get(key).cloned()
    }

    /// Writes `value` under `key`, overwriting any previous value.
    pub fn put(&self, key: impl Into<String>, value: impl Into<FlagValue>) {
        self.write().insert(key.into(), value.into());
    }

    /// Atomically writes `value` under `key` only if the key is absent.
    ///
    /// Returns `true` if this call performed the write. Under concurrent
    /// calls for the same key, exactly one caller observes `true`.
    pub fn set_if_absent(&self, key: impl Into<String>, value: impl Into<FlagValue>) -> bool {
        let key = key.into();
        let mut entries = self.write();
        if entries.contains_key(&key) {
            false
        } else {
            entries.insert(key, value.into());
            true
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copies the full table for campaign persistence.
    pub fn snapshot(&self) -> BTreeMap<String, FlagValue> {
        self.read().clone()
    }

    // A poisoned lock still guards a coherent table (writes are single-value
    // inserts), so recover the guard instead of propagating the panic.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, FlagValue>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, FlagValue>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn put_then_get_returns_value() {
        let store = PersistentFlagStore::new();
        store.put("quest.bell_tower", 3i64);
        assert_eq!(store.get("quest.bell_tower"), Some(FlagValue::Int(3)));
    }

    #[test]
    fn absence_is_distinct_from_false() {
        let store = PersistentFlagStore::new();
        store.put("boss.defeated", false);
        assert_eq!(store.get("boss.defeated"), Some(FlagValue::Bool(false)));
        assert_eq!(store.get("boss.spared"), None);
        assert!(store.contains("boss.defeated"));
        assert!(!store.contains("boss.spared"));
    }

    #[test]
    fn overwrite_is_stable_until_next_put() {
        let store = PersistentFlagStore::new();
        store.put("chapter", 1i64);
        store.put("chapter", 2i64);
        assert_eq!(store.get("chapter"), Some(FlagValue::Int(2)));
    }

    #[test]
    fn set_if_absent_admits_exactly_one_winner() {
        let store = Arc::new(PersistentFlagStore::new());
        let wins = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                let wins = Arc::clone(&wins);
                std::thread::spawn(move || {
                    if store.set_if_absent("area.12.loaded", true) {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert_eq!(store.get("area.12.loaded"), Some(FlagValue::Bool(true)));
    }

    #[test]
    fn snapshot_round_trips_keys_byte_exact() {
        let store = PersistentFlagStore::new();
        store.put("weird key/π\t", "kept");
        let rebuilt = PersistentFlagStore::from_entries(store.snapshot());
        assert_eq!(rebuilt.get("weird key/π\t"), Some(FlagValue::Text("kept".into())));
    }
}

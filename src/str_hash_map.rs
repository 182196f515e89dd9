//! StrHashMap: open-addressing map from owned string keys to values.
//!
//! Each entry is spread over index-correlated stores:
//! - `values`: the user's values, addressed by `data_index`;
//! - `keys`: owned key copies, addressed by `key_index`;
//! - `order`: the bucket-index list, recording the bucket slot of every live
//!   entry in insertion order, addressed by `list_index`;
//! - `buckets`: the probe table holding `{data_index, key_index, list_index,
//!   hash}` per occupied slot.
//!
//! The three stores are [`SlotStore`]s, so every delete pushes the freed
//! value, key and list positions onto their reclamation lists and later
//! inserts reuse them. Values are never moved by deletes or by growth, so a
//! `data_index` returned by `insert` stays valid until that entry is deleted.
//!
//! Growth only rebuilds the probe table and the bucket-index list: entries
//! are relocated by their stored hash, tombstones are dropped and the list
//! is compacted. Keys are never hashed again after insertion.

use crate::bucket_table::{BucketTable, Entry};
use crate::config::{KeyMatch, MapConfig};
use crate::error::{fatal, Error, InsertError, Result};
use crate::hash::{KeyHasher, Murmur2};
use crate::slot_store::SlotStore;
use core::fmt;

pub struct StrHashMap<V, S = Murmur2> {
    hasher: S,
    config: MapConfig,
    buckets: BucketTable,
    values: SlotStore<V>,
    keys: SlotStore<Box<str>>,
    order: SlotStore<usize>, // bucket slot per live entry
}

/// An entry taken out of the map.
struct Unlinked<V> {
    data_index: usize,
    key: Box<str>,
    value: V,
}

fn key_matches(mode: KeyMatch, keys: &SlotStore<Box<str>>, entry: &Entry, key: &str) -> bool {
    match mode {
        KeyMatch::HashOnly => true,
        KeyMatch::Bytes => keys.get(entry.key_index).is_some_and(|k| &**k == key),
    }
}

impl<V> StrHashMap<V> {
    pub fn new() -> Self {
        Self::with_hasher(Murmur2::default())
    }

    pub fn with_config(config: MapConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, Murmur2::default())
    }
}

impl<V> Default for StrHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> StrHashMap<V, S>
where
    S: KeyHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            config: MapConfig::default(),
            buckets: BucketTable::new(),
            values: SlotStore::new(),
            keys: SlotStore::new(),
            order: SlotStore::new(),
        }
    }

    pub fn with_config_and_hasher(config: MapConfig, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hasher,
            config,
            buckets: BucketTable::new(),
            values: SlotStore::with_config(config.storage)?,
            keys: SlotStore::with_config(config.storage)?,
            order: SlotStore::with_config(config.storage)?,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bucket slots; zero until the first insert.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// Number of deleted buckets still in the probe table.
    pub fn tombstones(&self) -> usize {
        self.buckets.tombstones()
    }

    /// Number of value slots, vacant ones included. Every `data_index`
    /// handed out is below this.
    pub fn range(&self) -> usize {
        self.values.range()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    fn find_slot(&self, hash: u32, key: &str) -> Option<usize> {
        let keys = &self.keys;
        let mode = self.config.key_match;
        self.buckets.find(hash, |e| key_matches(mode, keys, e, key))
    }

    fn find_entry(&self, key: &str) -> Option<Entry> {
        let hash = self.hasher.hash_key(key);
        let slot = self.find_slot(hash, key)?;
        self.buckets.get(slot).copied()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let entry = self.find_entry(key)?;
        self.values.get(entry.data_index)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let entry = self.find_entry(key)?;
        self.values.get_mut(entry.data_index)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_entry(key).is_some()
    }

    /// Index of the key's value in the value store.
    pub fn data_index(&self, key: &str) -> Option<usize> {
        self.find_entry(key).map(|e| e.data_index)
    }

    /// Overwrites the value of an existing key. Returns `false` if absent.
    pub fn update(&mut self, key: &str, value: V) -> bool {
        match self.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Inserts a copy of `key` and returns the value's `data_index`.
    ///
    /// Fails with `DuplicateKey`, leaving the map unchanged, if the key is
    /// already present. Allocation failure is fatal.
    pub fn insert(&mut self, key: &str, value: V) -> core::result::Result<usize, InsertError> {
        match self.try_insert(key, value) {
            Ok(data_index) => Ok(data_index),
            Err(Error::DuplicateKey) => Err(InsertError::DuplicateKey),
            Err(e) => fatal(e),
        }
    }

    /// Like [`insert`](Self::insert) but propagates allocation failure. A
    /// failed insert leaves the entries untouched.
    pub fn try_insert(&mut self, key: &str, value: V) -> Result<usize> {
        self.try_fit_one_more()?;

        let hash = self.hasher.hash_key(key);
        let keys = &self.keys;
        let mode = self.config.key_match;
        let slot = match self
            .buckets
            .find_or_find_insert_slot(hash, |e| key_matches(mode, keys, e, key))
        {
            Ok(_) => return Err(Error::DuplicateKey),
            Err(slot) => slot,
        };

        self.values.try_reserve_slot()?;
        self.keys.try_reserve_slot()?;
        self.order.try_reserve_slot()?;

        let data_index = self.values.insert(value);
        let key_index = self.keys.insert(key.into());
        let list_index = self.order.insert(slot);
        self.buckets.occupy(
            slot,
            Entry {
                data_index,
                key_index,
                list_index,
                hash,
            },
        );
        Ok(data_index)
    }

    /// Returns the key's value, inserting `default` first if absent.
    pub fn get_or_insert(&mut self, key: &str, default: V) -> &mut V {
        self.get_or_insert_with(key, || default)
    }

    /// Like [`get_or_insert`](Self::get_or_insert); `default` only runs on a
    /// miss.
    pub fn get_or_insert_with<F>(&mut self, key: &str, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        match self.try_get_or_insert_with(key, default) {
            Ok(value) => value,
            Err(e) => fatal(e),
        }
    }

    pub fn try_get_or_insert_with<F>(&mut self, key: &str, default: F) -> Result<&mut V>
    where
        F: FnOnce() -> V,
    {
        let data_index = match self.data_index(key) {
            Some(i) => i,
            None => self.try_insert(key, default())?,
        };
        Ok(self
            .values
            .get_mut(data_index)
            .expect("live entry must own a value"))
    }

    fn unlink(&mut self, key: &str) -> Option<Unlinked<V>> {
        let hash = self.hasher.hash_key(key);
        let slot = self.find_slot(hash, key)?;
        let entry = self.buckets.erase(slot)?;

        self.order.remove(entry.list_index);
        let key = self
            .keys
            .remove(entry.key_index)
            .expect("live entry must own a key");
        let value = self
            .values
            .remove(entry.data_index)
            .expect("live entry must own a value");

        Some(Unlinked {
            data_index: entry.data_index,
            key,
            value,
        })
    }

    /// Deletes the key and drops its value. Returns the vacated `data_index`,
    /// or `None` if the key was absent.
    ///
    /// The value slot stays vacant until a later insert reuses it.
    pub fn delete(&mut self, key: &str) -> Option<usize> {
        self.unlink(key).map(|u| u.data_index)
    }

    /// Deletes the key and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.unlink(key).map(|u| u.value)
    }

    /// Deletes the key and returns the owned key and value.
    pub fn remove_entry(&mut self, key: &str) -> Option<(Box<str>, V)> {
        self.unlink(key).map(|u| (u.key, u.value))
    }

    /// Grows the bucket table until one more entry keeps the load below
    /// `1 / load_ratio`.
    fn try_fit_one_more(&mut self) -> Result<()> {
        let needed = self
            .len()
            .checked_add(1)
            .and_then(|n| n.checked_mul(self.config.load_ratio))
            .ok_or(Error::CapacityOverflow {
                requested: self.len(),
            })?;
        if needed < self.capacity() {
            return Ok(());
        }

        let mut new_cap = self.capacity();
        while needed >= new_cap {
            new_cap = if new_cap == 0 {
                self.config.initial_buckets
            } else {
                new_cap
                    .checked_mul(self.config.bucket_growth)
                    .ok_or(Error::CapacityOverflow { requested: new_cap })?
            };
        }
        self.try_rehash(new_cap)
    }

    /// Moves every live entry into a fresh table of `new_cap` buckets.
    ///
    /// Walks the bucket-index list, so entries keep their relative order and
    /// the rebuilt list has no vacant positions. Nothing is modified unless
    /// every allocation succeeded.
    fn try_rehash(&mut self, new_cap: usize) -> Result<()> {
        let mut table = BucketTable::try_with_capacity(new_cap)?;
        let mut order = SlotStore::with_config(self.config.storage)?;
        order.try_reserve(self.len())?;
        self.values.try_reserve(new_cap / self.config.load_ratio)?;

        for (_, &old_slot) in self.order.iter() {
            let Some(&entry) = self.buckets.get(old_slot) else {
                unreachable!("bucket-index list points at vacant slot {old_slot}");
            };
            let slot = table.vacant_slot(entry.hash);
            let list_index = order.insert(slot);
            table.occupy(slot, Entry { list_index, ..entry });
        }

        log::debug!(
            "grew bucket table from {} to {new_cap} slots ({} live, {} tombstones dropped)",
            self.capacity(),
            self.len(),
            self.tombstones(),
        );
        self.buckets = table;
        self.order = order;
        Ok(())
    }

    /// Removes every entry, keeping allocations.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.values.clear();
        self.keys.clear();
        self.order.clear();
    }

    /// Removes every entry and releases all storage. The next insert
    /// allocates from scratch.
    pub fn free(&mut self) {
        self.buckets.free();
        self.values.free();
        self.keys.free();
        self.order.free();
    }

    fn live_entries(&self) -> LiveEntries<'_> {
        LiveEntries {
            order: self.order.raw().iter(),
            buckets: &self.buckets,
        }
    }

    /// Live keys in insertion order. The iterator is `Clone`, so it can be
    /// restarted from any point.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            entries: self.live_entries(),
            keys: &self.keys,
        }
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            entries: self.live_entries(),
            keys: &self.keys,
            values: &self.values,
        }
    }

    /// Live values in value-store order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.values.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.values.iter_mut().map(|(_, v)| v)
    }

    /// Value stored at `data_index`; `None` if that slot is vacant.
    pub fn value_at(&self, data_index: usize) -> Option<&V> {
        self.values.get(data_index)
    }

    pub fn value_at_mut(&mut self, data_index: usize) -> Option<&mut V> {
        self.values.get_mut(data_index)
    }

    /// Every value slot up to [`range`](Self::range); vacated slots are `None`.
    pub fn raw_values(&self) -> impl Iterator<Item = Option<&V>> + '_ {
        self.values.raw().iter().map(Option::as_ref)
    }

    /// Panics if the stores and the probe table disagree.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut listed = 0;
        for (list_index, &slot) in self.order.iter() {
            let e = self.buckets.get(slot).expect("listed bucket must be occupied");
            assert_eq!(e.list_index, list_index, "list position of slot {slot}");
            let key = self.keys.get(e.key_index).expect("live key");
            assert_eq!(e.hash, self.hasher.hash_key(key), "stored hash of {key:?}");
            assert!(self.values.get(e.data_index).is_some(), "value of {key:?}");
            listed += 1;
        }
        assert_eq!(listed, self.len());
        assert_eq!(self.buckets.occupied(), self.len());
        assert_eq!(self.keys.len(), self.len());
        if self.capacity() > 0 {
            assert!(self.config.load_ratio * self.len() < self.capacity());
        }
    }
}

/// Bucket entries reached through the bucket-index list.
#[derive(Clone)]
struct LiveEntries<'a> {
    order: core::slice::Iter<'a, Option<usize>>,
    buckets: &'a BucketTable,
}

impl<'a> Iterator for LiveEntries<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        let buckets: &'a BucketTable = self.buckets;
        self.order
            .by_ref()
            .flatten()
            .find_map(|&slot| buckets.get(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.order.size_hint().1)
    }
}

/// Iterator over the live keys of a [`StrHashMap`].
#[derive(Clone)]
pub struct Keys<'a> {
    entries: LiveEntries<'a>,
    keys: &'a SlotStore<Box<str>>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<&'a str> {
        let keys: &'a SlotStore<Box<str>> = self.keys;
        self.entries
            .find_map(|e| keys.get(e.key_index).map(|k| &**k))
    }
}

/// Iterator over the live `(key, value)` pairs of a [`StrHashMap`].
pub struct Iter<'a, V> {
    entries: LiveEntries<'a>,
    keys: &'a SlotStore<Box<str>>,
    values: &'a SlotStore<V>,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            keys: self.keys,
            values: self.values,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let keys: &'a SlotStore<Box<str>> = self.keys;
        let values: &'a SlotStore<V> = self.values;
        self.entries.find_map(|e| {
            let key = keys.get(e.key_index)?;
            let value = values.get(e.data_index)?;
            Some((&**key, value))
        })
    }
}

impl<V: fmt::Debug, S: KeyHasher> fmt::Debug for StrHashMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrayConfig;
    use std::cell::Cell;
    use std::collections::BTreeSet;
    use test_log::test;

    /// Sends every key to the same home bucket with the same hash.
    struct ConstHasher;
    impl KeyHasher for ConstHasher {
        fn hash_key(&self, _key: &str) -> u32 {
            0
        }
    }

    /// Invariant: Duplicate keys are rejected and the map remains unchanged.
    #[test]
    fn duplicate_insert_rejected() {
        let mut m: StrHashMap<i32> = StrHashMap::new();
        m.insert("dup", 1).unwrap();
        match m.insert("dup", 2) {
            Err(InsertError::DuplicateKey) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(m.get("dup"), Some(&1));
        assert_eq!(m.len(), 1);
        assert!(matches!(m.try_insert("dup", 3), Err(Error::DuplicateKey)));
        m.assert_invariants();
    }

    /// Invariant: `get`, `contains_key` and `update` agree on presence.
    #[test]
    fn get_contains_update_parity() {
        let mut m = StrHashMap::new();
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            m.insert(k, i).unwrap();
        }
        for k in ["a", "b", "c"] {
            assert!(m.get(k).is_some());
            assert!(m.contains_key(k));
        }
        for k in ["x", "y", ""] {
            assert!(m.get(k).is_none());
            assert!(!m.contains_key(k));
            assert!(!m.update(k, 9));
        }
        assert!(m.update("b", 10));
        assert_eq!(m.get("b"), Some(&10));
        *m.get_mut("c").unwrap() += 5;
        assert_eq!(m.get("c"), Some(&7));
        assert_eq!(m.len(), 3);
    }

    /// Invariant: The first insert allocates the initial table; the table
    /// grows 4x once three times the next entry count reaches it.
    #[test]
    fn bucket_table_grows_by_load_ratio() {
        let mut m = StrHashMap::new();
        assert_eq!(m.capacity(), 0);
        m.insert("k0", 0).unwrap();
        assert_eq!(m.capacity(), 64);

        for i in 1..21 {
            m.insert(&format!("k{i}"), i).unwrap();
        }
        assert_eq!(m.capacity(), 64);
        m.insert("k21", 21).unwrap();
        assert_eq!(m.capacity(), 256);

        for i in 0..22 {
            assert_eq!(m.get(&format!("k{i}")), Some(&i));
        }
        m.assert_invariants();
    }

    /// Invariant: Growth drops tombstones and keeps every live entry and the
    /// enumeration order.
    #[test]
    fn growth_compacts_tombstones() {
        let mut m = StrHashMap::new();
        for i in 0..20 {
            m.insert(&format!("k{i}"), i).unwrap();
        }
        for i in (0..20).step_by(2) {
            assert!(m.delete(&format!("k{i}")).is_some());
        }
        assert_eq!(m.tombstones(), 10);
        let before: Vec<String> = m.keys().map(str::to_string).collect();

        let mut i = 100;
        while m.capacity() == 64 {
            m.insert(&format!("k{i}"), i).unwrap();
            i += 1;
        }
        assert_eq!(m.tombstones(), 0);
        let survivors: Vec<String> = m
            .keys()
            .filter(|k| before.iter().any(|b| b == k))
            .map(str::to_string)
            .collect();
        assert_eq!(survivors, before);
        m.assert_invariants();
    }

    /// Invariant: Delete vacates the value slot and reports its index; the
    /// next insert reuses it instead of growing the value store.
    #[test]
    fn delete_reclaims_value_slot() {
        let mut m = StrHashMap::new();
        assert_eq!(m.insert("a", 'a').unwrap(), 0);
        assert_eq!(m.insert("b", 'b').unwrap(), 1);

        assert_eq!(m.delete("a"), Some(0));
        assert_eq!(m.delete("a"), None);
        assert_eq!(m.value_at(0), None);
        let raw: Vec<_> = m.raw_values().collect();
        assert_eq!(raw, vec![None, Some(&'b')]);

        assert_eq!(m.insert("c", 'c').unwrap(), 0);
        assert_eq!(m.range(), 2);
        assert_eq!(m.value_at(0), Some(&'c'));
        m.assert_invariants();
    }

    /// Invariant: `remove` and `remove_entry` hand back what was stored.
    #[test]
    fn remove_returns_owned_parts() {
        let mut m = StrHashMap::new();
        m.insert("k", String::from("v")).unwrap();
        m.insert("j", String::from("w")).unwrap();
        assert_eq!(m.remove("k").as_deref(), Some("v"));
        assert_eq!(m.remove("k"), None);
        let (k, v) = m.remove_entry("j").unwrap();
        assert_eq!((&*k, v.as_str()), ("j", "w"));
        assert!(m.is_empty());
        m.assert_invariants();
    }

    /// Invariant: `get_or_insert` only stores the default on a miss.
    #[test]
    fn get_or_insert_keeps_existing_value() {
        let mut m = StrHashMap::new();
        assert_eq!(*m.get_or_insert("getorset", 133), 133);
        assert_eq!(*m.get_or_insert("getorset", 133), 133);
        assert_ne!(*m.get_or_insert("getorset", 153), 153);

        *m.get_or_insert("counter", 0) += 1;
        *m.get_or_insert("counter", 0) += 1;
        assert_eq!(m.get("counter"), Some(&2));
        assert_eq!(m.len(), 2);
    }

    /// Invariant: `get_or_insert_with` runs the constructor exactly once per miss.
    #[test]
    fn get_or_insert_with_is_lazy() {
        let mut m = StrHashMap::new();
        let calls = Cell::new(0);
        let make = || {
            calls.set(calls.get() + 1);
            "v".to_string()
        };
        m.get_or_insert_with("k", make);
        m.get_or_insert_with("k", || {
            calls.set(calls.get() + 1);
            "v2".to_string()
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(m.get("k").map(String::as_str), Some("v"));
    }

    /// Invariant: `keys()` skips deleted entries, reuses their list positions
    /// and restarts from a clone.
    #[test]
    fn keys_follow_bucket_index_list() {
        let mut m = StrHashMap::new();
        for k in ["aaa", "aab", "aac"] {
            m.insert(k, ()).unwrap();
        }
        m.delete("aaa");
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["aab", "aac"]);

        m.insert("new", ()).unwrap();
        let keys = m.keys();
        let restarted = keys.clone();
        assert_eq!(keys.collect::<Vec<_>>(), vec!["new", "aab", "aac"]);
        assert_eq!(restarted.count(), 3);
    }

    /// Invariant: Iteration yields each live entry exactly once.
    #[test]
    fn iteration_and_values_mut() {
        let mut m = StrHashMap::new();
        for (i, k) in ["k1", "k2", "k3", "k4"].iter().enumerate() {
            m.insert(k, i as i32).unwrap();
        }
        m.delete("k2");

        let seen: BTreeSet<(String, i32)> =
            m.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let expected: BTreeSet<(String, i32)> = [("k1", 0), ("k3", 2), ("k4", 3)]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        assert_eq!(seen, expected);

        for v in m.values_mut() {
            *v += 10;
        }
        assert_eq!(m.values().copied().collect::<Vec<_>>(), vec![10, 12, 13]);
        assert_eq!(format!("{m:?}"), r#"{"k1": 10, "k3": 12, "k4": 13}"#);
    }

    /// Invariant: Lookups work under total hash collisions; key bytes decide
    /// which entry matches.
    #[test]
    fn collision_handling_with_const_hasher() {
        let mut m: StrHashMap<i32, ConstHasher> = StrHashMap::with_hasher(ConstHasher);
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            m.insert(k, i as i32).unwrap();
        }
        assert_eq!(m.get("c"), Some(&2));
        assert_eq!(m.delete("b"), Some(1));
        assert_eq!(m.get("d"), Some(&3));
        assert!(m.insert("d", 9).is_err());
        m.insert("e", 4).unwrap();
        assert_eq!(m.get("e"), Some(&4));
        m.assert_invariants();
    }

    /// Invariant: Under `KeyMatch::HashOnly` equal hashes mean equal keys,
    /// so a colliding key is reported as a duplicate and aliases the entry.
    #[test]
    fn hash_only_matching_treats_collisions_as_duplicates() {
        let cfg = MapConfig::default().key_match(KeyMatch::HashOnly);
        let mut m = StrHashMap::with_config_and_hasher(cfg, ConstHasher).unwrap();
        m.insert("a", 1).unwrap();
        assert_eq!(m.insert("b", 2), Err(InsertError::DuplicateKey));
        assert_eq!(m.get("b"), Some(&1));
        assert_eq!(m.len(), 1);
    }

    /// Invariant: A tiny initial table and custom growth still satisfy the
    /// load policy on the first insert.
    #[test]
    fn custom_config_growth() {
        let cfg = MapConfig::default()
            .initial_buckets(1)
            .bucket_growth(2)
            .storage(ArrayConfig::default().min_capacity(1).growth_factor(1.5));
        let mut m = StrHashMap::with_config(cfg).unwrap();
        m.insert("x", 1).unwrap();
        assert_eq!(m.capacity(), 4);
        for i in 0..50 {
            m.insert(&i.to_string(), i).unwrap();
        }
        assert!(m.capacity() > 3 * m.len());
        m.assert_invariants();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = MapConfig::default().load_ratio(0);
        assert!(matches!(
            StrHashMap::<u8>::with_config(cfg),
            Err(Error::InvalidConfig { .. })
        ));
    }

    /// Invariant: `clear` keeps the table allocated, `free` releases it; both
    /// leave an empty, usable map.
    #[test]
    fn clear_and_free() {
        let mut m = StrHashMap::new();
        for i in 0..30 {
            m.insert(&format!("{i}"), i).unwrap();
        }
        m.delete("3");
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.capacity(), 256);
        assert_eq!(m.tombstones(), 0);
        assert_eq!(m.range(), 0);
        assert!(m.get("4").is_none());
        assert_eq!(m.keys().count(), 0);
        assert_eq!(m.insert("4", 4).unwrap(), 0);

        m.free();
        assert_eq!(m.capacity(), 0);
        assert!(m.get("4").is_none());
        m.insert("4", 44).unwrap();
        assert_eq!(m.get("4"), Some(&44));
        m.assert_invariants();
    }
}

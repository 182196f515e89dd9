//! Open-addressing probe table with linear probing and tombstones.
//!
//! The table only knows hashes and entry indices; deciding whether an
//! occupied bucket holds the searched key is left to the caller's `eq`
//! closure, which is only consulted when the stored hash matches.

use crate::error::Result;
use crate::growable_array::GrowableArray;

/// Location of one live entry across the map's stores.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Entry {
    pub data_index: usize,
    pub key_index: usize,
    /// Position in the bucket-index list.
    pub list_index: usize,
    pub hash: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Bucket {
    /// Never used; terminates probes.
    Empty,
    /// Tombstone; probes continue past it, inserts may claim it.
    Deleted,
    Occupied(Entry),
}

#[derive(Clone, Debug)]
pub(crate) struct BucketTable {
    buckets: GrowableArray<Bucket>,
    tombstones: usize,
}

impl BucketTable {
    pub const fn new() -> Self {
        Self {
            buckets: GrowableArray::new(),
            tombstones: 0,
        }
    }

    /// Allocates `capacity` empty buckets.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut buckets = GrowableArray::try_with_capacity(capacity)?;
        buckets.try_resize(capacity, Bucket::Empty)?;
        Ok(Self {
            buckets,
            tombstones: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[cfg(test)]
    pub fn occupied(&self) -> usize {
        self.buckets
            .iter()
            .filter(|b| matches!(b, Bucket::Occupied(_)))
            .count()
    }

    /// Every bucket index once, starting at the hash's home slot and
    /// wrapping around.
    fn probe_seq(&self, hash: u32) -> impl Iterator<Item = usize> {
        let cap = self.capacity();
        let home = if cap == 0 { 0 } else { hash as usize % cap };
        (home..cap).chain(0..home)
    }

    /// Slot of the occupied bucket with `hash` for which `eq` holds.
    pub fn find(&self, hash: u32, mut eq: impl FnMut(&Entry) -> bool) -> Option<usize> {
        for slot in self.probe_seq(hash) {
            match &self.buckets[slot] {
                Bucket::Empty => return None,
                Bucket::Occupied(e) if e.hash == hash && eq(e) => return Some(slot),
                Bucket::Occupied(_) | Bucket::Deleted => {}
            }
        }
        None
    }

    /// `Ok(slot)` of a matching entry, or `Err(slot)` of the bucket an insert
    /// should claim: the first tombstone or empty bucket on the probe path.
    ///
    /// # Panics
    ///
    /// If the table has no vacant bucket at all. The owner's load policy
    /// rules this out.
    pub fn find_or_find_insert_slot(
        &self,
        hash: u32,
        mut eq: impl FnMut(&Entry) -> bool,
    ) -> core::result::Result<usize, usize> {
        let mut vacant = None;
        for slot in self.probe_seq(hash) {
            match &self.buckets[slot] {
                Bucket::Empty => return Err(vacant.unwrap_or(slot)),
                Bucket::Deleted => {
                    vacant.get_or_insert(slot);
                }
                Bucket::Occupied(e) if e.hash == hash && eq(e) => return Ok(slot),
                Bucket::Occupied(_) => {}
            }
        }
        match vacant {
            Some(slot) => Err(slot),
            None => unreachable!(
                "probe exhausted a full bucket table of {} slots",
                self.capacity()
            ),
        }
    }

    /// First vacant bucket on the probe path; used when relocating entries
    /// that are known to be unique.
    pub fn vacant_slot(&self, hash: u32) -> usize {
        match self.find_or_find_insert_slot(hash, |_| false) {
            Ok(slot) | Err(slot) => slot,
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Entry> {
        match self.buckets.get(slot)? {
            Bucket::Occupied(e) => Some(e),
            Bucket::Empty | Bucket::Deleted => None,
        }
    }

    pub fn occupy(&mut self, slot: usize, entry: Entry) {
        let bucket = &mut self.buckets[slot];
        debug_assert!(!matches!(bucket, Bucket::Occupied(_)), "slot {slot} already occupied");
        if *bucket == Bucket::Deleted {
            self.tombstones -= 1;
        }
        *bucket = Bucket::Occupied(entry);
    }

    /// Tombstones an occupied bucket and returns its entry.
    pub fn erase(&mut self, slot: usize) -> Option<Entry> {
        let bucket = self.buckets.get_mut(slot)?;
        match *bucket {
            Bucket::Occupied(e) => {
                *bucket = Bucket::Deleted;
                self.tombstones += 1;
                Some(e)
            }
            Bucket::Empty | Bucket::Deleted => None,
        }
    }

    /// Resets every bucket to empty, keeping the allocation.
    pub fn clear(&mut self) {
        self.buckets.fill(Bucket::Empty);
        self.tombstones = 0;
    }

    pub fn free(&mut self) {
        self.buckets.free();
        self.tombstones = 0;
    }
}

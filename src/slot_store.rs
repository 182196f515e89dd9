//! SlotStore: indexed storage that recycles vacated slots.
//!
//! Slots live in a [`GrowableArray`]; removing one leaves it vacant and
//! records its index on a reclamation list. Inserts pop the most recently
//! freed index before appending, so repeated insert/remove cycles do not
//! grow the store. Indices of live slots never move.

use crate::config::ArrayConfig;
use crate::error::{fatal, Result};
use crate::growable_array::GrowableArray;

#[derive(Clone, Debug)]
pub struct SlotStore<T> {
    slots: GrowableArray<Option<T>>,
    reclaimed: GrowableArray<usize>,
}

impl<T> SlotStore<T> {
    pub const fn new() -> Self {
        Self {
            slots: GrowableArray::new(),
            reclaimed: GrowableArray::new(),
        }
    }

    pub fn with_config(config: ArrayConfig) -> Result<Self> {
        Ok(Self {
            slots: GrowableArray::with_config(config)?,
            reclaimed: GrowableArray::with_config(config)?,
        })
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.reclaimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots ever handed out, vacant ones included.
    pub fn range(&self) -> usize {
        self.slots.len()
    }

    /// Number of vacant slots waiting for reuse.
    pub fn reclaimed(&self) -> usize {
        self.reclaimed.len()
    }

    /// Makes sure the next insert does not allocate.
    pub fn try_reserve_slot(&mut self) -> Result<()> {
        if self.reclaimed.is_empty() {
            self.slots.try_reserve(self.slots.len().saturating_add(1))?;
        }
        Ok(())
    }

    /// Ensures room for `capacity` slots in total.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        self.slots.try_reserve(capacity)
    }

    pub fn insert(&mut self, value: T) -> usize {
        self.try_insert(value).unwrap_or_else(|e| fatal(e))
    }

    /// Stores `value`, reusing the most recently vacated slot if any.
    pub fn try_insert(&mut self, value: T) -> Result<usize> {
        match self.reclaimed.pop() {
            Some(index) => {
                log::trace!("reusing slot {index}");
                debug_assert!(self.slots[index].is_none(), "reclaimed slot {index} is live");
                self.slots[index] = Some(value);
                Ok(index)
            }
            None => self.slots.try_push(Some(value)),
        }
    }

    /// Vacates `index` and returns its value. `None` if the slot is out of
    /// range or already vacant.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.reclaimed.push(index);
        Some(value)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Every slot in index order; vacant slots are `None`.
    pub fn raw(&self) -> &[Option<T>] {
        self.slots.as_slice()
    }

    /// Live slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (i, v)))
    }

    /// Drops every value, keeping allocations.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.reclaimed.clear();
    }

    /// Drops every value and releases allocations.
    pub fn free(&mut self) {
        self.slots.free();
        self.reclaimed.free();
    }
}

impl<T> Default for SlotStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_appends_then_reuses_lifo() {
        let mut s = SlotStore::new();
        assert_eq!(s.insert("a"), 0);
        assert_eq!(s.insert("b"), 1);
        assert_eq!(s.insert("c"), 2);

        assert_eq!(s.remove(0), Some("a"));
        assert_eq!(s.remove(2), Some("c"));
        assert_eq!(s.len(), 1);
        assert_eq!(s.reclaimed(), 2);
        assert_eq!(s.range(), 3);

        assert_eq!(s.insert("d"), 2);
        assert_eq!(s.insert("e"), 0);
        assert_eq!(s.insert("f"), 3);
        assert_eq!(s.reclaimed(), 0);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn remove_vacant_or_out_of_range_is_none() {
        let mut s = SlotStore::new();
        let i = s.insert(1);
        assert_eq!(s.remove(i), Some(1));
        assert_eq!(s.remove(i), None);
        assert_eq!(s.remove(99), None);
        assert_eq!(s.reclaimed(), 1);
    }

    #[test]
    fn raw_view_keeps_vacant_slots() {
        let mut s = SlotStore::new();
        s.insert(10);
        s.insert(20);
        s.insert(30);
        s.remove(1);
        assert_eq!(s.raw(), &[Some(10), None, Some(30)]);
        let live: Vec<_> = s.iter().collect();
        assert_eq!(live, vec![(0, &10), (2, &30)]);

        for (_, v) in s.iter_mut() {
            *v += 1;
        }
        assert_eq!(s.get(2), Some(&31));
        assert_eq!(s.get(1), None);
    }

    #[test]
    fn reserve_slot_prevents_allocation_on_insert() {
        let mut s: SlotStore<u64> = SlotStore::new();
        for i in 0..16 {
            s.insert(i);
        }
        s.try_reserve_slot().unwrap();
        let cap = s.slots.capacity();
        assert!(cap >= 17);
        s.insert(16);
        assert_eq!(s.slots.capacity(), cap);
    }

    #[test]
    fn clear_and_free() {
        let mut s = SlotStore::new();
        s.insert('x');
        s.remove(0);
        s.clear();
        assert_eq!(s.range(), 0);
        assert_eq!(s.reclaimed(), 0);
        s.insert('y');
        s.free();
        assert!(s.is_empty());
        assert_eq!(s.insert('z'), 0);
    }
}

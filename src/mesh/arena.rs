//! Creation-ordered element storage.
//!
//! A [`SlotMap`] gives O(1) insert/remove and generation-checked keys, but
//! iterates in slot order, which stops matching creation order as soon as a
//! freed slot is reused. [`Arena`] keeps a side list of keys in insertion
//! order; dead keys are skipped on iteration and dropped in bulk once they
//! make up most of the list.

use std::ops::{Index, IndexMut};

use slotmap::{Key, SlotMap};

#[derive(Debug, Clone)]
pub(crate) struct Arena<K: Key, V> {
    slots: SlotMap<K, V>,
    order: Vec<K>,
}

impl<K: Key, V> Arena<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, value: V) -> K {
        let key = self.slots.insert(value);
        self.order.push(key);
        key
    }

    pub fn remove(&mut self, key: K) -> Option<V> {
        let value = self.slots.remove(key)?;
        if self.order.len() > 2 * self.slots.len() + 32 {
            let slots = &self.slots;
            self.order.retain(|&k| slots.contains_key(k));
        }
        Some(value)
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Live keys in creation order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.order
            .iter()
            .copied()
            .filter(move |&k| self.slots.contains_key(k))
    }

    /// Live entries in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.order
            .iter()
            .filter_map(move |&k| self.slots.get(k).map(|v| (k, v)))
    }

    /// Mutable access to every live value, in slot order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.slots.values_mut()
    }
}

impl<K: Key, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<K: Key, V> Index<K> for Arena<K, V> {
    type Output = V;

    #[inline]
    fn index(&self, key: K) -> &V {
        &self.slots[key]
    }
}

impl<K: Key, V> IndexMut<K> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, key: K) -> &mut V {
        &mut self.slots[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexId;

    #[test]
    fn test_creation_order_survives_slot_reuse() {
        let mut arena: Arena<VertexId, &str> = Arena::default();
        let a = arena.insert("a");
        let b = arena.insert("b");
        let c = arena.insert("c");

        arena.remove(a);
        let d = arena.insert("d"); // reuses a's slot

        let keys: Vec<_> = arena.keys().collect();
        assert_eq!(keys, vec![b, c, d]);
        assert_eq!(arena.len(), 3);
        assert!(!arena.contains(a));
    }

    #[test]
    fn test_order_list_is_compacted() {
        let mut arena: Arena<VertexId, usize> = Arena::default();
        let keys: Vec<_> = (0..200).map(|i| arena.insert(i)).collect();
        for &k in &keys[..150] {
            arena.remove(k);
        }

        assert!(arena.order.len() < 200);
        let values: Vec<_> = arena.iter().map(|(_, &v)| v).collect();
        assert_eq!(values, (150..200).collect::<Vec<_>>());
    }
}

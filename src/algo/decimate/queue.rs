//! A min-priority queue whose entries can be removed by key.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// `f64` ordered with [`f64::total_cmp`].
#[derive(Debug, Clone, Copy)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Min-priority queue keyed by `K`.
///
/// Entries pop in ascending cost; equal costs pop in insertion order. Each key
/// holds at most one entry, and any entry can be removed by its key in
/// O(log n).
#[derive(Debug, Clone)]
pub struct MutablePriorityQueue<K, V> {
    entries: BTreeMap<(Cost, u64), (K, V)>,
    slots: HashMap<K, (Cost, u64)>,
    next_seq: u64,
}

impl<K: Copy + Eq + Hash, V> MutablePriorityQueue<K, V> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            slots: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Insert an entry, replacing any entry already queued under `key`.
    pub fn insert(&mut self, key: K, cost: f64, value: V) {
        self.remove(key);
        let slot = (Cost(cost), self.next_seq);
        self.next_seq += 1;
        self.entries.insert(slot, (key, value));
        self.slots.insert(key, slot);
    }

    /// Remove the entry queued under `key`.
    pub fn remove(&mut self, key: K) -> Option<V> {
        let slot = self.slots.remove(&key)?;
        self.entries.remove(&slot).map(|(_, value)| value)
    }

    /// Remove and return the cheapest entry.
    pub fn pop(&mut self) -> Option<(K, f64, V)> {
        let ((cost, _), (key, value)) = self.entries.pop_first()?;
        self.slots.remove(&key);
        Some((key, cost.0, value))
    }

    /// The cheapest entry, without removing it.
    pub fn peek(&self) -> Option<(K, f64, &V)> {
        self.entries
            .first_key_value()
            .map(|((cost, _), (key, value))| (*key, cost.0, value))
    }

    /// All queued entries, cheapest first.
    pub fn iter(&self) -> impl Iterator<Item = (K, f64, &V)> + '_ {
        self.entries
            .iter()
            .map(|((cost, _), (key, value))| (*key, cost.0, value))
    }

    /// True if an entry is queued under `key`.
    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(&key)
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy + Eq + Hash, V> Default for MutablePriorityQueue<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

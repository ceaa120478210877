//! Separate-chaining hash index.
//!
//! [`KeyedIndex`] backs every lookup in the crate: version id to node within a
//! document, document name to document, and heap key to array position. The
//! table walks a fixed ladder of prime capacities ([`CAPACITIES`]), growing and
//! rehashing every entry once the load factor passes [`MAX_LOAD_FACTOR`]. At
//! the top of the ladder growth stops and chains simply get longer.

mod key;

use std::borrow::Borrow;

pub use key::{IndexKey, CAPACITIES};

/// Load factor above which an insertion triggers a resize.
pub const MAX_LOAD_FACTOR: f64 = 0.8;

/// A hash map keyed by any [`IndexKey`].
#[derive(Debug, Clone)]
pub struct KeyedIndex<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
    tiers: &'static [usize],
    tier: usize,
    saturated: bool,
}

impl<K: IndexKey + Eq, V> Default for KeyedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey + Eq, V> KeyedIndex<K, V> {
    pub fn new() -> Self {
        Self::with_tiers(CAPACITIES)
    }

    /// Create an index that grows through `tiers` instead of the default
    /// ladder. `tiers` must be non-empty and ascending.
    pub fn with_tiers(tiers: &'static [usize]) -> Self {
        assert!(!tiers.is_empty(), "index needs at least one capacity tier");
        Self {
            buckets: empty_buckets(tiers[0]),
            len: 0,
            tiers,
            tier: 0,
            saturated: false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// True once a resize was needed at the largest configured capacity.
    /// The index stays correct; lookups just scan longer chains.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// Insert or overwrite. Returns the previous value for `key`, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let slot = key.bucket(self.capacity());
        if let Some((_, existing)) = self.buckets[slot].iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }

        self.buckets[slot].push((key, value));
        self.len += 1;
        if self.load_factor() > MAX_LOAD_FACTOR {
            self.grow();
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: IndexKey + Eq + ?Sized,
    {
        let slot = key.bucket(self.capacity());
        self.buckets[slot]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: IndexKey + Eq + ?Sized,
    {
        let slot = key.bucket(self.capacity());
        self.buckets[slot]
            .iter_mut()
            .find(|(k, _)| (*k).borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: IndexKey + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: IndexKey + Eq + ?Sized,
    {
        let slot = key.bucket(self.capacity());
        let chain = &mut self.buckets[slot];
        let position = chain.iter().position(|(k, _)| k.borrow() == key)?;
        let (_, value) = chain.swap_remove(position);
        self.len -= 1;
        Some(value)
    }

    /// Entries in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|(k, v)| (k, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Visit every entry in bucket order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.iter() {
            visit(key, value);
        }
    }

    fn grow(&mut self) {
        let Some(&next) = self.tiers.get(self.tier + 1) else {
            if !self.saturated {
                tracing::warn!(
                    capacity = self.capacity(),
                    entries = self.len,
                    "index reached its largest capacity, chains will grow"
                );
                self.saturated = true;
            }
            return;
        };

        let previous = std::mem::replace(&mut self.buckets, empty_buckets(next));
        self.tier += 1;
        for (key, value) in previous.into_iter().flatten() {
            let slot = key.bucket(next);
            self.buckets[slot].push((key, value));
        }
        tracing::debug!(capacity = next, entries = self.len, "rehashed index");
    }
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Vec<(K, V)>> {
    (0..capacity).map(|_| Vec::new()).collect()
}

//! Max-heap ranking with positional index.
//!
//! [`RankHeap`] keeps `(key, score)` pairs in an array-backed binary heap and
//! remembers where every key currently sits, so a score change or removal is a
//! single O(log n) sift instead of a scan. Ranking order is score descending,
//! then key ascending, which makes it a total order: the same live pairs always
//! rank the same way regardless of the operations that produced them.

use std::borrow::Borrow;
use std::cmp::Ordering;

use serde::Serialize;

use crate::index::{IndexKey, KeyedIndex};

/// A key with its current score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked<K> {
    pub key: K,
    pub score: u64,
}

impl<K: Ord> Ranked<K> {
    /// Ordering used by the heap: `Greater` means `self` ranks first.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.key.cmp(&self.key))
    }

    fn outranks(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Greater
    }
}

#[derive(Debug, Clone)]
pub struct RankHeap<K> {
    entries: Vec<Ranked<K>>,
    positions: KeyedIndex<K, usize>,
}

impl<K> Default for RankHeap<K>
where
    K: IndexKey + Eq + Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RankHeap<K>
where
    K: IndexKey + Eq + Ord + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: KeyedIndex::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: IndexKey + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    pub fn score<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: IndexKey + Eq + ?Sized,
    {
        let &index = self.positions.get(key)?;
        Some(self.entries[index].score)
    }

    /// The top-ranked entry.
    pub fn peek(&self) -> Option<&Ranked<K>> {
        self.entries.first()
    }

    /// Add `key`, or change its score if it is already ranked.
    pub fn insert_or_update(&mut self, key: K, score: u64) {
        if self.positions.contains_key(&key) {
            self.update(&key, score);
            return;
        }

        let index = self.entries.len();
        self.positions.insert(key.clone(), index);
        self.entries.push(Ranked { key, score });
        self.sift_up(index);
    }

    /// Overwrite the score of `key`. Returns `false` (and does nothing) if
    /// `key` is not ranked.
    pub fn update<Q>(&mut self, key: &Q, score: u64) -> bool
    where
        K: Borrow<Q>,
        Q: IndexKey + Eq + ?Sized,
    {
        let Some(&index) = self.positions.get(key) else {
            return false;
        };

        let previous = std::mem::replace(&mut self.entries[index].score, score);
        match score.cmp(&previous) {
            Ordering::Greater => {
                self.sift_up(index);
            }
            Ordering::Less => self.sift_down(index),
            Ordering::Equal => {}
        }
        true
    }

    /// Remove `key`, returning the score it had.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: IndexKey + Eq + ?Sized,
    {
        let index = self.positions.remove(key)?;
        let removed = self.entries.swap_remove(index);

        if index < self.entries.len() {
            self.positions.insert(self.entries[index].key.clone(), index);
            if self.sift_up(index) == index {
                self.sift_down(index);
            }
        }
        Some(removed.score)
    }

    /// The `k` best entries, best first. Works on a scratch copy; the live
    /// heap is left untouched.
    pub fn top_k(&self, k: usize) -> Vec<Ranked<K>> {
        let mut scratch = self.entries.clone();
        let mut top = Vec::with_capacity(k.min(scratch.len()));

        while top.len() < k && !scratch.is_empty() {
            let best = scratch.swap_remove(0);
            sift_down_by(&mut scratch, 0, |_, _| {});
            top.push(best);
        }
        top
    }

    /// Returns the index the entry ended up at.
    fn sift_up(&mut self, index: usize) -> usize {
        let positions = &mut self.positions;
        sift_up_by(&mut self.entries, index, |entry, at| {
            if let Some(slot) = positions.get_mut(&entry.key) {
                *slot = at;
            }
        })
    }

    fn sift_down(&mut self, index: usize) {
        let positions = &mut self.positions;
        sift_down_by(&mut self.entries, index, |entry, at| {
            if let Some(slot) = positions.get_mut(&entry.key) {
                *slot = at;
            }
        });
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        for (index, entry) in self.entries.iter().enumerate() {
            assert_eq!(self.positions.get(&entry.key), Some(&index));
            if index > 0 {
                let parent = &self.entries[(index - 1) / 2];
                assert!(!entry.outranks(parent), "heap order violated at {index}");
            }
        }
        assert_eq!(self.positions.len(), self.entries.len());
    }
}

/// Move `entries[index]` towards the root while it outranks its parent.
/// `moved` is told about every entry that changes slot.
fn sift_up_by<K: Ord>(
    entries: &mut [Ranked<K>],
    mut index: usize,
    mut moved: impl FnMut(&Ranked<K>, usize),
) -> usize {
    while index > 0 {
        let parent = (index - 1) / 2;
        if !entries[index].outranks(&entries[parent]) {
            break;
        }
        entries.swap(index, parent);
        moved(&entries[index], index);
        moved(&entries[parent], parent);
        index = parent;
    }
    index
}

fn sift_down_by<K: Ord>(
    entries: &mut [Ranked<K>],
    mut index: usize,
    mut moved: impl FnMut(&Ranked<K>, usize),
) {
    let len = entries.len();
    loop {
        let mut best = index;
        for child in [2 * index + 1, 2 * index + 2] {
            if child < len && entries[child].outranks(&entries[best]) {
                best = child;
            }
        }
        if best == index {
            break;
        }
        entries.swap(index, best);
        moved(&entries[index], index);
        moved(&entries[best], best);
        index = best;
    }
}

//! Binary heap with lazy deletion of arbitrary values

use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::iter;

/// Physical entries tolerated on top of twice the live count before compacting
const COMPACT_SLACK: usize = 16;

/// Max-heap that supports removing any value in amortized O(log n).
///
/// A removed value is only counted as pending; its copy stays inside the
/// underlying `BinaryHeap` until it reaches the top, where it is discarded.
/// The top is pruned after every mutation, so `peek` always returns a live
/// value. When buried copies outnumber live entries the heap is rebuilt from
/// the live counts, which keeps its physical size within `2 * len + 16`.
/// Wrap values in `std::cmp::Reverse` for a min-heap.
#[derive(Debug, Clone)]
pub struct LazyHeap<T> {
    /// Live and pending entries
    heap: BinaryHeap<T>,

    /// Number of live copies per value
    live: HashMap<T, usize>,

    /// Number of removed copies per value still buried in `heap`
    pending: HashMap<T, usize>,

    /// Number of live entries
    len: usize,
}

impl<T: Ord + Hash + Copy> Default for LazyHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Hash + Copy> LazyHeap<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            pending: HashMap::new(),
            len: 0,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest live entry
    pub fn peek(&self) -> Option<&T> {
        self.heap.peek()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.live.contains_key(value)
    }

    pub fn push(&mut self, value: T) {
        self.heap.push(value);
        *self.live.entry(value).or_insert(0) += 1;
        self.len += 1;
    }

    /// Remove and return the largest live entry
    pub fn pop(&mut self) -> Option<T> {
        let value = self.heap.pop()?;
        let released = self.release(&value);
        debug_assert!(released, "heap top must be live");
        self.len -= 1;
        self.prune();
        Some(value)
    }

    /// Remove one copy of `value`. Returns false if no live copy exists.
    pub fn remove(&mut self, value: &T) -> bool {
        if !self.release(value) {
            return false;
        }
        self.len -= 1;
        *self.pending.entry(*value).or_insert(0) += 1;
        self.prune();
        if self.heap.len() > 2 * self.len + COMPACT_SLACK {
            self.compact();
        }
        true
    }

    /// Iterate over live values with their multiplicities, in no particular order
    pub fn counts(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.live.iter().map(|(value, &count)| (value, count))
    }

    fn release(&mut self, value: &T) -> bool {
        match self.live.get_mut(value) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    self.live.remove(value);
                }
                true
            }
            None => false,
        }
    }

    /// Drop pending removals sitting at the top of the heap
    fn prune(&mut self) {
        while let Some(&top) = self.heap.peek() {
            let Some(count) = self.pending.get_mut(&top) else {
                break;
            };
            *count -= 1;
            if *count == 0 {
                self.pending.remove(&top);
            }
            self.heap.pop();
        }
    }

    /// Rebuild the heap from live counts, dropping every pending copy
    fn compact(&mut self) {
        let entries: Vec<T> = self
            .live
            .iter()
            .flat_map(|(&value, &count)| iter::repeat(value).take(count))
            .collect();
        self.heap = BinaryHeap::from(entries);
        self.pending.clear();
    }
}

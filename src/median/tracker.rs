//! Running median over a multiset that supports removals

use std::cmp::Reverse;

use crate::median::heap::LazyHeap;

/// Multiset of non-negative integers with O(log n) add/remove and O(1) median.
///
/// Values are split in two halves: `lower` is a max-heap holding values at
/// or below the median, `upper` a min-heap holding values at or above it.
/// After every operation `lower` has either as many entries as `upper` or
/// exactly one more.
#[derive(Debug, Default, Clone)]
pub struct StreamingMedianTracker {
    lower: LazyHeap<usize>,
    upper: LazyHeap<Reverse<usize>>,
}

impl StreamingMedianTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of tracked values
    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Sizes of the lower and upper halves
    pub fn halves(&self) -> (usize, usize) {
        (self.lower.len(), self.upper.len())
    }

    /// Insert one occurrence of `value`
    pub fn add(&mut self, value: usize) {
        match self.lower.peek() {
            Some(&max) if value > max => self.upper.push(Reverse(value)),
            _ => self.lower.push(value),
        }
        self.rebalance();
    }

    /// Remove one occurrence of `value`.
    ///
    /// A value equal to both the maximum of `lower` and the minimum of
    /// `upper` is taken from `lower`. Removing an untracked value is a no-op
    /// and returns false.
    pub fn remove(&mut self, value: usize) -> bool {
        let lower_max = self.lower.peek().copied();
        let upper_min = self.upper.peek().map(|&Reverse(min)| min);

        let removed = match (lower_max, upper_min) {
            (Some(max), _) if value <= max => self.lower.remove(&value),
            (_, Some(min)) if value >= min => self.upper.remove(&Reverse(value)),
            _ => false,
        };
        self.rebalance();
        removed
    }

    /// Current median, or 0.0 when nothing is tracked
    pub fn median(&self) -> f64 {
        let Some(&max) = self.lower.peek() else {
            return 0.0;
        };
        if self.lower.len() > self.upper.len() {
            return max as f64;
        }
        match self.upper.peek() {
            Some(&Reverse(min)) => (max as f64 + min as f64) / 2.0,
            None => max as f64,
        }
    }

    /// All tracked values in ascending order
    pub fn sorted_values(&self) -> Vec<usize> {
        let mut values: Vec<usize> = self
            .lower
            .counts()
            .flat_map(|(&value, count)| std::iter::repeat(value).take(count))
            .chain(
                self.upper
                    .counts()
                    .flat_map(|(&Reverse(value), count)| std::iter::repeat(value).take(count)),
            )
            .collect();
        values.sort_unstable();
        values
    }

    fn rebalance(&mut self) {
        if self.lower.len() > self.upper.len() + 1 {
            if let Some(max) = self.lower.pop() {
                self.upper.push(Reverse(max));
            }
        } else if self.lower.len() < self.upper.len() {
            if let Some(Reverse(min)) = self.upper.pop() {
                self.lower.push(min);
            }
        }
    }
}

//! Degree-delta batching for eviction passes

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;

use crate::median::StreamingMedianTracker;

/// Degree changes accumulated over one eviction pass.
///
/// For each vertex touched during the pass, keeps the degree it had before
/// its first touch and the degree it has now. Only the net difference between
/// the two degree histograms is pushed into the tracker.
#[derive(Debug, Default)]
pub struct DegreeDelta {
    initial: HashMap<String, usize>,
    current: HashMap<String, usize>,
}

/// Tracker operations needed to move from the old to the new histogram
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeltaPlan {
    /// degree -> number of `remove` calls
    pub removals: BTreeMap<usize, usize>,

    /// degree -> number of `add` calls (degree 0 never appears)
    pub additions: BTreeMap<usize, usize>,
}

impl DeltaPlan {
    /// Total tracker calls this plan issues
    pub fn operation_count(&self) -> usize {
        self.removals.values().sum::<usize>() + self.additions.values().sum::<usize>()
    }

    pub fn apply(&self, tracker: &mut StreamingMedianTracker) {
        for (&degree, &count) in &self.removals {
            for _ in 0..count {
                tracker.remove(degree);
            }
        }
        for (&degree, &count) in &self.additions {
            for _ in 0..count {
                tracker.add(degree);
            }
        }
    }
}

impl DegreeDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `vertex` went from `before` to `after` neighbors
    pub fn record(&mut self, vertex: &str, before: usize, after: usize) {
        if !self.initial.contains_key(vertex) {
            self.initial.insert(vertex.to_owned(), before);
        }
        self.current.insert(vertex.to_owned(), after);
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    /// Number of distinct vertices touched
    pub fn touched(&self) -> usize {
        self.initial.len()
    }

    /// Cancel degrees common to both histograms and keep the net change
    pub fn plan(&self) -> DeltaPlan {
        let mut old = self.initial.values().copied().counts();
        let mut new = self.current.values().copied().counts();

        for (degree, old_count) in old.iter_mut() {
            if let Some(new_count) = new.get_mut(degree) {
                let common = (*old_count).min(*new_count);
                *old_count -= common;
                *new_count -= common;
            }
        }

        DeltaPlan {
            removals: old.into_iter().filter(|&(_, count)| count > 0).collect(),
            additions: new
                .into_iter()
                .filter(|&(degree, count)| degree > 0 && count > 0)
                .collect(),
        }
    }
}

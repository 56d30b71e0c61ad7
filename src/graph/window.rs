//! Sliding-time-window graph with a running degree median

use std::collections::{BTreeMap, HashMap, HashSet};
use std::num::NonZeroU32;

use crate::graph::edge::EdgeKey;
use crate::graph::eviction::DegreeDelta;
use crate::median::StreamingMedianTracker;

/// What `process_event` did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// New edge added to the graph
    Inserted,

    /// Known edge, last-seen time moved forward
    Refreshed,

    /// Known edge seen again at an older or equal time
    Unchanged,

    /// Event older than the window; ignored
    Stale,

    /// Actor and target are the same vertex; rejected
    SelfLoop,
}

impl EventOutcome {
    /// Whether the event counts as consumed. Only self-loops are rejected.
    pub fn is_accepted(self) -> bool {
        !matches!(self, EventOutcome::SelfLoop)
    }
}

/// Undirected graph of the edges seen within the last `window_seconds`
/// before the watermark, maintaining the median vertex degree.
///
/// Each vertex owns its neighbor set inside a single adjacency map; a vertex
/// whose set becomes empty is removed. The tracker holds exactly one entry
/// per vertex, valued at its degree.
#[derive(Debug)]
pub struct SlidingWindowDegreeGraph {
    window_seconds: NonZeroU32,

    /// Largest timestamp of an inserted edge; unset until the first insert
    watermark: Option<i64>,

    /// vertex -> neighbors
    adjacency: HashMap<String, HashSet<String>>,

    /// edge -> last time it was observed
    edges: HashMap<EdgeKey, i64>,

    /// timestamp -> edges last observed at that time
    time_index: BTreeMap<i64, HashSet<EdgeKey>>,

    tracker: StreamingMedianTracker,
}

impl SlidingWindowDegreeGraph {
    pub fn new(window_seconds: NonZeroU32) -> Self {
        Self {
            window_seconds,
            watermark: None,
            adjacency: HashMap::new(),
            edges: HashMap::new(),
            time_index: BTreeMap::new(),
            tracker: StreamingMedianTracker::new(),
        }
    }

    /// Feed one event. Returns false only for self-loops.
    pub fn accept_event(&mut self, actor: &str, target: &str, timestamp: i64) -> bool {
        self.process_event(actor, target, timestamp).is_accepted()
    }

    /// Feed one event and report how it affected the graph
    pub fn process_event(&mut self, actor: &str, target: &str, timestamp: i64) -> EventOutcome {
        if actor == target {
            return EventOutcome::SelfLoop;
        }
        if self.is_expired(timestamp) {
            return EventOutcome::Stale;
        }

        let key = EdgeKey::new(actor, target);

        if let Some(&seen) = self.edges.get(&key) {
            if timestamp <= seen {
                return EventOutcome::Unchanged;
            }
            self.unindex(seen, &key);
            self.time_index
                .entry(timestamp)
                .or_default()
                .insert(key.clone());
            self.edges.insert(key, timestamp);
            return EventOutcome::Refreshed;
        }

        self.time_index
            .entry(timestamp)
            .or_default()
            .insert(key.clone());
        self.edges.insert(key, timestamp);

        if self.watermark.map_or(true, |watermark| timestamp > watermark) {
            self.watermark = Some(timestamp);
            self.evict_expired();
        }

        self.link(actor, target);
        EventOutcome::Inserted
    }

    /// Median degree over all vertices, 0.0 for an empty graph
    pub fn current_median(&self) -> f64 {
        self.tracker.median()
    }

    /// Number of neighbors of `vertex`, 0 if absent
    pub fn degree(&self, vertex: &str) -> usize {
        self.adjacency.get(vertex).map_or(0, HashSet::len)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Last time the edge between `a` and `b` was observed, if it is in the window
    pub fn last_seen(&self, a: &str, b: &str) -> Option<i64> {
        self.edges.get(&EdgeKey::new(a, b)).copied()
    }

    pub fn watermark(&self) -> Option<i64> {
        self.watermark
    }

    pub fn window_seconds(&self) -> u32 {
        self.window_seconds.get()
    }

    pub fn tracker(&self) -> &StreamingMedianTracker {
        &self.tracker
    }

    fn window(&self) -> i64 {
        i64::from(self.window_seconds.get())
    }

    fn is_expired(&self, timestamp: i64) -> bool {
        self.watermark
            .map_or(false, |watermark| watermark.saturating_sub(timestamp) >= self.window())
    }

    fn unindex(&mut self, timestamp: i64, key: &EdgeKey) {
        if let Some(bucket) = self.time_index.get_mut(&timestamp) {
            bucket.remove(key);
            if bucket.is_empty() {
                self.time_index.remove(&timestamp);
            }
        }
    }

    /// Connect two vertices that were not neighbors and update the tracker
    fn link(&mut self, actor: &str, target: &str) {
        let before_actor = self.degree(actor);
        let before_target = self.degree(target);

        self.adjacency
            .entry(actor.to_owned())
            .or_default()
            .insert(target.to_owned());
        self.adjacency
            .entry(target.to_owned())
            .or_default()
            .insert(actor.to_owned());

        for before in [before_actor, before_target] {
            if before > 0 {
                self.tracker.remove(before);
            }
        }
        self.tracker.add(self.degree(actor));
        self.tracker.add(self.degree(target));
    }

    /// Drop every edge whose bucket fell out of the window.
    /// Returns the number of tracker updates issued.
    fn evict_expired(&mut self) -> usize {
        let Some(watermark) = self.watermark else {
            return 0;
        };
        // Buckets at or below the cutoff satisfy `watermark - t >= window`
        let cutoff = watermark.saturating_sub(self.window());
        let retained = self.time_index.split_off(&cutoff.saturating_add(1));
        let expired = std::mem::replace(&mut self.time_index, retained);
        if expired.is_empty() {
            return 0;
        }

        let mut delta = DegreeDelta::new();
        let mut evicted = 0;
        for key in expired.into_values().flatten() {
            self.edges.remove(&key);
            let (a, b) = key.endpoints();
            self.detach(a, b, &mut delta);
            self.detach(b, a, &mut delta);
            evicted += 1;
        }

        let plan = delta.plan();
        plan.apply(&mut self.tracker);
        log::debug!(
            "Evicted {} edges up to t={}, {} vertices touched, {} tracker updates",
            evicted,
            cutoff,
            delta.touched(),
            plan.operation_count()
        );
        plan.operation_count()
    }

    fn detach(&mut self, vertex: &str, neighbor: &str, delta: &mut DegreeDelta) {
        let Some(neighbors) = self.adjacency.get_mut(vertex) else {
            return;
        };
        let before = neighbors.len();
        neighbors.remove(neighbor);
        let after = neighbors.len();
        delta.record(vertex, before, after);

        if after == 0 {
            self.adjacency.remove(vertex);
        }
    }
}

//! Canonical identifiers for undirected edges

use std::fmt;

/// Unordered vertex pair, stored with the lexicographically smaller
/// identifier first so that `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    low: String,
    high: String,
}

impl EdgeKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_owned(),
            high: high.to_owned(),
        }
    }

    /// Both endpoints, smaller identifier first
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.low, self.high)
    }
}

//! Sliding-window graph and degree bookkeeping

pub mod edge;
pub mod eviction;
pub mod window;

pub use edge::EdgeKey;
pub use window::{EventOutcome, SlidingWindowDegreeGraph};

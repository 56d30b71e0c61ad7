//! Streaming order statistics

pub mod heap;
pub mod tracker;

pub use tracker::StreamingMedianTracker;

//! Core library functions for the rolling median degree analyzer

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod median;
pub mod pipeline;
pub mod storage;

pub use anyhow::{Result, anyhow};
pub use graph::{EventOutcome, SlidingWindowDegreeGraph};
pub use median::StreamingMedianTracker;

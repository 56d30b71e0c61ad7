//! Input records: parsing and synthetic generation

pub mod generator;
pub mod transaction;

pub use transaction::{parse_line, Transaction};

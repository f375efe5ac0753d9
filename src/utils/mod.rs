//! Utility functions

pub mod datetime;

pub use datetime::{normalize_date, IndexDate};

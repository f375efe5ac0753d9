//! Value types
//!
//! This module defines the values passed to batch updates and the report
//! they produce.

pub mod value;

pub use value::{BatchFailure, BatchOutcome, FieldUpdates, IndexedValues};

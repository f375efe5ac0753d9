//! Batch update values
//!
//! A batch maps symbolic field names to positional values. Singleton fields
//! use index 0.

use crate::core::error::PbcoreError;
use std::collections::BTreeMap;
use std::fmt;

/// Values for one field, keyed by position
pub type IndexedValues = BTreeMap<usize, String>;

/// An ordered set of field updates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdates {
    entries: Vec<(String, IndexedValues)>,
}

impl FieldUpdates {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set one value
    pub fn set(mut self, field: impl Into<String>, index: usize, value: impl Into<String>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, values)) => {
                values.insert(index, value);
            }
            None => {
                let mut values = IndexedValues::new();
                values.insert(index, value);
                self.entries.push((field, values));
            }
        }
        self
    }

    /// Builder: set several values of one field
    pub fn field(mut self, field: impl Into<String>, values: IndexedValues) -> Self {
        let field = field.into();
        for (index, value) in values {
            self = self.set(field.clone(), index, value);
        }
        self
    }

    /// Iterate over fields in the order they were first added
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexedValues)> {
        self.entries.iter().map(|(name, values)| (name.as_str(), values))
    }

    /// Total number of values in the batch
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    /// Check if the batch holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a batch from JSON, with indices written as strings
    ///
    /// ```rust
    /// use pbcorekit::FieldUpdates;
    ///
    /// let updates = FieldUpdates::from_json(
    ///     r#"{"contributor_name": {"0": "first", "1": "second"}}"#,
    /// ).unwrap();
    /// assert_eq!(updates.len(), 2);
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::core::error::PbcoreResult<Self> {
        let raw: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(json)
            .map_err(|e| PbcoreError::ParseError(format!("Invalid field updates: {}", e)))?;

        let mut updates = FieldUpdates::new();
        for (field, values) in raw {
            for (index, value) in values {
                let index: usize = index.trim().parse().map_err(|_| {
                    PbcoreError::ParseError(format!(
                        "Invalid index '{}' for field '{}'",
                        index, field
                    ))
                })?;
                updates = updates.set(field.as_str(), index, value);
            }
        }
        Ok(updates)
    }
}

/// One entry of a batch that could not be applied
#[derive(Debug)]
pub struct BatchFailure {
    /// Field name as given
    pub field: String,
    /// Position as given
    pub index: usize,
    /// Why the entry was rejected
    pub error: PbcoreError,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.field, self.index, self.error)
    }
}

/// Result of a report-and-continue batch update
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Number of entries applied
    pub applied: usize,
    /// Entries that failed, in batch order
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Check whether every entry was applied
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

//! # pbcorekit
//!
//! Symbolic field access for PBCore description documents.
//!
//! A PBCore document is deeply nested and full of repeatable groups. This
//! crate lets callers read and write it through a flat vocabulary of field
//! names (`main_title`, `contributor_name`, `event_date`, ...) and a
//! positional index, insert and remove groups from canonical templates,
//! and project the result onto a flat search index document.
//!
//! ```rust
//! use pbcorekit::PbcoreDocument;
//!
//! let mut doc = PbcoreDocument::new();
//! doc.set_value("main_title", "Live at the Agora").unwrap();
//! doc.insert_contributor("Jane Doe", "performer").unwrap();
//! doc.insert_contributor("", "").unwrap();
//! doc.update_value("contributor_name", 1, "John Roe").unwrap();
//! doc.insert_date("2012-11-11").unwrap();
//!
//! assert_eq!(
//!     doc.get_values("contributor_name").unwrap(),
//!     vec!["Jane Doe", "John Roe"]
//! );
//!
//! let index = doc.to_index().unwrap();
//! assert_eq!(index.get("event_date_dt").unwrap(), ["2012-11-11T00:00:00Z"]);
//! assert!(index.get("event_date_t").is_none());
//! ```

pub mod core;
pub mod index;
pub mod mapping;
pub mod templates;
pub mod types;
pub mod utils;

pub use crate::core::{PbcoreDocument, PbcoreError, PbcoreResult};
pub use crate::index::{FieldType, IndexAs, IndexDocument, ProjectionRule};
pub use crate::mapping::{FieldDescriptor, FieldScope, MappingTable, Target, Vivify};
pub use crate::templates::{GroupKind, SequenceDirection, Template, TemplateSettings};
pub use crate::types::{BatchFailure, BatchOutcome, FieldUpdates, IndexedValues};

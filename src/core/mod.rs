//! PBCore core module
//!
//! This module contains the element tree, declarative paths, XML parsing
//! and serialization, schema ordering, and the document itself.

pub mod document;
pub mod error;
pub mod namespace;
pub mod node;
pub mod parser;
pub mod path;
pub mod schema;
pub mod serializer;

pub use document::PbcoreDocument;
pub use error::{PbcoreError, PbcoreResult};
pub use namespace::{blank_root, BLANK_DOCUMENT, ROOT_ELEMENT};
pub use node::{Attribute, ElementNode, Node};
pub use parser::PbcoreParser;
pub use path::{build_path, parse_path, NodePath, Predicate, Step};
pub use serializer::PbcoreSerializer;

//! Symbolic field mapping
//!
//! This module binds caller-facing field names to locations in the document.
//! A [`MappingTable`] is built once and never mutated afterwards, so a
//! single instance can be shared by any number of documents and threads.
//!
//! Every field resolves to a [`FieldDescriptor`]:
//! - document fields: a path from the document root, singleton on write
//! - group fields: a path relative to the root of a repeatable group,
//!   addressed by the group instance's position
//! - group roots: the group root itself, readable and countable only

mod terms;

use crate::core::error::{PbcoreError, PbcoreResult};
use crate::core::path::NodePath;
use crate::templates::{GroupKind, Template};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static BUILTIN_TABLE: OnceLock<Arc<MappingTable>> = OnceLock::new();

/// What part of a located element a field reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Character data of the element
    Text,
    /// Value of the named attribute
    Attribute(String),
}

/// Where a field's path is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    /// Path is relative to the document root
    Document,
    /// Path is relative to each instance of a repeatable group
    Group(GroupKind),
}

/// How a missing node is created when a field is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vivify {
    /// Writes against a missing node fail
    Never,
    /// Missing path steps are created from their predicates
    Path,
    /// A template is inserted, then the path is located again
    Template(Template),
}

/// A resolved symbolic field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Symbolic name
    pub name: String,
    /// Anchor of `path`
    pub scope: FieldScope,
    /// Location of the field's element; empty for a group root
    pub path: NodePath,
    /// Text or attribute
    pub target: Target,
    /// Creation policy on write
    pub vivify: Vivify,
}

impl FieldDescriptor {
    /// Singleton field at a document path, vivified by path
    pub fn document(name: impl Into<String>, path: NodePath) -> Self {
        Self {
            name: name.into(),
            scope: FieldScope::Document,
            path,
            target: Target::Text,
            vivify: Vivify::Path,
        }
    }

    /// Field inside each instance of a group
    pub fn group(name: impl Into<String>, kind: GroupKind, path: NodePath) -> Self {
        Self {
            name: name.into(),
            scope: FieldScope::Group(kind),
            path,
            target: Target::Text,
            vivify: Vivify::Path,
        }
    }

    /// The group root itself
    pub fn group_root(kind: GroupKind) -> Self {
        Self {
            name: kind.name().to_string(),
            scope: FieldScope::Group(kind),
            path: NodePath::new(),
            target: Target::Text,
            vivify: Vivify::Never,
        }
    }

    /// Builder: read and write an attribute instead of the text
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Builder: set the creation policy
    pub fn with_vivify(mut self, vivify: Vivify) -> Self {
        self.vivify = vivify;
        self
    }

    /// Whether the field is addressed by group position
    pub fn is_indexed(&self) -> bool {
        matches!(self.scope, FieldScope::Group(_))
    }

    /// Group the field lives in, if any
    pub fn group_kind(&self) -> Option<GroupKind> {
        match self.scope {
            FieldScope::Group(kind) => Some(kind),
            FieldScope::Document => None,
        }
    }

    /// Whether the field names a whole group rather than a value
    pub fn is_group_root(&self) -> bool {
        self.is_indexed() && self.path.is_empty()
    }

    /// Whether writes are rejected
    pub fn is_read_only(&self) -> bool {
        self.is_group_root()
    }
}

/// Immutable table of symbolic fields
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    fields: HashMap<String, FieldDescriptor>,
    /// Field names in registration order
    order: Vec<String>,
}

impl MappingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in PBCore vocabulary, built on first use
    pub fn shared() -> Arc<MappingTable> {
        Arc::clone(BUILTIN_TABLE.get_or_init(|| Arc::new(terms::builtin())))
    }

    /// Builder: register a field
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn with_field(mut self, descriptor: FieldDescriptor) -> Self {
        if !self.fields.contains_key(&descriptor.name) {
            self.order.push(descriptor.name.clone());
        }
        self.fields.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Look up a field by name
    pub fn resolve(&self, field: &str) -> PbcoreResult<&FieldDescriptor> {
        self.fields
            .get(field)
            .ok_or_else(|| PbcoreError::UnknownField(field.to_string()))
    }

    /// Check whether a field is mapped
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterate over fields in registration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.order.iter().filter_map(|name| self.fields.get(name))
    }

    /// Number of mapped fields
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Load a table from its JSON form
    ///
    /// The JSON is an array of terms. `path` uses the step syntax of
    /// [`parse_path`](crate::core::path::parse_path); a term with a `group`
    /// is relative to that group and an empty path names the group root.
    /// `template` gives positional template arguments used to create the
    /// node on first write.
    ///
    /// ```rust
    /// use pbcorekit::MappingTable;
    ///
    /// let table = MappingTable::from_json(r#"[
    ///     {"name": "title", "path": "pbcoreTitle[@titleType='Main']"},
    ///     {"name": "title_type", "path": "pbcoreTitle", "attribute": "titleType"},
    ///     {"name": "performer", "group": "contributor", "path": "contributor"}
    /// ]"#).unwrap();
    /// assert!(table.resolve("performer").unwrap().is_indexed());
    /// assert!(table.resolve("main_title").is_err());
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> PbcoreResult<Self> {
        let entries: Vec<TermEntry> = serde_json::from_str(json)
            .map_err(|e| PbcoreError::ConfigError(format!("Invalid mapping table: {}", e)))?;

        let mut table = MappingTable::new();
        for entry in entries {
            if table.contains(&entry.name) {
                return Err(PbcoreError::ConfigError(format!(
                    "Field '{}' is mapped twice",
                    entry.name
                )));
            }
            table = table.with_field(entry.into_descriptor()?);
        }
        Ok(table)
    }
}

/// One term in the JSON form of a mapping table
#[cfg(feature = "serde")]
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TermEntry {
    name: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    attribute: Option<String>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    template: Option<Vec<String>>,
    #[serde(default = "default_vivify")]
    vivify: bool,
}

#[cfg(feature = "serde")]
fn default_vivify() -> bool {
    true
}

#[cfg(feature = "serde")]
impl TermEntry {
    fn into_descriptor(self) -> PbcoreResult<FieldDescriptor> {
        use crate::core::path::parse_path;

        if self.group.is_some() && self.template.is_some() {
            return Err(PbcoreError::ConfigError(format!(
                "Field '{}' is a group field and cannot name a template",
                self.name
            )));
        }

        let mut descriptor = match &self.group {
            Some(group) => {
                let kind: GroupKind = group.parse().map_err(|_| {
                    PbcoreError::ConfigError(format!(
                        "Field '{}' names unknown group '{}'",
                        self.name, group
                    ))
                })?;
                if self.path.is_empty() {
                    FieldDescriptor::group_root(kind)
                } else {
                    FieldDescriptor::group(self.name.as_str(), kind, parse_path(&self.path)?)
                }
            }
            None => FieldDescriptor::document(self.name.as_str(), parse_path(&self.path)?),
        };
        descriptor.name = self.name;

        if let Some(attribute) = self.attribute {
            descriptor = descriptor.with_target(Target::Attribute(attribute));
        }
        if descriptor.is_group_root() {
            return Ok(descriptor);
        }

        descriptor.vivify = match (self.template, self.vivify) {
            (_, false) => Vivify::Never,
            (Some(args), true) => {
                let Some((kind, rest)) = args.split_first() else {
                    return Err(PbcoreError::ConfigError(format!(
                        "Field '{}' has an empty template",
                        descriptor.name
                    )));
                };
                let kind: GroupKind = kind.parse().map_err(|_| {
                    PbcoreError::ConfigError(format!("Unknown template kind '{}'", kind))
                })?;
                let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
                Vivify::Template(Template::from_args(kind, &rest)?)
            }
            (None, true) => Vivify::Path,
        };
        Ok(descriptor)
    }
}

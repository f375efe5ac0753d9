//! PBCore document
//!
//! [`PbcoreDocument`] owns one element tree and exposes it through symbolic
//! fields. Every operation locates its target first and only then mutates,
//! so a failed call leaves the tree untouched.
//!
//! Group instances have no identity beyond their position: removing
//! contributor 0 makes the former contributor 1 the new contributor 0.

pub(crate) mod locate;

use crate::core::error::{PbcoreError, PbcoreResult};
use crate::core::namespace::blank_root;
use crate::core::node::ElementNode;
use crate::core::parser::PbcoreParser;
use crate::core::schema;
use crate::core::serializer::PbcoreSerializer;
use crate::index::{IndexDocument, ProjectionRule};
use crate::mapping::{FieldDescriptor, FieldScope, MappingTable, Target, Vivify};
use crate::templates::{GroupKind, SequenceDirection, Template, TemplateSettings};
use crate::types::value::{BatchFailure, BatchOutcome, FieldUpdates};
use locate::Address;
use std::io::{Read, Write};
use std::sync::Arc;

/// A PBCore description document
#[derive(Debug, Clone)]
pub struct PbcoreDocument {
    root: ElementNode,
    settings: TemplateSettings,
    table: Arc<MappingTable>,
}

impl PbcoreDocument {
    /// Create a blank document
    ///
    /// # Example
    ///
    /// ```rust
    /// use pbcorekit::PbcoreDocument;
    ///
    /// let mut doc = PbcoreDocument::new();
    /// doc.set_value("main_title", "Live at the Agora").unwrap();
    /// assert_eq!(doc.get_values("main_title").unwrap(), vec!["Live at the Agora"]);
    /// ```
    pub fn new() -> Self {
        Self {
            root: blank_root(),
            settings: TemplateSettings::default(),
            table: MappingTable::shared(),
        }
    }

    /// Builder: use institution settings for templates
    pub fn with_settings(mut self, settings: TemplateSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builder: resolve fields through a custom table
    pub fn with_table(mut self, table: Arc<MappingTable>) -> Self {
        self.table = table;
        self
    }

    /// Load a document from XML text
    pub fn parse(xml: &str) -> PbcoreResult<Self> {
        let root = PbcoreParser::new().parse(xml)?;
        Ok(Self {
            root,
            ..Self::new()
        })
    }

    /// Load a document from a reader
    pub fn from_reader<R: Read>(mut reader: R) -> PbcoreResult<Self> {
        let mut xml = String::new();
        reader.read_to_string(&mut xml)?;
        Self::parse(&xml)
    }

    /// Serialize the document as it currently stands
    pub fn to_xml(&self) -> PbcoreResult<String> {
        PbcoreSerializer::new().serialize(&self.root)
    }

    /// Serialize a copy with children re-sorted into schema order
    pub fn to_pbcore_xml(&self) -> PbcoreResult<String> {
        let mut root = self.root.clone();
        schema::reorder(&mut root);
        PbcoreSerializer::new().serialize(&root)
    }

    /// Write the serialized document to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> PbcoreResult<()> {
        writer.write_all(self.to_xml()?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// The root element
    pub fn root(&self) -> &ElementNode {
        &self.root
    }

    /// Settings used when building templates
    pub fn settings(&self) -> &TemplateSettings {
        &self.settings
    }

    /// The field table in use
    pub fn table(&self) -> &Arc<MappingTable> {
        &self.table
    }

    /// Look up a field's descriptor
    pub fn resolve(&self, field: &str) -> PbcoreResult<&FieldDescriptor> {
        self.table.resolve(field)
    }

    // ======================================================================
    // Reading
    // ======================================================================

    /// Element holding a field's value at a position
    pub fn locate(&self, field: &str, index: usize) -> PbcoreResult<&ElementNode> {
        let descriptor = self.table.resolve(field)?;
        let address = self.locate_address(descriptor, index)?;
        self.element(&address)
    }

    /// Every element holding a value of a field, in document order
    pub fn locate_all(&self, field: &str) -> PbcoreResult<Vec<&ElementNode>> {
        let descriptor = self.table.resolve(field)?;
        self.field_addresses(descriptor)
            .iter()
            .map(|address| self.element(address))
            .collect()
    }

    /// All current values of a field
    ///
    /// An empty list means nothing is present; it is not an error. Nodes
    /// lacking an attribute-backed value contribute nothing.
    pub fn get_values(&self, field: &str) -> PbcoreResult<Vec<String>> {
        let descriptor = self.table.resolve(field)?;
        let mut values = Vec::new();
        for address in self.field_addresses(descriptor) {
            if let Some(value) = read_target(self.element(&address)?, &descriptor.target) {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Value of a field at a position
    pub fn get_value(&self, field: &str, index: usize) -> PbcoreResult<String> {
        let descriptor = self.table.resolve(field)?;
        let address = self.locate_address(descriptor, index)?;
        read_target(self.element(&address)?, &descriptor.target).ok_or_else(|| {
            let attribute = match &descriptor.target {
                Target::Attribute(name) => name.as_str(),
                Target::Text => "",
            };
            PbcoreError::NodeNotFound(format!("{} @{}", descriptor.name, attribute))
        })
    }

    /// Number of addressable positions of a field
    ///
    /// For group fields this is the number of group instances.
    pub fn count(&self, field: &str) -> PbcoreResult<usize> {
        let descriptor = self.table.resolve(field)?;
        Ok(match descriptor.scope {
            FieldScope::Document => locate::find_all(&self.root, &descriptor.path).len(),
            FieldScope::Group(kind) => self.group_addresses(kind).len(),
        })
    }

    // ======================================================================
    // Updating
    // ======================================================================

    /// Set a field's value at a position
    ///
    /// A missing singleton is created at index 0. A group field beyond the
    /// current number of instances fails; insert the group first.
    pub fn update_value(&mut self, field: &str, index: usize, value: &str) -> PbcoreResult<()> {
        let table = Arc::clone(&self.table);
        let descriptor = table.resolve(field)?;
        if descriptor.is_read_only() {
            return Err(PbcoreError::ReadOnlyField(field.to_string()));
        }

        let address = match self.locate_address(descriptor, index) {
            Ok(address) => address,
            Err(PbcoreError::NodeNotFound(_)) if descriptor.vivify != Vivify::Never => {
                self.vivify(descriptor, index)?
            }
            Err(e) => return Err(e),
        };

        let element = self.element_mut(&address)?;
        match &descriptor.target {
            Target::Text => element.set_text(value),
            Target::Attribute(name) => element.set_attribute(name.as_str(), value),
        }
        tracing::debug!(field, index, "updated field");
        Ok(())
    }

    /// Set a singleton field
    pub fn set_value(&mut self, field: &str, value: &str) -> PbcoreResult<()> {
        self.update_value(field, 0, value)
    }

    /// Apply a batch of updates
    ///
    /// Entries are applied in order and independently: a failing entry is
    /// recorded and the rest still run. Entries applied before a failure
    /// are kept.
    pub fn update_values(&mut self, updates: &FieldUpdates) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (field, values) in updates.iter() {
            for (&index, value) in values {
                match self.update_value(field, index, value) {
                    Ok(()) => outcome.applied += 1,
                    Err(error) => {
                        tracing::debug!(field, index, %error, "batch entry failed");
                        outcome.failures.push(BatchFailure {
                            field: field.to_string(),
                            index,
                            error,
                        });
                    }
                }
            }
        }
        outcome
    }

    // ======================================================================
    // Inserting
    // ======================================================================

    /// Insert a group built from a template; returns its index
    ///
    /// Instantiation relations go into the last instantiation, which is
    /// created bare when the document has none.
    pub fn insert(&mut self, template: &Template) -> PbcoreResult<usize> {
        self.insert_into(template, None)
    }

    /// Insert a group from positional template arguments
    pub fn insert_group(&mut self, kind: GroupKind, args: &[&str]) -> PbcoreResult<usize> {
        let template = Template::from_args(kind, args)?;
        self.insert(&template)
    }

    /// Insert a contributor
    pub fn insert_contributor(&mut self, name: &str, role: &str) -> PbcoreResult<usize> {
        self.insert(&Template::contributor().name(name).role(role))
    }

    /// Insert a publisher
    pub fn insert_publisher(&mut self, name: &str, role: &str) -> PbcoreResult<usize> {
        self.insert(&Template::publisher().name(name).role(role))
    }

    /// Insert a creator
    pub fn insert_creator(&mut self, name: &str, role: &str) -> PbcoreResult<usize> {
        self.insert(&Template::creator().name(name).role(role))
    }

    /// Insert an event place
    pub fn insert_place(&mut self, place: &str) -> PbcoreResult<usize> {
        self.insert(&Template::event_place(place))
    }

    /// Insert an event date
    pub fn insert_date(&mut self, date: &str) -> PbcoreResult<usize> {
        self.insert(&Template::event_date(date))
    }

    /// Insert a relation of the default type
    pub fn insert_relation(&mut self, value: &str, annotation: &str) -> PbcoreResult<usize> {
        self.insert(&Template::relation(value, annotation))
    }

    /// Insert a digital instantiation
    pub fn insert_digital_instantiation(&mut self) -> PbcoreResult<usize> {
        self.insert(&Template::DigitalInstantiation)
    }

    /// Insert a physical instantiation
    pub fn insert_physical_instantiation(&mut self) -> PbcoreResult<usize> {
        self.insert(&Template::PhysicalInstantiation)
    }

    /// Insert a sequencing relation into a given instantiation
    ///
    /// The returned index counts relations across all instantiations. Index
    /// 0 on a document without instantiations creates the first one.
    pub fn insert_instantiation_relation(
        &mut self,
        instantiation: usize,
        direction: SequenceDirection,
        identifier: &str,
    ) -> PbcoreResult<usize> {
        let template = Template::instantiation_relation(direction).identifier(identifier);
        self.insert_into(&template, Some(instantiation))
    }

    // ======================================================================
    // Removing
    // ======================================================================

    /// Remove a group instance
    pub fn remove_node(&mut self, kind: GroupKind, index: usize) -> PbcoreResult<()> {
        let groups = self.group_addresses(kind);
        let address = groups
            .get(index)
            .ok_or_else(|| out_of_range(kind.name(), index, groups.len()))?;
        locate::detach(&mut self.root, address).ok_or_else(|| {
            PbcoreError::InternalError(format!("{} {} vanished before removal", kind, index))
        })?;
        tracing::debug!(group = %kind, index, "removed group");
        Ok(())
    }

    // ======================================================================
    // Projection
    // ======================================================================

    /// Project onto the built-in index terms
    ///
    /// Rules for fields the document's table does not map are skipped, so
    /// custom tables project only what they define.
    pub fn to_index(&self) -> PbcoreResult<IndexDocument> {
        let rules = ProjectionRule::builtin()
            .iter()
            .filter(|rule| self.table.contains(&rule.field));
        crate::index::project_rules(self, rules)
    }

    /// Project onto custom index terms
    pub fn to_index_with(&self, rules: &[ProjectionRule]) -> PbcoreResult<IndexDocument> {
        crate::index::project_rules(self, rules.iter())
    }

    // ======================================================================
    // Internals
    // ======================================================================

    fn element(&self, address: &[usize]) -> PbcoreResult<&ElementNode> {
        locate::element_at(&self.root, address)
            .ok_or_else(|| PbcoreError::InternalError(format!("Stale address {:?}", address)))
    }

    fn element_mut(&mut self, address: &[usize]) -> PbcoreResult<&mut ElementNode> {
        locate::element_at_mut(&mut self.root, address)
            .ok_or_else(|| PbcoreError::InternalError(format!("Stale address {:?}", address)))
    }

    /// Every instance of a group, in document order
    fn group_addresses(&self, kind: GroupKind) -> Vec<Address> {
        locate::find_all(&self.root, &kind.root_path())
    }

    /// Every located node of a field, in document order
    ///
    /// Group fields contribute the first match inside each instance; an
    /// instance missing the node contributes nothing.
    fn field_addresses(&self, descriptor: &FieldDescriptor) -> Vec<Address> {
        match descriptor.scope {
            FieldScope::Document => locate::find_all(&self.root, &descriptor.path),
            FieldScope::Group(kind) => self
                .group_addresses(kind)
                .into_iter()
                .filter_map(|group| {
                    let base = locate::element_at(&self.root, &group)?;
                    let inner = locate::find_first(base, &descriptor.path)?;
                    Some(join(&group, &inner))
                })
                .collect(),
        }
    }

    /// Address of a field's node at a position
    fn locate_address(&self, descriptor: &FieldDescriptor, index: usize) -> PbcoreResult<Address> {
        match descriptor.scope {
            FieldScope::Document => {
                let mut matches = locate::find_all(&self.root, &descriptor.path);
                if matches.is_empty() && index == 0 {
                    return Err(PbcoreError::NodeNotFound(descriptor.name.clone()));
                }
                if index >= matches.len() {
                    return Err(out_of_range(&descriptor.name, index, matches.len()));
                }
                Ok(matches.swap_remove(index))
            }
            FieldScope::Group(kind) => {
                let groups = self.group_addresses(kind);
                let group = groups
                    .get(index)
                    .ok_or_else(|| out_of_range(&descriptor.name, index, groups.len()))?;
                let base = self.element(group)?;
                let inner = locate::find_first(base, &descriptor.path).ok_or_else(|| {
                    PbcoreError::NodeNotFound(format!("{} {}", descriptor.name, index))
                })?;
                Ok(join(group, &inner))
            }
        }
    }

    /// Create the missing node of a field; returns its address
    fn vivify(&mut self, descriptor: &FieldDescriptor, index: usize) -> PbcoreResult<Address> {
        match (descriptor.scope, &descriptor.vivify) {
            (_, Vivify::Never) => Err(PbcoreError::NodeNotFound(descriptor.name.clone())),
            (FieldScope::Document, Vivify::Template(template)) => {
                let group = self.place_group(template, None)?;
                match self.locate_address(descriptor, index) {
                    Ok(address) => Ok(address),
                    Err(e) => {
                        // The template does not produce the field's path; undo
                        locate::detach(&mut self.root, &group);
                        Err(e)
                    }
                }
            }
            (FieldScope::Document, Vivify::Path) => {
                tracing::trace!(field = %descriptor.name, "creating singleton path");
                Ok(locate::vivify(&mut self.root, &descriptor.path.steps))
            }
            (FieldScope::Group(kind), _) => {
                let groups = self.group_addresses(kind);
                let group = groups
                    .get(index)
                    .ok_or_else(|| out_of_range(&descriptor.name, index, groups.len()))?;
                tracing::trace!(field = %descriptor.name, index, "creating node inside group");
                let base = self.element_mut(group)?;
                let inner = locate::vivify(base, &descriptor.path.steps);
                Ok(join(group, &inner))
            }
        }
    }

    fn insert_into(&mut self, template: &Template, container: Option<usize>) -> PbcoreResult<usize> {
        let kind = template.kind();
        let address = self.place_group(template, container)?;
        let index = self
            .group_addresses(kind)
            .iter()
            .position(|group| *group == address)
            .ok_or_else(|| {
                PbcoreError::InternalError(format!("Inserted {} is not addressable", kind))
            })?;
        tracing::debug!(group = %kind, index, "inserted group");
        Ok(index)
    }

    /// Build a template and place it at its schema position
    fn place_group(&mut self, template: &Template, container: Option<usize>) -> PbcoreResult<Address> {
        let element = template.build(&self.settings)?;
        let kind = template.kind();

        let Some(parent_kind) = kind.container() else {
            let position = schema::insert_ordered(&mut self.root, element);
            return Ok(vec![position]);
        };

        let mut parents = self.group_addresses(parent_kind);
        if parents.is_empty() && container.unwrap_or(0) == 0 && parent_kind.container().is_none() {
            tracing::trace!(group = %parent_kind, "creating container");
            let bare = ElementNode::new(parent_kind.element_name());
            parents.push(vec![schema::insert_ordered(&mut self.root, bare)]);
        }
        let parent = match container {
            Some(index) => parents
                .get(index)
                .ok_or_else(|| out_of_range(parent_kind.name(), index, parents.len()))?,
            None => parents.last().ok_or_else(|| {
                PbcoreError::NodeNotFound(format!("{} needs an existing {}", kind, parent_kind))
            })?,
        };
        let position = schema::insert_ordered(self.element_mut(parent)?, element);
        Ok(join(parent, &[position]))
    }
}

impl Default for PbcoreDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Value held by a located node; `None` when the attribute is absent
fn read_target(element: &ElementNode, target: &Target) -> Option<String> {
    match target {
        Target::Text => Some(element.text()),
        Target::Attribute(name) => element.attribute(name).map(str::to_string),
    }
}

fn join(base: &[usize], rest: &[usize]) -> Address {
    base.iter().chain(rest).copied().collect()
}

fn out_of_range(field: &str, index: usize, count: usize) -> PbcoreError {
    PbcoreError::IndexOutOfRange {
        field: field.to_string(),
        index,
        count,
    }
}

//! XML node types
//!
//! This module defines the in-memory tree the document is stored as:
//! - ElementNode: a named element with attributes and ordered children
//! - Node: either an element or a run of character data
//!
//! Children are kept in document order. Nothing is cached on the nodes, so
//! any position computed from the tree reflects its current shape.

use std::fmt;

/// An attribute on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name as written (e.g. `source`, `xsi:schemaLocation`)
    pub name: String,
    /// Unescaped attribute value
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element node
    Element(ElementNode),
    /// Character data
    Text(String),
}

impl Node {
    /// Get the element, if this is an element node
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Get a mutable reference to the element, if this is an element node
    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Get the text, if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }
}

/// An element with attributes and ordered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Qualified element name as written
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
    /// Children in document order
    pub children: Vec<Node>,
}

impl ElementNode {
    /// Create a new empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add or replace an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: replace the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Element name without its namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Get an attribute value by name
    ///
    /// Unprefixed lookups also match prefixed attributes with the same local
    /// name, so `annotation` finds `pbcore:annotation`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|a| !name.contains(':') && local_name(&a.name) == name)
            })
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Remove an attribute; returns true if it was present
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let initial_len = self.attributes.len();
        self.attributes.retain(|a| a.name != name);
        self.attributes.len() < initial_len
    }

    /// Concatenated character data of this element and all descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Replace the direct text content, keeping child elements
    ///
    /// An empty value leaves the element without text, which serializes as
    /// an empty element rather than a missing one.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.retain(|c| !matches!(c, Node::Text(_)));
        if !text.is_empty() {
            self.children.insert(0, Node::Text(text));
        }
    }

    /// Iterate over child elements
    pub fn elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Check whether this element has any child elements
    pub fn has_elements(&self) -> bool {
        self.children.iter().any(|c| matches!(c, Node::Element(_)))
    }

    /// Find the first child element with the given local name
    pub fn child(&self, name: &str) -> Option<&ElementNode> {
        self.elements().find(|e| e.local_name() == name)
    }

    /// Get the element at a raw child position
    pub fn element_at(&self, position: usize) -> Option<&ElementNode> {
        self.children.get(position).and_then(Node::as_element)
    }

    /// Get a mutable element at a raw child position
    pub fn element_at_mut(&mut self, position: usize) -> Option<&mut ElementNode> {
        self.children.get_mut(position).and_then(Node::as_element_mut)
    }

    /// Append a child element; returns its raw child position
    pub fn append_child(&mut self, child: ElementNode) -> usize {
        self.children.push(Node::Element(child));
        self.children.len() - 1
    }

    /// Insert a child element at a raw child position
    pub fn insert_child(&mut self, position: usize, child: ElementNode) -> usize {
        let position = position.min(self.children.len());
        self.children.insert(position, Node::Element(child));
        position
    }

    /// Detach the child at a raw child position
    pub fn remove_child(&mut self, position: usize) -> Option<Node> {
        if position < self.children.len() {
            Some(self.children.remove(position))
        } else {
            None
        }
    }
}

/// Strip a namespace prefix from a qualified name
pub fn local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_accessors() {
        let element = ElementNode::new("pbcoreContributor")
            .with_child(ElementNode::new("contributor").with_text("Jane"))
            .with_child(
                ElementNode::new("contributorRole").with_attribute("source", "MARC relator terms"),
            );

        assert_eq!(element.elements().count(), 2);
        assert_eq!(element.child("contributor").map(|e| e.text()), Some("Jane".to_string()));
        assert_eq!(
            element.child("contributorRole").and_then(|e| e.attribute("source")),
            Some("MARC relator terms")
        );
        assert_eq!(element.text(), "Jane");
    }

    #[test]
    fn test_set_text_replaces_content() {
        let mut element = ElementNode::new("pbcoreTitle").with_text("first");
        element.set_text("second");
        assert_eq!(element.text(), "second");
        assert_eq!(element.children.len(), 1);

        element.set_text("");
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_attributes() {
        let mut element = ElementNode::new("coverage");
        element.set_attribute("annotation", "Event Date");
        element.set_attribute("annotation", "Event Place");
        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attribute("annotation"), Some("Event Place"));

        assert!(element.remove_attribute("annotation"));
        assert!(!element.remove_attribute("annotation"));
    }

    #[test]
    fn test_prefixed_names() {
        let element = ElementNode::new("pb:pbcoreTitle").with_attribute("pb:titleType", "Main");
        assert_eq!(element.local_name(), "pbcoreTitle");
        assert_eq!(element.attribute("titleType"), Some("Main"));
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn test_insert_and_remove_children() {
        let mut parent = ElementNode::new("root");
        parent.append_child(ElementNode::new("b"));
        parent.insert_child(0, ElementNode::new("a"));
        assert_eq!(parent.element_at(0).map(|e| e.name.as_str()), Some("a"));

        let removed = parent.remove_child(0);
        assert!(matches!(removed, Some(Node::Element(ref e)) if e.name == "a"));
        assert!(parent.remove_child(5).is_none());
        assert_eq!(parent.children.len(), 1);
    }
}

//! PBCore XML parser
//!
//! This module turns XML text into an [`ElementNode`] tree using quick-xml's
//! pull reader. Whitespace-only text is dropped from elements that have child
//! elements, where it is only layout. Leaf values and all other character data
//! are kept verbatim, with entity references resolved.

use crate::core::error::{PbcoreError, PbcoreResult};
use crate::core::namespace::ROOT_ELEMENT;
use crate::core::node::{ElementNode, Node};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parser for PBCore documents and fragments
pub struct PbcoreParser {
    /// Required local name of the root element, if any
    expected_root: Option<String>,
}

impl PbcoreParser {
    /// Create a parser that requires a `pbcoreDescriptionDocument` root
    pub fn new() -> Self {
        Self {
            expected_root: Some(ROOT_ELEMENT.to_string()),
        }
    }

    /// Create a parser that accepts any root element
    pub fn fragment() -> Self {
        Self {
            expected_root: None,
        }
    }

    /// Parse XML text into its root element
    pub fn parse(&self, xml: &str) -> PbcoreResult<ElementNode> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<ElementNode> = Vec::new();
        let mut pending_text = String::new();
        let mut root: Option<ElementNode> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    Self::flush_text(&mut stack, &mut pending_text);
                    Self::ensure_single_root(&root)?;
                    stack.push(Self::start_element(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    Self::flush_text(&mut stack, &mut pending_text);
                    Self::ensure_single_root(&root)?;
                    let element = Self::start_element(&e)?;
                    Self::close_element(&mut stack, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    Self::flush_text(&mut stack, &mut pending_text);
                    let mut element = stack.pop().ok_or_else(|| {
                        PbcoreError::ParseError("Unexpected closing tag".to_string())
                    })?;
                    Self::drop_layout_text(&mut element);
                    Self::close_element(&mut stack, &mut root, element);
                }
                Ok(Event::Text(e)) => {
                    if stack.is_empty() {
                        continue;
                    }
                    let raw_text = String::from_utf8_lossy(e.as_ref());
                    let text = unescape(&raw_text)
                        .map_err(|e| PbcoreError::ParseError(format!("Bad text content: {}", e)))?;
                    pending_text.push_str(&text);
                }
                Ok(Event::GeneralRef(e)) => {
                    if stack.is_empty() {
                        continue;
                    }
                    let name = String::from_utf8_lossy(e.as_ref());
                    let reference = format!("&{};", name);
                    let text = unescape(&reference).map_err(|_| {
                        PbcoreError::ParseError(format!("Unknown entity reference: {}", reference))
                    })?;
                    pending_text.push_str(&text);
                }
                Ok(Event::CData(e)) => {
                    if !stack.is_empty() {
                        pending_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(PbcoreError::ParseError(format!(
                        "XML parsing error at position {}: {}",
                        reader.error_position(),
                        e
                    )));
                }
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(PbcoreError::ParseError(format!(
                "Unclosed element <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }

        let root =
            root.ok_or_else(|| PbcoreError::ParseError("Document has no root element".to_string()))?;

        if let Some(expected) = &self.expected_root {
            if root.local_name() != expected.as_str() {
                return Err(PbcoreError::ParseError(format!(
                    "Expected root element <{}>, found <{}>",
                    expected, root.name
                )));
            }
        }

        Ok(root)
    }

    /// Build an element from a start tag, collecting its attributes
    fn start_element(e: &BytesStart<'_>) -> PbcoreResult<ElementNode> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let mut element = ElementNode::new(name);
        for attr in e.attributes() {
            let attr =
                attr.map_err(|e| PbcoreError::ParseError(format!("Bad attribute: {}", e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            // Decode XML entities in attribute values (e.g., &quot; -> ")
            let raw_value = String::from_utf8_lossy(attr.value.as_ref());
            let value = unescape(&raw_value)
                .map_err(|e| PbcoreError::ParseError(format!("Bad attribute value: {}", e)))?;
            element.set_attribute(key, value.into_owned());
        }
        Ok(element)
    }

    /// Attach a finished element to its parent, or make it the root
    fn close_element(
        stack: &mut [ElementNode],
        root: &mut Option<ElementNode>,
        element: ElementNode,
    ) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => *root = Some(element),
        }
    }

    /// Move accumulated character data into the open element
    fn flush_text(stack: &mut [ElementNode], pending_text: &mut String) {
        if pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(pending_text);
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Node::Text(text));
        }
    }

    /// Remove indentation between child elements
    fn drop_layout_text(element: &mut ElementNode) {
        if element.has_elements() {
            element
                .children
                .retain(|child| child.as_text().map_or(true, |text| !text.trim().is_empty()));
        }
    }

    fn ensure_single_root(root: &Option<ElementNode>) -> PbcoreResult<()> {
        if root.is_some() {
            return Err(PbcoreError::ParseError(
                "Multiple root elements".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PbcoreParser {
    fn default() -> Self {
        Self::new()
    }
}

//! PBCore XML serializer
//!
//! This module writes an [`ElementNode`] tree back to XML text with quick-xml.
//! Elements without children are written self-closing; element-only content
//! is indented, text content stays inline.

use crate::core::error::{PbcoreError, PbcoreResult};
use crate::core::node::{ElementNode, Node};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Serializer for PBCore documents and fragments
pub struct PbcoreSerializer {
    /// Emit an `<?xml ...?>` declaration before the root
    declaration: bool,
    /// Indentation width; zero disables pretty-printing
    indent: usize,
}

impl PbcoreSerializer {
    /// Create a serializer for whole documents
    pub fn new() -> Self {
        Self {
            declaration: true,
            indent: 2,
        }
    }

    /// Create a serializer for standalone fragments (no declaration)
    pub fn fragment() -> Self {
        Self {
            declaration: false,
            indent: 2,
        }
    }

    /// Serialize an element tree to a string
    pub fn serialize(&self, root: &ElementNode) -> PbcoreResult<String> {
        let mut writer = if self.indent > 0 {
            Writer::new_with_indent(Cursor::new(Vec::new()), b' ', self.indent)
        } else {
            Writer::new(Cursor::new(Vec::new()))
        };

        if self.declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        self.write_element(&mut writer, root)?;

        let result = writer.into_inner().into_inner();
        String::from_utf8(result)
            .map_err(|e| PbcoreError::SerializationError(format!("UTF-8 encoding error: {}", e)))
    }

    /// Write one element and its subtree
    fn write_element(
        &self,
        writer: &mut Writer<Cursor<Vec<u8>>>,
        element: &ElementNode,
    ) -> PbcoreResult<()> {
        let mut start = BytesStart::new(element.name.as_str());
        for attribute in &element.attributes {
            start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
        }

        if element.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &element.children {
            match child {
                Node::Element(child) => self.write_element(writer, child)?,
                Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
        Ok(())
    }
}

impl Default for PbcoreSerializer {
    fn default() -> Self {
        Self::new()
    }
}

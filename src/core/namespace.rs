//! PBCore namespace constants
//!
//! Every document is rooted at `pbcoreDescriptionDocument` carrying the
//! PBCore default namespace and the XML Schema instance namespace.

use crate::core::node::ElementNode;

/// Built-in namespaces
pub mod ns {
    /// PBCore 2.0 namespace
    pub const PBCORE: &str = "http://www.pbcore.org/PBCore/PBCoreNamespace.html";
    /// XML Schema instance namespace
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    /// XSI prefix
    pub const XSI_PREFIX: &str = "xsi";
}

/// Name of the document root element
pub const ROOT_ELEMENT: &str = "pbcoreDescriptionDocument";

/// The canonical blank document
pub const BLANK_DOCUMENT: &str = r#"<?xml version="1.0"?><pbcoreDescriptionDocument xmlns="http://www.pbcore.org/PBCore/PBCoreNamespace.html" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.pbcore.org/PBCore/PBCoreNamespace.html"></pbcoreDescriptionDocument>"#;

/// Build the root element of a blank document
pub fn blank_root() -> ElementNode {
    ElementNode::new(ROOT_ELEMENT)
        .with_attribute("xmlns", ns::PBCORE)
        .with_attribute(format!("xmlns:{}", ns::XSI_PREFIX), ns::XSI)
        .with_attribute(format!("{}:schemaLocation", ns::XSI_PREFIX), ns::PBCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_root() {
        let root = blank_root();
        assert_eq!(root.name, ROOT_ELEMENT);
        assert_eq!(root.attribute("xmlns"), Some(ns::PBCORE));
        assert_eq!(root.attribute("xsi:schemaLocation"), Some(ns::PBCORE));
        assert!(root.children.is_empty());
    }
}

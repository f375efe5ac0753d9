//! Declarative node paths
//!
//! A node path is an ordered list of element steps, each optionally narrowed
//! by equality predicates. The textual form is used by custom mapping tables:
//!
//! - `pbcoreTitle[@titleType='Main']` - element with an attribute value
//! - `pbcoreCoverage[coverageType='Temporal']` - element with a child's text
//! - `pbcoreRightsSummary/rightsSummary` - nested elements
//!
//! Paths are data, not queries: there are no axes, wildcards or positions.

use crate::core::error::{PbcoreError, PbcoreResult};
use crate::core::node::ElementNode;
use std::fmt;

/// An equality test on a candidate element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[@name='value']`
    Attribute { name: String, value: String },
    /// `[name='value']`, matched against the first child with that local name
    ChildText { name: String, value: String },
}

impl Predicate {
    /// Check whether an element satisfies this predicate
    pub fn matches(&self, element: &ElementNode) -> bool {
        match self {
            Predicate::Attribute { name, value } => element.attribute(name) == Some(value.as_str()),
            Predicate::ChildText { name, value } => element
                .child(name)
                .map(|child| child.text() == *value)
                .unwrap_or(false),
        }
    }
}

/// One element step of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Local element name
    pub name: String,
    /// Predicates that must all hold
    pub predicates: Vec<Predicate>,
}

impl Step {
    /// Create a step without predicates
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            predicates: Vec::new(),
        }
    }

    /// Builder: require an attribute value
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Builder: require a child element's text
    pub fn with_child_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::ChildText {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Check whether an element matches this step
    pub fn matches(&self, element: &ElementNode) -> bool {
        element.local_name() == self.name && self.predicates.iter().all(|p| p.matches(element))
    }

    /// Create a fresh element satisfying every predicate of this step
    ///
    /// Child-text predicates are met by appending a child carrying the text.
    pub fn instantiate(&self) -> ElementNode {
        let mut element = ElementNode::new(self.name.clone());
        for predicate in &self.predicates {
            match predicate {
                Predicate::Attribute { name, value } => {
                    element.set_attribute(name.clone(), value.clone())
                }
                Predicate::ChildText { name, value } => {
                    element.append_child(ElementNode::new(name.clone()).with_text(value.clone()));
                }
            }
        }
        element
    }
}

/// An ordered sequence of steps
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath {
    pub steps: Vec<Step>,
}

impl NodePath {
    /// Create an empty path (addresses the context node itself)
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Builder: append a step
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Check if the path has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_path(self))
    }
}

/// Parse the textual form of a node path
pub fn parse_path(path: &str) -> PbcoreResult<NodePath> {
    let mut steps = Vec::new();
    let mut chars = path.chars().peekable();
    let mut name = String::new();
    let mut predicates = Vec::new();

    while let Some(ch) = chars.next() {
        match ch {
            '/' => {
                if name.is_empty() {
                    return Err(PbcoreError::BadPath(format!("Empty step in '{}'", path)));
                }
                steps.push(Step {
                    name: std::mem::take(&mut name),
                    predicates: std::mem::take(&mut predicates),
                });
            }
            '[' => {
                if name.is_empty() {
                    return Err(PbcoreError::BadPath(format!(
                        "Predicate without element name in '{}'",
                        path
                    )));
                }
                predicates.push(parse_predicate(&mut chars, path)?);
            }
            ']' => return Err(PbcoreError::BadPath(format!("Unexpected ']' in '{}'", path))),
            c if c.is_whitespace() => {
                return Err(PbcoreError::BadPath(format!(
                    "Whitespace in element name in '{}'",
                    path
                )))
            }
            c => {
                if !predicates.is_empty() {
                    return Err(PbcoreError::BadPath(format!(
                        "Unexpected '{}' after predicate in '{}'",
                        c, path
                    )));
                }
                name.push(c);
            }
        }
    }

    if name.is_empty() {
        if steps.is_empty() {
            return Err(PbcoreError::BadPath("Empty path".to_string()));
        }
        return Err(PbcoreError::BadPath(format!("Trailing '/' in '{}'", path)));
    }
    steps.push(Step { name, predicates });

    Ok(NodePath { steps })
}

/// Parse the inside of `[...]`; the opening bracket is already consumed
fn parse_predicate(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    path: &str,
) -> PbcoreResult<Predicate> {
    let is_attribute = chars.peek() == Some(&'@');
    if is_attribute {
        chars.next();
    }

    let mut name = String::new();
    loop {
        match chars.next() {
            Some('=') => break,
            Some(c) if c == ']' || c == '[' || c == '/' => {
                return Err(PbcoreError::BadPath(format!(
                    "Predicate without value in '{}'",
                    path
                )))
            }
            Some(c) => name.push(c),
            None => return Err(PbcoreError::BadPath(format!("Unclosed bracket in '{}'", path))),
        }
    }
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(PbcoreError::BadPath(format!("Predicate without name in '{}'", path)));
    }

    let quote = match chars.next() {
        Some(q @ ('\'' | '"')) => q,
        _ => {
            return Err(PbcoreError::BadPath(format!(
                "Predicate value must be quoted in '{}'",
                path
            )))
        }
    };

    let mut value = String::new();
    loop {
        match chars.next() {
            Some(c) if c == quote => break,
            Some(c) => value.push(c),
            None => return Err(PbcoreError::BadPath(format!("Unterminated quote in '{}'", path))),
        }
    }

    if chars.next() != Some(']') {
        return Err(PbcoreError::BadPath(format!("Expected ']' in '{}'", path)));
    }

    Ok(if is_attribute {
        Predicate::Attribute { name, value }
    } else {
        Predicate::ChildText { name, value }
    })
}

/// Build the textual form of a node path
pub fn build_path(path: &NodePath) -> String {
    let mut result = String::new();
    for (i, step) in path.steps.iter().enumerate() {
        if i > 0 {
            result.push('/');
        }
        result.push_str(&step.name);
        for predicate in &step.predicates {
            let (prefix, name, value) = match predicate {
                Predicate::Attribute { name, value } => ("@", name, value),
                Predicate::ChildText { name, value } => ("", name, value),
            };
            let quote = if value.contains('\'') { '"' } else { '\'' };
            result.push('[');
            result.push_str(prefix);
            result.push_str(name);
            result.push('=');
            result.push(quote);
            result.push_str(value);
            result.push(quote);
            result.push(']');
        }
    }
    result
}

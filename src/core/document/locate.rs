//! Path resolution over the element tree
//!
//! Nodes are addressed by the raw child positions leading to them from a
//! base element. Addresses are computed fresh from the current tree on every
//! lookup and are only valid until the next mutation.

use crate::core::node::{ElementNode, Node};
use crate::core::path::{NodePath, Step};
use crate::core::schema;

/// Raw child positions from a base element to a node
pub(crate) type Address = Vec<usize>;

/// Every element reached by `path` from `base`, in document order
///
/// An empty path yields the base itself.
pub(crate) fn find_all(base: &ElementNode, path: &NodePath) -> Vec<Address> {
    let mut found = Vec::new();
    let mut prefix = Vec::new();
    walk(base, &path.steps, &mut prefix, &mut found);
    found
}

/// First element reached by `path` from `base`
pub(crate) fn find_first(base: &ElementNode, path: &NodePath) -> Option<Address> {
    find_all(base, path).into_iter().next()
}

fn walk(element: &ElementNode, steps: &[Step], prefix: &mut Address, found: &mut Vec<Address>) {
    let Some((step, rest)) = steps.split_first() else {
        found.push(prefix.clone());
        return;
    };
    for (position, child) in element.children.iter().enumerate() {
        if let Node::Element(child) = child {
            if step.matches(child) {
                prefix.push(position);
                walk(child, rest, prefix, found);
                prefix.pop();
            }
        }
    }
}

/// Element at an address
pub(crate) fn element_at<'a>(base: &'a ElementNode, address: &[usize]) -> Option<&'a ElementNode> {
    address
        .iter()
        .try_fold(base, |element, &position| element.element_at(position))
}

/// Mutable element at an address
pub(crate) fn element_at_mut<'a>(
    base: &'a mut ElementNode,
    address: &[usize],
) -> Option<&'a mut ElementNode> {
    let mut current = base;
    for &position in address {
        current = current.element_at_mut(position)?;
    }
    Some(current)
}

/// Follow `steps` from `base`, creating every missing step
///
/// Existing elements are reused (first match wins); created ones are placed
/// at their schema position under sequenced parents and appended elsewhere.
pub(crate) fn vivify(base: &mut ElementNode, steps: &[Step]) -> Address {
    let mut address = Address::new();
    let mut current = base;
    for step in steps {
        let existing = current
            .children
            .iter()
            .position(|child| child.as_element().is_some_and(|e| step.matches(e)));
        let position = match existing {
            Some(position) => position,
            None => {
                tracing::trace!(step = %step.name, parent = %current.name, "creating missing element");
                schema::insert_ordered(current, step.instantiate())
            }
        };
        address.push(position);
        match current.element_at_mut(position) {
            Some(next) => current = next,
            None => break,
        }
    }
    address
}

/// Detach the element at an address
pub(crate) fn detach(base: &mut ElementNode, address: &[usize]) -> Option<ElementNode> {
    let (&position, parent) = address.split_last()?;
    match element_at_mut(base, parent)?.remove_child(position)? {
        Node::Element(element) => Some(element),
        Node::Text(_) => None,
    }
}

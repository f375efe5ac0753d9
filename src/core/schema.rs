//! Schema-ordered placement of child elements
//!
//! PBCore is an `xs:sequence` schema: top-level elements and instantiation
//! children must appear in a fixed order. New elements are placed by rank so
//! the tree stays schema-shaped after every insert.

use crate::core::namespace::ROOT_ELEMENT;
use crate::core::node::{ElementNode, Node};

/// Children of `pbcoreDescriptionDocument` in schema order
pub const DOCUMENT_NODES: [&str; 19] = [
    "pbcoreAssetType",
    "pbcoreAssetDate",
    "pbcoreIdentifier",
    "pbcoreTitle",
    "pbcoreSubject",
    "pbcoreDescription",
    "pbcoreGenre",
    "pbcoreRelation",
    "pbcoreCoverage",
    "pbcoreAudienceLevel",
    "pbcoreAudienceRating",
    "pbcoreCreator",
    "pbcoreContributor",
    "pbcorePublisher",
    "pbcoreRightsSummary",
    "pbcoreInstantiation",
    "pbcoreAnnotation",
    "pbcorePart",
    "pbcoreExtension",
];

/// Children of `pbcoreInstantiation` in schema order
pub const INSTANTIATION_NODES: [&str; 24] = [
    "instantiationIdentifier",
    "instantiationDate",
    "instantiationDimensions",
    "instantiationPhysical",
    "instantiationDigital",
    "instantiationStandard",
    "instantiationLocation",
    "instantiationMediaType",
    "instantiationGenerations",
    "instantiationFileSize",
    "instantiationTimeStart",
    "instantiationDuration",
    "instantiationDataRate",
    "instantiationColors",
    "instantiationTracks",
    "instantiationChannelConfiguration",
    "instantiationLanguage",
    "instantiationAlternativeModes",
    "instantiationEssenceTrack",
    "instantiationRelation",
    "instantiationRights",
    "instantiationAnnotation",
    "instantiationPart",
    "instantiationExtension",
];

/// The child order for a parent element, if it is a sequenced PBCore element
fn ordering_for(parent: &str) -> Option<&'static [&'static str]> {
    match parent {
        ROOT_ELEMENT => Some(&DOCUMENT_NODES[..]),
        "pbcoreInstantiation" => Some(&INSTANTIATION_NODES[..]),
        _ => None,
    }
}

/// Rank of a child name under a parent, if known
pub fn rank(parent: &str, child: &str) -> Option<usize> {
    ordering_for(parent)?.iter().position(|name| *name == child)
}

/// Raw child position at which an element named `child` should be inserted
///
/// The element goes after the last sibling ranked at or before it, so
/// same-named siblings form a queue. Unordered parents and unknown names
/// append at the end.
pub fn insertion_position(parent: &ElementNode, child: &str) -> usize {
    let parent_name = parent.local_name();
    let Some(own_rank) = rank(parent_name, child) else {
        return parent.children.len();
    };

    let mut after_last_lower = None;
    let mut first_higher = None;
    for (position, node) in parent.children.iter().enumerate() {
        let Node::Element(element) = node else {
            continue;
        };
        match rank(parent_name, element.local_name()) {
            Some(r) if r <= own_rank => after_last_lower = Some(position + 1),
            Some(_) if first_higher.is_none() => first_higher = Some(position),
            _ => {}
        }
    }

    after_last_lower
        .or(first_higher)
        .unwrap_or(parent.children.len())
}

/// Insert a child at its schema position; returns the raw child position
pub fn insert_ordered(parent: &mut ElementNode, child: ElementNode) -> usize {
    let position = insertion_position(parent, child.local_name());
    parent.insert_child(position, child)
}

/// Stably sort children by schema rank, recursing into instantiations
///
/// Unknown elements keep their relative order after all ranked ones; text
/// nodes between elements are dropped.
pub fn reorder(element: &mut ElementNode) {
    let parent_name = element.local_name().to_string();
    if ordering_for(&parent_name).is_some() {
        let mut children: Vec<Node> = std::mem::take(&mut element.children)
            .into_iter()
            .filter(|c| matches!(c, Node::Element(_)))
            .collect();
        children.sort_by_key(|c| {
            c.as_element()
                .and_then(|e| rank(&parent_name, e.local_name()))
                .unwrap_or(usize::MAX)
        });
        element.children = children;
    }

    for child in element.children.iter_mut() {
        if let Node::Element(child) = child {
            if child.local_name() == "pbcoreInstantiation" {
                reorder(child);
            }
        }
    }
}

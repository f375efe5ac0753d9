//! Built-in PBCore field vocabulary

use crate::core::path::{NodePath, Step};
use crate::mapping::{FieldDescriptor, MappingTable, Vivify};
use crate::templates::settings::DEFAULT_INSTITUTION;
use crate::templates::{GroupKind, Template};

const LCSH: &str = "Library of Congress Subject Headings";
const LCSH_REF: &str = "http://id.loc.gov/authorities/subjects.html";

fn path(step: Step) -> NodePath {
    NodePath::new().step(step)
}

fn child(name: &str) -> NodePath {
    path(Step::new(name))
}

fn title(field: &str, title_type: &str) -> FieldDescriptor {
    FieldDescriptor::document(
        field,
        path(Step::new("pbcoreTitle").with_attribute("titleType", title_type)),
    )
}

fn description(field: &str, description_type: &str, anchor: &str, annotation: &str) -> FieldDescriptor {
    FieldDescriptor::document(
        field,
        path(
            Step::new("pbcoreDescription")
                .with_attribute("descriptionType", description_type)
                .with_attribute("descriptionTypeSource", "pbcoreDescription/descriptionType")
                .with_attribute(
                    "descriptionTypeRef",
                    format!(
                        "http://pbcore.org/vocabularies/pbcoreDescription/descriptionType#{}",
                        anchor
                    ),
                )
                .with_attribute("annotation", annotation),
        ),
    )
}

fn sourced(field: &str, element: &str, source: &str, reference: Option<&str>) -> FieldDescriptor {
    let mut step = Step::new(element).with_attribute("source", source);
    if let Some(reference) = reference {
        step = step.with_attribute("ref", reference);
    }
    FieldDescriptor::document(field, path(step))
}

fn relation(field: &str, annotation: &str) -> FieldDescriptor {
    FieldDescriptor::document(
        field,
        NodePath::new()
            .step(Step::new("pbcoreRelation"))
            .step(Step::new("pbcoreRelationIdentifier").with_attribute("annotation", annotation)),
    )
    .with_vivify(Vivify::Template(Template::relation("", annotation)))
}

fn coverage(field: &str, kind: GroupKind) -> FieldDescriptor {
    FieldDescriptor::group(field, kind, child("coverage"))
}

pub(crate) fn builtin() -> MappingTable {
    MappingTable::new()
        .with_field(FieldDescriptor::document(
            "pbc_id",
            path(
                Step::new("pbcoreIdentifier")
                    .with_attribute("source", DEFAULT_INSTITUTION)
                    .with_attribute("annotation", "PBCore XML ID"),
            ),
        ))
        .with_field(title("main_title", "Main"))
        .with_field(title("alternative_title", "Alternative"))
        .with_field(title("chapter", "Chapter"))
        .with_field(title("episode", "Episode"))
        .with_field(title("label", "Label"))
        .with_field(title("segment", "Segment"))
        .with_field(title("subtitle", "Subtitle"))
        .with_field(title("track", "Track"))
        .with_field(title("translation", "Translation"))
        .with_field(description("summary", "Description", "description", "Summary"))
        .with_field(description(
            "parts_list",
            "Table of Contents",
            "tableOfContents",
            "Parts List",
        ))
        .with_field(sourced("lc_subject", "pbcoreSubject", LCSH, Some(LCSH_REF)))
        .with_field(sourced(
            "lc_name",
            "pbcoreSubject",
            "Library of Congress Name Authority File",
            Some("http://id.loc.gov/authorities/names"),
        ))
        .with_field(sourced("rh_subject", "pbcoreSubject", DEFAULT_INSTITUTION, None))
        .with_field(sourced(
            "getty_genre",
            "pbcoreGenre",
            "The Getty Research Institute Art and Architecture Thesaurus",
            Some("http://www.getty.edu/research/tools/vocabularies/aat/index.html"),
        ))
        .with_field(sourced(
            "lc_genre",
            "pbcoreGenre",
            "Library of Congress Genre/Form Terms",
            Some("http://id.loc.gov/authorities/genreForms.html"),
        ))
        .with_field(sourced("lc_subject_genre", "pbcoreGenre", LCSH, Some(LCSH_REF)))
        .with_field(FieldDescriptor::document(
            "note",
            path(Step::new("pbcoreAnnotation").with_attribute("annotationType", "Notes")),
        ))
        .with_field(FieldDescriptor::document("asset_type", child("pbcoreAssetType")))
        .with_field(FieldDescriptor::document(
            "rights_summary",
            child("pbcoreRightsSummary").step(Step::new("rightsSummary")),
        ))
        .with_field(relation("event_series", "Event Series"))
        .with_field(relation("archival_collection", "Archival Collection"))
        .with_field(relation("archival_series", "Archival Series"))
        .with_field(relation("collection_number", "Collection Number"))
        .with_field(relation("accession_number", "Accession Number"))
        .with_field(FieldDescriptor::group("creator_name", GroupKind::Creator, child("creator")))
        .with_field(FieldDescriptor::group(
            "creator_role",
            GroupKind::Creator,
            child("creatorRole"),
        ))
        .with_field(FieldDescriptor::group(
            "contributor_name",
            GroupKind::Contributor,
            child("contributor"),
        ))
        .with_field(FieldDescriptor::group(
            "contributor_role",
            GroupKind::Contributor,
            child("contributorRole"),
        ))
        .with_field(FieldDescriptor::group(
            "publisher_name",
            GroupKind::Publisher,
            child("publisher"),
        ))
        .with_field(FieldDescriptor::group(
            "publisher_role",
            GroupKind::Publisher,
            child("publisherRole"),
        ))
        .with_field(coverage("event_place", GroupKind::Place))
        .with_field(coverage("event_date", GroupKind::Date))
        .with_field(FieldDescriptor::group_root(GroupKind::Creator))
        .with_field(FieldDescriptor::group_root(GroupKind::Contributor))
        .with_field(FieldDescriptor::group_root(GroupKind::Publisher))
        .with_field(FieldDescriptor::group_root(GroupKind::Relation))
        .with_field(FieldDescriptor::group_root(GroupKind::Place))
        .with_field(FieldDescriptor::group_root(GroupKind::Date))
        .with_field(FieldDescriptor::group_root(GroupKind::Instantiation))
        .with_field(FieldDescriptor::group_root(GroupKind::InstantiationRelation))
}

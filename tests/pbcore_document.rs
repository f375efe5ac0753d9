//! Tests for the PbcoreDocument field API

use pbcorekit::{FieldUpdates, GroupKind, PbcoreDocument, PbcoreError, Template};

const SINGLETON_FIELDS: [&str; 26] = [
    "pbc_id",
    "main_title",
    "alternative_title",
    "chapter",
    "episode",
    "label",
    "segment",
    "subtitle",
    "track",
    "translation",
    "summary",
    "parts_list",
    "lc_subject",
    "lc_name",
    "rh_subject",
    "getty_genre",
    "lc_genre",
    "lc_subject_genre",
    "event_series",
    "note",
    "asset_type",
    "rights_summary",
    "archival_collection",
    "archival_series",
    "collection_number",
    "accession_number",
];

const GROUP_FIELDS: [&str; 6] = [
    "creator_name",
    "creator_role",
    "publisher_name",
    "publisher_role",
    "contributor_name",
    "contributor_role",
];

#[test]
fn blank_document_serializes_to_bare_root() {
    let doc = PbcoreDocument::new();
    let xml = doc.to_xml().unwrap();
    assert!(xml.contains("<pbcoreDescriptionDocument"));
    assert!(xml.contains("xmlns=\"http://www.pbcore.org/PBCore/PBCoreNamespace.html\""));
    assert!(xml.contains("xsi:schemaLocation="));
    assert_eq!(xml.matches('<').count(), 2, "declaration and root only: {}", xml);
}

mod singletons {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn update_then_read_returns_one_value() {
        let mut doc = PbcoreDocument::new();
        for field in SINGLETON_FIELDS {
            let value = format!("{} value", field);
            let outcome = doc.update_values(&FieldUpdates::new().set(field, 0, value.as_str()));
            assert!(outcome.is_success(), "{}: {:?}", field, outcome.failures);
            assert_eq!(doc.get_values(field).unwrap(), vec![value], "{}", field);
        }
    }

    #[test]
    fn fields_do_not_shadow_each_other() {
        let mut doc = PbcoreDocument::new();
        for field in SINGLETON_FIELDS {
            doc.set_value(field, field).unwrap();
        }
        for field in SINGLETON_FIELDS {
            assert_eq!(doc.get_value(field, 0).unwrap(), field);
        }
    }

    #[test]
    fn repeated_writes_replace_content() {
        let mut doc = PbcoreDocument::new();
        doc.set_value("main_title", "first").unwrap();
        doc.set_value("main_title", "second").unwrap();
        assert_eq!(doc.get_values("main_title").unwrap(), vec!["second"]);
        assert_eq!(doc.count("main_title").unwrap(), 1);
    }

    #[test]
    fn vivified_nodes_carry_their_attributes() {
        let mut doc = PbcoreDocument::new();
        doc.set_value("summary", "A concert").unwrap();
        let summary = doc.locate("summary", 0).unwrap();
        assert_eq!(summary.name, "pbcoreDescription");
        assert_eq!(summary.attribute("descriptionType"), Some("Description"));
        assert_eq!(summary.attribute("annotation"), Some("Summary"));

        doc.set_value("pbc_id", "abc123").unwrap();
        let id = doc.locate("pbc_id", 0).unwrap();
        assert_eq!(id.attribute("source"), Some("Rock and Roll Hall of Fame and Museum"));
        assert_eq!(id.attribute("annotation"), Some("PBCore XML ID"));
    }

    #[test]
    fn vivified_nodes_follow_schema_order() {
        let mut doc = PbcoreDocument::new();
        doc.set_value("note", "n").unwrap();
        doc.set_value("rights_summary", "r").unwrap();
        doc.set_value("main_title", "t").unwrap();
        doc.set_value("asset_type", "Scene").unwrap();

        let names: Vec<&str> = doc.root().elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["pbcoreAssetType", "pbcoreTitle", "pbcoreRightsSummary", "pbcoreAnnotation"]
        );
    }

    #[test]
    fn missing_singleton_read_fails() {
        let doc = PbcoreDocument::new();
        assert!(matches!(
            doc.get_value("main_title", 0),
            Err(PbcoreError::NodeNotFound(_))
        ));
        assert!(matches!(
            doc.get_value("main_title", 3),
            Err(PbcoreError::IndexOutOfRange { index: 3, count: 0, .. })
        ));
        assert_eq!(doc.get_values("main_title").unwrap(), Vec::<String>::new());
    }
}

mod groups {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn update_fields_requiring_inserted_nodes() {
        let mut doc = PbcoreDocument::new();
        doc.insert_creator("", "").unwrap();
        doc.insert_publisher("", "").unwrap();
        doc.insert_contributor("", "").unwrap();
        for field in GROUP_FIELDS {
            let value = format!("{} value", field);
            doc.update_value(field, 0, &value).unwrap();
            assert_eq!(doc.get_values(field).unwrap(), vec![value]);
        }
    }

    #[test]
    fn group_fields_need_an_instance() {
        let mut doc = PbcoreDocument::new();
        for field in GROUP_FIELDS {
            assert!(matches!(
                doc.update_value(field, 0, "x"),
                Err(PbcoreError::IndexOutOfRange { count: 0, .. })
            ));
        }
        assert!(doc.root().children.is_empty());
    }

    #[test]
    fn locate_all_skips_instances_without_the_node() {
        let mut doc = PbcoreDocument::parse(
            r#"<pbcoreDescriptionDocument>
  <pbcoreContributor><contributor>Ann</contributor></pbcoreContributor>
  <pbcoreContributor><contributorRole>host</contributorRole></pbcoreContributor>
</pbcoreDescriptionDocument>"#,
        )
        .unwrap();
        doc.insert_contributor("Bob", "").unwrap();

        let names: Vec<String> = doc
            .locate_all("contributor_name")
            .unwrap()
            .iter()
            .map(|element| element.text())
            .collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
        assert_eq!(doc.locate_all("contributor").unwrap().len(), 3);
        assert!(doc.locate_all("creator_name").unwrap().is_empty());
    }

    #[test]
    fn differentiates_between_multiple_added_nodes() {
        let mut doc = PbcoreDocument::new();
        assert_eq!(doc.insert_contributor("", "").unwrap(), 0);
        assert_eq!(doc.insert_contributor("", "").unwrap(), 1);

        let outcome = doc.update_values(
            &FieldUpdates::new()
                .set("contributor_name", 0, "first contributor")
                .set("contributor_name", 1, "second contributor")
                .set("contributor_role", 0, "first contributor role")
                .set("contributor_role", 1, "second contributor role"),
        );
        assert_eq!(outcome.applied, 4);

        assert_eq!(doc.count("contributor").unwrap(), 2);
        assert_eq!(
            doc.get_values("contributor_name").unwrap(),
            vec!["first contributor", "second contributor"]
        );
        assert_eq!(
            doc.get_values("contributor_role").unwrap(),
            vec!["first contributor role", "second contributor role"]
        );

        doc.update_value("contributor_name", 1, "changed").unwrap();
        assert_eq!(doc.get_value("contributor_name", 0).unwrap(), "first contributor");
    }

    #[test]
    fn index_beyond_count_fails() {
        let mut doc = PbcoreDocument::new();
        doc.insert_publisher("WMMS", "broadcaster").unwrap();
        assert!(matches!(
            doc.get_value("publisher_name", 1),
            Err(PbcoreError::IndexOutOfRange { index: 1, count: 1, .. })
        ));
        assert!(matches!(
            doc.update_value("publisher_role", 2, "x"),
            Err(PbcoreError::IndexOutOfRange { index: 2, count: 1, .. })
        ));
        assert_eq!(doc.count("publisher").unwrap(), 1);
    }

    #[test]
    fn group_roots_are_read_only() {
        let mut doc = PbcoreDocument::new();
        doc.insert_contributor("Jane", "").unwrap();
        assert!(matches!(
            doc.set_value("contributor", "x"),
            Err(PbcoreError::ReadOnlyField(_))
        ));
        assert_eq!(doc.get_values("contributor").unwrap(), vec!["Jane"]);
    }

    #[test]
    fn remove_node_renumbers() {
        let kinds = [
            (GroupKind::Publisher, "publisher"),
            (GroupKind::Contributor, "contributor"),
            (GroupKind::Creator, "creator"),
        ];
        for (kind, name) in kinds {
            let mut doc = PbcoreDocument::new();
            doc.insert_group(kind, &["a"]).unwrap();
            doc.insert_group(kind, &["b"]).unwrap();
            doc.insert_group(kind, &["c"]).unwrap();
            assert_eq!(doc.count(name).unwrap(), 3);

            doc.remove_node(kind, 1).unwrap();
            assert_eq!(doc.count(name).unwrap(), 2);
            let field = format!("{}_name", name);
            assert_eq!(doc.get_values(&field).unwrap(), vec!["a", "c"]);
            assert_eq!(doc.get_value(&field, 1).unwrap(), "c");

            doc.remove_node(kind, 0).unwrap();
            doc.remove_node(kind, 0).unwrap();
            assert_eq!(doc.count(name).unwrap(), 0);
            assert!(matches!(
                doc.remove_node(kind, 0),
                Err(PbcoreError::IndexOutOfRange { count: 0, .. })
            ));
        }
    }

    #[test]
    fn inserts_form_a_queue() {
        let mut doc = PbcoreDocument::new();
        doc.insert_contributor("one", "").unwrap();
        doc.insert_publisher("pub", "").unwrap();
        doc.insert_creator("creator", "").unwrap();
        doc.insert_contributor("two", "").unwrap();

        let names: Vec<&str> = doc.root().elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["pbcoreCreator", "pbcoreContributor", "pbcoreContributor", "pbcorePublisher"]
        );
        assert_eq!(doc.get_values("contributor_name").unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn places_and_dates_index_separately() {
        let mut doc = PbcoreDocument::new();
        doc.insert_date("2012-11-11").unwrap();
        assert_eq!(doc.insert_place("Cleveland").unwrap(), 0);
        assert_eq!(doc.insert_place("Akron").unwrap(), 1);
        assert_eq!(doc.insert_date("2013-01-01").unwrap(), 1);

        assert_eq!(doc.get_values("event_place").unwrap(), vec!["Cleveland", "Akron"]);
        assert_eq!(doc.get_values("event_date").unwrap(), vec!["2012-11-11", "2013-01-01"]);
        assert_eq!(doc.count("place").unwrap(), 2);

        doc.remove_node(GroupKind::Place, 0).unwrap();
        assert_eq!(doc.get_values("event_place").unwrap(), vec!["Akron"]);
        assert_eq!(doc.count("date").unwrap(), 2);
    }
}

mod relations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_relation_feeds_relation_fields() {
        let mut doc = PbcoreDocument::new();
        doc.insert_relation("My Collection", "Archival Collection").unwrap();
        assert_eq!(doc.get_values("archival_collection").unwrap(), vec!["My Collection"]);

        doc.insert_relation("My event", "Event Series").unwrap();
        assert_eq!(doc.get_values("event_series").unwrap(), vec!["My event"]);

        doc.insert_relation("My series", "Archival Series").unwrap();
        assert_eq!(doc.get_values("archival_series").unwrap(), vec!["My series"]);

        doc.insert_relation("My Acces Num", "Accession Number").unwrap();
        assert_eq!(doc.get_values("accession_number").unwrap(), vec!["My Acces Num"]);

        assert_eq!(doc.count("relation").unwrap(), 4);
    }

    #[test]
    fn writing_a_relation_field_reuses_an_inserted_relation() {
        let mut doc = PbcoreDocument::new();
        doc.insert_relation("", "Collection Number").unwrap();
        doc.set_value("collection_number", "RG-1").unwrap();
        assert_eq!(doc.count("relation").unwrap(), 1);
        assert_eq!(doc.get_values("collection_number").unwrap(), vec!["RG-1"]);
    }

    #[test]
    fn custom_relation_type() {
        let mut doc = PbcoreDocument::new();
        doc.insert(&Template::relation("Other", "Archival Collection").relation_type("Has Part"))
            .unwrap();
        let relation = doc.locate("relation", 0).unwrap();
        assert_eq!(relation.child("pbcoreRelationType").unwrap().text(), "Has Part");
    }
}

mod batch {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failures_are_reported_and_the_rest_applied() {
        let mut doc = PbcoreDocument::new();
        doc.insert_contributor("", "").unwrap();

        let outcome = doc.update_values(
            &FieldUpdates::new()
                .set("main_title", 0, "Title")
                .set("no_such_field", 0, "x")
                .set("contributor_name", 0, "first")
                .set("contributor_name", 5, "missing")
                .set("contributor", 0, "read only")
                .set("asset_type", 0, "Scene"),
        );

        assert_eq!(outcome.applied, 3);
        assert_eq!(outcome.failures.len(), 3);
        assert!(matches!(outcome.failures[0].error, PbcoreError::UnknownField(_)));
        assert_eq!(outcome.failures[1].field, "contributor_name");
        assert_eq!(outcome.failures[1].index, 5);
        assert!(matches!(outcome.failures[1].error, PbcoreError::IndexOutOfRange { .. }));
        assert!(matches!(outcome.failures[2].error, PbcoreError::ReadOnlyField(_)));

        assert_eq!(doc.get_values("main_title").unwrap(), vec!["Title"]);
        assert_eq!(doc.get_values("contributor_name").unwrap(), vec!["first"]);
        assert_eq!(doc.get_values("asset_type").unwrap(), vec!["Scene"]);
    }

    #[test]
    fn indices_are_stable_within_a_batch() {
        let mut doc = PbcoreDocument::new();
        for _ in 0..3 {
            doc.insert_publisher("", "").unwrap();
        }
        let outcome = doc.update_values(
            &FieldUpdates::new()
                .set("publisher_name", 2, "c")
                .set("publisher_name", 0, "a")
                .set("publisher_name", 1, "b"),
        );
        assert!(outcome.is_success());
        assert_eq!(doc.get_values("publisher_name").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_field_is_never_silent() {
        let mut doc = PbcoreDocument::new();
        assert!(matches!(doc.get_values("bogus"), Err(PbcoreError::UnknownField(_))));
        assert!(matches!(doc.count("bogus"), Err(PbcoreError::UnknownField(_))));
        assert!(matches!(doc.set_value("bogus", "x"), Err(PbcoreError::UnknownField(_))));
        assert!(matches!(doc.locate("bogus", 0), Err(PbcoreError::UnknownField(_))));
    }
}

mod instantiations {
    use super::*;
    use pretty_assertions::assert_eq;
    use pbcorekit::SequenceDirection;

    #[test]
    fn digital_and_physical() {
        let mut doc = PbcoreDocument::new();
        doc.set_value("note", "after instantiations").unwrap();
        assert_eq!(doc.insert_digital_instantiation().unwrap(), 0);
        assert_eq!(doc.insert_physical_instantiation().unwrap(), 1);
        assert_eq!(doc.count("instantiation").unwrap(), 2);

        let names: Vec<&str> = doc.root().elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["pbcoreInstantiation", "pbcoreInstantiation", "pbcoreAnnotation"]
        );

        let physical = doc.locate("instantiation", 1).unwrap();
        assert!(physical.child("instantiationPhysical").is_some());
    }

    #[test]
    fn sequencing_relations() {
        let mut doc = PbcoreDocument::new();
        doc.insert_physical_instantiation().unwrap();
        doc.insert_physical_instantiation().unwrap();
        doc.insert_instantiation_relation(0, SequenceDirection::Next, "tape-2").unwrap();
        doc.insert_instantiation_relation(1, SequenceDirection::Previous, "tape-1").unwrap();

        let second = doc.locate("instantiation", 1).unwrap();
        let relation = second.child("instantiationRelation").unwrap();
        assert_eq!(
            relation.child("instantiationRelationType").unwrap().text(),
            "Follows in Sequence"
        );
        // Relations sit before rights and annotations
        let names: Vec<&str> = second.elements().map(|e| e.name.as_str()).collect();
        let relation_at = names.iter().position(|n| *n == "instantiationRelation").unwrap();
        let rights_at = names.iter().position(|n| *n == "instantiationRights").unwrap();
        assert!(relation_at < rights_at);

        doc.remove_node(GroupKind::InstantiationRelation, 0).unwrap();
        assert_eq!(doc.count("instantiation_relation").unwrap(), 1);
        let first = doc.locate("instantiation", 0).unwrap();
        assert!(first.child("instantiationRelation").is_none());
    }
}

mod serialization {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_round_trip_preserves_fields() {
        let mut doc = PbcoreDocument::new();
        doc.set_value("main_title", "Rock & Roll <Live>").unwrap();
        doc.insert_contributor("Jane \"JD\" Doe", "performer").unwrap();
        doc.insert_date("2012-11-11").unwrap();

        let xml = doc.to_xml().unwrap();
        let parsed = PbcoreDocument::parse(&xml).unwrap();
        assert_eq!(parsed.root(), doc.root());
        assert_eq!(parsed.get_values("main_title").unwrap(), vec!["Rock & Roll <Live>"]);
        assert_eq!(parsed.get_values("contributor_name").unwrap(), vec!["Jane \"JD\" Doe"]);
    }

    #[test]
    fn whitespace_values_survive_round_trip() {
        let mut doc = PbcoreDocument::new();
        doc.set_value("main_title", " ").unwrap();
        doc.insert_contributor("  ", "performer").unwrap();

        let parsed = PbcoreDocument::parse(&doc.to_xml().unwrap()).unwrap();
        assert_eq!(parsed.get_values("main_title").unwrap(), vec![" "]);
        assert_eq!(parsed.get_values("contributor_name").unwrap(), vec!["  "]);
        assert_eq!(parsed.root(), doc.root());
    }

    #[test]
    fn pbcore_xml_is_schema_ordered() {
        let xml = r#"<pbcoreDescriptionDocument xmlns="http://www.pbcore.org/PBCore/PBCoreNamespace.html">
  <pbcoreAnnotation annotationType="Notes">n</pbcoreAnnotation>
  <pbcoreTitle titleType="Main">t</pbcoreTitle>
  <pbcoreAssetType>Scene</pbcoreAssetType>
</pbcoreDescriptionDocument>"#;
        let doc = PbcoreDocument::parse(xml).unwrap();
        let ordered = doc.to_pbcore_xml().unwrap();
        let asset = ordered.find("<pbcoreAssetType>").unwrap();
        let title = ordered.find("<pbcoreTitle").unwrap();
        let note = ordered.find("<pbcoreAnnotation").unwrap();
        assert!(asset < title && title < note);

        // The document itself keeps its order
        assert_eq!(doc.root().elements().next().unwrap().name, "pbcoreAnnotation");
    }

    #[test]
    fn rejects_foreign_root() {
        assert!(matches!(
            PbcoreDocument::parse("<mods/>"),
            Err(PbcoreError::ParseError(_))
        ));
    }
}

//! Build a PBCore document from scratch
//!
//! This example fills in a blank document through symbolic fields, inserts
//! repeatable groups, and prints the schema-ordered XML and its search index
//! document. An optional argument names a JSON file of template settings.

use std::env;
use std::fs;

use pbcorekit::{FieldUpdates, GroupKind, PbcoreDocument, SequenceDirection, TemplateSettings};

fn build_document() -> Result<(), Box<dyn std::error::Error>> {
    // Expected: [settings.json]
    let args: Vec<String> = env::args().collect();
    let settings = match args.len() {
        1 => TemplateSettings::default(),
        2 => TemplateSettings::from_json(&fs::read_to_string(&args[1])?)?,
        n => {
            return Err(format!(
                "expected at most 1 argument (settings.json), got {} arguments",
                n - 1
            )
            .into())
        }
    };

    let mut doc = PbcoreDocument::new().with_settings(settings);

    // =========================================
    // Singleton fields
    // =========================================

    doc.set_value("main_title", "Induction Ceremony 2012")?;
    doc.set_value("asset_type", "Scene")?;
    doc.set_value("summary", "Opening of the 27th annual induction ceremony.")?;
    doc.set_value("event_series", "Rock and Roll Hall of Fame Induction Ceremony")?;

    // =========================================
    // Repeatable groups
    // =========================================

    doc.insert_contributor("Green Day", "performer")?;
    doc.insert_contributor("", "")?;
    doc.insert_place("Cleveland, OH")?;
    doc.insert_date("2012-04-14")?;
    doc.insert_group(GroupKind::Publisher, &["Rock and Roll Hall of Fame and Museum"])?;

    let first = doc.insert_physical_instantiation()?;
    let second = doc.insert_physical_instantiation()?;
    doc.insert_instantiation_relation(first, SequenceDirection::Next, "tape-2")?;
    doc.insert_instantiation_relation(second, SequenceDirection::Previous, "tape-1")?;

    // =========================================
    // Batch update
    // =========================================

    let outcome = doc.update_values(
        &FieldUpdates::new()
            .set("contributor_name", 1, "Billie Joe Armstrong")
            .set("contributor_role", 1, "speaker")
            .set("contributor_name", 2, "nobody"),
    );
    println!("Applied {} updates", outcome.applied);
    for failure in &outcome.failures {
        println!("  skipped {}", failure);
    }

    println!();
    println!("{}", doc.to_pbcore_xml()?);
    println!();
    println!("{}", doc.to_index()?.to_xml()?);

    Ok(())
}

fn main() {
    if let Err(err) = build_document() {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}

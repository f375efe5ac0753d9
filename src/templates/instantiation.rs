//! Digital and physical instantiation shapes

use crate::core::node::ElementNode;
use crate::templates::settings::TemplateSettings;

fn leaf(name: &str) -> ElementNode {
    ElementNode::new(name)
}

fn identifier(settings: &TemplateSettings, annotation: &str) -> ElementNode {
    leaf("instantiationIdentifier")
        .with_attribute("annotation", annotation)
        .with_attribute("source", settings.institution.as_str())
}

fn created_date() -> ElementNode {
    leaf("instantiationDate").with_attribute("dateType", "created")
}

fn rights() -> ElementNode {
    leaf("instantiationRights").with_child(leaf("rightsSummary"))
}

fn essence_track(kind: &str, rate: &str) -> ElementNode {
    let mut track = leaf("instantiationEssenceTrack")
        .with_child(leaf("essenceTrackType").with_text(kind))
        .with_child(leaf("essenceTrackStandard"))
        .with_child(leaf("essenceTrackEncoding"))
        .with_child(leaf("essenceTrackDataRate").with_attribute("unitsOfMeasure", "Kb/s"));

    if kind == "Video" {
        track = track
            .with_child(leaf("essenceTrackFrameRate").with_attribute("unitsOfMeasure", rate))
            .with_child(leaf("essenceTrackBitDepth"))
            .with_child(leaf("essenceTrackAspectRatio"));
    } else {
        track = track
            .with_child(leaf("essenceTrackSamplingRate").with_attribute("unitsOfMeasure", rate))
            .with_child(leaf("essenceTrackBitDepth"));
    }
    track
}

/// A born-digital or digitized file
pub(crate) fn digital(settings: &TemplateSettings) -> ElementNode {
    leaf("pbcoreInstantiation")
        .with_child(identifier(settings, "Filename"))
        .with_child(created_date())
        .with_child(leaf("instantiationDigital"))
        .with_child(leaf("instantiationLocation"))
        .with_child(leaf("instantiationMediaType").with_text("Moving image"))
        .with_child(leaf("instantiationGenerations"))
        .with_child(leaf("instantiationFileSize").with_attribute("unitsOfMeasure", ""))
        .with_child(leaf("instantiationDuration"))
        .with_child(leaf("instantiationColors").with_text("Color"))
        .with_child(essence_track("Video", "fps"))
        .with_child(essence_track("Audio", "kHz"))
        .with_child(rights())
}

/// A tape, film or other carrier on a shelf
pub(crate) fn physical(settings: &TemplateSettings) -> ElementNode {
    leaf("pbcoreInstantiation")
        .with_child(identifier(settings, "Barcode"))
        .with_child(created_date())
        .with_child(leaf("instantiationPhysical"))
        .with_child(leaf("instantiationStandard"))
        .with_child(leaf("instantiationLocation").with_text(settings.address.as_str()))
        .with_child(leaf("instantiationMediaType").with_text("Moving image"))
        .with_child(leaf("instantiationGenerations").with_text("Original"))
        .with_child(leaf("instantiationColors").with_text("Color"))
        .with_child(rights())
        .with_child(leaf("instantiationAnnotation").with_attribute("annotationType", "Condition Notes"))
        .with_child(leaf("instantiationAnnotation").with_attribute("annotationType", "Cleaning Notes"))
}

//! Search index projection
//!
//! A document is flattened into a map from term names to value lists. Each
//! [`ProjectionRule`] reads one symbolic field and fans its values out to
//! one term per purpose, named by suffix:
//!
//! | purpose     | text field  | date field              |
//! |-------------|-------------|-------------------------|
//! | Searchable  | `_t`        | `_dt` (normalized)      |
//! | Displayable | `_display`  | `_display` (as written) |
//! | Facetable   | `_facet`    | `_facet` (as written)   |
//! | Sortable    | `_sort`     | `_sort` (normalized)    |
//!
//! A date field therefore never produces a free-text `_t` term. Blank values
//! are skipped, and a term with no values is absent rather than empty.

use crate::core::document::PbcoreDocument;
use crate::core::error::PbcoreResult;
use crate::core::node::ElementNode;
use crate::core::serializer::PbcoreSerializer;
use crate::mapping::MappingTable;
use crate::utils::datetime::normalize_date;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static BUILTIN_RULES: OnceLock<Vec<ProjectionRule>> = OnceLock::new();

/// How values are coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldType {
    /// Values are kept as written
    Text,
    /// Values are normalized to `YYYY-MM-DDTHH:MM:SSZ` where machine-readable
    Date,
}

/// What an index term is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndexAs {
    Searchable,
    Displayable,
    Facetable,
    Sortable,
}

impl IndexAs {
    /// Term suffix for a field type
    pub fn suffix(&self, field_type: FieldType) -> &'static str {
        match (self, field_type) {
            (IndexAs::Searchable, FieldType::Text) => "_t",
            (IndexAs::Searchable, FieldType::Date) => "_dt",
            (IndexAs::Displayable, _) => "_display",
            (IndexAs::Facetable, _) => "_facet",
            (IndexAs::Sortable, _) => "_sort",
        }
    }

    /// Whether the term carries the normalized form of a date
    fn normalizes(&self) -> bool {
        matches!(self, IndexAs::Searchable | IndexAs::Sortable)
    }
}

/// Projection of one symbolic field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionRule {
    /// Symbolic field to read
    pub field: String,
    /// Base name of the produced terms
    pub term: String,
    /// Value coercion
    pub field_type: FieldType,
    /// Purposes, one term each
    pub index_as: Vec<IndexAs>,
}

impl ProjectionRule {
    /// Searchable and displayable text under the field's own name
    pub fn text(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            term: field.clone(),
            field,
            field_type: FieldType::Text,
            index_as: vec![IndexAs::Searchable, IndexAs::Displayable],
        }
    }

    /// Searchable and displayable date under the field's own name
    pub fn date(field: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::Date,
            ..Self::text(field)
        }
    }

    /// Builder: use a different base term name
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Builder: replace the purposes
    pub fn with_index_as(mut self, index_as: &[IndexAs]) -> Self {
        self.index_as = index_as.to_vec();
        self
    }

    /// Names of the terms this rule can produce
    pub fn term_names(&self) -> Vec<String> {
        self.index_as
            .iter()
            .map(|purpose| format!("{}{}", self.term, purpose.suffix(self.field_type)))
            .collect()
    }

    /// Rules for the built-in vocabulary
    ///
    /// Every value field is searchable and displayable; `event_date` is a
    /// date; names and places are also facets, and the main title gets a
    /// sortable `title` term.
    pub fn builtin() -> &'static [ProjectionRule] {
        BUILTIN_RULES.get_or_init(|| {
            let table = MappingTable::shared();
            let mut rules: Vec<ProjectionRule> = table
                .fields()
                .filter(|field| !field.is_group_root())
                .map(|field| match field.name.as_str() {
                    "event_date" => ProjectionRule::date("event_date"),
                    "creator_name" | "contributor_name" | "publisher_name" | "event_place" => {
                        ProjectionRule::text(field.name.as_str()).with_index_as(&[
                            IndexAs::Searchable,
                            IndexAs::Displayable,
                            IndexAs::Facetable,
                        ])
                    }
                    name => ProjectionRule::text(name),
                })
                .collect();
            rules.push(
                ProjectionRule::text("main_title")
                    .with_term("title")
                    .with_index_as(&[IndexAs::Displayable, IndexAs::Sortable]),
            );
            rules
        })
    }

    fn apply(&self, values: &[String], out: &mut IndexDocument) {
        for value in values.iter().filter(|v| !v.trim().is_empty()) {
            let normalized = match self.field_type {
                FieldType::Text => None,
                FieldType::Date => match normalize_date(value) {
                    Ok(date) => Some(date),
                    Err(err) => {
                        tracing::warn!(field = %self.field, %err, "skipping unparseable date");
                        continue;
                    }
                },
            };

            for purpose in &self.index_as {
                let term = format!("{}{}", self.term, purpose.suffix(self.field_type));
                let projected = match &normalized {
                    Some(date) if purpose.normalizes() => date.as_str(),
                    _ => value.as_str(),
                };
                // Sort terms are single-valued
                if *purpose == IndexAs::Sortable && out.get(&term).is_some() {
                    continue;
                }
                out.push(term, projected);
            }
        }
    }
}

/// A flattened, search-oriented view of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct IndexDocument {
    terms: BTreeMap<String, Vec<String>>,
}

impl IndexDocument {
    /// Create an empty index document
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of a term; `None` when the term was not produced
    pub fn get(&self, term: &str) -> Option<&[String]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    /// Append a value to a term
    pub fn push(&mut self, term: impl Into<String>, value: impl Into<String>) {
        self.terms.entry(term.into()).or_default().push(value.into());
    }

    /// Iterate over terms in name order
    pub fn terms(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.terms.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if no term was produced
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Serialize as a Solr `<doc>` element
    pub fn to_xml(&self) -> PbcoreResult<String> {
        let mut doc = ElementNode::new("doc");
        for (name, values) in &self.terms {
            for value in values {
                doc.append_child(
                    ElementNode::new("field")
                        .with_attribute("name", name.as_str())
                        .with_text(value.as_str()),
                );
            }
        }
        PbcoreSerializer::fragment().serialize(&doc)
    }

    /// Serialize as a JSON object of term arrays
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> PbcoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            crate::core::error::PbcoreError::SerializationError(format!(
                "Failed to serialize index document: {}",
                e
            ))
        })
    }
}

/// Project a document with the built-in rules
pub fn project(document: &PbcoreDocument) -> PbcoreResult<IndexDocument> {
    document.to_index()
}

/// Project a document with the given rules
///
/// A rule naming a field the document cannot resolve fails the projection.
pub fn project_rules<'a, I>(document: &PbcoreDocument, rules: I) -> PbcoreResult<IndexDocument>
where
    I: IntoIterator<Item = &'a ProjectionRule>,
{
    let mut out = IndexDocument::new();
    for rule in rules {
        let values = document.get_values(&rule.field)?;
        rule.apply(&values, &mut out);
    }
    Ok(out)
}

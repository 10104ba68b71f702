//! Metadata merge: annotate occurrences with part numbers, links and cost.

use std::collections::HashSet;

use bb_model::{MetadataTable, NodeShape, ParsedDiagram};
use tracing::warn;

use crate::occurrence::Occurrence;
use crate::warning::BomWarning;

/// An occurrence with its descriptive fields filled in.
///
/// Metadata never touches `occurrence.quantity`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedOccurrence<'a> {
    pub occurrence: Occurrence<'a>,
    pub description: &'a str,
    pub shape: Option<NodeShape>,
    pub part_number: Option<&'a str>,
    pub link: Option<&'a str>,
    pub cost: Option<f64>,
}

/// Look up metadata for each occurrence, by id first and then by label.
///
/// A missing entry leaves the fields empty; that is not an error. An
/// occurrence whose id is not in `diagram` is logged and skipped.
pub fn merge_metadata<'a>(
    diagram: &'a ParsedDiagram,
    occurrences: &[Occurrence<'a>],
    metadata: &'a MetadataTable,
) -> Vec<MergedOccurrence<'a>> {
    occurrences
        .iter()
        .filter_map(|occurrence| {
            let Some(element) = diagram.element(occurrence.id) else {
                warn!(id = occurrence.id, "occurrence names no element; skipped");
                return None;
            };
            let description = element.description();
            let entry = metadata.lookup(occurrence.id, description);
            Some(MergedOccurrence {
                occurrence: *occurrence,
                description,
                shape: element.shape(),
                part_number: entry.and_then(|m| m.part_number.as_deref()),
                link: entry.and_then(|m| m.link.as_deref()),
                cost: entry.and_then(|m| m.cost),
            })
        })
        .collect()
}

/// Metadata keys that match no node or container by id or label.
pub fn unmatched_metadata(diagram: &ParsedDiagram, metadata: &MetadataTable) -> Vec<BomWarning> {
    let mut known: HashSet<&str> = HashSet::new();
    for node in diagram.nodes.values() {
        known.insert(&node.id);
        known.insert(&node.label);
    }
    for subgraph in diagram.subgraphs.values() {
        known.insert(&subgraph.id);
        known.insert(&subgraph.title);
    }

    metadata
        .keys()
        .filter(|key| !known.contains(key))
        .map(|key| {
            warn!(key, "metadata entry matches no node id or label");
            BomWarning::MetadataMismatch {
                key: key.to_string(),
            }
        })
        .collect()
}

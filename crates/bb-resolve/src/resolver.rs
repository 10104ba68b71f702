//! Hierarchy resolution: walk a diagram into an ordered occurrence stream.
//!
//! The walk is depth-first from each entry point in declaration order.
//! Visiting an element emits it at the current level; a container then
//! visits its member nodes and child containers one level deeper, and every
//! element follows its outgoing edges one level deeper with the running
//! quantity multiplied by the edge's count.

use bb_model::{ElementId, ElementIndex, ParsedDiagram, validate_diagram};
use tracing::{debug, trace, warn};

use crate::error::{BomError, BomResult};
use crate::guard::{self, PathGuard};
use crate::occurrence::Occurrence;
use crate::quantity::{Multiplier, parse_multiplier};
use crate::warning::BomWarning;

/// Occurrences in traversal order plus any non-fatal findings.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub occurrences: Vec<Occurrence<'a>>,
    pub warnings: Vec<BomWarning>,
}

/// Validate `diagram`, then walk it from every entry point.
///
/// Fails with every dangling reference before walking, or with the first
/// cycle found. Elements no entry point reaches are not emitted, but they
/// are still checked for cycles.
pub fn resolve_occurrences(diagram: &ParsedDiagram) -> BomResult<Resolution<'_>> {
    validate_diagram(diagram)?;
    let index = ElementIndex::from_diagram(diagram)?;
    let (multipliers, warnings) = edge_multipliers(diagram);
    let entries = index.entry_points(diagram);

    debug!(
        elements = index.len(),
        edges = diagram.edges.len(),
        entries = entries.len(),
        "resolving diagram"
    );

    let mut walk = Walk {
        index: &index,
        multipliers: &multipliers,
        guard: PathGuard::new(index.len()),
        reached: vec![false; index.len()],
        occurrences: Vec::new(),
    };
    for entry in entries {
        walk.visit(entry, 0, 1)?;
    }

    let Walk {
        reached,
        occurrences,
        ..
    } = walk;
    guard::sweep_unreached(&index, &reached)?;

    let unreached = reached.iter().filter(|r| !**r).count();
    if unreached > 0 {
        debug!(unreached, "elements not reachable from any entry point");
    }

    Ok(Resolution {
        occurrences,
        warnings,
    })
}

/// Per-edge multipliers, with a warning for each label that carried no count.
fn edge_multipliers(diagram: &ParsedDiagram) -> (Vec<u64>, Vec<BomWarning>) {
    let mut warnings = Vec::new();
    let multipliers = diagram
        .edges
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            let multiplier = parse_multiplier(edge.label.as_deref());
            if multiplier == Multiplier::Unparsed {
                let label = edge.label.clone().unwrap_or_default();
                warn!(
                    edge = i,
                    source = %edge.source_id,
                    target = %edge.target_id,
                    label = %label,
                    "edge label has no quantity; counting as one"
                );
                warnings.push(BomWarning::QuantityLabel {
                    edge: i,
                    source_id: edge.source_id.clone(),
                    target_id: edge.target_id.clone(),
                    label,
                });
            }
            multiplier.value()
        })
        .collect();
    (multipliers, warnings)
}

struct Walk<'w, 'a> {
    index: &'w ElementIndex<'a>,
    multipliers: &'w [u64],
    guard: PathGuard,
    reached: Vec<bool>,
    occurrences: Vec<Occurrence<'a>>,
}

impl<'a> Walk<'_, 'a> {
    fn visit(&mut self, id: ElementId, level: usize, quantity: u64) -> BomResult<()> {
        let index = self.index;
        self.guard.enter(id, index)?;
        self.reached[id.slot()] = true;

        let key = index.key(id);
        trace!(id = key, level, quantity, "occurrence");
        self.occurrences.push(Occurrence {
            id: key,
            kind: index.kind(id),
            level,
            quantity,
        });

        for &member in index.members(id) {
            self.visit(member, level + 1, quantity)?;
        }

        for &edge in index.outgoing(id) {
            let target = index.edge_target(edge);
            let Some(next) = quantity.checked_mul(self.multipliers[edge]) else {
                return Err(BomError::QuantityOverflow {
                    id: index.key(target).to_string(),
                    path: self.guard.path_to(target, index),
                });
            };
            self.visit(target, level + 1, next)?;
        }

        self.guard.leave(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_model::{DiagramBuilder, ElementKind};

    fn rows<'a>(resolution: &Resolution<'a>) -> Vec<(&'a str, usize, u64)> {
        resolution
            .occurrences
            .iter()
            .map(|o| (o.id, o.level, o.quantity))
            .collect()
    }

    #[test]
    fn root_edge_into_container() {
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("R", "R")
            .add_node("Bolt", "Bolt")
            .add_subgraph("Sub", "Sub")
            .add_member("Sub", "Bolt")
            .add_labeled_edge("R", "Sub", "×3");
        let diagram = builder.build().unwrap();

        let resolution = resolve_occurrences(&diagram).unwrap();
        assert_eq!(
            rows(&resolution),
            vec![("R", 0, 1), ("Sub", 1, 3), ("Bolt", 2, 3)]
        );
        assert_eq!(resolution.occurrences[1].kind, ElementKind::Container);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn container_members_then_children_then_edges() {
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("P", "Plate")
            .add_node("S", "Screw")
            .add_node("W", "Washer")
            .add_subgraph("Top", "Top")
            .add_member("Top", "P")
            .add_nested_subgraph("Top", "Inner", "Inner")
            .add_member("Inner", "S")
            .add_labeled_edge("S", "W", "2");
        let diagram = builder.build().unwrap();

        let resolution = resolve_occurrences(&diagram).unwrap();
        assert_eq!(
            rows(&resolution),
            vec![
                ("Top", 0, 1),
                ("P", 1, 1),
                ("Inner", 1, 1),
                ("S", 2, 1),
                ("W", 3, 2),
            ]
        );
    }

    #[test]
    fn shared_part_emits_one_occurrence_per_path() {
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("Frame", "Frame")
            .add_node("L", "Left")
            .add_node("Rt", "Right")
            .add_node("Bolt", "Bolt")
            .add_labeled_edge("Frame", "L", "x2")
            .add_edge("Frame", "Rt")
            .add_labeled_edge("L", "Bolt", "x4")
            .add_labeled_edge("Rt", "Bolt", "x3");
        let diagram = builder.build().unwrap();

        let resolution = resolve_occurrences(&diagram).unwrap();
        assert_eq!(
            rows(&resolution),
            vec![
                ("Frame", 0, 1),
                ("L", 1, 2),
                ("Bolt", 2, 8),
                ("Rt", 1, 1),
                ("Bolt", 2, 3),
            ]
        );
    }

    #[test]
    fn empty_container_emits_only_itself() {
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("R", "R")
            .add_subgraph("Empty", "Empty")
            .add_labeled_edge("R", "Empty", "5");
        let diagram = builder.build().unwrap();

        let resolution = resolve_occurrences(&diagram).unwrap();
        assert_eq!(rows(&resolution), vec![("R", 0, 1), ("Empty", 1, 5)]);
    }

    #[test]
    fn edge_cycle_is_reported_with_path() {
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("Top", "Top")
            .add_node("A", "A")
            .add_node("B", "B")
            .add_edge("Top", "A")
            .add_edge("A", "B")
            .add_edge("B", "A");
        let diagram = builder.build().unwrap();

        let err = resolve_occurrences(&diagram).unwrap_err();
        assert_eq!(
            err,
            BomError::Cycle {
                id: "A".into(),
                path: vec!["Top".into(), "A".into(), "B".into(), "A".into()],
            }
        );
    }

    #[test]
    fn cycle_behind_targeted_entry_points_is_found() {
        // Both nodes are roots but each leads to the other, so neither starts a walk.
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("A", "A")
            .add_node("B", "B")
            .add_edge("A", "B")
            .add_edge("B", "A");
        let diagram = builder.build().unwrap();

        let err = resolve_occurrences(&diagram).unwrap_err();
        assert!(matches!(err, BomError::Cycle { ref id, .. } if id == "A"));
    }

    #[test]
    fn unparsed_label_warns_and_counts_one() {
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("A", "A")
            .add_node("B", "B")
            .add_labeled_edge("A", "B", "several");
        let diagram = builder.build().unwrap();

        let resolution = resolve_occurrences(&diagram).unwrap();
        assert_eq!(rows(&resolution), vec![("A", 0, 1), ("B", 1, 1)]);
        assert_eq!(
            resolution.warnings,
            vec![BomWarning::QuantityLabel {
                edge: 0,
                source_id: "A".into(),
                target_id: "B".into(),
                label: "several".into(),
            }]
        );
    }

    #[test]
    fn overflowing_quantity_is_an_error() {
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("A", "A")
            .add_node("B", "B")
            .add_node("C", "C")
            .add_labeled_edge("A", "B", "4294967296")
            .add_labeled_edge("B", "C", "4294967296");
        let diagram = builder.build().unwrap();

        let err = resolve_occurrences(&diagram).unwrap_err();
        assert_eq!(
            err,
            BomError::QuantityOverflow {
                id: "C".into(),
                path: vec!["A".into(), "B".into(), "C".into()],
            }
        );
    }
}

//! Traversal output prior to aggregation.

use bb_model::ElementKind;

/// One visit of a node or container on one path from an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub id: &'a str,
    pub kind: ElementKind,
    /// Nesting depth; entry points are level 0.
    pub level: usize,
    /// Product of edge multipliers from the entry point to this visit.
    pub quantity: u64,
}

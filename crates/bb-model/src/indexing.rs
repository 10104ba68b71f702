//! Compact element indexing for traversal.
//!
//! Maps string ids to contiguous [`ElementId`]s and precomputes, per element,
//! its contained members and its outgoing edges as flat adjacency lists.

use std::collections::HashMap;

use crate::diagram::ParsedDiagram;
use crate::error::{ModelError, ModelResult};
use crate::ids::ElementId;

/// Whether an element is an atomic node or a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ElementKind {
    Node,
    Container,
}

/// Index over a validated diagram.
///
/// Nodes come first (in declaration order), then containers. Element `i`'s
/// members are `members[member_offsets[i]..member_offsets[i + 1]]`: member
/// nodes, then child containers. Its outgoing edge indices (into
/// `ParsedDiagram::edges`) are laid out the same way in `out_edges`.
#[derive(Debug, Clone)]
pub struct ElementIndex<'a> {
    keys: Vec<&'a str>,
    kinds: Vec<ElementKind>,
    lookup: HashMap<&'a str, ElementId>,

    member_offsets: Vec<usize>,
    members: Vec<ElementId>,

    edge_offsets: Vec<usize>,
    out_edges: Vec<usize>,
    edge_targets: Vec<ElementId>,
    incoming: Vec<u32>,
}

impl<'a> ElementIndex<'a> {
    /// Build the index. Fails on the first reference that resolves to nothing;
    /// run validation first for a complete report.
    pub fn from_diagram(diagram: &'a ParsedDiagram) -> ModelResult<Self> {
        let mut keys = Vec::with_capacity(diagram.nodes.len() + diagram.subgraphs.len());
        let mut kinds = Vec::with_capacity(keys.capacity());
        for id in diagram.nodes.keys() {
            keys.push(id.as_str());
            kinds.push(ElementKind::Node);
        }
        for id in diagram.subgraphs.keys() {
            keys.push(id.as_str());
            kinds.push(ElementKind::Container);
        }

        let lookup: HashMap<&'a str, ElementId> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (*key, ElementId::from_index(i as u32)))
            .collect();
        let resolve = |id: &str| {
            lookup.get(id).copied().ok_or_else(|| ModelError::NotFound {
                id: id.to_string(),
            })
        };

        // Containment adjacency
        let mut member_offsets = Vec::with_capacity(keys.len() + 1);
        let mut members = Vec::new();
        member_offsets.push(0);
        for _ in diagram.nodes.keys() {
            member_offsets.push(members.len());
        }
        for subgraph in diagram.subgraphs.values() {
            for id in subgraph.node_ids.iter().chain(&subgraph.children) {
                members.push(resolve(id)?);
            }
            member_offsets.push(members.len());
        }

        // Edge adjacency, grouped by source, declaration order within a group
        let mut by_source: Vec<Vec<usize>> = vec![Vec::new(); keys.len()];
        let mut edge_targets = Vec::with_capacity(diagram.edges.len());
        let mut incoming = vec![0_u32; keys.len()];
        for (i, edge) in diagram.edges.iter().enumerate() {
            let source = resolve(&edge.source_id)?;
            let target = resolve(&edge.target_id)?;
            by_source[source.slot()].push(i);
            edge_targets.push(target);
            incoming[target.slot()] += 1;
        }

        let mut edge_offsets = Vec::with_capacity(keys.len() + 1);
        let mut out_edges = Vec::with_capacity(diagram.edges.len());
        edge_offsets.push(0);
        for list in by_source {
            out_edges.extend(list);
            edge_offsets.push(out_edges.len());
        }

        Ok(Self {
            keys,
            kinds,
            lookup,
            member_offsets,
            members,
            edge_offsets,
            out_edges,
            edge_targets,
            incoming,
        })
    }

    /// Number of indexed elements.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn id_of(&self, key: &str) -> Option<ElementId> {
        self.lookup.get(key).copied()
    }

    /// String id of an element (panics if out of bounds).
    pub fn key(&self, id: ElementId) -> &'a str {
        self.keys[id.slot()]
    }

    pub fn kind(&self, id: ElementId) -> ElementKind {
        self.kinds[id.slot()]
    }

    /// Contained elements of a container (empty for nodes).
    pub fn members(&self, id: ElementId) -> &[ElementId] {
        let i = id.slot();
        &self.members[self.member_offsets[i]..self.member_offsets[i + 1]]
    }

    /// Indices of edges leaving the element, in declaration order.
    pub fn outgoing(&self, id: ElementId) -> &[usize] {
        let i = id.slot();
        &self.out_edges[self.edge_offsets[i]..self.edge_offsets[i + 1]]
    }

    /// Target of the edge at `edge` (an index into `ParsedDiagram::edges`).
    pub fn edge_target(&self, edge: usize) -> ElementId {
        self.edge_targets[edge]
    }

    /// Number of edges pointing at the element.
    pub fn incoming_count(&self, id: ElementId) -> usize {
        self.incoming[id.slot()] as usize
    }

    /// Every element id, nodes first.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.keys.len() as u32).map(ElementId::from_index)
    }

    /// Contained members, then edge targets, in declaration order.
    pub fn successors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let targets = self.outgoing(id).iter().map(move |&edge| self.edge_target(edge));
        self.members(id).iter().copied().chain(targets)
    }

    /// Root nodes then top-level containers, minus those another start
    /// already leads to.
    ///
    /// A start reached from another start through containment or edges is
    /// walked there; starting from it as well would count it twice. Edges
    /// from elements no start reaches do not count.
    pub fn entry_points(&self, diagram: &'a ParsedDiagram) -> Vec<ElementId> {
        let starts: Vec<ElementId> = diagram
            .top_level_entry_points()
            .into_iter()
            .filter_map(|element| self.id_of(element.id()))
            .collect();

        let mut reached = vec![false; self.len()];
        let mut stack: Vec<ElementId> = starts.iter().flat_map(|&id| self.successors(id)).collect();
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut reached[id.slot()], true) {
                continue;
            }
            stack.extend(self.successors(id));
        }

        starts.into_iter().filter(|id| !reached[id.slot()]).collect()
    }
}

//! Core diagram data structures.

use core::fmt;
use core::str::FromStr;

use indexmap::IndexMap;

use crate::error::ModelError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rendering shape of a node.
///
/// The parser uses shapes to convey hints such as "purchased" vs "fabricated".
/// Resolution never branches on the shape; it is carried through to BOM lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeShape {
    /// `A[text]`
    #[default]
    Rectangle,
    /// `A(text)`
    Rounded,
    /// `A([text])`
    Stadium,
    /// `A[[text]]`
    Subroutine,
    /// `A[(text)]`
    Cylinder,
    /// `A((text))`
    Circle,
    /// `A{text}`
    Rhombus,
    /// `A{{text}}`
    Hexagon,
    /// `A[/text/]`
    Parallelogram,
    /// `A[/text\]`
    Trapezoid,
    /// `A(((text)))`
    DoubleCircle,
}

impl NodeShape {
    pub const ALL: [NodeShape; 11] = [
        NodeShape::Rectangle,
        NodeShape::Rounded,
        NodeShape::Stadium,
        NodeShape::Subroutine,
        NodeShape::Cylinder,
        NodeShape::Circle,
        NodeShape::Rhombus,
        NodeShape::Hexagon,
        NodeShape::Parallelogram,
        NodeShape::Trapezoid,
        NodeShape::DoubleCircle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeShape::Rectangle => "rectangle",
            NodeShape::Rounded => "rounded",
            NodeShape::Stadium => "stadium",
            NodeShape::Subroutine => "subroutine",
            NodeShape::Cylinder => "cylinder",
            NodeShape::Circle => "circle",
            NodeShape::Rhombus => "rhombus",
            NodeShape::Hexagon => "hexagon",
            NodeShape::Parallelogram => "parallelogram",
            NodeShape::Trapezoid => "trapezoid",
            NodeShape::DoubleCircle => "double_circle",
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeShape {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeShape::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| ModelError::UnknownShape {
                name: s.to_string(),
            })
    }
}

/// An atomic part or assembly marker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    pub id: String,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: NodeShape,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape: NodeShape::default(),
        }
    }

    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }
}

/// A directed "contains" relationship.
///
/// The optional label carries the quantity multiplier (e.g. `x3`); an
/// unlabeled edge means one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A named container representing a sub-assembly.
///
/// `children` holds ids of nested containers stored in the same arena.
/// `parent_id` is a lookup aid only and is never followed during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Subgraph {
    pub id: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub node_ids: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub parent_id: Option<String>,
}

impl Subgraph {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            node_ids: Vec::new(),
            children: Vec::new(),
            parent_id: None,
        }
    }

    /// True when the container has neither member nodes nor nested containers.
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty() && self.children.is_empty()
    }
}

/// Either kind of addressable diagram element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef<'a> {
    Node(&'a Node),
    Container(&'a Subgraph),
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            ElementRef::Node(node) => &node.id,
            ElementRef::Container(subgraph) => &subgraph.id,
        }
    }

    /// Human-readable text: the node label or the container title.
    pub fn description(&self) -> &'a str {
        match self {
            ElementRef::Node(node) => &node.label,
            ElementRef::Container(subgraph) => &subgraph.title,
        }
    }

    pub fn shape(&self) -> Option<NodeShape> {
        match self {
            ElementRef::Node(node) => Some(node.shape),
            ElementRef::Container(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ElementRef::Container(_))
    }
}

/// A fully parsed diagram: the root aggregate consumed by resolution.
///
/// Nodes and containers are keyed by id and keep declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedDiagram {
    /// Rendering hint ("TD", "LR", ...); irrelevant to resolution.
    pub direction: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nodes: IndexMap<String, Node>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Vec<Edge>,
    /// Container arena, including nested containers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub subgraphs: IndexMap<String, Subgraph>,
    /// Ids of containers not nested in any other container.
    #[cfg_attr(feature = "serde", serde(default))]
    pub top_level: Vec<String>,
    /// Nodes not belonging to any container.
    #[cfg_attr(feature = "serde", serde(default))]
    pub root_node_ids: Vec<String>,
}

impl Default for ParsedDiagram {
    fn default() -> Self {
        Self::new("TD")
    }
}

impl ParsedDiagram {
    pub fn new(direction: impl Into<String>) -> Self {
        Self {
            direction: direction.into(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            subgraphs: IndexMap::new(),
            top_level: Vec::new(),
            root_node_ids: Vec::new(),
        }
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_subgraph(&self, id: &str) -> Option<&Subgraph> {
        self.subgraphs.get(id)
    }

    /// Look up a node first, then a container.
    pub fn element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.get_node(id)
            .map(ElementRef::Node)
            .or_else(|| self.get_subgraph(id).map(ElementRef::Container))
    }

    /// Root nodes followed by top-level containers, each in declaration order.
    ///
    /// Ids that resolve to nothing are skipped; validation reports them.
    pub fn top_level_entry_points(&self) -> Vec<ElementRef<'_>> {
        let roots = self
            .root_node_ids
            .iter()
            .filter_map(|id| self.get_node(id).map(ElementRef::Node));
        let containers = self
            .top_level
            .iter()
            .filter_map(|id| self.get_subgraph(id).map(ElementRef::Container));
        roots.chain(containers).collect()
    }

    /// Edges leaving `id`, in declaration order.
    pub fn outgoing_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.source_id == id)
    }

    /// True when some edge points at `id`.
    pub fn is_edge_target(&self, id: &str) -> bool {
        self.edges.iter().any(|edge| edge.target_id == id)
    }

    /// The container that lists `node_id` as a direct member, if any.
    pub fn container_of(&self, node_id: &str) -> Option<&Subgraph> {
        self.subgraphs
            .values()
            .find(|subgraph| subgraph.node_ids.iter().any(|id| id == node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_names_round_trip() {
        for shape in NodeShape::ALL {
            assert_eq!(shape.as_str().parse::<NodeShape>().unwrap(), shape);
        }
        assert!("blob".parse::<NodeShape>().is_err());
    }

    #[test]
    fn element_prefers_nodes() {
        let mut diagram = ParsedDiagram::default();
        diagram.nodes.insert("A".into(), Node::new("A", "Part A"));
        diagram
            .subgraphs
            .insert("S".into(), Subgraph::new("S", "Assembly S"));

        assert_eq!(diagram.element("A").unwrap().description(), "Part A");
        assert!(diagram.element("S").unwrap().is_container());
        assert!(diagram.element("missing").is_none());
    }

    #[test]
    fn entry_points_roots_then_containers() {
        let mut diagram = ParsedDiagram::default();
        diagram.nodes.insert("R".into(), Node::new("R", "Root"));
        diagram
            .subgraphs
            .insert("S".into(), Subgraph::new("S", "Sub"));
        diagram.top_level.push("S".into());
        diagram.root_node_ids.push("R".into());

        let ids: Vec<&str> = diagram
            .top_level_entry_points()
            .iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(ids, vec!["R", "S"]);
    }

    #[test]
    fn outgoing_edges_keep_declaration_order() {
        let mut diagram = ParsedDiagram::default();
        diagram.edges.push(Edge::new("A", "C"));
        diagram.edges.push(Edge::new("B", "C"));
        diagram.edges.push(Edge::new("A", "B").with_label("2"));

        let targets: Vec<&str> = diagram
            .outgoing_edges("A")
            .map(|e| e.target_id.as_str())
            .collect();
        assert_eq!(targets, vec!["C", "B"]);
        assert!(diagram.is_edge_target("C"));
        assert!(!diagram.is_edge_target("A"));
    }
}

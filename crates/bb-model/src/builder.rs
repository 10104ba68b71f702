//! Incremental diagram builder.

use indexmap::IndexMap;

use crate::diagram::{Edge, Node, NodeShape, ParsedDiagram, Subgraph};
use crate::error::{ModelError, ModelResult};
use crate::validate::{self, ValidationIssue};

/// Builder for constructing a diagram incrementally.
///
/// Use `add_node`, `add_edge` and the container methods to describe the
/// diagram, then call `build()` to validate it into a `ParsedDiagram`.
/// Root nodes are derived at build time: every node that ended up outside
/// all containers, in declaration order.
#[derive(Debug)]
pub struct DiagramBuilder {
    direction: String,
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    subgraphs: IndexMap<String, Subgraph>,
    top_level: Vec<String>,
    issues: Vec<ValidationIssue>,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramBuilder {
    /// Create a new empty builder with a top-down direction.
    pub fn new() -> Self {
        Self {
            direction: "TD".to_string(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            subgraphs: IndexMap::new(),
            top_level: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn direction(&mut self, direction: impl Into<String>) -> &mut Self {
        self.direction = direction.into();
        self
    }

    /// Add a rectangle node.
    pub fn add_node(&mut self, id: impl Into<String>, label: impl Into<String>) -> &mut Self {
        self.add_shaped_node(id, label, NodeShape::Rectangle)
    }

    pub fn add_shaped_node(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        shape: NodeShape,
    ) -> &mut Self {
        let node = Node::new(id, label).with_shape(shape);
        if self.nodes.contains_key(&node.id) {
            self.issues.push(ValidationIssue::DuplicateId {
                what: "node",
                id: node.id,
            });
        } else {
            self.nodes.insert(node.id.clone(), node);
        }
        self
    }

    /// Add an unlabeled edge (multiplier one).
    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.edges.push(Edge::new(source, target));
        self
    }

    pub fn add_labeled_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> &mut Self {
        self.edges.push(Edge::new(source, target).with_label(label));
        self
    }

    /// Add a top-level container.
    pub fn add_subgraph(&mut self, id: impl Into<String>, title: impl Into<String>) -> &mut Self {
        let subgraph = Subgraph::new(id, title);
        let id = subgraph.id.clone();
        if self.insert_subgraph(subgraph) {
            self.top_level.push(id);
        }
        self
    }

    /// Add a container nested inside `parent`.
    ///
    /// The parent must already exist; otherwise the reference is recorded as
    /// an issue and reported by `build()`.
    pub fn add_nested_subgraph(
        &mut self,
        parent: &str,
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> &mut Self {
        let mut subgraph = Subgraph::new(id, title);
        let Some(parent_sub) = self.subgraphs.get_mut(parent) else {
            self.issues.push(ValidationIssue::UnknownContainer {
                id: parent.to_string(),
            });
            return self;
        };
        parent_sub.children.push(subgraph.id.clone());
        subgraph.parent_id = Some(parent.to_string());
        self.insert_subgraph(subgraph);
        self
    }

    /// Place an existing or future node inside `container`.
    pub fn add_member(&mut self, container: &str, node_id: impl Into<String>) -> &mut Self {
        match self.subgraphs.get_mut(container) {
            Some(subgraph) => subgraph.node_ids.push(node_id.into()),
            None => self.issues.push(ValidationIssue::UnknownContainer {
                id: container.to_string(),
            }),
        }
        self
    }

    /// Append `child` to `parent`'s children without touching `child.parent_id`.
    ///
    /// Lets callers express diagrams whose container graph is not a tree,
    /// which resolution reports as a cycle.
    pub fn link_child(&mut self, parent: &str, child: impl Into<String>) -> &mut Self {
        match self.subgraphs.get_mut(parent) {
            Some(subgraph) => subgraph.children.push(child.into()),
            None => self.issues.push(ValidationIssue::UnknownContainer {
                id: parent.to_string(),
            }),
        }
        self
    }

    /// Assemble the diagram without running validation.
    ///
    /// Builder-time issues (duplicate ids, unknown containers) are dropped.
    pub fn build_unchecked(self) -> ParsedDiagram {
        self.assemble().0
    }

    /// Assemble and validate the diagram.
    pub fn build(self) -> ModelResult<ParsedDiagram> {
        let (diagram, mut issues) = self.assemble();
        issues.extend(validate::find_issues(&diagram));
        if issues.is_empty() {
            Ok(diagram)
        } else {
            Err(ModelError::Structural { issues })
        }
    }

    fn insert_subgraph(&mut self, subgraph: Subgraph) -> bool {
        if self.subgraphs.contains_key(&subgraph.id) {
            self.issues.push(ValidationIssue::DuplicateId {
                what: "container",
                id: subgraph.id,
            });
            return false;
        }
        self.subgraphs.insert(subgraph.id.clone(), subgraph);
        true
    }

    fn assemble(self) -> (ParsedDiagram, Vec<ValidationIssue>) {
        let root_node_ids = self
            .nodes
            .keys()
            .filter(|id| {
                !self
                    .subgraphs
                    .values()
                    .any(|sub| sub.node_ids.iter().any(|member| member == *id))
            })
            .cloned()
            .collect();

        let diagram = ParsedDiagram {
            direction: self.direction,
            nodes: self.nodes,
            edges: self.edges,
            subgraphs: self.subgraphs,
            top_level: self.top_level,
            root_node_ids,
        };
        (diagram, self.issues)
    }
}

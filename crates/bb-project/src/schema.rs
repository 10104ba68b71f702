//! Diagram document schema.
//!
//! The on-disk form of a parsed diagram: nodes, edges and a nested container
//! tree, as produced by the Mermaid front end. Compiles into a
//! `ParsedDiagram` through the model builder.

use std::collections::HashSet;

use bb_model::{DiagramBuilder, ModelResult, NodeShape, ParsedDiagram};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagramDoc {
    #[serde(default = "default_direction")]
    pub direction: String,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    #[serde(default)]
    pub subgraphs: Vec<SubgraphDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    /// Defaults to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub shape: NodeShape,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubgraphDef {
    pub id: String,
    /// Defaults to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Ids of member nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subgraphs: Vec<SubgraphDef>,
}

fn default_direction() -> String {
    "TD".to_string()
}

impl DiagramDoc {
    /// Compile into a validated diagram.
    pub fn to_diagram(&self) -> ModelResult<ParsedDiagram> {
        self.builder().build()
    }

    /// Compile without validation, keeping any broken references.
    pub fn to_diagram_unchecked(&self) -> ParsedDiagram {
        self.builder().build_unchecked()
    }

    fn builder(&self) -> DiagramBuilder {
        let mut builder = DiagramBuilder::new();
        builder.direction(self.direction.clone());
        for node in &self.nodes {
            let label = node.label.clone().unwrap_or_else(|| node.id.clone());
            builder.add_shaped_node(node.id.clone(), label, node.shape);
        }
        for subgraph in &self.subgraphs {
            builder.add_subgraph(subgraph.id.clone(), subgraph.display_title());
            add_contents(&mut builder, subgraph);
        }
        for edge in &self.edges {
            match &edge.label {
                Some(label) => builder.add_labeled_edge(edge.from.clone(), edge.to.clone(), label.clone()),
                None => builder.add_edge(edge.from.clone(), edge.to.clone()),
            };
        }
        builder
    }

    /// Describe an in-memory diagram as a document.
    ///
    /// Only containers reachable from the top level through `children` are
    /// written; a container met twice is written once.
    pub fn from_diagram(diagram: &ParsedDiagram) -> Self {
        let nodes = diagram
            .nodes
            .values()
            .map(|node| NodeDef {
                id: node.id.clone(),
                label: (node.label != node.id).then(|| node.label.clone()),
                shape: node.shape,
            })
            .collect();
        let edges = diagram
            .edges
            .iter()
            .map(|edge| EdgeDef {
                from: edge.source_id.clone(),
                to: edge.target_id.clone(),
                label: edge.label.clone(),
            })
            .collect();

        let mut seen = HashSet::new();
        let subgraphs = diagram
            .top_level
            .iter()
            .filter_map(|id| subgraph_def(diagram, id, &mut seen))
            .collect();

        let skipped = diagram.subgraphs.len().saturating_sub(seen.len());
        if skipped > 0 {
            warn!(skipped, "containers outside the top-level tree were not written");
        }

        Self {
            direction: diagram.direction.clone(),
            nodes,
            edges,
            subgraphs,
        }
    }
}

impl SubgraphDef {
    fn display_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.id.clone())
    }
}

fn add_contents(builder: &mut DiagramBuilder, subgraph: &SubgraphDef) {
    for node in &subgraph.nodes {
        builder.add_member(&subgraph.id, node.clone());
    }
    for child in &subgraph.subgraphs {
        builder.add_nested_subgraph(&subgraph.id, child.id.clone(), child.display_title());
        add_contents(builder, child);
    }
}

fn subgraph_def<'a>(
    diagram: &'a ParsedDiagram,
    id: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Option<SubgraphDef> {
    let subgraph = diagram.get_subgraph(id)?;
    if !seen.insert(id) {
        return None;
    }
    let subgraphs = subgraph
        .children
        .iter()
        .filter_map(|child| subgraph_def(diagram, child, seen))
        .collect();
    Some(SubgraphDef {
        id: subgraph.id.clone(),
        title: (subgraph.title != subgraph.id).then(|| subgraph.title.clone()),
        nodes: subgraph.node_ids.clone(),
        subgraphs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_labels_and_titles() {
        let doc = DiagramDoc {
            direction: "LR".into(),
            nodes: vec![NodeDef {
                id: "bolt".into(),
                label: None,
                shape: NodeShape::Circle,
            }],
            edges: vec![],
            subgraphs: vec![SubgraphDef {
                id: "kit".into(),
                title: None,
                nodes: vec!["bolt".into()],
                subgraphs: vec![],
            }],
        };

        let diagram = doc.to_diagram().unwrap();
        assert_eq!(diagram.direction, "LR");
        assert_eq!(diagram.get_node("bolt").unwrap().label, "bolt");
        assert_eq!(diagram.get_subgraph("kit").unwrap().title, "kit");
        assert!(diagram.root_node_ids.is_empty());
    }

    #[test]
    fn nested_subgraphs_compile_to_arena() {
        let doc = DiagramDoc {
            direction: default_direction(),
            nodes: vec![],
            edges: vec![],
            subgraphs: vec![SubgraphDef {
                id: "outer".into(),
                title: Some("Outer".into()),
                nodes: vec![],
                subgraphs: vec![SubgraphDef {
                    id: "inner".into(),
                    title: Some("Inner".into()),
                    nodes: vec![],
                    subgraphs: vec![],
                }],
            }],
        };

        let diagram = doc.to_diagram().unwrap();
        assert_eq!(diagram.top_level, vec!["outer".to_string()]);
        assert_eq!(
            diagram.get_subgraph("inner").unwrap().parent_id.as_deref(),
            Some("outer")
        );
        assert_eq!(DiagramDoc::from_diagram(&diagram), doc);
    }

    #[test]
    fn unknown_member_is_reported() {
        let doc = DiagramDoc {
            direction: default_direction(),
            nodes: vec![],
            edges: vec![],
            subgraphs: vec![SubgraphDef {
                id: "kit".into(),
                title: None,
                nodes: vec!["ghost".into()],
                subgraphs: vec![],
            }],
        };
        let err = doc.to_diagram().unwrap_err();
        assert_eq!(err.issues()[0].id(), "ghost");
    }
}

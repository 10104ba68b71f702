//! Reference validation for parsed diagrams.
//!
//! Runs before any traversal and reports every problem at once, so a caller
//! can show one complete diagnostic instead of fixing issues one by one.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::diagram::ParsedDiagram;
use crate::error::{ModelError, ModelResult};

/// A single dangling or inconsistent reference.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("edge #{edge} source '{id}' does not exist")]
    DanglingEdgeSource { edge: usize, id: String },

    #[error("edge #{edge} target '{id}' does not exist")]
    DanglingEdgeTarget { edge: usize, id: String },

    #[error("container '{container}' lists unknown node '{id}'")]
    DanglingMember { container: String, id: String },

    #[error("container '{container}' lists unknown child container '{id}'")]
    DanglingChild { container: String, id: String },

    #[error("container '{container}' names unknown parent '{id}'")]
    DanglingParent { container: String, id: String },

    #[error("root node '{id}' does not exist")]
    DanglingRootNode { id: String },

    #[error("root node '{id}' is a member of container '{container}'")]
    RootNodeContained { id: String, container: String },

    #[error("top-level container '{id}' does not exist")]
    DanglingTopLevel { id: String },

    #[error("node keyed '{key}' carries id '{id}'")]
    KeyMismatch { key: String, id: String },

    #[error("'{id}' names both a node and a container")]
    AmbiguousId { id: String },

    #[error("duplicate {what} id '{id}'")]
    DuplicateId { what: &'static str, id: String },

    #[error("node '{id}' is a member of both '{first}' and '{second}'")]
    DuplicateMembership {
        id: String,
        first: String,
        second: String,
    },

    #[error("container '{id}' is a child of both '{first}' and '{second}'")]
    DuplicateChild {
        id: String,
        first: String,
        second: String,
    },

    #[error("container '{id}' names parent '{parent}', which does not list it as a child")]
    ParentMismatch { id: String, parent: String },

    #[error("unknown container '{id}' referenced while building")]
    UnknownContainer { id: String },
}

impl ValidationIssue {
    /// The offending id.
    pub fn id(&self) -> &str {
        match self {
            ValidationIssue::DanglingEdgeSource { id, .. }
            | ValidationIssue::DanglingEdgeTarget { id, .. }
            | ValidationIssue::DanglingMember { id, .. }
            | ValidationIssue::DanglingChild { id, .. }
            | ValidationIssue::DanglingParent { id, .. }
            | ValidationIssue::DanglingRootNode { id }
            | ValidationIssue::RootNodeContained { id, .. }
            | ValidationIssue::DanglingTopLevel { id }
            | ValidationIssue::KeyMismatch { id, .. }
            | ValidationIssue::AmbiguousId { id }
            | ValidationIssue::DuplicateId { id, .. }
            | ValidationIssue::DuplicateMembership { id, .. }
            | ValidationIssue::DuplicateChild { id, .. }
            | ValidationIssue::ParentMismatch { id, .. }
            | ValidationIssue::UnknownContainer { id } => id,
        }
    }
}

/// Collect every reference problem in the diagram, in a stable order.
pub fn find_issues(diagram: &ParsedDiagram) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let exists = |id: &str| {
        diagram.nodes.contains_key(id) || diagram.subgraphs.contains_key(id)
    };

    for (key, node) in &diagram.nodes {
        if *key != node.id {
            issues.push(ValidationIssue::KeyMismatch {
                key: key.clone(),
                id: node.id.clone(),
            });
        }
        if diagram.subgraphs.contains_key(key) {
            issues.push(ValidationIssue::AmbiguousId { id: key.clone() });
        }
    }
    for (key, subgraph) in &diagram.subgraphs {
        if *key != subgraph.id {
            issues.push(ValidationIssue::KeyMismatch {
                key: key.clone(),
                id: subgraph.id.clone(),
            });
        }
    }

    for (i, edge) in diagram.edges.iter().enumerate() {
        if !exists(&edge.source_id) {
            issues.push(ValidationIssue::DanglingEdgeSource {
                edge: i,
                id: edge.source_id.clone(),
            });
        }
        if !exists(&edge.target_id) {
            issues.push(ValidationIssue::DanglingEdgeTarget {
                edge: i,
                id: edge.target_id.clone(),
            });
        }
    }

    for id in &diagram.root_node_ids {
        if !diagram.nodes.contains_key(id) {
            issues.push(ValidationIssue::DanglingRootNode { id: id.clone() });
        }
    }
    for id in &diagram.top_level {
        if !diagram.subgraphs.contains_key(id) {
            issues.push(ValidationIssue::DanglingTopLevel { id: id.clone() });
        }
    }

    // Membership: a node in at most one container, a container in at most one parent.
    let mut member_of: HashMap<&str, &str> = HashMap::new();
    let mut child_of: HashMap<&str, &str> = HashMap::new();
    for subgraph in diagram.subgraphs.values() {
        for id in &subgraph.node_ids {
            if !diagram.nodes.contains_key(id) {
                issues.push(ValidationIssue::DanglingMember {
                    container: subgraph.id.clone(),
                    id: id.clone(),
                });
                continue;
            }
            if let Some(first) = member_of.insert(id, &subgraph.id) {
                issues.push(ValidationIssue::DuplicateMembership {
                    id: id.clone(),
                    first: first.to_string(),
                    second: subgraph.id.clone(),
                });
            }
        }

        for id in &subgraph.children {
            if !diagram.subgraphs.contains_key(id) {
                issues.push(ValidationIssue::DanglingChild {
                    container: subgraph.id.clone(),
                    id: id.clone(),
                });
                continue;
            }
            if let Some(first) = child_of.insert(id, &subgraph.id) {
                issues.push(ValidationIssue::DuplicateChild {
                    id: id.clone(),
                    first: first.to_string(),
                    second: subgraph.id.clone(),
                });
            }
        }

        // A container without a parent_id may still be listed as a child.
        if let Some(parent) = &subgraph.parent_id {
            match diagram.subgraphs.get(parent) {
                None => issues.push(ValidationIssue::DanglingParent {
                    container: subgraph.id.clone(),
                    id: parent.clone(),
                }),
                Some(listed_by) if !listed_by.children.contains(&subgraph.id) => {
                    issues.push(ValidationIssue::ParentMismatch {
                        id: subgraph.id.clone(),
                        parent: parent.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    for id in &diagram.root_node_ids {
        if let Some(container) = member_of.get(id.as_str()) {
            issues.push(ValidationIssue::RootNodeContained {
                id: id.clone(),
                container: container.to_string(),
            });
        }
    }

    let mut seen_root = HashSet::new();
    for id in &diagram.root_node_ids {
        if !seen_root.insert(id.as_str()) {
            issues.push(ValidationIssue::DuplicateId {
                what: "root node",
                id: id.clone(),
            });
        }
    }
    let mut seen_top = HashSet::new();
    for id in &diagram.top_level {
        if !seen_top.insert(id.as_str()) {
            issues.push(ValidationIssue::DuplicateId {
                what: "top-level container",
                id: id.clone(),
            });
        }
    }

    issues
}

/// Fail with every reference problem found, or succeed when there are none.
pub fn validate_diagram(diagram: &ParsedDiagram) -> ModelResult<()> {
    let issues = find_issues(diagram);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ModelError::Structural { issues })
    }
}

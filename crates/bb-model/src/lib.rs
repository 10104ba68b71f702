//! bb-model: structural model for blockbom.
//!
//! Provides:
//! - Diagram data structures (Node, Edge, Subgraph, ParsedDiagram)
//! - Incremental diagram builder with validation
//! - Reference validation reporting every issue at once
//! - Compact element indexing for traversal
//! - Part metadata records joined in during resolution
//!
//! # Example
//!
//! ```
//! use bb_model::DiagramBuilder;
//!
//! let mut builder = DiagramBuilder::new();
//! builder
//!     .add_node("R", "Robot")
//!     .add_node("Bolt", "M3 bolt")
//!     .add_subgraph("Arm", "Arm assembly")
//!     .add_member("Arm", "Bolt")
//!     .add_labeled_edge("R", "Arm", "x2");
//! let diagram = builder.build().unwrap();
//!
//! assert_eq!(diagram.root_node_ids, vec!["R".to_string()]);
//! assert_eq!(diagram.top_level_entry_points().len(), 2);
//! ```

pub mod builder;
pub mod diagram;
pub mod error;
pub mod ids;
pub mod indexing;
pub mod metadata;
pub mod validate;

// Re-exports for ergonomics
pub use builder::DiagramBuilder;
pub use diagram::{Edge, ElementRef, Node, NodeShape, ParsedDiagram, Subgraph};
pub use error::{ModelError, ModelResult};
pub use ids::ElementId;
pub use indexing::{ElementIndex, ElementKind};
pub use metadata::{MetadataTable, PartMetadata};
pub use validate::{ValidationIssue, find_issues, validate_diagram};

//! Loading inputs and producing BOMs.

use std::path::Path;

use bb_model::{ElementIndex, MetadataTable, ParsedDiagram, validate_diagram};
use bb_resolve::{Bom, resolve};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// A validated diagram with the metadata to enrich it.
#[derive(Debug, Clone)]
pub struct BomInputs {
    pub diagram: ParsedDiagram,
    pub metadata: MetadataTable,
}

/// Shape of a diagram, for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramSummary {
    pub direction: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub container_count: usize,
    /// Ids of the elements a BOM starts from, in walk order.
    pub entry_points: Vec<String>,
}

/// Load a diagram and, when given, a metadata file.
///
/// A missing metadata path means an empty table.
pub fn load_inputs(diagram_path: &Path, metadata_path: Option<&Path>) -> AppResult<BomInputs> {
    let diagram = bb_project::load_diagram(diagram_path).map_err(|source| AppError::DiagramLoad {
        path: diagram_path.to_path_buf(),
        source,
    })?;

    let metadata = match metadata_path {
        Some(path) => {
            bb_project::load_metadata_yaml(path).map_err(|source| AppError::MetadataLoad {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => MetadataTable::new(),
    };

    Ok(BomInputs { diagram, metadata })
}

/// Resolve the inputs and report warnings through tracing.
pub fn build_bom(inputs: &BomInputs) -> AppResult<Bom> {
    let bom = resolve(&inputs.diagram, &inputs.metadata)?;
    for warning in &bom.warnings {
        warn!("{warning}");
    }
    info!(
        lines = bom.len(),
        grand_total = bom.grand_total,
        "bill of materials resolved"
    );
    Ok(bom)
}

/// Count the diagram's parts and list its entry points.
///
/// Only validates structure; cycles are found when a BOM is built.
pub fn check_diagram(diagram: &ParsedDiagram) -> AppResult<DiagramSummary> {
    validate_diagram(diagram)?;
    let index = ElementIndex::from_diagram(diagram)?;
    let entry_points = index
        .entry_points(diagram)
        .into_iter()
        .map(|id| index.key(id).to_string())
        .collect();

    Ok(DiagramSummary {
        direction: diagram.direction.clone(),
        node_count: diagram.nodes.len(),
        edge_count: diagram.edges.len(),
        container_count: diagram.subgraphs.len(),
        entry_points,
    })
}

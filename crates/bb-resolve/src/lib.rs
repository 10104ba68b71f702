//! Bill-of-materials resolution for assembly diagrams.
//!
//! This crate turns a validated `ParsedDiagram` plus optional part metadata
//! into a flattened, leveled BOM. Resolution runs in three stages:
//!
//! 1. [`resolver`] walks the diagram depth-first and emits one occurrence per
//!    path, multiplying edge quantities along the way ([`guard`] stops cycles).
//! 2. [`merge`] joins each occurrence with its metadata by id, then label.
//! 3. [`aggregate`] groups occurrences by `(id, level)` into BOM lines and
//!    totals the known costs.
//!
//! Each run is a pure function of its inputs.

pub mod aggregate;
pub mod error;
pub mod guard;
pub mod merge;
pub mod occurrence;
pub mod quantity;
pub mod resolver;
pub mod warning;

pub use aggregate::{Bom, BomItem, aggregate};
pub use error::{BomError, BomResult};
pub use merge::{MergedOccurrence, merge_metadata, unmatched_metadata};
pub use occurrence::Occurrence;
pub use quantity::{Multiplier, parse_multiplier};
pub use resolver::{Resolution, resolve_occurrences};
pub use warning::BomWarning;

use bb_model::{MetadataTable, ParsedDiagram};
use tracing::debug;

/// Resolve `diagram` into an ordered BOM enriched with `metadata`.
///
/// Structural problems and cycles abort the run; metadata mismatches and
/// unreadable edge labels come back as warnings on the returned BOM.
pub fn resolve(diagram: &ParsedDiagram, metadata: &MetadataTable) -> BomResult<Bom> {
    let Resolution {
        occurrences,
        mut warnings,
    } = resolve_occurrences(diagram)?;

    let merged = merge_metadata(diagram, &occurrences, metadata);
    warnings.extend(unmatched_metadata(diagram, metadata));

    let bom = aggregate(&merged, warnings)?;
    debug!(
        occurrences = occurrences.len(),
        lines = bom.len(),
        grand_total = bom.grand_total,
        unknown_cost = bom.unknown_cost.len(),
        "resolved bom"
    );
    Ok(bom)
}

//! Non-fatal findings returned alongside a complete BOM.

use core::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BomWarning {
    /// A metadata entry whose key matches no id or label in the diagram.
    MetadataMismatch { key: String },

    /// An edge label that carried no usable count; the edge counted as one.
    QuantityLabel {
        edge: usize,
        source_id: String,
        target_id: String,
        label: String,
    },
}

impl fmt::Display for BomWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BomWarning::MetadataMismatch { key } => {
                write!(f, "Metadata entry '{}' matches no node id or label", key)
            }
            BomWarning::QuantityLabel {
                edge,
                source_id,
                target_id,
                label,
            } => write!(
                f,
                "Edge #{} ({} -> {}) label '{}' has no quantity; using 1",
                edge, source_id, target_id, label
            ),
        }
    }
}

//! Part metadata files.
//!
//! A metadata file is a YAML mapping from node id or label to an optional
//! record:
//!
//! ```yaml
//! Bolt:
//!   part_number: B-100
//!   cost: 0.10
//! "Drive motor":
//!   link: https://example.com/motor
//! Spacer:            # present but empty
//! ```

use bb_model::{MetadataTable, PartMetadata};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ProjectError, ProjectResult};

/// Raw file contents before checking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MetadataFile {
    pub entries: IndexMap<String, Option<PartMetadata>>,
}

impl MetadataFile {
    /// Check every entry and build the lookup table.
    ///
    /// Empty entries become records with no fields. Costs must be finite and
    /// non-negative.
    pub fn into_table(self) -> ProjectResult<MetadataTable> {
        let mut table = MetadataTable::new();
        for (key, entry) in self.entries {
            let metadata = entry.unwrap_or_default();
            if let Some(cost) = metadata.cost {
                check_cost(&key, cost)?;
            }
            table.insert(key, metadata);
        }
        Ok(table)
    }
}

impl From<&MetadataTable> for MetadataFile {
    fn from(table: &MetadataTable) -> Self {
        let entries = table
            .iter()
            .map(|(key, metadata)| (key.to_string(), Some(metadata.clone())))
            .collect();
        Self { entries }
    }
}

fn check_cost(key: &str, cost: f64) -> ProjectResult<()> {
    if !cost.is_finite() {
        return Err(ProjectError::InvalidMetadata {
            key: key.to_string(),
            reason: format!("cost {cost} is not a finite number"),
        });
    }
    if cost < 0.0 {
        return Err(ProjectError::InvalidMetadata {
            key: key.to_string(),
            reason: format!("cost {cost} is negative"),
        });
    }
    Ok(())
}

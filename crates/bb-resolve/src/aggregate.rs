//! Aggregation of merged occurrences into BOM lines.

use bb_model::NodeShape;
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{BomError, BomResult};
use crate::merge::MergedOccurrence;
use crate::warning::BomWarning;

/// One aggregated output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomItem {
    /// Id of the node or container this line groups.
    pub id: String,
    pub level: usize,
    /// Summed path quantities of every occurrence in the group.
    pub quantity: u64,
    pub description: String,
    pub part_number: String,
    pub purchase_link: String,
    /// Unit cost; `None` when unknown.
    pub cost: Option<f64>,
    /// Node shape, `None` for assemblies.
    pub shape: Option<NodeShape>,
}

impl BomItem {
    /// `quantity * cost`, when the unit cost is known.
    pub fn subtotal(&self) -> Option<f64> {
        self.cost.map(|cost| self.quantity as f64 * cost)
    }

    pub fn is_assembly(&self) -> bool {
        self.shape.is_none()
    }
}

/// The resolved bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bom {
    pub items: Vec<BomItem>,
    /// Sum of the known line subtotals.
    pub grand_total: f64,
    /// Indices into `items` of lines whose cost is unknown; excluded from the total.
    pub unknown_cost: Vec<usize>,
    pub warnings: Vec<BomWarning>,
}

impl Bom {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Lines whose cost is unknown.
    pub fn unknown_cost_items(&self) -> impl Iterator<Item = &BomItem> {
        self.unknown_cost.iter().map(|&i| &self.items[i])
    }
}

/// Group occurrences by `(id, level)` in first-seen order and sum quantities.
///
/// The same part at two levels stays two lines. Fails only if a summed
/// quantity overflows.
pub fn aggregate(merged: &[MergedOccurrence<'_>], warnings: Vec<BomWarning>) -> BomResult<Bom> {
    let mut groups: IndexMap<(&str, usize), BomItem> = IndexMap::new();

    for m in merged {
        let key = (m.occurrence.id, m.occurrence.level);
        if let Some(item) = groups.get_mut(&key) {
            item.quantity = item
                .quantity
                .checked_add(m.occurrence.quantity)
                .ok_or_else(|| BomError::QuantityOverflow {
                    id: item.id.clone(),
                    path: vec![item.id.clone()],
                })?;
            continue;
        }
        groups.insert(
            key,
            BomItem {
                id: m.occurrence.id.to_string(),
                level: m.occurrence.level,
                quantity: m.occurrence.quantity,
                description: m.description.to_string(),
                part_number: m.part_number.unwrap_or_default().to_string(),
                purchase_link: m.link.unwrap_or_default().to_string(),
                cost: m.cost,
                shape: m.shape,
            },
        );
    }

    let items: Vec<BomItem> = groups.into_values().collect();
    let grand_total: f64 = items.iter().filter_map(BomItem::subtotal).sum();
    let unknown_cost: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.cost.is_none())
        .map(|(i, _)| i)
        .collect();

    Ok(Bom {
        items,
        grand_total,
        unknown_cost,
        warnings,
    })
}

//! Text renderings of a resolved BOM.

use std::fmt;
use std::str::FromStr;

use bb_resolve::{Bom, BomItem};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Table, OutputFormat::Csv, OutputFormat::Json];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown output format '{s}' (expected table, csv or json)"))
    }
}

pub fn render(bom: &Bom, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Table => Ok(render_table(bom)),
        OutputFormat::Csv => render_csv(bom),
        OutputFormat::Json => render_json(bom),
    }
}

const HEADERS: [&str; 6] = ["Level", "Item", "Qty", "Part Number", "Unit Cost", "Subtotal"];

fn money(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn table_row(item: &BomItem) -> [String; 6] {
    [
        item.level.to_string(),
        format!("{}{}", "  ".repeat(item.level), item.description),
        item.quantity.to_string(),
        item.part_number.clone(),
        money(item.cost),
        money(item.subtotal()),
    ]
}

/// Fixed-width table, items indented by level, with a grand total footer.
pub fn render_table(bom: &Bom) -> String {
    let rows: Vec<[String; 6]> = bom.items.iter().map(table_row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        write_row(&mut out, row, &widths);
    }

    out.push_str(&format!("\nGrand total: {:.2}\n", bom.grand_total));
    if !bom.unknown_cost.is_empty() {
        let names: Vec<&str> = bom
            .unknown_cost_items()
            .map(|item| item.description.as_str())
            .collect();
        out.push_str(&format!(
            "{} line(s) with unknown cost excluded: {}\n",
            names.len(),
            names.join(", ")
        ));
    }
    out
}

// Numeric columns are right-aligned.
fn write_row(out: &mut String, row: &[String; 6], widths: &[usize; 6]) {
    let cells: Vec<String> = row
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (cell, &width))| {
            let pad = width.saturating_sub(cell.chars().count());
            match col {
                0 | 2 | 4 | 5 => format!("{}{cell}", " ".repeat(pad)),
                _ => format!("{cell}{}", " ".repeat(pad)),
            }
        })
        .collect();
    out.push_str(cells.join(" | ").trim_end());
    out.push('\n');
}

/// One CSV record per line; unknown costs are empty fields.
pub fn render_csv(bom: &Bom) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "level",
        "id",
        "description",
        "quantity",
        "part_number",
        "purchase_link",
        "unit_cost",
        "subtotal",
    ])?;
    for item in &bom.items {
        writer.write_record([
            item.level.to_string(),
            item.id.clone(),
            item.description.clone(),
            item.quantity.to_string(),
            item.part_number.clone(),
            item.purchase_link.clone(),
            item.cost.map(|c| c.to_string()).unwrap_or_default(),
            item.subtotal().map(|s| s.to_string()).unwrap_or_default(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Render(e.to_string()))
}

pub fn render_json(bom: &Bom) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(bom)?)
}

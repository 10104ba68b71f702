//! Shared application service layer for the BOM tools.
//!
//! Loads diagrams and metadata from disk, runs resolution and renders the
//! result, so front ends only deal with arguments and output.

pub mod bom_service;
pub mod error;
pub mod render;

pub use bom_service::{BomInputs, DiagramSummary, build_bom, check_diagram, load_inputs};
pub use error::{AppError, AppResult};
pub use render::{OutputFormat, render, render_csv, render_json, render_table};

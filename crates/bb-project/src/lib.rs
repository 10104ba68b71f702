//! bb-project: diagram and part metadata files.

pub mod metadata;
pub mod schema;

pub use metadata::MetadataFile;
pub use schema::{DiagramDoc, EdgeDef, NodeDef, SubgraphDef};

use std::path::Path;

use bb_model::{MetadataTable, ModelError, ParsedDiagram, validate_diagram};
use tracing::debug;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ModelError),

    #[error("Invalid metadata for '{key}': {reason}")]
    InvalidMetadata { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a diagram document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }
}

pub fn parse_diagram_yaml(content: &str) -> ProjectResult<ParsedDiagram> {
    let doc: DiagramDoc = serde_yaml::from_str(content)?;
    Ok(doc.to_diagram()?)
}

pub fn parse_diagram_json(content: &str) -> ProjectResult<ParsedDiagram> {
    let doc: DiagramDoc = serde_json::from_str(content)?;
    Ok(doc.to_diagram()?)
}

/// Load and validate a diagram, picking the decoder from the file extension.
pub fn load_diagram(path: &Path) -> ProjectResult<ParsedDiagram> {
    let content = std::fs::read_to_string(path)?;
    let format = FileFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading diagram");
    match format {
        FileFormat::Json => parse_diagram_json(&content),
        FileFormat::Yaml => parse_diagram_yaml(&content),
    }
}

pub fn save_diagram_yaml(path: &Path, diagram: &ParsedDiagram) -> ProjectResult<()> {
    validate_diagram(diagram)?;
    let content = serde_yaml::to_string(&DiagramDoc::from_diagram(diagram))?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn save_diagram_json(path: &Path, diagram: &ParsedDiagram) -> ProjectResult<()> {
    validate_diagram(diagram)?;
    let content = serde_json::to_string_pretty(&DiagramDoc::from_diagram(diagram))?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn parse_metadata_yaml(content: &str) -> ProjectResult<MetadataTable> {
    let file: MetadataFile = serde_yaml::from_str(content)?;
    file.into_table()
}

pub fn load_metadata_yaml(path: &Path) -> ProjectResult<MetadataTable> {
    let content = std::fs::read_to_string(path)?;
    let table = parse_metadata_yaml(&content)?;
    debug!(path = %path.display(), entries = table.len(), "loaded metadata");
    Ok(table)
}

pub fn save_metadata_yaml(path: &Path, metadata: &MetadataTable) -> ProjectResult<()> {
    let content = serde_yaml::to_string(&MetadataFile::from(metadata))?;
    std::fs::write(path, content)?;
    Ok(())
}

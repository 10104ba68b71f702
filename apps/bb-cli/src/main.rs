use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use bb_app::{AppError, AppResult, OutputFormat, bom_service, render};

#[derive(Parser)]
#[command(name = "bb-cli")]
#[command(about = "Bill of materials from assembly diagrams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a diagram file for structural problems
    Validate {
        /// Path to the diagram file (.yaml or .json)
        diagram_path: PathBuf,
    },
    /// Resolve a diagram into a bill of materials
    Bom {
        /// Path to the diagram file (.yaml or .json)
        diagram_path: PathBuf,
        /// Part metadata YAML file
        #[arg(short, long)]
        metadata: Option<PathBuf>,
        /// Output format: table, csv or json
        #[arg(short, long, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show counts and entry points of a diagram
    Summary {
        /// Path to the diagram file (.yaml or .json)
        diagram_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    // Diagnostics go to stderr so stdout stays clean for BOM output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { diagram_path } => cmd_validate(&diagram_path),
        Commands::Bom {
            diagram_path,
            metadata,
            format,
            output,
        } => cmd_bom(&diagram_path, metadata.as_deref(), format, output.as_deref()),
        Commands::Summary { diagram_path } => cmd_summary(&diagram_path),
    }
}

fn cmd_validate(diagram_path: &Path) -> AppResult<()> {
    println!("Validating diagram: {}", diagram_path.display());
    let inputs = bom_service::load_inputs(diagram_path, None)?;
    bom_service::check_diagram(&inputs.diagram)?;
    println!("✓ Diagram is valid");
    Ok(())
}

fn cmd_bom(
    diagram_path: &Path,
    metadata_path: Option<&Path>,
    format: OutputFormat,
    output: Option<&Path>,
) -> AppResult<()> {
    let inputs = bom_service::load_inputs(diagram_path, metadata_path)?;
    let bom = bom_service::build_bom(&inputs)?;
    let text = render(&bom, format)?;

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, text).map_err(|source| AppError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;
        eprintln!("✓ Wrote {} line(s) to {}", bom.len(), path.display());
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}

fn cmd_summary(diagram_path: &Path) -> AppResult<()> {
    let inputs = bom_service::load_inputs(diagram_path, None)?;
    let summary = bom_service::check_diagram(&inputs.diagram)?;

    println!("Diagram: {} ({})", diagram_path.display(), summary.direction);
    println!(
        "  {} nodes, {} edges, {} containers",
        summary.node_count, summary.edge_count, summary.container_count
    );
    if summary.entry_points.is_empty() {
        println!("No entry points; the BOM would be empty");
    } else {
        println!("Entry points:");
        for id in &summary.entry_points {
            let description = inputs
                .diagram
                .element(id)
                .map(|element| element.description())
                .unwrap_or(id.as_str());
            println!("  {id} - {description}");
        }
    }
    Ok(())
}

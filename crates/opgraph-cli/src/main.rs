//! opgraph CLI: build operator graphs from YAML and print what the backend gets.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use opgraph_core::config::GraphConfig;
use opgraph_core::workflow::Workflow;
use opgraph_core::{GraphContext, Operator};
use opgraph_planner::{build_graph, parse_yaml_graph, ParsedGraph};
use opgraph_types::{icon, TypeRegistry};

#[derive(Parser)]
#[command(name = "opgraph")]
#[command(about = "Typed geoprocessing operator graphs", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the query JSON for a graph
    Render {
        /// Path to the graph YAML file
        #[arg(short, long)]
        graph: PathBuf,

        /// Reproject the root to this projection (overrides config)
        #[arg(long)]
        projection: Option<String>,

        #[arg(long)]
        pretty: bool,
    },

    /// Check that a graph parses and builds
    Validate {
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// Show the built tree with ids, ports and parameters
    Explain {
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// Print the workflow registration body and its content hash
    Workflow {
        #[arg(short, long)]
        graph: PathBuf,

        #[arg(long)]
        projection: Option<String>,
    },

    /// List the known operator types
    Types,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            graph,
            projection,
            pretty,
        } => {
            let root = build_from_file(&graph, projection.as_deref())?;
            let json = if pretty {
                root.to_json_pretty()?
            } else {
                root.to_json()?
            };
            println!("{json}");
        }
        Commands::Validate { graph } => {
            let root = build_from_file(&graph, None)
                .with_context(|| format!("validation failed for {}", graph.display()))?;
            println!("✓ Graph is valid ({} operators)", root.walk().count());
        }
        Commands::Explain { graph } => {
            let root = build_from_file(&graph, None)?;
            print!("{}", explain(&root));
        }
        Commands::Workflow { graph, projection } => {
            let root = build_from_file(&graph, projection.as_deref())?;
            let workflow = Workflow::from_operator(&root);
            println!("{}", workflow.to_json()?);
            eprintln!("content hash: {}", workflow.content_hash()?);
        }
        Commands::Types => {
            for tag in TypeRegistry::with_defaults().tags() {
                println!("{tag:<28} {}", icon::icon_color(tag));
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_from_file(path: &Path, projection: Option<&str>) -> Result<Operator> {
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("reading graph file {}", path.display()))?;
    let parsed = load_graph(&yaml, projection)?;
    let ctx = GraphContext::from_config(GraphConfig::from_env())?;
    tracing::debug!(path = %path.display(), context = ?ctx, "building graph");
    Ok(build_graph(&parsed, &ctx)?)
}

/// Parse `yaml`, letting `projection` override the document's target.
fn load_graph(yaml: &str, projection: Option<&str>) -> Result<ParsedGraph> {
    let mut parsed = parse_yaml_graph(yaml)?;
    if let Some(p) = projection {
        parsed.config.projection = Some(p.to_string());
    }
    Ok(parsed)
}

fn explain(root: &Operator) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "opgraph {}", opgraph_core::VERSION);
    explain_node(root, None, 0, &mut out);
    out
}

fn explain_node(op: &Operator, port: Option<&str>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let via = port.map(|p| format!("{p} <- ")).unwrap_or_default();
    let _ = writeln!(
        out,
        "{indent}{via}{} {} [{}] {}",
        op.id(),
        op.name(),
        op.result_type(),
        op.projection()
    );
    for (key, value) in op.parameters().iter() {
        let _ = writeln!(out, "{indent}    {key} = {value}");
    }
    for (port_type, children) in op.ports() {
        let Ok(port_name) = port_type.port_name() else {
            continue;
        };
        for child in children {
            explain_node(child, Some(port_name), depth + 1, out);
        }
    }
}

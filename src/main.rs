use anyhow::Context;
use clap::{Parser, Subcommand};
use pzot_graph::config::{LayoutConfig, ValidatedLayout};
use pzot_graph::{DependencyGraph, HostDocument, Result, layout, model, telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "pzot-graph")]
#[command(about = "PZot dependency graph tools", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the graph of a PZot document as JSON.
    Inspect {
        #[arg(long)]
        doc: String,
    },

    /// Reparse the dependency formula and print it in canonical form.
    Format {
        #[arg(long)]
        doc: String,

        /// Print the whole document with the formula replaced.
        #[arg(long)]
        document: bool,
    },

    /// Compute the period timeline layout and write it as JSON.
    Layout {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        config: Option<String>,

        #[arg(short = 'o', long)]
        out: String,
    },
}

fn load(path: &str) -> Result<(HostDocument, DependencyGraph)> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read document {path}"))?;
    let doc = HostDocument::parse(&text).with_context(|| format!("split document {path}"))?;
    let graph = DependencyGraph::from_formula(doc.dependencies())
        .with_context(|| format!("parse dependency formula in {path}"))?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edges().len(),
        "loaded {path}"
    );
    Ok((doc, graph))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match cli.cmd {
        Commands::Inspect { doc } => {
            let (_, graph) = load(&doc)?;
            let view = model::build_graph_view(&graph);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Format { doc, document } => {
            let (source, graph) = load(&doc)?;
            let formula = graph.to_dependency_formula();
            if document {
                print!("{}", source.with_dependencies(formula));
            } else {
                println!("{formula}");
            }
        }
        Commands::Layout { doc, config, out } => {
            let (_, graph) = load(&doc)?;
            let config = match config {
                Some(path) => LayoutConfig::from_path(&path)?,
                None => LayoutConfig::default(),
            };
            let ValidatedLayout { grid, node_size } = config.validate_and_build()?;

            let placed = layout::timeline(&graph, &grid, node_size);
            let view = model::build_layout_view(&graph, &placed);
            std::fs::write(&out, serde_json::to_string_pretty(&view)?)
                .with_context(|| format!("write layout {out}"))?;
            println!("Wrote {}", out);
        }
    }

    Ok(())
}

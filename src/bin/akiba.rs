//! Pruned hub labeling from a given vertex order.

use anyhow::{ensure, Result};
use clap::Parser;
use std::path::PathBuf;

use hublab::akiba::Akiba;
use hublab::{order, Graph};

#[derive(Parser)]
#[command(name = "akiba", about = "Build the minimum hierarchical labeling for a vertex order")]
struct Cli {
    /// File with the vertex order
    #[arg(short = 'o', value_name = "FILE")]
    order: PathBuf,
    /// File to write the labeling
    #[arg(short = 'l', value_name = "FILE")]
    labels: Option<PathBuf>,
    /// Treat every parsed edge as bidirectional
    #[arg(long)]
    undirected: bool,
    /// Graph file (DIMACS or METIS, auto-detected)
    graph: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(1);
    });

    let g = Graph::read(&cli.graph, cli.undirected)?;
    println!("Graph has {} vertices and {} arcs", g.num_vertices(), g.num_arcs());

    let ord = order::read(&cli.order)?;
    ensure!(ord.len() == g.num_vertices(), "order is incompatible with graph");

    let labels = Akiba::new(&g).run(&ord);

    println!("Average label size {}", labels.avg());
    println!("Maximum label size {}", labels.max());

    if let Some(path) = &cli.labels {
        labels.write(path)?;
    }
    Ok(())
}

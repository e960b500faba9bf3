//! Order vertices by decreasing total degree.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use hublab::{order, Graph};

#[derive(Parser)]
#[command(name = "degree", about = "Write a vertex order sorted by decreasing degree")]
struct Cli {
    /// File to write the vertex order
    #[arg(short = 'o', value_name = "FILE")]
    order: PathBuf,
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

    let ord = order::by_degree(&g);
    order::write(&cli.order, &ord)?;
    Ok(())
}

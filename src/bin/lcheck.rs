//! Verify a labeling against Dijkstra ground truth.

use anyhow::{ensure, Result};
use clap::Parser;
use std::path::PathBuf;

use hublab::{check, Graph, Labeling};

#[derive(Parser)]
#[command(name = "lcheck", about = "Check hub labels and print their statistics")]
struct Cli {
    /// Check label correctness (without this, print statistics only)
    #[arg(short = 'c')]
    check: bool,
    /// File with the labeling
    #[arg(short = 'l', value_name = "FILE")]
    labels: PathBuf,
    /// Number of threads (defaults to all logical cores)
    #[arg(short = 't', value_name = "N")]
    threads: Option<usize>,
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
    if let Some(t) = cli.threads {
        ensure!(t > 0, "thread count must be positive");
        rayon::ThreadPoolBuilder::new().num_threads(t).build_global()?;
    }

    let g = Graph::read(&cli.graph, cli.undirected)?;
    println!("Graph has {} vertices and {} arcs", g.num_vertices(), g.num_arcs());

    let labels = Labeling::read(&cli.labels, g.num_vertices())?;

    if cli.check {
        if !check::check(&g, &labels) {
            println!("Bad Labels");
            std::process::exit(1);
        }
        println!("Labels OK");
    }

    println!("Average label size {}", labels.avg());
    println!("Maximum label size {}", labels.max());
    Ok(())
}

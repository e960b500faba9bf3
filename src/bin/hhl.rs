//! Greedy hierarchical hub labeling.

use anyhow::{ensure, Result};
use clap::Parser;
use std::path::PathBuf;

use hublab::hhl::{Greedy, HhlBuilder};
use hublab::uhhl::UhhlBuilder;
use hublab::{order, Graph};

#[derive(Parser)]
#[command(name = "hhl", about = "Build a hierarchical hub labeling with a greedy algorithm")]
struct Cli {
    /// Use the label-greedy strategy instead of path-greedy
    #[arg(short = 'w')]
    label_greedy: bool,
    /// Assume shortest paths are unique
    #[arg(short = 'u')]
    usp: bool,
    /// File to write the vertex order
    #[arg(short = 'o', value_name = "FILE")]
    order: Option<PathBuf>,
    /// File to write the labeling
    #[arg(short = 'l', value_name = "FILE")]
    labels: Option<PathBuf>,
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

    let greedy = if cli.label_greedy { Greedy::Label } else { Greedy::Path };
    let (order_vec, labels) = if cli.usp {
        UhhlBuilder::new(&g).run(greedy)
    } else {
        HhlBuilder::new(&g).run(greedy)
    };

    println!("Average label size {}", labels.avg());
    println!("Maximum label size {}", labels.max());

    if let Some(path) = &cli.labels {
        labels.write(path)?;
    }
    if let Some(path) = &cli.order {
        order::write(path, &order_vec)?;
    }
    Ok(())
}

//! Approximately p-norm-optimal hub labeling.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use hublab::ghl::GhlBuilder;
use hublab::Graph;

#[derive(Parser)]
#[command(name = "ghl", about = "Build p-norm-optimal hub labels with the GHLp algorithm")]
struct Cli {
    /// Label p-norm to approximate; 'max' approximates the maximum
    /// label size (p = ln n)
    #[arg(short = 'p', value_name = "NORM", default_value = "1.0")]
    norm: String,
    /// Staleness bound (>= 1.0) trading construction speed for
    /// labeling size
    #[arg(short = 'a', value_name = "ALPHA", default_value_t = 1.1)]
    alpha: f64,
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
    ensure!(cli.alpha >= 1.0, "alpha must be at least 1.0");
    if let Some(t) = cli.threads {
        ensure!(t > 0, "thread count must be positive");
        rayon::ThreadPoolBuilder::new().num_threads(t).build_global()?;
    }

    let g = Graph::read(&cli.graph, cli.undirected)?;
    println!("Graph has {} vertices and {} arcs", g.num_vertices(), g.num_arcs());

    let p = if cli.norm == "max" {
        (g.num_vertices() as f64).ln()
    } else {
        cli.norm.parse::<f64>().context("norm must be a number or 'max'")?
    };

    let labels = GhlBuilder::new(&g).run(cli.alpha, p);

    println!("Average label size {}", labels.avg());
    println!("Maximum label size {}", labels.max());

    if let Some(path) = &cli.labels {
        labels.write(path)?;
    }
    Ok(())
}

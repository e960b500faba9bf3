//! Vertex orders: text-file I/O and the degree heuristic.
//!
//! An order lists vertices from most to least important. The file
//! format is the count on the first line followed by one vertex id
//! per line.

use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::graph::{Graph, Vertex};

/// Write `order` to `path`.
pub fn write(path: &Path, order: &[Vertex]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("unable to create order file {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "{}", order.len())?;
    for &v in order {
        writeln!(w, "{}", v)?;
    }
    w.flush()?;
    Ok(())
}

/// Read an order written by [`write`].
pub fn read(path: &Path) -> Result<Vec<Vertex>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read order file {}", path.display()))?;
    let mut tok = text.split_ascii_whitespace();
    let n: usize = tok
        .next()
        .context("order file is empty")?
        .parse()
        .context("order file: bad length")?;
    let mut order = Vec::with_capacity(n);
    for _ in 0..n {
        let v: Vertex = tok
            .next()
            .context("order file truncated")?
            .parse()
            .context("order file: bad vertex id")?;
        order.push(v);
    }
    ensure!(tok.next().is_none(), "trailing data in order file");
    Ok(order)
}

/// Order vertices by decreasing total degree.
pub fn by_degree(g: &Graph) -> Vec<Vertex> {
    let mut d: Vec<(usize, Vertex)> =
        (0..g.num_vertices()).map(|v| (g.total_degree(v), v)).collect();
    d.sort();
    d.iter().rev().map(|&(_, v)| v).collect()
}

//! The label store: per vertex, a forward and a reverse list of
//! (hub, distance) entries, plus the query routine and text-file I/O.
//!
//! A query merges the forward list of `u` with the reverse list of
//! `v`; both must be sorted by hub id. Builders either append hubs in
//! increasing id order (the hierarchical builders use selection ranks
//! as hub ids, which arrive sorted) or call [`Labeling::sort`] once
//! after construction (GHL).

use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::graph::{Dir, Distance, Vertex, INFTY};

/// Hub labels for every vertex of an n-vertex graph.
pub struct Labeling {
    n: usize,
    /// labels[v][side]: side 0 = reverse, side 1 = forward.
    labels: Vec<[Vec<(Vertex, Distance)>; 2]>,
}

impl Labeling {
    pub fn new(n: usize) -> Labeling {
        Labeling { n, labels: vec![[Vec::new(), Vec::new()]; n] }
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// One side of `u`'s label.
    #[inline]
    pub fn label(&self, u: Vertex, dir: Dir) -> &[(Vertex, Distance)] {
        &self.labels[u][dir.idx()]
    }

    /// Append hub `(h, d)` to `u`'s label on side `dir`.
    #[inline]
    pub fn add(&mut self, u: Vertex, dir: Dir, h: Vertex, d: Distance) {
        self.labels[u][dir.idx()].push((h, d));
    }

    /// Shortest u-to-v distance according to the labels (`INFTY` if
    /// the labels share no hub). `dir` flips the roles of u and v.
    pub fn query(&self, u: Vertex, v: Vertex, dir: Dir) -> Distance {
        let lu = self.label(u, dir);
        let lv = self.label(v, dir.flip());
        let mut r = INFTY;
        let (mut i, mut j) = (0, 0);
        while i < lu.len() && j < lv.len() {
            let (hu, du) = lu[i];
            let (hv, dv) = lv[j];
            if hu == hv {
                assert!(du < INFTY - dv, "distance overflow in label query");
                r = r.min(du + dv);
                i += 1;
                j += 1;
            } else if hu < hv {
                i += 1;
            } else {
                j += 1;
            }
        }
        r
    }

    /// Sort every list by hub id (ties by distance); required before
    /// queries unless hubs were appended in increasing id order.
    pub fn sort(&mut self) {
        for label in &mut self.labels {
            for side in label {
                side.sort();
            }
        }
    }

    /// Average label size over both sides of all vertices.
    pub fn avg(&self) -> f64 {
        let total: usize = self.labels.iter().map(|l| l[0].len() + l[1].len()).sum();
        total as f64 / self.n as f64 / 2.0
    }

    /// Maximum label size over both sides of all vertices.
    pub fn max(&self) -> usize {
        self.labels
            .iter()
            .map(|l| l[0].len().max(l[1].len()))
            .max()
            .unwrap_or(0)
    }

    /// Drop all entries, keeping the vertex count.
    pub fn clear(&mut self) {
        for label in &mut self.labels {
            label[0].clear();
            label[1].clear();
        }
    }

    /// Write the labels as text: `n`, then per vertex and side a line
    /// `<len> h d h d ...` with hubs sorted by id.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("unable to create label file {}", path.display()))?;
        let mut w = BufWriter::new(file);
        writeln!(w, "{}", self.n)?;
        for label in &self.labels {
            for side in label {
                write!(w, "{}", side.len())?;
                for &(h, d) in side {
                    write!(w, " {} {}", h, d)?;
                }
                writeln!(w)?;
            }
        }
        w.flush()?;
        Ok(())
    }

    /// Read labels written by [`Labeling::write`]. `check_n`, if
    /// non-zero, must match the stored vertex count.
    pub fn read(path: &Path, check_n: usize) -> Result<Labeling> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read label file {}", path.display()))?;
        let mut tok = text.split_ascii_whitespace();
        let mut next = |what: &str| -> Result<usize> {
            tok.next()
                .with_context(|| format!("label file truncated: missing {}", what))?
                .parse::<usize>()
                .with_context(|| format!("label file: bad {}", what))
        };
        let n = next("vertex count")?;
        ensure!(check_n == 0 || n == check_n, "label file is for {} vertices, graph has {}", n, check_n);
        let mut labeling = Labeling::new(n);
        for v in 0..n {
            for side in 0..2 {
                let len = next("label size")?;
                let list = &mut labeling.labels[v][side];
                list.reserve(len);
                for _ in 0..len {
                    let h = next("hub id")?;
                    let d = next("hub distance")?;
                    ensure!(d < INFTY as usize, "hub distance out of range");
                    list.push((h, d as Distance));
                }
            }
        }
        ensure!(tok.next().is_none(), "trailing data in label file");
        Ok(labeling)
    }
}

//! Basic types (vertices, distances, arcs, directions) and the
//! compressed bidirectional graph.
//!
//! A single stored arc can represent an outgoing edge, an incoming
//! edge, or both at once: when an undirected edge (or a pair of
//! anti-parallel edges of equal length) connects two vertices, one
//! arc carries both flags. Arcs of a vertex are laid out
//! reverse-only, then bidirectional, then forward-only, so each side
//! iterates over one contiguous slice.
//!
//! Graphs are read from DIMACS-SP or METIS adjacency files; the
//! format is auto-detected by a trial parse.

use anyhow::{bail, ensure, Context, Result};
use std::fs;
use std::path::Path;

/// Vertex identifier in `[0, n)`.
pub type Vertex = usize;

/// Non-negative arc length / path distance.
pub type Distance = u32;

/// Sentinel vertex: "no parent" / absent.
pub const NONE: Vertex = usize::MAX;

/// Sentinel distance: unreachable.
pub const INFTY: Distance = u32::MAX;

/// Arc direction relative to its owner vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Reverse,
    Forward,
}

impl Dir {
    /// Both directions, reverse first (the order all builders use).
    pub const BOTH: [Dir; 2] = [Dir::Reverse, Dir::Forward];

    /// Side index: reverse = 0, forward = 1.
    #[inline]
    pub fn idx(self) -> usize {
        match self {
            Dir::Reverse => 0,
            Dir::Forward => 1,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn flip(self) -> Dir {
        match self {
            Dir::Reverse => Dir::Forward,
            Dir::Forward => Dir::Reverse,
        }
    }
}

/// A stored arc. `forward`/`reverse` tell which adjacency sides of the
/// owner vertex this arc belongs to.
#[derive(Clone, Copy, Debug)]
pub struct Arc {
    pub head: Vertex,
    pub length: Distance,
    pub forward: bool,
    pub reverse: bool,
}

/// Immutable bidirectional weighted graph.
pub struct Graph {
    n: usize,
    m: usize,
    arcs: Vec<Arc>,
    /// begin[side][v] .. end[side][v] delimit v's arcs on that side.
    begin: [Vec<usize>; 2],
    end: [Vec<usize>; 2],
}

impl Graph {
    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Number of arcs added during construction (before merging).
    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.m
    }

    /// Arcs incident to `v` on side `dir`.
    #[inline]
    pub fn arcs(&self, v: Vertex, dir: Dir) -> &[Arc] {
        let s = dir.idx();
        &self.arcs[self.begin[s][v]..self.end[s][v]]
    }

    /// Degree of `v` on one side.
    #[inline]
    pub fn degree(&self, v: Vertex, dir: Dir) -> usize {
        let s = dir.idx();
        self.end[s][v] - self.begin[s][v]
    }

    /// Total degree of `v` (both sides).
    #[inline]
    pub fn total_degree(&self, v: Vertex) -> usize {
        self.degree(v, Dir::Forward) + self.degree(v, Dir::Reverse)
    }

    /// Read a graph from `path`, trying DIMACS first and METIS second.
    /// With `undirected`, every parsed edge materialises in both
    /// directions.
    pub fn read(path: &Path, undirected: bool) -> Result<Graph> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read graph file {}", path.display()))?;
        if let Ok(g) = parse_dimacs(&text, undirected) {
            return Ok(g);
        }
        parse_metis(&text, undirected)
            .with_context(|| format!("unable to parse {} as DIMACS or METIS", path.display()))
    }
}

/// Accumulates arcs, then compresses them into a [`Graph`].
pub struct GraphBuilder {
    n: usize,
    m: usize,
    /// (tail, arc) pairs; both orientations of every edge are stored
    /// and merged in `build`.
    tmp: Vec<(Vertex, Arc)>,
}

impl GraphBuilder {
    pub fn new(n: usize) -> GraphBuilder {
        GraphBuilder { n, m: 0, tmp: Vec::new() }
    }

    /// Add an arc `(u, v)` of length `w`, plus `(v, u)` if
    /// `undirected`.
    pub fn add_arc(&mut self, u: Vertex, v: Vertex, w: Distance, undirected: bool) -> Result<()> {
        ensure!(u < self.n && v < self.n, "arc ({}, {}) out of range for {} vertices", u, v, self.n);
        ensure!(w < INFTY, "arc ({}, {}) has unrepresentable length", u, v);
        self.tmp.push((u, Arc { head: v, length: w, forward: true, reverse: undirected }));
        self.tmp.push((v, Arc { head: u, length: w, forward: undirected, reverse: true }));
        self.m += 1 + undirected as usize;
        Ok(())
    }

    /// Compress the accumulated arcs into adjacency lists: drop
    /// dominated duplicates, merge anti-parallel equal-length arcs
    /// into bidirectional ones, and compute the per-side ranges.
    pub fn build(self) -> Graph {
        let GraphBuilder { n, m, mut tmp } = self;

        // Sort key that groups a vertex's arcs as reverse-only,
        // bidirectional, forward-only; equal arcs adjacent by length.
        let dir_key =
            |t: &(Vertex, Arc)| (t.0, !t.1.reverse, t.1.forward, t.1.head, t.1.length);

        // Drop duplicate (tail, head, flags) arcs, keeping the shortest.
        tmp.sort_by_key(dir_key);
        tmp.dedup_by(|a, b| {
            a.0 == b.0
                && a.1.head == b.1.head
                && a.1.forward == b.1.forward
                && a.1.reverse == b.1.reverse
        });

        // Merge forward and reverse arcs of equal length into one
        // bidirectional arc.
        tmp.sort_by_key(|t| (t.0, t.1.head, t.1.length));
        tmp.dedup_by(|a, b| {
            if a.0 == b.0 && a.1.head == b.1.head && a.1.length == b.1.length {
                b.1.forward |= a.1.forward;
                b.1.reverse |= a.1.reverse;
                true
            } else {
                false
            }
        });

        tmp.sort_by_key(dir_key);

        let mut begin = [vec![0usize; n], vec![0usize; n]];
        let mut end = [vec![0usize; n], vec![0usize; n]];
        let arcs: Vec<Arc> = tmp.iter().map(|t| t.1).collect();

        let mut i = 0;
        while i < tmp.len() {
            let v = tmp[i].0;
            let mut j = i;
            while j < tmp.len() && tmp[j].0 == v {
                j += 1;
            }
            // Block layout is reverse-only, bidirectional, forward-only.
            let rev_end = (i..j).find(|&k| !arcs[k].reverse).unwrap_or(j);
            let fwd_begin = (i..j).find(|&k| arcs[k].forward).unwrap_or(j);
            begin[Dir::Reverse.idx()][v] = i;
            end[Dir::Reverse.idx()][v] = rev_end;
            begin[Dir::Forward.idx()][v] = fwd_begin;
            end[Dir::Forward.idx()][v] = j;
            i = j;
        }

        Graph { n, m, arcs, begin, end }
    }
}

/// Parse DIMACS-SP: `p sp <n> <m>` header, `c` comments, `a u v w`
/// arcs with 1-based vertex ids.
fn parse_dimacs(text: &str, undirected: bool) -> Result<Graph> {
    let mut builder: Option<GraphBuilder> = None;
    for line in text.lines() {
        let mut tok = line.split_whitespace();
        match line.bytes().next() {
            Some(b'c') => continue,
            Some(b'p') => {
                ensure!(builder.is_none(), "duplicate problem line");
                ensure!(tok.next() == Some("p") && tok.next() == Some("sp"), "bad problem line");
                let n: usize = tok.next().context("missing vertex count")?.parse()?;
                let _m: usize = tok.next().context("missing arc count")?.parse()?;
                builder = Some(GraphBuilder::new(n));
            }
            Some(b'a') => {
                let b = builder.as_mut().context("arc before problem line")?;
                ensure!(tok.next() == Some("a"), "bad arc line");
                let u: usize = tok.next().context("missing tail")?.parse()?;
                let v: usize = tok.next().context("missing head")?.parse()?;
                let w: Distance = tok.next().context("missing length")?.parse()?;
                ensure!(u >= 1 && v >= 1, "vertex ids are 1-based");
                b.add_arc(u - 1, v - 1, w, undirected)?;
            }
            _ => bail!("unrecognised line: {:?}", line),
        }
    }
    let builder = builder.context("missing problem line")?;
    Ok(builder.build())
}

/// Parse METIS adjacency: header `n m [fmt [ncon]]`, then one
/// neighbour list per vertex. `fmt` is a 3-digit mask: vertex sizes,
/// vertex weights, edge weights; edge weights are present iff
/// `fmt % 10 == 1`.
fn parse_metis(text: &str, undirected: bool) -> Result<Graph> {
    let mut lines = text.lines().filter(|l| !l.starts_with('%'));

    let header: Vec<u64> = match lines.next() {
        Some(l) => l
            .split_whitespace()
            .map(|t| t.parse::<u64>().map_err(anyhow::Error::from))
            .collect::<Result<_>>()?,
        None => Vec::new(),
    };
    ensure!(header.len() <= 4, "too many header fields");
    let n = header.first().copied().unwrap_or(0) as usize;
    let fmt = header.get(2).copied().unwrap_or(0);
    ensure!(fmt % 10 <= 1 && (fmt / 10) % 10 <= 1 && fmt <= 111, "bad fmt {}", fmt);
    let has_sizes = fmt >= 100;
    let has_vweights = fmt % 100 >= 10;
    let ncon = match header.get(3) {
        Some(&c) => {
            ensure!(has_vweights, "ncon given but fmt has no vertex weights");
            c as usize
        }
        None => 1,
    };
    let has_eweights = fmt % 10 == 1;
    let skip = has_sizes as usize + if has_vweights { ncon } else { 0 };

    let mut builder = GraphBuilder::new(n);
    for (v, line) in lines.enumerate() {
        let toks: Vec<u64> = line
            .split_whitespace()
            .map(|t| t.parse::<u64>().map_err(anyhow::Error::from))
            .collect::<Result<_>>()?;
        if toks.is_empty() {
            continue;
        }
        ensure!(v < n, "more vertex lines than vertices");
        ensure!(toks.len() >= skip, "vertex line shorter than its weight prefix");
        let adj = &toks[skip..];
        if has_eweights {
            ensure!(adj.len() % 2 == 0, "dangling neighbour without edge weight");
            for pair in adj.chunks(2) {
                ensure!(pair[0] >= 1, "vertex ids are 1-based");
                ensure!(pair[1] < INFTY as u64, "edge weight out of range");
                builder.add_arc(v, pair[0] as usize - 1, pair[1] as Distance, undirected)?;
            }
        } else {
            for &head in adj {
                ensure!(head >= 1, "vertex ids are 1-based");
                builder.add_arc(v, head as usize - 1, 1, undirected)?;
            }
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path5() -> Graph {
        let mut b = GraphBuilder::new(5);
        for v in 0..4 {
            b.add_arc(v, v + 1, 1, true).unwrap();
        }
        b.build()
    }

    #[test]
    fn side_ranges_are_contiguous_and_disjoint_flags() {
        let g = path5();
        assert_eq!(g.num_vertices(), 5);
        assert_eq!(g.num_arcs(), 8);
        // Endpoints see one neighbour on each side (same merged arc).
        assert_eq!(g.degree(0, Dir::Forward), 1);
        assert_eq!(g.degree(0, Dir::Reverse), 1);
        assert_eq!(g.degree(2, Dir::Forward), 2);
        for v in 0..5 {
            for dir in Dir::BOTH {
                for a in g.arcs(v, dir) {
                    match dir {
                        Dir::Forward => assert!(a.forward),
                        Dir::Reverse => assert!(a.reverse),
                    }
                }
            }
        }
    }

    #[test]
    fn antiparallel_arcs_merge_into_bidirectional() {
        let mut b = GraphBuilder::new(2);
        b.add_arc(0, 1, 7, false).unwrap();
        b.add_arc(1, 0, 7, false).unwrap();
        let g = b.build();
        // One physical arc per endpoint, flagged both ways.
        assert_eq!(g.arcs(0, Dir::Forward).len(), 1);
        assert_eq!(g.arcs(0, Dir::Reverse).len(), 1);
        let a = g.arcs(0, Dir::Forward)[0];
        assert!(a.forward && a.reverse);
        assert_eq!(a.head, 1);
    }

    #[test]
    fn duplicate_arc_keeps_shortest() {
        let mut b = GraphBuilder::new(2);
        b.add_arc(0, 1, 9, false).unwrap();
        b.add_arc(0, 1, 3, false).unwrap();
        let g = b.build();
        let fwd = g.arcs(0, Dir::Forward);
        assert_eq!(fwd.len(), 1);
        assert_eq!(fwd[0].length, 3);
    }

    #[test]
    fn dimacs_parse() {
        let text = "c tiny graph\np sp 3 2\na 1 2 5\na 2 3 4\n";
        let g = parse_dimacs(text, false).unwrap();
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.num_arcs(), 2);
        assert_eq!(g.arcs(0, Dir::Forward)[0].head, 1);
        assert_eq!(g.arcs(0, Dir::Forward)[0].length, 5);
        assert_eq!(g.arcs(2, Dir::Reverse)[0].head, 1);
        assert!(g.arcs(2, Dir::Forward).is_empty());
    }

    #[test]
    fn dimacs_rejects_garbage() {
        assert!(parse_dimacs("hello world\n", false).is_err());
        assert!(parse_dimacs("p sp 2 1\na 1 3 1\n", false).is_err());
        assert!(parse_dimacs("a 1 2 1\n", false).is_err());
    }

    #[test]
    fn metis_parse_unweighted() {
        // 3-vertex path, neighbour lists, implicit weight 1.
        let text = "% comment\n3 2\n2\n1 3\n2\n";
        let g = parse_metis(text, false).unwrap();
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.arcs(1, Dir::Forward).len(), 2);
        assert_eq!(g.arcs(0, Dir::Forward)[0].length, 1);
    }

    #[test]
    fn metis_parse_edge_weights() {
        let text = "3 2 001\n2 5\n1 5 3 4\n2 4\n";
        let g = parse_metis(text, false).unwrap();
        assert_eq!(g.arcs(0, Dir::Forward)[0].length, 5);
        assert_eq!(g.arcs(1, Dir::Forward).len(), 2);
    }

    #[test]
    fn metis_rejects_dangling_weight_pair() {
        assert!(parse_metis("2 1 001\n2\n1 7\n", false).is_err());
    }

    #[test]
    fn undirected_switch_doubles_arcs() {
        let g = parse_dimacs("p sp 2 1\na 1 2 2\n", true).unwrap();
        assert_eq!(g.num_arcs(), 2);
        assert_eq!(g.arcs(1, Dir::Forward).len(), 1);
        assert_eq!(g.arcs(1, Dir::Forward)[0].head, 0);
    }
}

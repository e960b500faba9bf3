//! Shared all-pairs shortest-path bookkeeping for the greedy
//! builders.
//!
//! One structure serves all three: a flat n-by-n distance table, an
//! atomic cover matrix, and, for the unique-shortest-paths variant,
//! parent tables describing one shortest-path tree per root. The
//! variant is selected at construction: [`SpKind::Dag`] enumerates
//! descendants/ancestors by distance arithmetic on the shortest-path
//! DAG, [`SpKind::Tree`] by parent pointers.
//!
//! `dist` and the parent tables are immutable after construction;
//! `cover` is monotone (false to true) and stored as atomics so the
//! per-iteration update phases may run in parallel. The reverse
//! parent table is kept transposed (indexed vertex-major) so its
//! derivation parallelises row-wise.

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::dijkstra::{Dijkstra, UspDijkstra};
use crate::graph::{Dir, Distance, Graph, Vertex, INFTY, NONE};
use crate::progress;

/// How shortest paths are represented and traversed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SpKind {
    /// Shortest-path DAGs, recognised by distance arithmetic.
    Dag,
    /// Unique shortest-path trees from tie-broken Dijkstra runs.
    Tree,
}

/// Reusable per-worker scratch for DAG/tree traversals.
pub struct Scratch {
    visited: Vec<bool>,
}

impl Scratch {
    pub fn new(n: usize) -> Scratch {
        Scratch { visited: vec![false; n] }
    }
}

pub struct ShortestPaths<'g> {
    g: &'g Graph,
    n: usize,
    kind: SpKind,
    /// dist[u * n + v] = shortest distance u to v.
    dist: Vec<Distance>,
    /// cover[u * n + v]: pair (u, v) already covered by some hub.
    cover: Vec<AtomicBool>,
    /// parent_fwd[root * n + v] = v's parent in root's forward tree.
    parent_fwd: Vec<Vertex>,
    /// parent_rev[v * n + root] = v's parent in root's reverse tree
    /// (transposed: see module doc).
    parent_rev: Vec<Vertex>,
}

impl<'g> ShortestPaths<'g> {
    /// Run one (tie-broken, for [`SpKind::Tree`]) Dijkstra per source
    /// in parallel and assemble the tables.
    pub fn new(g: &'g Graph, kind: SpKind) -> ShortestPaths<'g> {
        let n = g.num_vertices();
        if n == 0 {
            return ShortestPaths {
                g,
                n,
                kind,
                dist: Vec::new(),
                cover: Vec::new(),
                parent_fwd: Vec::new(),
                parent_rev: Vec::new(),
            };
        }
        log::info!("computing all-pairs distance table for {} vertices", n);
        let pb = progress::table_bar(n as u64);

        let mut dist = vec![INFTY; n * n];
        let mut parent_fwd = Vec::new();
        let mut parent_rev = Vec::new();

        match kind {
            SpKind::Dag => {
                dist.par_chunks_mut(n).enumerate().for_each_init(
                    || Dijkstra::new(g),
                    |dij, (u, drow)| {
                        dij.run(u, Dir::Forward);
                        for v in 0..n {
                            drow[v] = dij.distance(v);
                        }
                        pb.inc(1);
                    },
                );
            }
            SpKind::Tree => {
                parent_fwd = vec![NONE; n * n];
                dist.par_chunks_mut(n)
                    .zip(parent_fwd.par_chunks_mut(n))
                    .enumerate()
                    .for_each_init(
                        || UspDijkstra::new(g),
                        |dij, (u, (drow, prow))| {
                            dij.run(u, Dir::Forward);
                            for v in 0..n {
                                drow[v] = dij.distance(v);
                                prow[v] = dij.parent(v);
                            }
                            pb.inc(1);
                        },
                    );
                parent_rev = derive_reverse_parents(g, &parent_fwd);
            }
        }
        pb.finish_and_clear();

        let cover = (0..n * n).map(|_| AtomicBool::new(false)).collect();
        ShortestPaths { g, n, kind, dist, cover, parent_fwd, parent_rev }
    }

    /// dist(u, v) in direction `dir` (reverse swaps the arguments).
    #[inline]
    pub fn distance(&self, u: Vertex, v: Vertex, dir: Dir) -> Distance {
        match dir {
            Dir::Forward => self.dist[u * self.n + v],
            Dir::Reverse => self.dist[v * self.n + u],
        }
    }

    /// Mark the ordered pair (u, v) covered.
    #[inline]
    pub fn set_cover(&self, u: Vertex, v: Vertex) {
        self.cover[u * self.n + v].store(true, Ordering::Relaxed);
    }

    /// Is the pair covered? Reverse swaps the arguments.
    #[inline]
    pub fn is_covered(&self, u: Vertex, v: Vertex, dir: Dir) -> bool {
        let i = match dir {
            Dir::Forward => u * self.n + v,
            Dir::Reverse => v * self.n + u,
        };
        self.cover[i].load(Ordering::Relaxed)
    }

    /// `v`'s parent in `root`'s tree for direction `dir`
    /// ([`SpKind::Tree`] only).
    #[inline]
    pub fn parent(&self, root: Vertex, v: Vertex, dir: Dir) -> Vertex {
        match dir {
            Dir::Forward => self.parent_fwd[root * self.n + v],
            Dir::Reverse => self.parent_rev[v * self.n + root],
        }
    }

    /// Is `v` on a shortest u-to-w path, given an arc of `length`
    /// from `v` to `w` (in direction `dir`)?
    #[inline]
    fn on_path(&self, u: Vertex, v: Vertex, w: Vertex, length: Distance, dir: Dir) -> bool {
        match self.kind {
            SpKind::Dag => {
                let duw = self.distance(u, w, dir);
                duw != INFTY && self.distance(u, v, dir).checked_add(length) == Some(duw)
            }
            SpKind::Tree => self.parent(u, w, dir) == v,
        }
    }

    fn unreachable(&self, u: Vertex, v: Vertex, dir: Dir) -> bool {
        match self.kind {
            SpKind::Dag => self.distance(u, v, dir) == INFTY,
            SpKind::Tree => u != v && self.parent(u, v, dir) == NONE,
        }
    }

    /// Collect into `out` all vertices reachable from `v` along
    /// shortest u-to-x paths (v included), by BFS-like expansion.
    /// With `skip_covered`, pairs already flagged in `cover` are
    /// neither visited nor expanded.
    pub fn descendants(
        &self,
        u: Vertex,
        v: Vertex,
        dir: Dir,
        skip_covered: bool,
        out: &mut Vec<Vertex>,
        scratch: &mut Scratch,
    ) {
        out.clear();
        if (skip_covered && self.is_covered(u, v, dir)) || self.unreachable(u, v, dir) {
            return;
        }
        out.push(v);
        scratch.visited[v] = true;
        let mut i = 0;
        while i < out.len() {
            let x = out[i];
            for a in self.g.arcs(x, dir) {
                if !scratch.visited[a.head]
                    && !(skip_covered && self.is_covered(u, a.head, dir))
                    && self.on_path(u, x, a.head, a.length, dir)
                {
                    out.push(a.head);
                    scratch.visited[a.head] = true;
                }
            }
            i += 1;
        }
        for &x in out.iter() {
            scratch.visited[x] = false;
        }
    }

    /// Collect into `out` all vertices through which a shortest
    /// u-to-v path passes (v included); the dual of `descendants`.
    pub fn ancestors(
        &self,
        u: Vertex,
        v: Vertex,
        dir: Dir,
        skip_covered: bool,
        out: &mut Vec<Vertex>,
        scratch: &mut Scratch,
    ) {
        out.clear();
        if (skip_covered && self.is_covered(u, v, dir)) || self.unreachable(u, v, dir) {
            return;
        }
        out.push(v);
        scratch.visited[v] = true;
        let mut i = 0;
        while i < out.len() {
            let x = out[i];
            for a in self.g.arcs(x, dir.flip()) {
                if !scratch.visited[a.head] && self.on_path(u, a.head, x, a.length, dir) {
                    out.push(a.head);
                    scratch.visited[a.head] = true;
                }
            }
            i += 1;
        }
        for &x in out.iter() {
            scratch.visited[x] = false;
        }
    }
}

/// Build the transposed reverse-parent table from the forward trees.
///
/// The tie-broken Dijkstra only yields forward trees. A vertex u's
/// parent in root r's reverse tree is the forward-tree child of u
/// through which r is reached: for every arc (u, w) with w a
/// forward-tree child of u, every descendant d of w in u's tree has
/// parent w in d's reverse tree. Reconstructing this explicitly keeps
/// the cover property intact when USP is only emulated.
fn derive_reverse_parents(g: &Graph, parent_fwd: &[Vertex]) -> Vec<Vertex> {
    let n = g.num_vertices();
    let mut parent_rev = vec![NONE; n * n];
    parent_rev.par_chunks_mut(n).enumerate().for_each_init(
        || (vec![false; n], Vec::new()),
        |(visited, desc), (u, prow)| {
            let fwd_row = &parent_fwd[u * n..(u + 1) * n];
            for a in g.arcs(u, Dir::Forward) {
                if fwd_row[a.head] != u {
                    continue;
                }
                tree_descendants(g, fwd_row, a.head, desc, visited);
                for &d in desc.iter() {
                    prow[d] = a.head;
                }
            }
        },
    );
    parent_rev
}

/// Subtree of `start` in the forward tree described by `parent_row`.
fn tree_descendants(
    g: &Graph,
    parent_row: &[Vertex],
    start: Vertex,
    out: &mut Vec<Vertex>,
    visited: &mut [bool],
) {
    out.clear();
    out.push(start);
    visited[start] = true;
    let mut i = 0;
    while i < out.len() {
        let x = out[i];
        for a in g.arcs(x, Dir::Forward) {
            if !visited[a.head] && parent_row[a.head] == x {
                out.push(a.head);
                visited[a.head] = true;
            }
        }
        i += 1;
    }
    for &x in out.iter() {
        visited[x] = false;
    }
}

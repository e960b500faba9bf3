//! Single-source shortest paths.
//!
//! [`SearchSpace`] owns the state shared by every Dijkstra-like
//! search in the crate: the queue, the distance and parent arrays,
//! and a dirty list so that `clear` costs O(touched) rather than
//! O(n). That makes the engines cheap to reuse for the thousands of
//! per-source runs the builders perform.

use crate::graph::{Dir, Distance, Graph, Vertex, INFTY, NONE};
use crate::heap::KHeap;

/// State for Dijkstra-like searches on one graph.
pub(crate) struct SearchSpace<'g> {
    pub(crate) g: &'g Graph,
    pub(crate) queue: KHeap<Distance>,
    pub(crate) parent: Vec<Vertex>,
    pub(crate) distance: Vec<Distance>,
    is_dirty: Vec<bool>,
    pub(crate) dirty: Vec<Vertex>,
}

impl<'g> SearchSpace<'g> {
    pub(crate) fn new(g: &'g Graph) -> SearchSpace<'g> {
        let n = g.num_vertices();
        SearchSpace {
            g,
            queue: KHeap::new(n),
            parent: vec![NONE; n],
            distance: vec![INFTY; n],
            is_dirty: vec![false; n],
            dirty: Vec::with_capacity(n),
        }
    }

    /// Set `v`'s tentative distance and parent and enqueue it.
    pub(crate) fn update(&mut self, v: Vertex, d: Distance, p: Vertex) {
        self.distance[v] = d;
        self.parent[v] = p;
        self.queue.update(v, d);
        if !self.is_dirty[v] {
            self.dirty.push(v);
            self.is_dirty[v] = true;
        }
    }

    /// Reset only the vertices touched by the last run.
    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        for &v in &self.dirty {
            self.parent[v] = NONE;
            self.distance[v] = INFTY;
            self.is_dirty[v] = false;
        }
        self.dirty.clear();
    }
}

/// Relax `d` over an arc of length `len`, failing loudly on overflow.
#[inline]
pub(crate) fn relaxed(d: Distance, len: Distance) -> Distance {
    let dd = d
        .checked_add(len)
        .filter(|&dd| dd < INFTY)
        .expect("distance overflow on arc relaxation");
    assert!(dd > d, "non-positive arc length");
    dd
}

/// Plain Dijkstra.
pub struct Dijkstra<'g> {
    s: SearchSpace<'g>,
}

impl<'g> Dijkstra<'g> {
    pub fn new(g: &'g Graph) -> Dijkstra<'g> {
        Dijkstra { s: SearchSpace::new(g) }
    }

    /// Distance from the last run's source to `v`.
    #[inline]
    pub fn distance(&self, v: Vertex) -> Distance {
        self.s.distance[v]
    }

    /// `v`'s parent in the shortest-path tree of the last run.
    #[inline]
    pub fn parent(&self, v: Vertex) -> Vertex {
        self.s.parent[v]
    }

    /// Compute distances from `v` along arcs of side `dir`.
    pub fn run(&mut self, v: Vertex, dir: Dir) {
        let g = self.s.g;
        self.s.clear();
        self.s.update(v, 0, NONE);
        while let Some(u) = self.s.queue.pop() {
            let d = self.s.distance[u];
            for a in g.arcs(u, dir) {
                let dd = relaxed(d, a.length);
                if dd < self.s.distance[a.head] {
                    self.s.update(a.head, dd, u);
                }
            }
        }
    }
}

/// Dijkstra with deterministic tie-breaking: among equal-distance
/// paths prefer fewer hops, then the smaller parent id. The resulting
/// shortest-path tree is unique even on graphs with non-unique
/// shortest paths, which is what the USP greedy builder relies on.
pub struct UspDijkstra<'g> {
    s: SearchSpace<'g>,
    hops: Vec<u32>,
}

impl<'g> UspDijkstra<'g> {
    pub fn new(g: &'g Graph) -> UspDijkstra<'g> {
        let n = g.num_vertices();
        UspDijkstra { s: SearchSpace::new(g), hops: vec![0; n] }
    }

    #[inline]
    pub fn distance(&self, v: Vertex) -> Distance {
        self.s.distance[v]
    }

    #[inline]
    pub fn parent(&self, v: Vertex) -> Vertex {
        self.s.parent[v]
    }

    fn update(&mut self, v: Vertex, d: Distance, h: u32, p: Vertex) {
        self.hops[v] = h;
        self.s.update(v, d, p);
    }

    fn clear(&mut self) {
        for &v in &self.s.dirty {
            self.hops[v] = 0;
        }
        self.s.clear();
    }

    pub fn run(&mut self, v: Vertex, dir: Dir) {
        let g = self.s.g;
        self.clear();
        self.update(v, 0, 0, NONE);
        while let Some(u) = self.s.queue.pop() {
            let d = self.s.distance[u];
            let hu = self.hops[u];
            for &a in g.arcs(u, dir) {
                let dd = relaxed(d, a.length);
                let better = dd < self.s.distance[a.head]
                    || (dd == self.s.distance[a.head] && hu + 1 < self.hops[a.head])
                    || (dd == self.s.distance[a.head]
                        && hu + 1 == self.hops[a.head]
                        && u < self.s.parent[a.head]);
                if better {
                    self.update(a.head, dd, hu + 1, u);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn path5() -> Graph {
        let mut b = GraphBuilder::new(5);
        for v in 0..4 {
            b.add_arc(v, v + 1, 1, true).unwrap();
        }
        b.build()
    }

    #[test]
    fn distances_on_a_path() {
        let g = path5();
        let mut dij = Dijkstra::new(&g);
        dij.run(0, Dir::Forward);
        for v in 0..5 {
            assert_eq!(dij.distance(v), v as Distance);
        }
        dij.run(4, Dir::Reverse);
        assert_eq!(dij.distance(0), 4);
    }

    #[test]
    fn unreachable_stays_infty() {
        let mut b = GraphBuilder::new(4);
        b.add_arc(0, 1, 1, false).unwrap();
        b.add_arc(2, 3, 1, false).unwrap();
        let g = b.build();
        let mut dij = Dijkstra::new(&g);
        dij.run(0, Dir::Forward);
        assert_eq!(dij.distance(1), 1);
        assert_eq!(dij.distance(2), INFTY);
        assert_eq!(dij.distance(3), INFTY);
    }

    #[test]
    fn reuse_clears_previous_run() {
        let g = path5();
        let mut dij = Dijkstra::new(&g);
        dij.run(0, Dir::Forward);
        dij.run(2, Dir::Forward);
        assert_eq!(dij.distance(2), 0);
        assert_eq!(dij.distance(0), 2);
        assert_eq!(dij.parent(2), NONE);
    }

    #[test]
    fn usp_prefers_smaller_parent_on_ties() {
        // Diamond: 0 -> {1, 2} -> 3, all weight 1. Two shortest
        // 0-to-3 paths; the unique tree must route via vertex 1.
        let mut b = GraphBuilder::new(4);
        b.add_arc(0, 1, 1, false).unwrap();
        b.add_arc(0, 2, 1, false).unwrap();
        b.add_arc(1, 3, 1, false).unwrap();
        b.add_arc(2, 3, 1, false).unwrap();
        let g = b.build();
        let mut dij = UspDijkstra::new(&g);
        dij.run(0, Dir::Forward);
        assert_eq!(dij.distance(3), 2);
        assert_eq!(dij.parent(3), 1);
    }

    #[test]
    fn usp_prefers_fewer_hops_on_ties() {
        // 0 -> 1 -> 2 of weight 1 each, plus a direct 0 -> 2 of
        // weight 2: equal distance, fewer hops wins.
        let mut b = GraphBuilder::new(3);
        b.add_arc(0, 1, 1, false).unwrap();
        b.add_arc(1, 2, 1, false).unwrap();
        b.add_arc(0, 2, 2, false).unwrap();
        let g = b.build();
        let mut dij = UspDijkstra::new(&g);
        dij.run(0, Dir::Forward);
        assert_eq!(dij.distance(2), 2);
        assert_eq!(dij.parent(2), 0);
    }
}

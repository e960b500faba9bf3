//! GHLp: approximately p-norm-optimal hub labels.
//!
//! Not hierarchical: a vertex becomes a hub wherever density-driven
//! selection puts it. Each candidate hub v has a "center graph" whose
//! left side is everything reaching v, right side everything v
//! reaches, and edges the still-uncovered pairs whose shortest paths
//! pass through v. An approximate maximum-density subgraph of the
//! center graph (greedy 2-approximation by evicting the vertex of
//! smallest degree-to-weight ratio) decides where v is added; the
//! main loop keeps candidates in a lazy-update queue, re-evaluating a
//! batch of the current best and promoting the winner when its
//! density is still within the staleness bound alpha.
//!
//! Vertex weights are the marginal p-norm cost of growing a label by
//! one hub: `(s + 1)^p - s^p` for current size `s`; `p = 1` optimises
//! total label size, large p approximates the maximum.

use rayon::prelude::*;
use std::cmp::Ordering;

use crate::graph::{Dir, Distance, Graph, Vertex};
use crate::heap::KHeap;
use crate::labeling::Labeling;
use crate::sp::{Scratch, ShortestPaths, SpKind};

/// Wraps the label store with an n-by-2-by-n membership table so the
/// iterated AMDS rounds cannot add the same hub to a label twice.
struct ProxyLabeling {
    n: usize,
    labeling: Labeling,
    /// inlabel[(hub * 2 + side) * n + u]
    inlabel: Vec<bool>,
}

impl ProxyLabeling {
    fn new(n: usize) -> ProxyLabeling {
        ProxyLabeling { n, labeling: Labeling::new(n), inlabel: vec![false; n * 2 * n] }
    }

    #[inline]
    fn slot(&self, u: Vertex, dir: Dir, hub: Vertex) -> usize {
        (hub * 2 + dir.idx()) * self.n + u
    }

    fn add(&mut self, u: Vertex, dir: Dir, hub: Vertex, d: Distance) {
        let slot = self.slot(u, dir, hub);
        if !self.inlabel[slot] {
            self.labeling.add(u, dir, hub, d);
            self.inlabel[slot] = true;
        }
    }

    #[inline]
    fn size(&self, u: Vertex, dir: Dir) -> usize {
        self.labeling.label(u, dir).len()
    }

    #[inline]
    fn is_in_label(&self, u: Vertex, dir: Dir, hub: Vertex) -> bool {
        self.inlabel[self.slot(u, dir, hub)]
    }

    fn into_labeling(self) -> Labeling {
        self.labeling
    }
}

/// Marginal p-norm cost of adding one hub to `u`'s label on `dir`.
fn vertex_weight(proxy: &ProxyLabeling, u: Vertex, dir: Dir, p: f64) -> f64 {
    let base = proxy.size(u, dir) as f64;
    (base + 1.0).powf(p) - base.powf(p)
}

/// edges / weight with the degenerate cases pinned down.
fn ratio(edges: usize, vertices_weight: f64) -> f64 {
    if edges == 0 {
        0.0
    } else if vertices_weight == 0.0 {
        f64::MAX
    } else {
        edges as f64 / vertices_weight
    }
}

/// Approximate maximum-density-subgraph state for one worker. Heap
/// ids pack (vertex, side) as `u + n * side`.
struct Amds {
    n: usize,
    queue: KHeap<f64>,
    degree: [Vec<usize>; 2],
    inads: [Vec<bool>; 2],
    desc: Vec<Vertex>,
    scratch: Scratch,
}

impl Amds {
    fn new(n: usize) -> Amds {
        Amds {
            n,
            queue: KHeap::new(2 * n),
            degree: [vec![0; n], vec![0; n]],
            inads: [vec![false; n], vec![false; n]],
            desc: Vec::new(),
            scratch: Scratch::new(n),
        }
    }

    /// Is vertex `u` on side `dir` part of the subgraph found by the
    /// last `run`? Only meaningful when that run's density met its
    /// limit.
    #[inline]
    fn is_in(&self, u: Vertex, dir: Dir) -> bool {
        self.inads[dir.idx()][u]
    }

    /// Density of the AMDS of `v`'s center graph, stopping early once
    /// the running density reaches `limit`.
    fn run(
        &mut self,
        sp: &ShortestPaths<'_>,
        proxy: &ProxyLabeling,
        v: Vertex,
        p: f64,
        limit: f64,
    ) -> f64 {
        self.queue.clear();
        let mut edges: usize = 0;
        let mut vertices_weight: f64 = 0.0;

        // Build the center graph: degree of u on side dir is the
        // number of uncovered pairs through v with u on that side.
        for u in 0..self.n {
            for dir in Dir::BOTH {
                sp.descendants(u, v, dir, false, &mut self.desc, &mut self.scratch);
                let mut deg = 0;
                for i in 0..self.desc.len() {
                    if !sp.is_covered(u, self.desc[i], dir) {
                        deg += 1;
                    }
                }
                self.degree[dir.idx()][u] = deg;
                self.inads[dir.idx()][u] = deg > 0;
                if dir == Dir::Forward {
                    edges += deg;
                }
                if deg > 0 && !proxy.is_in_label(u, dir, v) {
                    let uw = vertex_weight(proxy, u, dir, p);
                    self.queue.update(u + self.n * dir.idx(), deg as f64 / uw);
                    vertices_weight += uw;
                }
            }
        }

        // Evict the worst vertex until the density limit is reached
        // or nothing is left, tracking the best density seen.
        let mut r = ratio(edges, vertices_weight);
        let mut best = r;
        while r < limit {
            let id = match self.queue.pop() {
                Some(id) => id,
                None => break,
            };
            let (u, dir) = if id >= self.n { (id - self.n, Dir::Forward) } else { (id, Dir::Reverse) };
            self.inads[dir.idx()][u] = false;
            edges -= self.degree[dir.idx()][u];
            vertices_weight -= vertex_weight(proxy, u, dir, p);
            sp.descendants(u, v, dir, false, &mut self.desc, &mut self.scratch);
            for i in 0..self.desc.len() {
                let w = self.desc[i];
                let f = dir.flip();
                if !self.inads[f.idx()][w] || sp.is_covered(u, w, dir) {
                    continue;
                }
                assert!(self.degree[f.idx()][w] > 0, "degree underflow in AMDS");
                self.degree[f.idx()][w] -= 1;
                let ww = vertex_weight(proxy, w, f, p);
                if self.degree[f.idx()][w] == 0 {
                    self.inads[f.idx()][w] = false;
                }
                if !proxy.is_in_label(w, f, v) {
                    if self.degree[f.idx()][w] == 0 {
                        self.queue.extract(w + self.n * f.idx());
                        vertices_weight -= ww;
                    } else {
                        self.queue
                            .update(w + self.n * f.idx(), self.degree[f.idx()][w] as f64 / ww);
                    }
                }
            }
            r = ratio(edges, vertices_weight);
            if best < r {
                best = r;
            }
        }
        best
    }
}

pub struct GhlBuilder<'g> {
    n: usize,
    sp: ShortestPaths<'g>,
}

impl<'g> GhlBuilder<'g> {
    pub fn new(g: &'g Graph) -> GhlBuilder<'g> {
        GhlBuilder { n: g.num_vertices(), sp: ShortestPaths::new(g, SpKind::Dag) }
    }

    /// Add the winning AMDS of `v`'s center graph to the labeling and
    /// mark its pairs covered.
    fn increase_cover(
        &self,
        v: Vertex,
        amds: &Amds,
        proxy: &mut ProxyLabeling,
        desc: &mut Vec<Vertex>,
        scratch: &mut Scratch,
    ) {
        let sp = &self.sp;
        for dir in Dir::BOTH {
            for u in 0..self.n {
                if !amds.is_in(u, dir) {
                    continue;
                }
                proxy.add(u, dir, v, sp.distance(u, v, dir));
                if dir == Dir::Forward {
                    sp.descendants(u, v, Dir::Forward, false, desc, scratch);
                    for &w in desc.iter() {
                        if amds.is_in(w, Dir::Reverse) {
                            sp.set_cover(u, w);
                        }
                    }
                }
            }
        }
    }

    /// Build p-norm labels; `alpha >= 1` trades staleness of queued
    /// densities for fewer re-evaluations.
    pub fn run(&mut self, alpha: f64, p: f64) -> Labeling {
        let n = self.n;
        let sp = &self.sp;
        let mut proxy = ProxyLabeling::new(n);
        let mut queue: KHeap<f64> = KHeap::new(n);
        let mut density = vec![0.0f64; n];
        let mut desc = Vec::new();
        let mut scratch = Scratch::new(n);

        log::info!("evaluating initial center-graph densities");
        let init: Vec<(Vertex, f64)> = (0..n)
            .into_par_iter()
            .map_init(
                || Amds::new(n),
                |amds, v| (v, amds.run(sp, &proxy, v, p, f64::MAX)),
            )
            .collect();
        for (v, r) in init {
            density[v] = r;
            queue.update(v, 1.0 / r);
        }

        log::info!("density-driven hub selection");
        let workers = rayon::current_num_threads();
        let mut pool: Vec<Amds> = (0..workers).map(|_| Amds::new(n)).collect();
        while !queue.is_empty() {
            let mut batch: Vec<Vertex> = Vec::with_capacity(workers);
            while batch.len() < workers {
                match queue.pop() {
                    Some(v) => batch.push(v),
                    None => break,
                }
            }
            let results: Vec<f64> = pool[..batch.len()]
                .par_iter_mut()
                .zip(&batch)
                .map(|(amds, &v)| amds.run(sp, &proxy, v, p, density[v] / alpha))
                .collect();

            // Rank the batch by re-evaluated density and re-queue the
            // still-promising candidates.
            let mut ranked: Vec<(f64, Vertex, usize)> = results
                .iter()
                .zip(&batch)
                .enumerate()
                .map(|(slot, (&r, &v))| (r, v, slot))
                .collect();
            ranked.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
            for &(r, v, _) in &ranked {
                if r > f64::EPSILON {
                    density[v] = r;
                    queue.update(v, 1.0 / r);
                }
            }

            // Promote the winner unless its density decayed past the
            // staleness bound.
            let (best, v, slot) = ranked[0];
            if best - density[v] / alpha > f64::EPSILON {
                self.increase_cover(v, &pool[slot], &mut proxy, &mut desc, &mut scratch);
            }
        }

        // Hubs were not discovered in id order; sort before querying.
        let mut labeling = proxy.into_labeling();
        labeling.sort();
        labeling
    }
}

//! Greedy hierarchical hub labeling for general graphs.
//!
//! Repeatedly selects the vertex covering the most still-uncovered
//! shortest-path pairs (path-greedy), or the best ratio of endpoint
//! pairs to covered pairs (label-greedy). Selection ranks double as
//! hub ids, so emitted labels are sorted by construction.
//!
//! The per-iteration cover update runs in two parallel phases,
//! reverse before forward; the forward phase is the only writer of
//! the cover matrix and each task touches only its own row. Cover
//! deltas are accumulated per rayon split and folded into the shared
//! counters outside the parallel region.

use rayon::prelude::*;

use crate::graph::{Dir, Graph, Vertex, NONE};
use crate::heap::KHeap;
use crate::labeling::Labeling;
use crate::sp::{Scratch, ShortestPaths, SpKind};

/// Greedy selection strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Greedy {
    /// Maximise covered pairs per selection.
    Path,
    /// Weigh covered pairs against the vertex's own label growth.
    Label,
}

fn weight(greedy: Greedy, cover_size: i64, sp_size: i64) -> f64 {
    match greedy {
        Greedy::Path => 1.0 / cover_size as f64,
        Greedy::Label => sp_size as f64 / cover_size as f64,
    }
}

pub struct HhlBuilder<'g> {
    n: usize,
    sp: ShortestPaths<'g>,
}

impl<'g> HhlBuilder<'g> {
    pub fn new(g: &'g Graph) -> HhlBuilder<'g> {
        HhlBuilder { n: g.num_vertices(), sp: ShortestPaths::new(g, SpKind::Dag) }
    }

    /// Build the labeling and the vertex order it is hierarchical for.
    pub fn run(&mut self, greedy: Greedy) -> (Vec<Vertex>, Labeling) {
        let n = self.n;
        let sp = &self.sp;
        let mut order = vec![NONE; n];
        let mut labeling = Labeling::new(n);
        let mut queue: KHeap<f64> = KHeap::new(n);
        let mut selected = vec![false; n];
        let mut cover_size = vec![0i64; n];
        let mut sp_size = vec![0i64; n];

        log::info!("counting initial shortest-path coverage");
        cover_size
            .par_iter_mut()
            .zip(sp_size.par_iter_mut())
            .enumerate()
            .for_each_init(
                || (Scratch::new(n), Vec::new()),
                |(scratch, d), (v, (cs, ss))| {
                    for u in 0..n {
                        sp.descendants(u, v, Dir::Forward, true, d, scratch);
                        *cs += d.len() as i64;
                        if u == v {
                            *ss += d.len() as i64;
                        }
                    }
                    sp.descendants(v, v, Dir::Reverse, true, d, scratch);
                    *ss += d.len() as i64;
                },
            );

        for v in 0..n {
            queue.update(v, weight(greedy, cover_size[v], sp_size[v]));
        }

        log::info!("greedy selection over {} vertices", n);
        let mut scratch = Scratch::new(n);
        let mut d = Vec::new();
        let mut wi = 0;
        while let Some(w) = queue.pop() {
            selected[w] = true;
            order[wi] = w;

            // Put w into the labels of every vertex it reaches.
            for dir in Dir::BOTH {
                sp.descendants(w, w, dir, true, &mut d, &mut scratch);
                for &x in &d {
                    labeling.add(x, dir.flip(), wi, sp.distance(x, w, dir.flip()));
                }
            }

            // Two-phase cover update. The reverse phase only reads the
            // cover matrix; the forward phase marks every pair (v, x)
            // whose shortest paths run through w and credits each
            // vertex on those paths.
            let mut diff = vec![0i64; n];
            for dir in Dir::BOTH {
                let phase = sp_size
                    .par_iter_mut()
                    .enumerate()
                    .fold(
                        || (vec![0i64; n], Scratch::new(n), Vec::new(), Vec::new()),
                        |(mut acc, mut scratch, mut d, mut anc), (v, ss)| {
                            sp.descendants(v, w, dir, true, &mut d, &mut scratch);
                            *ss -= d.len() as i64;
                            if dir == Dir::Forward {
                                // A pair (v, x) may also have shortest
                                // paths avoiding w; all of them become
                                // covered, so every on-path vertex
                                // loses the pair.
                                for &x in &d {
                                    sp.ancestors(v, x, Dir::Forward, true, &mut anc, &mut scratch);
                                    for &q in &anc {
                                        acc[q] += 1;
                                    }
                                    sp.set_cover(v, x);
                                }
                            }
                            (acc, scratch, d, anc)
                        },
                    )
                    .map(|(acc, _, _, _)| acc)
                    .reduce(
                        || vec![0i64; n],
                        |mut a, b| {
                            for (x, y) in a.iter_mut().zip(&b) {
                                *x += y;
                            }
                            a
                        },
                    );
                for (t, p) in diff.iter_mut().zip(&phase) {
                    *t += p;
                }
            }

            for v in 0..n {
                cover_size[v] -= diff[v];
                assert!(cover_size[v] >= 0, "cover count went negative");
                assert!(sp_size[v] >= 0, "endpoint pair count went negative");
            }
            assert!(
                cover_size[w] == 0 && sp_size[w] == 0,
                "selected vertex still has uncovered pairs"
            );

            for v in 0..n {
                if !selected[v] {
                    queue.update(v, weight(greedy, cover_size[v], sp_size[v]));
                }
            }
            wi += 1;
        }

        (order, labeling)
    }
}

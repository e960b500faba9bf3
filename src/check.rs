//! Cross-validation of a labeling against Dijkstra ground truth.

use rayon::prelude::*;

use crate::dijkstra::Dijkstra;
use crate::graph::{Dir, Graph};
use crate::labeling::Labeling;

/// Compare every query against a fresh Dijkstra run, both
/// directions, all sources. Labels must be sorted. Returns false on
/// the first mismatch.
pub fn check(g: &Graph, labeling: &Labeling) -> bool {
    let n = g.num_vertices();
    (0..n)
        .into_par_iter()
        .map_init(
            || Dijkstra::new(g),
            |dij, v| {
                for dir in Dir::BOTH {
                    dij.run(v, dir);
                    for u in 0..n {
                        if dij.distance(u) != labeling.query(v, u, dir) {
                            log::debug!("query({}, {}, {:?}) disagrees with Dijkstra", v, u, dir);
                            return false;
                        }
                    }
                }
                true
            },
        )
        .all(|ok| ok)
}

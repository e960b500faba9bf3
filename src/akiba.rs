//! Pruned labeling (Akiba et al.): the canonical minimum HHL for a
//! given total vertex order.
//!
//! For each rank in order, a Dijkstra is run in both directions from
//! the ranked vertex, but a branch is abandoned as soon as the labels
//! already built from higher-ranked vertices answer the query at
//! least as well. Ranks double as hub ids, so every emitted label is
//! sorted by construction and no post-sort is needed.

use crate::dijkstra::{relaxed, SearchSpace};
use crate::graph::{Dir, Graph, Vertex, NONE};
use crate::labeling::Labeling;

pub struct Akiba<'g> {
    s: SearchSpace<'g>,
}

impl<'g> Akiba<'g> {
    pub fn new(g: &'g Graph) -> Akiba<'g> {
        Akiba { s: SearchSpace::new(g) }
    }

    /// Add the rank-`i` vertex of `order` as a hub to every vertex it
    /// reaches through still-uncovered shortest paths.
    fn iteration(&mut self, i: usize, dir: Dir, order: &[Vertex], labeling: &mut Labeling) {
        let g = self.s.g;
        self.s.clear();
        let v = order[i];
        self.s.update(v, 0, NONE);
        while let Some(u) = self.s.queue.pop() {
            let d = self.s.distance[u];
            labeling.add(u, dir.flip(), i, d);
            for a in g.arcs(u, dir) {
                let dd = relaxed(d, a.length);
                if dd < self.s.distance[a.head] && dd < labeling.query(v, a.head, dir) {
                    self.s.update(a.head, dd, NONE);
                }
            }
        }
    }

    /// Build the minimum HHL consistent with `order`, which must
    /// cover every vertex exactly once.
    pub fn run(&mut self, order: &[Vertex]) -> Labeling {
        assert_eq!(order.len(), self.s.g.num_vertices(), "order length mismatch");
        let mut labeling = Labeling::new(order.len());
        for i in 0..order.len() {
            self.iteration(i, Dir::Reverse, order, &mut labeling);
            self.iteration(i, Dir::Forward, order, &mut labeling);
        }
        labeling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Distance, GraphBuilder, INFTY};
    use crate::order;

    fn build(n: usize, arcs: &[(Vertex, Vertex, Distance)], undirected: bool) -> Graph {
        let mut b = GraphBuilder::new(n);
        for &(u, v, w) in arcs {
            b.add_arc(u, v, w, undirected).unwrap();
        }
        b.build()
    }

    #[test]
    fn path_graph_queries() {
        let g = build(5, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1)], true);
        let order = order::by_degree(&g);
        let labels = Akiba::new(&g).run(&order);
        assert_eq!(labels.query(0, 4, Dir::Forward), 4);
        assert_eq!(labels.query(4, 0, Dir::Forward), 4);
        assert_eq!(labels.query(1, 3, Dir::Forward), 2);
        assert_eq!(labels.query(2, 2, Dir::Forward), 0);
        assert!(labels.avg() <= 2.5, "path labels should stay small, got {}", labels.avg());
    }

    #[test]
    fn star_graph_labels() {
        let g = build(5, &[(0, 1, 1), (0, 2, 1), (0, 3, 1), (0, 4, 1)], true);
        let order = order::by_degree(&g);
        assert_eq!(order[0], 0);
        let labels = Akiba::new(&g).run(&order);
        assert_eq!(labels.query(1, 2, Dir::Forward), 2);
        assert_eq!(labels.query(2, 0, Dir::Forward), 1);
        // The centre is rank 0 and labels itself.
        assert!(labels.label(0, Dir::Forward).iter().any(|&(h, d)| h == 0 && d == 0));
        // Every leaf's labels hold exactly the centre and itself.
        for v in 1..5 {
            for dir in Dir::BOTH {
                let hubs: Vec<Vertex> = labels.label(v, dir).iter().map(|&(h, _)| h).collect();
                assert_eq!(hubs.len(), 2);
                assert!(hubs.contains(&0));
            }
        }
    }

    #[test]
    fn labels_sorted_by_construction() {
        let g = build(5, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1)], true);
        let order = order::by_degree(&g);
        let labels = Akiba::new(&g).run(&order);
        for v in 0..5 {
            for dir in Dir::BOTH {
                let l = labels.label(v, dir);
                assert!(l.windows(2).all(|w| w[0].0 < w[1].0), "hubs not strictly increasing");
            }
        }
    }

    #[test]
    fn disconnected_pairs_unreachable() {
        let g = build(4, &[(0, 1, 1), (2, 3, 1)], false);
        let order = order::by_degree(&g);
        let labels = Akiba::new(&g).run(&order);
        assert_eq!(labels.query(0, 1, Dir::Forward), 1);
        assert_eq!(labels.query(0, 3, Dir::Forward), INFTY);
        assert_eq!(labels.query(1, 0, Dir::Forward), INFTY);
    }
}

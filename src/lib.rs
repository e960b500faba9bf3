//! Hub labeling distance oracles.
//!
//! A hub labeling assigns every vertex a forward and a reverse list
//! of (hub, distance) entries such that any shortest u-to-v distance
//! is the best sum over hubs common to u's forward and v's reverse
//! list. This crate builds such labelings for weighted directed
//! graphs, entirely in memory:
//!
//! - [`akiba::Akiba`]: pruned labeling, the minimum hierarchical
//!   labeling consistent with a given vertex order.
//! - [`hhl::HhlBuilder`]: greedy hierarchical labeling for general
//!   graphs, discovering a good order and the labels together.
//! - [`uhhl::UhhlBuilder`]: the same greedy construction sped up for
//!   (emulated) unique shortest paths via subtree counting.
//! - [`ghl::GhlBuilder`]: approximately p-norm-optimal,
//!   non-hierarchical labels via iterated approximate
//!   maximum-density subgraphs.
//!
//! Construction flows from a [`graph::Graph`] through all-pairs
//! shortest-path tables ([`sp::ShortestPaths`]) into a greedy
//! selection loop that fills the [`labeling::Labeling`] store;
//! queries are a linear merge of two sorted lists. The greedy
//! builders keep Θ(n²) state and are meant for preprocessing-scale
//! inputs, not for graphs that do not fit such tables.

pub mod akiba;
pub mod check;
pub mod dijkstra;
pub mod ghl;
pub mod graph;
pub mod heap;
pub mod hhl;
pub mod labeling;
pub mod order;
pub mod progress;
pub mod sp;
pub mod uhhl;

pub use graph::{Arc, Dir, Distance, Graph, GraphBuilder, Vertex, INFTY, NONE};
pub use labeling::Labeling;

//! End-to-end scenarios: every builder on the reference graphs, each
//! result cross-validated against Dijkstra ground truth, plus
//! determinism and file round-trip checks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::tempdir;

use hublab::akiba::Akiba;
use hublab::check::check;
use hublab::ghl::GhlBuilder;
use hublab::hhl::{Greedy, HhlBuilder};
use hublab::uhhl::UhhlBuilder;
use hublab::{order, Dir, Distance, Graph, GraphBuilder, Labeling, Vertex, INFTY};

fn build(n: usize, arcs: &[(Vertex, Vertex, Distance)], undirected: bool) -> Graph {
    let mut b = GraphBuilder::new(n);
    for &(u, v, w) in arcs {
        b.add_arc(u, v, w, undirected).unwrap();
    }
    b.build()
}

fn path5() -> Graph {
    build(5, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1)], true)
}

fn same_queries(g: &Graph, a: &Labeling, b: &Labeling) -> bool {
    let n = g.num_vertices();
    (0..n).all(|u| (0..n).all(|v| a.query(u, v, Dir::Forward) == b.query(u, v, Dir::Forward)))
}

fn single_thread<T: Send>(f: impl FnOnce() -> T + Send) -> T {
    rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(f)
}

#[test]
fn scenario_path_graph() {
    let g = path5();
    let ord = order::by_degree(&g);
    let labels = Akiba::new(&g).run(&ord);
    assert_eq!(labels.query(0, 4, Dir::Forward), 4);
    assert!(labels.avg() <= 2.5, "path labels should stay small, got {}", labels.avg());
    assert!(check(&g, &labels));
}

#[test]
fn scenario_star_graph() {
    let g = build(5, &[(0, 1, 1), (0, 2, 1), (0, 3, 1), (0, 4, 1)], true);
    let ord = order::by_degree(&g);
    assert_eq!(ord[0], 0);
    let labels = Akiba::new(&g).run(&ord);
    assert_eq!(labels.query(1, 2, Dir::Forward), 2);
    assert_eq!(labels.query(2, 0, Dir::Forward), 1);
    assert!(labels.label(0, Dir::Forward).iter().any(|&(h, _)| h == 0));
    assert!(check(&g, &labels));
}

#[test]
fn scenario_triangle_with_shortcut() {
    // Directed, unique shortest paths: the weight-3 arc loses to the
    // two-hop route.
    let g = build(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 3)], false);
    let (_, general) = HhlBuilder::new(&g).run(Greedy::Path);
    let (_, usp) = UhhlBuilder::new(&g).run(Greedy::Path);
    assert_eq!(general.query(0, 2, Dir::Forward), 2);
    assert_eq!(usp.query(0, 2, Dir::Forward), 2);
    assert!(check(&g, &general));
    assert!(check(&g, &usp));
    assert!(same_queries(&g, &general, &usp));
}

#[test]
fn scenario_disconnected_pair() {
    let g = build(4, &[(0, 1, 1), (2, 3, 1)], false);
    for greedy in [Greedy::Path, Greedy::Label] {
        let (_, labels) = HhlBuilder::new(&g).run(greedy);
        assert_eq!(labels.query(0, 1, Dir::Forward), 1);
        assert_eq!(labels.query(0, 3, Dir::Forward), INFTY);
        assert!(check(&g, &labels));
    }
}

#[test]
fn scenario_non_usp_diamond() {
    // Two shortest 0-to-3 paths of length 2; both builders must stay
    // correct, the USP one by emulating unique paths.
    let g = build(4, &[(0, 1, 1), (0, 2, 1), (1, 3, 1), (2, 3, 1)], false);
    let (_, general) = HhlBuilder::new(&g).run(Greedy::Path);
    let (_, usp) = UhhlBuilder::new(&g).run(Greedy::Path);
    assert_eq!(general.query(0, 3, Dir::Forward), 2);
    assert_eq!(usp.query(0, 3, Dir::Forward), 2);
    assert!(check(&g, &general));
    assert!(check(&g, &usp));
}

#[test]
fn scenario_ghl_convergence() {
    let g = path5();
    let (ghl_labels, hhl_labels) = single_thread(|| {
        let ghl_labels = GhlBuilder::new(&g).run(1.1, 1.0);
        let (_, hhl_labels) = HhlBuilder::new(&g).run(Greedy::Path);
        (ghl_labels, hhl_labels)
    });
    assert!(check(&g, &ghl_labels));
    assert!(
        ghl_labels.avg() <= hhl_labels.avg() + 1e-9,
        "ghl avg {} exceeds hhl avg {}",
        ghl_labels.avg(),
        hhl_labels.avg()
    );
}

#[test]
fn hierarchical_builders_are_deterministic() {
    let g = path5();
    let (a1, a2, h1, h2) = single_thread(|| {
        let ord = order::by_degree(&g);
        let a1 = Akiba::new(&g).run(&ord);
        let a2 = Akiba::new(&g).run(&ord);
        let (o1, h1) = HhlBuilder::new(&g).run(Greedy::Path);
        let (o2, h2) = HhlBuilder::new(&g).run(Greedy::Path);
        assert_eq!(o1, o2);
        (a1, a2, h1, h2)
    });
    for v in 0..5 {
        for dir in Dir::BOTH {
            assert_eq!(a1.label(v, dir), a2.label(v, dir));
            assert_eq!(h1.label(v, dir), h2.label(v, dir));
        }
    }
}

#[test]
fn label_and_order_files_round_trip() {
    let g = path5();
    let dir = tempdir().unwrap();
    let label_path = dir.path().join("path5.labels");
    let order_path = dir.path().join("path5.order");

    let (ord, labels) = HhlBuilder::new(&g).run(Greedy::Path);
    labels.write(&label_path).unwrap();
    order::write(&order_path, &ord).unwrap();

    let labels_back = Labeling::read(&label_path, g.num_vertices()).unwrap();
    for v in 0..g.num_vertices() {
        for d in Dir::BOTH {
            assert_eq!(labels.label(v, d), labels_back.label(v, d));
        }
    }
    assert!(check(&g, &labels_back));

    let ord_back = order::read(&order_path).unwrap();
    assert_eq!(ord, ord_back);

    // The read-back order drives the pruned builder to a valid
    // labeling as well.
    let pruned = Akiba::new(&g).run(&ord_back);
    assert!(check(&g, &pruned));
}

#[test]
fn random_graph_cross_validation() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let n = 12;
    let mut b = GraphBuilder::new(n);
    for _ in 0..30 {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u != v {
            b.add_arc(u, v, rng.gen_range(1..=10), false).unwrap();
        }
    }
    let g = b.build();

    let ord = order::by_degree(&g);
    let pruned = Akiba::new(&g).run(&ord);
    assert!(check(&g, &pruned));

    for greedy in [Greedy::Path, Greedy::Label] {
        let (_, labels) = HhlBuilder::new(&g).run(greedy);
        assert!(check(&g, &labels));
        let (_, labels) = UhhlBuilder::new(&g).run(greedy);
        assert!(check(&g, &labels));
    }

    let labels = GhlBuilder::new(&g).run(1.1, 1.0);
    assert!(check(&g, &labels));
}

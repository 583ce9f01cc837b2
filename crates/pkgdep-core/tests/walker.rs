use std::collections::HashSet;

use pkgdep_core::{
    Cluster, ErrorKind, Graph, StaticClassifier, TraversalContext, Unit, UnitSet, WalkOptions,
    Walker, build_graph,
};
use pretty_assertions::assert_eq;

fn unit_set(root: Unit, rest: Vec<Unit>) -> UnitSet {
    let mut set = UnitSet::new(root.id.clone());
    for unit in rest {
        set.insert(unit);
    }
    set.insert_root(root);
    set
}

fn no_std() -> StaticClassifier {
    StaticClassifier::default()
}

fn edge_pairs(graph: &Graph) -> Vec<(&str, &str)> {
    graph
        .edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect()
}

fn node_ids(graph: &Graph) -> Vec<&str> {
    graph.nodes.iter().map(|n| n.id.as_str()).collect()
}

fn chain(len: usize) -> UnitSet {
    let ids: Vec<String> = (0..len).map(|i| format!("example.com/u{i}")).collect();
    let mut units: Vec<Unit> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let unit = Unit::new(id, format!("u{i}"));
            match ids.get(i + 1) {
                Some(next) => unit.with_import(next),
                None => unit,
            }
        })
        .collect();
    let root = units.remove(0);
    unit_set(root, units)
}

#[test]
fn cycle_terminates_with_each_edge_once() {
    let units = unit_set(
        Unit::new("a", "a").with_import("b"),
        vec![
            Unit::new("b", "b").with_import("c"),
            Unit::new("c", "c").with_import("a"),
        ],
    );

    let graph = build_graph(&units, &no_std(), &WalkOptions::default().with_max_depth(10)).unwrap();

    // c -> a closes the cycle as an edge to the existing root node
    assert_eq!(edge_pairs(&graph), vec![("a", "b"), ("b", "c"), ("c", "a")]);
    assert_eq!(node_ids(&graph), vec!["a", "b", "c"]);
    assert_eq!(graph.cluster.nesting_depth(), 3);
    let unique: HashSet<_> = edge_pairs(&graph).into_iter().collect();
    assert_eq!(unique.len(), graph.edges.len());
}

#[test]
fn self_import_is_suppressed() {
    let units = unit_set(Unit::new("a", "a").with_import("a"), vec![]);
    let graph = build_graph(&units, &no_std(), &WalkOptions::default()).unwrap();
    assert!(graph.edges.is_empty());
    assert_eq!(node_ids(&graph), vec!["a"]);
}

#[test]
fn depth_bound_limits_cluster_nesting() {
    let units = chain(5);
    let graph = build_graph(&units, &no_std(), &WalkOptions::default().with_max_depth(3)).unwrap();

    assert_eq!(graph.cluster.nesting_depth(), 3);
    assert_eq!(
        node_ids(&graph),
        vec!["example.com/u0", "example.com/u1", "example.com/u2"]
    );
    assert_eq!(graph.edges.len(), 2);
}

#[test]
fn depth_bound_of_one_keeps_only_root() {
    for max_depth in [0, 1] {
        let graph = build_graph(
            &chain(3),
            &no_std(),
            &WalkOptions::default().with_max_depth(max_depth),
        )
        .unwrap();
        assert_eq!(graph.cluster.nesting_depth(), 1);
        assert_eq!(node_ids(&graph), vec!["example.com/u0"]);
    }
}

#[test]
fn deep_chain_without_bound_pressure_is_fully_nested() {
    let graph = build_graph(&chain(5), &no_std(), &WalkOptions::default().with_max_depth(8)).unwrap();
    assert_eq!(graph.cluster.nesting_depth(), 5);
}

#[test]
fn diamond_yields_single_shared_node() {
    let units = unit_set(
        Unit::new("a", "a").with_import("b").with_import("c"),
        vec![
            Unit::new("b", "b").with_import("d"),
            Unit::new("c", "c").with_import("d"),
            Unit::new("d", "d"),
        ],
    );

    let graph = build_graph(&units, &no_std(), &WalkOptions::default().with_max_depth(5)).unwrap();

    let d_nodes = graph.nodes.iter().filter(|n| n.id == "d").count();
    assert_eq!(d_nodes, 1);
    let d_clustered = graph.cluster.node_ids().into_iter().filter(|id| *id == "d").count();
    assert_eq!(d_clustered, 1);
    assert_eq!(
        edge_pairs(&graph),
        vec![("a", "b"), ("b", "d"), ("a", "c"), ("c", "d")]
    );
    assert_eq!(graph.edges.iter().filter(|e| e.to == "d").count(), 2);
}

#[test]
fn standard_units_are_excluded() {
    let units = unit_set(
        Unit::new("example.com/app", "app")
            .with_import("fmt")
            .with_import("mypkg"),
        vec![Unit::new("fmt", "fmt"), Unit::new("mypkg", "mypkg").with_import("fmt")],
    );

    let graph = build_graph(&units, &StaticClassifier::new(["fmt"]), &WalkOptions::default()).unwrap();

    assert_eq!(node_ids(&graph), vec!["example.com/app", "mypkg"]);
    assert_eq!(edge_pairs(&graph), vec![("example.com/app", "mypkg")]);
    assert_eq!(graph.cluster.cluster_names(), vec!["example.com/app", "mypkg"]);
    assert!(!graph.has_node("fmt"));
}

#[test]
fn own_node_placement() {
    let units = unit_set(
        Unit::new("a", "a").with_import("b"),
        vec![Unit::new("b", "b").with_import("c"), Unit::new("c", "c")],
    );
    let classifier = no_std();
    let walker = Walker::new(&units, &classifier, WalkOptions::default().with_max_depth(5));

    let mut ctx = TraversalContext::new();
    ctx.mark_seen("a");
    let root = walker.walk(&mut ctx, units.get("a").unwrap(), 0);
    assert_eq!(root.nodes[0].id, "a");
    assert!(root.cluster.nodes.is_empty());

    let child: &Cluster = &root.cluster.clusters["b"];
    assert_eq!(child.nodes.len(), 1);
    assert_eq!(child.nodes[0].id, "b");

    let mut ctx = TraversalContext::new();
    let fragment = walker.walk(&mut ctx, units.get("b").unwrap(), 1);
    assert_eq!(fragment.nodes[0].id, "b");
    assert!(fragment.cluster.nodes.iter().any(|n| n.id == "b"));
    assert!(ctx.is_seen("c"));
}

#[test]
fn child_clusters_are_keyed_by_alias() {
    let units = unit_set(
        Unit::new("a", "a").with_aliased_import("lib", "example.com/vendor/lib"),
        vec![Unit::new("example.com/vendor/lib", "lib")],
    );
    let graph = build_graph(&units, &no_std(), &WalkOptions::default()).unwrap();
    let child = &graph.cluster.clusters["lib"];
    assert_eq!(child.name, "example.com/vendor/lib");
    assert_eq!(child.attrs["URL"], "/?f=example.com/vendor/lib");
}

#[test]
fn depth_omitted_units_get_no_edges() {
    // u0 -> u1 -> u2, and u0 -> u2 directly; u2 is marked seen at the bound
    let units = unit_set(
        Unit::new("u0", "u0").with_import("u1").with_import("u2"),
        vec![
            Unit::new("u1", "u1").with_import("u2"),
            Unit::new("u2", "u2"),
        ],
    );
    let graph = build_graph(&units, &no_std(), &WalkOptions::default().with_max_depth(2)).unwrap();
    assert_eq!(node_ids(&graph), vec!["u0", "u1"]);
    assert_eq!(edge_pairs(&graph), vec![("u0", "u1")]);
    for edge in &graph.edges {
        assert!(graph.has_node(&edge.from) && graph.has_node(&edge.to));
    }
}

#[test]
fn missing_import_target_is_omitted() {
    let units = unit_set(Unit::new("a", "a").with_import("ghost"), vec![]);
    let graph = build_graph(&units, &no_std(), &WalkOptions::default()).unwrap();
    assert!(graph.edges.is_empty());
    assert!(graph.cluster.clusters.is_empty());
}

#[test]
fn root_errors_fail_the_build() {
    let units = unit_set(Unit::new("a", "a").with_error("a.go:1:1: expected 'package'"), vec![]);
    let err = build_graph(&units, &no_std(), &WalkOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LoadFailed);
    assert!(err.message().contains("expected 'package'"));
}

#[test]
fn non_root_errors_do_not_fail_the_build() {
    let units = unit_set(
        Unit::new("a", "a").with_import("b"),
        vec![Unit::new("b", "b").with_error("b.go: syntax error")],
    );
    let graph = build_graph(&units, &no_std(), &WalkOptions::default()).unwrap();
    assert_eq!(node_ids(&graph), vec!["a", "b"]);
}

#[test]
fn empty_load_is_empty_result() {
    let err = build_graph(&UnitSet::new("./nothing"), &no_std(), &WalkOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert!(err.kind().is_load_failure());
}

#[test]
fn traversals_do_not_share_state() {
    let units = unit_set(
        Unit::new("a", "a").with_import("b"),
        vec![Unit::new("b", "b")],
    );
    let first = build_graph(&units, &no_std(), &WalkOptions::default()).unwrap();
    let second = build_graph(&units, &no_std(), &WalkOptions::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(node_ids(&second), vec!["a", "b"]);
}

#[test]
fn concurrent_traversals_are_complete() {
    let units = unit_set(
        Unit::new("a", "a").with_import("b").with_import("c"),
        vec![
            Unit::new("b", "b").with_import("d"),
            Unit::new("c", "c").with_import("d"),
            Unit::new("d", "d"),
        ],
    );
    let classifier = no_std();
    let options = WalkOptions::default().with_max_depth(5);
    let expected = build_graph(&units, &classifier, &options).unwrap();
    let (units, classifier, options) = (&units, &classifier, &options);
    let graphs: Vec<Graph> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(move || build_graph(units, classifier, options).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for graph in &graphs {
        assert_eq!(graph, &expected);
        assert_eq!(node_ids(graph), vec!["a", "b", "d", "c"]);
        assert_eq!(graph.edges.len(), 4);
    }
}

//! One-level view of a unit's direct imports.
//!
//! Unlike [`build_graph`](crate::build_graph) this does not recurse: the
//! root's node sits in a focus frame and each direct, non-standard import
//! gets its own cluster holding its node.

use crate::classify::UnitClassifier;
use crate::graph::{Cluster, Edge, Graph, GraphOptions, Node, attrs};
use crate::unit::{Unit, UnitSet};
use crate::walker::{root_unit, unit_node};
use crate::Result;

/// Name of the outer frame. Import paths never contain spaces, so no import
/// cluster can share it.
pub const FOCUS_CLUSTER: &str = "focus view";

fn import_node(units: &UnitSet, target: &str) -> Node {
    match units.get(target) {
        Some(unit) => unit_node(unit),
        None => unit_node(&Unit::new(target, target.rsplit('/').next().unwrap_or(target))),
    }
}

pub fn build_focus_graph(units: &UnitSet, classifier: &dyn UnitClassifier) -> Result<Graph> {
    let root = root_unit(units)?;

    let mut focus = Cluster::new(FOCUS_CLUSTER);
    focus.attrs = attrs([
        ("bgcolor", "#e6ecfa"),
        ("label", root.name.as_str()),
        ("labelloc", "t"),
        ("labeljust", "c"),
        ("fontsize", "18"),
    ]);

    let own = unit_node(root);
    let mut nodes = vec![own.clone()];
    let mut edges = Vec::new();

    for (alias, target) in &root.imports {
        if classifier.is_standard(target) {
            continue;
        }
        let node = import_node(units, target);
        let url = format!("/?f={}", target);
        let tooltip = format!("package: {}", target);

        let mut cluster = Cluster::new(target);
        cluster.attrs = attrs([
            ("penwidth", "0.8"),
            ("fontsize", "16"),
            ("label", alias.as_str()),
            ("style", "filled"),
            ("fillcolor", "lightyellow"),
            ("URL", url.as_str()),
            ("fontname", "Tahoma bold"),
            ("tooltip", tooltip.as_str()),
            ("rank", "sink"),
        ]);
        cluster.add_node(node.clone());

        edges.push(Edge::new(&own.id, &node.id).with_attrs(attrs([("color", "saddlebrown")])));
        nodes.push(node);
        focus.add_cluster(alias, cluster);
    }

    Ok(Graph {
        title: root.id.clone(),
        options: GraphOptions::default(),
        cluster: focus,
        nodes,
        edges,
    })
}

//! Graph model to DOT.
//!
//! Layout of the output:
//!
//! 1. graph attributes and node/edge defaults
//! 2. the root cluster, with each cluster's own nodes before its children
//! 3. nodes that belong to no cluster (the root's anchor node)
//! 4. every edge, at the outermost scope so cross-cluster edges route
//!
//! Attribute maps are ordered, so the same graph always yields the same bytes.

use std::collections::HashSet;

use pkgdep_core::{Attrs, Cluster, Graph};
use pkgdep_error::{Error, Result};

use crate::dot::DotBuilder;

fn pairs(attrs: &Attrs) -> impl Iterator<Item = (&str, &str)> {
    attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

/// Check that every edge endpoint is declared somewhere.
fn validate(graph: &Graph) -> Result<()> {
    let mut declared: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    declared.extend(graph.cluster.node_ids());

    for edge in &graph.edges {
        for endpoint in [&edge.from, &edge.to] {
            if !declared.contains(endpoint.as_str()) {
                return Err(Error::serialization_failed(format!(
                    "edge {} -> {} references unknown node {}",
                    edge.from, edge.to, endpoint
                ))
                .with_operation("serialize::validate"));
            }
        }
    }
    Ok(())
}

fn write_cluster(dot: &mut DotBuilder, cluster: &Cluster) {
    dot.start_cluster(&cluster.name);
    for (key, value) in &cluster.attrs {
        dot.attr(key, value);
    }
    for node in &cluster.nodes {
        dot.node(&node.id, pairs(&node.attrs));
    }
    for child in cluster.clusters.values() {
        write_cluster(dot, child);
    }
    dot.end_cluster();
}

/// Encode the graph as a Graphviz digraph.
pub fn serialize(graph: &Graph) -> Result<String> {
    validate(graph)?;
    let options = &graph.options;

    let mut dot = DotBuilder::new("pkgdep");
    dot.attr("label", &graph.title)
        .attr("labeljust", "l")
        .attr("fontname", "Arial")
        .attr("fontsize", "14")
        .attr("rankdir", &options.rankdir)
        .attr("bgcolor", "lightgray")
        .attr("style", "solid")
        .attr("penwidth", "0.5")
        .attr("pad", "0.0")
        .attr("nodesep", &options.nodesep)
        .blank()
        .node_defaults([
            ("shape", options.nodeshape.as_str()),
            ("style", options.nodestyle.as_str()),
            ("fillcolor", "honeydew"),
            ("fontname", "Verdana"),
            ("penwidth", "1.0"),
            ("margin", "0.05,0.0"),
        ])
        .edge_defaults([("minlen", options.minlen.as_str())])
        .blank();

    write_cluster(&mut dot, &graph.cluster);
    dot.blank();

    let clustered = graph.clustered_node_ids();
    let mut declared = HashSet::new();
    for node in &graph.nodes {
        if clustered.contains(node.id.as_str()) || !declared.insert(node.id.as_str()) {
            continue;
        }
        dot.node(&node.id, pairs(&node.attrs));
    }

    for edge in &graph.edges {
        dot.edge(&edge.from, &edge.to, pairs(&edge.attrs));
    }

    Ok(dot.build())
}

//! The graph model handed to the serializer.
//!
//! A [`Graph`] holds a tree of [`Cluster`]s (one per visited unit), the
//! flattened node list of the whole traversal, and every edge. Edges are kept
//! at graph level so they can cross cluster boundaries.

use std::collections::{BTreeMap, HashSet};

/// Attribute map. Keys are unique and a later write replaces an earlier one.
pub type Attrs = BTreeMap<String, String>;

/// Build an attribute map from literal pairs.
pub fn attrs<const N: usize>(pairs: [(&str, &str); N]) -> Attrs {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unit id.
    pub id: String,
    pub attrs: Attrs,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attrs: Attrs::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs.extend(attrs);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub attrs: Attrs,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            attrs: Attrs::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs.extend(attrs);
        self
    }
}

/// A named, attributed container of nodes and nested clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    /// Unique across the graph; becomes the subgraph id.
    pub name: String,
    pub attrs: Attrs,
    pub nodes: Vec<Node>,
    /// Child clusters keyed by import alias.
    pub clusters: BTreeMap<String, Cluster>,
}

impl Cluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_cluster(&mut self, key: impl Into<String>, cluster: Cluster) {
        self.clusters.insert(key.into(), cluster);
    }

    /// Levels of nesting, counting this cluster as 1.
    pub fn nesting_depth(&self) -> usize {
        1 + self
            .clusters
            .values()
            .map(Cluster::nesting_depth)
            .max()
            .unwrap_or(0)
    }

    /// Whether this cluster or any descendant owns the node.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
            || self.clusters.values().any(|c| c.contains_node(id))
    }

    /// Ids of every node owned by this cluster or a descendant.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_node_ids(&mut ids);
        ids
    }

    fn collect_node_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.extend(self.nodes.iter().map(|n| n.id.as_str()));
        for child in self.clusters.values() {
            child.collect_node_ids(out);
        }
    }

    /// Names of this cluster and every descendant, depth first.
    pub fn cluster_names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        for child in self.clusters.values() {
            names.extend(child.cluster_names());
        }
        names
    }
}

/// Graph-level layout options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    pub rankdir: String,
    pub nodesep: String,
    pub minlen: String,
    pub nodeshape: String,
    pub nodestyle: String,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            rankdir: "LR".to_string(),
            nodesep: "0.35".to_string(),
            minlen: "2".to_string(),
            nodeshape: "box".to_string(),
            nodestyle: "filled,rounded".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub title: String,
    pub options: GraphOptions,
    pub cluster: Cluster,
    /// Every node produced by the traversal, root first.
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Whether `id` is declared anywhere in the graph.
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id) || self.cluster.contains_node(id)
    }

    /// Ids of the nodes owned by some cluster.
    pub fn clustered_node_ids(&self) -> HashSet<&str> {
        self.cluster.node_ids().into_iter().collect()
    }
}

//! Recursive dependency traversal.
//!
//! [`Walker::walk`] turns a unit and everything it imports into a
//! [`Fragment`]: a cluster for the unit with one nested cluster per expanded
//! import, the nodes produced along the way, and the edges between them.
//! Expansion stops at units already seen in this traversal and at the depth
//! bound. Neither is an error; both are logged and left out of the graph.
//! An import of a unit whose node already exists still gets an edge, so
//! shared dependencies show every importer.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::classify::UnitClassifier;
use crate::graph::{Cluster, Edge, Graph, GraphOptions, Node, attrs};
use crate::unit::{Unit, UnitSet};
use crate::{Error, Result};

/// Traversal limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Maximum traversal depth; the root is depth 0. A value of 0 behaves
    /// like 1 and yields the root alone.
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

impl WalkOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Mutable state of one traversal. Created per request and dropped with it.
#[derive(Debug, Default)]
pub struct TraversalContext {
    seen: HashSet<String>,
    emitted: HashSet<String>,
    linked: HashSet<(String, String)>,
    skipped_seen: usize,
    skipped_depth: usize,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as visited. Returns false if it was already seen.
    pub fn mark_seen(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Whether a node for `id` has been produced in this traversal.
    pub fn is_emitted(&self, id: &str) -> bool {
        self.emitted.contains(id)
    }

    /// Record an edge. Returns false if it was already recorded.
    fn link(&mut self, from: &str, to: &str) -> bool {
        self.linked.insert((from.to_string(), to.to_string()))
    }

    /// Imports left out because their unit was already visited.
    pub fn skipped_seen(&self) -> usize {
        self.skipped_seen
    }

    /// Imports left out because of the depth bound.
    pub fn skipped_depth(&self) -> usize {
        self.skipped_depth
    }
}

/// The result of walking one unit. `nodes[0]` is always the unit's own node.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub cluster: Cluster,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Node for a unit.
pub fn unit_node(unit: &Unit) -> Node {
    Node::new(&unit.id).with_attrs(attrs([
        ("fillcolor", "lightblue"),
        ("label", unit.name.as_str()),
        ("penwidth", "0.5"),
        ("tooltip", unit.id.as_str()),
    ]))
}

fn import_edge(from: &str, to: &str) -> Edge {
    Edge::new(from, to).with_attrs(attrs([("color", "saddlebrown")]))
}

/// Cluster for a recursively visited unit.
fn unit_cluster(unit: &Unit) -> Cluster {
    let url = format!("/?f={}", unit.id);
    let tooltip = match &unit.dir {
        Some(dir) => format!("package: {}\n{}", unit.id, dir.display()),
        None => format!("package: {}", unit.id),
    };
    let mut cluster = Cluster::new(&unit.id);
    cluster.attrs = attrs([
        ("penwidth", "0.8"),
        ("fontsize", "16"),
        ("label", unit.id.as_str()),
        ("style", "filled"),
        ("fillcolor", "lightyellow"),
        ("URL", url.as_str()),
        ("fontname", "Tahoma bold"),
        ("tooltip", tooltip.as_str()),
        ("rank", "sink"),
    ]);
    cluster.set_attr("bgcolor", "#e6ecfa");
    cluster
}

pub struct Walker<'a> {
    units: &'a UnitSet,
    classifier: &'a dyn UnitClassifier,
    options: WalkOptions,
}

impl<'a> Walker<'a> {
    pub fn new(units: &'a UnitSet, classifier: &'a dyn UnitClassifier, options: WalkOptions) -> Self {
        Self {
            units,
            classifier,
            options,
        }
    }

    fn max_depth(&self) -> usize {
        self.options.max_depth.max(1)
    }

    /// Walk `unit` at `depth` (0 for the root).
    ///
    /// The root's own node stays out of its cluster so it renders as an
    /// anchor outside the outermost frame; every other unit's node is placed
    /// in its own cluster.
    pub fn walk(&self, ctx: &mut TraversalContext, unit: &Unit, depth: usize) -> Fragment {
        ctx.emitted.insert(unit.id.clone());
        let mut cluster = unit_cluster(unit);
        let own = unit_node(unit);
        let mut nodes = vec![own.clone()];
        let mut edges = Vec::new();

        for (alias, target) in &unit.imports {
            if self.classifier.is_standard(target) {
                continue;
            }
            if !ctx.mark_seen(target) {
                debug!(from = %unit.id, import = %target, "already seen, skipping");
                ctx.skipped_seen += 1;
                if *target != unit.id && ctx.is_emitted(target) && ctx.link(&unit.id, target) {
                    edges.push(import_edge(&own.id, target));
                }
                continue;
            }
            if depth + 1 == self.max_depth() {
                debug!(from = %unit.id, import = %target, depth, "depth bound reached");
                ctx.skipped_depth += 1;
                continue;
            }
            let Some(imported) = self.units.get(target) else {
                warn!(from = %unit.id, import = %target, "import not reported by loader");
                continue;
            };

            let child = self.walk(ctx, imported, depth + 1);
            ctx.link(&own.id, &child.nodes[0].id);
            edges.push(import_edge(&own.id, &child.nodes[0].id));
            edges.extend(child.edges);
            nodes.extend(child.nodes);
            cluster.add_cluster(alias, child.cluster);
        }

        if depth > 0 {
            cluster.add_node(own);
        }

        Fragment {
            cluster,
            nodes,
            edges,
        }
    }
}

/// Pick the root unit of a load, failing if there is none or it has errors.
pub fn root_unit(units: &UnitSet) -> Result<&Unit> {
    let Some(root) = units.root() else {
        return Err(Error::empty_result(units.pattern()).with_operation("walker::root_unit"));
    };
    if root.has_errors() {
        return Err(Error::load_failed(units.pattern(), root.errors.join("; "))
            .with_operation("walker::root_unit")
            .with_context("unit", root.id.clone()));
    }
    Ok(root)
}

/// Build the dependency graph rooted at the load's root unit.
pub fn build_graph(
    units: &UnitSet,
    classifier: &dyn UnitClassifier,
    options: &WalkOptions,
) -> Result<Graph> {
    let start = Instant::now();
    let root = root_unit(units)?;

    let mut ctx = TraversalContext::new();
    ctx.mark_seen(&root.id);
    let walker = Walker::new(units, classifier, options.clone());
    let fragment = walker.walk(&mut ctx, root, 0);

    info!(
        "Dependency walk of {}: {:.3}s ({} units, {} edges, {} seen skips, {} depth skips)",
        root.id,
        start.elapsed().as_secs_f64(),
        fragment.nodes.len(),
        fragment.edges.len(),
        ctx.skipped_seen(),
        ctx.skipped_depth()
    );

    Ok(Graph {
        title: root.id.clone(),
        options: GraphOptions::default(),
        cluster: fragment.cluster,
        nodes: fragment.nodes,
        edges: fragment.edges,
    })
}

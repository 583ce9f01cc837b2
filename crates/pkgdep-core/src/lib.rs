//! Dependency graph construction for pkgdep.
//!
//! A [`UnitLoader`] resolves a pattern into a [`UnitSet`], a [`UnitClassifier`]
//! prunes standard units, and [`build_graph`] walks the imports from the root
//! unit into a nested [`Graph`] of clusters, nodes and edges.
//!
//! # Module Structure
//!
//! - [`unit`]: loaded unit metadata
//! - [`loader`]: loader trait and the in-memory loader
//! - [`golist`]: loader backed by `go list`
//! - [`classify`]: standard-unit classification
//! - [`graph`]: the cluster/node/edge graph model
//! - [`walker`]: recursive dependency traversal
//! - [`focus`]: one-level view of a unit's direct imports

pub mod classify;
pub mod focus;
pub mod golist;
pub mod graph;
pub mod loader;
pub mod unit;
pub mod walker;

pub use classify::{
    GorootClassifier, StaticClassifier, UncertainPolicy, UnitClassifier, resolve_goroot,
};
pub use focus::{FOCUS_CLUSTER, build_focus_graph};
pub use golist::GoListLoader;
pub use graph::{Attrs, Cluster, Edge, Graph, GraphOptions, Node};
pub use loader::{MemoryLoader, UnitLoader};
pub use pkgdep_error::{Error, ErrorKind, Result};
pub use unit::{Unit, UnitSet};
pub use walker::{
    Fragment, TraversalContext, WalkOptions, Walker, build_graph, root_unit, unit_node,
};

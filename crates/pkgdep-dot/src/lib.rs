//! DOT output for pkgdep.
//!
//! [`serialize`] encodes a [`Graph`](pkgdep_core::Graph) as a Graphviz
//! digraph with one `cluster_` subgraph per visited unit, and a [`Renderer`]
//! turns that description into an image.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT builder and escaping helpers
//! - [`serialize`]: graph model to DOT
//! - [`render`]: output formats and the Graphviz renderer

pub mod dot;
pub mod render;
pub mod serialize;

pub use dot::DotBuilder;
pub use render::{Artifact, GraphvizRenderer, OutputFormat, Renderer};
pub use serialize::serialize;

//! Request pipeline: load → walk → serialize → render.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tracing::info;

use pkgdep_core::{UnitClassifier, UnitLoader, WalkOptions, build_focus_graph, build_graph};
use pkgdep_dot::{Artifact, OutputFormat, Renderer, serialize};
use pkgdep_error::Result;

/// Which graph to build for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GraphView {
    /// Recursive dependency graph, bounded by the walk depth.
    #[default]
    Deps,
    /// The unit and its direct non-standard imports only.
    Focus,
}

/// Everything one request needs, shared across requests. Holds no
/// per-traversal state; each call builds its own.
pub struct Pipeline {
    loader: Arc<dyn UnitLoader>,
    classifier: Arc<dyn UnitClassifier>,
    renderer: Arc<dyn Renderer>,
    walk: WalkOptions,
    format: OutputFormat,
}

impl Pipeline {
    pub fn new(
        loader: Arc<dyn UnitLoader>,
        classifier: Arc<dyn UnitClassifier>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            loader,
            classifier,
            renderer,
            walk: WalkOptions::default(),
            format: OutputFormat::default(),
        }
    }

    pub fn with_walk_options(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the DOT description of `pattern`.
    pub fn describe(&self, pattern: &str, view: GraphView) -> Result<String> {
        let load_start = Instant::now();
        let units = self.loader.load(pattern)?;
        info!(
            "Loading {}: {:.2}s ({} units)",
            pattern,
            load_start.elapsed().as_secs_f64(),
            units.len()
        );

        let graph = match view {
            GraphView::Deps => build_graph(&units, self.classifier.as_ref(), &self.walk)?,
            GraphView::Focus => build_focus_graph(&units, self.classifier.as_ref())?,
        };

        let dot_start = Instant::now();
        let description = serialize(&graph)?;
        info!(
            "Serializing: {:.3}s ({} bytes)",
            dot_start.elapsed().as_secs_f64(),
            description.len()
        );
        Ok(description)
    }

    /// Build and render `pattern` in the configured format.
    pub fn render(&self, pattern: &str, view: GraphView) -> Result<Artifact> {
        let start = Instant::now();
        let description = self.describe(pattern, view)?;
        let artifact = self.renderer.render(description.as_bytes(), self.format)?;
        info!("Total for {}: {:.2}s", pattern, start.elapsed().as_secs_f64());
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgdep_core::{ErrorKind, MemoryLoader, StaticClassifier, Unit};
    use pkgdep_dot::render::artifact_file;

    /// Writes the description itself as the artifact.
    struct EchoRenderer;

    impl Renderer for EchoRenderer {
        fn render(&self, description: &[u8], format: OutputFormat) -> Result<Artifact> {
            let path = artifact_file(format)?;
            std::fs::write(&path, description)?;
            Ok(Artifact::new(path, format))
        }
    }

    fn pipeline() -> Pipeline {
        let loader = MemoryLoader::new()
            .with_unit(
                Unit::new("example.com/app", "main")
                    .with_import("example.com/lib")
                    .with_import("fmt"),
            )
            .with_unit(Unit::new("example.com/lib", "lib"));
        Pipeline::new(
            Arc::new(loader),
            Arc::new(StaticClassifier::new(["fmt"])),
            Arc::new(EchoRenderer),
        )
    }

    #[test]
    fn test_describe_views() {
        let pipeline = pipeline();
        let deps = pipeline.describe("example.com/app", GraphView::Deps).unwrap();
        assert!(deps.contains("subgraph \"cluster_example.com/lib\" {"));
        assert!(!deps.contains("\"fmt\""));

        let focus = pipeline.describe("example.com/app", GraphView::Focus).unwrap();
        assert!(focus.contains("subgraph \"cluster_focus view\" {"));
    }

    #[test]
    fn test_render_uses_configured_format() {
        let pipeline = pipeline().with_format(OutputFormat::Png);
        let artifact = pipeline.render("example.com/app", GraphView::Deps).unwrap();
        assert_eq!(artifact.format(), OutputFormat::Png);
        assert!(artifact.read().unwrap().starts_with(b"digraph"));
    }

    #[test]
    fn test_unknown_pattern_is_empty_result() {
        let err = pipeline().describe("example.com/nope", GraphView::Deps).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }
}

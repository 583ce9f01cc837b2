//! pkgdep command-line interface and HTTP server.
//!
//! [`run`] wires the `go list` loader, the GOROOT classifier and the Graphviz
//! renderer into a [`Pipeline`], then either prints one description
//! (`--once`) or serves rendered graphs over HTTP.

pub mod options;
pub mod pipeline;
pub mod server;

use std::sync::Arc;

use tracing::info;

use pkgdep_core::{GoListLoader, GorootClassifier, resolve_goroot};
use pkgdep_dot::GraphvizRenderer;
use pkgdep_error::{Error, Result};

pub use options::Cli;
pub use pipeline::{GraphView, Pipeline};
pub use server::{AppState, router, serve};

/// Wire the `go list` loader, GOROOT classifier and Graphviz renderer
/// according to the options.
pub fn build_pipeline(cli: &Cli) -> Result<Pipeline> {
    let goroot = resolve_goroot(cli.goroot.as_deref(), &cli.go_binary)?;
    info!(goroot = %goroot.display(), "standard units resolved under GOROOT");

    let loader = GoListLoader::new()
        .with_go(&cli.go_binary)
        .with_workdir(cli.workdir.clone())
        .with_include_tests(cli.include_tests);

    Ok(Pipeline::new(
        Arc::new(loader),
        Arc::new(GorootClassifier::new(goroot)),
        Arc::new(GraphvizRenderer::new(&cli.dot_binary)),
    )
    .with_walk_options(cli.walk_options())
    .with_format(cli.format))
}

/// Print the description of the root once.
pub fn run_once(cli: &Cli, pipeline: &Pipeline) -> Result<()> {
    let description = pipeline.describe(&cli.root, cli.view)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &description).map_err(|e| {
                Error::from(e)
                    .with_operation("cli::write_output")
                    .with_context("path", path.display().to_string())
            })?;
            info!(path = %path.display(), "output written");
        }
        None => print!("{description}"),
    }
    Ok(())
}

pub async fn run(cli: Cli) -> Result<()> {
    let pipeline = build_pipeline(&cli)?;
    if cli.once {
        return run_once(&cli, &pipeline);
    }
    serve(cli.addr, AppState::new(pipeline, cli.root.clone())).await
}

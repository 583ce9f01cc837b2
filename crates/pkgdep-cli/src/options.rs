//! Command-line options.
//!
//! Every flag has an environment fallback so the server can be configured
//! without arguments when run under a supervisor.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use pkgdep_core::WalkOptions;
use pkgdep_dot::OutputFormat;

use crate::pipeline::GraphView;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pkgdep",
    about = "pkgdep: browse the import graph of a Go package",
    version
)]
pub struct Cli {
    /// Load test variants of packages as well
    #[arg(long, env = "PKGDEP_INCLUDE_TESTS", default_value_t = false)]
    pub include_tests: bool,

    /// Package directory or import path to graph when a request names none
    #[arg(long, env = "PKGDEP_ROOT", value_name = "PATTERN", default_value = "./cmd/stringer")]
    pub root: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "PKGDEP_ADDR", default_value = "127.0.0.1:9000")]
    pub addr: SocketAddr,

    /// Maximum cluster nesting depth, counting the root as 1
    #[arg(long, env = "PKGDEP_MAX_DEPTH", default_value_t = 3)]
    pub max_depth: usize,

    /// Image format: svg, png, jpg or pdf
    #[arg(long, env = "PKGDEP_FORMAT", default_value = "svg")]
    pub format: OutputFormat,

    /// Directory `go list` runs in (defaults to the current directory)
    #[arg(long, env = "PKGDEP_WORKDIR", value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Go installation root used to recognize standard packages
    #[arg(long, env = "PKGDEP_GOROOT", value_name = "DIR")]
    pub goroot: Option<PathBuf>,

    /// Graphviz `dot` binary
    #[arg(long = "dot", env = "PKGDEP_DOT", value_name = "BIN", default_value = "dot")]
    pub dot_binary: PathBuf,

    /// Go toolchain binary
    #[arg(long = "go", env = "PKGDEP_GO", value_name = "BIN", default_value = "go")]
    pub go_binary: PathBuf,

    /// Print the DOT description of the root once instead of serving
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// View to print with --once: deps or focus
    #[arg(long, value_enum, default_value = "deps")]
    pub view: GraphView,

    /// Output file for --once (writes to stdout otherwise)
    #[arg(short = 'o', long = "output", value_name = "FILE", requires = "once")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions::default().with_max_depth(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pkgdep"]).unwrap();
        assert_eq!(cli.root, "./cmd/stringer");
        assert_eq!(cli.addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.max_depth, 3);
        assert_eq!(cli.format, OutputFormat::Svg);
        assert_eq!(cli.dot_binary, PathBuf::from("dot"));
        assert_eq!(cli.go_binary, PathBuf::from("go"));
        assert!(!cli.include_tests);
        assert!(!cli.once);
        assert_eq!(cli.view, GraphView::Deps);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "pkgdep",
            "--root",
            "./cmd/app",
            "--max-depth",
            "5",
            "--format",
            "png",
            "--include-tests",
            "--once",
            "--view",
            "focus",
            "-o",
            "graph.dot",
        ])
        .unwrap();
        assert_eq!(cli.root, "./cmd/app");
        assert_eq!(cli.walk_options().max_depth, 5);
        assert_eq!(cli.format, OutputFormat::Png);
        assert!(cli.include_tests);
        assert_eq!(cli.view, GraphView::Focus);
        assert_eq!(cli.output, Some(PathBuf::from("graph.dot")));
    }

    #[test]
    fn test_output_requires_once() {
        assert!(Cli::try_parse_from(["pkgdep", "-o", "graph.dot"]).is_err());
        assert!(Cli::try_parse_from(["pkgdep", "--format", "gif"]).is_err());
    }
}

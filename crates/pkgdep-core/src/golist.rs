//! Unit loading through `go list`.
//!
//! `go list -e -json -deps` prints one JSON object per package, dependencies
//! first. Packages named on the command line carry no `DepOnly` flag; those
//! become the roots of the [`UnitSet`].

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, info};

use crate::loader::UnitLoader;
use crate::unit::{Unit, UnitSet};
use crate::{Error, Result};

/// The subset of `go list -json` output the graph needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackage {
    import_path: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    import_map: HashMap<String, String>,
    #[serde(default)]
    error: Option<GoPackageError>,
    #[serde(default)]
    dep_only: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackageError {
    #[serde(default)]
    pos: String,
    err: String,
}

impl GoPackageError {
    fn describe(&self) -> String {
        if self.pos.is_empty() {
            self.err.clone()
        } else {
            format!("{}: {}", self.pos, self.err)
        }
    }
}

impl From<GoPackage> for Unit {
    fn from(pkg: GoPackage) -> Self {
        // `Imports` holds resolved paths; `ImportMap` maps source paths to
        // resolved ones when they differ (vendoring, test variants).
        let mut imports: BTreeMap<String, String> = pkg
            .imports
            .into_iter()
            .filter(|path| path != "C")
            .map(|path| (path.clone(), path))
            .collect();
        for (source, resolved) in pkg.import_map {
            imports.remove(&resolved);
            imports.insert(source, resolved);
        }

        let name = if pkg.name.is_empty() {
            last_segment(&pkg.import_path).to_string()
        } else {
            pkg.name
        };

        Unit {
            id: pkg.import_path,
            name,
            dir: pkg.dir,
            imports,
            errors: pkg.error.iter().map(GoPackageError::describe).collect(),
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Decode the concatenated JSON objects printed by `go list -json`.
pub fn parse_go_list(pattern: &str, output: &[u8]) -> Result<UnitSet> {
    let mut set = UnitSet::new(pattern);
    let stream = serde_json::Deserializer::from_slice(output).into_iter::<GoPackage>();
    for pkg in stream {
        let pkg = pkg.map_err(|e| {
            Error::load_failed(pattern, "malformed go list output")
                .with_operation("golist::parse")
                .set_source(e)
        })?;
        let dep_only = pkg.dep_only;
        let unit = Unit::from(pkg);
        if dep_only {
            set.insert(unit);
        } else {
            set.insert_root(unit);
        }
    }
    Ok(set)
}

/// Loads units by running the `go` tool.
#[derive(Debug, Clone)]
pub struct GoListLoader {
    go: PathBuf,
    workdir: Option<PathBuf>,
    include_tests: bool,
}

impl Default for GoListLoader {
    fn default() -> Self {
        Self {
            go: PathBuf::from("go"),
            workdir: None,
            include_tests: false,
        }
    }
}

impl GoListLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_go(mut self, go: impl Into<PathBuf>) -> Self {
        self.go = go.into();
        self
    }

    /// Directory `go list` runs in; relative patterns resolve against it.
    pub fn with_workdir(mut self, workdir: Option<PathBuf>) -> Self {
        self.workdir = workdir;
        self
    }

    /// Include test packages and test-only imports.
    pub fn with_include_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    pub fn args(&self, pattern: &str) -> Vec<String> {
        let mut args = vec![
            "list".to_string(),
            "-e".to_string(),
            "-json".to_string(),
            "-deps".to_string(),
        ];
        if self.include_tests {
            args.push("-test".to_string());
        }
        args.push("--".to_string());
        args.push(pattern.to_string());
        args
    }
}

impl UnitLoader for GoListLoader {
    fn load(&self, pattern: &str) -> Result<UnitSet> {
        if pattern.starts_with('-') {
            return Err(Error::invalid_argument(format!("pattern {pattern} looks like a flag"))
                .with_operation("golist::load")
                .with_context("pattern", pattern));
        }
        let start = Instant::now();
        let mut command = Command::new(&self.go);
        command.args(self.args(pattern));
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }
        debug!(go = %self.go.display(), pattern, "running go list");

        let output = command.output().map_err(|e| {
            Error::load_failed(pattern, format!("failed to run {}", self.go.display()))
                .with_operation("golist::load")
                .set_source(e)
        })?;

        // With -e, go list reports per-package errors in the JSON and exits
        // non-zero only when it could not produce any output.
        if !output.status.success() && output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::load_failed(pattern, stderr.trim().to_string())
                .with_operation("golist::load")
                .with_context("status", output.status.to_string()));
        }

        let set = parse_go_list(pattern, &output.stdout)
            .map_err(|e| e.with_operation("golist::load"))?;
        info!(
            "go list {}: {:.2}s ({} packages)",
            pattern,
            start.elapsed().as_secs_f64(),
            set.len()
        );
        Ok(set)
    }
}

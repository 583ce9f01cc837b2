//! Standard-unit classification.
//!
//! Imports that ship with the Go toolchain are pruned from the graph. A unit
//! is standard when `<GOROOT>/src/<import path>` is a directory.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Decides whether an import belongs to the toolchain's foundation layer.
pub trait UnitClassifier: Send + Sync {
    fn is_standard(&self, import_path: &str) -> bool;
}

/// What to do when the filesystem cannot answer the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UncertainPolicy {
    /// Treat the unit as non-standard and keep it in the graph.
    #[default]
    Include,
    /// Treat the unit as standard and prune it.
    Exclude,
}

impl UncertainPolicy {
    fn is_standard(self) -> bool {
        matches!(self, UncertainPolicy::Exclude)
    }
}

/// Classifies by probing the GOROOT source tree. Answers are cached for the
/// lifetime of the classifier, which may be shared across requests.
#[derive(Debug)]
pub struct GorootClassifier {
    src_root: PathBuf,
    policy: UncertainPolicy,
    cache: RwLock<HashMap<String, bool>>,
}

impl GorootClassifier {
    pub fn new(goroot: impl AsRef<Path>) -> Self {
        Self {
            src_root: goroot.as_ref().join("src"),
            policy: UncertainPolicy::default(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_policy(mut self, policy: UncertainPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn in_goroot(&self, import_path: &str) -> bool {
        // Test variants look like "p [q.test]"; classify the package itself.
        let path = import_path.split(" [").next().unwrap_or(import_path);
        let relative = Path::new(path);
        let plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return false;
        }

        match std::fs::metadata(self.src_root.join(relative)) {
            Ok(meta) => meta.is_dir(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(import_path, error = %e, policy = ?self.policy, "cannot classify import");
                self.policy.is_standard()
            }
        }
    }
}

impl UnitClassifier for GorootClassifier {
    fn is_standard(&self, import_path: &str) -> bool {
        if let Some(&cached) = self.cache.read().get(import_path) {
            return cached;
        }
        let standard = self.in_goroot(import_path);
        self.cache.write().insert(import_path.to_string(), standard);
        standard
    }
}

/// A classifier over a fixed list of standard import paths.
#[derive(Debug, Clone, Default)]
pub struct StaticClassifier {
    standard: HashSet<String>,
}

impl StaticClassifier {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            standard: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl UnitClassifier for StaticClassifier {
    fn is_standard(&self, import_path: &str) -> bool {
        self.standard.contains(import_path)
    }
}

/// Find the GOROOT: an explicit path wins, then `$GOROOT`, then `go env GOROOT`.
pub fn resolve_goroot(explicit: Option<&Path>, go: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os("GOROOT").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let output = Command::new(go).args(["env", "GOROOT"]).output().map_err(|e| {
        Error::config_invalid("cannot determine GOROOT; pass --goroot")
            .with_operation("classify::resolve_goroot")
            .set_source(e)
    })?;
    let goroot = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || goroot.is_empty() {
        return Err(Error::config_invalid("`go env GOROOT` returned nothing; pass --goroot")
            .with_operation("classify::resolve_goroot"));
    }
    debug!(goroot, "resolved GOROOT from go env");
    Ok(PathBuf::from(goroot))
}

//! Loaded unit metadata.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// One resolvable dependency: a Go package as reported by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Import path, unique within one [`UnitSet`].
    pub id: String,
    /// Short display name (the package clause).
    pub name: String,
    /// Source directory, when the loader knows it.
    pub dir: Option<PathBuf>,
    /// Import alias (path as written in source) -> target unit id.
    pub imports: BTreeMap<String, String>,
    /// Load or parse errors attached to this unit.
    pub errors: Vec<String>,
}

impl Unit {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dir: None,
            imports: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// Add an import whose alias is the target's own path.
    pub fn with_import(self, target: impl Into<String>) -> Self {
        let target = target.into();
        self.with_aliased_import(target.clone(), target)
    }

    pub fn with_aliased_import(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.imports.insert(alias.into(), target.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Test variants produced by `go list -test`: `p [p.test]` and `p.test`.
    pub fn is_test_variant(&self) -> bool {
        self.id.contains(" [") || self.id.ends_with(".test")
    }
}

/// The result of one load: the root units in load order plus every unit
/// reachable from them, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct UnitSet {
    pattern: String,
    roots: Vec<String>,
    units: HashMap<String, Unit>,
}

impl UnitSet {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            roots: Vec::new(),
            units: HashMap::new(),
        }
    }

    /// The pattern this set was loaded for.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Insert a unit, replacing any earlier unit with the same id.
    pub fn insert(&mut self, unit: Unit) {
        self.units.insert(unit.id.clone(), unit);
    }

    /// Insert a unit and record it as a root.
    pub fn insert_root(&mut self, unit: Unit) {
        if !self.roots.contains(&unit.id) {
            self.roots.push(unit.id.clone());
        }
        self.insert(unit);
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Unit> {
        self.roots.iter().filter_map(|id| self.units.get(id))
    }

    /// The unit a graph is rooted at: the first root that is not a test
    /// variant, falling back to the first root.
    pub fn root(&self) -> Option<&Unit> {
        self.roots()
            .find(|unit| !unit.is_test_variant())
            .or_else(|| self.roots().next())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

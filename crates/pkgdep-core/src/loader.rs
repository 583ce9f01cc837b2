//! Unit loading.

use crate::Result;
use crate::unit::{Unit, UnitSet};

/// Resolves a pattern (a directory or import path) into the set of units
/// reachable from it.
///
/// Implementations may block; callers on an async runtime should run them on
/// a blocking thread.
pub trait UnitLoader: Send + Sync {
    fn load(&self, pattern: &str) -> Result<UnitSet>;
}

/// A loader over a fixed set of units. A pattern loads the unit whose id
/// equals it, plus everything else the loader holds; an unknown pattern
/// loads nothing.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    units: Vec<Unit>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }
}

impl UnitLoader for MemoryLoader {
    fn load(&self, pattern: &str) -> Result<UnitSet> {
        let mut set = UnitSet::new(pattern);
        let Some(root) = self.units.iter().find(|unit| unit.id == pattern) else {
            return Ok(set);
        };
        for unit in &self.units {
            if unit.id != root.id {
                set.insert(unit.clone());
            }
        }
        set.insert_root(root.clone());
        Ok(set)
    }
}

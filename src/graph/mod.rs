//! Host build graph
//!
//! In-memory model of the host build system at its interface boundary: a
//! registry of named build targets and named source collections with
//! idempotent `dependsOn` edges between collections.
//!
//! Units are arena-stored and addressed by stable string keys; lookups are
//! always by logical name and lifetime is scoped to one configuration run.
//! Iteration order is creation order, which the resolution pipeline keeps
//! deterministic.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::taxonomy::TargetFamily;

/// A concrete build unit registered with the host
#[derive(Debug, Clone, Serialize)]
pub struct BuildTarget {
    /// Logical name, unique across the run
    pub name: String,

    /// Leaf family the target was registered under
    pub family: TargetFamily,

    /// Module name override, assigned by the unique-naming pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    /// Free-form settings mutated by user callbacks
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

impl BuildTarget {
    /// Set a free-form setting (last write wins)
    pub fn set(&mut self, key: &str, value: &str) {
        self.settings.insert(key.to_string(), value.to_string());
    }

    /// Read a free-form setting
    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }
}

/// A named source collection with `dependsOn` edges to other collections
#[derive(Debug, Clone, Serialize)]
pub struct SourceCollection {
    /// Collection name (e.g. `commonMain`, `unixMain`, `iosArm64Test`)
    pub name: String,

    /// Names of collections this one inherits configuration from
    pub depends_on: Vec<String>,

    /// Free-form settings mutated by user callbacks
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

impl SourceCollection {
    /// Set a free-form setting (last write wins)
    pub fn set(&mut self, key: &str, value: &str) {
        self.settings.insert(key.to_string(), value.to_string());
    }

    /// Read a free-form setting
    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Whether this collection depends on `parent` directly
    pub fn depends_on(&self, parent: &str) -> bool {
        self.depends_on.iter().any(|p| p == parent)
    }
}

/// Arena of build targets and source collections for one configuration run
#[derive(Debug, Default)]
pub struct BuildGraph {
    targets: Vec<BuildTarget>,
    target_index: HashMap<String, usize>,
    collections: Vec<SourceCollection>,
    collection_index: HashMap<String, usize>,
}

impl BuildGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named build target, returning the existing one on re-registration
    pub fn register_target(&mut self, name: &str, family: TargetFamily) -> &mut BuildTarget {
        if let Some(&idx) = self.target_index.get(name) {
            return &mut self.targets[idx];
        }
        let idx = self.targets.len();
        self.targets.push(BuildTarget {
            name: name.to_string(),
            family,
            module_name: None,
            settings: BTreeMap::new(),
        });
        self.target_index.insert(name.to_string(), idx);
        &mut self.targets[idx]
    }

    /// Create a named source collection if absent, returning it either way
    pub fn maybe_create_collection(&mut self, name: &str) -> &mut SourceCollection {
        if let Some(&idx) = self.collection_index.get(name) {
            return &mut self.collections[idx];
        }
        let idx = self.collections.len();
        self.collections.push(SourceCollection {
            name: name.to_string(),
            depends_on: Vec::new(),
            settings: BTreeMap::new(),
        });
        self.collection_index.insert(name.to_string(), idx);
        &mut self.collections[idx]
    }

    /// Record a `dependsOn` edge between two collections.
    ///
    /// Idempotent: re-adding an existing edge is a no-op. Missing endpoints
    /// are created, matching the host's maybe-create semantics.
    pub fn add_dependency(&mut self, child: &str, parent: &str) {
        self.maybe_create_collection(parent);
        let child = self.maybe_create_collection(child);
        if !child.depends_on(parent) {
            child.depends_on.push(parent.to_string());
        }
    }

    /// Re-point an edge: drop `child -> old` if present and add `child -> new`
    pub fn replace_dependency(&mut self, child: &str, old: &str, new: &str) {
        if let Some(collection) = self.collection_mut(child) {
            collection.depends_on.retain(|p| p != old);
        }
        self.add_dependency(child, new);
    }

    /// Look up a build target by name
    pub fn target(&self, name: &str) -> Option<&BuildTarget> {
        self.target_index.get(name).map(|&idx| &self.targets[idx])
    }

    /// Look up a build target by name, mutably
    pub fn target_mut(&mut self, name: &str) -> Option<&mut BuildTarget> {
        match self.target_index.get(name) {
            Some(&idx) => Some(&mut self.targets[idx]),
            None => None,
        }
    }

    /// Look up a source collection by name
    pub fn collection(&self, name: &str) -> Option<&SourceCollection> {
        self.collection_index
            .get(name)
            .map(|&idx| &self.collections[idx])
    }

    /// Look up a source collection by name, mutably
    pub fn collection_mut(&mut self, name: &str) -> Option<&mut SourceCollection> {
        match self.collection_index.get(name) {
            Some(&idx) => Some(&mut self.collections[idx]),
            None => None,
        }
    }

    /// Registered targets in creation order
    pub fn targets(&self) -> impl Iterator<Item = &BuildTarget> {
        self.targets.iter()
    }

    /// Source collections in creation order
    pub fn collections(&self) -> impl Iterator<Item = &SourceCollection> {
        self.collections.iter()
    }

    /// Targets in creation order, mutably
    pub fn targets_mut(&mut self) -> impl Iterator<Item = &mut BuildTarget> {
        self.targets.iter_mut()
    }

    /// Total number of `dependsOn` edges
    pub fn edge_count(&self) -> usize {
        self.collections.iter().map(|c| c.depends_on.len()).sum()
    }

    /// Whether nothing was registered
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.collections.is_empty()
    }
}

//! Configuration units
//!
//! Everything the caller can declare during a configuration run: leaf
//! targets, the shared common unit, the cross-cutting options unit, and the
//! free-form late callback unit. Each unit accumulates user callbacks and
//! carries a priority rank that fixes the application order.
//!
//! Ranks only affect callback application, never graph topology: the common
//! unit applies first, leaf families in a fixed family order, options
//! second-to-last, and the callback unit last so it can observe and override
//! everything established before it.

use crate::graph::{BuildGraph, BuildTarget, SourceCollection};
use crate::taxonomy::{TargetFamily, TargetId};

/// Callback applied to a registered build target
pub type TargetCallback = Box<dyn FnOnce(&mut BuildTarget)>;

/// Callback applied to a source collection
pub type CollectionCallback = Box<dyn FnOnce(&mut SourceCollection)>;

/// Late-stage callback applied to the whole build graph
pub type GraphCallback = Box<dyn FnOnce(&mut BuildGraph)>;

/// Rank of the common unit (applies before everything else)
pub const RANK_COMMON: u8 = 0;

/// Rank of the options unit (applies after every leaf target)
pub const RANK_OPTIONS: u8 = 120;

/// Rank of the callback unit (applies last)
pub const RANK_CALLBACK: u8 = 127;

/// A requested concrete build target and its accumulated configuration
pub struct LeafUnit {
    /// Logical name, unique across the run
    pub name: String,

    /// Which concrete target this is
    pub id: TargetId,

    /// Callbacks for the target's build unit, in registration order
    pub target_callbacks: Vec<TargetCallback>,

    /// Callbacks for the target's main source collection
    pub source_main_callbacks: Vec<CollectionCallback>,

    /// Callbacks for the target's test source collection
    pub source_test_callbacks: Vec<CollectionCallback>,
}

impl LeafUnit {
    /// New leaf unit with the target's default logical name
    pub fn new(id: TargetId) -> Self {
        Self::named(id, id.default_name())
    }

    /// New leaf unit with a custom logical name
    pub fn named(id: TargetId, name: &str) -> Self {
        Self {
            name: name.to_string(),
            id,
            target_callbacks: Vec::new(),
            source_main_callbacks: Vec::new(),
            source_test_callbacks: Vec::new(),
        }
    }

    pub fn family(&self) -> TargetFamily {
        self.id.family()
    }

    /// Queue a callback for the target's build unit
    pub fn target(&mut self, cb: impl FnOnce(&mut BuildTarget) + 'static) {
        self.target_callbacks.push(Box::new(cb));
    }

    /// Queue a callback for the target's main source collection
    pub fn source_main(&mut self, cb: impl FnOnce(&mut SourceCollection) + 'static) {
        self.source_main_callbacks.push(Box::new(cb));
    }

    /// Queue a callback for the target's test source collection
    pub fn source_test(&mut self, cb: impl FnOnce(&mut SourceCollection) + 'static) {
        self.source_test_callbacks.push(Box::new(cb));
    }

    /// Fold another registration of the same logical target into this one.
    ///
    /// Callbacks accumulate in call order; nothing is overwritten.
    pub fn merge(&mut self, other: LeafUnit) {
        debug_assert_eq!(self.name, other.name);
        self.target_callbacks.extend(other.target_callbacks);
        self.source_main_callbacks.extend(other.source_main_callbacks);
        self.source_test_callbacks.extend(other.source_test_callbacks);
    }
}

/// Configuration shared by every target, applied to the root collections
#[derive(Default)]
pub struct CommonUnit {
    pub source_main_callbacks: Vec<CollectionCallback>,
    pub source_test_callbacks: Vec<CollectionCallback>,
}

impl CommonUnit {
    /// Queue a callback for the root main collection
    pub fn source_main(&mut self, cb: impl FnOnce(&mut SourceCollection) + 'static) {
        self.source_main_callbacks.push(Box::new(cb));
    }

    /// Queue a callback for the root test collection
    pub fn source_test(&mut self, cb: impl FnOnce(&mut SourceCollection) + 'static) {
        self.source_test_callbacks.push(Box::new(cb));
    }
}

/// Cross-cutting switches, applied after every leaf target exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionsUnit {
    /// Assign a `<project>_<target>` module name to every registered target
    pub unique_module_names: bool,

    /// Insert a device-side grouping layer per split-capable family
    pub device_collections: bool,

    /// Insert a simulator-side grouping layer per split-capable family
    pub simulator_collections: bool,
}

/// Arbitrary late-stage callbacks with no grouping semantics
#[derive(Default)]
pub struct CallbackUnit {
    pub callbacks: Vec<GraphCallback>,
}

impl CallbackUnit {
    /// Queue a late-stage callback over the whole graph
    pub fn push(&mut self, cb: impl FnOnce(&mut BuildGraph) + 'static) {
        self.callbacks.push(Box::new(cb));
    }
}

/// Any registered declaration, subject to ordering and application
pub enum ConfigUnit {
    Leaf(LeafUnit),
    Common(CommonUnit),
    Options(OptionsUnit),
    Callback(CallbackUnit),
}

impl ConfigUnit {
    /// Priority rank; lower ranks apply first
    pub fn rank(&self) -> u8 {
        match self {
            ConfigUnit::Common(_) => RANK_COMMON,
            ConfigUnit::Leaf(leaf) => leaf.family().rank(),
            ConfigUnit::Options(_) => RANK_OPTIONS,
            ConfigUnit::Callback(_) => RANK_CALLBACK,
        }
    }
}

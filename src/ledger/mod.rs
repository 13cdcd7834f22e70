//! Registration ledger
//!
//! Deduplicating, identity-keyed registry of every configuration unit
//! requested during a run. Leaf targets are keyed by logical name; the
//! common, options, and callback units are singletons per run.
//!
//! Leaf additions consult the selection filter: a rejected target is dropped
//! silently. Re-registering an existing name under the same family merges
//! callbacks; under a different family it is a caller error.

use std::collections::HashMap;

use crate::selection::SelectionState;
use crate::taxonomy::TargetFamily;
use crate::unit::{CallbackUnit, CommonUnit, ConfigUnit, LeafUnit, OptionsUnit};

/// Errors raised at unit registration time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Same logical name registered under two different leaf families
    #[error("target '{name}' already registered as {existing:?}, cannot re-register as {requested:?}")]
    ConflictingFamily {
        name: String,
        existing: TargetFamily,
        requested: TargetFamily,
    },
}

/// Outcome of a leaf registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafOutcome {
    /// Inserted as a new unit
    Inserted,
    /// Merged into an already-registered unit with the same identity
    Merged,
    /// Dropped by the selection filter (not an error)
    Filtered,
}

/// Registry of all configuration units for one run
pub struct UnitLedger {
    selection: SelectionState,
    leaves: Vec<LeafUnit>,
    leaf_index: HashMap<String, usize>,
    common: Option<CommonUnit>,
    options: Option<OptionsUnit>,
    callback: Option<CallbackUnit>,
    // Registration sequence per unit kind, for stable ordering on rank ties.
    // Leaves record the sequence of their first registration; merges keep it.
    leaf_seqs: Vec<u64>,
    common_seq: u64,
    options_seq: u64,
    callback_seq: u64,
    next_seq: u64,
}

impl UnitLedger {
    pub fn new(selection: SelectionState) -> Self {
        Self {
            selection,
            leaves: Vec::new(),
            leaf_index: HashMap::new(),
            common: None,
            options: None,
            callback: None,
            leaf_seqs: Vec::new(),
            common_seq: 0,
            options_seq: 0,
            callback_seq: 0,
            next_seq: 0,
        }
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Register a leaf target unit.
    ///
    /// Filtered targets are silently dropped. An existing unit with the same
    /// name and family absorbs the new callbacks; a family mismatch is an
    /// error and registers nothing.
    pub fn add_leaf(&mut self, unit: LeafUnit) -> Result<LeafOutcome, LedgerError> {
        if let Some(&idx) = self.leaf_index.get(&unit.name) {
            let existing = &mut self.leaves[idx];
            if existing.family() != unit.family() {
                return Err(LedgerError::ConflictingFamily {
                    existing: existing.family(),
                    requested: unit.family(),
                    name: unit.name,
                });
            }
            existing.merge(unit);
            return Ok(LeafOutcome::Merged);
        }

        if !self.selection.should_materialize(unit.id) {
            return Ok(LeafOutcome::Filtered);
        }

        let seq = self.bump();
        self.leaf_index.insert(unit.name.clone(), self.leaves.len());
        self.leaves.push(unit);
        self.leaf_seqs.push(seq);
        Ok(LeafOutcome::Inserted)
    }

    /// Exact lookup of a registered leaf by logical name
    pub fn find_leaf(&self, name: &str) -> Option<&LeafUnit> {
        self.leaf_index.get(name).map(|&idx| &self.leaves[idx])
    }

    /// Registered leaves, in registration order
    pub fn leaves(&self) -> impl Iterator<Item = &LeafUnit> {
        self.leaves.iter()
    }

    /// Get-or-create accessor for the singleton common unit
    pub fn common_mut(&mut self) -> &mut CommonUnit {
        if self.common.is_none() {
            self.common_seq = self.bump();
        }
        self.common.get_or_insert_with(CommonUnit::default)
    }

    /// Get-or-create accessor for the singleton options unit
    pub fn options_mut(&mut self) -> &mut OptionsUnit {
        if self.options.is_none() {
            self.options_seq = self.bump();
        }
        self.options.get_or_insert_with(OptionsUnit::default)
    }

    /// Get-or-create accessor for the singleton callback unit
    pub fn callback_mut(&mut self) -> &mut CallbackUnit {
        if self.callback.is_none() {
            self.callback_seq = self.bump();
        }
        self.callback.get_or_insert_with(CallbackUnit::default)
    }

    /// Snapshot of the options switches (defaults when never declared)
    pub fn options_snapshot(&self) -> OptionsUnit {
        self.options.unwrap_or_default()
    }

    /// Consume the ledger, yielding every unit with its registration sequence
    pub fn into_units(self) -> Vec<(u64, ConfigUnit)> {
        let mut units = Vec::with_capacity(self.leaves.len() + 3);
        for (leaf, seq) in self.leaves.into_iter().zip(self.leaf_seqs) {
            units.push((seq, ConfigUnit::Leaf(leaf)));
        }
        if let Some(common) = self.common {
            units.push((self.common_seq, ConfigUnit::Common(common)));
        }
        if let Some(options) = self.options {
            units.push((self.options_seq, ConfigUnit::Options(options)));
        }
        if let Some(callback) = self.callback {
            units.push((self.callback_seq, ConfigUnit::Callback(callback)));
        }
        units
    }
}

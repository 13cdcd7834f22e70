//! Configuration session façade
//!
//! The entry point external callers use to declare desired leaf targets,
//! shared configuration, and cross-cutting options, and to run the single
//! resolution pass. A session is single-use: `configure` has irreversible
//! side effects, so invoking it a second time is an error.
//!
//! Session lifecycle: Unconfigured -> Configuring (DSL methods callable
//! inside the `configure` closure) -> Finalized. No rollback.

use std::sync::Mutex;

use crate::graph::BuildGraph;
use crate::hierarchy::{build_hierarchy, leaf_main, leaf_test, ROOT_MAIN, ROOT_TEST};
use crate::ledger::{LedgerError, UnitLedger};
use crate::ordering::sort_units;
use crate::selection::SelectionState;
use crate::summary::{ResolutionSummary, TargetSummary, SCHEMA_ID, SCHEMA_VERSION};
use crate::taxonomy::{
    AndroidNativeTarget, IosTarget, LinuxTarget, MacosTarget, TargetId, TvosTarget, WasmJsTarget,
    WatchosTarget, WindowsTarget,
};
use crate::unit::{CommonUnit, ConfigUnit, LeafUnit, OptionsUnit};
use crate::variant::apply_variant_splits;
use crate::version::ToolchainVersion;

/// Errors aborting a configuration run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `configure` can only be invoked once per session
    #[error("session already configured: configure can only be invoked once")]
    AlreadyConfigured,

    /// Structural registration error (name reuse across families)
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Requested target requires a newer toolchain than is available
    #[error("target {id} requires toolchain {required}, have {available}")]
    UnsupportedTarget {
        id: TargetId,
        required: ToolchainVersion,
        available: ToolchainVersion,
    },
}

/// Outcome of a configuration run: the resolved graph and its summary
#[derive(Debug)]
pub struct Resolution {
    pub graph: BuildGraph,
    pub summary: ResolutionSummary,
}

/// Single-use configuration session
pub struct ConfigSession {
    project: String,
    selection: SelectionState,
    toolchain: ToolchainVersion,
    default_options: Option<OptionsUnit>,
    configured: Mutex<bool>,
}

impl ConfigSession {
    pub fn new(
        project: impl Into<String>,
        selection: SelectionState,
        toolchain: ToolchainVersion,
    ) -> Self {
        Self {
            project: project.into(),
            selection,
            toolchain,
            default_options: None,
            configured: Mutex::new(false),
        }
    }

    /// Seed the options unit before the declaration closure runs.
    ///
    /// The closure's `options(f)` call operates on the seeded unit, so it can
    /// still override individual switches.
    pub fn with_default_options(mut self, options: OptionsUnit) -> Self {
        self.default_options = Some(options);
        self
    }

    /// Run the configuration pass: collect declarations through the DSL,
    /// resolve the hierarchy, and apply every unit's callbacks in priority
    /// order.
    ///
    /// At most one invocation proceeds, even across threads; all others
    /// observe [`ConfigError::AlreadyConfigured`]. If no leaf target survives
    /// selection, the resolution is empty and nothing is registered.
    pub fn configure<F>(&self, declare: F) -> Result<Resolution, ConfigError>
    where
        F: FnOnce(&mut ConfigDsl) -> Result<(), ConfigError>,
    {
        let mut configured = match self.configured.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *configured {
            return Err(ConfigError::AlreadyConfigured);
        }
        *configured = true;

        let mut dsl = ConfigDsl {
            ledger: UnitLedger::new(self.selection.clone()),
            toolchain: self.toolchain,
        };
        if let Some(options) = self.default_options {
            *dsl.ledger.options_mut() = options;
        }
        declare(&mut dsl)?;

        Ok(self.resolve(dsl.ledger))
    }

    fn resolve(&self, ledger: UnitLedger) -> Resolution {
        let options = ledger.options_snapshot();
        let units = sort_units(ledger.into_units());

        let mut graph = BuildGraph::new();
        let mut grouping_units = Vec::new();
        let mut targets = Vec::new();

        {
            let leaf_refs: Vec<&LeafUnit> = units
                .iter()
                .filter_map(|unit| match unit {
                    ConfigUnit::Leaf(leaf) => Some(leaf),
                    _ => None,
                })
                .collect();

            if leaf_refs.is_empty() {
                return Resolution {
                    graph,
                    summary: self.summary(Vec::new(), Vec::new(), Vec::new(), 0, 0),
                };
            }

            let groups = build_hierarchy(&mut graph, &leaf_refs);
            grouping_units.extend(groups.iter().map(|g| g.key().to_string()));
            grouping_units.extend(apply_variant_splits(&mut graph, &options, &leaf_refs));

            targets.extend(leaf_refs.iter().map(|leaf| TargetSummary {
                name: leaf.name.clone(),
                id: leaf.id,
                family: leaf.family(),
            }));
        }

        let applied = apply_units(&mut graph, units, &self.project);

        let collection_count = graph.collections().count();
        let edge_count = graph.edge_count();
        Resolution {
            summary: self.summary(targets, grouping_units, applied, collection_count, edge_count),
            graph,
        }
    }

    fn summary(
        &self,
        targets: Vec<TargetSummary>,
        grouping_units: Vec<String>,
        applied_units: Vec<String>,
        collection_count: usize,
        edge_count: usize,
    ) -> ResolutionSummary {
        ResolutionSummary {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: chrono::Utc::now(),
            project: self.project.clone(),
            toolchain_version: self.toolchain.to_string(),
            targets,
            grouping_units,
            applied_units,
            collection_count,
            edge_count,
        }
    }
}

/// Apply each unit's callbacks in sorted order, returning the applied labels
fn apply_units(graph: &mut BuildGraph, units: Vec<ConfigUnit>, project: &str) -> Vec<String> {
    let mut applied = Vec::with_capacity(units.len());

    for unit in units {
        match unit {
            ConfigUnit::Common(common) => {
                for cb in common.source_main_callbacks {
                    if let Some(collection) = graph.collection_mut(ROOT_MAIN) {
                        cb(collection);
                    }
                }
                for cb in common.source_test_callbacks {
                    if let Some(collection) = graph.collection_mut(ROOT_TEST) {
                        cb(collection);
                    }
                }
                applied.push("common".to_string());
            }
            ConfigUnit::Leaf(leaf) => {
                for cb in leaf.target_callbacks {
                    if let Some(target) = graph.target_mut(&leaf.name) {
                        cb(target);
                    }
                }
                for cb in leaf.source_main_callbacks {
                    if let Some(collection) = graph.collection_mut(&leaf_main(&leaf.name)) {
                        cb(collection);
                    }
                }
                for cb in leaf.source_test_callbacks {
                    if let Some(collection) = graph.collection_mut(&leaf_test(&leaf.name)) {
                        cb(collection);
                    }
                }
                applied.push(format!("target:{}", leaf.name));
            }
            ConfigUnit::Options(options) => {
                if options.unique_module_names {
                    for target in graph.targets_mut() {
                        target.module_name = Some(format!("{}_{}", project, target.name));
                    }
                }
                applied.push("options".to_string());
            }
            ConfigUnit::Callback(callback) => {
                for cb in callback.callbacks {
                    cb(graph);
                }
                applied.push("callback".to_string());
            }
        }
    }

    applied
}

/// Declaration surface available inside [`ConfigSession::configure`].
///
/// One registration method per leaf family, plus the three cross-cutting
/// units. Re-declaring an already-registered target merges its configuration.
pub struct ConfigDsl {
    ledger: UnitLedger,
    toolchain: ToolchainVersion,
}

impl ConfigDsl {
    fn leaf<F>(&mut self, id: TargetId, name: Option<&str>, declare: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut LeafUnit),
    {
        if let Some(required) = id.required_toolchain() {
            if !id.available_on(self.toolchain) {
                return Err(ConfigError::UnsupportedTarget {
                    id,
                    required,
                    available: self.toolchain,
                });
            }
        }

        let mut unit = match name {
            Some(name) => LeafUnit::named(id, name),
            None => LeafUnit::new(id),
        };
        declare(&mut unit);
        self.ledger.add_leaf(unit)?;
        Ok(())
    }

    /// Register every available target of a family, unconfigured; gated
    /// targets are skipped rather than raised
    fn family_all(&mut self, ids: &[TargetId]) -> Result<(), ConfigError> {
        for id in ids {
            if id.available_on(self.toolchain) {
                self.leaf(*id, None, |_| {})?;
            }
        }
        Ok(())
    }

    // === Managed families ===

    pub fn jvm<F: FnOnce(&mut LeafUnit)>(&mut self, declare: F) -> Result<(), ConfigError> {
        self.leaf(TargetId::Jvm, None, declare)
    }

    pub fn jvm_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(TargetId::Jvm, Some(name), declare)
    }

    pub fn android<F: FnOnce(&mut LeafUnit)>(&mut self, declare: F) -> Result<(), ConfigError> {
        self.leaf(TargetId::Android, None, declare)
    }

    pub fn android_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(TargetId::Android, Some(name), declare)
    }

    // === Web families ===

    pub fn js<F: FnOnce(&mut LeafUnit)>(&mut self, declare: F) -> Result<(), ConfigError> {
        self.leaf(TargetId::Js, None, declare)
    }

    pub fn js_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(TargetId::Js, Some(name), declare)
    }

    pub fn wasm_js<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: WasmJsTarget,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), None, declare)
    }

    pub fn wasm_js_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: WasmJsTarget,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), Some(name), declare)
    }

    pub fn wasm_js_all(&mut self) -> Result<(), ConfigError> {
        self.family_all(&[TargetId::WasmJs, TargetId::WasmWasi])
    }

    // === Native families ===

    pub fn android_native<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: AndroidNativeTarget,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), None, declare)
    }

    pub fn android_native_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: AndroidNativeTarget,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), Some(name), declare)
    }

    pub fn android_native_all(&mut self) -> Result<(), ConfigError> {
        self.family_all(&[
            TargetId::AndroidNativeArm32,
            TargetId::AndroidNativeArm64,
            TargetId::AndroidNativeX64,
            TargetId::AndroidNativeX86,
        ])
    }

    pub fn linux<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: LinuxTarget,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), None, declare)
    }

    pub fn linux_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: LinuxTarget,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), Some(name), declare)
    }

    pub fn linux_all(&mut self) -> Result<(), ConfigError> {
        self.family_all(&[TargetId::LinuxX64, TargetId::LinuxArm64])
    }

    pub fn windows<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: WindowsTarget,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), None, declare)
    }

    pub fn windows_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: WindowsTarget,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), Some(name), declare)
    }

    pub fn windows_all(&mut self) -> Result<(), ConfigError> {
        self.family_all(&[TargetId::WindowsX64])
    }

    pub fn wasm32<F: FnOnce(&mut LeafUnit)>(&mut self, declare: F) -> Result<(), ConfigError> {
        self.leaf(TargetId::Wasm32, None, declare)
    }

    pub fn wasm32_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(TargetId::Wasm32, Some(name), declare)
    }

    // === Apple families ===

    pub fn ios<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: IosTarget,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), None, declare)
    }

    pub fn ios_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: IosTarget,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), Some(name), declare)
    }

    pub fn ios_all(&mut self) -> Result<(), ConfigError> {
        self.family_all(&[
            TargetId::IosArm64,
            TargetId::IosX64,
            TargetId::IosSimulatorArm64,
        ])
    }

    pub fn macos<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: MacosTarget,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), None, declare)
    }

    pub fn macos_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: MacosTarget,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), Some(name), declare)
    }

    pub fn macos_all(&mut self) -> Result<(), ConfigError> {
        self.family_all(&[TargetId::MacosArm64, TargetId::MacosX64])
    }

    pub fn tvos<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: TvosTarget,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), None, declare)
    }

    pub fn tvos_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: TvosTarget,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), Some(name), declare)
    }

    pub fn tvos_all(&mut self) -> Result<(), ConfigError> {
        self.family_all(&[
            TargetId::TvosArm64,
            TargetId::TvosX64,
            TargetId::TvosSimulatorArm64,
        ])
    }

    pub fn watchos<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: WatchosTarget,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), None, declare)
    }

    pub fn watchos_named<F: FnOnce(&mut LeafUnit)>(
        &mut self,
        target: WatchosTarget,
        name: &str,
        declare: F,
    ) -> Result<(), ConfigError> {
        self.leaf(target.id(), Some(name), declare)
    }

    pub fn watchos_all(&mut self) -> Result<(), ConfigError> {
        self.family_all(&[
            TargetId::WatchosArm32,
            TargetId::WatchosArm64,
            TargetId::WatchosDeviceArm64,
            TargetId::WatchosSimulatorArm64,
            TargetId::WatchosX64,
        ])
    }

    // === Cross-cutting units ===

    /// Configure the shared common unit (applies before everything else)
    pub fn common<F: FnOnce(&mut CommonUnit)>(&mut self, declare: F) {
        declare(self.ledger.common_mut());
    }

    /// Configure the cross-cutting options unit
    pub fn options<F: FnOnce(&mut OptionsUnit)>(&mut self, declare: F) {
        declare(self.ledger.options_mut());
    }

    /// Queue a late-stage callback over the resolved graph (applies last)
    pub fn callback(&mut self, cb: impl FnOnce(&mut BuildGraph) + 'static) {
        self.ledger.callback_mut().push(cb);
    }
}

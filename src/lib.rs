//! crosstarget - target hierarchy resolution for multi-target builds
//!
//! Given a declarative, possibly-partial set of requested build targets,
//! this crate computes the build units that must exist, synthesizes exactly
//! the intermediate grouping collections needed to express shared
//! configuration, wires the `dependsOn` edges between them, and applies
//! user-supplied configuration callbacks to each unit in a deterministic
//! order.

pub mod config;
pub mod graph;
pub mod hierarchy;
pub mod ledger;
pub mod ordering;
pub mod selection;
pub mod session;
pub mod summary;
pub mod taxonomy;
pub mod unit;
pub mod variant;
pub mod version;

pub use config::{ConfigFileError, ResolverConfig};
pub use graph::{BuildGraph, BuildTarget, SourceCollection};
pub use selection::{SelectionError, SelectionState};
pub use session::{ConfigDsl, ConfigError, ConfigSession, Resolution};
pub use summary::ResolutionSummary;
pub use taxonomy::{TargetFamily, TargetId};
pub use version::ToolchainVersion;

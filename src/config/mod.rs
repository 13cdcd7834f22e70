//! External configuration source
//!
//! Loads the per-run resolver configuration from a TOML file: the project
//! name, the toolchain version to gate target availability against, the
//! target selection (allow-list or "all" flag), and default option switches.
//!
//! Validation is fail-fast at load time: an allow-list entry naming an
//! unknown target, or an unparseable toolchain version, aborts the load with
//! an error naming the offender.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::selection::{SelectionError, SelectionState};
use crate::session::ConfigSession;
use crate::unit::OptionsUnit;
use crate::version::{ToolchainVersion, VersionError};

/// Toolchain version assumed when the config does not pin one
pub const DEFAULT_TOOLCHAIN: ToolchainVersion = ToolchainVersion::new(1, 9, 0);

/// Errors loading or validating a resolver config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Target selection section of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Materialize every requested target, ignoring any allow-list
    #[serde(default)]
    pub all: bool,

    /// Explicit allow-list of target identifiers (e.g. `["IOS_ARM64"]`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
}

/// Option-switch defaults from the config file
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OptionsConfig {
    #[serde(default)]
    pub unique_module_names: bool,

    #[serde(default)]
    pub device_collections: bool,

    #[serde(default)]
    pub simulator_collections: bool,
}

/// Resolver configuration for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Project name, used for module-name prefixes
    pub project: String,

    /// Toolchain version string (e.g. `"1.9.20"`); defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolchain_version: Option<String>,

    /// Target selection
    #[serde(default)]
    pub targets: TargetsConfig,

    /// Option-switch defaults
    #[serde(default)]
    pub options: OptionsConfig,
}

impl ResolverConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let raw = fs::read_to_string(path)?;
        let config: ResolverConfig = toml::from_str(&raw)?;
        // Validate eagerly so bad entries surface at load time
        config.selection_state()?;
        config.toolchain()?;
        Ok(config)
    }

    /// Selection state derived from the targets section
    pub fn selection_state(&self) -> Result<SelectionState, SelectionError> {
        SelectionState::from_external(self.targets.all, self.targets.allow.as_deref())
    }

    /// Toolchain version, falling back to [`DEFAULT_TOOLCHAIN`]
    pub fn toolchain(&self) -> Result<ToolchainVersion, VersionError> {
        match &self.toolchain_version {
            Some(raw) => raw.parse(),
            None => Ok(DEFAULT_TOOLCHAIN),
        }
    }

    /// Option switches as a unit value, for seeding the options declaration
    pub fn options_unit(&self) -> OptionsUnit {
        OptionsUnit {
            unique_module_names: self.options.unique_module_names,
            device_collections: self.options.device_collections,
            simulator_collections: self.options.simulator_collections,
        }
    }

    /// Build a single-use session from this config.
    ///
    /// The `[options]` switches are seeded into the session, so they apply
    /// without the caller re-declaring them through the DSL.
    pub fn into_session(self) -> Result<ConfigSession, ConfigFileError> {
        let selection = self.selection_state()?;
        let toolchain = self.toolchain()?;
        let options = self.options_unit();
        Ok(ConfigSession::new(self.project, selection, toolchain).with_default_options(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_config(r#"project = "demo""#);
        let config = ResolverConfig::load(file.path()).unwrap();

        assert_eq!(config.project, "demo");
        assert_eq!(config.selection_state().unwrap(), SelectionState::Unrestricted);
        assert_eq!(config.toolchain().unwrap(), DEFAULT_TOOLCHAIN);
        assert_eq!(config.options_unit(), OptionsUnit::default());
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
project = "widget"
toolchain_version = "1.9.20-beta1"

[targets]
all = false
allow = ["IOS_ARM64", "IOS_SIMULATOR_ARM64"]

[options]
unique_module_names = true
simulator_collections = true
"#,
        );
        let config = ResolverConfig::load(file.path()).unwrap();

        assert_eq!(config.toolchain().unwrap(), ToolchainVersion::new(1, 9, 20));
        let options = config.options_unit();
        assert!(options.unique_module_names);
        assert!(options.simulator_collections);
        assert!(!options.device_collections);

        let selection = config.selection_state().unwrap();
        assert!(selection.should_materialize(crate::taxonomy::TargetId::IosArm64));
        assert!(!selection.should_materialize(crate::taxonomy::TargetId::Jvm));
    }

    #[test]
    fn test_unknown_allow_entry_fails_at_load() {
        let file = write_config(
            r#"
project = "demo"

[targets]
allow = ["AMIGA_68K"]
"#,
        );
        let err = ResolverConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::Selection(SelectionError::UnknownTarget { ref identifier })
                if identifier == "AMIGA_68K"
        ));
    }

    #[test]
    fn test_bad_toolchain_version_fails_at_load() {
        let file = write_config(
            r#"
project = "demo"
toolchain_version = "latest"
"#,
        );
        let err = ResolverConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigFileError::Version(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ResolverConfig::load(Path::new("/nonexistent/resolver.toml")).unwrap_err();
        assert!(matches!(err, ConfigFileError::Io(_)));
    }
}

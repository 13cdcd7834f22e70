//! Toolchain version parsing and comparison
//!
//! The availability of some leaf targets depends on the version of the
//! underlying compiler toolchain. Versions are `major.minor[.patch]` with an
//! optional pre-release suffix (e.g. `1.9.20-beta2`), which is stripped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version identifier of the underlying compiler toolchain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ToolchainVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Errors parsing a toolchain version string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("invalid toolchain version: '{input}'")]
    Invalid { input: String },
}

impl ToolchainVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Check against a minimum version
    pub fn is_at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        *self >= ToolchainVersion::new(major, minor, patch)
    }
}

impl FromStr for ToolchainVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::Invalid {
            input: s.to_string(),
        };

        // Strip pre-release/build suffix: "1.9.20-beta2" -> "1.9.20"
        let base = s.split('-').next().unwrap_or(s);

        let parts: Vec<&str> = base.split('.').collect();
        if !(parts.len() == 2 || parts.len() == 3) {
            return Err(invalid());
        }

        let major = parts[0].parse::<u32>().map_err(|_| invalid())?;
        let minor = parts[1].parse::<u32>().map_err(|_| invalid())?;
        let patch = match parts.get(2) {
            Some(p) => p.parse::<u32>().map_err(|_| invalid())?,
            None => 0,
        };

        Ok(ToolchainVersion::new(major, minor, patch))
    }
}

impl fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        let v: ToolchainVersion = "1.9.20".parse().unwrap();
        assert_eq!(v, ToolchainVersion::new(1, 9, 20));
    }

    #[test]
    fn test_parse_without_patch() {
        let v: ToolchainVersion = "1.8".parse().unwrap();
        assert_eq!(v, ToolchainVersion::new(1, 8, 0));
    }

    #[test]
    fn test_parse_strips_suffix() {
        let v: ToolchainVersion = "2.0.0-rc1".parse().unwrap();
        assert_eq!(v, ToolchainVersion::new(2, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ToolchainVersion>().is_err());
        assert!("1".parse::<ToolchainVersion>().is_err());
        assert!("a.b.c".parse::<ToolchainVersion>().is_err());
        assert!("1.2.3.4".parse::<ToolchainVersion>().is_err());
    }

    #[test]
    fn test_ordering() {
        let v = ToolchainVersion::new(1, 9, 20);
        assert!(v.is_at_least(1, 8, 0));
        assert!(v.is_at_least(1, 9, 20));
        assert!(!v.is_at_least(1, 9, 21));
        assert!(!v.is_at_least(2, 0, 0));
    }
}

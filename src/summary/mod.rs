//! Resolution summary artifact
//!
//! Serializable record of one configuration run: which targets were
//! materialized, which grouping units were synthesized, and the order units
//! were applied in. Emitted alongside the resolved build graph so callers
//! can audit or persist the outcome (resolution.json).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::taxonomy::{TargetFamily, TargetId};

/// Schema version for resolution.json
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "crosstarget/resolution@1";

/// One materialized leaf target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSummary {
    /// Logical name of the build unit
    pub name: String,

    /// Concrete target identifier
    pub id: TargetId,

    /// Leaf family
    pub family: TargetFamily,
}

/// Resolution artifact (resolution.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSummary {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When resolution completed
    pub created_at: DateTime<Utc>,

    /// Project the run configured
    pub project: String,

    /// Toolchain version the run was gated against
    pub toolchain_version: String,

    /// Materialized leaf targets, in application order
    pub targets: Vec<TargetSummary>,

    /// Grouping units synthesized (taxonomy keys, then split layers),
    /// in creation order
    pub grouping_units: Vec<String>,

    /// Units in the order their callbacks were applied
    /// (e.g. `common`, `target:iosArm64`, `options`, `callback`)
    pub applied_units: Vec<String>,

    /// Total source collections in the resolved graph
    pub collection_count: usize,

    /// Total `dependsOn` edges in the resolved graph
    pub edge_count: usize,
}

impl ResolutionSummary {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResolutionSummary {
        ResolutionSummary {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            project: "sample".to_string(),
            toolchain_version: "1.9.20".to_string(),
            targets: vec![TargetSummary {
                name: "iosArm64".to_string(),
                id: TargetId::IosArm64,
                family: TargetFamily::Ios,
            }],
            grouping_units: vec!["native".to_string(), "unix".to_string()],
            applied_units: vec!["common".to_string(), "target:iosArm64".to_string()],
            collection_count: 10,
            edge_count: 8,
        }
    }

    #[test]
    fn test_serializes_all_normative_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["schema_id"], "crosstarget/resolution@1");
        assert!(json.get("created_at").is_some());
        assert_eq!(json["targets"][0]["id"], "IOS_ARM64");
        assert_eq!(json["targets"][0]["family"], "ios");
        assert_eq!(json["grouping_units"][0], "native");
    }

    #[test]
    fn test_round_trips_through_json() {
        let summary = sample();
        let json = summary.to_json().unwrap();
        let back: ResolutionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.targets, summary.targets);
        assert_eq!(back.applied_units, summary.applied_units);
    }
}

//! Integration tests: hierarchy resolution
//!
//! End-to-end runs through the session façade, checking that the synthesized
//! grouping collections match exactly the ancestor chains induced by the
//! requested leaf set, and that edges land where the taxonomy says.

use crosstarget::session::ConfigSession;
use crosstarget::selection::SelectionState;
use crosstarget::taxonomy::{IosTarget, LinuxTarget, MacosTarget, WatchosTarget};
use crosstarget::version::ToolchainVersion;

fn session() -> ConfigSession {
    ConfigSession::new(
        "demo",
        SelectionState::Unrestricted,
        ToolchainVersion::new(1, 9, 20),
    )
}

// === Grouping unit synthesis ===

#[test]
fn test_grouping_units_match_induced_ancestor_chains() {
    let resolution = session()
        .configure(|dsl| {
            dsl.jvm(|_| {})?;
            dsl.ios_all()?;
            dsl.linux(LinuxTarget::X64, |_| {})?;
            Ok(())
        })
        .unwrap();

    // jvm induces {managed}; ios targets induce {native, unix, apple, ios};
    // linuxX64 adds {linux} on top of the shared {native, unix}
    assert_eq!(
        resolution.summary.grouping_units,
        vec!["managed", "native", "unix", "apple", "ios", "linux"]
    );

    let graph = &resolution.graph;
    assert!(graph.collection("iosX64Main").unwrap().depends_on("iosMain"));
    assert!(graph.collection("iosMain").unwrap().depends_on("appleMain"));
    assert!(graph.collection("appleMain").unwrap().depends_on("unixMain"));
    assert!(graph.collection("unixMain").unwrap().depends_on("nativeMain"));
    assert!(graph.collection("nativeMain").unwrap().depends_on("commonMain"));
    assert!(graph.collection("linuxMain").unwrap().depends_on("unixMain"));
    assert!(graph.collection("jvmMain").unwrap().depends_on("managedMain"));

    // The test side mirrors the main side
    assert!(graph.collection("iosX64Test").unwrap().depends_on("iosTest"));
    assert!(graph.collection("appleTest").unwrap().depends_on("unixTest"));
}

#[test]
fn test_no_speculative_ancestors() {
    let resolution = session()
        .configure(|dsl| {
            dsl.js(|_| {})?;
            Ok(())
        })
        .unwrap();

    let graph = &resolution.graph;
    assert!(graph.collection("webMain").is_some());
    assert!(graph.collection("nativeMain").is_none());
    assert!(graph.collection("managedMain").is_none());
    assert!(graph.collection("unixMain").is_none());
    assert_eq!(resolution.summary.grouping_units, vec!["web"]);
}

#[test]
fn test_singleton_leaf_still_gets_full_chain() {
    let resolution = session()
        .configure(|dsl| {
            dsl.macos(MacosTarget::Arm64, |_| {})?;
            Ok(())
        })
        .unwrap();

    assert_eq!(
        resolution.summary.grouping_units,
        vec!["native", "unix", "apple", "macos"]
    );
}

// === Merge and identity ===

#[test]
fn test_repeated_registration_merges_callbacks_in_call_order() {
    let resolution = session()
        .configure(|dsl| {
            dsl.ios(IosTarget::Arm64, |t| {
                t.target(|bt| bt.set("trace", "first"));
            })?;
            dsl.ios(IosTarget::Arm64, |t| {
                t.target(|bt| {
                    let prior = bt.get("trace").unwrap_or("").to_string();
                    bt.set("trace", &format!("{prior},second"));
                });
            })?;
            Ok(())
        })
        .unwrap();

    assert_eq!(resolution.summary.targets.len(), 1);
    assert_eq!(
        resolution.graph.target("iosArm64").unwrap().get("trace"),
        Some("first,second")
    );
}

// === Variant split ===

#[test]
fn test_split_resolution_end_to_end() {
    let resolution = session()
        .configure(|dsl| {
            dsl.options(|o| {
                o.device_collections = true;
                o.simulator_collections = true;
            });
            dsl.ios_all()?;
            dsl.watchos(WatchosTarget::Arm64, |_| {})?;
            Ok(())
        })
        .unwrap();

    let graph = &resolution.graph;
    assert!(graph.collection("iosDeviceMain").unwrap().depends_on("iosMain"));
    assert!(graph.collection("iosSimulatorMain").unwrap().depends_on("iosMain"));
    assert!(graph
        .collection("iosArm64Main")
        .unwrap()
        .depends_on("iosDeviceMain"));
    assert!(graph
        .collection("iosX64Main")
        .unwrap()
        .depends_on("iosSimulatorMain"));
    assert!(graph
        .collection("iosSimulatorArm64Main")
        .unwrap()
        .depends_on("iosSimulatorMain"));
    assert!(!graph.collection("iosArm64Main").unwrap().depends_on("iosMain"));

    // watchos only has a device-side leaf: no simulator layer for it
    assert!(graph.collection("watchosDeviceMain").is_some());
    assert!(graph.collection("watchosSimulatorMain").is_none());

    assert_eq!(
        resolution.summary.grouping_units,
        vec![
            "native",
            "unix",
            "apple",
            "ios",
            "watchos",
            "iosDevice",
            "iosSimulator",
            "watchosDevice"
        ]
    );
}

// === Summary artifact ===

#[test]
fn test_summary_reflects_resolution() {
    let resolution = session()
        .configure(|dsl| {
            dsl.jvm(|_| {})?;
            dsl.linux(LinuxTarget::Arm64, |_| {})?;
            Ok(())
        })
        .unwrap();

    let summary = &resolution.summary;
    assert_eq!(summary.schema_version, crosstarget::summary::SCHEMA_VERSION);
    assert_eq!(summary.schema_id, crosstarget::summary::SCHEMA_ID);
    assert_eq!(summary.project, "demo");
    assert_eq!(summary.toolchain_version, "1.9.20");
    assert_eq!(summary.collection_count, resolution.graph.collections().count());
    assert_eq!(summary.edge_count, resolution.graph.edge_count());

    let names: Vec<&str> = summary.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["jvm", "linuxArm64"]);

    // Artifact serializes cleanly
    let json = summary.to_json().unwrap();
    assert!(json.contains("crosstarget/resolution@1"));
}

//! Integration tests: session lifecycle and application order
//!
//! The session is single-use and the callback application order is total and
//! deterministic: common first, leaf families in fixed rank order, options
//! after every leaf, the late callback unit last.

use std::cell::RefCell;
use std::rc::Rc;

use crosstarget::session::{ConfigError, ConfigSession};
use crosstarget::selection::SelectionState;
use crosstarget::taxonomy::{IosTarget, LinuxTarget, TargetId};
use crosstarget::version::ToolchainVersion;

fn session() -> ConfigSession {
    ConfigSession::new(
        "demo",
        SelectionState::Unrestricted,
        ToolchainVersion::new(1, 9, 20),
    )
}

fn logger() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn() + 'static>) {
    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let handle = log.clone();
    let make = move |label: &str| {
        let log = handle.clone();
        let label = label.to_string();
        Box::new(move || log.borrow_mut().push(label.clone())) as Box<dyn Fn() + 'static>
    };
    (log, make)
}

// === Application order ===

#[test]
fn test_application_order_ignores_declaration_order() {
    let (log, mark) = logger();

    // Declared deliberately backwards: callback, leaves (high rank first),
    // options, common
    session()
        .configure(|dsl| {
            let m = mark("callback");
            dsl.callback(move |_| m());

            let m = mark("linuxX64");
            dsl.linux(LinuxTarget::X64, |t| t.target(move |_| m()))?;

            let m = mark("iosArm64");
            dsl.ios(IosTarget::Arm64, |t| t.target(move |_| m()))?;

            let m = mark("jvm");
            dsl.jvm(|t| t.target(move |_| m()))?;

            let m = mark("common");
            dsl.common(|c| c.source_main(move |_| m()));
            Ok(())
        })
        .unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["common", "jvm", "iosArm64", "linuxX64", "callback"]
    );
}

#[test]
fn test_equal_rank_leaves_apply_in_registration_order() {
    let (log, mark) = logger();

    session()
        .configure(|dsl| {
            let m = mark("second");
            dsl.ios_named(IosTarget::X64, "second", |t| t.target(move |_| m()))?;
            let m = mark("first");
            dsl.ios_named(IosTarget::Arm64, "first", |t| t.target(move |_| m()))?;
            Ok(())
        })
        .unwrap();

    assert_eq!(*log.borrow(), vec!["second", "first"]);
}

#[test]
fn test_applied_units_recorded_in_order() {
    let resolution = session()
        .configure(|dsl| {
            dsl.callback(|_| {});
            dsl.options(|o| o.unique_module_names = true);
            dsl.linux(LinuxTarget::X64, |_| {})?;
            dsl.jvm(|_| {})?;
            dsl.common(|_| {});
            Ok(())
        })
        .unwrap();

    assert_eq!(
        resolution.summary.applied_units,
        vec!["common", "target:jvm", "target:linuxX64", "options", "callback"]
    );
}

// === Single-use guard ===

#[test]
fn test_second_configure_is_rejected() {
    let session = session();
    session
        .configure(|dsl| {
            dsl.jvm(|_| {})?;
            Ok(())
        })
        .unwrap();

    let err = session.configure(|_| Ok(())).unwrap_err();
    assert_eq!(err, ConfigError::AlreadyConfigured);
}

#[test]
fn test_concurrent_configure_lets_exactly_one_through() {
    use std::sync::Arc;
    use std::thread;

    let session = Arc::new(session());
    let mut handles = Vec::new();
    for _ in 0..4 {
        let session = session.clone();
        handles.push(thread::spawn(move || {
            session.configure(|dsl| {
                dsl.jvm(|_| {})?;
                Ok(())
            })
        }));
    }

    let mut ok = 0;
    let mut already = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => ok += 1,
            Err(ConfigError::AlreadyConfigured) => already += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(already, 3);
}

// === Structural errors ===

#[test]
fn test_name_reuse_across_families_aborts_the_run() {
    let err = session()
        .configure(|dsl| {
            dsl.ios_named(IosTarget::Arm64, "core", |_| {})?;
            dsl.linux_named(LinuxTarget::X64, "core", |_| {})?;
            Ok(())
        })
        .unwrap_err();

    match err {
        ConfigError::Ledger(ledger_err) => {
            assert!(ledger_err.to_string().contains("core"));
        }
        other => panic!("expected ledger error, got {other:?}"),
    }
}

#[test]
fn test_gated_target_error_names_versions() {
    let session = ConfigSession::new(
        "demo",
        SelectionState::Unrestricted,
        ToolchainVersion::new(1, 7, 20),
    );
    let err = session
        .configure(|dsl| {
            dsl.wasm32(|_| {})?;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(
        err,
        ConfigError::UnsupportedTarget {
            id: TargetId::Wasm32,
            required: ToolchainVersion::new(1, 8, 20),
            available: ToolchainVersion::new(1, 7, 20),
        }
    );
    let message = err.to_string();
    assert!(message.contains("WASM_32"));
    assert!(message.contains("1.8.20"));
    assert!(message.contains("1.7.20"));
}

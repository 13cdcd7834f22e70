//! Target taxonomy
//!
//! Closed, static classification of every supported leaf target into nested
//! families. Pure data: grouping nodes, leaf families, and concrete target
//! identifiers, each with a total parent-chain to the universal root.
//!
//! The hierarchy (grouping keys in parentheses):
//!
//! ```text
//! common (root)
//!   |--- managed          jvm, android
//!   |--- web              js, wasmJs, wasmWasi
//!   '--- native
//!          |--- androidNative   androidNativeArm32/Arm64/X64/X86
//!          |--- wasmNative      wasm32
//!          |--- windows         windowsX64
//!          '--- unix
//!                 |--- linux    linuxX64, linuxArm64
//!                 '--- apple
//!                        |--- ios      iosArm64, iosX64, iosSimulatorArm64
//!                        |--- macos    macosArm64, macosX64
//!                        |--- tvos     tvosArm64, tvosX64, tvosSimulatorArm64
//!                        '--- watchos  watchosArm32/Arm64/DeviceArm64/...
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::version::ToolchainVersion;

/// A grouping node in the target hierarchy.
///
/// Covers both the intermediate levels (`Native`, `Unix`, `Apple`) and the
/// family-level groups leaf targets attach to directly (`Ios`, `Linux`, ...).
/// The universal root is implicit: a group with no parent hangs off the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Group {
    /// Runtime-managed targets (JVM bytecode, Android app/library)
    Managed,
    /// Browser-hosted targets (JS)
    Web,
    /// All natively-compiled targets
    Native,
    /// Unix-like natives
    Unix,
    /// Apple-like natives (Darwin kernel)
    Apple,
    /// Linux natives
    Linux,
    /// Windows-like natives
    Windows,
    /// Android NDK natives
    AndroidNative,
    /// Standalone wasm natives
    WasmNative,
    /// Mobile Apple
    Ios,
    /// Desktop Apple
    Macos,
    /// TV Apple
    Tvos,
    /// Watch Apple
    Watchos,
}

impl Group {
    /// Fixed textual key used to derive grouping-unit names (e.g. `unixMain`)
    pub fn key(&self) -> &'static str {
        match self {
            Group::Managed => "managed",
            Group::Web => "web",
            Group::Native => "native",
            Group::Unix => "unix",
            Group::Apple => "apple",
            Group::Linux => "linux",
            Group::Windows => "windows",
            Group::AndroidNative => "androidNative",
            Group::WasmNative => "wasmNative",
            Group::Ios => "ios",
            Group::Macos => "macos",
            Group::Tvos => "tvos",
            Group::Watchos => "watchos",
        }
    }

    /// Direct parent group, `None` for groups hanging off the universal root
    pub fn parent(&self) -> Option<Group> {
        match self {
            Group::Managed | Group::Web | Group::Native => None,
            Group::Unix => Some(Group::Native),
            Group::Windows => Some(Group::Native),
            Group::AndroidNative => Some(Group::Native),
            Group::WasmNative => Some(Group::Native),
            Group::Apple => Some(Group::Unix),
            Group::Linux => Some(Group::Unix),
            Group::Ios | Group::Macos | Group::Tvos | Group::Watchos => Some(Group::Apple),
        }
    }

    /// Ancestor chain from this group up to (excluding) the root, self first
    pub fn ancestry(&self) -> Vec<Group> {
        let mut chain = vec![*self];
        let mut cursor = *self;
        while let Some(parent) = cursor.parent() {
            chain.push(parent);
            cursor = parent;
        }
        chain
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Leaf target family: the classification directly above concrete targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetFamily {
    Jvm,
    Android,
    Js,
    WasmJs,
    AndroidNative,
    Linux,
    Windows,
    WasmNative,
    Ios,
    Macos,
    Tvos,
    Watchos,
}

impl TargetFamily {
    /// The grouping node this family's leaf targets attach to.
    ///
    /// Managed and web families share a single grouping layer (`managed`,
    /// `web`); native families each carry their own family-level group.
    pub fn group(&self) -> Group {
        match self {
            TargetFamily::Jvm | TargetFamily::Android => Group::Managed,
            TargetFamily::Js | TargetFamily::WasmJs => Group::Web,
            TargetFamily::AndroidNative => Group::AndroidNative,
            TargetFamily::Linux => Group::Linux,
            TargetFamily::Windows => Group::Windows,
            TargetFamily::WasmNative => Group::WasmNative,
            TargetFamily::Ios => Group::Ios,
            TargetFamily::Macos => Group::Macos,
            TargetFamily::Tvos => Group::Tvos,
            TargetFamily::Watchos => Group::Watchos,
        }
    }

    /// Priority rank for callback application order.
    ///
    /// Managed families apply first, then web, then natives in a fixed family
    /// order. Values are relative; only the ordering matters.
    pub fn rank(&self) -> u8 {
        match self {
            TargetFamily::Android => 1,
            TargetFamily::Jvm => 2,
            TargetFamily::Js => 11,
            TargetFamily::WasmJs => 12,
            TargetFamily::AndroidNative => 21,
            TargetFamily::Ios => 31,
            TargetFamily::Macos => 32,
            TargetFamily::Tvos => 33,
            TargetFamily::Watchos => 34,
            TargetFamily::Linux => 41,
            TargetFamily::Windows => 51,
            TargetFamily::WasmNative => 61,
        }
    }

    /// Whether this family supports the device/simulator variant split
    pub fn supports_variant_split(&self) -> bool {
        matches!(
            self,
            TargetFamily::Ios | TargetFamily::Tvos | TargetFamily::Watchos
        )
    }

    /// All families that support the device/simulator variant split
    pub fn split_capable() -> [TargetFamily; 3] {
        [TargetFamily::Ios, TargetFamily::Tvos, TargetFamily::Watchos]
    }
}

/// Side of the device/simulator variant split a leaf target belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitSide {
    /// Runs on physical hardware
    Device,
    /// Runs in a simulated environment on the build host
    Simulator,
}

impl SplitSide {
    /// Grouping-name infix for the split layer (e.g. `iosSimulatorMain`)
    pub fn infix(&self) -> &'static str {
        match self {
            SplitSide::Device => "Device",
            SplitSide::Simulator => "Simulator",
        }
    }
}

/// Every concrete leaf target the engine knows how to materialize
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetId {
    Jvm,
    Android,
    Js,
    WasmJs,
    WasmWasi,
    AndroidNativeArm32,
    AndroidNativeArm64,
    AndroidNativeX64,
    AndroidNativeX86,
    LinuxX64,
    LinuxArm64,
    WindowsX64,
    Wasm32,
    IosArm64,
    IosX64,
    IosSimulatorArm64,
    MacosArm64,
    MacosX64,
    TvosArm64,
    TvosX64,
    TvosSimulatorArm64,
    WatchosArm32,
    WatchosArm64,
    WatchosDeviceArm64,
    WatchosSimulatorArm64,
    WatchosX64,
}

impl TargetId {
    /// All known targets, in family-rank order
    pub const ALL: [TargetId; 26] = [
        TargetId::Android,
        TargetId::Jvm,
        TargetId::Js,
        TargetId::WasmJs,
        TargetId::WasmWasi,
        TargetId::AndroidNativeArm32,
        TargetId::AndroidNativeArm64,
        TargetId::AndroidNativeX64,
        TargetId::AndroidNativeX86,
        TargetId::IosArm64,
        TargetId::IosX64,
        TargetId::IosSimulatorArm64,
        TargetId::MacosArm64,
        TargetId::MacosX64,
        TargetId::TvosArm64,
        TargetId::TvosX64,
        TargetId::TvosSimulatorArm64,
        TargetId::WatchosArm32,
        TargetId::WatchosArm64,
        TargetId::WatchosDeviceArm64,
        TargetId::WatchosSimulatorArm64,
        TargetId::WatchosX64,
        TargetId::LinuxX64,
        TargetId::LinuxArm64,
        TargetId::WindowsX64,
        TargetId::Wasm32,
    ];

    /// The leaf family this target belongs to
    pub fn family(&self) -> TargetFamily {
        match self {
            TargetId::Jvm => TargetFamily::Jvm,
            TargetId::Android => TargetFamily::Android,
            TargetId::Js => TargetFamily::Js,
            TargetId::WasmJs | TargetId::WasmWasi => TargetFamily::WasmJs,
            TargetId::AndroidNativeArm32
            | TargetId::AndroidNativeArm64
            | TargetId::AndroidNativeX64
            | TargetId::AndroidNativeX86 => TargetFamily::AndroidNative,
            TargetId::LinuxX64 | TargetId::LinuxArm64 => TargetFamily::Linux,
            TargetId::WindowsX64 => TargetFamily::Windows,
            TargetId::Wasm32 => TargetFamily::WasmNative,
            TargetId::IosArm64 | TargetId::IosX64 | TargetId::IosSimulatorArm64 => {
                TargetFamily::Ios
            }
            TargetId::MacosArm64 | TargetId::MacosX64 => TargetFamily::Macos,
            TargetId::TvosArm64 | TargetId::TvosX64 | TargetId::TvosSimulatorArm64 => {
                TargetFamily::Tvos
            }
            TargetId::WatchosArm32
            | TargetId::WatchosArm64
            | TargetId::WatchosDeviceArm64
            | TargetId::WatchosSimulatorArm64
            | TargetId::WatchosX64 => TargetFamily::Watchos,
        }
    }

    /// Default logical name for the target's build unit (e.g. `iosArm64`)
    pub fn default_name(&self) -> &'static str {
        match self {
            TargetId::Jvm => "jvm",
            TargetId::Android => "android",
            TargetId::Js => "js",
            TargetId::WasmJs => "wasmJs",
            TargetId::WasmWasi => "wasmWasi",
            TargetId::AndroidNativeArm32 => "androidNativeArm32",
            TargetId::AndroidNativeArm64 => "androidNativeArm64",
            TargetId::AndroidNativeX64 => "androidNativeX64",
            TargetId::AndroidNativeX86 => "androidNativeX86",
            TargetId::LinuxX64 => "linuxX64",
            TargetId::LinuxArm64 => "linuxArm64",
            TargetId::WindowsX64 => "windowsX64",
            TargetId::Wasm32 => "wasm32",
            TargetId::IosArm64 => "iosArm64",
            TargetId::IosX64 => "iosX64",
            TargetId::IosSimulatorArm64 => "iosSimulatorArm64",
            TargetId::MacosArm64 => "macosArm64",
            TargetId::MacosX64 => "macosX64",
            TargetId::TvosArm64 => "tvosArm64",
            TargetId::TvosX64 => "tvosX64",
            TargetId::TvosSimulatorArm64 => "tvosSimulatorArm64",
            TargetId::WatchosArm32 => "watchosArm32",
            TargetId::WatchosArm64 => "watchosArm64",
            TargetId::WatchosDeviceArm64 => "watchosDeviceArm64",
            TargetId::WatchosSimulatorArm64 => "watchosSimulatorArm64",
            TargetId::WatchosX64 => "watchosX64",
        }
    }

    /// External identifier used by allow-lists (e.g. `IOS_SIMULATOR_ARM64`)
    pub fn identifier(&self) -> &'static str {
        match self {
            TargetId::Jvm => "JVM",
            TargetId::Android => "ANDROID",
            TargetId::Js => "JS",
            TargetId::WasmJs => "WASM_JS",
            TargetId::WasmWasi => "WASM_WASI",
            TargetId::AndroidNativeArm32 => "ANDROID_NATIVE_ARM32",
            TargetId::AndroidNativeArm64 => "ANDROID_NATIVE_ARM64",
            TargetId::AndroidNativeX64 => "ANDROID_NATIVE_X64",
            TargetId::AndroidNativeX86 => "ANDROID_NATIVE_X86",
            TargetId::LinuxX64 => "LINUX_X64",
            TargetId::LinuxArm64 => "LINUX_ARM64",
            TargetId::WindowsX64 => "WINDOWS_X64",
            TargetId::Wasm32 => "WASM_32",
            TargetId::IosArm64 => "IOS_ARM64",
            TargetId::IosX64 => "IOS_X64",
            TargetId::IosSimulatorArm64 => "IOS_SIMULATOR_ARM64",
            TargetId::MacosArm64 => "MACOS_ARM64",
            TargetId::MacosX64 => "MACOS_X64",
            TargetId::TvosArm64 => "TVOS_ARM64",
            TargetId::TvosX64 => "TVOS_X64",
            TargetId::TvosSimulatorArm64 => "TVOS_SIMULATOR_ARM64",
            TargetId::WatchosArm32 => "WATCHOS_ARM32",
            TargetId::WatchosArm64 => "WATCHOS_ARM64",
            TargetId::WatchosDeviceArm64 => "WATCHOS_DEVICE_ARM64",
            TargetId::WatchosSimulatorArm64 => "WATCHOS_SIMULATOR_ARM64",
            TargetId::WatchosX64 => "WATCHOS_X64",
        }
    }

    /// Which side of the device/simulator split this target is on.
    ///
    /// `None` for families without a split. Note that x64 Apple targets run
    /// in the simulator, not on hardware.
    pub fn simulator_side(&self) -> Option<SplitSide> {
        match self {
            TargetId::IosArm64 => Some(SplitSide::Device),
            TargetId::IosX64 | TargetId::IosSimulatorArm64 => Some(SplitSide::Simulator),
            TargetId::TvosArm64 => Some(SplitSide::Device),
            TargetId::TvosX64 | TargetId::TvosSimulatorArm64 => Some(SplitSide::Simulator),
            TargetId::WatchosArm32 | TargetId::WatchosArm64 | TargetId::WatchosDeviceArm64 => {
                Some(SplitSide::Device)
            }
            TargetId::WatchosSimulatorArm64 | TargetId::WatchosX64 => Some(SplitSide::Simulator),
            _ => None,
        }
    }

    /// Minimum toolchain version required for this target to be available
    pub fn required_toolchain(&self) -> Option<ToolchainVersion> {
        match self {
            TargetId::WatchosDeviceArm64 => Some(ToolchainVersion::new(1, 8, 0)),
            TargetId::Wasm32 => Some(ToolchainVersion::new(1, 8, 20)),
            TargetId::WasmJs | TargetId::WasmWasi => Some(ToolchainVersion::new(1, 9, 20)),
            _ => None,
        }
    }

    /// Whether the given toolchain version can materialize this target
    pub fn available_on(&self, toolchain: ToolchainVersion) -> bool {
        match self.required_toolchain() {
            Some(required) => toolchain.is_at_least(required.major, required.minor, required.patch),
            None => true,
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Error for unrecognized external target identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("target identifier '{0}' not recognized")]
pub struct UnknownTargetId(pub String);

impl FromStr for TargetId {
    type Err = UnknownTargetId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetId::ALL
            .iter()
            .find(|id| id.identifier() == s)
            .copied()
            .ok_or_else(|| UnknownTargetId(s.to_string()))
    }
}

/// Concrete iOS targets, for the family registration methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IosTarget {
    Arm64,
    X64,
    SimulatorArm64,
}

impl IosTarget {
    pub fn id(self) -> TargetId {
        match self {
            IosTarget::Arm64 => TargetId::IosArm64,
            IosTarget::X64 => TargetId::IosX64,
            IosTarget::SimulatorArm64 => TargetId::IosSimulatorArm64,
        }
    }
}

/// Concrete macOS targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacosTarget {
    Arm64,
    X64,
}

impl MacosTarget {
    pub fn id(self) -> TargetId {
        match self {
            MacosTarget::Arm64 => TargetId::MacosArm64,
            MacosTarget::X64 => TargetId::MacosX64,
        }
    }
}

/// Concrete tvOS targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvosTarget {
    Arm64,
    X64,
    SimulatorArm64,
}

impl TvosTarget {
    pub fn id(self) -> TargetId {
        match self {
            TvosTarget::Arm64 => TargetId::TvosArm64,
            TvosTarget::X64 => TargetId::TvosX64,
            TvosTarget::SimulatorArm64 => TargetId::TvosSimulatorArm64,
        }
    }
}

/// Concrete watchOS targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchosTarget {
    Arm32,
    Arm64,
    DeviceArm64,
    SimulatorArm64,
    X64,
}

impl WatchosTarget {
    pub fn id(self) -> TargetId {
        match self {
            WatchosTarget::Arm32 => TargetId::WatchosArm32,
            WatchosTarget::Arm64 => TargetId::WatchosArm64,
            WatchosTarget::DeviceArm64 => TargetId::WatchosDeviceArm64,
            WatchosTarget::SimulatorArm64 => TargetId::WatchosSimulatorArm64,
            WatchosTarget::X64 => TargetId::WatchosX64,
        }
    }
}

/// Concrete Linux targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinuxTarget {
    X64,
    Arm64,
}

impl LinuxTarget {
    pub fn id(self) -> TargetId {
        match self {
            LinuxTarget::X64 => TargetId::LinuxX64,
            LinuxTarget::Arm64 => TargetId::LinuxArm64,
        }
    }
}

/// Concrete Windows targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowsTarget {
    X64,
}

impl WindowsTarget {
    pub fn id(self) -> TargetId {
        match self {
            WindowsTarget::X64 => TargetId::WindowsX64,
        }
    }
}

/// Concrete Android NDK targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndroidNativeTarget {
    Arm32,
    Arm64,
    X64,
    X86,
}

impl AndroidNativeTarget {
    pub fn id(self) -> TargetId {
        match self {
            AndroidNativeTarget::Arm32 => TargetId::AndroidNativeArm32,
            AndroidNativeTarget::Arm64 => TargetId::AndroidNativeArm64,
            AndroidNativeTarget::X64 => TargetId::AndroidNativeX64,
            AndroidNativeTarget::X86 => TargetId::AndroidNativeX86,
        }
    }
}

/// Concrete browser/WASI wasm targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WasmJsTarget {
    Js,
    Wasi,
}

impl WasmJsTarget {
    pub fn id(self) -> TargetId {
        match self {
            WasmJsTarget::Js => TargetId::WasmJs,
            WasmJsTarget::Wasi => TargetId::WasmWasi,
        }
    }
}

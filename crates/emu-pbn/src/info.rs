//! Static descriptions of the core handed to the host.
//!
//! Everything here is fixed: one system, one region, one content type and
//! one paint device. The host uses these records to build its menus, input
//! mapping and settings dialogs.

use bitflags::bitflags;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::config::DIMENSION_PATTERN;
use crate::pbn::FPS;

/// Identifier shared by the system, core, content type and region.
pub const SYSTEM_NAME: &str = "pbn";

/// System regions the core runs in.
pub const SYSREGIONS: &[u32] = &[0];

bitflags! {
    /// Optional host features a core can opt into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CoreCaps: u32 {
        /// The core runs in more than one region.
        const MULTI_REGION = 1 << 0;
        /// The core has a soft reset.
        const RESET = 1 << 1;
        /// The core has battery-backed memory.
        const SRAM = 1 << 2;
        /// The core answers `compute_scale`.
        const SCALE = 1 << 3;
        /// The core reports a lightgun coordinate space.
        const LIGHTGUN = 1 << 4;
    }
}

/// Answer to describe-core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreInfo {
    /// Port and controller layout.
    pub json: JsonValue,
    /// Key of the port list inside `json`.
    pub root_ptr: &'static str,
    pub short_name: &'static str,
    pub full_name: &'static str,
    #[serde(serialize_with = "serialize_caps")]
    pub caps: CoreCaps,
}

fn serialize_caps<S: serde::Serializer>(caps: &CoreCaps, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u32(caps.bits())
}

/// One loadable image slot of a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub iname: &'static str,
    pub hname: &'static str,
    pub mandatory: bool,
    /// Whether the image is passed as markup rather than raw bytes.
    pub markup: bool,
    /// Largest accepted image in bytes. `None` means no limit.
    pub max_size: Option<usize>,
    pub extensions: &'static str,
}

/// One user-editable setting of a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingInfo {
    pub iname: &'static str,
    pub hname: &'static str,
    pub default: &'static str,
    /// Regular expression the host validates values against.
    pub pattern: &'static str,
}

/// Answer to describe-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    pub core: u32,
    pub iname: &'static str,
    pub hname: &'static str,
    pub sysname: &'static str,
    pub bios: Option<&'static str>,
    pub regions: &'static [u32],
    pub images: &'static [ImageInfo],
    pub settings: &'static [SettingInfo],
}

/// Answer to describe-region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionInfo {
    pub iname: &'static str,
    pub hname: &'static str,
    pub priority: u32,
    pub multi: bool,
    pub fps_num: u32,
    pub fps_den: u32,
    pub compatible_runs: &'static [u32],
}

/// Answer to describe-sysregion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SysregionInfo {
    pub name: &'static str,
    pub kind: u32,
    pub region: u32,
    pub for_system: &'static str,
}

/// Answer to describe-controller-config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControllerConfig {
    pub controller_types: &'static [u32],
    /// `(port, controller)` for each logical controller, in logical order.
    pub logical_map: &'static [(u32, u32)],
}

const IMAGES: &[ImageInfo] = &[ImageInfo {
    iname: SYSTEM_NAME,
    hname: SYSTEM_NAME,
    mandatory: true,
    markup: false,
    max_size: None,
    extensions: SYSTEM_NAME,
}];

const SETTINGS: &[SettingInfo] = &[
    SettingInfo {
        iname: "width",
        hname: "width",
        default: "64",
        pattern: DIMENSION_PATTERN,
    },
    SettingInfo {
        iname: "height",
        hname: "height",
        default: "56",
        pattern: DIMENSION_PATTERN,
    },
];

/// A control as declared in the core JSON.
struct ControlDecl {
    symbol: &'static str,
    kind: &'static str,
    name: &'static str,
    range: Option<(i32, i32)>,
    shadow: bool,
}

/// Paint device controls X, Y, R, G, B, P, then the system framesync F.
const CONTROLS: &[ControlDecl] = &[
    ControlDecl { symbol: "X", kind: "lightgun", name: "x", range: Some((0, 255)), shadow: false },
    ControlDecl { symbol: "Y", kind: "lightgun", name: "y", range: Some((0, 255)), shadow: false },
    ControlDecl { symbol: "R", kind: "taxis", name: "r", range: Some((0, 255)), shadow: false },
    ControlDecl { symbol: "G", kind: "taxis", name: "g", range: Some((0, 255)), shadow: false },
    ControlDecl { symbol: "B", kind: "taxis", name: "b", range: Some((0, 255)), shadow: false },
    ControlDecl { symbol: "P", kind: "button", name: "s", range: None, shadow: false },
    ControlDecl { symbol: "F", kind: "button", name: "framesync", range: None, shadow: true },
];

fn control_json(decl: &ControlDecl) -> JsonValue {
    let mut entry = json!({ "type": decl.kind, "name": decl.name });
    if let Some((min, max)) = decl.range {
        entry["min"] = json!(min);
        entry["max"] = json!(max);
    }
    if decl.shadow {
        entry["symbol"] = json!(decl.symbol);
        entry["shadow"] = json!(true);
    }
    entry
}

/// The port/controller layout document.
#[must_use]
pub fn core_json() -> JsonValue {
    let mut doc = serde_json::Map::new();
    for decl in CONTROLS {
        doc.insert(decl.symbol.to_owned(), control_json(decl));
    }
    doc.insert(
        "d".to_owned(),
        json!({
            "type": SYSTEM_NAME,
            "class": SYSTEM_NAME,
            "buttons": ["X", "Y", "R", "G", "B", "P"],
        }),
    );
    doc.insert(
        "s".to_owned(),
        json!({
            "type": "(system)",
            "class": "(system)",
            "buttons": ["F"],
        }),
    );
    doc.insert(
        "port".to_owned(),
        json!([{
            "symbol": SYSTEM_NAME,
            "name": SYSTEM_NAME,
            "hname": SYSTEM_NAME,
            "controllers": ["s", "d"],
            "legal": [0],
        }]),
    );
    JsonValue::Object(doc)
}

#[must_use]
pub fn core_info() -> CoreInfo {
    CoreInfo {
        json: core_json(),
        root_ptr: "port",
        short_name: SYSTEM_NAME,
        full_name: SYSTEM_NAME,
        caps: CoreCaps::SCALE | CoreCaps::LIGHTGUN,
    }
}

#[must_use]
pub const fn type_info() -> TypeInfo {
    TypeInfo {
        core: 0,
        iname: SYSTEM_NAME,
        hname: SYSTEM_NAME,
        sysname: SYSTEM_NAME,
        bios: None,
        regions: SYSREGIONS,
        images: IMAGES,
        settings: SETTINGS,
    }
}

#[must_use]
pub const fn region_info() -> RegionInfo {
    RegionInfo {
        iname: SYSTEM_NAME,
        hname: SYSTEM_NAME,
        priority: 0,
        multi: false,
        fps_num: FPS.num,
        fps_den: FPS.den,
        compatible_runs: SYSREGIONS,
    }
}

#[must_use]
pub const fn sysregion_info() -> SysregionInfo {
    SysregionInfo {
        name: SYSTEM_NAME,
        kind: 0,
        region: 0,
        for_system: SYSTEM_NAME,
    }
}

#[must_use]
pub const fn controller_config() -> ControllerConfig {
    ControllerConfig {
        controller_types: &[0],
        logical_map: &[(0, 1)],
    }
}

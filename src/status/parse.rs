//! Parsers for status command output.

use super::{HARD_BLOCKED, OFFLINE, SOFT_BLOCKED};
use serde::Deserialize;
use std::collections::HashMap;

/// One device from `rfkill -J`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RfkillDevice {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub soft: String,
    #[serde(default)]
    pub hard: String,
}

#[derive(Debug, Deserialize)]
struct RfkillOutput {
    #[serde(default)]
    rfkilldevices: Vec<RfkillDevice>,
}

/// Parse `rfkill -J` output.
pub fn rfkill_devices(json: &str) -> Result<Vec<RfkillDevice>, serde_json::Error> {
    let out: RfkillOutput = serde_json::from_str(json)?;
    Ok(out.rfkilldevices)
}

/// Block signal of the first `kind` device that is blocked, if any.
pub fn rfkill_block(devices: &[RfkillDevice], kind: &str) -> Option<i32> {
    devices
        .iter()
        .filter(|d| d.kind == kind)
        .find_map(|d| {
            if d.hard == "blocked" {
                Some(HARD_BLOCKED)
            } else if d.soft == "blocked" {
                Some(SOFT_BLOCKED)
            } else {
                None
            }
        })
}

/// Signal of the in-use network from `nmcli -f IN-USE,SIGNAL d wifi`.
pub fn nmcli_signal(out: &str) -> Option<i32> {
    out.lines()
        .map(str::trim)
        .find(|l| l.starts_with('*'))
        .and_then(|l| l.trim_start_matches('*').trim().parse().ok())
}

/// Connected device count from `bluetoothctl devices Connected`; `-1` when
/// nothing is connected.
pub fn bluetooth_connected(out: &str) -> i32 {
    match out.lines().filter(|l| !l.trim().is_empty()).count() {
        0 => OFFLINE,
        n => i32::try_from(n).unwrap_or(i32::MAX),
    }
}

/// Volume percent from `wpctl get-volume` (`Volume: 0.42 [MUTED]`).
///
/// Muted or unparseable output reads `-1`.  The fraction is rounded, not
/// truncated, so `0.29` reads 29 rather than 28.
pub fn wpctl_volume(out: &str, mute_string: &str) -> i32 {
    if !mute_string.is_empty() && out.contains(mute_string) {
        return OFFLINE;
    }
    out.split_whitespace()
        .nth(1)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| (v * 100.0).round() as i32)
        .unwrap_or(OFFLINE)
}

/// A PipeWire node as listed by `pw-dump`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwNode {
    pub id: u32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct PwObject {
    id: u32,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    info: Option<PwInfo>,
    #[serde(default)]
    props: HashMap<String, serde_json::Value>,
    #[serde(default)]
    metadata: Option<Vec<PwMetadata>>,
}

#[derive(Debug, Default, Deserialize)]
struct PwInfo {
    #[serde(default)]
    props: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PwMetadata {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: serde_json::Value,
}

fn prop<'a>(props: &'a HashMap<String, serde_json::Value>, key: &str) -> Option<&'a str> {
    props.get(key).and_then(|v| v.as_str())
}

/// Node name of the default device for `media_class` (`"Audio/Sink"`),
/// from the `default` metadata object.
fn pw_default(objects: &[PwObject], media_class: &str) -> Option<String> {
    let key = format!("default.{}", media_class.replace('/', ".").to_lowercase());
    objects
        .iter()
        .filter(|o| o.kind == "PipeWire:Interface:Metadata")
        .filter(|o| prop(&o.props, "metadata.name") == Some("default"))
        .flat_map(|o| o.metadata.iter().flatten())
        .filter(|m| m.key == key)
        .find_map(|m| m.value.get("name").and_then(|n| n.as_str()))
        .map(str::to_string)
}

/// The node after the current default of `media_class` in `pw-dump`
/// order, wrapping to the first.
///
/// `None` when the current default is not among the listed nodes.
pub fn pw_next_node(json: &str, media_class: &str) -> Result<Option<PwNode>, serde_json::Error> {
    let objects: Vec<PwObject> = serde_json::from_str(json)?;
    let Some(current) = pw_default(&objects, media_class) else {
        return Ok(None);
    };
    let nodes: Vec<PwNode> = objects
        .iter()
        .filter_map(|o| {
            let props = &o.info.as_ref()?.props;
            if prop(props, "media.class") != Some(media_class) {
                return None;
            }
            let name = prop(props, "node.name")?.to_string();
            let description = prop(props, "node.description").unwrap_or(&name).to_string();
            Some(PwNode {
                id: o.id,
                name,
                description,
            })
        })
        .collect();
    let Some(i) = nodes.iter().position(|n| n.name == current) else {
        return Ok(None);
    };
    Ok(nodes.into_iter().cycle().nth(i + 1))
}

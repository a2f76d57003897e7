//! [`Host`] implementation backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its command socket,
//! avoiding any shell command invocation or third-party crate for socket
//! discovery.
//!
//! Hyprland has no native minimize, so minimized windows are parked on the
//! special workspace `special:minimized` and restored by moving them back
//! to the active workspace.

use super::instance_socket;
use crate::command::{HostState, WindowId, WindowInfo};
use crate::traits::Host;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// Workspace that holds minimized windows.
pub const MINIMIZED_WORKSPACE: &str = "special:minimized";

/// Hyprland-backed host.
///
/// Each method call opens a short-lived request on the command socket
/// (`$XDG_RUNTIME_DIR/hypr/<instance>/.socket.sock`).
#[derive(Debug, Clone)]
pub struct HyprlandHost {
    socket: PathBuf,
}

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandHostError(String);

impl HyprlandHost {
    /// Handle for the running Hyprland instance.
    ///
    /// No connection is opened eagerly.
    pub fn new() -> Result<Self, HyprlandHostError> {
        let socket = instance_socket(".socket.sock").map_err(HyprlandHostError)?;
        Ok(Self { socket })
    }

    /// Handle for a command socket at an explicit path.
    pub fn with_socket(path: impl AsRef<Path>) -> Self {
        Self {
            socket: path.as_ref().to_path_buf(),
        }
    }

    //  Direct Hyprland IPC helpers

    /// Send a raw command and return the response as a string.
    fn request(&self, command: &str) -> Result<String, HyprlandHostError> {
        let mut stream = UnixStream::connect(&self.socket).map_err(|e| {
            HyprlandHostError(format!("connect to {}: {}", self.socket.display(), e))
        })?;

        stream
            .write_all(command.as_bytes())
            .map_err(|e| HyprlandHostError(format!("write: {}", e)))?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(|e| HyprlandHostError(format!("read: {}", e)))?;

        String::from_utf8(response).map_err(|e| HyprlandHostError(format!("utf-8: {}", e)))
    }

    /// Send a JSON data query (`j/<command>`) and return the raw JSON string.
    fn json(&self, data_command: &str) -> Result<String, HyprlandHostError> {
        self.request(&format!("j/{}", data_command))
    }

    /// Send a dispatch command and check for `"ok"`.
    fn dispatch(&self, args: &str) -> Result<(), HyprlandHostError> {
        debug!("dispatch {}", args);
        let response = self.request(&format!("/dispatch {}", args))?;
        if response.trim() == "ok" {
            Ok(())
        } else {
            Err(HyprlandHostError(format!("dispatch error: {}", response)))
        }
    }

    fn monitors(&self) -> Result<Vec<MonitorJson>, HyprlandHostError> {
        parse_monitors(&self.json("monitors")?)
    }
}

//  Minimal serde structs for the JSON we care about

/// `{ "id": 1, "name": "1" }` as found in several replies.
#[derive(Debug, Clone, Deserialize)]
struct WorkspaceRef {
    id: i64,
    name: String,
}

/// Subset of the JSON object returned by `j/clients`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientJson {
    address: String,
    #[serde(default = "default_true")]
    mapped: bool,
    workspace: WorkspaceRef,
    #[serde(default)]
    floating: bool,
    #[serde(default)]
    class: String,
    #[serde(default)]
    initial_class: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    pid: i64,
    #[serde(default)]
    urgent: bool,
    /// 0 for the focused window, counting up through older focus.
    #[serde(rename = "focusHistoryID", default)]
    focus_history_id: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonitorJson {
    id: i64,
    name: String,
    active_workspace: WorkspaceRef,
    #[serde(default)]
    focused: bool,
}

/// Subset of the JSON object returned by `j/activewindow`.
#[derive(Debug, Deserialize)]
struct ActiveWindowJson {
    address: String,
}

fn parse_err(e: serde_json::Error) -> HyprlandHostError {
    HyprlandHostError(format!("parse: {}", e))
}

/// Monitors sorted by id, so screen indices are stable.
fn parse_monitors(json: &str) -> Result<Vec<MonitorJson>, HyprlandHostError> {
    let mut monitors: Vec<MonitorJson> = serde_json::from_str(json).map_err(parse_err)?;
    monitors.sort_by_key(|m| m.id);
    Ok(monitors)
}

/// Build a [`HostState`] from the `j/clients`, `j/monitors` and
/// `j/activewindow` replies.
fn build_state(clients: &str, monitors: &str, active: &str) -> Result<HostState, HyprlandHostError> {
    let clients: Vec<ClientJson> = serde_json::from_str(clients).map_err(parse_err)?;
    let monitors = parse_monitors(monitors)?;
    // Hyprland returns an empty object `{}` when no window is focused.
    let focused_window = if active.trim() == "{}" || active.trim().is_empty() {
        None
    } else {
        let w: ActiveWindowJson = serde_json::from_str(active).map_err(parse_err)?;
        Some(WindowId(w.address))
    };

    let mut recent: HashMap<String, (i64, WindowId)> = HashMap::new();
    for c in clients.iter().filter(|c| c.mapped) {
        let Some(rank) = c.focus_history_id.filter(|r| *r >= 0) else {
            continue;
        };
        let slot = recent
            .entry(c.workspace.name.clone())
            .or_insert_with(|| (rank, WindowId(c.address.clone())));
        if rank < slot.0 {
            *slot = (rank, WindowId(c.address.clone()));
        }
    }

    let windows = clients
        .into_iter()
        .filter(|c| c.mapped)
        .map(|c| {
            let mut classes = Vec::new();
            for class in [c.class, c.initial_class] {
                if !class.is_empty() && !classes.contains(&class) {
                    classes.push(class);
                }
            }
            WindowInfo {
                id: WindowId(c.address),
                name: c.title,
                classes,
                pid: u32::try_from(c.pid).ok().filter(|p| *p > 0),
                minimized: c.workspace.name == MINIMIZED_WORKSPACE,
                group: c.workspace.name,
                floating: c.floating,
                urgent: c.urgent,
            }
        })
        .collect();

    Ok(HostState {
        windows,
        focused_window,
        focused_screen: monitors.iter().position(|m| m.focused).unwrap_or(0),
        screen_groups: monitors.into_iter().map(|m| m.active_workspace.name).collect(),
        group_windows: recent.into_iter().map(|(group, (_, id))| (group, id)).collect(),
    })
}

/// `workspace` dispatch argument for a group name.
///
/// Numeric names address workspaces by id; anything else by name.
fn workspace_arg(group: &str) -> String {
    if group.parse::<i64>().is_ok() {
        group.to_string()
    } else {
        format!("name:{}", group)
    }
}

//  Host implementation

impl Host for HyprlandHost {
    type Error = HyprlandHostError;

    fn state(&self) -> Result<HostState, Self::Error> {
        let clients = self.json("clients")?;
        let monitors = self.json("monitors")?;
        let active = self.json("activewindow")?;
        build_state(&clients, &monitors, &active)
    }

    fn focus_screen(&self, screen: usize) -> Result<(), Self::Error> {
        let monitors = self.monitors()?;
        let monitor = monitors
            .get(screen)
            .ok_or_else(|| HyprlandHostError(format!("no screen {}", screen)))?;
        self.dispatch(&format!("focusmonitor {}", monitor.name))
    }

    fn show_group(&self, group: &str) -> Result<(), Self::Error> {
        if group.starts_with("special:") {
            // Special workspaces are overlays; restoring moves the window.
            debug!("not switching to {}", group);
            return Ok(());
        }
        self.dispatch(&format!("workspace {}", workspace_arg(group)))
    }

    fn focus_window(&self, window: &WindowId) -> Result<(), Self::Error> {
        self.dispatch(&format!("focuswindow address:{}", window))
    }

    fn set_minimized(&self, window: &WindowId, minimized: bool) -> Result<(), Self::Error> {
        if minimized {
            return self.dispatch(&format!(
                "movetoworkspacesilent {},address:{}",
                MINIMIZED_WORKSPACE, window
            ));
        }
        let monitors = self.monitors()?;
        let target = monitors
            .iter()
            .find(|m| m.focused)
            .or(monitors.first())
            .ok_or_else(|| HyprlandHostError("no monitors".into()))?;
        self.dispatch(&format!(
            "movetoworkspace {},address:{}",
            target.active_workspace.id, window
        ))
    }

    fn bring_to_front(&self, window: &WindowId) -> Result<(), Self::Error> {
        self.dispatch(&format!("alterzorder top,address:{}", window))
    }

    fn spawn(&self, command: &str) -> Result<(), Self::Error> {
        self.dispatch(&format!("exec {}", command))
    }
}

//  Tests

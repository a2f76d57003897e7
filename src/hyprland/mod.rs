//! Hyprland-specific implementations.
//!
//! This module provides concrete backends for the
//! [`Host`](crate::traits::Host) and
//! [`CommandSource`](crate::traits::CommandSource) traits, powered by
//! Hyprland's IPC sockets.
//!
//! Nothing outside this module should reference Hyprland directly.

pub mod events;
pub mod host;

use std::path::PathBuf;

/// Path of one of Hyprland's sockets (`.socket.sock`, `.socket2.sock`).
///
/// Hyprland ≥ 0.40 stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/`.
fn instance_socket(name: &str) -> Result<PathBuf, String> {
    let runtime_dir =
        std::env::var("XDG_RUNTIME_DIR").map_err(|_| "XDG_RUNTIME_DIR not set".to_string())?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| "HYPRLAND_INSTANCE_SIGNATURE not set".to_string())?;
    Ok(PathBuf::from(format!("{}/hypr/{}/{}", runtime_dir, his, name)))
}

//! Commands and types used throughout pindock.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every request the dock daemon can handle, and
//! [`WindowId`] / [`WindowInfo`] / [`HostState`] describe the live window
//! set the host reports.
//!
//! Mouse buttons are accepted as names (`"primary"`, `"middle"`,
//! `"secondary"`, `"left"`, `"right"`) or as X11 button numbers (`1`, `2`,
//! `3`) so simple shell bindings can forward whatever they have.

use crate::notify::Notification;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque window identifier assigned by the host (e.g. a Hyprland address
/// such as `"0x5581c0d2a3f0"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(s: &str) -> Self {
        WindowId(s.to_string())
    }
}

impl From<String> for WindowId {
    fn from(s: String) -> Self {
        WindowId(s)
    }
}

/// One open window as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowInfo {
    /// Host-assigned identifier.
    pub id: WindowId,
    /// Window title.
    pub name: String,
    /// Window class strings (`WM_CLASS` instance/class, Wayland app id, …).
    pub classes: Vec<String>,
    /// Owning process id, when the host knows it.
    pub pid: Option<u32>,
    /// Name of the group (workspace) the window lives on.
    pub group: String,
    pub minimized: bool,
    pub floating: bool,
    pub urgent: bool,
}

/// Snapshot of the host's window-manager state.
///
/// Passed explicitly into reconciliation and selection instead of being
/// looked up from a global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostState {
    /// Every open window, in the order the host reports them.
    pub windows: Vec<WindowInfo>,
    /// The window that currently has keyboard focus.
    pub focused_window: Option<WindowId>,
    /// Index of the focused screen.
    pub focused_screen: usize,
    /// Name of the group displayed on each screen, indexed by screen.
    pub screen_groups: Vec<String>,
    /// Most recently focused window of each group.
    pub group_windows: HashMap<String, WindowId>,
}

impl HostState {
    /// Look up a window by id.
    pub fn window(&self, id: &WindowId) -> Option<&WindowInfo> {
        self.windows.iter().find(|w| &w.id == id)
    }

    /// Name of the group shown on `screen`, if that screen exists.
    pub fn group_on_screen(&self, screen: usize) -> Option<&str> {
        self.screen_groups.get(screen).map(String::as_str)
    }

    /// Index of the screen currently showing `group`, if any.
    pub fn screen_of_group(&self, group: &str) -> Option<usize> {
        self.screen_groups.iter().position(|g| g == group)
    }

    /// Whether `id` is the focused window and its group is the one shown
    /// on the focused screen.
    pub fn is_front_window(&self, id: &WindowId) -> bool {
        let Some(window) = self.window(id) else {
            return false;
        };
        self.focused_window.as_ref() == Some(id)
            && self.group_on_screen(self.focused_screen) == Some(window.group.as_str())
    }

    /// Whether `id` is the current window of a group shown on a screen
    /// other than the focused one.
    pub fn is_current_on_other_screen(&self, id: &WindowId) -> bool {
        let Some(window) = self.window(id) else {
            return false;
        };
        self.group_windows.get(&window.group) == Some(id)
            && self
                .screen_of_group(&window.group)
                .is_some_and(|screen| screen != self.focused_screen)
    }
}

/// Pointer button used to select a dock entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Button {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl Button {
    /// Alternate buttons always launch a new instance instead of focusing.
    pub fn spawns_new_instance(self) -> bool {
        !matches!(self, Button::Primary)
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Primary => write!(f, "primary"),
            Button::Middle => write!(f, "middle"),
            Button::Secondary => write!(f, "secondary"),
        }
    }
}

/// Parse a button name (case-insensitive; accepts "primary", "Left", "right", …).
fn parse_button(s: &str) -> Option<Button> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "primary" | "left" | "button1" => Some(Button::Primary),
        "middle" | "button2" => Some(Button::Middle),
        "secondary" | "right" | "button3" => Some(Button::Secondary),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Button {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Button;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "button name or number 1-3")
            }
            fn visit_u64<E>(self, n: u64) -> Result<Button, E>
            where
                E: DeError,
            {
                match n {
                    1 => Ok(Button::Primary),
                    2 => Ok(Button::Middle),
                    3 => Ok(Button::Secondary),
                    _ => Err(DeError::custom(format!("invalid button number: {}", n))),
                }
            }
            fn visit_i64<E>(self, n: i64) -> Result<Button, E>
            where
                E: DeError,
            {
                if n < 0 {
                    return Err(DeError::custom(format!("invalid button number: {}", n)));
                }
                self.visit_u64(n as u64)
            }
            fn visit_str<E>(self, s: &str) -> Result<Button, E>
            where
                E: DeError,
            {
                parse_button(s).ok_or_else(|| DeError::custom(format!("invalid button: {:?}", s)))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every request the dock can handle.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the [`Dock`](crate::dock::Dock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Re-query the host and recompute the entry list.
    ///
    /// On the wire this is the JSON string `"Refresh"`.
    Refresh,

    /// Click the entry at `index` (0-based, in display order).
    Select {
        index: usize,
        #[serde(default)]
        button: Button,
    },

    /// A desktop notification was shown; bump the badge of the matching
    /// window.
    Notify(Notification),

    /// Clear the notification badge of `window`.
    Dismiss { window: WindowId },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> HostState {
        HostState {
            windows: vec![
                WindowInfo {
                    id: "0x1".into(),
                    name: "term".into(),
                    group: "1".into(),
                    ..Default::default()
                },
                WindowInfo {
                    id: "0x2".into(),
                    name: "browser".into(),
                    group: "2".into(),
                    ..Default::default()
                },
            ],
            focused_window: Some("0x1".into()),
            focused_screen: 0,
            screen_groups: vec!["1".into(), "2".into()],
            group_windows: HashMap::from([
                ("1".into(), "0x1".into()),
                ("2".into(), "0x2".into()),
            ]),
        }
    }

    #[test]
    fn button_display() {
        assert_eq!(Button::Primary.to_string(), "primary");
        assert_eq!(Button::Middle.to_string(), "middle");
        assert_eq!(Button::Secondary.to_string(), "secondary");
    }

    #[test]
    fn button_accepts_names_and_numbers() {
        let b: Button = serde_json::from_str(r#""Left""#).unwrap();
        assert_eq!(b, Button::Primary);
        let b: Button = serde_json::from_str(r#""right""#).unwrap();
        assert_eq!(b, Button::Secondary);
        let b: Button = serde_json::from_str("2").unwrap();
        assert_eq!(b, Button::Middle);
        assert!(serde_json::from_str::<Button>("7").is_err());
        assert!(serde_json::from_str::<Button>(r#""wheel""#).is_err());
    }

    #[test]
    fn only_alternate_buttons_spawn() {
        assert!(!Button::Primary.spawns_new_instance());
        assert!(Button::Middle.spawns_new_instance());
        assert!(Button::Secondary.spawns_new_instance());
    }

    #[test]
    fn parse_wire_commands() {
        let cmd: Command = serde_json::from_str(r#""Refresh""#).unwrap();
        assert_eq!(cmd, Command::Refresh);

        let cmd: Command = serde_json::from_str(r#"{"Select":{"index":2}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Select {
                index: 2,
                button: Button::Primary
            }
        );

        let cmd: Command =
            serde_json::from_str(r#"{"Select":{"index":0,"button":3}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Select {
                index: 0,
                button: Button::Secondary
            }
        );

        let cmd: Command = serde_json::from_str(r#"{"Dismiss":{"window":"0x55"}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Dismiss {
                window: "0x55".into()
            }
        );
    }

    #[test]
    fn host_state_lookups() {
        let s = state();
        assert_eq!(s.window(&"0x2".into()).map(|w| w.name.as_str()), Some("browser"));
        assert!(s.window(&"0x9".into()).is_none());
        assert_eq!(s.group_on_screen(1), Some("2"));
        assert_eq!(s.group_on_screen(5), None);
        assert_eq!(s.screen_of_group("2"), Some(1));
        assert_eq!(s.screen_of_group("7"), None);
    }

    #[test]
    fn front_window_requires_focus_and_visible_group() {
        let mut s = state();
        assert!(s.is_front_window(&"0x1".into()));
        assert!(!s.is_front_window(&"0x2".into()));

        // Focused, but its group is not on the focused screen.
        s.focused_screen = 1;
        assert!(!s.is_front_window(&"0x1".into()));
    }

    #[test]
    fn current_window_on_other_screen() {
        let mut s = state();
        assert!(s.is_current_on_other_screen(&"0x2".into()));
        assert!(!s.is_current_on_other_screen(&"0x1".into()));

        s.focused_screen = 1;
        assert!(s.is_current_on_other_screen(&"0x1".into()));
        assert!(!s.is_current_on_other_screen(&"0x2".into()));

        // Not the current window of its group.
        s.group_windows.insert("1".into(), "0x9".into());
        assert!(!s.is_current_on_other_screen(&"0x1".into()));

        // Group not shown on any screen.
        s.screen_groups = vec!["2".into()];
        s.group_windows.insert("1".into(), "0x1".into());
        assert!(!s.is_current_on_other_screen(&"0x1".into()));
    }
}

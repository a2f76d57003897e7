//! Notification badges.
//!
//! Desktop notifications carry a sender pid and/or a desktop-entry hint.
//! [`NotificationCounter`] maps them onto the window of a bound dock entry
//! and keeps a per-window count that the dock renders as a badge.  Counts
//! are cleared when the entry is selected or explicitly dismissed.

use crate::app::DockEntry;
use crate::command::{HostState, WindowId, WindowInfo};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The parts of a desktop notification used to find its window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// `sender-pid` hint.
    #[serde(default)]
    pub sender_pid: Option<u32>,
    /// `desktop-entry` hint, or the application name.
    #[serde(default)]
    pub desktop_entry: Option<String>,
}

impl Notification {
    fn matches(&self, window: &WindowInfo) -> bool {
        if let (Some(pid), Some(wpid)) = (self.sender_pid, window.pid) {
            if pid == wpid {
                return true;
            }
        }
        match self.desktop_entry.as_deref() {
            Some(name) if !name.is_empty() => {
                window.name == name || window.classes.iter().any(|c| c == name)
            }
            _ => false,
        }
    }
}

/// Per-window unread notification counts.
#[derive(Debug, Default)]
pub struct NotificationCounter {
    counts: HashMap<WindowId, u32>,
}

impl NotificationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `notification` to the first bound entry whose window
    /// matches it, in dock order.
    ///
    /// Returns the window that was bumped, or `None` if nothing matched.
    pub fn notify(
        &mut self,
        notification: &Notification,
        entries: &[DockEntry],
        state: &HostState,
    ) -> Option<WindowId> {
        let window = entries
            .iter()
            .filter_map(DockEntry::window)
            .filter_map(|id| state.window(id))
            .find(|w| notification.matches(w))?;
        let count = self.counts.entry(window.id.clone()).or_insert(0);
        *count += 1;
        debug!("notification for {} (count {})", window.id, count);
        Some(window.id.clone())
    }

    /// Unread count for `window` (0 if none).
    pub fn count(&self, window: &WindowId) -> u32 {
        self.counts.get(window).copied().unwrap_or(0)
    }

    /// Clear the count for `window`.
    pub fn dismiss(&mut self, window: &WindowId) {
        self.counts.remove(window);
    }

    /// Drop counts for windows that are no longer open.
    pub fn retain_open(&mut self, state: &HostState) {
        self.counts.retain(|id, _| state.window(id).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(id: &str, name: &str, class: &str, pid: u32) -> WindowInfo {
        WindowInfo {
            id: id.into(),
            name: name.into(),
            classes: vec![class.into()],
            pid: Some(pid),
            group: "1".into(),
            ..Default::default()
        }
    }

    fn setup() -> (Vec<DockEntry>, HostState) {
        let state = HostState {
            windows: vec![
                window("0x1", "Inbox - Thunderbird", "thunderbird", 100),
                window("0x2", "Chat", "org.telegram.desktop", 200),
            ],
            ..Default::default()
        };
        let entries = vec![
            DockEntry::Pinned {
                pinned: 0,
                window: Some("0x1".into()),
            },
            DockEntry::Pinned {
                pinned: 1,
                window: None,
            },
            DockEntry::Unpinned {
                window: "0x2".into(),
            },
        ];
        (entries, state)
    }

    #[test]
    fn matches_by_pid() {
        let (entries, state) = setup();
        let mut counter = NotificationCounter::new();
        let n = Notification {
            sender_pid: Some(200),
            desktop_entry: None,
        };
        assert_eq!(counter.notify(&n, &entries, &state), Some("0x2".into()));
        assert_eq!(counter.count(&"0x2".into()), 1);
        counter.notify(&n, &entries, &state);
        assert_eq!(counter.count(&"0x2".into()), 2);
    }

    #[test]
    fn matches_by_class_or_name() {
        let (entries, state) = setup();
        let mut counter = NotificationCounter::new();
        let by_class = Notification {
            sender_pid: None,
            desktop_entry: Some("thunderbird".into()),
        };
        assert_eq!(counter.notify(&by_class, &entries, &state), Some("0x1".into()));

        let by_name = Notification {
            sender_pid: Some(9999),
            desktop_entry: Some("Chat".into()),
        };
        assert_eq!(counter.notify(&by_name, &entries, &state), Some("0x2".into()));
    }

    #[test]
    fn unmatched_notification_is_ignored() {
        let (entries, state) = setup();
        let mut counter = NotificationCounter::new();
        let n = Notification {
            sender_pid: Some(1),
            desktop_entry: Some("".into()),
        };
        assert_eq!(counter.notify(&n, &entries, &state), None);
        assert_eq!(counter.count(&"0x1".into()), 0);
    }

    #[test]
    fn dismiss_and_prune() {
        let (entries, mut state) = setup();
        let mut counter = NotificationCounter::new();
        counter.notify(
            &Notification {
                sender_pid: Some(100),
                desktop_entry: None,
            },
            &entries,
            &state,
        );
        counter.notify(
            &Notification {
                sender_pid: Some(200),
                desktop_entry: None,
            },
            &entries,
            &state,
        );

        counter.dismiss(&"0x1".into());
        assert_eq!(counter.count(&"0x1".into()), 0);
        assert_eq!(counter.count(&"0x2".into()), 1);

        state.windows.retain(|w| w.id.0 != "0x2");
        counter.retain_open(&state);
        assert_eq!(counter.count(&"0x2".into()), 0);
    }
}

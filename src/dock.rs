//! The dock: ties the pinned apps, the host and the icon cache together.
//!
//! [`Dock`] keeps the latest [`HostState`] and the reconciled entry list,
//! and reacts to [`Command`]s by refreshing, focusing or launching
//! applications through the [`Host`] trait.

use crate::app::{DockEntry, MatchPolicy, PinnedApp};
use crate::command::{Button, Command, HostState, WindowId};
use crate::config::Config;
use crate::desktop::DesktopIndex;
use crate::icon::{IconCache, IconSurface};
use crate::notify::NotificationCounter;
use crate::reconcile::reconcile;
use crate::traits::{DockRenderer, Host};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;

/// Possible errors from the dock.
#[derive(Debug, thiserror::Error)]
pub enum DockError {
    /// The host returned an error.
    #[error("host error: {0}")]
    Host(String),
    #[error("no dock entry at index {0}")]
    NoSuchEntry(usize),
    #[error("window {0} is not open")]
    UnknownWindow(WindowId),
}

/// How an entry should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// The window demands attention.
    Urgent,
    /// The window is focused on the focused screen.
    Focused,
    /// The window is current in a group shown on another screen.
    #[serde(rename = "other_screen")]
    OtherScreen,
    /// The window is open.
    Open,
    /// No window: a pinned launcher.
    Launcher,
}

/// One entry as a drawing surface or status bar consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub label: String,
    pub icon: Option<PathBuf>,
    pub window: Option<WindowId>,
    pub pinned: bool,
    /// Unread notification count.
    pub badge: u32,
    pub highlight: Highlight,
}

/// The whole dock, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DockSnapshot {
    pub entries: Vec<EntryView>,
}

/// Orchestrates reconciliation, selection and notification badges.
///
/// The dock is generic over any [`Host`] implementation, making it
/// independent of Hyprland or any other concrete window manager.
///
/// # Typical usage
///
/// ```ignore
/// let host = HyprlandHost::new()?;
/// let mut dock = Dock::from_config(host, &config, DesktopIndex::scan(&dirs, Some(24)));
/// dock.handle(Command::Refresh)?;
/// dock.handle(Command::Select { index: 0, button: Button::Primary })?;
/// ```
pub struct Dock<H: Host> {
    host: H,
    pinned: Vec<PinnedApp>,
    policy: MatchPolicy,
    icons: IconCache,
    fallback_icon: String,
    desktop: DesktopIndex,
    notifications: NotificationCounter,
    state: HostState,
    entries: Vec<DockEntry>,
}

impl<H: Host> Dock<H> {
    /// Create a dock with no host state yet.  Call
    /// [`refresh`](Self::refresh) before selecting entries.
    pub fn new(
        host: H,
        pinned: Vec<PinnedApp>,
        policy: MatchPolicy,
        icons: IconCache,
        desktop: DesktopIndex,
        fallback_icon: impl Into<String>,
    ) -> Self {
        let entries = reconcile(&pinned, &[], &policy);
        Self {
            host,
            pinned,
            policy,
            icons,
            fallback_icon: fallback_icon.into(),
            desktop,
            notifications: NotificationCounter::new(),
            state: HostState::default(),
            entries,
        }
    }

    /// Build a dock from the configuration, resolving each pinned key in
    /// `desktop`.  Keys that resolve to nothing are logged and skipped.
    pub fn from_config(host: H, config: &Config, desktop: DesktopIndex) -> Self {
        let pinned = config
            .pinned_apps
            .iter()
            .filter_map(|key| match desktop.find_by_key(key) {
                Some(record) => Some(PinnedApp::from_record(&record)),
                None => {
                    warn!("pinned app {} not found", key);
                    None
                }
            })
            .collect();
        let icons = IconCache::new(
            config.icons.lookup(),
            config.icons.size,
            config.icons.foreground.clone(),
        );
        Self::new(
            host,
            pinned,
            config.matching.clone(),
            icons,
            desktop,
            config.icons.fallback.clone(),
        )
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn pinned(&self) -> &[PinnedApp] {
        &self.pinned
    }

    /// Entries from the last refresh, in display order.
    pub fn entries(&self) -> &[DockEntry] {
        &self.entries
    }

    /// Host state from the last refresh.
    pub fn state(&self) -> &HostState {
        &self.state
    }

    pub fn notifications(&self) -> &NotificationCounter {
        &self.notifications
    }

    /// Re-query the host and recompute the entry list.
    pub fn refresh(&mut self) -> Result<(), DockError> {
        let state = self
            .host
            .state()
            .map_err(|e| DockError::Host(e.to_string()))?;
        self.entries = reconcile(&self.pinned, &state.windows, &self.policy);
        self.notifications.retain_open(&state);
        self.state = state;
        debug!("{} dock entries", self.entries.len());
        Ok(())
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<(), DockError> {
        match cmd {
            Command::Refresh => self.refresh(),
            Command::Select { index, button } => {
                info!("select {} ({})", index, button);
                self.select(index, button)
            }
            Command::Notify(notification) => {
                match self
                    .notifications
                    .notify(&notification, &self.entries, &self.state)
                {
                    Some(window) => info!("notification for {}", window),
                    None => debug!("notification matched no window: {:?}", notification),
                }
                Ok(())
            }
            Command::Dismiss { window } => {
                self.notifications.dismiss(&window);
                Ok(())
            }
        }
    }

    /// Activate the entry at `index` with `button`.
    ///
    /// The entry's badge is cleared first.  Launchers, and any pinned entry
    /// clicked with an alternate button, spawn the app's command.  A window
    /// that is already in front is minimized (or restored); any other
    /// window is brought to its screen and group, focused, unminimized and
    /// raised if floating.
    pub fn select(&mut self, index: usize, button: Button) -> Result<(), DockError> {
        let entry = self
            .entries
            .get(index)
            .cloned()
            .ok_or(DockError::NoSuchEntry(index))?;
        let window = entry.window().cloned();
        if let Some(w) = &window {
            self.notifications.dismiss(w);
        }

        let command = entry
            .pinned_index()
            .and_then(|i| self.pinned.get(i))
            .map(|app| app.cmd.clone())
            .filter(|c| !c.is_empty());

        match (window, command) {
            (Some(w), Some(cmd)) if button.spawns_new_instance() => {
                debug!("{} held by {}, spawning anyway", cmd, w);
                self.spawn(&cmd)
            }
            (None, Some(cmd)) => self.spawn(&cmd),
            (Some(w), _) => self.activate(&w),
            (None, None) => {
                warn!("entry {} has no window and no command", index);
                Ok(())
            }
        }
    }

    fn spawn(&self, cmd: &str) -> Result<(), DockError> {
        info!("spawn {}", cmd);
        self.host
            .spawn(cmd)
            .map_err(|e| DockError::Host(e.to_string()))
    }

    fn activate(&self, id: &WindowId) -> Result<(), DockError> {
        let window = self
            .state
            .window(id)
            .ok_or_else(|| DockError::UnknownWindow(id.clone()))?;
        let host_err = |e: H::Error| DockError::Host(e.to_string());

        if self.state.is_front_window(id) {
            debug!("{} is in front, toggling minimized", id);
            return self
                .host
                .set_minimized(id, !window.minimized)
                .map_err(host_err);
        }

        if let Some(screen) = self.state.screen_of_group(&window.group) {
            self.host.focus_screen(screen).map_err(host_err)?;
        }
        self.host.show_group(&window.group).map_err(host_err)?;
        self.host.focus_window(id).map_err(host_err)?;
        if window.minimized {
            self.host.set_minimized(id, false).map_err(host_err)?;
        }
        if window.floating {
            self.host.bring_to_front(id).map_err(host_err)?;
        }
        Ok(())
    }

    /// Icon name for `entry`, before falling back.
    ///
    /// Unpinned windows are looked up by class in the desktop index.
    fn icon_name(&self, entry: &DockEntry, state: &HostState) -> Option<String> {
        match entry {
            DockEntry::Pinned { pinned, .. } => self
                .pinned
                .get(*pinned)
                .map(PinnedApp::icon_source)
                .filter(|i| !i.is_empty()),
            DockEntry::Unpinned { window } => state.window(window)?.classes.iter().find_map(|class| {
                self.desktop
                    .find_by_class(class)
                    .map(|record| record.icon_source())
                    .filter(|i| !i.is_empty())
            }),
        }
    }

    fn label(&self, entry: &DockEntry) -> String {
        match entry {
            DockEntry::Pinned { pinned, .. } => self
                .pinned
                .get(*pinned)
                .map(|app| app.name.clone())
                .unwrap_or_default(),
            DockEntry::Unpinned { window } => self
                .state
                .window(window)
                .map(|w| w.name.clone())
                .unwrap_or_else(|| window.to_string()),
        }
    }

    fn highlight(&self, entry: &DockEntry) -> Highlight {
        match entry.window().and_then(|id| self.state.window(id)) {
            None => Highlight::Launcher,
            Some(w) if w.urgent => Highlight::Urgent,
            Some(w) if self.state.is_front_window(&w.id) => Highlight::Focused,
            Some(w) if self.state.is_current_on_other_screen(&w.id) => Highlight::OtherScreen,
            Some(_) => Highlight::Open,
        }
    }

    /// Everything a renderer needs for the current entries.
    pub fn snapshot(&mut self) -> DockSnapshot {
        let entries = self.entries.clone();
        let state = self.state.clone();
        let mut views = Vec::with_capacity(entries.len());
        for entry in &entries {
            let icon = self.resolve_icon(entry, &state).map(|s| s.path.clone());
            views.push(EntryView {
                label: self.label(entry),
                icon,
                window: entry.window().cloned(),
                pinned: entry.is_pinned(),
                badge: entry
                    .window()
                    .map(|w| self.notifications.count(w))
                    .unwrap_or(0),
                highlight: self.highlight(entry),
            });
        }
        DockSnapshot { entries: views }
    }
}

impl<H: Host> DockRenderer for Dock<H> {
    fn reconcile(&self, state: &HostState) -> Vec<DockEntry> {
        reconcile(&self.pinned, &state.windows, &self.policy)
    }

    fn resolve_icon(&mut self, entry: &DockEntry, state: &HostState) -> Option<&IconSurface> {
        let name = match self.icon_name(entry, state) {
            Some(name) if self.icons.get(&name).is_some() => name,
            _ => self.fallback_icon.clone(),
        };
        self.icons.get(&name)
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::WindowInfo;
    use crate::desktop::DesktopEntry;
    use crate::icon::IconLookup;
    use crate::notify::Notification;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    /// Record-keeping mock host.
    #[derive(Debug, Default)]
    struct RecorderHost {
        state: RefCell<HostState>,
        calls: RefCell<Vec<String>>,
        fail: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error")]
    struct RecorderErr;

    impl RecorderHost {
        fn record(&self, call: String) -> Result<(), RecorderErr> {
            if self.fail {
                return Err(RecorderErr);
            }
            self.calls.borrow_mut().push(call);
            Ok(())
        }
    }

    impl Host for RecorderHost {
        type Error = RecorderErr;

        fn state(&self) -> Result<HostState, RecorderErr> {
            if self.fail {
                return Err(RecorderErr);
            }
            Ok(self.state.borrow().clone())
        }

        fn focus_screen(&self, screen: usize) -> Result<(), RecorderErr> {
            self.record(format!("focus_screen {}", screen))
        }

        fn show_group(&self, group: &str) -> Result<(), RecorderErr> {
            self.record(format!("show_group {}", group))
        }

        fn focus_window(&self, window: &WindowId) -> Result<(), RecorderErr> {
            self.record(format!("focus_window {}", window))
        }

        fn set_minimized(&self, window: &WindowId, minimized: bool) -> Result<(), RecorderErr> {
            self.record(format!("set_minimized {} {}", window, minimized))
        }

        fn bring_to_front(&self, window: &WindowId) -> Result<(), RecorderErr> {
            self.record(format!("bring_to_front {}", window))
        }

        fn spawn(&self, command: &str) -> Result<(), RecorderErr> {
            self.record(format!("spawn {}", command))
        }
    }

    fn app(name: &str, class: &str) -> PinnedApp {
        PinnedApp {
            key: class.into(),
            name: name.into(),
            icon: class.into(),
            icon_file: None,
            cmd: class.into(),
            wm_class: Some(class.into()),
        }
    }

    fn window(id: &str, class: &str, group: &str) -> WindowInfo {
        WindowInfo {
            id: id.into(),
            name: format!("{} window", class),
            classes: vec![class.into()],
            pid: Some(1000),
            group: group.into(),
            ..Default::default()
        }
    }

    /// Firefox and Kitty pinned; firefox open on group "1" (focused, screen
    /// 0) and kitty on group "2" (screen 1); zathura on hidden group "3".
    /// Each is the current window of its group.
    fn state() -> HostState {
        HostState {
            windows: vec![
                window("0x1", "firefox", "1"),
                window("0x2", "kitty", "2"),
                window("0x3", "zathura", "3"),
            ],
            focused_window: Some("0x1".into()),
            focused_screen: 0,
            screen_groups: vec!["1".into(), "2".into()],
            group_windows: [("1", "0x1"), ("2", "0x2"), ("3", "0x3")]
                .into_iter()
                .map(|(g, w)| (g.to_string(), WindowId::from(w)))
                .collect(),
        }
    }

    fn no_icons() -> IconCache {
        IconCache::new(IconLookup::with_dirs(None, vec![], vec![]), 24, "#ffffff")
    }

    fn make_dock(state: HostState) -> Dock<RecorderHost> {
        let host = RecorderHost {
            state: RefCell::new(state),
            ..Default::default()
        };
        let mut dock = Dock::new(
            host,
            vec![app("Firefox", "firefox"), app("Kitty", "kitty"), app("Gimp", "gimp")],
            MatchPolicy::default(),
            no_icons(),
            DesktopIndex::default(),
            "application-x-executable",
        );
        dock.refresh().unwrap();
        dock
    }

    fn calls(dock: &Dock<RecorderHost>) -> Vec<String> {
        dock.host().calls.borrow().clone()
    }

    #[test]
    fn new_dock_shows_launchers() {
        let dock = Dock::new(
            RecorderHost::default(),
            vec![app("Firefox", "firefox")],
            MatchPolicy::default(),
            no_icons(),
            DesktopIndex::default(),
            "application-x-executable",
        );
        assert_eq!(
            dock.entries(),
            &[DockEntry::Pinned {
                pinned: 0,
                window: None
            }]
        );
    }

    #[test]
    fn refresh_reconciles_host_windows() {
        let dock = make_dock(state());
        assert_eq!(
            dock.entries(),
            &[
                DockEntry::Pinned {
                    pinned: 0,
                    window: Some("0x1".into())
                },
                DockEntry::Pinned {
                    pinned: 1,
                    window: Some("0x2".into())
                },
                DockEntry::Pinned {
                    pinned: 2,
                    window: None
                },
                DockEntry::Unpinned {
                    window: "0x3".into()
                },
            ]
        );
    }

    #[test]
    fn selecting_front_window_minimizes_it() {
        let mut dock = make_dock(state());
        dock.handle(Command::Select {
            index: 0,
            button: Button::Primary,
        })
        .unwrap();
        assert_eq!(calls(&dock), vec!["set_minimized 0x1 true"]);
    }

    #[test]
    fn selecting_minimized_front_window_restores_it() {
        let mut s = state();
        s.windows[0].minimized = true;
        let mut dock = make_dock(s);
        dock.select(0, Button::Primary).unwrap();
        assert_eq!(calls(&dock), vec!["set_minimized 0x1 false"]);
    }

    #[test]
    fn selecting_window_on_other_screen_focuses_it() {
        let mut dock = make_dock(state());
        dock.select(1, Button::Primary).unwrap();
        assert_eq!(
            calls(&dock),
            vec!["focus_screen 1", "show_group 2", "focus_window 0x2"]
        );
    }

    #[test]
    fn selecting_hidden_floating_minimized_window() {
        let mut s = state();
        s.windows[2].minimized = true;
        s.windows[2].floating = true;
        let mut dock = make_dock(s);
        dock.select(3, Button::Primary).unwrap();
        assert_eq!(
            calls(&dock),
            vec![
                "show_group 3",
                "focus_window 0x3",
                "set_minimized 0x3 false",
                "bring_to_front 0x3"
            ]
        );
    }

    #[test]
    fn selecting_launcher_spawns() {
        let mut dock = make_dock(state());
        dock.select(2, Button::Primary).unwrap();
        assert_eq!(calls(&dock), vec!["spawn gimp"]);
    }

    #[test]
    fn alternate_button_always_spawns() {
        let mut dock = make_dock(state());
        dock.select(0, Button::Middle).unwrap();
        dock.select(1, Button::Secondary).unwrap();
        assert_eq!(calls(&dock), vec!["spawn firefox", "spawn kitty"]);
    }

    #[test]
    fn alternate_button_on_unpinned_window_focuses() {
        let mut dock = make_dock(state());
        dock.select(3, Button::Secondary).unwrap();
        assert_eq!(calls(&dock), vec!["show_group 3", "focus_window 0x3"]);
    }

    #[test]
    fn select_out_of_range_is_error() {
        let mut dock = make_dock(state());
        assert!(matches!(
            dock.select(9, Button::Primary),
            Err(DockError::NoSuchEntry(9))
        ));
        assert!(calls(&dock).is_empty());
    }

    #[test]
    fn host_errors_are_propagated() {
        let mut dock = make_dock(state());
        dock.host.fail = true;
        assert!(matches!(dock.refresh(), Err(DockError::Host(_))));
        assert!(matches!(
            dock.select(2, Button::Primary),
            Err(DockError::Host(_))
        ));
    }

    #[test]
    fn notifications_badge_and_clear_on_select() {
        let mut dock = make_dock(state());
        dock.handle(Command::Notify(Notification {
            sender_pid: None,
            desktop_entry: Some("kitty".into()),
        }))
        .unwrap();
        assert_eq!(dock.notifications().count(&"0x2".into()), 1);

        let snap = dock.snapshot();
        assert_eq!(snap.entries[1].badge, 1);

        dock.select(1, Button::Primary).unwrap();
        assert_eq!(dock.notifications().count(&"0x2".into()), 0);
    }

    #[test]
    fn dismiss_clears_badge() {
        let mut dock = make_dock(state());
        let n = Notification {
            sender_pid: None,
            desktop_entry: Some("firefox".into()),
        };
        dock.handle(Command::Notify(n)).unwrap();
        dock.handle(Command::Dismiss {
            window: "0x1".into(),
        })
        .unwrap();
        assert_eq!(dock.notifications().count(&"0x1".into()), 0);
    }

    #[test]
    fn closed_windows_lose_their_badges() {
        let mut dock = make_dock(state());
        dock.handle(Command::Notify(Notification {
            sender_pid: None,
            desktop_entry: Some("zathura".into()),
        }))
        .unwrap();
        assert_eq!(dock.notifications().count(&"0x3".into()), 1);

        dock.host().state.borrow_mut().windows.pop();
        dock.handle(Command::Refresh).unwrap();
        assert_eq!(dock.notifications().count(&"0x3".into()), 0);
        assert_eq!(dock.entries().len(), 3);
    }

    #[test]
    fn snapshot_labels_and_highlights() {
        let mut s = state();
        s.windows[1].urgent = true;
        let mut dock = make_dock(s);
        let snap = dock.snapshot();
        let summary: Vec<(&str, Highlight, bool)> = snap
            .entries
            .iter()
            .map(|e| (e.label.as_str(), e.highlight, e.pinned))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Firefox", Highlight::Focused, true),
                ("Kitty", Highlight::Urgent, true),
                ("Gimp", Highlight::Launcher, true),
                ("zathura window", Highlight::Open, false),
            ]
        );
        assert!(snap.entries.iter().all(|e| e.icon.is_none()));
    }

    #[test]
    fn window_current_on_other_screen() {
        let mut dock = make_dock(state());
        let highlights: Vec<Highlight> = dock.snapshot().entries.iter().map(|e| e.highlight).collect();
        assert_eq!(
            highlights,
            vec![
                Highlight::Focused,
                Highlight::OtherScreen,
                Highlight::Launcher,
                Highlight::Open,
            ]
        );
        let json = serde_json::to_value(dock.snapshot()).unwrap();
        assert_eq!(json["entries"][1]["highlight"], "other_screen");
    }

    #[test]
    fn snapshot_serializes() {
        let mut dock = make_dock(state());
        let json = serde_json::to_value(dock.snapshot()).unwrap();
        assert_eq!(json["entries"][0]["label"], "Firefox");
        assert_eq!(json["entries"][0]["highlight"], "focused");
        assert_eq!(json["entries"][2]["window"], serde_json::Value::Null);
        assert_eq!(json["entries"][3]["window"], "0x3");
    }

    #[test]
    fn renderer_reconcile_matches_dock_entries() {
        let dock = make_dock(state());
        assert_eq!(DockRenderer::reconcile(&dock, &state()), dock.entries());
    }

    //  Icons

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16"><path fill="#bebebe" d="M0 0h16v16H0z"/></svg>"##;

    fn theme_with(names: &[&str]) -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "pindock-dock-test-{}-{}",
            std::process::id(),
            id
        ));
        let _ = fs::remove_dir_all(&dir);
        for name in names {
            let path = dir.join("scalable/apps").join(format!("{}.svg", name));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, SVG).unwrap();
        }
        dir
    }

    fn icon_dock(theme: &Path, desktop: DesktopIndex) -> Dock<RecorderHost> {
        let host = RecorderHost {
            state: RefCell::new(state()),
            ..Default::default()
        };
        let icons = IconCache::new(IconLookup::with_dirs(theme.to_str(), vec![], vec![]), 24, "#ffffff");
        let mut dock = Dock::new(
            host,
            vec![app("Firefox", "firefox"), app("Kitty", "kitty")],
            MatchPolicy::default(),
            icons,
            desktop,
            "application-x-executable",
        );
        dock.refresh().unwrap();
        dock
    }

    #[test]
    fn pinned_icon_and_fallback() {
        let theme = theme_with(&["firefox", "application-x-executable"]);
        let mut dock = icon_dock(&theme, DesktopIndex::default());
        let s = state();

        let firefox = dock.entries()[0].clone();
        let icon = dock.resolve_icon(&firefox, &s).expect("firefox icon");
        assert!(icon.path.ends_with("scalable/apps/firefox.svg"));

        // Kitty has no icon in the theme; zathura is unknown.
        let kitty = dock.entries()[1].clone();
        let icon = dock.resolve_icon(&kitty, &s).expect("fallback");
        assert!(icon.path.ends_with("scalable/apps/application-x-executable.svg"));
        let zathura = dock.entries()[2].clone();
        let icon = dock.resolve_icon(&zathura, &s).expect("fallback");
        assert!(icon.path.ends_with("scalable/apps/application-x-executable.svg"));
    }

    #[test]
    fn unpinned_icon_comes_from_desktop_entry() {
        let theme = theme_with(&["org.pwmt.zathura", "application-x-executable"]);
        let entry = DesktopEntry::parse(
            "/apps/org.pwmt.zathura.desktop",
            "[Desktop Entry]\nName=Zathura\nIcon=org.pwmt.zathura\nExec=zathura %U\n",
        )
        .unwrap();
        let desktop = DesktopIndex::from_parts(vec![entry], vec![], None);
        let mut dock = icon_dock(&theme, desktop);

        let snap = dock.snapshot();
        let zathura = &snap.entries[2];
        assert!(!zathura.pinned);
        assert!(zathura
            .icon
            .as_ref()
            .is_some_and(|p| p.ends_with("scalable/apps/org.pwmt.zathura.svg")));
    }

    #[test]
    fn missing_fallback_gives_no_icon() {
        let theme = theme_with(&[]);
        let mut dock = icon_dock(&theme, DesktopIndex::default());
        let entry = dock.entries()[0].clone();
        assert!(dock.resolve_icon(&entry, &state()).is_none());
    }
}

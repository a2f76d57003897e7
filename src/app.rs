//! Dock entries and window matching.
//!
//! A [`PinnedApp`] is a launcher slot the user configured; a [`DockEntry`]
//! is one slot in the rendered dock, either a (possibly window-bound) copy
//! of a pinned app or an unpinned window.  [`MatchPolicy`] decides which
//! pinned app a window belongs to.

use crate::command::{WindowId, WindowInfo};
use crate::desktop::AppRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A user-pinned application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedApp {
    /// Application key: desktop-file base name or Flatpak app id.
    pub key: String,
    /// Display name (`Name=`).
    pub name: String,
    /// Icon reference as written in `Icon=`; matched against window
    /// classes.
    pub icon: String,
    /// Resolved icon file when the app ships its own (Flatpak).  Only used
    /// for drawing.
    pub icon_file: Option<PathBuf>,
    /// Launch command.
    pub cmd: String,
    /// Window-class hint (`StartupWMClass=`).
    pub wm_class: Option<String>,
}

impl PinnedApp {
    /// Build a pinned app from a resolved desktop entry.
    pub fn from_record(record: &AppRecord) -> Self {
        Self {
            key: record.key.clone(),
            name: record.entry.name.clone(),
            icon: record.icon.clone(),
            icon_file: record.icon_file.clone(),
            cmd: record.launch.clone(),
            wm_class: record.entry.startup_wm_class.clone(),
        }
    }

    /// What to hand the icon lookup when drawing.
    pub fn icon_source(&self) -> String {
        match &self.icon_file {
            Some(path) => path.to_string_lossy().into_owned(),
            None => self.icon.clone(),
        }
    }
}

/// One slot in the dock, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockEntry {
    /// A copy of the pinned app at index `pinned`, optionally bound to an
    /// open window.
    Pinned {
        pinned: usize,
        window: Option<WindowId>,
    },
    /// An open window that matched no pinned app.
    Unpinned { window: WindowId },
}

impl DockEntry {
    /// The bound window, if any.
    pub fn window(&self) -> Option<&WindowId> {
        match self {
            DockEntry::Pinned { window, .. } => window.as_ref(),
            DockEntry::Unpinned { window } => Some(window),
        }
    }

    /// Index into the pinned list, for pinned entries.
    pub fn pinned_index(&self) -> Option<usize> {
        match self {
            DockEntry::Pinned { pinned, .. } => Some(*pinned),
            DockEntry::Unpinned { .. } => None,
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, DockEntry::Pinned { .. })
    }
}

/// A single window-to-app matching heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// The app's display name equals the window title.
    ExactName,
    /// The app's window-class hint is one of the window's classes.
    ClassHint,
    /// The app's display name or icon reference starts with one of the
    /// window's classes (case-insensitive).
    ClassPrefix,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRule::ExactName => write!(f, "exact-name"),
            MatchRule::ClassHint => write!(f, "class-hint"),
            MatchRule::ClassPrefix => write!(f, "class-prefix"),
        }
    }
}

impl MatchRule {
    /// Whether this rule alone matches `window` to `app`.
    pub fn matches(self, app: &PinnedApp, window: &WindowInfo) -> bool {
        match self {
            MatchRule::ExactName => app.name == window.name,
            MatchRule::ClassHint => app
                .wm_class
                .as_deref()
                .is_some_and(|hint| !hint.is_empty() && window.classes.iter().any(|c| c == hint)),
            MatchRule::ClassPrefix => {
                let name = app.name.to_lowercase();
                let icon = app.icon.to_lowercase();
                window
                    .classes
                    .iter()
                    .filter(|c| !c.is_empty())
                    .map(|c| c.to_lowercase())
                    .any(|c| name.starts_with(&c) || icon.starts_with(&c))
            }
        }
    }
}

/// How rule priority interacts with entry order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Walk the entries in order; the first entry matched by *any* enabled
    /// rule wins.  Ambiguous windows go to the earliest pinned app.
    #[default]
    EntryFirst,
    /// Try each rule across all entries before falling back to the next
    /// rule.  A weaker rule never beats a stronger one on a later entry.
    RuleFirst,
}

/// Configurable matching policy.
///
/// # Example
///
/// ```json
/// { "rules": ["class_hint", "exact_name"], "strategy": "rule_first" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    /// Enabled rules, strongest first.
    pub rules: Vec<MatchRule>,
    pub strategy: MatchStrategy,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                MatchRule::ExactName,
                MatchRule::ClassHint,
                MatchRule::ClassPrefix,
            ],
            strategy: MatchStrategy::EntryFirst,
        }
    }
}

impl MatchPolicy {
    /// The first enabled rule matching `window` to `app`.
    pub fn matching_rule(&self, app: &PinnedApp, window: &WindowInfo) -> Option<MatchRule> {
        self.rules.iter().copied().find(|r| r.matches(app, window))
    }

    /// Whether any enabled rule matches.
    pub fn matches(&self, app: &PinnedApp, window: &WindowInfo) -> bool {
        self.matching_rule(app, window).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn firefox() -> PinnedApp {
        PinnedApp {
            key: "firefox".into(),
            name: "Firefox".into(),
            icon: "firefox".into(),
            icon_file: None,
            cmd: "firefox".into(),
            wm_class: Some("firefox".into()),
        }
    }

    fn window(name: &str, classes: &[&str]) -> WindowInfo {
        WindowInfo {
            id: "0x1".into(),
            name: name.into(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn exact_name_rule() {
        let app = firefox();
        assert!(MatchRule::ExactName.matches(&app, &window("Firefox", &[])));
        assert!(!MatchRule::ExactName.matches(&app, &window("firefox", &[])));
    }

    #[test]
    fn class_hint_rule() {
        let app = firefox();
        assert!(MatchRule::ClassHint.matches(&app, &window("x", &["Navigator", "firefox"])));
        assert!(!MatchRule::ClassHint.matches(&app, &window("x", &["Firefox"])));

        let no_hint = PinnedApp {
            wm_class: None,
            ..firefox()
        };
        assert!(!MatchRule::ClassHint.matches(&no_hint, &window("x", &["firefox"])));
    }

    #[test]
    fn class_prefix_rule_checks_name_and_icon() {
        let app = PinnedApp {
            name: "Terminal".into(),
            icon: "org.gnome.Console".into(),
            wm_class: None,
            ..firefox()
        };
        assert!(MatchRule::ClassPrefix.matches(&app, &window("x", &["term"])));
        assert!(MatchRule::ClassPrefix.matches(&app, &window("x", &["ORG.GNOME"])));
        assert!(!MatchRule::ClassPrefix.matches(&app, &window("x", &["kitty"])));
    }

    #[test]
    fn empty_class_never_prefix_matches() {
        assert!(!MatchRule::ClassPrefix.matches(&firefox(), &window("x", &[""])));
    }

    #[test]
    fn policy_reports_strongest_rule() {
        let policy = MatchPolicy::default();
        let w = window("Firefox", &["firefox"]);
        assert_eq!(policy.matching_rule(&firefox(), &w), Some(MatchRule::ExactName));

        let w = window("Some page", &["firefox"]);
        assert_eq!(policy.matching_rule(&firefox(), &w), Some(MatchRule::ClassHint));
    }

    #[test]
    fn disabled_rules_do_not_match() {
        let policy = MatchPolicy {
            rules: vec![MatchRule::ExactName],
            ..Default::default()
        };
        assert!(!policy.matches(&firefox(), &window("Some page", &["firefox"])));
    }

    #[test]
    fn policy_from_json() {
        let policy: MatchPolicy =
            serde_json::from_str(r#"{"rules":["class_hint"],"strategy":"rule_first"}"#).unwrap();
        assert_eq!(policy.rules, vec![MatchRule::ClassHint]);
        assert_eq!(policy.strategy, MatchStrategy::RuleFirst);

        let policy: MatchPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, MatchPolicy::default());
    }

    #[test]
    fn entry_accessors() {
        let bound = DockEntry::Pinned {
            pinned: 3,
            window: Some("0xa".into()),
        };
        assert_eq!(bound.window(), Some(&"0xa".into()));
        assert_eq!(bound.pinned_index(), Some(3));
        assert!(bound.is_pinned());

        let unpinned = DockEntry::Unpinned {
            window: "0xb".into(),
        };
        assert_eq!(unpinned.window(), Some(&"0xb".into()));
        assert_eq!(unpinned.pinned_index(), None);
        assert!(!unpinned.is_pinned());
    }
}

//! Desktop entry files and application lookup.
//!
//! Pinned apps are configured by key: the base name of a `.desktop` file
//! (`"firefox"` for `firefox.desktop`) or a Flatpak application id
//! (`"org.mozilla.Thunderbird"`).  [`DesktopIndex`] scans the application
//! directories once at startup and resolves keys and window classes to
//! [`AppRecord`]s.
//!
//! Only the `[Desktop Entry]` group is read; `Name`, `Icon`, `Exec`,
//! `StartupWMClass`, `NoDisplay` and `Type` are kept, everything else is
//! ignored.

use crate::icon::theme::theme_icons;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

const MAIN_GROUP: &str = "Desktop Entry";

/// Errors produced while loading a desktop entry.
#[derive(Debug, thiserror::Error)]
pub enum DesktopEntryError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}: no [Desktop Entry] group")]
    MissingGroup(PathBuf),
    #[error("{0}: no Name key")]
    MissingName(PathBuf),
}

/// The `[Desktop Entry]` group of a `.desktop` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub path: PathBuf,
    pub name: String,
    pub icon: Option<String>,
    pub exec: Option<String>,
    pub startup_wm_class: Option<String>,
    pub no_display: bool,
    pub entry_type: Option<String>,
}

impl DesktopEntry {
    /// Parse the contents of a desktop file located at `path`.
    ///
    /// Lines that are neither comments, group headers nor `key=value`
    /// pairs are logged and skipped.
    pub fn parse(path: impl AsRef<Path>, contents: &str) -> Result<Self, DesktopEntryError> {
        let path = path.as_ref().to_path_buf();
        let mut entry = DesktopEntry {
            path: path.clone(),
            ..Default::default()
        };
        let mut name = None;
        let mut seen_group = false;
        let mut in_main = false;

        for (lineno, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(group) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_main = group == MAIN_GROUP;
                seen_group |= in_main;
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                warn!("{}:{}: malformed line ignored", path.display(), lineno + 1);
                continue;
            };
            if !in_main {
                continue;
            }
            let value = value.trim().to_string();
            match key.trim() {
                "Name" => name = Some(value),
                "Icon" => entry.icon = Some(value),
                "Exec" => entry.exec = Some(value),
                "StartupWMClass" => entry.startup_wm_class = Some(value),
                "NoDisplay" => entry.no_display = value == "true",
                "Type" => entry.entry_type = Some(value),
                _ => {}
            }
        }

        if !seen_group {
            return Err(DesktopEntryError::MissingGroup(path));
        }
        entry.name = name.ok_or(DesktopEntryError::MissingName(path))?;
        Ok(entry)
    }

    /// Read and parse the desktop file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DesktopEntryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DesktopEntryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    /// The `Exec` line with field codes removed, if there is one.
    pub fn command(&self) -> Option<String> {
        self.exec
            .as_deref()
            .map(strip_field_codes)
            .filter(|c| !c.is_empty())
    }

    /// File name without the `.desktop` suffix.
    pub fn key(&self) -> Option<&str> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.strip_suffix(".desktop").unwrap_or(n))
    }

    /// Whether `class` names this application.
    ///
    /// Compares case-insensitively against `Name` and `StartupWMClass`.
    pub fn matches_class(&self, class: &str) -> bool {
        !class.is_empty()
            && (self.name.eq_ignore_ascii_case(class)
                || self
                    .startup_wm_class
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(class)))
    }
}

/// Remove `%f`, `%U` and friends from an `Exec` value and collapse the
/// remaining whitespace.  `%%` becomes a literal `%`.
pub fn strip_field_codes(exec: &str) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                out.push('%');
                chars.next();
            }
            Some(n) if n.is_ascii_alphabetic() => {
                chars.next();
            }
            _ => out.push('%'),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Directories searched for applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopDirs {
    /// Directories holding `.desktop` files, in priority order.
    pub applications: Vec<PathBuf>,
    /// Flatpak installation directory (`/var/lib/flatpak/app`).
    pub flatpak_apps: Option<PathBuf>,
}

impl DesktopDirs {
    /// The standard system and user locations.
    pub fn from_env() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        let data_home = std::env::var("XDG_DATA_HOME")
            .unwrap_or_else(|_| format!("{}/.local/share", home));
        Self {
            applications: vec![
                PathBuf::from(data_home).join("applications"),
                PathBuf::from("/usr/local/share/applications"),
                PathBuf::from("/usr/share/applications"),
                PathBuf::from("/var/lib/flatpak/exports/share/applications"),
            ],
            flatpak_apps: Some(PathBuf::from("/var/lib/flatpak/app")),
        }
    }
}

/// An installed Flatpak application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatpakApp {
    pub app_id: String,
    pub entry: DesktopEntry,
    /// The app's private `hicolor` icon theme.
    pub icon_dir: PathBuf,
}

impl FlatpakApp {
    /// First icon in the app's own theme whose file name starts with the
    /// entry's `Icon=` value.
    pub fn icon_path(&self, size: Option<u32>) -> Option<PathBuf> {
        let prefix = self.entry.icon.as_deref().filter(|i| !i.is_empty())?;
        theme_icons(&self.icon_dir, size).into_iter().find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
    }
}

/// An application resolved for the dock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRecord {
    /// Key used to look the app up.
    pub key: String,
    pub entry: DesktopEntry,
    /// Launch command.
    pub launch: String,
    /// The `Icon=` value: a theme icon name or an absolute path.
    pub icon: String,
    /// Icon file found outside the icon themes (a Flatpak's private theme).
    pub icon_file: Option<PathBuf>,
}

impl AppRecord {
    /// What to hand the icon lookup: the private file when there is one,
    /// else the `Icon=` value.
    pub fn icon_source(&self) -> String {
        match &self.icon_file {
            Some(path) => path.to_string_lossy().into_owned(),
            None => self.icon.clone(),
        }
    }
}

/// Scanned desktop entries and Flatpak applications.
#[derive(Debug, Clone, Default)]
pub struct DesktopIndex {
    entries: Vec<DesktopEntry>,
    flatpaks: Vec<FlatpakApp>,
    icon_size: Option<u32>,
}

impl DesktopIndex {
    /// Scan `dirs`.  Unreadable directories and invalid files are skipped.
    ///
    /// `icon_size` picks among a Flatpak's icon sizes.
    pub fn scan(dirs: &DesktopDirs, icon_size: Option<u32>) -> Self {
        let mut entries = Vec::new();
        for dir in &dirs.applications {
            entries.extend(load_dir(dir));
        }
        let flatpaks = dirs
            .flatpak_apps
            .as_deref()
            .map(scan_flatpaks)
            .unwrap_or_default();
        debug!(
            "indexed {} desktop entries and {} flatpaks",
            entries.len(),
            flatpaks.len()
        );
        Self::from_parts(entries, flatpaks, icon_size)
    }

    pub fn from_parts(entries: Vec<DesktopEntry>, flatpaks: Vec<FlatpakApp>, icon_size: Option<u32>) -> Self {
        Self {
            entries,
            flatpaks,
            icon_size,
        }
    }

    /// Number of desktop entries and Flatpak apps.
    pub fn len(&self) -> usize {
        self.entries.len() + self.flatpaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a pinned-app key.
    ///
    /// Flatpak app ids are checked first, exactly as given; they launch
    /// with `flatpak run` and take their icon from the app's own theme.
    /// Ids may themselves end in `.desktop` (`org.telegram.desktop`).
    /// Otherwise the first desktop file named `<key>.desktop` is used, and
    /// a trailing `.desktop` on the key is ignored for that lookup.
    pub fn find_by_key(&self, key: &str) -> Option<AppRecord> {
        if key.is_empty() {
            return None;
        }
        if let Some(app) = self.flatpaks.iter().find(|f| f.app_id == key) {
            return Some(self.flatpak_record(app));
        }
        let stripped = key.strip_suffix(".desktop").filter(|k| !k.is_empty());
        let entry = self
            .entries
            .iter()
            .find(|e| e.key() == Some(key))
            .or_else(|| {
                let stripped = stripped?;
                self.entries.iter().find(|e| e.key() == Some(stripped))
            })?;
        let key = entry.key().unwrap_or(key);
        let Some(launch) = entry.command() else {
            warn!("{} has no Exec line", entry.path.display());
            return None;
        };
        Some(AppRecord {
            key: key.to_string(),
            entry: entry.clone(),
            launch,
            icon: entry.icon.clone().unwrap_or_default(),
            icon_file: None,
        })
    }

    /// Resolve a window class to an application, Flatpaks first.
    pub fn find_by_class(&self, class: &str) -> Option<AppRecord> {
        if let Some(app) = self.flatpaks.iter().find(|f| f.entry.matches_class(class)) {
            return Some(self.flatpak_record(app));
        }
        let entry = self.entries.iter().find(|e| e.matches_class(class))?;
        Some(AppRecord {
            key: entry.key().unwrap_or(class).to_string(),
            entry: entry.clone(),
            launch: entry.command().unwrap_or_default(),
            icon: entry.icon.clone().unwrap_or_default(),
            icon_file: None,
        })
    }

    fn flatpak_record(&self, app: &FlatpakApp) -> AppRecord {
        AppRecord {
            key: app.app_id.clone(),
            entry: app.entry.clone(),
            launch: format!("flatpak run {}", app.app_id),
            icon: app.entry.icon.clone().unwrap_or_default(),
            icon_file: app.icon_path(self.icon_size),
        }
    }
}

/// Every parseable `.desktop` file directly inside `dir`, sorted by name.
fn load_dir(dir: &Path) -> Vec<DesktopEntry> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = read
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "desktop"))
        .collect();
    paths.sort();
    paths
        .into_iter()
        .filter_map(|p| match DesktopEntry::load(&p) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("skipping desktop file: {}", e);
                None
            }
        })
        .collect()
}

/// Flatpak apps under `root` (`<root>/<app-id>/current/active/files/...`).
///
/// Only desktop files whose name starts with the app id are considered.
fn scan_flatpaks(root: &Path) -> Vec<FlatpakApp> {
    let Ok(read) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut ids: Vec<String> = read
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    ids.sort();

    let mut apps = Vec::new();
    for app_id in ids {
        let share = root.join(&app_id).join("current/active/files/share");
        let icon_dir = share.join("icons/hicolor");
        for entry in load_dir(&share.join("applications")) {
            if entry.key().is_some_and(|k| k.starts_with(&app_id)) {
                apps.push(FlatpakApp {
                    app_id: app_id.clone(),
                    entry,
                    icon_dir: icon_dir.clone(),
                });
            }
        }
    }
    apps
}

//  Tests

//! Icon theme directory search.
//!
//! Themes are laid out as `<theme>/<size>/<category>/<icon>.<ext>`, where
//! `<size>` is `scalable` or `NxN` (optionally `NxN@2`).  Size directories
//! are searched `scalable` first, then the closest fixed size that is not
//! smaller than the request, then smaller sizes from large to small.
//!
//! [`IconLookup`] resolves a theme name to directories across the XDG
//! icon base directories, follows `Inherits=` from `index.theme`, always
//! ends with `hicolor`, and finally checks the pixmap directories.

use log::{debug, trace};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions tried, in order, when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "svg", "xpm"];

/// Size class encoded in a theme subdirectory name.
///
/// `scalable` counts as 1024, `48x48` (or `48x48@2`) as 48, anything else
/// as 0.
pub fn subdir_size(name: &str) -> u32 {
    if name == "scalable" {
        return 1024;
    }
    match name.split_once('x') {
        Some((w, _)) if !w.is_empty() && w.bytes().all(|b| b.is_ascii_digit()) => {
            w.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Sort key for a size directory given the wanted pixel size.
fn size_rank(name: &str, wanted: Option<u32>) -> (u8, u32) {
    if name == "scalable" {
        return (0, 0);
    }
    let size = subdir_size(name);
    if size == 0 {
        return (3, 0);
    }
    match wanted {
        Some(w) if size >= w => (1, size - w),
        Some(w) => (2, w - size),
        None => (1, u32::MAX - size),
    }
}

/// Sorted directory entries of `dir` that are themselves directories.
fn subdirs(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out: Vec<(String, PathBuf)> = read
        .filter_map(Result::ok)
        .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
        .filter(|(_, p)| p.is_dir())
        .collect();
    out.sort();
    out
}

/// Size directories of `theme_dir`, in search order.
pub fn ordered_size_dirs(theme_dir: &Path, wanted: Option<u32>) -> Vec<PathBuf> {
    let mut dirs = subdirs(theme_dir);
    dirs.sort_by(|(a, _), (b, _)| size_rank(a, wanted).cmp(&size_rank(b, wanted)).then(a.cmp(b)));
    dirs.into_iter().map(|(_, p)| p).collect()
}

/// Every icon file in `theme_dir`, size directories in search order.
pub fn theme_icons(theme_dir: &Path, wanted: Option<u32>) -> Vec<PathBuf> {
    let mut results = Vec::new();
    for size_dir in ordered_size_dirs(theme_dir, wanted) {
        for (_, category) in subdirs(&size_dir) {
            let Ok(read) = fs::read_dir(&category) else {
                continue;
            };
            let mut files: Vec<PathBuf> = read
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .collect();
            files.sort();
            results.extend(files);
        }
    }
    results
}

/// Find `name` (without extension) in a single theme directory.
pub fn find_in_theme_dir(
    theme_dir: &Path,
    name: &str,
    wanted: Option<u32>,
    extensions: &[String],
) -> Option<PathBuf> {
    for size_dir in ordered_size_dirs(theme_dir, wanted) {
        for (_, category) in subdirs(&size_dir) {
            for ext in extensions {
                let candidate = category.join(format!("{}.{}", name, ext));
                if candidate.is_file() {
                    trace!("found {} at {}", name, candidate.display());
                    return Some(candidate);
                }
            }
        }
    }
    None
}

/// Strip a trailing known extension from an icon name.
fn strip_extension<'a>(name: &'a str, extensions: &[String]) -> &'a str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if extensions.iter().any(|e| e == ext) => stem,
        _ => name,
    }
}

/// Resolves icon names against an icon theme and its fallbacks.
#[derive(Debug, Clone)]
pub struct IconLookup {
    theme: Option<String>,
    base_dirs: Vec<PathBuf>,
    pixmap_dirs: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl IconLookup {
    /// Lookup for `theme` (a theme name or a theme directory path) using the
    /// XDG icon base directories of the current environment.
    pub fn new(theme: Option<&str>) -> Self {
        Self::with_dirs(theme, default_base_dirs(), vec![PathBuf::from("/usr/share/pixmaps")])
    }

    /// Lookup with explicit base and pixmap directories.
    pub fn with_dirs(theme: Option<&str>, base_dirs: Vec<PathBuf>, pixmap_dirs: Vec<PathBuf>) -> Self {
        Self {
            theme: theme.map(String::from),
            base_dirs,
            pixmap_dirs,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Restrict (and order) the extensions that are tried.
    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Resolve `name` at `size` to a file.
    ///
    /// Absolute paths are returned unchanged.  Returns `None` when nothing
    /// matches; a missing icon is never an error.
    pub fn lookup(&self, name: &str, size: Option<u32>) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        if Path::new(name).is_absolute() {
            return Some(PathBuf::from(name));
        }
        let name = strip_extension(name, &self.extensions);

        for dir in self.theme_chain() {
            if let Some(found) = find_in_theme_dir(&dir, name, size, &self.extensions) {
                return Some(found);
            }
        }

        for dir in &self.pixmap_dirs {
            for ext in &self.extensions {
                let candidate = dir.join(format!("{}.{}", name, ext));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        debug!("icon {} not found", name);
        None
    }

    /// Theme directories to search, in order.
    pub fn theme_chain(&self) -> Vec<PathBuf> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();

        if let Some(theme) = self.theme.as_deref() {
            let as_path = Path::new(theme);
            if as_path.is_absolute() && as_path.is_dir() {
                chain.push(as_path.to_path_buf());
                for parent in read_inherits(as_path) {
                    self.push_theme(&parent, &mut chain, &mut seen);
                }
            } else {
                self.push_theme(theme, &mut chain, &mut seen);
            }
        }
        self.push_theme("hicolor", &mut chain, &mut seen);
        chain
    }

    fn push_theme(&self, name: &str, chain: &mut Vec<PathBuf>, seen: &mut HashSet<String>) {
        if !seen.insert(name.to_string()) {
            return;
        }
        let dirs: Vec<PathBuf> = self
            .base_dirs
            .iter()
            .map(|b| b.join(name))
            .filter(|d| d.is_dir())
            .collect();
        let parents = dirs.iter().find_map(|d| {
            let inherits = read_inherits(d);
            (!inherits.is_empty()).then_some(inherits)
        });
        chain.extend(dirs);
        for parent in parents.unwrap_or_default() {
            self.push_theme(&parent, chain, seen);
        }
    }
}

/// Parent themes listed in `<theme_dir>/index.theme`.
fn read_inherits(theme_dir: &Path) -> Vec<String> {
    let Ok(contents) = fs::read_to_string(theme_dir.join("index.theme")) else {
        return Vec::new();
    };
    contents
        .lines()
        .filter_map(|l| l.trim().strip_prefix("Inherits="))
        .flat_map(|v| v.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `$XDG_DATA_HOME/icons`, `~/.icons`, then `$XDG_DATA_DIRS/icons`.
fn default_base_dirs() -> Vec<PathBuf> {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    let data_home = std::env::var("XDG_DATA_HOME")
        .unwrap_or_else(|_| format!("{}/.local/share", home));
    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .unwrap_or_else(|_| "/usr/local/share:/usr/share".into());

    let mut dirs = vec![
        PathBuf::from(&data_home).join("icons"),
        PathBuf::from(&home).join(".icons"),
    ];
    dirs.extend(
        data_dirs
            .split(':')
            .filter(|d| !d.is_empty())
            .map(|d| PathBuf::from(d).join("icons")),
    );
    dirs
}

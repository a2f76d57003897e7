//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/pindock/config.json`, or the path passed on the
//! command line (`--config <path>`).
//!
//! # Example
//!
//! ```json
//! {
//!   "pinned_apps": ["firefox", "org.mozilla.Thunderbird", "kitty"],
//!   "icons": { "theme": "Papirus-Dark", "size": 32, "foreground": "#d8dee9" },
//!   "matching": { "rules": ["class_hint", "exact_name"], "strategy": "rule_first" },
//!   "status": { "sink": "@DEFAULT_AUDIO_SINK@" }
//! }
//! ```

use crate::app::MatchPolicy;
use crate::icon::theme::DEFAULT_EXTENSIONS;
use crate::icon::IconLookup;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pinned application keys, in dock order: desktop-file base names or
    /// Flatpak application ids.
    #[serde(default)]
    pub pinned_apps: Vec<String>,

    /// Icon theme and rendering settings.
    #[serde(default)]
    pub icons: IconConfig,

    /// Window-to-app matching rules.
    #[serde(default)]
    pub matching: MatchPolicy,

    /// Command socket path.  Defaults to `$XDG_RUNTIME_DIR/pindock.sock`.
    #[serde(default)]
    pub socket: Option<PathBuf>,

    /// Status adapter settings.
    #[serde(default)]
    pub status: StatusConfig,
}

/// Icon theme and rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Theme name (`"Adwaita"`) or theme directory path.  `None` searches
    /// only `hicolor` and the pixmap directories.
    pub theme: Option<String>,
    /// Icon height in pixels.
    pub size: u32,
    /// Color that replaces neutral fills in symbolic icons.
    pub foreground: String,
    /// Icon used for windows whose application cannot be identified.
    pub fallback: String,
    /// File extensions tried, in order.
    pub extensions: Vec<String>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            theme: None,
            size: 24,
            foreground: "#ffffff".into(),
            fallback: "application-x-executable".into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl IconConfig {
    /// Theme lookup over the standard XDG icon directories.
    pub fn lookup(&self) -> IconLookup {
        IconLookup::new(self.theme.as_deref()).with_extensions(self.extensions.iter().cloned())
    }
}

/// Status adapter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// `wpctl` sink whose volume is reported and muted.
    pub sink: String,
    /// `wpctl` source used for the microphone.
    pub source: String,
    /// Volume change in percent for one up or down step.
    pub step: u32,
    /// Marker in `wpctl get-volume` output that means muted.
    pub mute_string: String,
    /// Power-supply name (`"BAT0"`).  `None` uses the first battery found.
    pub battery: Option<String>,
    /// Sysfs power-supply directory.
    pub power_supply_dir: PathBuf,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            sink: "@DEFAULT_AUDIO_SINK@".into(),
            source: "@DEFAULT_AUDIO_SOURCE@".into(),
            step: 2,
            mute_string: "[MUTED]".into(),
            battery: None,
            power_supply_dir: PathBuf::from("/sys/class/power_supply"),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

//! Translates Hyprland window events into dock refreshes.
//!
//! Hyprland broadcasts events in the `EVENT>>DATA\n` format on its event
//! socket (`socket2`) at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`.
//!
//! [`HyprlandEventSource`] connects to this socket and emits
//! [`Command::Refresh`] whenever an event changes what the dock shows:
//! windows opening, closing, moving or changing title, focus changes and
//! workspace switches.  Bursts of events produce one refresh per event;
//! refreshing is cheap.

use super::instance_socket;
use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Events that invalidate the dock.
const REFRESH_EVENTS: &[&str] = &[
    "openwindow",
    "closewindow",
    "movewindow",
    "movewindowv2",
    "windowtitle",
    "windowtitlev2",
    "activewindow",
    "activewindowv2",
    "workspace",
    "workspacev2",
    "focusedmon",
    "focusedmonv2",
    "changefloatingmode",
    "urgent",
    "monitoradded",
    "monitorremoved",
];

/// A [`CommandSource`] that follows Hyprland's event socket.
pub struct HyprlandEventSource {
    path: PathBuf,
}

/// Error from the Hyprland event source.
#[derive(Debug, thiserror::Error)]
#[error("hyprland event error: {0}")]
pub struct HyprlandEventError(String);

impl HyprlandEventSource {
    /// Source for the running Hyprland instance.
    pub fn new() -> Result<Self, HyprlandEventError> {
        let path = instance_socket(".socket2.sock").map_err(HyprlandEventError)?;
        Ok(Self { path })
    }

    /// Source reading an event socket at an explicit path.
    pub fn with_socket(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Parse a single event line from socket2.
///
/// Lines have the form `EVENT>>DATA\n`.
fn parse_event_line(line: &str) -> Option<(&str, &str)> {
    let sep = line.find(">>")?;
    Some((&line[..sep], &line[sep + 2..]))
}

/// Whether `event` changes the dock.
fn is_refresh_event(event: &str) -> bool {
    REFRESH_EVENTS.contains(&event)
}

impl CommandSource for HyprlandEventSource {
    type Error = HyprlandEventError;

    /// Connect to Hyprland's event socket and forward refreshes.
    ///
    /// This method **blocks** until the socket is closed or the sink is
    /// dropped.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        info!("connecting to socket2: {}", self.path.display());
        let stream = UnixStream::connect(&self.path).map_err(|e| {
            HyprlandEventError(format!("connect to {}: {}", self.path.display(), e))
        })?;
        let reader = BufReader::new(stream);

        for line in reader.lines() {
            match line {
                Ok(line) if line.is_empty() => continue,
                Ok(line) => {
                    let Some((event, data)) = parse_event_line(&line) else {
                        continue;
                    };
                    if !is_refresh_event(event) {
                        continue;
                    }
                    debug!("{} {}", event, data);
                    if sink.send(Command::Refresh).is_err() {
                        info!("sink closed, shutting down");
                        return Ok(());
                    }
                }
                Err(e) => {
                    error!("socket2 read error: {}", e);
                    return Err(HyprlandEventError(format!("read error: {}", e)));
                }
            }
        }

        warn!("socket2 stream ended");
        Ok(())
    }
}

//  Tests

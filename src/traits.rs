//! Core traits that decouple pindock from any specific window manager,
//! transport or status backend.
//!
//! Every concrete backend (Hyprland, a Unix-socket listener, a shell
//! command, a test harness, …) implements one of these traits.  The
//! [`Dock`](crate::dock::Dock) only depends on these abstractions.

use crate::app::DockEntry;
use crate::command::{Command, HostState, WindowId};
use crate::icon::IconSurface;
use std::sync::mpsc;

/// Abstraction over the window manager hosting the dock.
///
/// The dock reads one [`HostState`] snapshot per refresh and issues the
/// remaining calls in response to selections.  An implementation might
/// talk to Hyprland via IPC, or it might be a recorder used in tests.
pub trait Host {
    /// The error type produced by this host.
    type Error: std::error::Error + Send + 'static;

    /// Snapshot of the current windows, focus and screen layout.
    fn state(&self) -> Result<HostState, Self::Error>;

    /// Move input focus to the screen at `screen`.
    fn focus_screen(&self, screen: usize) -> Result<(), Self::Error>;

    /// Display `group` on the focused screen.
    fn show_group(&self, group: &str) -> Result<(), Self::Error>;

    /// Give keyboard focus to `window`.
    fn focus_window(&self, window: &WindowId) -> Result<(), Self::Error>;

    /// Minimize or restore `window`.
    fn set_minimized(&self, window: &WindowId, minimized: bool) -> Result<(), Self::Error>;

    /// Raise a floating `window` above its siblings.
    fn bring_to_front(&self, window: &WindowId) -> Result<(), Self::Error>;

    /// Launch `command` detached from the dock.
    fn spawn(&self, command: &str) -> Result<(), Self::Error>;
}

//  Dock Renderer

/// What a drawing surface needs from the dock: the current entry list and
/// an icon for each entry.
///
/// Layout and painting live behind this seam so the matching and icon
/// logic can be exercised without a display.
pub trait DockRenderer {
    /// Entries to draw for `state`, in display order.
    fn reconcile(&self, state: &HostState) -> Vec<DockEntry>;

    /// Icon for `entry`, or `None` if neither the entry's own icon nor the
    /// fallback resolves.
    fn resolve_icon(&mut self, entry: &DockEntry, state: &HostState) -> Option<&IconSurface>;
}

//  Status

/// A system status reading such as Wi-Fi signal or volume.
///
/// `signal` follows a shared convention: `-3` hardware blocked, `-2` soft
/// blocked, `-1` offline or unknown, and any value `>= 0` is a level.
/// Implementations degrade to `-1` instead of failing.
pub trait StatusSource {
    /// Current reading.
    fn signal(&self) -> i32;

    /// Icon name representing `signal`.
    fn icon_name(&self, signal: i32) -> String;

    /// Icon name for the current reading.
    fn current_icon(&self) -> String {
        self.icon_name(self.signal())
    }
}

/// A status with an on/off control (radio kill switch, mute).
pub trait Toggle {
    type Error: std::error::Error + Send + 'static;

    fn toggle(&self) -> Result<(), Self::Error>;
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, Hyprland's
/// event stream, an in-memory channel) and forward parsed commands into
/// the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    ///
    /// This method blocks the calling thread.  To run multiple sources
    /// concurrently, spawn each one on its own thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

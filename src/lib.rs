//! **pindock**: a taskbar engine for Hyprland.
//!
//! A list of pinned applications is merged with the compositor's open
//! windows into one ordered list of dock entries.  Windows of a pinned app
//! take over its slot, further windows of the same app are placed next to
//! it and unpinned windows are appended at the end.
//!
//! # Architecture
//!
//! The crate is organised around a few traits:
//!
//! * [`traits::Host`] abstracts the compositor: reading the window list and
//!   focusing, minimizing or launching, so the dock logic is not coupled to
//!   a specific window manager.
//! * [`traits::CommandSource`] abstracts the transports that deliver user
//!   intent and window events (a Unix socket, Hyprland's event socket).
//! * [`traits::StatusSource`] and [`traits::Toggle`] cover the small
//!   status indicators that usually sit next to a dock.
//!
//! [`dock::Dock`] ties these together.  Concrete implementations live in
//! [`hyprland`], [`ipc`] and [`status`].  Icons are resolved from the
//! freedesktop icon themes by [`icon`], and applications are looked up in
//! `.desktop` files by [`desktop`].

pub mod app;
pub mod command;
pub mod config;
pub mod desktop;
pub mod dock;
pub mod hyprland;
pub mod icon;
pub mod ipc;
pub mod notify;
pub mod reconcile;
pub mod status;
pub mod traits;

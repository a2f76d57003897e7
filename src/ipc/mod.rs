//! Transports that deliver commands from outside the compositor.
//!
//! External tools (bar click handlers, key-bind helpers) connect to the
//! Unix socket in [`listener`] and send newline-delimited JSON commands.
//! With the `notifications` feature, [`notifications`] follows desktop
//! notifications on the session bus.

pub mod listener;
#[cfg(feature = "notifications")]
pub mod notifications;

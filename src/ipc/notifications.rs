//! Desktop-notification [`CommandSource`].
//!
//! Watches `org.freedesktop.Notifications.Notify` calls on the session bus
//! and turns each one into a [`Command::Notify`].  The connection becomes
//! a bus monitor, so it only observes the calls; the notification daemon
//! still receives and shows them.
//!
//! The window is identified from the `sender-pid` and `desktop-entry`
//! hints.  When an application sets no `sender-pid`, the pid of the
//! sending bus connection is asked from the bus instead.

use crate::command::Command;
use crate::notify::Notification;
use crate::traits::CommandSource;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::mpsc;
use zbus::blocking::fdo::{DBusProxy, MonitoringProxy};
use zbus::blocking::{Connection, MessageIterator};
use zbus::message::Type as MessageType;
use zbus::names::BusName;
use zbus::zvariant::{OwnedValue, Value};
use zbus::MatchRule;

const INTERFACE: &str = "org.freedesktop.Notifications";
const MEMBER: &str = "Notify";

/// Arguments of `Notify`: app name, replaces id, icon, summary, body,
/// actions, hints and timeout.
type NotifyArgs = (
    String,
    u32,
    String,
    String,
    String,
    Vec<String>,
    HashMap<String, OwnedValue>,
    i32,
);

/// Errors produced by the notification source.
#[derive(Debug, thiserror::Error)]
pub enum NotificationSourceError {
    #[error("d-bus error: {0}")]
    DBus(#[from] zbus::Error),
    #[error("d-bus call failed: {0}")]
    Fdo(#[from] zbus::fdo::Error),
}

/// A [`CommandSource`] fed by the session bus.
#[derive(Debug, Default)]
pub struct NotificationSource;

impl NotificationSource {
    pub fn new() -> Self {
        Self
    }
}

/// Integer hint value as a pid, whatever width the sender used.
fn pid_value(value: &Value<'_>) -> Option<u32> {
    let pid: i64 = match value {
        Value::I64(n) => *n,
        Value::U64(n) => i64::try_from(*n).ok()?,
        Value::I32(n) => i64::from(*n),
        Value::U32(n) => i64::from(*n),
        Value::I16(n) => i64::from(*n),
        Value::U16(n) => i64::from(*n),
        _ => return None,
    };
    u32::try_from(pid).ok().filter(|p| *p > 0)
}

/// Build a [`Notification`] from the `Notify` hints.
///
/// `app_name` stands in for the desktop entry when the hint is missing.
pub fn notification_from_hints(app_name: &str, hints: &HashMap<String, OwnedValue>) -> Notification {
    let sender_pid = hints.get("sender-pid").and_then(|v| pid_value(v));
    let desktop_entry = match hints.get("desktop-entry").map(|v| &**v) {
        Some(Value::Str(s)) if !s.as_str().is_empty() => Some(s.as_str().to_string()),
        _ => Some(app_name.to_string()).filter(|n| !n.is_empty()),
    };
    Notification {
        sender_pid,
        desktop_entry,
    }
}

impl CommandSource for NotificationSource {
    type Error = NotificationSourceError;

    /// Monitor the session bus and forward notifications.
    ///
    /// This method **blocks** until the bus connection drops or the sink
    /// is closed.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // A monitor cannot make calls, so pid lookups use a second
        // connection.
        let lookup = Connection::session()?;
        let bus = DBusProxy::new(&lookup)?;

        let monitor = Connection::session()?;
        let rule = MatchRule::builder()
            .msg_type(MessageType::MethodCall)
            .interface(INTERFACE)?
            .member(MEMBER)?
            .build();
        MonitoringProxy::new(&monitor)?.become_monitor(&[rule], 0)?;
        info!("watching {}.{}", INTERFACE, MEMBER);

        for msg in MessageIterator::from(monitor) {
            let msg = msg?;
            let header = msg.header();
            if msg.message_type() != MessageType::MethodCall
                || header.member().map(|m| m.as_str()) != Some(MEMBER)
            {
                continue;
            }
            let (app_name, _, _, summary, _, _, hints, _): NotifyArgs = match msg.body().deserialize() {
                Ok(args) => args,
                Err(e) => {
                    warn!("malformed Notify call: {}", e);
                    continue;
                }
            };

            let mut notification = notification_from_hints(&app_name, &hints);
            if notification.sender_pid.is_none() {
                if let Some(sender) = header.sender() {
                    notification.sender_pid = bus
                        .get_connection_unix_process_id(BusName::from(sender.clone()))
                        .ok();
                }
            }
            debug!("notification {:?} from {:?}", summary, notification);
            if sink.send(Command::Notify(notification)).is_err() {
                info!("sink closed, shutting down");
                return Ok(());
            }
        }
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(v: Value<'_>) -> OwnedValue {
        OwnedValue::try_from(v).unwrap()
    }

    fn hints(pairs: Vec<(&str, Value<'_>)>) -> HashMap<String, OwnedValue> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), owned(v))).collect()
    }

    #[test]
    fn hints_give_pid_and_entry() {
        let h = hints(vec![
            ("sender-pid", Value::from(4242i64)),
            ("desktop-entry", Value::from("org.telegram.desktop")),
            ("urgency", Value::from(1u8)),
        ]);
        assert_eq!(
            notification_from_hints("Telegram", &h),
            Notification {
                sender_pid: Some(4242),
                desktop_entry: Some("org.telegram.desktop".into()),
            }
        );
    }

    #[test]
    fn pid_accepts_any_integer_width() {
        for v in [Value::from(77u32), Value::from(77i32), Value::from(77u64), Value::from(77i16)] {
            let h = hints(vec![("sender-pid", v)]);
            assert_eq!(notification_from_hints("", &h).sender_pid, Some(77));
        }
    }

    #[test]
    fn bad_pids_are_ignored() {
        for v in [Value::from(-5i64), Value::from(0u32), Value::from("123")] {
            let h = hints(vec![("sender-pid", v)]);
            assert_eq!(notification_from_hints("", &h).sender_pid, None);
        }
    }

    #[test]
    fn app_name_stands_in_for_missing_entry() {
        let n = notification_from_hints("firefox", &HashMap::new());
        assert_eq!(n.desktop_entry.as_deref(), Some("firefox"));
        assert_eq!(n.sender_pid, None);

        let h = hints(vec![("desktop-entry", Value::from(""))]);
        assert_eq!(notification_from_hints("kitty", &h).desktop_entry.as_deref(), Some("kitty"));

        assert_eq!(notification_from_hints("", &HashMap::new()), Notification::default());
    }
}

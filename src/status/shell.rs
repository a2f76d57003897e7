//! Status sources backed by system commands and sysfs.
//!
//! Every query runs synchronously.  A command that is missing, fails or
//! prints something unexpected degrades to [`OFFLINE`] rather than
//! returning an error.

use super::parse::{
    bluetooth_connected, nmcli_signal, pw_next_node, rfkill_block, rfkill_devices, wpctl_volume,
    PwNode,
};
use super::{battery_icon, bluetooth_icon, step_volume, wifi_icon, AudioClass, BatteryState, OFFLINE};
use crate::traits::{StatusSource, Toggle};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Errors produced when running a status command.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: process::ExitStatus,
    },
    #[error("unexpected {program} output: {source}")]
    Output {
        program: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Run `program` and return its stdout, failing on a non-zero exit.
pub fn capture(program: &str, args: &[&str]) -> Result<String, ShellError> {
    let out = process::Command::new(program)
        .args(args)
        .output()
        .map_err(|source| ShellError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !out.status.success() {
        return Err(ShellError::Failed {
            program: program.to_string(),
            status: out.status,
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Run `program` and return its stdout if it succeeded.
pub fn output(program: &str, args: &[&str]) -> Option<String> {
    match capture(program, args) {
        Ok(out) => Some(out),
        Err(e) => {
            debug!("{} {:?}: {}", program, args, e);
            None
        }
    }
}

/// Run `program` to completion, failing on a non-zero exit.
pub fn run(program: &str, args: &[&str]) -> Result<(), ShellError> {
    info!("{} {}", program, args.join(" "));
    let status = process::Command::new(program)
        .args(args)
        .status()
        .map_err(|source| ShellError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(ShellError::Failed {
            program: program.to_string(),
            status,
        });
    }
    Ok(())
}

/// Block signal for an rfkill device type, if blocked.
fn rfkill_signal(kind: &str) -> Option<i32> {
    let json = output("rfkill", &["-J"])?;
    match rfkill_devices(&json) {
        Ok(devices) => rfkill_block(&devices, kind),
        Err(e) => {
            debug!("bad rfkill output: {}", e);
            None
        }
    }
}

/// Wi-Fi signal via `rfkill` and `nmcli`.  Toggling flips the `wlan`
/// soft block.
#[derive(Debug, Clone, Copy, Default)]
pub struct WifiStatus;

impl StatusSource for WifiStatus {
    fn signal(&self) -> i32 {
        if let Some(blocked) = rfkill_signal("wlan") {
            return blocked;
        }
        output("nmcli", &["-f", "IN-USE,SIGNAL", "d", "wifi"])
            .and_then(|out| nmcli_signal(&out))
            .unwrap_or(OFFLINE)
    }

    fn icon_name(&self, signal: i32) -> String {
        wifi_icon(signal)
    }
}

impl Toggle for WifiStatus {
    type Error = ShellError;

    fn toggle(&self) -> Result<(), ShellError> {
        run("rfkill", &["toggle", "wlan"])
    }
}

/// Connected Bluetooth devices via `rfkill` and `bluetoothctl`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BluetoothStatus;

impl StatusSource for BluetoothStatus {
    fn signal(&self) -> i32 {
        if let Some(blocked) = rfkill_signal("bluetooth") {
            return blocked;
        }
        output("bluetoothctl", &["devices", "Connected"])
            .map(|out| bluetooth_connected(&out))
            .unwrap_or(OFFLINE)
    }

    fn icon_name(&self, signal: i32) -> String {
        bluetooth_icon(signal)
    }
}

impl Toggle for BluetoothStatus {
    type Error = ShellError;

    fn toggle(&self) -> Result<(), ShellError> {
        run("rfkill", &["toggle", "bluetooth"])
    }
}

/// Volume of a sink or source via `wpctl`.  Toggling flips mute.
#[derive(Debug, Clone)]
pub struct VolumeStatus {
    device: String,
    mute_string: String,
    step: u32,
    class: AudioClass,
}

impl VolumeStatus {
    /// Speaker volume of `sink`.
    pub fn new(sink: impl Into<String>, mute_string: impl Into<String>) -> Self {
        Self {
            device: sink.into(),
            mute_string: mute_string.into(),
            step: 2,
            class: AudioClass::Sink,
        }
    }

    /// Microphone level of `source`.
    pub fn mic(source: impl Into<String>, mute_string: impl Into<String>) -> Self {
        Self {
            class: AudioClass::Source,
            ..Self::new(source, mute_string)
        }
    }

    /// Percent moved by [`increase`](Self::increase) and
    /// [`decrease`](Self::decrease).
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub fn class(&self) -> AudioClass {
        self.class
    }

    /// Move the volume by `delta` percent.  Does nothing while muted.
    pub fn step_by(&self, delta: i32) -> Result<(), ShellError> {
        let current = self.signal();
        let Some(target) = step_volume(current, delta) else {
            debug!("volume {} of {} not stepped by {}", current, self.device, delta);
            return Ok(());
        };
        run("wpctl", &["set-volume", &self.device, &format!("{}%", target)])
    }

    pub fn increase(&self) -> Result<(), ShellError> {
        self.step_by(i32::try_from(self.step).unwrap_or(i32::MAX))
    }

    pub fn decrease(&self) -> Result<(), ShellError> {
        self.step_by(-i32::try_from(self.step).unwrap_or(i32::MAX))
    }

    /// Make the next device of the same class the default, in `pw-dump`
    /// order.  Returns the new default, or `None` when the current one is
    /// not listed.
    pub fn next_device(&self) -> Result<Option<PwNode>, ShellError> {
        let json = capture("pw-dump", &["--no-colors"])?;
        let next = pw_next_node(&json, self.class.media_class()).map_err(|source| {
            ShellError::Output {
                program: "pw-dump".into(),
                source,
            }
        })?;
        if let Some(node) = &next {
            run("wpctl", &["set-default", &node.id.to_string()])?;
            info!("default {} is now {}", self.class.media_class(), node.description);
        }
        Ok(next)
    }
}

impl StatusSource for VolumeStatus {
    fn signal(&self) -> i32 {
        output("wpctl", &["get-volume", &self.device])
            .map(|out| wpctl_volume(&out, &self.mute_string))
            .unwrap_or(OFFLINE)
    }

    fn icon_name(&self, signal: i32) -> String {
        self.class.icon(signal)
    }
}

impl Toggle for VolumeStatus {
    type Error = ShellError;

    fn toggle(&self) -> Result<(), ShellError> {
        run("wpctl", &["set-mute", &self.device, "toggle"])
    }
}

/// Battery charge from `/sys/class/power_supply`.
#[derive(Debug, Clone)]
pub struct BatteryStatus {
    dir: PathBuf,
    name: Option<String>,
}

impl BatteryStatus {
    /// Battery `name` under `dir`, or the first battery found when `name`
    /// is `None`.
    pub fn new(dir: impl AsRef<Path>, name: Option<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            name,
        }
    }

    fn device(&self) -> Option<PathBuf> {
        if let Some(name) = &self.name {
            let path = self.dir.join(name);
            return path.is_dir().then_some(path);
        }
        let mut devices: Vec<PathBuf> = fs::read_dir(&self.dir)
            .ok()?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .collect();
        devices.sort();
        devices.into_iter().find(|d| {
            fs::read_to_string(d.join("type")).is_ok_and(|t| t.trim() == "Battery")
        })
    }

    /// Charging state, or `Unknown` when there is no battery.
    pub fn state(&self) -> BatteryState {
        self.device()
            .and_then(|d| fs::read_to_string(d.join("status")).ok())
            .map(|s| BatteryState::from_sysfs(&s))
            .unwrap_or(BatteryState::Unknown)
    }
}

impl StatusSource for BatteryStatus {
    fn signal(&self) -> i32 {
        self.device()
            .and_then(|d| fs::read_to_string(d.join("capacity")).ok())
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(OFFLINE)
    }

    fn icon_name(&self, signal: i32) -> String {
        battery_icon(signal, self.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn power_supply() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "pindock-power-test-{}-{}",
            std::process::id(),
            id
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn supply(dir: &Path, name: &str, kind: &str, capacity: &str, status: &str) {
        let d = dir.join(name);
        fs::create_dir_all(&d).unwrap();
        fs::write(d.join("type"), format!("{}\n", kind)).unwrap();
        fs::write(d.join("capacity"), format!("{}\n", capacity)).unwrap();
        fs::write(d.join("status"), format!("{}\n", status)).unwrap();
    }

    #[test]
    fn first_battery_is_used() {
        let dir = power_supply();
        supply(&dir, "AC", "Mains", "0", "Unknown");
        supply(&dir, "BAT0", "Battery", "43", "Charging");
        let battery = BatteryStatus::new(&dir, None);
        assert_eq!(battery.signal(), 43);
        assert_eq!(battery.state(), BatteryState::Charging);
        assert_eq!(battery.current_icon(), "battery-level-50-charging-symbolic");
    }

    #[test]
    fn named_battery() {
        let dir = power_supply();
        supply(&dir, "BAT0", "Battery", "10", "Discharging");
        supply(&dir, "BAT1", "Battery", "100", "Full");
        let battery = BatteryStatus::new(&dir, Some("BAT1".into()));
        assert_eq!(battery.current_icon(), "battery-level-100-charged-symbolic");
    }

    #[test]
    fn missing_battery_is_offline() {
        let dir = power_supply();
        supply(&dir, "AC", "Mains", "0", "Unknown");
        let battery = BatteryStatus::new(&dir, None);
        assert_eq!(battery.signal(), OFFLINE);
        assert_eq!(battery.current_icon(), "battery-missing-symbolic");
        assert_eq!(BatteryStatus::new(&dir, Some("BAT9".into())).signal(), OFFLINE);
    }

    #[test]
    fn command_helpers() {
        assert_eq!(output("sh", &["-c", "echo hi"]).as_deref(), Some("hi\n"));
        assert_eq!(output("sh", &["-c", "exit 3"]), None);
        assert_eq!(output("pindock-no-such-program", &[]), None);

        assert!(run("sh", &["-c", "true"]).is_ok());
        assert!(matches!(
            run("sh", &["-c", "exit 1"]),
            Err(ShellError::Failed { .. })
        ));
        assert!(matches!(
            run("pindock-no-such-program", &[]),
            Err(ShellError::Spawn { .. })
        ));
    }

    #[test]
    fn icon_names_delegate() {
        assert_eq!(WifiStatus.icon_name(85), "network-wireless-signal-excellent-symbolic");
        assert_eq!(BluetoothStatus.icon_name(1), "bluetooth-active-symbolic");
        let volume = VolumeStatus::new("@DEFAULT_AUDIO_SINK@", "[MUTED]");
        assert_eq!(volume.icon_name(50), "audio-volume-medium-symbolic");
        let mic = VolumeStatus::mic("@DEFAULT_AUDIO_SOURCE@", "[MUTED]");
        assert_eq!(mic.icon_name(50), "microphone-sensitivity-medium-symbolic");
        assert_eq!(mic.class(), AudioClass::Source);
    }

    #[test]
    fn capture_reports_failures() {
        assert_eq!(capture("sh", &["-c", "printf ok"]).unwrap(), "ok");
        assert!(matches!(
            capture("sh", &["-c", "exit 2"]),
            Err(ShellError::Failed { .. })
        ));
        assert!(matches!(
            capture("pindock-no-such-program", &[]),
            Err(ShellError::Spawn { .. })
        ));
    }

    #[test]
    fn unreadable_volume_does_not_step() {
        let volume = VolumeStatus::new("pindock-no-such-sink", "[MUTED]").with_step(5);
        assert_eq!(volume.signal(), OFFLINE);
        assert!(volume.increase().is_ok());
        assert!(volume.decrease().is_ok());
    }
}

//! System status adapters.
//!
//! Each adapter reduces a subsystem to a single integer signal and maps it
//! to a symbolic icon name.  Negative signals are sentinels:
//!
//! | signal | meaning              |
//! |--------|----------------------|
//! | `-3`   | hardware blocked     |
//! | `-2`   | soft blocked         |
//! | `-1`   | offline / unknown    |
//! | `>= 0` | level                |
//!
//! The parsers in [`parse`] are pure; [`shell`] runs the actual commands.

pub mod parse;
pub mod shell;

pub use shell::{BatteryStatus, BluetoothStatus, VolumeStatus, WifiStatus};

pub const HARD_BLOCKED: i32 = -3;
pub const SOFT_BLOCKED: i32 = -2;
pub const OFFLINE: i32 = -1;

/// Icon for a Wi-Fi signal strength in percent.
pub fn wifi_icon(signal: i32) -> String {
    let strength = match signal {
        s if s <= HARD_BLOCKED => return "network-wireless-hardware-disabled-symbolic".into(),
        SOFT_BLOCKED => return "network-wireless-disabled-symbolic".into(),
        OFFLINE => return "network-wireless-offline-symbolic".into(),
        s if s < 20 => "none",
        s if s < 40 => "weak",
        s if s < 60 => "ok",
        s if s < 80 => "good",
        _ => "excellent",
    };
    format!("network-wireless-signal-{}-symbolic", strength)
}

/// Icon for a connected Bluetooth device count.
///
/// A soft-blocked adapter shows the hardware-disabled icon, and no
/// connected devices shows the disabled one.
pub fn bluetooth_icon(signal: i32) -> String {
    match signal {
        s if s <= SOFT_BLOCKED => "bluetooth-hardware-disabled-symbolic",
        OFFLINE => "bluetooth-disabled-symbolic",
        _ => "bluetooth-active-symbolic",
    }
    .into()
}

/// Icon for a volume in percent.  Muted reads as `-1`.
pub fn volume_icon(signal: i32) -> String {
    let mode = match signal {
        s if s <= 0 => "muted",
        s if s < 33 => "low",
        s if s < 66 => "medium",
        _ => "high",
    };
    format!("audio-volume-{}-symbolic", mode)
}

/// Icon for a microphone level in percent.
pub fn mic_icon(signal: i32) -> String {
    let mode = match signal {
        s if s <= 0 => "muted",
        s if s < 33 => "low",
        s if s < 66 => "medium",
        _ => "high",
    };
    format!("microphone-sensitivity-{}-symbolic", mode)
}

/// Which side of the audio graph a volume adapter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioClass {
    Sink,
    Source,
}

impl AudioClass {
    /// PipeWire `media.class` of the devices.
    pub fn media_class(self) -> &'static str {
        match self {
            AudioClass::Sink => "Audio/Sink",
            AudioClass::Source => "Audio/Source",
        }
    }

    pub fn icon(self, signal: i32) -> String {
        match self {
            AudioClass::Sink => volume_icon(signal),
            AudioClass::Source => mic_icon(signal),
        }
    }
}

/// Target volume after moving `current` by `delta` percent.
///
/// Muted or unknown volume (`current < 0`) does not move.  Raising stops
/// at 100 and lowering at 0; a volume already past the limit in the
/// direction of travel stays where it is.
pub fn step_volume(current: i32, delta: i32) -> Option<i32> {
    if current < 0 || delta == 0 {
        return None;
    }
    if delta > 0 {
        (current < 100).then(|| (current + delta).min(100))
    } else {
        (current > 0).then(|| (current + delta).max(0))
    }
}

/// Charging state as reported by `/sys/class/power_supply/*/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryState {
    Charging,
    Discharging,
    NotCharging,
    Full,
    Unknown,
}

impl BatteryState {
    pub fn from_sysfs(status: &str) -> Self {
        match status.trim() {
            "Charging" => BatteryState::Charging,
            "Discharging" => BatteryState::Discharging,
            "Not charging" => BatteryState::NotCharging,
            "Full" => BatteryState::Full,
            _ => BatteryState::Unknown,
        }
    }
}

/// Icon for a battery charge in percent.
///
/// The level is rounded up to the next multiple of ten.  A full battery
/// always reads 100, and 100 is shown as charged.
pub fn battery_icon(percent: i32, state: BatteryState) -> String {
    if percent < 0 {
        return "battery-missing-symbolic".into();
    }
    let level = if state == BatteryState::Full {
        100
    } else {
        ((percent + 9) / 10 * 10).min(100)
    };
    let mode = if level == 100 {
        "-charged"
    } else if state == BatteryState::Charging {
        "-charging"
    } else {
        ""
    };
    format!("battery-level-{}{}-symbolic", level, mode)
}

//! Entry point for **pindock**.
//!
//! Without a subcommand, runs the dock daemon: spawns all
//! [`CommandSource`](pindock::traits::CommandSource)s on background
//! threads, processes incoming commands on the main thread and prints a
//! JSON snapshot of the dock to stdout whenever it changes.
//!
//! ```text
//! pindock [--config <path>]                 run the daemon
//! pindock send <json>                       send a command to the daemon
//! pindock status <wifi|bluetooth|volume|mic|battery>
//! pindock toggle <wifi|bluetooth|volume|mic>
//! pindock <volume|mic> <up|down|next>       step or switch device
//! pindock icon <name> [size]                resolve an icon path
//! ```

use pindock::command::Command;
use pindock::config::Config;
use pindock::desktop::{DesktopDirs, DesktopIndex};
use pindock::dock::{Dock, DockSnapshot};
use pindock::hyprland::events::HyprlandEventSource;
use pindock::hyprland::host::HyprlandHost;
use pindock::icon::{self, IconLookup};
use pindock::ipc::listener::{self, UnixSocketListener};
#[cfg(feature = "notifications")]
use pindock::ipc::notifications::NotificationSource;
use pindock::status::{BatteryStatus, BluetoothStatus, VolumeStatus, WifiStatus};
use pindock::traits::{CommandSource, Host, StatusSource, Toggle};
use log::{error, info};
use std::path::PathBuf;
use std::process::exit;
use std::sync::mpsc;

/// Default socket path for the command listener.
fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(format!("{}/pindock.sock", runtime))
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/pindock`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("pindock")
}

/// Load the config from `explicit`, or from
/// `$XDG_CONFIG_HOME/pindock/config.json` falling back to compiled-in
/// defaults.  An explicit path that cannot be loaded is fatal.
fn load_config(explicit: Option<PathBuf>) -> Config {
    if let Some(path) = explicit {
        return match Config::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("{}", e);
                exit(1);
            }
        };
    }
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => {
            let path = PathBuf::from(args.remove(i + 1));
            args.remove(i);
            Some(path)
        }
        Some(_) => usage(),
        None => None,
    };
    let config = load_config(config_path);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["daemon"] => run_daemon(config),
        ["send", json] => send_command(&config, json),
        ["status", which] => print_status(&config, which),
        ["toggle", which] => toggle(&config, which),
        [which @ ("volume" | "mic"), action] => adjust_volume(&config, which, action),
        ["icon", name] => print_icon(&config, name, config.icons.size),
        ["icon", name, size] => match size.parse() {
            Ok(size) => print_icon(&config, name, size),
            Err(_) => usage(),
        },
        _ => usage(),
    }
}

fn usage() -> ! {
    eprintln!(
        "usage: pindock [--config <path>] [daemon | send <json> | status <wifi|bluetooth|volume|mic|battery> | toggle <wifi|bluetooth|volume|mic> | volume|mic <up|down|next> | icon <name> [size]]"
    );
    exit(2);
}

fn socket_path(config: &Config) -> PathBuf {
    config.socket.clone().unwrap_or_else(default_socket_path)
}

/// Normal daemon mode.
fn run_daemon(config: Config) {
    let host = match HyprlandHost::new() {
        Ok(h) => h,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    let desktop = DesktopIndex::scan(&DesktopDirs::from_env(), Some(config.icons.size));
    info!("indexed {} applications", desktop.len());

    let mut dock = Dock::from_config(host, &config, desktop);
    info!("{} pinned apps", dock.pinned().len());
    if let Err(e) = dock.refresh() {
        error!("initial refresh failed: {}", e);
    }

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx, socket_path(&config));

    run_event_loop(dock, cmd_rx);
}

//  Event loop

fn run_event_loop<H: Host>(mut dock: Dock<H>, cmd_rx: mpsc::Receiver<Command>) {
    info!("pindock running");
    let mut last = None;
    emit_snapshot(dock.snapshot(), &mut last);
    for cmd in cmd_rx {
        if let Err(e) = dock.handle(cmd) {
            error!("command error: {}", e);
        }
        emit_snapshot(dock.snapshot(), &mut last);
    }
    info!("all command sources closed, exiting");
}

/// Print `snapshot` as one JSON line if it differs from the last one.
fn emit_snapshot(snapshot: DockSnapshot, last: &mut Option<DockSnapshot>) {
    if last.as_ref() == Some(&snapshot) {
        return;
    }
    match serde_json::to_string(&snapshot) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("snapshot serialization failed: {}", e),
    }
    *last = Some(snapshot);
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>, socket: PathBuf) {
    {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let mut source = UnixSocketListener::new(&socket);
            if let Err(e) = source.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    match HyprlandEventSource::new() {
        Ok(mut source) => {
            let tx = tx.clone();
            std::thread::spawn(move || {
                if let Err(e) = source.run(tx) {
                    error!("event source error: {}", e);
                }
            });
        }
        Err(e) => error!("{}", e),
    }

    #[cfg(feature = "notifications")]
    {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let mut source = NotificationSource::new();
            if let Err(e) = source.run(tx) {
                error!("notification source error: {}", e);
            }
        });
    }

    drop(tx);
}

fn send_command(config: &Config, json: &str) {
    let cmd: Command = match serde_json::from_str(json) {
        Ok(cmd) => cmd,
        Err(e) => {
            error!("bad command {}: {}", json, e);
            exit(2);
        }
    };
    if let Err(e) = listener::send(socket_path(config), &[cmd]) {
        error!("{}", e);
        exit(1);
    }
}

fn status_source(config: &Config, which: &str) -> Box<dyn StatusSource> {
    match which {
        "wifi" => Box::new(WifiStatus),
        "bluetooth" => Box::new(BluetoothStatus),
        "volume" | "mic" => Box::new(volume_status(config, which)),
        "battery" => Box::new(BatteryStatus::new(
            &config.status.power_supply_dir,
            config.status.battery.clone(),
        )),
        _ => usage(),
    }
}

/// Print `<signal> <icon-name>`.
fn print_status(config: &Config, which: &str) {
    let source = status_source(config, which);
    let signal = source.signal();
    println!("{} {}", signal, source.icon_name(signal));
}

fn toggle(config: &Config, which: &str) {
    let result = match which {
        "wifi" => WifiStatus.toggle(),
        "bluetooth" => BluetoothStatus.toggle(),
        "volume" | "mic" => volume_status(config, which).toggle(),
        _ => usage(),
    };
    if let Err(e) = result {
        error!("{}", e);
        exit(1);
    }
    print_status(config, which);
}

fn volume_status(config: &Config, which: &str) -> VolumeStatus {
    let status = &config.status;
    let volume = match which {
        "mic" => VolumeStatus::mic(status.source.clone(), status.mute_string.clone()),
        _ => VolumeStatus::new(status.sink.clone(), status.mute_string.clone()),
    };
    volume.with_step(status.step)
}

/// `up`, `down` or `next` on the speaker or microphone, then print its
/// status.
fn adjust_volume(config: &Config, which: &str, action: &str) {
    let volume = volume_status(config, which);
    let result = match action {
        "up" => volume.increase(),
        "down" => volume.decrease(),
        "next" => volume.next_device().map(|node| match node {
            Some(node) => println!("{}", node.description),
            None => info!("current default device not found"),
        }),
        _ => usage(),
    };
    if let Err(e) = result {
        error!("{}", e);
        exit(1);
    }
    print_status(config, which);
}

fn print_icon(config: &Config, name: &str, size: u32) {
    let lookup: IconLookup = config.icons.lookup();
    match icon::resolve(name, size, &lookup, &config.icons.foreground) {
        Some(surface) => println!("{}", surface.path.display()),
        None => {
            error!("icon {} not found", name);
            exit(1);
        }
    }
}

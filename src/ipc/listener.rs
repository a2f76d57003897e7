//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! "Refresh"
//! {"Select":{"index":0,"button":"primary"}}
//! {"Select":{"index":3,"button":2}}
//! {"Notify":{"sender_pid":4242,"desktop_entry":"org.telegram.desktop"}}
//! {"Dismiss":{"window":"0x55d0c8a2b3f0"}}
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is
    /// called, replacing any stale file at `path`, and removed once the
    /// dock stops listening.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse one received line.  Blank lines are skipped; malformed ones are
/// logged and dropped so one bad client cannot stop the dock.
fn parse_line(text: &str) -> Option<Command> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(cmd) => Some(cmd),
        Err(e) => {
            error!("bad command: {}: {}", text, e);
            None
        }
    }
}

/// Forward every command from one client.  Returns `false` once the sink
/// is closed.
fn forward(stream: UnixStream, sink: &mpsc::Sender<Command>) -> bool {
    for line in BufReader::new(stream).lines() {
        let text = match line {
            Ok(text) => text,
            Err(e) => {
                error!("read error: {}", e);
                break;
            }
        };
        let Some(cmd) = parse_line(&text) else {
            continue;
        };
        debug!("received {:?}", cmd);
        if sink.send(cmd).is_err() {
            return false;
        }
    }
    true
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and serve clients one after another.
    ///
    /// This method **blocks** until the sink is closed, then removes the
    /// socket file.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        let _ = std::fs::remove_file(&self.path);
        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("accept error: {}", e);
                    continue;
                }
            };
            debug!("client connected");
            if !forward(stream, &sink) {
                info!("dock stopped, closing {}", self.path.display());
                let _ = std::fs::remove_file(&self.path);
                return Ok(());
            }
            debug!("client disconnected");
        }
        Ok(())
    }
}

/// Send `commands` to a listener at `path`, one line each.
pub fn send(path: impl AsRef<Path>, commands: &[Command]) -> Result<(), UnixSocketError> {
    let mut stream = UnixStream::connect(path.as_ref())?;
    for cmd in commands {
        let line = serde_json::to_string(cmd)?;
        writeln!(stream, "{}", line)?;
    }
    stream.flush()?;
    Ok(())
}

//  Tests

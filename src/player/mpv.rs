//! mpv engine driven over its JSON IPC channel.
//!
//! ```text
//!   MpvPlayer::spawn()
//!         │
//!         ├── child: mpv --idle=yes --input-ipc-server=<socket>
//!         └── IpcChannel ── {"command": [...], "request_id": N}\n  →
//!                        ←  {"request_id": N, "error": "success", "data": ...}\n
//! ```
//!
//! Calls are synchronous: a command blocks until its own reply arrives.
//! Unsolicited event lines received in between are skipped.
//!
//! Platform notes:
//! - Unix:   Unix domain socket in the temp directory
//! - Windows: Named pipe  \\.\pipe\<name>

use crate::player::{NativePlayer, RenderHandle};
use crate::utils::error::{IntoPlayerError, Result, TPlayerError};
use log::{debug, info, warn};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

/// mpv's reply when a property has no value yet (e.g. `duration` while loading)
const PROPERTY_UNAVAILABLE: &str = "property unavailable";

const IPC_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(unix)]
type IpcStream = std::os::unix::net::UnixStream;

#[cfg(windows)]
type IpcStream = std::fs::File;

/// Request/reply framing over any line-oriented byte stream.
pub struct IpcChannel<R, W> {
    reader: R,
    writer: W,
    next_request_id: u64,
}

impl<R: BufRead, W: Write> IpcChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            next_request_id: 1,
        }
    }

    /// Send one command and wait for its reply's `data` field
    pub fn command(&mut self, args: Value) -> Result<Value> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let mut line = serde_json::to_string(&json!({ "command": args, "request_id": request_id }))?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).ipc_err("Writing command")?;
        self.writer.flush().ipc_err("Flushing command")?;

        let mut reply = String::new();
        loop {
            reply.clear();
            let read = self.reader.read_line(&mut reply).ipc_err("Reading reply")?;
            if read == 0 {
                return Err(TPlayerError::Ipc("mpv IPC connection closed".to_string()));
            }

            let value: Value = match serde_json::from_str(reply.trim()) {
                Ok(value) => value,
                Err(e) => {
                    debug!("mpv: invalid json '{}': {}", reply.trim(), e);
                    continue;
                }
            };

            if value.get("request_id").and_then(Value::as_u64) != Some(request_id) {
                debug!("mpv: event {}", reply.trim());
                continue;
            }

            return match value.get("error").and_then(Value::as_str) {
                Some("success") => Ok(value.get("data").cloned().unwrap_or(Value::Null)),
                Some(err) => Err(TPlayerError::Engine(err.to_string())),
                None => Err(TPlayerError::Engine("unknown error".to_string())),
            };
        }
    }

    /// Read a property; `None` while mpv has no value for it
    pub fn get_property(&mut self, name: &str) -> Result<Option<Value>> {
        match self.command(json!(["get_property", name])) {
            Ok(value) => Ok(Some(value)),
            Err(TPlayerError::Engine(err)) if err == PROPERTY_UNAVAILABLE => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        self.command(json!(["set_property", name, value])).map(|_| ())
    }
}

/// A running mpv process
pub struct MpvPlayer {
    process: Child,
    ipc: IpcChannel<BufReader<IpcStream>, IpcStream>,
    socket_path: PathBuf,
    loaded: Option<String>,
    stopped: bool,
}

impl MpvPlayer {
    /// Launch `binary` idle, with no media and no window
    pub fn spawn(binary: &Path) -> Result<Self> {
        let socket_path = socket_path();

        #[cfg(unix)]
        let _ = std::fs::remove_file(&socket_path);

        info!("mpv: spawning {}", binary.display());
        let mut process = Command::new(binary)
            .arg("--idle=yes")
            .arg("--force-window=no")
            .arg("--keep-open=yes")
            .arg("--no-terminal")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .engine_err("Failed to start mpv")?;

        let stream = match connect(&socket_path) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = process.kill();
                let _ = process.wait();
                return Err(e);
            }
        };

        let reader = BufReader::new(stream.try_clone().ipc_err("Cloning IPC stream")?);
        info!("mpv: connected to IPC at {}", socket_path.display());

        Ok(Self {
            process,
            ipc: IpcChannel::new(reader, stream),
            socket_path,
            loaded: None,
            stopped: false,
        })
    }

    fn number(&mut self, property: &str) -> Result<Option<f64>> {
        Ok(self.ipc.get_property(property)?.and_then(|v| v.as_f64()))
    }

    fn flag(&mut self, property: &str) -> Result<bool> {
        Ok(self
            .ipc
            .get_property(property)?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    fn millis(&mut self, property: &str) -> Result<i64> {
        Ok(self
            .number(property)?
            .map(|secs| (secs * 1000.0) as i64)
            .unwrap_or(-1))
    }

    fn reap(&mut self) {
        for _ in 0..20 {
            if let Ok(Some(_)) = self.process.try_wait() {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }

        warn!("mpv: did not exit after quit, killing");
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

impl NativePlayer for MpvPlayer {
    fn set_window(&mut self, handle: RenderHandle) -> Result<()> {
        self.ipc.set_property("wid", json!(handle.wid()))
    }

    fn load(&mut self, locator: &str) -> Result<()> {
        self.ipc.set_property("pause", json!(true))?;
        self.ipc.command(json!(["loadfile", locator, "replace"]))?;
        self.loaded = Some(locator.to_string());
        self.stopped = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let locator = self
            .loaded
            .clone()
            .ok_or_else(|| TPlayerError::Engine("no media loaded".to_string()))?;

        if self.stopped {
            self.ipc.command(json!(["loadfile", locator, "replace"]))?;
            self.stopped = false;
        }

        self.ipc.set_property("pause", json!(false))
    }

    fn pause(&mut self) -> Result<()> {
        self.ipc.set_property("pause", json!(true))
    }

    fn stop(&mut self) -> Result<()> {
        self.ipc.command(json!(["stop"]))?;
        self.stopped = true;
        Ok(())
    }

    fn is_playing(&mut self) -> Result<bool> {
        if self.loaded.is_none() || self.stopped {
            return Ok(false);
        }

        Ok(!self.flag("pause")? && !self.flag("idle-active")?)
    }

    fn set_position(&mut self, position: f64) -> Result<()> {
        self.ipc.set_property("percent-pos", json!(position * 100.0))
    }

    fn position(&mut self) -> Result<f64> {
        Ok(self
            .number("percent-pos")?
            .map(|percent| percent / 100.0)
            .unwrap_or(0.0))
    }

    fn set_volume(&mut self, volume: i32) -> Result<()> {
        self.ipc.set_property("volume", json!(volume))
    }

    fn volume(&mut self) -> Result<i32> {
        Ok(self.number("volume")?.map(|v| v.round() as i32).unwrap_or(0))
    }

    fn time(&mut self) -> Result<i64> {
        self.millis("time-pos")
    }

    fn length(&mut self) -> Result<i64> {
        self.millis("duration")
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Err(e) = self.ipc.command(json!(["quit"])) {
            // quit can close the socket before the reply is written
            debug!("mpv: quit reply: {}", e);
        }
        self.reap();

        #[cfg(unix)]
        let _ = std::fs::remove_file(&self.socket_path);

        Ok(())
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        if let Ok(None) = self.process.try_wait() {
            let _ = self.process.kill();
            let _ = self.process.wait();
        }
    }
}

/// The configured binary, or the first `mpv` on `PATH`
pub fn find_mpv_binary(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        return path.is_file().then(|| path.to_path_buf());
    }

    let exe_name = if cfg!(windows) { "mpv.exe" } else { "mpv" };
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(exe_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(unix)]
fn socket_path() -> PathBuf {
    std::env::temp_dir().join(format!("tplayer-mpv-{}.sock", std::process::id()))
}

#[cfg(windows)]
fn socket_path() -> PathBuf {
    PathBuf::from(format!(r"\\.\pipe\tplayer-mpv-{}", std::process::id()))
}

#[cfg(unix)]
fn connect(socket_path: &Path) -> Result<IpcStream> {
    for _ in 0..50 {
        thread::sleep(Duration::from_millis(100));
        if let Ok(stream) = IpcStream::connect(socket_path) {
            stream.set_read_timeout(Some(IPC_TIMEOUT)).ipc_err("Setting IPC timeout")?;
            return Ok(stream);
        }
    }
    Err(TPlayerError::Ipc("mpv IPC socket did not appear".to_string()))
}

#[cfg(windows)]
fn connect(socket_path: &Path) -> Result<IpcStream> {
    for _ in 0..50 {
        thread::sleep(Duration::from_millis(100));
        if let Ok(pipe) = std::fs::OpenOptions::new().read(true).write(true).open(socket_path) {
            return Ok(pipe);
        }
    }
    Err(TPlayerError::Ipc("mpv named pipe did not appear".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn channel(replies: &str) -> IpcChannel<Cursor<Vec<u8>>, Vec<u8>> {
        IpcChannel::new(Cursor::new(replies.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_command_frames_request_and_returns_data() {
        let mut ipc = channel("{\"request_id\":1,\"error\":\"success\",\"data\":42.5}\n");
        let data = ipc.command(json!(["get_property", "time-pos"])).unwrap();
        assert_eq!(data, json!(42.5));

        let sent: Value = serde_json::from_slice(&ipc.writer).unwrap();
        assert_eq!(sent, json!({ "command": ["get_property", "time-pos"], "request_id": 1 }));
    }

    #[test]
    fn test_command_skips_events_and_other_replies() {
        let mut ipc = channel(concat!(
            "{\"event\":\"file-loaded\"}\n",
            "not json\n",
            "{\"request_id\":7,\"error\":\"success\"}\n",
            "{\"request_id\":1,\"error\":\"success\"}\n",
        ));
        assert_eq!(ipc.command(json!(["stop"])).unwrap(), Value::Null);
    }

    #[test]
    fn test_command_error_reply() {
        let mut ipc = channel("{\"request_id\":1,\"error\":\"invalid parameter\"}\n");
        match ipc.command(json!(["loadfile"])) {
            Err(TPlayerError::Engine(msg)) => assert_eq!(msg, "invalid parameter"),
            other => panic!("Expected engine error, got {:?}", other),
        }
    }

    #[test]
    fn test_closed_connection() {
        let mut ipc = channel("");
        assert!(matches!(ipc.command(json!(["stop"])), Err(TPlayerError::Ipc(_))));
    }

    #[test]
    fn test_unavailable_property_is_none() {
        let mut ipc = channel(concat!(
            "{\"request_id\":1,\"error\":\"property unavailable\"}\n",
            "{\"request_id\":2,\"error\":\"success\",\"data\":true}\n",
        ));
        assert_eq!(ipc.get_property("duration").unwrap(), None);
        assert_eq!(ipc.get_property("pause").unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_find_configured_binary() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("mpv-custom");
        std::fs::File::create(&binary).unwrap();

        assert_eq!(find_mpv_binary(Some(&binary)), Some(binary.clone()));
        assert_eq!(find_mpv_binary(Some(&dir.path().join("missing"))), None);
    }
}

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use crate::error::{MediaError, Result};
use crate::player::Player;

// ---------------------------------------------------------------------------
// MpvPlayer
// ---------------------------------------------------------------------------

/// `Player` backed by an external mpv process driven over its JSON IPC
/// socket. One instance owns one mpv process.
pub struct MpvPlayer {
    process: Option<Child>,
    socket_path: PathBuf,
}

impl MpvPlayer {
    pub fn new() -> Self {
        let socket_path =
            std::env::temp_dir().join(format!("cutline-mpv-{}", std::process::id()));
        Self {
            process: None,
            socket_path,
        }
    }

    /// Spawn mpv idle and paused, waiting for the IPC socket to appear.
    pub fn start(&mut self) -> Result<()> {
        self.stop();
        tracing::info!(socket = %self.socket_path.display(), "starting mpv");

        let child = Command::new("mpv")
            .args([
                "--idle=yes",
                "--keep-open=yes",
                "--pause",
                "--osc=no",
                "--osd-level=0",
                &format!("--input-ipc-server={}", self.socket_path.display()),
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::Player(format!("failed to start mpv: {e}")))?;

        self.process = Some(child);

        for _ in 0..50 {
            if self.socket_path.exists() {
                return Ok(());
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
        Err(MediaError::Player("mpv socket did not appear".into()))
    }

    fn send_command(&self, command: serde_json::Value) -> Result<serde_json::Value> {
        let mut stream = UnixStream::connect(&self.socket_path)
            .map_err(|e| MediaError::Player(format!("failed to connect to mpv: {e}")))?;
        stream
            .set_read_timeout(Some(std::time::Duration::from_secs(2)))
            .ok();

        let msg = format!("{}\n", command);
        stream
            .write_all(msg.as_bytes())
            .map_err(|e| MediaError::Player(format!("write failed: {e}")))?;

        let mut reader = BufReader::new(stream);
        let mut response = String::new();
        reader
            .read_line(&mut response)
            .map_err(|e| MediaError::Player(format!("read failed: {e}")))?;

        serde_json::from_str(&response)
            .map_err(|e| MediaError::Player(format!("parse failed: {e}")))
    }

    /// Current source position in seconds, when a source is loaded.
    pub fn position(&self) -> Result<f64> {
        let resp = self.send_command(json!({ "command": ["get_property", "time-pos"] }))?;
        resp.get("data")
            .and_then(|d| d.as_f64())
            .ok_or_else(|| MediaError::Player("no position data".into()))
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

impl Default for MpvPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for MpvPlayer {
    fn set_source(&mut self, url: &str) -> Result<()> {
        self.send_command(json!({ "command": ["loadfile", url] }))?;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.send_command(json!({ "command": ["set_property", "pause", false] }))?;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.send_command(json!({ "command": ["set_property", "pause", true] }))?;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.send_command(json!({ "command": ["seek", seconds, "absolute"] }))?;
        Ok(())
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

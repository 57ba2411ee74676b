//! IPC Server
//!
//! Unix socket server feeding a running avatar session. Handlers only touch
//! the session's input cells and status cell, never the frame loop itself.

use anyhow::Result;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{IpcRequest, IpcResponse, MAX_MESSAGE_BYTES};
use crate::commands::CommandProcessor;
use crate::frame_loop::SessionStatus;
use crate::landmarks::{DetectorFrame, LandmarkSet};
use crate::shared::{LatestCell, SessionInputs};

/// IPC Server for the daemon
pub struct IpcServer {
    path: PathBuf,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// State shared by all client handlers
struct Handler {
    inputs: SessionInputs,
    status: LatestCell<SessionStatus>,
    commands: CommandProcessor,
}

impl IpcServer {
    /// Create a server bound to `path` once started
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start accepting producers for one session
    pub fn start(
        &mut self,
        inputs: SessionInputs,
        status: LatestCell<SessionStatus>,
        commands: CommandProcessor,
    ) -> Result<()> {
        let path = self.path.clone();

        // Clean up stale socket
        if path.exists() {
            let _ = fs::remove_file(&path);
        }

        let listener = UnixListener::bind(&path)?;

        // Set strict permissions (user only: RW-------)
        if let Ok(metadata) = fs::metadata(&path) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            if let Err(e) = fs::set_permissions(&path, perms) {
                warn!("⚠️ Failed to set strict IPC socket permissions: {}", e);
            } else {
                debug!("🔒 IPC socket permissions set to 0600");
            }
        }

        listener.set_nonblocking(true)?;

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let handler = Arc::new(Handler {
            inputs,
            status,
            commands,
        });

        info!("🔌 IPC server listening on {:?}", path);

        let handle = thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let handler = handler.clone();
                        thread::spawn(move || {
                            if let Err(e) = handle_client(stream, &handler) {
                                warn!("IPC client error: {}", e);
                            }
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(20));
                    }
                    Err(e) => {
                        warn!("IPC accept error: {}", e);
                    }
                }
            }

            // Cleanup
            let _ = fs::remove_file(&path);
            info!("🔌 IPC server stopped");
        });

        self.thread_handle = Some(handle);
        Ok(())
    }

    /// Stop the server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Serve one connection until the peer hangs up
fn handle_client(stream: UnixStream, handler: &Handler) -> Result<()> {
    stream.set_nonblocking(false)?;
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);

    loop {
        // DoS Protection: Message size limit
        let mut line = String::new();
        let read = reader
            .by_ref()
            .take(MAX_MESSAGE_BYTES + 1)
            .read_line(&mut line)?;

        if read == 0 {
            return Ok(());
        }

        if read as u64 > MAX_MESSAGE_BYTES {
            warn!("⚠️ IPC message exceeds {} bytes, closing", MAX_MESSAGE_BYTES);
            send(&mut writer, &IpcResponse::ack(0, false, "message too large"))?;
            return Ok(());
        }

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<IpcRequest>(line.trim()) {
            Ok(request) => handler.handle(request),
            Err(e) => {
                warn!("Malformed IPC request: {}", e);
                IpcResponse::ack(0, false, format!("malformed request: {}", e))
            }
        };
        send(&mut writer, &response)?;
    }
}

fn send(writer: &mut UnixStream, response: &IpcResponse) -> Result<()> {
    let response_json = serde_json::to_string(response)? + "\n";
    writer.write_all(response_json.as_bytes())?;
    Ok(())
}

impl Handler {
    fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Landmarks { seq_id, landmarks } => {
                // Stored as received; the frame loop treats bad frames as no hand.
                let valid = LandmarkSet::new(&landmarks);
                let frame = DetectorFrame::Hand { landmarks };
                match (self.inputs.detector.publish(frame), valid) {
                    (Err(e), _) => IpcResponse::ack(seq_id, false, e.to_string()),
                    (Ok(()), Err(e)) => IpcResponse::ack(seq_id, false, e.to_string()),
                    (Ok(()), Ok(_)) => IpcResponse::ack(seq_id, true, "hand"),
                }
            }
            IpcRequest::NoHand { seq_id } => match self.inputs.detector.publish(DetectorFrame::NoHand)
            {
                Ok(()) => IpcResponse::ack(seq_id, true, "no hand"),
                Err(e) => IpcResponse::ack(seq_id, false, e.to_string()),
            },
            IpcRequest::Voice { seq_id, text } => {
                debug!("📝 Heard: '{}'", text);
                match self.commands.process(&text) {
                    Some(command) => match self.inputs.voice.publish(command) {
                        Ok(()) => IpcResponse::ack(seq_id, true, command.as_str()),
                        Err(e) => IpcResponse::ack(seq_id, false, e.to_string()),
                    },
                    None => IpcResponse::ack(seq_id, false, format!("unknown command: {}", text)),
                }
            }
            IpcRequest::ClipLoaded { seq_id, clip } => {
                info!("📡 IPC clip: {} ({:.2}s)", clip.name, clip.duration);
                let name = clip.name.clone();
                match self.inputs.clips.publish(clip) {
                    Ok(()) => IpcResponse::ack(seq_id, true, name),
                    Err(e) => IpcResponse::ack(seq_id, false, e.to_string()),
                }
            }
            IpcRequest::StatusRequest { seq_id } => match self.status.latest() {
                Ok(status) => IpcResponse::status(seq_id, status),
                Err(e) => IpcResponse::ack(seq_id, false, e.to_string()),
            },
        }
    }
}

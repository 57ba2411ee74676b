//! IPC Client
//!
//! Unix socket client for producers feeding the daemon.

use anyhow::{bail, Result};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::{IpcRequest, IpcResponse};
use crate::animation::AnimationClip;
use crate::frame_loop::SessionStatus;
use crate::landmarks::Landmark;

static NEXT_SEQ_ID: AtomicU64 = AtomicU64::new(1);

fn next_seq_id() -> u64 {
    NEXT_SEQ_ID.fetch_add(1, Ordering::SeqCst)
}

/// Outcome of an acknowledged request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub success: bool,
    pub message: Option<String>,
}

/// IPC Client holding one connection
pub struct IpcClient {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
}

impl IpcClient {
    /// Check if the daemon is listening on `path`
    pub fn is_daemon_running(path: &Path) -> bool {
        if !path.exists() {
            return false;
        }

        UnixStream::connect(path).is_ok()
    }

    pub fn connect(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let stream = UnixStream::connect(&path)?;
        stream.set_read_timeout(Some(Duration::from_secs(5)))?;
        stream.set_write_timeout(Some(Duration::from_secs(5)))?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// Send one request and wait for its response
    pub fn request(&mut self, request: &IpcRequest) -> Result<IpcResponse> {
        let request_json = serde_json::to_string(request)? + "\n";
        self.writer.write_all(request_json.as_bytes())?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            bail!("daemon closed the connection");
        }

        let response: IpcResponse = serde_json::from_str(line.trim())?;
        debug!("📨 IPC response: {:?}", response);
        Ok(response)
    }

    fn expect_ack(&mut self, request: IpcRequest) -> Result<Ack> {
        let seq_id = request.seq_id();
        match self.request(&request)? {
            IpcResponse::Ack {
                seq_id: resp_seq,
                success,
                message,
            } => {
                if resp_seq != seq_id {
                    warn!(
                        "⚠️ IPC sequence ID mismatch: expected {}, got {}",
                        seq_id, resp_seq
                    );
                    return Ok(Ack {
                        success: false,
                        message,
                    });
                }
                Ok(Ack { success, message })
            }
            other => bail!("unexpected IPC response: {:?}", other),
        }
    }

    pub fn send_landmarks(&mut self, landmarks: Vec<Landmark>) -> Result<Ack> {
        self.expect_ack(IpcRequest::Landmarks {
            seq_id: next_seq_id(),
            landmarks,
        })
    }

    pub fn send_no_hand(&mut self) -> Result<Ack> {
        self.expect_ack(IpcRequest::NoHand {
            seq_id: next_seq_id(),
        })
    }

    pub fn send_voice(&mut self, text: &str) -> Result<Ack> {
        self.expect_ack(IpcRequest::Voice {
            seq_id: next_seq_id(),
            text: text.to_string(),
        })
    }

    pub fn send_clip(&mut self, clip: AnimationClip) -> Result<Ack> {
        self.expect_ack(IpcRequest::ClipLoaded {
            seq_id: next_seq_id(),
            clip,
        })
    }

    /// Request session status. `None` until the first frame has run.
    pub fn get_status(&mut self) -> Result<Option<SessionStatus>> {
        let seq_id = next_seq_id();
        match self.request(&IpcRequest::StatusRequest { seq_id })? {
            IpcResponse::StatusResponse {
                seq_id: resp_seq,
                hand_detected,
                gesture,
                animation,
                transform,
            } => {
                if resp_seq != seq_id {
                    warn!("⚠️ IPC sequence ID mismatch");
                    return Ok(None);
                }
                Ok(transform.map(|transform| SessionStatus {
                    hand_detected,
                    gesture,
                    animation,
                    transform,
                }))
            }
            IpcResponse::Ack { message, .. } => {
                bail!("status request refused: {}", message.unwrap_or_default())
            }
        }
    }
}

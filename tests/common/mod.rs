pub mod mock_assets;
pub mod mock_sink;

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use std::{fs, thread};
use tempfile::TempDir;

use handpuppet::landmarks::{Landmark, LANDMARK_COUNT};

/// Finger tips and joints in detector space. Tips above their joint
/// (smaller y) read as extended.
const TIPS: [usize; 4] = [8, 12, 16, 20];
const JOINTS: [usize; 4] = [6, 10, 14, 18];
const THUMB_TIP: usize = 4;
const PALM_BASE: usize = 9;

/// Build a 21-point frame. `fingers` is (thumb, index, middle, ring, pinky).
pub fn hand_frame(fingers: [bool; 5], wrist: (f32, f32, f32)) -> Vec<Landmark> {
    let mut points = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    points[0] = Landmark::new(wrist.0, wrist.1, wrist.2);
    points[PALM_BASE] = Landmark::new(0.5, 0.5, 0.0);
    points[THUMB_TIP] = if fingers[0] {
        Landmark::new(0.7, 0.5, 0.0)
    } else {
        Landmark::new(0.52, 0.5, 0.0)
    };
    for (i, extended) in fingers[1..].iter().enumerate() {
        points[JOINTS[i]] = Landmark::new(0.5, 0.5, 0.0);
        points[TIPS[i]] = if *extended {
            Landmark::new(0.5, 0.3, 0.0)
        } else {
            Landmark::new(0.5, 0.55, 0.0)
        };
    }
    points
}

pub fn peace() -> Vec<Landmark> {
    hand_frame([false, true, true, false, false], (0.5, 0.5, 0.0))
}

pub fn fist() -> Vec<Landmark> {
    hand_frame([false; 5], (0.5, 0.5, 0.0))
}

pub fn thumbsup() -> Vec<Landmark> {
    hand_frame([true, false, false, false, false], (0.5, 0.5, 0.0))
}

pub fn open() -> Vec<Landmark> {
    hand_frame([true; 5], (0.5, 0.5, 0.0))
}

/// A daemon process on a private socket
pub struct DaemonContext {
    pub temp_dir: TempDir,
    pub child: Child,
    pub socket_path: PathBuf,
}

impl DaemonContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let bin_path = env!("CARGO_BIN_EXE_handpuppet");

        // Isolate config and clip lookup inside temp_dir
        let config_dir = temp_dir.path().join("config");
        let data_dir = temp_dir.path().join("data");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        let socket_path = temp_dir.path().join("handpuppet.sock");

        let child = Command::new(bin_path)
            .arg("--config")
            .arg(config_dir.join("config.json"))
            .arg("--socket")
            .arg(&socket_path)
            .env("XDG_CONFIG_HOME", &config_dir)
            .env("XDG_DATA_HOME", &data_dir)
            .env_remove("RUST_LOG")
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .expect("Failed to spawn handpuppet daemon");

        let ctx = DaemonContext {
            temp_dir,
            child,
            socket_path,
        };

        ctx.wait_for_socket();
        ctx
    }

    fn wait_for_socket(&self) {
        let start = std::time::Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            if self.socket_path.exists() {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }
        panic!("Timed out waiting for socket at {:?}", self.socket_path);
    }
}

impl Drop for DaemonContext {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

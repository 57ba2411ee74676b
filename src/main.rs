//! HandPuppet - gesture and voice driven avatar animation
//!
//! Daemon: runs one avatar session at the configured frame rate and accepts
//! detector frames, voice text and clips over the IPC socket.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use handpuppet::assets::{spawn_clip_loading, JsonClipSource};
use handpuppet::commands::CommandProcessor;
use handpuppet::config::Config;
use handpuppet::frame_loop::{FrameClock, FrameLoop, TracingSink};
use handpuppet::ipc::IpcServer;
use handpuppet::shared::SessionInputs;
use handpuppet::skeleton::SkeletonMap;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Override the IPC socket path
    #[arg(long)]
    socket: Option<PathBuf>,

    /// JSON array of the avatar's bone names
    #[arg(long)]
    bones: Option<PathBuf>,
}

fn load_skeleton(path: Option<&PathBuf>) -> Result<SkeletonMap> {
    let Some(path) = path else {
        return Ok(SkeletonMap::empty());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading bone list {}", path.display()))?;
    let names: Vec<String> = serde_json::from_str(&content)?;
    Ok(SkeletonMap::from_bone_names(&names))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(fps) = args.fps {
        config.frame_rate = fps;
    }
    if let Some(socket) = &args.socket {
        config.socket_path = socket.to_string_lossy().to_string();
    }

    // Setup logging
    let default_level = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .init();

    info!("🖐️ HandPuppet v{} starting...", env!("CARGO_PKG_VERSION"));

    let skeleton = load_skeleton(args.bones.as_ref())?;
    if skeleton.has_arms() {
        info!("🦴 Arm bones found ({} bones)", skeleton.bone_count());
    } else {
        info!("🦴 No arm bones, waving moves the whole body");
    }

    let inputs = SessionInputs::new();
    let mut frame_loop = FrameLoop::new(&config, skeleton, inputs.clone());

    let mut server = IpcServer::new(config.socket_path());
    server.start(inputs.clone(), frame_loop.status(), CommandProcessor::new())?;

    // Clips arrive whenever they arrive; procedural fallback until then
    let _loaders = spawn_clip_loading(
        Arc::new(JsonClipSource::new(&config.clip_dir)),
        inputs.clips.clone(),
    );

    let mut clock = FrameClock::new();
    let mut sink = TracingSink;
    let mut interval = tokio::time::interval(config.frame_period());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("✅ HandPuppet ready at {} fps", config.frame_rate);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                frame_loop.tick(clock.tick(), &mut sink);
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Signal handler failed: {}", e);
                }
                break;
            }
        }
    }

    info!("👋 Shutting down");
    server.stop();
    Ok(())
}

//! HandPuppet Feed - send input to a running daemon
//!
//! Run with: cargo run --bin handpuppet-feed -- voice dance

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use handpuppet::animation::AnimationClip;
use handpuppet::config::Config;
use handpuppet::ipc::client::Ack;
use handpuppet::ipc::IpcClient;
use handpuppet::landmarks::Landmark;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Daemon socket (defaults to the configured path)
    #[arg(long)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send recognized speech
    Voice { text: Vec<String> },
    /// Report that the detector sees no hand
    NoHand,
    /// Send a landmark frame from a JSON file
    Landmarks { file: PathBuf },
    /// Hand over a clip manifest from a JSON file
    Clip { file: PathBuf },
    /// Print the session status
    Status,
}

fn report(ack: Ack) -> Result<()> {
    let message = ack.message.unwrap_or_default();
    if ack.success {
        println!("ok: {}", message);
        Ok(())
    } else {
        bail!("rejected: {}", message)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let args = Args::parse();
    let path = match args.socket {
        Some(path) => path,
        None => Config::load()?.socket_path(),
    };

    if !IpcClient::is_daemon_running(&path) {
        bail!("no daemon listening on {}", path.display());
    }
    let mut client = IpcClient::connect(&path)?;

    match args.command {
        Command::Voice { text } => report(client.send_voice(&text.join(" "))?),
        Command::NoHand => report(client.send_no_hand()?),
        Command::Landmarks { file } => {
            let landmarks: Vec<Landmark> = serde_json::from_str(&std::fs::read_to_string(file)?)?;
            report(client.send_landmarks(landmarks)?)
        }
        Command::Clip { file } => {
            let clip: AnimationClip = serde_json::from_str(&std::fs::read_to_string(file)?)?;
            report(client.send_clip(clip)?)
        }
        Command::Status => {
            match client.get_status()? {
                Some(status) => println!("{}", serde_json::to_string_pretty(&status)?),
                None => println!("no frame rendered yet"),
            }
            Ok(())
        }
    }
}

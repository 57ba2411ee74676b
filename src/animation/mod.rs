//! Animation Module
//!
//! Two action families share one controller:
//! - clip: asset-backed clips that arrive asynchronously
//! - procedural: parametric fallbacks that always exist

pub mod clip;
pub mod controller;
pub mod procedural;

pub use clip::{AnimationClip, ClipAction, LoopMode};
pub use controller::AnimationController;
pub use procedural::{Overlay, ProceduralMotion};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset clips with a procedural equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipKind {
    StandingJump,
    HipHopDance,
}

impl ClipKind {
    pub const ALL: [ClipKind; 2] = [ClipKind::StandingJump, ClipKind::HipHopDance];

    /// Clip name as published by the asset loader.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StandingJump => "standingJump",
            Self::HipHopDance => "hipHopDance",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// What the controller is currently playing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum AnimationKind {
    Idle,
    Wave,
    Jump,
    Spin,
    Dance,
    Custom(String),
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Wave => f.write_str("wave"),
            Self::Jump => f.write_str("jump"),
            Self::Spin => f.write_str("spin"),
            Self::Dance => f.write_str("dance"),
            Self::Custom(name) => write!(f, "clip:{}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    Asset,
    Procedural,
}

/// Snapshot of one registered action
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationAction {
    pub name: String,
    pub source: ActionSource,
    pub is_looping: bool,
    pub clamp_at_end: bool,
    pub is_running: bool,
}

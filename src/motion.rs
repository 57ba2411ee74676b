//! Target pose computation
//!
//! Maps hand displacement directly onto the avatar transform. The result is
//! deliberately unsmoothed; see `smoothing` for convergence.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Rest height of the avatar when no hand is visible.
pub const DEFAULT_Y: f32 = -2.0;

/// Avatar transform. `rotation_z` is never smoothed and is written only by
/// overlays (idle float, wave, dance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation_y: f32,
    pub rotation_x: f32,
    pub rotation_z: f32,
    pub scale: f32,
}

impl Pose {
    /// Resting pose at the given height and scale.
    pub fn rest(rest_height: f32, base_scale: f32) -> Self {
        Self {
            position: Vec3::new(0.0, rest_height, 0.0),
            rotation_y: 0.0,
            rotation_x: 0.0,
            rotation_z: 0.0,
            scale: base_scale,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::rest(DEFAULT_Y, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTargetComputer {
    pub rest_height: f32,
}

impl Default for MotionTargetComputer {
    fn default() -> Self {
        Self {
            rest_height: DEFAULT_Y,
        }
    }
}

impl MotionTargetComputer {
    pub fn new(rest_height: f32) -> Self {
        Self { rest_height }
    }

    /// Target pose for this frame. `hand` is the scene-space hand position,
    /// `None` when no hand is detected.
    pub fn compute_target(&self, hand: Option<Vec3>, elapsed: f32, base_scale: f32) -> Pose {
        match hand {
            Some(h) => Pose {
                position: Vec3::new(h.x, h.y, h.z * 0.5),
                rotation_y: -h.x * 0.3,
                rotation_x: h.y * 0.2,
                rotation_z: 0.0,
                scale: base_scale * (1.0 + h.z * 0.1),
            },
            None => Pose {
                position: Vec3::new(0.0, self.rest_height, 0.0),
                // idle sway
                rotation_y: (elapsed * 0.5).sin() * 0.1,
                rotation_x: 0.0,
                rotation_z: 0.0,
                scale: base_scale,
            },
        }
    }
}

//! Per-frame exponential smoothing of the avatar toward its target.

use serde::{Deserialize, Serialize};

use crate::motion::Pose;

pub const SMOOTHING_FACTOR: f32 = 0.15;

/// How the smoothing factor relates to frame time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Factor applied once per rendered frame; convergence speed follows frame rate.
    #[default]
    PerFrame,
    /// Factor defined at `reference_fps` and rescaled by the actual frame delta.
    TimeNormalized { reference_fps: f32 },
}

/// One step of first-order convergence: `current + (target - current) * factor`.
/// Position, rotation_y, rotation_x and scale are smoothed; rotation_z is kept.
pub fn integrate(current: &Pose, target: &Pose, factor: f32) -> Pose {
    let step = |c: f32, t: f32| c + (t - c) * factor;
    Pose {
        position: current.position + (target.position - current.position) * factor,
        rotation_y: step(current.rotation_y, target.rotation_y),
        rotation_x: step(current.rotation_x, target.rotation_x),
        rotation_z: current.rotation_z,
        scale: step(current.scale, target.scale),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingIntegrator {
    pub factor: f32,
    pub mode: SmoothingMode,
}

impl Default for SmoothingIntegrator {
    fn default() -> Self {
        Self {
            factor: SMOOTHING_FACTOR,
            mode: SmoothingMode::PerFrame,
        }
    }
}

impl SmoothingIntegrator {
    pub fn new(factor: f32, mode: SmoothingMode) -> Self {
        Self { factor, mode }
    }

    /// Factor to apply for a frame lasting `delta` seconds.
    pub fn effective_factor(&self, delta: f32) -> f32 {
        match self.mode {
            SmoothingMode::PerFrame => self.factor,
            SmoothingMode::TimeNormalized { reference_fps } => {
                let frames = (delta * reference_fps).max(0.0);
                1.0 - (1.0 - self.factor).powf(frames)
            }
        }
    }

    pub fn integrate(&self, current: &Pose, target: &Pose, delta: f32) -> Pose {
        integrate(current, target, self.effective_factor(delta))
    }
}

/// Breathing float layered on after smoothing while idle and not waving.
/// With a hand present (and not waving) the roll is cleared.
pub fn apply_idle_overlay(pose: &mut Pose, elapsed: f32, hand_detected: bool, waving: bool) {
    if waving {
        return;
    }
    if hand_detected {
        pose.rotation_z = 0.0;
    } else {
        pose.position.y += (elapsed * 1.5).sin() * 0.03;
        pose.rotation_z = elapsed.sin() * 0.02;
    }
}

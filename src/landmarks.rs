//! Hand landmark data
//!
//! A detected hand arrives as 21 keypoints in normalized detector
//! coordinates (x, y in [0, 1], z relative depth). Only one hand is tracked.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::HandSpace;
use crate::error::{PuppetError, PuppetResult};

/// Number of landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// Palm base used as the thumb reference.
pub const PALM_BASE: usize = MIDDLE_MCP;

/// A single tracked keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Validated set of 21 landmarks for one hand.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Validate raw detector output.
    pub fn new(points: &[Landmark]) -> PuppetResult<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            PuppetError::Landmarks(format!(
                "expected {} landmarks, got {}",
                LANDMARK_COUNT,
                points.len()
            ))
        })?;

        if let Some(idx) = points.iter().position(|p| !p.is_finite()) {
            return Err(PuppetError::Landmarks(format!(
                "landmark {} has a non-finite coordinate",
                idx
            )));
        }

        Ok(Self { points })
    }

    pub fn get(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }

    /// Map the wrist into scene space (x right, y up, z depth).
    pub fn hand_position(&self, space: &HandSpace) -> Vec3 {
        let wrist = self.wrist();
        Vec3::new(
            (wrist.x - 0.5) * space.x_scale,
            (0.5 - wrist.y) * space.y_scale,
            wrist.z * space.z_scale,
        )
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = PuppetError;

    fn try_from(points: Vec<Landmark>) -> PuppetResult<Self> {
        Self::new(&points)
    }
}

/// Raw message from the pose detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorFrame {
    Hand { landmarks: Vec<Landmark> },
    NoHand,
}

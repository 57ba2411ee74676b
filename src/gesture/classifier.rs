//! Gesture classification from a single landmark frame.

use super::GestureLabel;
use crate::landmarks::{
    LandmarkSet, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PALM_BASE, PINKY_PIP, PINKY_TIP,
    RING_PIP, RING_TIP, THUMB_TIP,
};

/// Default vertical margin a fingertip must clear above its proximal joint.
pub const EXTENSION_MARGIN: f32 = 0.05;

/// Default lateral thumb-to-palm distance for an extended thumb.
pub const THUMB_THRESHOLD: f32 = 0.08;

/// Per-digit extension flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub fn extended_count(&self) -> usize {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|e| **e)
            .count()
    }

    /// Map extension flags to a label. First matching rule wins.
    pub fn label(&self) -> GestureLabel {
        let count = self.extended_count();

        if self.index && self.middle && !self.ring && !self.pinky && !self.thumb {
            GestureLabel::Peace
        } else if self.thumb && !self.index && !self.middle && !self.ring && !self.pinky {
            GestureLabel::Thumbsup
        } else if count <= 1 {
            GestureLabel::Fist
        } else if count >= 4 {
            GestureLabel::Open
        } else {
            GestureLabel::Neutral
        }
    }
}

/// Stateless classifier with configurable noise margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureClassifier {
    pub extension_margin: f32,
    pub thumb_threshold: f32,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self {
            extension_margin: EXTENSION_MARGIN,
            thumb_threshold: THUMB_THRESHOLD,
        }
    }
}

impl GestureClassifier {
    pub fn new(extension_margin: f32, thumb_threshold: f32) -> Self {
        Self {
            extension_margin,
            thumb_threshold,
        }
    }

    pub fn finger_states(&self, landmarks: &LandmarkSet) -> FingerStates {
        // Detector y grows downward, so an extended fingertip sits above its joint
        let extended = |tip: usize, pip: usize| {
            landmarks.get(tip).y < landmarks.get(pip).y - self.extension_margin
        };

        FingerStates {
            thumb: (landmarks.get(THUMB_TIP).x - landmarks.get(PALM_BASE).x).abs()
                > self.thumb_threshold,
            index: extended(INDEX_TIP, INDEX_PIP),
            middle: extended(MIDDLE_TIP, MIDDLE_PIP),
            ring: extended(RING_TIP, RING_PIP),
            pinky: extended(PINKY_TIP, PINKY_PIP),
        }
    }

    pub fn classify(&self, landmarks: &LandmarkSet) -> GestureLabel {
        self.finger_states(landmarks).label()
    }
}

/// Classify with the default margins.
pub fn classify(landmarks: &LandmarkSet) -> GestureLabel {
    GestureClassifier::default().classify(landmarks)
}

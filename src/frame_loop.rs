//! Frame Loop
//!
//! One avatar session: owns the current pose, gesture hold state and the
//! animation controller, and advances them once per render tick. This is
//! the only place that knows about wall-clock time.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

use crate::animation::controller::Trigger;
use crate::animation::{AnimationController, AnimationKind};
use crate::config::{Config, HandSpace};
use crate::gesture::{GestureClassifier, GestureHoldStateMachine, GestureLabel, HoldState};
use crate::landmarks::{DetectorFrame, LandmarkSet};
use crate::motion::{MotionTargetComputer, Pose};
use crate::shared::{LatestCell, SessionInputs};
use crate::skeleton::SkeletonMap;
use crate::smoothing::{apply_idle_overlay, SmoothingIntegrator};

/// Timing of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Time since the session started
    pub elapsed: Duration,
    /// Time since the previous tick
    pub delta: Duration,
}

impl FrameTime {
    pub fn from_secs(elapsed: f64, delta: f64) -> Self {
        Self {
            elapsed: Duration::from_secs_f64(elapsed.max(0.0)),
            delta: Duration::from_secs_f64(delta.max(0.0)),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// Monotonic source of `FrameTime`
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let time = FrameTime {
            elapsed: now - self.start,
            delta: now - self.last,
        };
        self.last = now;
        time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneRotation {
    pub bone: usize,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipPlayback {
    pub name: String,
    pub time: f32,
}

/// Everything the renderer applies for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarTransform {
    pub position: Vec3,
    /// Euler rotation (x, y, z)
    pub rotation: Vec3,
    pub scale: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bones: Vec<BoneRotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipPlayback>,
}

impl AvatarTransform {
    fn from_pose(pose: &Pose) -> Self {
        Self {
            position: pose.position,
            rotation: Vec3::new(pose.rotation_x, pose.rotation_y, pose.rotation_z),
            scale: pose.scale,
            bones: Vec::new(),
            clip: None,
        }
    }
}

/// Rendering collaborator
pub trait TransformSink {
    fn present(&mut self, transform: &AvatarTransform);
}

/// Sink that only logs transforms
#[derive(Debug, Default)]
pub struct TracingSink;

impl TransformSink for TracingSink {
    fn present(&mut self, transform: &AvatarTransform) {
        trace!(
            "🖼️ pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) scale={:.2}",
            transform.position.x,
            transform.position.y,
            transform.position.z,
            transform.rotation.x,
            transform.rotation.y,
            transform.rotation.z,
            transform.scale
        );
    }
}

/// Snapshot published after every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub hand_detected: bool,
    pub gesture: GestureLabel,
    pub animation: AnimationKind,
    pub transform: AvatarTransform,
}

pub struct FrameLoop {
    inputs: SessionInputs,
    status: LatestCell<SessionStatus>,
    classifier: GestureClassifier,
    hold: GestureHoldStateMachine,
    motion: MotionTargetComputer,
    smoothing: SmoothingIntegrator,
    controller: AnimationController,
    hand_space: HandSpace,
    base_scale: f32,
    dropout_grace: u32,
    missed_frames: u32,
    pose: Pose,
    target: Pose,
    gesture: GestureLabel,
    hand_detected: bool,
}

impl FrameLoop {
    /// Create a session for a freshly loaded model.
    pub fn new(config: &Config, skeleton: SkeletonMap, inputs: SessionInputs) -> Self {
        let pose = Pose::rest(config.rest_height, config.base_scale);
        Self {
            inputs,
            status: LatestCell::new(),
            classifier: GestureClassifier::new(config.extension_margin, config.thumb_threshold),
            hold: GestureHoldStateMachine::new(config.hold_threshold()),
            motion: MotionTargetComputer::new(config.rest_height),
            smoothing: SmoothingIntegrator::new(config.smoothing_factor, config.smoothing_mode),
            controller: AnimationController::new(skeleton),
            hand_space: config.hand_space,
            base_scale: config.base_scale,
            dropout_grace: config.dropout_grace_frames,
            missed_frames: 0,
            pose,
            target: pose,
            gesture: GestureLabel::None,
            hand_detected: false,
        }
    }

    pub fn inputs(&self) -> &SessionInputs {
        &self.inputs
    }

    /// Status cell for readers outside the loop
    pub fn status(&self) -> LatestCell<SessionStatus> {
        self.status.clone()
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn target(&self) -> &Pose {
        &self.target
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn hold_state(&self) -> &HoldState {
        self.hold.state()
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn gesture(&self) -> GestureLabel {
        self.gesture
    }

    pub fn hand_detected(&self) -> bool {
        self.hand_detected
    }

    /// Run one frame and hand the result to `sink`. Never fails: bad input
    /// for a frame is logged and skipped.
    pub fn tick<S: TransformSink + ?Sized>(
        &mut self,
        time: FrameTime,
        sink: &mut S,
    ) -> AvatarTransform {
        let elapsed = time.elapsed_secs();
        let delta = time.delta_secs();

        self.receive_clips();
        self.receive_voice(elapsed);

        // (a) mixer
        self.controller.advance(delta);

        // (b) gestures and target
        match self.current_hand() {
            Some(landmarks) => {
                self.hand_detected = true;
                self.missed_frames = 0;

                let hand = landmarks.hand_position(&self.hand_space);
                self.target = self
                    .motion
                    .compute_target(Some(hand), elapsed, self.base_scale);

                self.gesture = self.classifier.classify(&landmarks);
                if let Some(event) = self.hold.update(self.gesture, time.elapsed) {
                    if let Some(action) = event.label.action() {
                        info!("🤚 {} held {:?} → {:?}", event.label, event.held_for, action);
                        self.controller
                            .trigger(Trigger::from(action), elapsed, &mut self.pose);
                    }
                }
            }
            None => {
                self.hand_detected = false;
                self.gesture = GestureLabel::None;
                self.missed_frames = self.missed_frames.saturating_add(1);
                if self.missed_frames > self.dropout_grace {
                    self.hold.reset();
                }
                self.target = self.motion.compute_target(None, elapsed, self.base_scale);
            }
        }

        // (c) smoothing
        self.pose = self.smoothing.integrate(&self.pose, &self.target, delta);

        // (d) overlays
        apply_idle_overlay(
            &mut self.pose,
            elapsed,
            self.hand_detected,
            self.controller.is_waving(),
        );
        let overlay = self.controller.sample(elapsed, &self.target);
        overlay.apply(&mut self.pose);

        // (e) hand off
        let mut transform = AvatarTransform::from_pose(&self.pose);
        transform.bones = overlay
            .bones
            .iter()
            .map(|(bone, rotation)| BoneRotation {
                bone: bone.0,
                rotation: *rotation,
            })
            .collect();
        transform.clip = self
            .controller
            .active_clip()
            .map(|(name, time)| ClipPlayback {
                name: name.to_string(),
                time,
            });

        sink.present(&transform);
        self.publish_status(&transform);
        transform
    }

    fn receive_clips(&mut self) {
        match self.inputs.clips.drain() {
            Ok(clips) => {
                for clip in clips {
                    self.controller.on_clip_loaded(clip);
                }
            }
            Err(e) => warn!("Clip inbox unavailable: {}", e),
        }
    }

    fn receive_voice(&mut self, elapsed: f32) {
        match self.inputs.voice.take() {
            Ok(Some(command)) => {
                info!("🎙️ Voice command: {}", command);
                self.controller
                    .trigger(command.trigger(), elapsed, &mut self.pose);
            }
            Ok(None) => {}
            Err(e) => warn!("Voice input unavailable: {}", e),
        }
    }

    /// Latest detector frame, validated. Malformed data counts as no hand.
    fn current_hand(&self) -> Option<LandmarkSet> {
        let frame = match self.inputs.detector.latest() {
            Ok(frame) => frame?,
            Err(e) => {
                warn!("Detector input unavailable: {}", e);
                return None;
            }
        };

        match frame {
            DetectorFrame::Hand { landmarks } => match LandmarkSet::try_from(landmarks) {
                Ok(set) => Some(set),
                Err(e) => {
                    debug!("Skipping malformed detector frame: {}", e);
                    None
                }
            },
            DetectorFrame::NoHand => None,
        }
    }

    fn publish_status(&self, transform: &AvatarTransform) {
        let status = SessionStatus {
            hand_detected: self.hand_detected,
            gesture: self.gesture,
            animation: self.controller.active(),
            transform: transform.clone(),
        };
        if let Err(e) = self.status.publish(status) {
            warn!("Failed to publish status: {}", e);
        }
    }
}

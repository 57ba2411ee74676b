//! Procedural animations
//!
//! Parametric functions of time since trigger. Each motion carries the
//! values captured at trigger time and knows how to restore them.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::motion::Pose;
use crate::skeleton::{BonePose, BoneRole, SkeletonMap, Side};

pub const WAVE_DURATION: f32 = 2.0;
pub const JUMP_DURATION: f32 = 0.6;
pub const JUMP_HEIGHT: f32 = 3.0;
pub const SPIN_DURATION: f32 = 1.0;
pub const DANCE_DURATION: f32 = 5.0;

/// Partial transform written over the smoothed pose this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub position_y: Option<f32>,
    pub rotation_x: Option<f32>,
    pub rotation_y: Option<f32>,
    pub rotation_z: Option<f32>,
    pub bones: BonePose,
}

impl Overlay {
    pub fn apply(&self, pose: &mut Pose) {
        if let Some(y) = self.position_y {
            pose.position.y = y;
        }
        if let Some(x) = self.rotation_x {
            pose.rotation_x = x;
        }
        if let Some(y) = self.rotation_y {
            pose.rotation_y = y;
        }
        if let Some(z) = self.rotation_z {
            pose.rotation_z = z;
        }
    }

    /// Layer `other` on top; its fields win.
    pub fn merge(&mut self, other: Overlay) {
        self.position_y = other.position_y.or(self.position_y);
        self.rotation_x = other.rotation_x.or(self.rotation_x);
        self.rotation_y = other.rotation_y.or(self.rotation_y);
        self.rotation_z = other.rotation_z.or(self.rotation_z);
        for (bone, rotation) in other.bones.iter() {
            self.bones.set(*bone, *rotation);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position_y.is_none()
            && self.rotation_x.is_none()
            && self.rotation_y.is_none()
            && self.rotation_z.is_none()
            && self.bones.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProceduralMotion {
    Wave {
        duration: f32,
    },
    Jump {
        start_y: f32,
        height: f32,
        duration: f32,
    },
    Spin {
        start_rotation: f32,
        duration: f32,
    },
    Dance {
        duration: f32,
    },
}

impl ProceduralMotion {
    pub fn wave() -> Self {
        Self::Wave {
            duration: WAVE_DURATION,
        }
    }

    pub fn jump(from: &Pose) -> Self {
        Self::Jump {
            start_y: from.position.y,
            height: JUMP_HEIGHT,
            duration: JUMP_DURATION,
        }
    }

    pub fn spin(from: &Pose) -> Self {
        Self::Spin {
            start_rotation: from.rotation_y,
            duration: SPIN_DURATION,
        }
    }

    pub fn dance() -> Self {
        Self::Dance {
            duration: DANCE_DURATION,
        }
    }

    pub fn duration(&self) -> f32 {
        match *self {
            Self::Wave { duration }
            | Self::Jump { duration, .. }
            | Self::Spin { duration, .. }
            | Self::Dance { duration } => duration,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Wave { .. } => "wave",
            Self::Jump { .. } => "jump",
            Self::Spin { .. } => "spin",
            Self::Dance { .. } => "dance",
        }
    }

    /// Overlay at `t` seconds after trigger, `None` once the motion is over.
    pub fn sample(&self, t: f32, skeleton: &SkeletonMap, target: &Pose) -> Option<Overlay> {
        if t >= self.duration() {
            return None;
        }

        let mut overlay = Overlay::default();
        match *self {
            Self::Wave { .. } => wave(t, skeleton, &mut overlay),
            Self::Jump {
                start_y,
                height,
                duration,
            } => {
                let progress = t / duration;
                let y = if progress < 0.5 {
                    start_y + height * progress * 2.0
                } else {
                    start_y + height - height * (progress - 0.5) * 2.0
                };
                overlay.position_y = Some(y);
            }
            Self::Spin {
                start_rotation,
                duration,
            } => {
                overlay.rotation_y = Some(start_rotation + TAU * (t / duration));
            }
            Self::Dance { .. } => dance(t, skeleton, target, &mut overlay),
        }
        Some(overlay)
    }

    /// Values restored when the motion ends or is interrupted.
    pub fn finish(&self, skeleton: &SkeletonMap) -> Overlay {
        let mut overlay = Overlay::default();
        match *self {
            Self::Wave { .. } => {
                zero_bones(
                    skeleton,
                    &[
                        BoneRole::RightUpperArm,
                        BoneRole::RightLowerArm,
                        BoneRole::RightHand,
                    ],
                    &mut overlay.bones,
                );
                overlay.rotation_z = Some(0.0);
                overlay.rotation_x = Some(0.0);
            }
            Self::Jump { start_y, .. } => overlay.position_y = Some(start_y),
            Self::Spin { start_rotation, .. } => overlay.rotation_y = Some(start_rotation),
            Self::Dance { .. } => {
                zero_bones(
                    skeleton,
                    &[
                        BoneRole::RightUpperArm,
                        BoneRole::RightLowerArm,
                        BoneRole::RightHand,
                        BoneRole::LeftUpperArm,
                        BoneRole::LeftLowerArm,
                        BoneRole::LeftHand,
                    ],
                    &mut overlay.bones,
                );
                for side in [Side::Left, Side::Right] {
                    for &leg in skeleton.legs(side) {
                        overlay.bones.set(leg, Vec3::ZERO);
                    }
                }
                overlay.rotation_z = Some(0.0);
            }
        }
        overlay
    }
}

fn zero_bones(skeleton: &SkeletonMap, roles: &[BoneRole], bones: &mut BonePose) {
    for role in roles {
        if let Some(bone) = skeleton.bone(*role) {
            bones.set(bone, Vec3::ZERO);
        }
    }
}

fn wave(t: f32, skeleton: &SkeletonMap, overlay: &mut Overlay) {
    let swing = (t * 8.0).sin();

    if !skeleton.has_arms() {
        // whole-body wave
        overlay.rotation_z = Some(swing * 0.4);
        overlay.rotation_x = Some(swing * 0.2);
        return;
    }

    if let Some(upper) = skeleton.bone(BoneRole::RightUpperArm) {
        overlay
            .bones
            .set(upper, Vec3::new(swing * 0.3, 0.0, -1.5 + swing * 0.8));
    }
    if let Some(lower) = skeleton.bone(BoneRole::RightLowerArm) {
        overlay
            .bones
            .set(lower, Vec3::new(0.0, 0.0, -0.5 + swing * 0.4));
    }
    if let Some(hand) = skeleton.bone(BoneRole::RightHand) {
        overlay
            .bones
            .set(hand, Vec3::new(0.0, 0.0, (t * 10.0).sin() * 0.3));
    }
    overlay.rotation_y = Some((t * 4.0).sin() * 0.1);
}

fn dance(t: f32, skeleton: &SkeletonMap, target: &Pose, overlay: &mut Overlay) {
    // tenths of a second
    let beat = t * 10.0;

    overlay.rotation_y = Some((beat * 0.5).sin() * 0.6);
    overlay.rotation_z = Some((beat * 0.3).sin() * 0.2);
    overlay.position_y = Some(target.position.y + (beat * 0.8).sin().abs() * 0.8);

    let arms = [
        (
            0.0,
            -1.2,
            [
                BoneRole::RightUpperArm,
                BoneRole::RightLowerArm,
                BoneRole::RightHand,
            ],
        ),
        (
            PI,
            1.2,
            [
                BoneRole::LeftUpperArm,
                BoneRole::LeftLowerArm,
                BoneRole::LeftHand,
            ],
        ),
    ];

    for (phase, raise, [upper, lower, hand]) in arms {
        // Forearm and hand only move when the upper arm exists
        let Some(upper) = skeleton.bone(upper) else {
            continue;
        };
        overlay.bones.set(
            upper,
            Vec3::new(
                (beat * 0.4 + phase).sin() * 0.6,
                0.0,
                raise + (beat * 0.6 + phase).sin() * 0.8,
            ),
        );
        if let Some(lower) = skeleton.bone(lower) {
            overlay
                .bones
                .set(lower, Vec3::new(0.0, 0.0, (beat * 0.8 + phase).sin()));
        }
        if let Some(hand) = skeleton.bone(hand) {
            overlay
                .bones
                .set(hand, Vec3::new(0.0, 0.0, (beat + phase).sin() * 0.5));
        }
    }

    for (side, phase) in [(Side::Right, 0.0), (Side::Left, PI)] {
        for &leg in skeleton.legs(side) {
            overlay
                .bones
                .set(leg, Vec3::new((beat * 0.7 + phase).sin() * 0.5, 0.0, 0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::BoneId;

    #[test]
    fn test_jump_profile() {
        let skeleton = SkeletonMap::empty();
        let from = Pose::default();
        let motion = ProceduralMotion::jump(&from);
        let target = Pose::default();

        let y_at = |t: f32| {
            motion
                .sample(t, &skeleton, &target)
                .and_then(|o| o.position_y)
                .unwrap()
        };

        assert!((y_at(0.0) - -2.0).abs() < 1e-5);
        assert!((y_at(0.15) - -0.5).abs() < 1e-4);
        assert!(y_at(0.29) > y_at(0.15));
        assert!((y_at(0.3) - 1.0).abs() < 1e-4);
        assert!(y_at(0.45) < y_at(0.3));
        assert!(motion.sample(0.6, &skeleton, &target).is_none());
        assert_eq!(motion.finish(&skeleton).position_y, Some(-2.0));
    }

    #[test]
    fn test_spin_full_turn() {
        let skeleton = SkeletonMap::empty();
        let mut from = Pose::default();
        from.rotation_y = 0.25;
        let motion = ProceduralMotion::spin(&from);

        let half = motion.sample(0.5, &skeleton, &from).unwrap();
        assert!((half.rotation_y.unwrap() - (0.25 + PI)).abs() < 1e-5);
        assert!(motion.sample(1.0, &skeleton, &from).is_none());
        assert_eq!(motion.finish(&skeleton).rotation_y, Some(0.25));
    }

    #[test]
    fn test_wave_without_bones_moves_body() {
        let skeleton = SkeletonMap::empty();
        let overlay = ProceduralMotion::wave()
            .sample(0.1, &skeleton, &Pose::default())
            .unwrap();
        assert!((overlay.rotation_z.unwrap() - (0.8f32).sin() * 0.4).abs() < 1e-6);
        assert!(overlay.bones.is_empty());
    }

    #[test]
    fn test_wave_with_bones_moves_arm() {
        let skeleton = SkeletonMap::from_bone_names(&["RightArm", "RightForeArm", "RightHand"]);
        let overlay = ProceduralMotion::wave()
            .sample(0.0, &skeleton, &Pose::default())
            .unwrap();
        assert_eq!(overlay.bones.get(BoneId(0)), Some(Vec3::new(0.0, 0.0, -1.5)));
        assert_eq!(overlay.bones.get(BoneId(1)), Some(Vec3::new(0.0, 0.0, -0.5)));
        assert!(overlay.rotation_z.is_none());

        let reset = ProceduralMotion::wave().finish(&skeleton);
        assert_eq!(reset.bones.get(BoneId(2)), Some(Vec3::ZERO));
    }

    #[test]
    fn test_dance_drives_limbs() {
        let skeleton =
            SkeletonMap::from_bone_names(&["LeftArm", "RightArm", "LeftUpLeg", "RightUpLeg"]);
        let target = Pose::default();
        let overlay = ProceduralMotion::dance()
            .sample(1.0, &skeleton, &target)
            .unwrap();

        assert!(overlay.position_y.unwrap() >= target.position.y);
        assert!(overlay.bones.get(BoneId(0)).is_some());
        assert!(overlay.bones.get(BoneId(1)).is_some());
        let left_leg = overlay.bones.get(BoneId(2)).unwrap();
        let right_leg = overlay.bones.get(BoneId(3)).unwrap();
        assert!((left_leg.x + right_leg.x).abs() < 1e-5);

        let reset = ProceduralMotion::dance().finish(&skeleton);
        assert_eq!(reset.bones.iter().count(), 4);
        assert_eq!(reset.rotation_z, Some(0.0));
    }
}

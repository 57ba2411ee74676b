//! Skeleton capabilities
//!
//! Built once when the model loads: maps canonical bone roles to bone
//! handles so procedural animations never scan bone names per frame.

use glam::Vec3;
use std::collections::HashMap;
use tracing::debug;

/// Index of a bone in the model's bone list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub usize);

/// Canonical single-bone roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneRole {
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
}

impl BoneRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RightUpperArm => "rightUpperArm",
            Self::RightLowerArm => "rightLowerArm",
            Self::RightHand => "rightHand",
            Self::LeftUpperArm => "leftUpperArm",
            Self::LeftLowerArm => "leftLowerArm",
            Self::LeftHand => "leftHand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Role lookup table for one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonMap {
    roles: HashMap<BoneRole, BoneId>,
    left_legs: Vec<BoneId>,
    right_legs: Vec<BoneId>,
    bone_count: usize,
}

impl SkeletonMap {
    /// A model without bones (e.g. a static mesh).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Classify bones by name. The first bone matching a single-bone role
    /// claims it; every leg or thigh bone with a side joins that side's list.
    pub fn from_bone_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut map = Self {
            bone_count: names.len(),
            ..Self::default()
        };

        for (idx, name) in names.iter().enumerate() {
            let id = BoneId(idx);
            let lower = name.as_ref().to_lowercase();
            let Some(side) = side_of(&lower) else {
                continue;
            };

            if lower.contains("leg") || lower.contains("thigh") {
                match side {
                    Side::Left => map.left_legs.push(id),
                    Side::Right => map.right_legs.push(id),
                }
                continue;
            }

            if let Some(role) = arm_role(&lower, side) {
                map.roles.entry(role).or_insert(id);
            }
        }

        debug!(
            "🦴 Skeleton: {} bones, {} arm roles, {} leg bones",
            map.bone_count,
            map.roles.len(),
            map.left_legs.len() + map.right_legs.len()
        );
        map
    }

    pub fn bone(&self, role: BoneRole) -> Option<BoneId> {
        self.roles.get(&role).copied()
    }

    pub fn legs(&self, side: Side) -> &[BoneId] {
        match side {
            Side::Left => &self.left_legs,
            Side::Right => &self.right_legs,
        }
    }

    pub fn has_arms(&self) -> bool {
        self.bone(BoneRole::RightUpperArm).is_some() || self.bone(BoneRole::LeftUpperArm).is_some()
    }

    pub fn bone_count(&self) -> usize {
        self.bone_count
    }
}

fn side_of(lower: &str) -> Option<Side> {
    if lower.contains("right") || lower.ends_with("_r") || lower.ends_with(".r") {
        Some(Side::Right)
    } else if lower.contains("left") || lower.ends_with("_l") || lower.ends_with(".l") {
        Some(Side::Left)
    } else {
        None
    }
}

fn arm_role(lower: &str, side: Side) -> Option<BoneRole> {
    let part = if lower.contains("forearm") || lower.contains("lowerarm") {
        0
    } else if lower.contains("arm") {
        1
    } else if lower.contains("hand") && !lower.contains("thumb") && !lower.contains("index") {
        2
    } else {
        return None;
    };

    Some(match (side, part) {
        (Side::Right, 0) => BoneRole::RightLowerArm,
        (Side::Right, 1) => BoneRole::RightUpperArm,
        (Side::Right, _) => BoneRole::RightHand,
        (Side::Left, 0) => BoneRole::LeftLowerArm,
        (Side::Left, 1) => BoneRole::LeftUpperArm,
        (Side::Left, _) => BoneRole::LeftHand,
    })
}

/// Euler rotations written to bones this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BonePose {
    rotations: Vec<(BoneId, Vec3)>,
}

impl BonePose {
    pub fn set(&mut self, bone: BoneId, rotation: Vec3) {
        match self.rotations.iter_mut().find(|(id, _)| *id == bone) {
            Some(entry) => entry.1 = rotation,
            None => self.rotations.push((bone, rotation)),
        }
    }

    pub fn get(&self, bone: BoneId) -> Option<Vec3> {
        self.rotations
            .iter()
            .find(|(id, _)| *id == bone)
            .map(|(_, r)| *r)
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(BoneId, Vec3)> {
        self.rotations.iter()
    }
}

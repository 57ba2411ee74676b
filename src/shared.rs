//! Shared session inputs
//!
//! External producers (detector, recognizer, asset loader) publish into
//! single-slot cells; the frame loop reads them once per tick. A newer value
//! replaces an unread older one: last value wins, nothing is queued.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::animation::{AnimationClip, ClipKind};
use crate::commands::VoiceCommand;
use crate::error::PuppetResult;
use crate::landmarks::DetectorFrame;

/// Single-slot latest-value cell. Cloning shares the slot.
#[derive(Debug)]
pub struct LatestCell<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for LatestCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for LatestCell<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> LatestCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current value.
    pub fn publish(&self, value: T) -> PuppetResult<()> {
        *self.slot.lock()? = Some(value);
        Ok(())
    }

    /// Remove and return the current value.
    pub fn take(&self) -> PuppetResult<Option<T>> {
        Ok(self.slot.lock()?.take())
    }
}

impl<T: Clone> LatestCell<T> {
    /// Copy of the current value, left in place.
    pub fn latest(&self) -> PuppetResult<Option<T>> {
        Ok(self.slot.lock()?.clone())
    }
}

/// One slot per known clip so simultaneous arrivals are both kept.
/// Any other clip gets its own slot keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ClipInbox {
    standing_jump: LatestCell<AnimationClip>,
    hip_hop_dance: LatestCell<AnimationClip>,
    custom: Arc<Mutex<BTreeMap<String, AnimationClip>>>,
}

impl ClipInbox {
    pub fn publish(&self, clip: AnimationClip) -> PuppetResult<()> {
        match ClipKind::from_name(&clip.name) {
            Some(ClipKind::StandingJump) => self.standing_jump.publish(clip),
            Some(ClipKind::HipHopDance) => self.hip_hop_dance.publish(clip),
            None => {
                self.custom.lock()?.insert(clip.name.clone(), clip);
                Ok(())
            }
        }
    }

    /// Everything that arrived since the last drain.
    pub fn drain(&self) -> PuppetResult<Vec<AnimationClip>> {
        let mut clips = Vec::new();
        for cell in [&self.standing_jump, &self.hip_hop_dance] {
            if let Some(clip) = cell.take()? {
                clips.push(clip);
            }
        }
        clips.extend(std::mem::take(&mut *self.custom.lock()?).into_values());
        Ok(clips)
    }
}

/// Producer-facing handles for one avatar session.
#[derive(Debug, Clone, Default)]
pub struct SessionInputs {
    /// Latest detector result; persists until replaced.
    pub detector: LatestCell<DetectorFrame>,
    /// Pending voice command; consumed by the next tick.
    pub voice: LatestCell<VoiceCommand>,
    pub clips: ClipInbox,
}

impl SessionInputs {
    pub fn new() -> Self {
        Self::default()
    }
}

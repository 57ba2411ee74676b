//! Animation Controller
//!
//! Owns every animation action and enforces that at most one runs at a
//! time: each trigger first stops everything, then starts its action.
//! Asset clips are preferred when loaded; otherwise the procedural
//! equivalent plays.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::clip::{AnimationClip, ClipAction, LoopMode};
use super::procedural::{Overlay, ProceduralMotion};
use super::{ActionSource, AnimationAction, AnimationKind, ClipKind};
use crate::error::{PuppetError, PuppetResult};
use crate::gesture::GestureAction;
use crate::motion::Pose;
use crate::skeleton::{BonePose, SkeletonMap};

/// One-shot animation request from a gesture or voice command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Wave,
    Jump,
    Spin,
    Dance,
}

impl From<GestureAction> for Trigger {
    fn from(action: GestureAction) -> Self {
        match action {
            GestureAction::Dance => Trigger::Dance,
            GestureAction::Jump => Trigger::Jump,
            GestureAction::Spin => Trigger::Spin,
        }
    }
}

#[derive(Debug, Clone)]
enum Active {
    Idle,
    Procedural {
        motion: ProceduralMotion,
        started_at: f32,
    },
    Clip {
        name: String,
        kind: AnimationKind,
    },
}

pub struct AnimationController {
    skeleton: SkeletonMap,
    clips: BTreeMap<String, ClipAction>,
    active: Active,
    /// Bone resets from an interrupted motion, emitted with the next sample
    pending_bones: BonePose,
}

impl AnimationController {
    pub fn new(skeleton: SkeletonMap) -> Self {
        Self {
            skeleton,
            clips: BTreeMap::new(),
            active: Active::Idle,
            pending_bones: BonePose::default(),
        }
    }

    pub fn skeleton(&self) -> &SkeletonMap {
        &self.skeleton
    }

    /// Register a clip delivered by the asset loader. The first clip with a
    /// given name wins; running actions are left alone.
    pub fn on_clip_loaded(&mut self, clip: AnimationClip) -> bool {
        if self.clips.contains_key(&clip.name) {
            debug!("Clip '{}' already loaded, ignoring duplicate", clip.name);
            return false;
        }
        info!(
            "🎞️ Clip ready: {} (duration {:.2}s, {} bones)",
            clip.name,
            clip.duration,
            clip.bones.len()
        );
        self.clips
            .insert(clip.name.clone(), ClipAction::one_shot(clip));
        true
    }

    pub fn has_clip(&self, kind: ClipKind) -> bool {
        self.clips.contains_key(kind.name())
    }

    pub fn trigger(&mut self, trigger: Trigger, now: f32, pose: &mut Pose) -> ActionSource {
        match trigger {
            Trigger::Wave => self.trigger_wave(now, pose),
            Trigger::Jump => self.trigger_jump(now, pose),
            Trigger::Spin => self.trigger_spin(now, pose),
            Trigger::Dance => self.trigger_dance(now, pose),
        }
    }

    pub fn trigger_wave(&mut self, now: f32, pose: &mut Pose) -> ActionSource {
        self.stop_all(pose);
        self.start_procedural(ProceduralMotion::wave(), now);
        ActionSource::Procedural
    }

    pub fn trigger_jump(&mut self, now: f32, pose: &mut Pose) -> ActionSource {
        self.stop_all(pose);
        if self.start_clip(ClipKind::StandingJump.name(), AnimationKind::Jump) {
            return ActionSource::Asset;
        }
        self.start_procedural(ProceduralMotion::jump(pose), now);
        ActionSource::Procedural
    }

    pub fn trigger_spin(&mut self, now: f32, pose: &mut Pose) -> ActionSource {
        self.stop_all(pose);
        self.start_procedural(ProceduralMotion::spin(pose), now);
        ActionSource::Procedural
    }

    pub fn trigger_dance(&mut self, now: f32, pose: &mut Pose) -> ActionSource {
        self.stop_all(pose);
        if self.start_clip(ClipKind::HipHopDance.name(), AnimationKind::Dance) {
            return ActionSource::Asset;
        }
        self.start_procedural(ProceduralMotion::dance(), now);
        ActionSource::Procedural
    }

    /// Play any loaded clip by name.
    pub fn play_clip(&mut self, name: &str, pose: &mut Pose) -> PuppetResult<()> {
        if !self.clips.contains_key(name) {
            return Err(PuppetError::Animation(format!("clip '{}' is not loaded", name)));
        }

        self.stop_all(pose);
        let kind = match ClipKind::from_name(name) {
            Some(ClipKind::StandingJump) => AnimationKind::Jump,
            Some(ClipKind::HipHopDance) => AnimationKind::Dance,
            None => AnimationKind::Custom(name.to_string()),
        };

        let action = self
            .clips
            .get_mut(name)
            .ok_or_else(|| PuppetError::Animation(format!("clip '{}' is not loaded", name)))?;
        action.play()?;
        info!("▶️ Playing clip: {}", name);
        self.active = Active::Clip {
            name: name.to_string(),
            kind,
        };
        Ok(())
    }

    /// Stop every action. An interrupted procedural motion restores its
    /// pre-trigger body values immediately; bone resets go out with the
    /// next sample.
    pub fn stop_all(&mut self, pose: &mut Pose) {
        for action in self.clips.values_mut() {
            if action.is_running() {
                debug!("⏹️ Stopping clip: {}", action.name());
                action.stop();
            }
        }

        if let Active::Procedural { motion, .. } = &self.active {
            debug!("⏹️ Interrupting {}", motion.name());
            let reset = motion.finish(&self.skeleton);
            reset.apply(pose);
            for (bone, rotation) in reset.bones.iter() {
                self.pending_bones.set(*bone, *rotation);
            }
        }

        self.active = Active::Idle;
    }

    /// Step clip playback (the mixer).
    pub fn advance(&mut self, delta: f32) {
        for action in self.clips.values_mut() {
            action.advance(delta);
        }

        if let Active::Clip { name, .. } = &self.active {
            let finished = self.clips.get(name).map_or(true, |a| !a.is_running());
            if finished {
                debug!("Clip {} done, back to idle", name);
                self.active = Active::Idle;
            }
        }
    }

    /// Overlay for this frame. Retires a procedural motion whose duration
    /// has elapsed and emits its reset values instead.
    pub fn sample(&mut self, now: f32, target: &Pose) -> Overlay {
        let mut overlay = Overlay {
            bones: std::mem::take(&mut self.pending_bones),
            ..Overlay::default()
        };

        if let Active::Procedural { motion, started_at } = self.active {
            let t = (now - started_at).max(0.0);
            match motion.sample(t, &self.skeleton, target) {
                Some(frame) => overlay.merge(frame),
                None => {
                    info!("✅ {} finished", motion.name());
                    overlay.merge(motion.finish(&self.skeleton));
                    self.active = Active::Idle;
                }
            }
        }

        overlay
    }

    pub fn active(&self) -> AnimationKind {
        match &self.active {
            Active::Idle => AnimationKind::Idle,
            Active::Procedural { motion, .. } => match motion {
                ProceduralMotion::Wave { .. } => AnimationKind::Wave,
                ProceduralMotion::Jump { .. } => AnimationKind::Jump,
                ProceduralMotion::Spin { .. } => AnimationKind::Spin,
                ProceduralMotion::Dance { .. } => AnimationKind::Dance,
            },
            Active::Clip { kind, .. } => kind.clone(),
        }
    }

    pub fn active_source(&self) -> Option<ActionSource> {
        match self.active {
            Active::Idle => None,
            Active::Procedural { .. } => Some(ActionSource::Procedural),
            Active::Clip { .. } => Some(ActionSource::Asset),
        }
    }

    /// Clip currently playing and its playhead, for the renderer.
    pub fn active_clip(&self) -> Option<(&str, f32)> {
        match &self.active {
            Active::Clip { name, .. } => self
                .clips
                .get(name)
                .map(|action| (action.name(), action.time())),
            _ => None,
        }
    }

    pub fn is_waving(&self) -> bool {
        matches!(
            self.active,
            Active::Procedural {
                motion: ProceduralMotion::Wave { .. },
                ..
            }
        )
    }

    pub fn running_count(&self) -> usize {
        let clips = self.clips.values().filter(|a| a.is_running()).count();
        let procedural = usize::from(matches!(self.active, Active::Procedural { .. }));
        clips + procedural
    }

    /// Every registered action: the procedural set plus loaded clips.
    pub fn actions(&self) -> Vec<AnimationAction> {
        let running_motion = match &self.active {
            Active::Procedural { motion, .. } => Some(motion.name()),
            _ => None,
        };

        let procedural = ["wave", "jump", "spin", "dance"]
            .into_iter()
            .map(|name| AnimationAction {
                name: name.to_string(),
                source: ActionSource::Procedural,
                is_looping: false,
                clamp_at_end: false,
                is_running: running_motion == Some(name),
            });

        let clips = self.clips.values().map(|action| AnimationAction {
            name: action.name().to_string(),
            source: ActionSource::Asset,
            is_looping: action.loop_mode == LoopMode::Repeat,
            clamp_at_end: action.clamp_when_finished,
            is_running: action.is_running(),
        });

        procedural.chain(clips).collect()
    }

    fn start_clip(&mut self, name: &str, kind: AnimationKind) -> bool {
        let Some(action) = self.clips.get_mut(name) else {
            info!("⚠️ {} not loaded, using procedural {}", name, kind);
            return false;
        };

        match action.play() {
            Ok(()) => {
                info!("▶️ Playing {} clip for {}", name, kind);
                self.active = Active::Clip {
                    name: name.to_string(),
                    kind,
                };
                true
            }
            Err(e) => {
                warn!("❌ Error playing {}: {}", name, e);
                false
            }
        }
    }

    fn start_procedural(&mut self, motion: ProceduralMotion, now: f32) {
        info!("🤖 Procedural {} started", motion.name());
        self.active = Active::Procedural {
            motion,
            started_at: now,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(name: &str, duration: f32) -> AnimationClip {
        AnimationClip {
            name: name.to_string(),
            duration,
            bones: Vec::new(),
        }
    }

    fn controller() -> AnimationController {
        AnimationController::new(SkeletonMap::empty())
    }

    #[test]
    fn test_dance_stops_jump() {
        let mut ctl = controller();
        ctl.on_clip_loaded(clip("standingJump", 1.2));
        let mut pose = Pose::default();

        assert_eq!(ctl.trigger_jump(0.0, &mut pose), ActionSource::Asset);
        assert_eq!(ctl.active(), AnimationKind::Jump);
        assert_eq!(ctl.running_count(), 1);

        ctl.advance(0.2);
        assert_eq!(ctl.trigger_dance(0.2, &mut pose), ActionSource::Procedural);
        assert_eq!(ctl.active(), AnimationKind::Dance);
        assert_eq!(ctl.running_count(), 1);
        assert!(ctl
            .actions()
            .iter()
            .any(|a| a.name == "standingJump" && !a.is_running));
    }

    #[test]
    fn test_jump_falls_back_without_clip() {
        let mut ctl = controller();
        let mut pose = Pose::default();
        assert_eq!(ctl.trigger_jump(1.0, &mut pose), ActionSource::Procedural);
        assert_eq!(ctl.active(), AnimationKind::Jump);

        let peak = ctl.sample(1.3, &pose);
        assert!((peak.position_y.unwrap() - 1.0).abs() < 1e-4);

        let done = ctl.sample(1.7, &pose);
        assert_eq!(done.position_y, Some(-2.0));
        assert_eq!(ctl.active(), AnimationKind::Idle);
        assert_eq!(ctl.running_count(), 0);
        assert!(ctl.sample(2.0, &pose).is_empty());
    }

    #[test]
    fn test_bad_clip_falls_back() {
        let mut ctl = controller();
        ctl.on_clip_loaded(clip("hipHopDance", 0.0));
        let mut pose = Pose::default();
        assert_eq!(ctl.trigger_dance(0.0, &mut pose), ActionSource::Procedural);
        assert_eq!(ctl.active_source(), Some(ActionSource::Procedural));
    }

    #[test]
    fn test_clip_arrival_does_not_interrupt() {
        let mut ctl = controller();
        let mut pose = Pose::default();
        ctl.trigger_jump(0.0, &mut pose);
        assert!(!ctl.has_clip(ClipKind::StandingJump));
        assert!(ctl.on_clip_loaded(clip("standingJump", 1.0)));
        assert!(ctl.has_clip(ClipKind::StandingJump));
        assert!(!ctl.has_clip(ClipKind::HipHopDance));
        assert_eq!(ctl.active_source(), Some(ActionSource::Procedural));
        assert!(ctl.sample(0.1, &pose).position_y.is_some());

        assert_eq!(ctl.trigger_jump(0.2, &mut pose), ActionSource::Asset);
    }

    #[test]
    fn test_duplicate_clip_ignored() {
        let mut ctl = controller();
        assert!(ctl.on_clip_loaded(clip("standingJump", 1.0)));
        assert!(!ctl.on_clip_loaded(clip("standingJump", 9.0)));
        assert_eq!(ctl.actions().len(), 5);
    }

    #[test]
    fn test_clip_finishes_to_idle() {
        let mut ctl = controller();
        ctl.on_clip_loaded(clip("bow", 0.5));
        let mut pose = Pose::default();
        ctl.play_clip("bow", &mut pose).unwrap();
        assert_eq!(ctl.active(), AnimationKind::Custom("bow".to_string()));
        assert_eq!(ctl.active_clip(), Some(("bow", 0.0)));

        ctl.advance(0.6);
        assert_eq!(ctl.active(), AnimationKind::Idle);
        assert!(ctl.play_clip("curtsy", &mut pose).is_err());
    }

    #[test]
    fn test_interrupted_spin_restores_rotation() {
        let mut ctl = controller();
        let mut pose = Pose::default();
        pose.rotation_y = 0.5;
        ctl.trigger_spin(0.0, &mut pose);
        let overlay = ctl.sample(0.25, &pose);
        overlay.apply(&mut pose);
        assert!(pose.rotation_y > 0.5);

        ctl.trigger_wave(0.25, &mut pose);
        assert_eq!(pose.rotation_y, 0.5);
        assert!(ctl.is_waving());
    }

    #[test]
    fn test_retrigger_restarts() {
        let mut ctl = controller();
        let mut pose = Pose::default();
        ctl.trigger_wave(0.0, &mut pose);
        ctl.trigger_wave(1.5, &mut pose);
        // Restarted at 1.5, so still running at 3.0
        ctl.sample(3.0, &pose);
        assert!(ctl.is_waving());
        ctl.sample(3.6, &pose);
        assert!(!ctl.is_waving());
    }
}

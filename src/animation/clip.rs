//! Asset-backed animation clips and their playback actions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PuppetError, PuppetResult};

/// Clip as delivered by the asset loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
    /// Bones the clip animates.
    #[serde(default)]
    pub bones: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    Once,
    Repeat,
}

/// Playback state of one clip.
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: AnimationClip,
    pub loop_mode: LoopMode,
    pub clamp_when_finished: bool,
    time: f32,
    running: bool,
}

impl ClipAction {
    pub fn new(clip: AnimationClip, loop_mode: LoopMode, clamp_when_finished: bool) -> Self {
        Self {
            clip,
            loop_mode,
            clamp_when_finished,
            time: 0.0,
            running: false,
        }
    }

    /// Play once and hold the final frame.
    pub fn one_shot(clip: AnimationClip) -> Self {
        Self::new(clip, LoopMode::Once, true)
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn name(&self) -> &str {
        &self.clip.name
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Rewind and start. Fails for clips that cannot be played.
    pub fn play(&mut self) -> PuppetResult<()> {
        if !self.clip.duration.is_finite() || self.clip.duration <= 0.0 {
            return Err(PuppetError::Animation(format!(
                "clip '{}' has unplayable duration {}",
                self.clip.name, self.clip.duration
            )));
        }
        self.time = 0.0;
        self.running = true;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.time = 0.0;
    }

    /// Step playback by `delta` seconds.
    pub fn advance(&mut self, delta: f32) {
        if !self.running {
            return;
        }

        self.time += delta.max(0.0);
        if self.time < self.clip.duration {
            return;
        }

        match self.loop_mode {
            LoopMode::Repeat => self.time %= self.clip.duration,
            LoopMode::Once => {
                self.running = false;
                self.time = if self.clamp_when_finished {
                    self.clip.duration
                } else {
                    0.0
                };
                debug!("🎬 Clip finished: {}", self.clip.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(duration: f32) -> AnimationClip {
        AnimationClip {
            name: "standingJump".to_string(),
            duration,
            bones: vec!["Hips".to_string()],
        }
    }

    #[test]
    fn test_one_shot_clamps() {
        let mut action = ClipAction::one_shot(clip(1.0));
        action.play().unwrap();
        action.advance(0.4);
        assert!(action.is_running());
        action.advance(0.7);
        assert!(!action.is_running());
        assert_eq!(action.time(), 1.0);
    }

    #[test]
    fn test_repeat_wraps() {
        let mut action = ClipAction::new(clip(1.0), LoopMode::Repeat, false);
        action.play().unwrap();
        action.advance(1.25);
        assert!(action.is_running());
        assert!((action.time() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_play_rejects_bad_duration() {
        assert!(ClipAction::one_shot(clip(0.0)).play().is_err());
        assert!(ClipAction::one_shot(clip(f32::NAN)).play().is_err());
    }

    #[test]
    fn test_replay_rewinds() {
        let mut action = ClipAction::one_shot(clip(1.0));
        action.play().unwrap();
        action.advance(2.0);
        action.play().unwrap();
        assert_eq!(action.time(), 0.0);
        assert!(action.is_running());
    }

    #[test]
    fn test_clip_json() {
        let clip: AnimationClip =
            serde_json::from_str(r#"{"name":"hipHopDance","duration":4.5}"#).unwrap();
        assert!(clip.bones.is_empty());
        assert_eq!(clip.duration, 4.5);
    }
}

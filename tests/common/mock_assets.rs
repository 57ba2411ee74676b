//! In-memory clip source for tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use handpuppet::animation::AnimationClip;
use handpuppet::assets::ClipSource;

/// Clip source serving from a map, with an optional delay
#[derive(Debug, Default)]
pub struct MemoryClips {
    clips: HashMap<String, AnimationClip>,
    pub delay: Duration,
    /// Every name that was requested
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl MemoryClips {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, name: &str, duration: f32) -> Self {
        self.clips.insert(
            name.to_string(),
            AnimationClip {
                name: name.to_string(),
                duration,
                bones: Vec::new(),
            },
        );
        self
    }
}

#[async_trait]
impl ClipSource for MemoryClips {
    async fn load(&self, name: &str) -> Result<AnimationClip> {
        self.requested.lock().unwrap().push(name.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.clips
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("no clip named {}", name))
    }
}

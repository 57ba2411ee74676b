//! Asset loading
//!
//! Clips are fetched off the frame loop and published into the clip inbox
//! whenever they arrive. A clip that never arrives leaves the procedural
//! fallback in place for the whole session.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::animation::{AnimationClip, ClipKind};
use crate::error::PuppetError;
use crate::shared::ClipInbox;

/// Source of animation clips
#[async_trait]
pub trait ClipSource: Send + Sync {
    /// Fetch one clip by name
    async fn load(&self, name: &str) -> Result<AnimationClip>;
}

/// Reads `<dir>/<name>.json` manifests
pub struct JsonClipSource {
    dir: PathBuf,
}

impl JsonClipSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ClipSource for JsonClipSource {
    async fn load(&self, name: &str) -> Result<AnimationClip> {
        let path = self.dir.join(format!("{}.json", name));
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            PuppetError::Asset(format!("cannot read {}: {}", path.display(), e))
        })?;
        let clip: AnimationClip = serde_json::from_str(&content)?;
        if clip.name != name {
            return Err(PuppetError::Asset(format!(
                "{} contains clip '{}', expected '{}'",
                path.display(),
                clip.name,
                name
            ))
            .into());
        }
        Ok(clip)
    }
}

/// Start loading every known clip. Each load publishes on success and
/// logs on failure; nothing waits for them.
pub fn spawn_clip_loading(source: Arc<dyn ClipSource>, inbox: ClipInbox) -> Vec<JoinHandle<()>> {
    ClipKind::ALL
        .into_iter()
        .map(|kind| {
            let source = source.clone();
            let inbox = inbox.clone();
            tokio::spawn(async move {
                match source.load(kind.name()).await {
                    Ok(clip) => {
                        info!("✅ {} animation loaded ({:.2}s)", clip.name, clip.duration);
                        if let Err(e) = inbox.publish(clip) {
                            warn!("Failed to publish clip {}: {}", kind.name(), e);
                        }
                    }
                    Err(e) => {
                        warn!(
                            "❌ Failed to load {} animation, procedural fallback stays: {}",
                            kind.name(),
                            e
                        );
                    }
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_source_loads_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("standingJump.json"),
            r#"{"name":"standingJump","duration":1.1,"bones":["Hips"]}"#,
        )
        .unwrap();

        let source = JsonClipSource::new(dir.path());
        let clip = source.load("standingJump").await.unwrap();
        assert_eq!(clip.bones, vec!["Hips".to_string()]);
        assert!(source.load("hipHopDance").await.is_err());
    }

    #[tokio::test]
    async fn test_name_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("hipHopDance.json"),
            r#"{"name":"standingJump","duration":1.1}"#,
        )
        .unwrap();
        let source = JsonClipSource::new(dir.path());
        assert!(source.load("hipHopDance").await.is_err());
    }

    #[tokio::test]
    async fn test_spawn_publishes_available_clips() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("hipHopDance.json"),
            r#"{"name":"hipHopDance","duration":4.0}"#,
        )
        .unwrap();

        let inbox = ClipInbox::default();
        let handles = spawn_clip_loading(Arc::new(JsonClipSource::new(dir.path())), inbox.clone());
        for handle in handles {
            handle.await.unwrap();
        }

        let clips = inbox.drain().unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].name, "hipHopDance");
    }
}

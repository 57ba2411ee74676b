//! Recording renderer for tests

use handpuppet::frame_loop::{AvatarTransform, TransformSink};

/// Sink that keeps every presented transform
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<AvatarTransform>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&AvatarTransform> {
        self.frames.last()
    }
}

impl TransformSink for RecordingSink {
    fn present(&mut self, transform: &AvatarTransform) {
        self.frames.push(transform.clone());
    }
}

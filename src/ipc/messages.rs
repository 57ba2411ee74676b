//! IPC Message Types
//!
//! JSON-serializable messages for producer ↔ daemon communication.

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationClip, AnimationKind};
use crate::frame_loop::{AvatarTransform, SessionStatus};
use crate::gesture::GestureLabel;
use crate::landmarks::Landmark;

/// Request types sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IpcRequest {
    /// Latest detector result with a hand
    #[serde(rename = "landmarks")]
    Landmarks {
        seq_id: u64,
        landmarks: Vec<Landmark>,
    },

    /// Detector saw no hand
    #[serde(rename = "no_hand")]
    NoHand { seq_id: u64 },

    /// Recognized speech
    #[serde(rename = "voice")]
    Voice { seq_id: u64, text: String },

    /// An animation clip finished loading
    #[serde(rename = "clip_loaded")]
    ClipLoaded { seq_id: u64, clip: AnimationClip },

    /// Request session status
    #[serde(rename = "status_request")]
    StatusRequest { seq_id: u64 },
}

impl IpcRequest {
    pub fn seq_id(&self) -> u64 {
        match self {
            Self::Landmarks { seq_id, .. }
            | Self::NoHand { seq_id }
            | Self::Voice { seq_id, .. }
            | Self::ClipLoaded { seq_id, .. }
            | Self::StatusRequest { seq_id } => *seq_id,
        }
    }
}

/// Response types sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IpcResponse {
    /// Status response. `transform` is absent until the first frame ran.
    #[serde(rename = "status_response")]
    StatusResponse {
        seq_id: u64,
        hand_detected: bool,
        gesture: GestureLabel,
        animation: AnimationKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        transform: Option<AvatarTransform>,
    },

    /// Acknowledgment
    #[serde(rename = "ack")]
    Ack {
        seq_id: u64,
        success: bool,
        message: Option<String>,
    },
}

impl IpcResponse {
    pub fn ack(seq_id: u64, success: bool, message: impl Into<String>) -> Self {
        Self::Ack {
            seq_id,
            success,
            message: Some(message.into()),
        }
    }

    pub fn status(seq_id: u64, status: Option<SessionStatus>) -> Self {
        match status {
            Some(status) => Self::StatusResponse {
                seq_id,
                hand_detected: status.hand_detected,
                gesture: status.gesture,
                animation: status.animation,
                transform: Some(status.transform),
            },
            None => Self::StatusResponse {
                seq_id,
                hand_detected: false,
                gesture: GestureLabel::None,
                animation: AnimationKind::Idle,
                transform: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_request_serialize() {
        let req = IpcRequest::Voice {
            seq_id: 1,
            text: "dance".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"type\":\"voice\""));
        assert!(json.contains("dance"));
    }

    #[test]
    fn test_landmarks_request_parse() {
        let json = r#"{"type":"landmarks","seq_id":7,"landmarks":[{"x":0.5,"y":0.5,"z":0.0}]}"#;
        let req: IpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.seq_id(), 7);
        match req {
            IpcRequest::Landmarks { landmarks, .. } => assert_eq!(landmarks.len(), 1),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_empty_status_response() {
        let resp = IpcResponse::status(3, None);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("status_response"));
        assert!(!json.contains("transform"));

        let back: IpcResponse = serde_json::from_str(&json).unwrap();
        match back {
            IpcResponse::StatusResponse {
                seq_id, transform, ..
            } => {
                assert_eq!(seq_id, 3);
                assert!(transform.is_none());
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}

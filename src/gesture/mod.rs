//! Gesture Module
//!
//! Turns landmark frames into discrete gesture labels and debounces
//! them into confirmed triggers:
//! - classifier: stateless landmark → label
//! - hold: sustained-hold state machine

pub mod classifier;
pub mod hold;

pub use classifier::{classify, FingerStates, GestureClassifier};
pub use hold::{GestureHoldStateMachine, HoldState, TriggerEvent};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete gesture derived from a single landmark frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureLabel {
    #[default]
    None,
    Peace,
    Thumbsup,
    Fist,
    Open,
    Neutral,
}

impl GestureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Peace => "peace",
            Self::Thumbsup => "thumbsup",
            Self::Fist => "fist",
            Self::Open => "open",
            Self::Neutral => "neutral",
        }
    }

    /// Action fired when this gesture is held long enough.
    /// `open` and `neutral` confirm without an action.
    pub fn action(&self) -> Option<GestureAction> {
        match self {
            Self::Peace => Some(GestureAction::Dance),
            Self::Thumbsup => Some(GestureAction::Jump),
            Self::Fist => Some(GestureAction::Spin),
            Self::Open | Self::Neutral | Self::None => None,
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation requested by a confirmed gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Dance,
    Jump,
    Spin,
}

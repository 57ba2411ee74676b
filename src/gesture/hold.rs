//! Sustained-hold debouncing of gesture labels.
//!
//! A gesture confirms only after its label has been seen continuously for
//! the hold threshold, and fires at most once per continuous hold.

use std::time::Duration;
use tracing::{debug, info};

use super::GestureLabel;

/// Default hold duration before a gesture confirms.
pub const HOLD_THRESHOLD: Duration = Duration::from_millis(3000);

/// Confirmed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub label: GestureLabel,
    /// How long the label had been held when it confirmed.
    pub held_for: Duration,
}

/// Debouncer state. Timestamps are offsets from session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoldState {
    pub current_label: GestureLabel,
    pub hold_start: Duration,
    pub last_triggered: GestureLabel,
}

#[derive(Debug, Clone)]
pub struct GestureHoldStateMachine {
    state: HoldState,
    threshold: Duration,
}

impl Default for GestureHoldStateMachine {
    fn default() -> Self {
        Self::new(HOLD_THRESHOLD)
    }
}

impl GestureHoldStateMachine {
    pub fn new(threshold: Duration) -> Self {
        Self {
            state: HoldState::default(),
            threshold,
        }
    }

    pub fn state(&self) -> &HoldState {
        &self.state
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Feed one frame's label.
    pub fn update(&mut self, label: GestureLabel, now: Duration) -> Option<TriggerEvent> {
        let state = &mut self.state;

        if label != state.current_label {
            if label != GestureLabel::None {
                debug!("🤚 Gesture started: {}", label);
            }
            state.current_label = label;
            state.hold_start = now;
            state.last_triggered = GestureLabel::None;
            return None;
        }

        if label == GestureLabel::None || label == state.last_triggered {
            return None;
        }

        let held_for = now.saturating_sub(state.hold_start);
        if held_for >= self.threshold {
            info!("✅ Gesture confirmed: {} (held {:?})", label, held_for);
            state.last_triggered = label;
            return Some(TriggerEvent { label, held_for });
        }

        None
    }

    /// Drop any in-progress hold (hand lost).
    pub fn reset(&mut self) {
        self.state = HoldState::default();
    }
}

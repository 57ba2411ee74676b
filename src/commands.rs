//! Command processing module
//!
//! Maps recognizer text onto the fixed voice vocabulary. Voice commands
//! bypass gesture debouncing and go straight to the animation triggers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::animation::controller::Trigger;
use crate::error::PuppetError;
use crate::utils::fuzzy::{find_matches, normalize_text};

/// Minimum similarity for a near-miss word to count as a command
const FUZZY_CUTOFF: f64 = 0.75;

/// Shorter words are never fuzzy-matched: one edit turns "have" into "wave"
const MIN_FUZZY_WORD_LEN: usize = 5;

/// Lead the best candidate needs over the runner-up
const FUZZY_MARGIN: f64 = 0.15;

/// Fixed voice vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceCommand {
    Hello,
    Wave,
    Jump,
    Spin,
    Dance,
}

impl VoiceCommand {
    pub const ALL: [VoiceCommand; 5] = [
        VoiceCommand::Hello,
        VoiceCommand::Wave,
        VoiceCommand::Jump,
        VoiceCommand::Spin,
        VoiceCommand::Dance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Wave => "wave",
            Self::Jump => "jump",
            Self::Spin => "spin",
            Self::Dance => "dance",
        }
    }

    /// Animation this command starts. A greeting waves.
    pub fn trigger(&self) -> Trigger {
        match self {
            Self::Hello | Self::Wave => Trigger::Wave,
            Self::Jump => Trigger::Jump,
            Self::Spin => Trigger::Spin,
            Self::Dance => Trigger::Dance,
        }
    }
}

impl fmt::Display for VoiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceCommand {
    type Err = PuppetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_text(s);
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == normalized)
            .ok_or_else(|| PuppetError::Other(anyhow::anyhow!("Unknown command: {}", s)))
    }
}

/// A voice command binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandBinding {
    /// Phrases that trigger this command
    pub triggers: Vec<String>,
}

/// Matches recognizer output to voice commands
pub struct CommandProcessor {
    bindings: Vec<(VoiceCommand, CommandBinding)>,
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandProcessor {
    /// Create a processor with one binding per vocabulary word
    pub fn new() -> Self {
        let bindings = VoiceCommand::ALL
            .into_iter()
            .map(|cmd| {
                (
                    cmd,
                    CommandBinding {
                        triggers: vec![cmd.as_str().to_string()],
                    },
                )
            })
            .collect();
        Self { bindings }
    }

    /// Add extra phrases for a command
    pub fn add_binding(&mut self, command: VoiceCommand, binding: CommandBinding) {
        info!("  {} -> {}", binding.triggers.join(", "), command);
        match self.bindings.iter_mut().find(|(cmd, _)| *cmd == command) {
            Some((_, existing)) => existing.triggers.extend(binding.triggers),
            None => self.bindings.push((command, binding)),
        }
    }

    /// Resolve recognizer text to a command. Unknown text is logged and ignored.
    pub fn process(&self, text: &str) -> Option<VoiceCommand> {
        let text = normalize_text(text);
        if text.is_empty() {
            return None;
        }

        // 1. Whole utterance equals a trigger phrase
        for (cmd, binding) in &self.bindings {
            if binding.triggers.iter().any(|t| normalize_text(t) == text) {
                debug!("🎯 Matched command: {} (exact)", cmd);
                return Some(*cmd);
            }
        }

        // 2. Trigger phrase appears as whole words inside the utterance
        let padded = format!(" {} ", text);
        for (cmd, binding) in &self.bindings {
            for trigger in &binding.triggers {
                if padded.contains(&format!(" {} ", normalize_text(trigger))) {
                    info!("🎯 Matched command: {} (trigger: '{}')", cmd, trigger);
                    return Some(*cmd);
                }
            }
        }

        // 3. Near-miss single words ("jumps", "spinn")
        let phrases: Vec<String> = self
            .bindings
            .iter()
            .flat_map(|(_, b)| b.triggers.iter().cloned())
            .collect();
        for word in text.split_whitespace() {
            if word.chars().count() < MIN_FUZZY_WORD_LEN {
                continue;
            }

            let matches = find_matches(word, &phrases, 2, FUZZY_CUTOFF);
            let Some(best) = matches.first() else {
                continue;
            };
            if let Some(runner_up) = matches.get(1) {
                if best.score - runner_up.score < FUZZY_MARGIN {
                    debug!("Ambiguous word '{}': {} vs {}", word, best.value, runner_up.value);
                    continue;
                }
            }

            if let Some((cmd, _)) = self
                .bindings
                .iter()
                .find(|(_, b)| b.triggers.contains(&best.value))
            {
                info!(
                    "🎯 Fuzzy matched command: {} ('{}' ~ '{}', {:.2})",
                    cmd, word, best.value, best.score
                );
                return Some(*cmd);
            }
        }

        info!("🤷 Unknown command: {}", text);
        None
    }
}

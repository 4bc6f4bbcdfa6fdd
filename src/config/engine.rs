//! Conversation engine configuration: timeouts and the emergency hotline.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Waiting sessions idle this long are timed out
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_secs: u64,

    /// Delay between a finished assessment and session completion
    #[serde(default = "default_completion_cooldown")]
    pub completion_cooldown_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Budget for classification and assessment planning
    #[serde(default = "default_turn_timeout")]
    pub turn_timeout_ms: u64,

    /// Budget for reply generation
    #[serde(default = "default_reply_timeout")]
    pub reply_timeout_ms: u64,

    #[serde(default = "default_hotline")]
    pub emergency_hotline: String,
}

impl EngineConfig {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }

    pub fn completion_cooldown(&self) -> Duration {
        Duration::from_secs(self.completion_cooldown_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("inactivity_timeout_secs", self.inactivity_timeout_secs),
            ("completion_cooldown_secs", self.completion_cooldown_secs),
            ("sweep_interval_secs", self.sweep_interval_secs),
            ("turn_timeout_ms", self.turn_timeout_ms),
            ("reply_timeout_ms", self.reply_timeout_ms),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ValidationError::InvalidEngineSetting(*name));
        }
        if self.emergency_hotline.trim().is_empty() {
            return Err(ValidationError::EmptyHotline);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: default_inactivity_timeout(),
            completion_cooldown_secs: default_completion_cooldown(),
            sweep_interval_secs: default_sweep_interval(),
            turn_timeout_ms: default_turn_timeout(),
            reply_timeout_ms: default_reply_timeout(),
            emergency_hotline: default_hotline(),
        }
    }
}

fn default_inactivity_timeout() -> u64 {
    600
}

fn default_completion_cooldown() -> u64 {
    120
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_turn_timeout() -> u64 {
    5000
}

fn default_reply_timeout() -> u64 {
    8000
}

fn default_hotline() -> String {
    "108".to_string()
}

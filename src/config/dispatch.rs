//! Health worker dispatch configuration

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// YAML roster of health workers. Without it every escalation uses
    /// the hotline.
    pub roster_path: Option<String>,

    /// How long a notified worker stays busy unless released earlier
    #[serde(default = "default_assignment_ttl")]
    pub assignment_ttl_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            roster_path: None,
            assignment_ttl_secs: default_assignment_ttl(),
        }
    }
}

impl DispatchConfig {
    pub fn roster_path(&self) -> Option<&str> {
        self.roster_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn assignment_ttl(&self) -> Duration {
        Duration::from_secs(self.assignment_ttl_secs)
    }
}

fn default_assignment_ttl() -> u64 {
    30 * 60
}

//! Session configuration: pacing delays and seeding

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pacing and randomness for a [`Session`](crate::Session)
///
/// Delays only pace play for a human watching; a headless host may ignore
/// them entirely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause before the computer picks an edge
    pub think_delay_ms: u64,
    /// Pause after the computer's move before the human may play
    pub handback_delay_ms: u64,
    /// Pause on a lost round before the board resets
    pub reset_delay_ms: u64,
    /// Random seed for the computer player (None = entropy)
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            think_delay_ms: 1000,
            handback_delay_ms: 500,
            reset_delay_ms: 3000,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// All delays zero, for tests and batch play
    pub fn instant() -> Self {
        Self {
            think_delay_ms: 0,
            handback_delay_ms: 0,
            reset_delay_ms: 0,
            seed: None,
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set all three delays
    pub fn with_delays(mut self, think_ms: u64, handback_ms: u64, reset_ms: u64) -> Self {
        self.think_delay_ms = think_ms;
        self.handback_delay_ms = handback_ms;
        self.reset_delay_ms = reset_ms;
        self
    }

    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    pub fn handback_delay(&self) -> Duration {
        Duration::from_millis(self.handback_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pacing() {
        let config = SessionConfig::default();
        assert_eq!(config.think_delay(), Duration::from_secs(1));
        assert_eq!(config.handback_delay(), Duration::from_millis(500));
        assert_eq!(config.reset_delay(), Duration::from_secs(3));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::instant().with_seed(9).with_delays(10, 20, 30);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.reset_delay(), Duration::from_millis(30));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"seed": 5, "think_delay_ms": 0}"#).unwrap();
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.think_delay_ms, 0);
        assert_eq!(config.reset_delay_ms, 3000);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("sim-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"handback_delay_ms": 0}"#).unwrap();
        let config = SessionConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.handback_delay_ms, 0);
        assert_eq!(config.think_delay_ms, 1000);
    }
}

//! Bridge configuration
//!
//! Execution budget and input limits. The architecture table is static and
//! not configurable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Fixed part of every request's time budget
    pub timeout_base_ms: u64,
    /// Added to the budget for each started KiB of input
    pub timeout_per_kib_ms: u64,
    /// Largest accepted source text or byte input
    pub max_input_len: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            timeout_base_ms: 5_000,
            timeout_per_kib_ms: 250,
            max_input_len: 1024 * 1024,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout_base(mut self, timeout: Duration) -> Self {
        self.timeout_base_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_timeout_per_kib(mut self, timeout: Duration) -> Self {
        self.timeout_per_kib_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Time allowed for a request with `input_len` bytes of input
    pub fn budget_for(&self, input_len: usize) -> Duration {
        let kib = input_len.div_ceil(1024) as u64;
        Duration::from_millis(
            self.timeout_base_ms
                .saturating_add(self.timeout_per_kib_ms.saturating_mul(kib)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_scales_with_input() {
        let config = BridgeConfig::new()
            .with_timeout_base(Duration::from_secs(1))
            .with_timeout_per_kib(Duration::from_millis(100));

        assert_eq!(config.budget_for(0), Duration::from_millis(1000));
        assert_eq!(config.budget_for(1), Duration::from_millis(1100));
        assert_eq!(config.budget_for(2048), Duration::from_millis(1200));
        assert_eq!(config.budget_for(2049), Duration::from_millis(1300));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: BridgeConfig = serde_json::from_str(r#"{"max_input_len": 16}"#).unwrap();
        assert_eq!(config.max_input_len, 16);
        assert_eq!(config.timeout_base_ms, BridgeConfig::default().timeout_base_ms);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(BridgeConfig::from_json_file("does/not/exist.json").is_err());
    }
}

//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/karoo/) and project (.karoo/) level configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::agents::{ExperienceLevel, TargetMarket};
use crate::constants::{llm, orchestration, retry};
use crate::types::{KarooError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM request settings shared by every backend
    pub llm: LlmConfig,

    /// Phase timeouts
    pub orchestration: OrchestrationConfig,

    /// Model invocation retry policy
    pub retry: RetryConfig,

    /// Default candidate profile used when the CLI flags are omitted
    pub profile: ProfileConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            orchestration: OrchestrationConfig::default(),
            retry: RetryConfig::default(),
            profile: ProfileConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `KarooError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(KarooError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.max_tokens == 0 {
            return Err(KarooError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.llm.request_timeout_secs == 0 {
            return Err(KarooError::Config(
                "LLM request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let o = &self.orchestration;
        for (name, value) in [
            ("agent_timeout_secs", o.agent_timeout_secs),
            ("cover_letter_timeout_secs", o.cover_letter_timeout_secs),
            ("rewrite_timeout_secs", o.rewrite_timeout_secs),
        ] {
            if value == 0 {
                return Err(KarooError::Config(format!(
                    "orchestration.{} must be greater than 0",
                    name
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate per call
    pub max_tokens: usize,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            temperature: llm::TEMPERATURE,
            max_tokens: llm::MAX_TOKENS,
            request_timeout_secs: llm::REQUEST_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Orchestration Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    pub agent_timeout_secs: u64,
    pub cover_letter_timeout_secs: u64,
    pub rewrite_timeout_secs: u64,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            agent_timeout_secs: orchestration::AGENT_TIMEOUT_SECS,
            cover_letter_timeout_secs: orchestration::COVER_LETTER_TIMEOUT_SECS,
            rewrite_timeout_secs: orchestration::REWRITE_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Retry Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first model attempt
    pub max_retries: usize,

    /// First backoff delay in milliseconds; doubles per retry
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: retry::MAX_RETRIES,
            base_delay_ms: retry::BASE_DELAY_MS,
        }
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

// =============================================================================
// Profile Defaults
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub target_market: TargetMarket,
    pub experience_level: ExperienceLevel,
    pub industry: String,
    pub target_role: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            target_market: TargetMarket::Both,
            experience_level: ExperienceLevel::Mid,
            industry: String::new(),
            target_role: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.orchestration.agent_timeout_secs, 90);
        assert_eq!(config.orchestration.cover_letter_timeout_secs, 75);
        assert_eq!(config.orchestration.rewrite_timeout_secs, 180);
        assert_eq!(config.retry.max_retries, 2);
    }

    #[test]
    fn test_validate_rejects_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 2.5;
        assert!(matches!(config.validate(), Err(KarooError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.orchestration.rewrite_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rewrite_timeout_secs"));
    }
}

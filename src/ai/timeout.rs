//! Unified Timeout Configuration
//!
//! Phase timeouts for an optimization run plus helpers for wrapping
//! async operations with a consistent timeout error.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::{TimeoutConfig, with_timeout_map};
//!
//! let config = TimeoutConfig::default();
//! let output = with_timeout_map(
//!     config.agent,
//!     agent.analyze(cv, jd, ctx),
//!     "algorithm_breaker"
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::config::OrchestrationConfig;
use crate::constants::orchestration;
use crate::types::{KarooError, Result};

/// Phase timeouts for one optimization run
#[derive(Debug, Clone, Copy)]
pub struct TimeoutConfig {
    /// Per-agent bound during the concurrent fan-out (default: 90 seconds)
    pub agent: Duration,
    /// Cover letter phase (default: 75 seconds)
    pub cover_letter: Duration,
    /// Rewrite phase covering all three variants (default: 180 seconds)
    pub rewrite: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            agent: Duration::from_secs(orchestration::AGENT_TIMEOUT_SECS),
            cover_letter: Duration::from_secs(orchestration::COVER_LETTER_TIMEOUT_SECS),
            rewrite: Duration::from_secs(orchestration::REWRITE_TIMEOUT_SECS),
        }
    }
}

impl From<&OrchestrationConfig> for TimeoutConfig {
    fn from(config: &OrchestrationConfig) -> Self {
        Self {
            agent: Duration::from_secs(config.agent_timeout_secs),
            cover_letter: Duration::from_secs(config.cover_letter_timeout_secs),
            rewrite: Duration::from_secs(config.rewrite_timeout_secs),
        }
    }
}

impl TimeoutConfig {
    /// Same bound for every phase. Mostly useful in tests.
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            agent: timeout,
            cover_letter: timeout,
            rewrite: timeout,
        }
    }
}

/// Execute an async operation with a timeout
///
/// The future's own output comes back inside `Ok`, untouched.
pub async fn with_timeout_map<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(KarooError::timeout(operation_name, timeout)),
    }
}

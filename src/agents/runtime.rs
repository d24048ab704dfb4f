//! Shared model access for agents.
//!
//! Every AI-capable agent goes through [`AgentRuntime::ask`], which owns the
//! retry policy and the rule-based fallback. Agents never see a model error.

use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::{debug, warn};

use crate::ai::provider::SharedProvider;
use crate::config::RetryConfig;
use crate::types::KarooError;

/// Banner returned in place of a model reply
pub fn rule_based_banner(agent_name: &str) -> String {
    format!(
        "[Rule-based mode: add GROQ_API_KEY for AI analysis]\n\
         Agent: {}\n\
         Status: Running keyword and pattern analysis only.",
        agent_name
    )
}

/// Outcome of one model request
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// True only when the model answered
    pub ai_powered: bool,
}

impl Reply {
    fn rule_based(agent_name: &str) -> Self {
        Self {
            text: rule_based_banner(agent_name),
            ai_powered: false,
        }
    }
}

/// Provider handle plus retry policy, cloned into every agent
#[derive(Clone, Default)]
pub struct AgentRuntime {
    provider: Option<SharedProvider>,
    retry: RetryConfig,
}

impl std::fmt::Debug for AgentRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRuntime")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("retry", &self.retry)
            .finish()
    }
}

impl AgentRuntime {
    pub fn new(provider: Option<SharedProvider>, retry: RetryConfig) -> Self {
        Self { provider, retry }
    }

    /// No model: every agent runs rule-based
    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.retry.base_delay())
            .with_factor(2.0)
            .with_max_times(self.retry.max_retries)
    }

    /// Ask the model, retrying transient failures. Falls back to the
    /// rule-based banner when no model is configured or every attempt fails.
    pub async fn ask(&self, agent_name: &str, system: &str, prompt: &str) -> Reply {
        let Some(provider) = self.provider.as_ref() else {
            return Reply::rule_based(agent_name);
        };

        let request = move || async move { provider.complete(system, prompt).await };
        let result = request
            .retry(self.backoff())
            .when(|e: &KarooError| e.is_retryable())
            .notify(|e: &KarooError, wait: Duration| {
                warn!(
                    "[{}] model attempt failed ({}), retrying in {:?}",
                    agent_name, e, wait
                );
            })
            .await;

        match result {
            Ok(response) => {
                debug!(
                    "[{}] {} replied ({} tokens, {}ms)",
                    agent_name,
                    provider.name(),
                    response.usage.total(),
                    response.timing.total_ms
                );
                Reply {
                    text: response.content,
                    ai_powered: true,
                }
            }
            Err(e) => {
                warn!("[{}] model unavailable, using rule-based analysis: {}", agent_name, e);
                Reply::rule_based(agent_name)
            }
        }
    }
}

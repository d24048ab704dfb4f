//! Stub providers for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{LlmProvider, LlmResponse};
use crate::types::{ErrorCategory, KarooError, LlmError, Result};

/// How a [`StubProvider`] answers
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Reply immediately with this text
    Reply(String),
    /// Sleep, then reply
    Sleep(Duration, String),
    /// Fail with a non-retryable auth error
    FailAuth,
    /// Fail with retryable errors for the first `n` calls, then reply
    Flaky(usize, String),
}

pub struct StubProvider {
    behavior: StubBehavior,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(StubBehavior::Reply(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<LlmResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            StubBehavior::Reply(text) => Ok(LlmResponse::content_only(text.clone())),
            StubBehavior::Sleep(d, text) => {
                tokio::time::sleep(*d).await;
                Ok(LlmResponse::content_only(text.clone()))
            }
            StubBehavior::FailAuth => Err(KarooError::Llm(LlmError::with_provider(
                ErrorCategory::Auth,
                "invalid api key",
                "stub",
            ))),
            StubBehavior::Flaky(failures, text) => {
                if n < *failures {
                    Err(KarooError::Llm(LlmError::with_provider(
                        ErrorCategory::Transient,
                        "503 overloaded",
                        "stub",
                    )))
                } else {
                    Ok(LlmResponse::content_only(text.clone()))
                }
            }
        }
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

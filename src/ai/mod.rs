//! AI Integration Layer
//!
//! Model backends, backend resolution and phase timeouts.

pub mod provider;
pub mod timeout;

pub use provider::{
    AnthropicProvider, BackendKind, CredentialSource, EnvCredentials, ErrorCategory,
    ErrorClassifier, LlmError, LlmProvider, LlmResponse, OpenAiProvider, ProviderConfig,
    ProviderResolver, ResolvedProvider, ResponseTiming, SharedProvider, TokenUsage,
};
pub use timeout::{TimeoutConfig, with_timeout_map};

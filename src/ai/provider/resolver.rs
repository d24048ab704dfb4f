//! Backend resolution from credentials.
//!
//! Walks the candidates in priority order (Groq, OpenAI, Anthropic) and
//! builds the first one whose key is set and is not a template placeholder.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::{AnthropicProvider, OpenAiProvider, ProviderConfig, SharedProvider};
use crate::config::LlmConfig;
use crate::constants::providers::*;
use crate::types::Result;

/// Where API keys and model overrides are read from
pub trait CredentialSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl CredentialSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Groq,
    OpenAi,
    Anthropic,
}

impl BackendKind {
    /// Resolution priority
    pub const ALL: [BackendKind; 3] = [Self::Groq, Self::OpenAi, Self::Anthropic];

    pub fn label(self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    pub fn key_var(self) -> &'static str {
        match self {
            Self::Groq => GROQ_KEY_VAR,
            Self::OpenAi => OPENAI_KEY_VAR,
            Self::Anthropic => ANTHROPIC_KEY_VAR,
        }
    }

    fn model_var(self) -> &'static str {
        match self {
            Self::Groq => GROQ_MODEL_VAR,
            Self::OpenAi => OPENAI_MODEL_VAR,
            Self::Anthropic => ANTHROPIC_MODEL_VAR,
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::Groq => GROQ_PLACEHOLDER,
            Self::OpenAi => OPENAI_PLACEHOLDER,
            Self::Anthropic => ANTHROPIC_PLACEHOLDER,
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::Groq => GROQ_DEFAULT_MODEL,
            Self::OpenAi => OPENAI_DEFAULT_MODEL,
            Self::Anthropic => ANTHROPIC_DEFAULT_MODEL,
        }
    }

    fn api_base(self) -> &'static str {
        match self {
            Self::Groq => GROQ_API_BASE,
            Self::OpenAi => OPENAI_API_BASE,
            Self::Anthropic => ANTHROPIC_API_BASE,
        }
    }

    /// Usable key for this backend, if any.
    pub fn api_key(self, creds: &dyn CredentialSource) -> Option<String> {
        creds
            .get(self.key_var())
            .filter(|key| !key.is_empty() && !key.starts_with(self.placeholder()))
    }

    /// Model override from the credential source, else the default.
    pub fn model(self, creds: &dyn CredentialSource) -> String {
        creds
            .get(self.model_var())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.default_model().to_string())
    }

    fn build(self, api_key: String, model: &str, llm: &LlmConfig) -> Result<SharedProvider> {
        let config = ProviderConfig::new(api_key, model, self.api_base(), llm);
        Ok(match self {
            Self::Groq => Arc::new(OpenAiProvider::new("groq", config)?),
            Self::OpenAi => Arc::new(OpenAiProvider::new("openai", config)?),
            Self::Anthropic => Arc::new(AnthropicProvider::new(config)?),
        })
    }
}

/// Outcome of backend resolution
#[derive(Clone)]
pub struct ResolvedProvider {
    pub provider: Option<SharedProvider>,
    pub provider_label: String,
    pub model_label: String,
}

impl std::fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("configured", &self.provider.is_some())
            .field("provider_label", &self.provider_label)
            .field("model_label", &self.model_label)
            .finish()
    }
}

impl ResolvedProvider {
    /// No backend: every agent runs rule-based.
    pub fn rule_based() -> Self {
        Self {
            provider: None,
            provider_label: RULE_BASED_LABEL.to_string(),
            model_label: NO_MODEL_LABEL.to_string(),
        }
    }

    pub fn is_ai(&self) -> bool {
        self.provider.is_some()
    }
}

pub struct ProviderResolver;

impl ProviderResolver {
    /// First viable backend, or rule-based mode.
    pub fn resolve(creds: &dyn CredentialSource, llm: &LlmConfig) -> ResolvedProvider {
        for kind in BackendKind::ALL {
            let Some(api_key) = kind.api_key(creds) else {
                continue;
            };
            let model = kind.model(creds);
            match kind.build(api_key, &model, llm) {
                Ok(provider) => {
                    info!("Using {} ({})", kind.label(), model);
                    return ResolvedProvider {
                        provider: Some(provider),
                        provider_label: kind.label().to_string(),
                        model_label: model,
                    };
                }
                Err(e) => warn!("{} init failed: {}", kind.label(), e),
            }
        }

        info!("No API key found, running rule-based. Add GROQ_API_KEY for AI analysis.");
        ResolvedProvider::rule_based()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_keys_is_rule_based() {
        let resolved = ProviderResolver::resolve(&creds(&[]), &LlmConfig::default());
        assert!(resolved.provider.is_none());
        assert_eq!(resolved.provider_label, "Rule-Based");
        assert_eq!(resolved.model_label, "None");
    }

    #[test]
    fn test_groq_wins_priority() {
        let resolved = ProviderResolver::resolve(
            &creds(&[("OPENAI_API_KEY", "sk-real"), ("GROQ_API_KEY", "gsk_real")]),
            &LlmConfig::default(),
        );
        assert_eq!(resolved.provider_label, "Groq");
        assert_eq!(resolved.model_label, "llama-3.3-70b-versatile");
        assert_eq!(resolved.provider.unwrap().name(), "groq");
    }

    #[test]
    fn test_placeholder_falls_through() {
        let resolved = ProviderResolver::resolve(
            &creds(&[
                ("GROQ_API_KEY", "gsk_your_key_here"),
                ("OPENAI_API_KEY", ""),
                ("ANTHROPIC_API_KEY", "sk-ant-real"),
                ("ANTHROPIC_MODEL", "claude-sonnet-4-5"),
            ]),
            &LlmConfig::default(),
        );
        assert_eq!(resolved.provider_label, "Anthropic");
        assert_eq!(resolved.model_label, "claude-sonnet-4-5");
    }

    #[test]
    fn test_model_override() {
        let c = creds(&[("OPENAI_MODEL", "gpt-4.1")]);
        assert_eq!(BackendKind::OpenAi.model(&c), "gpt-4.1");
        assert_eq!(BackendKind::Groq.model(&c), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_debug_hides_provider() {
        let resolved =
            ProviderResolver::resolve(&creds(&[("GROQ_API_KEY", "gsk_abc")]), &LlmConfig::default());
        let rendered = format!("{:?}", resolved);
        assert!(!rendered.contains("gsk_abc"));
        assert!(rendered.contains("configured: true"));
    }
}

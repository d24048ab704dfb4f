//! Providers Command
//!
//! Shows which model backend an `optimize` run would use.
//!
//! Usage:
//!   karoo providers [--check]

use crate::ai::provider::{BackendKind, CredentialSource, EnvCredentials, ProviderResolver};
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Key state of one backend, without revealing the key
fn key_status(kind: BackendKind, creds: &dyn CredentialSource) -> &'static str {
    match (creds.get(kind.key_var()), kind.api_key(creds)) {
        (_, Some(_)) => "configured",
        (Some(raw), None) if !raw.is_empty() => "placeholder (ignored)",
        _ => "not set",
    }
}

pub async fn run(check: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let creds = EnvCredentials;
    let ui = Output::new();

    ui.section("Model backends (priority order)");
    for kind in BackendKind::ALL {
        ui.field(
            kind.label(),
            &format!(
                "{}: {}, model {}",
                kind.key_var(),
                key_status(kind, &creds),
                kind.model(&creds)
            ),
        );
    }

    let resolved = ProviderResolver::resolve(&creds, &config.llm);
    ui.section("Selected");
    match &resolved.provider {
        Some(provider) => {
            ui.success(&format!(
                "{} ({})",
                resolved.provider_label, resolved.model_label
            ));
            if check {
                match provider.health_check().await {
                    Ok(true) => ui.success("Backend reachable"),
                    Ok(false) => ui.warning("Backend answered but reported unhealthy"),
                    Err(e) => ui.error(&format!("Health check failed: {}", e)),
                }
            }
        }
        None => ui.info("Rule-based mode: set GROQ_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY"),
    }

    Ok(())
}

//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/karoo/config.toml)
//! 3. Project config (.karoo/config.toml)
//! 4. Environment variables (KAROO_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use super::types::Config;
use crate::types::{KarooError, Result};

const ENV_PREFIX: &str = "KAROO_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let figment = Self::figment(
            Self::global_config_path(),
            Some(Self::project_config_path()),
            ENV_PREFIX,
        );
        Self::extract(figment)
    }

    fn figment(global: Option<PathBuf>, project: Option<PathBuf>, env_prefix: &str) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = project
            && project_path.exists()
        {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // KAROO_ORCHESTRATION__AGENT_TIMEOUT_SECS -> orchestration.agent_timeout_secs
        figment.merge(Env::prefixed(env_prefix).split("__").lowercase(true))
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| KarooError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory: `$XDG_CONFIG_HOME/karoo`, else the platform
    /// config dir.
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|p| PathBuf::from(p).join("karoo"))
            .or_else(|| {
                directories::ProjectDirs::from("", "", "karoo")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".karoo/config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;
        println!("{}", Self::render(&config, as_json)?);
        Ok(())
    }

    fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| KarooError::Config(e.to_string()))
        }
    }

    /// Write the default global config file
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            KarooError::Config("Cannot determine global config directory".to_string())
        })?;
        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::render(&Config::default(), false)?)?;
            info!("Created global config: {}", config_path.display());
        } else {
            info!("Global config exists: {}", config_path.display());
        }

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{ExperienceLevel, TargetMarket};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults_without_files() {
        let config = ConfigLoader::extract(ConfigLoader::figment(
            None,
            None,
            "KAROO_TEST_DEFAULTS_",
        ))
        .unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.orchestration.agent_timeout_secs, 90);
    }

    #[test]
    fn test_global_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[orchestration]
agent_timeout_secs = 30

[profile]
target_market = "South Africa"
experience_level = "Senior"
"#
        )
        .unwrap();

        let config = ConfigLoader::extract(ConfigLoader::figment(
            Some(file.path().to_path_buf()),
            None,
            "KAROO_TEST_FILE_",
        ))
        .unwrap();
        assert_eq!(config.orchestration.agent_timeout_secs, 30);
        assert_eq!(config.orchestration.rewrite_timeout_secs, 180);
        assert_eq!(config.profile.target_market, TargetMarket::SouthAfrica);
        assert_eq!(config.profile.experience_level, ExperienceLevel::Senior);
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[retry]\nmax_retries = 5\nbase_delay_ms = 10\n").unwrap();
        fs::write(&project, "[retry]\nmax_retries = 1\n").unwrap();

        let config = ConfigLoader::extract(ConfigLoader::figment(
            Some(global),
            Some(project),
            "KAROO_TEST_LAYERS_",
        ))
        .unwrap();
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.base_delay_ms, 10);
    }

    #[test]
    fn test_env_override() {
        // SAFETY: the prefix is unique to this test
        unsafe {
            std::env::set_var("KAROO_TEST_ENV_LLM__MAX_TOKENS", "512");
        }
        let config =
            ConfigLoader::extract(ConfigLoader::figment(None, None, "KAROO_TEST_ENV_")).unwrap();
        assert_eq!(config.llm.max_tokens, 512);
        unsafe {
            std::env::remove_var("KAROO_TEST_ENV_LLM__MAX_TOKENS");
        }
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\ntemperature = 9.0").unwrap();
        let result = ConfigLoader::extract(ConfigLoader::figment(
            None,
            Some(file.path().to_path_buf()),
            "KAROO_TEST_INVALID_",
        ));
        assert!(matches!(result, Err(KarooError::Config(_))));
    }
}

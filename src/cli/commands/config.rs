//! Config Command
//!
//! Manage Karoo configuration.
//!
//! Usage:
//!   karoo config show [-f toml|json]
//!   karoo config path
//!   karoo config init [--force]

use clap::ValueEnum;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

/// Show the merged effective configuration
pub fn show(format: ConfigFormat) -> Result<()> {
    ConfigLoader::show_config(format == ConfigFormat::Json)
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write the default global configuration
pub fn init(force: bool) -> Result<()> {
    let config_path = ConfigLoader::init_global(force)?;
    let ui = Output::new();
    ui.success("Initialized global configuration");
    ui.field("Config", &config_path.display().to_string());
    Ok(())
}

//! Optimize Command
//!
//! Runs the full optimization pipeline on a CV and job description.
//!
//! Usage:
//!   karoo optimize --cv cv.txt --jd jd.txt [--market sa] [--level senior]
//!                  [--industry fintech] [--role "Data Lead"]
//!                  [--no-cover-letter] [--no-rewrite] [--core-only]
//!                  [--format text|json] [--output report.txt]

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::info;

use crate::agents::{AnalysisContext, ExperienceLevel, TargetMarket};
use crate::ai::provider::EnvCredentials;
use crate::cli::progress::ConsoleProgress;
use crate::cli::report::render_text;
use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::optimizer::{OptimizationResult, Optimizer};
use crate::types::{KarooError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct OptimizeOptions {
    pub cv: PathBuf,
    pub jd: PathBuf,
    pub market: Option<TargetMarket>,
    pub level: Option<ExperienceLevel>,
    pub industry: Option<String>,
    pub role: Option<String>,
    pub no_cover_letter: bool,
    pub no_rewrite: bool,
    pub core_only: bool,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

impl OptimizeOptions {
    /// Profile defaults from config, overridden by flags
    pub fn context(&self, config: &Config) -> AnalysisContext {
        let mut ctx = AnalysisContext::from_profile(&config.profile);
        if let Some(market) = self.market {
            ctx.target_market = market;
        }
        if let Some(level) = self.level {
            ctx.experience_level = level;
        }
        if let Some(industry) = &self.industry {
            ctx.industry = industry.clone();
        }
        if let Some(role) = &self.role {
            ctx.target_role = role.clone();
        }
        ctx.generate_cover_letter = !self.no_cover_letter;
        ctx.rewrite_cv = !self.no_rewrite;
        ctx.run_optional_agents = !self.core_only;
        ctx
    }
}

/// Progress is drawn for text reports unless `--quiet`
pub fn shows_progress(quiet: bool, format: ReportFormat) -> bool {
    !quiet && format == ReportFormat::Text
}

async fn read_input(path: &Path, what: &str) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        KarooError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot read {} '{}': {}", what, path.display(), e),
        ))
    })
}

fn render(result: &OptimizationResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(result)),
        ReportFormat::Json => result.to_json(),
    }
}

pub async fn run(opts: OptimizeOptions) -> Result<()> {
    let config = ConfigLoader::load()?;
    config.validate()?;

    let cv = read_input(&opts.cv, "CV").await?;
    let jd = read_input(&opts.jd, "job description").await?;
    let ctx = opts.context(&config);
    info!(
        "Optimizing {} for {} ({} level)",
        opts.cv.display(),
        ctx.target_market,
        ctx.experience_level
    );

    let optimizer = Optimizer::from_config(&config, &EnvCredentials);
    let progress = if shows_progress(opts.quiet, opts.format) {
        ConsoleProgress::new()
    } else {
        ConsoleProgress::hidden()
    };
    let result = optimizer.optimize(&cv, &jd, &ctx, &progress).await;
    let rendered = render(&result, opts.format)?;

    let ui = Output::new();
    match &opts.output {
        Some(path) => {
            tokio::fs::write(path, &rendered).await?;
            if opts.format == ReportFormat::Text && !opts.quiet {
                ui.header("Karoo Optimization");
                ui.score("Overall", result.summary.overall_score);
                ui.field("Verdict", &result.summary.verdict);
                ui.field("Send first", &result.summary.recommended_variant);
                ui.field(
                    "Mode",
                    &format!("{} ({})", result.llm_provider, result.llm_model),
                );
                ui.success(&format!("Report written to {}", path.display()));
            }
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

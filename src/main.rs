use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use karoo::agents::{ExperienceLevel, TargetMarket};
use karoo::cli::commands::config::ConfigFormat;
use karoo::cli::commands::optimize::{OptimizeOptions, ReportFormat, shows_progress};
use karoo::cli::{ConsoleProgress, default_log_level};

#[derive(Parser)]
#[command(name = "karoo")]
#[command(
    version,
    about = "Multi-agent CV optimizer: ATS scoring, market fit, cover letters and rewrites"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, short, global = true, help = "Only log errors, hide progress")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CV against a job description
    Optimize {
        #[arg(long, help = "Plain-text CV")]
        cv: PathBuf,
        #[arg(long, help = "Plain-text job description")]
        jd: PathBuf,
        #[arg(long, help = "Target market: sa, international, both")]
        market: Option<TargetMarket>,
        #[arg(long, help = "Experience level: entry, mid, senior, executive")]
        level: Option<ExperienceLevel>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long, help = "Target role title")]
        role: Option<String>,
        #[arg(long, help = "Skip the cover letter")]
        no_cover_letter: bool,
        #[arg(long, help = "Skip the AI rewrite (template variants only)")]
        no_rewrite: bool,
        #[arg(long, help = "Skip the interview coach and salary agents")]
        core_only: bool,
        #[arg(short = 'f', long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        #[arg(short, long, help = "Write the report to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show which model backend would be used
    Providers {
        #[arg(long, help = "Send a health-check request to the selected backend")]
        check: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'f', long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Show configuration file paths
    Path,
    /// Write the default global configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        // The optimizer turns these into degraded agent outputs
        if karoo::optimizer::panic_is_contained() {
            tracing::debug!("Contained agent panic: {}", panic_info);
            return;
        }

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mKaroo encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let progress_visible = match &cli.command {
        Commands::Optimize { format, .. } => {
            shows_progress(cli.quiet, *format) && ConsoleProgress::terminal_attached()
        }
        _ => false,
    };
    let filter = default_log_level(cli.verbose, cli.quiet, progress_visible);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Optimize {
            cv,
            jd,
            market,
            level,
            industry,
            role,
            no_cover_letter,
            no_rewrite,
            core_only,
            format,
            output,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(karoo::cli::commands::optimize::run(OptimizeOptions {
                cv,
                jd,
                market,
                level,
                industry,
                role,
                no_cover_letter,
                no_rewrite,
                core_only,
                format,
                output,
                quiet: cli.quiet,
            }))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                karoo::cli::commands::config::show(format)?;
            }
            ConfigAction::Path => {
                karoo::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                karoo::cli::commands::config::init(force)?;
            }
        },
        Commands::Providers { check } => {
            let rt = Runtime::new()?;
            rt.block_on(karoo::cli::commands::providers::run(check))?;
        }
    }

    Ok(())
}

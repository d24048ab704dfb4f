//! Karoo - Multi-Agent CV Optimizer
//!
//! Scores a CV against a job description with ten specialist agents running
//! concurrently, folds their scores into one weighted verdict, and produces a
//! ranked action list, a cover letter and three rewritten CV variants.
//!
//! ## Core Features
//!
//! - **Concurrent Agents**: every agent bounded by a timeout, failures degrade
//!   to placeholder outputs instead of failing the run
//! - **Market Weighting**: South African, international or blended weights
//! - **Rule-Based Mode**: every agent works without an API key
//! - **Model Backends**: Groq, OpenAI and Anthropic, picked from the environment
//!
//! ## Quick Start
//!
//! ```ignore
//! use karoo::{AnalysisContext, Config, EnvCredentials, NoProgress, Optimizer};
//!
//! let config = Config::default();
//! let optimizer = Optimizer::from_config(&config, &EnvCredentials);
//! let result = optimizer
//!     .optimize(&cv, &jd, &AnalysisContext::default(), &NoProgress)
//!     .await;
//! println!("{}/100: {}", result.summary.overall_score, result.summary.verdict);
//! ```
//!
//! ## Modules
//!
//! - [`agents`]: the specialists, their registry and shared model runtime
//! - [`ai`]: model backends, backend resolution and phase timeouts
//! - [`optimizer`]: fan-out, synthesis, action compilation and CV variants
//! - [`config`]: layered configuration

pub mod agents;
pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod optimizer;
pub mod types;

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::{ErrorCategory, KarooError, Result};

// Agents
pub use agents::{
    Agent, AgentKind, AgentOutput, AgentRegistry, AnalysisContext, CvVariant, ExperienceLevel,
    TargetMarket,
};

// AI
pub use ai::{
    CredentialSource, EnvCredentials, LlmProvider, ProviderResolver, ResolvedProvider,
    SharedProvider, TimeoutConfig,
};

// Pipeline
pub use optimizer::{
    CvVariants, NoProgress, OptimizationResult, Optimizer, ProgressSink, Summary, Tier,
};

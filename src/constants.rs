//! Global Constants
//!
//! Centralized constants for orchestration, scoring and provider tuning.
//! All magic numbers should be defined here with documentation.

/// Orchestration bounds and degraded-output shape
pub mod orchestration {
    /// Per-agent timeout during fan-out (seconds)
    pub const AGENT_TIMEOUT_SECS: u64 = 90;

    /// Cover letter phase timeout (seconds)
    pub const COVER_LETTER_TIMEOUT_SECS: u64 = 75;

    /// Rewrite phase timeout (seconds); three variants in one phase
    pub const REWRITE_TIMEOUT_SECS: u64 = 180;

    /// Score assigned to a placeholder output after timeout or failure
    pub const DEGRADED_SCORE: i64 = 50;

    /// Weight of a placeholder output
    pub const DEGRADED_WEIGHT: f64 = 1.0;

    /// Error messages are cut to this many characters in placeholder findings
    pub const ERROR_MESSAGE_CHARS: usize = 80;

    /// Letter text used when the cover letter phase fails
    pub const COVER_LETTER_FAILED: &str =
        "[Cover letter generation failed: ensure API key is set]";
}

/// Progress milestones reported to the progress sink
pub mod progress {
    /// First report, before any agent finishes
    pub const START: f32 = 0.03;

    /// Share of the bar spent on the fan-out phase
    pub const FAN_OUT_SPAN: f32 = 0.77;

    pub const SYNTHESIS: f32 = 0.82;
    pub const COVER_LETTER: f32 = 0.86;
    pub const REWRITE: f32 = 0.90;
    pub const ACTIONS: f32 = 0.97;
    pub const DONE: f32 = 1.0;
}

/// Score synthesis and action ranking
pub mod scoring {
    /// Urgency = 1 + (100 - score) / URGENCY_DIVISOR
    pub const URGENCY_DIVISOR: f64 = 35.0;

    /// Recommendations considered per agent
    pub const RECOMMENDATIONS_PER_AGENT: usize = 5;

    /// Recommendations of this many characters or fewer are ignored
    pub const MIN_RECOMMENDATION_CHARS: usize = 12;

    /// Dedup key length (characters of the lower-cased recommendation)
    pub const DEDUP_PREFIX_CHARS: usize = 65;

    /// Maximum length of the compiled action list
    pub const MAX_ACTION_ITEMS: usize = 18;

    /// Action items copied into the summary
    pub const SUMMARY_ACTION_ITEMS: usize = 5;

    /// Upper bound of the interview probability proxy
    pub const INTERVIEW_PROBABILITY_CAP: f64 = 97.0;

    /// Tier thresholds on the overall score
    pub const EXCELLENT_THRESHOLD: f64 = 85.0;
    pub const STRONG_THRESHOLD: f64 = 70.0;
    pub const GOOD_THRESHOLD: f64 = 55.0;
}

/// Model invocation retry policy
pub mod retry {
    /// Retries after the first attempt (3 attempts total)
    pub const MAX_RETRIES: usize = 2;

    /// First backoff delay; doubles on each retry (milliseconds)
    pub const BASE_DELAY_MS: u64 = 1000;
}

/// LLM request defaults shared by every backend
pub mod llm {
    pub const TEMPERATURE: f32 = 0.3;
    pub const MAX_TOKENS: usize = 2000;

    /// HTTP request timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Prompt excerpt sizes (characters)
    pub const CV_EXCERPT_CHARS: usize = 4000;
    pub const JD_EXCERPT_CHARS: usize = 2500;
}

/// Backend candidates, in resolution priority order
pub mod providers {
    pub const GROQ_KEY_VAR: &str = "GROQ_API_KEY";
    pub const GROQ_MODEL_VAR: &str = "GROQ_MODEL";
    pub const GROQ_PLACEHOLDER: &str = "gsk_your";
    pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
    pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

    pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
    pub const OPENAI_MODEL_VAR: &str = "OPENAI_MODEL";
    pub const OPENAI_PLACEHOLDER: &str = "sk-your";
    pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

    pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
    pub const ANTHROPIC_MODEL_VAR: &str = "ANTHROPIC_MODEL";
    pub const ANTHROPIC_PLACEHOLDER: &str = "sk-ant-your";
    pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
    pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";

    /// Labels reported when no backend is configured
    pub const RULE_BASED_LABEL: &str = "Rule-Based";
    pub const NO_MODEL_LABEL: &str = "None";
}

//! Per-request analysis context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ProfileConfig;

/// Job market the CV is tuned for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMarket {
    #[serde(rename = "South Africa", alias = "south_africa")]
    SouthAfrica,
    #[serde(alias = "international")]
    International,
    #[default]
    #[serde(alias = "both")]
    Both,
}

impl fmt::Display for TargetMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SouthAfrica => write!(f, "South Africa"),
            Self::International => write!(f, "International"),
            Self::Both => write!(f, "Both"),
        }
    }
}

impl FromStr for TargetMarket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "sa" | "za" | "south africa" => Ok(Self::SouthAfrica),
            "intl" | "international" => Ok(Self::International),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown market '{}': expected sa, international or both",
                other
            )),
        }
    }
}

/// Candidate seniority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(alias = "entry")]
    Entry,
    #[default]
    #[serde(alias = "mid")]
    Mid,
    #[serde(alias = "senior")]
    Senior,
    #[serde(alias = "executive")]
    Executive,
}

impl ExperienceLevel {
    /// Years of experience typically expected at this level
    pub fn expected_years(self) -> u32 {
        match self {
            Self::Entry => 2,
            Self::Mid => 5,
            Self::Senior => 10,
            Self::Executive => 18,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "Entry"),
            Self::Mid => write!(f, "Mid"),
            Self::Senior => write!(f, "Senior"),
            Self::Executive => write!(f, "Executive"),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" | "junior" | "graduate" => Ok(Self::Entry),
            "mid" => Ok(Self::Mid),
            "senior" => Ok(Self::Senior),
            "exec" | "executive" => Ok(Self::Executive),
            other => Err(format!(
                "unknown level '{}': expected entry, mid, senior or executive",
                other
            )),
        }
    }
}

/// Insights handed to the CV rewriter after synthesis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewriteHints {
    pub missing_keywords: Vec<String>,
    pub overall_score: f64,
    pub top_fixes: Vec<String>,
}

/// Immutable request context shared by every agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub target_market: TargetMarket,
    pub experience_level: ExperienceLevel,
    pub industry: String,
    pub target_role: String,
    pub generate_cover_letter: bool,
    pub rewrite_cv: bool,
    /// Schedule the interview coach and salary agents
    pub run_optional_agents: bool,
    /// Set by the optimizer before the rewrite phase only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite_hints: Option<RewriteHints>,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self {
            target_market: TargetMarket::default(),
            experience_level: ExperienceLevel::default(),
            industry: String::new(),
            target_role: String::new(),
            generate_cover_letter: true,
            rewrite_cv: true,
            run_optional_agents: true,
            rewrite_hints: None,
        }
    }
}

impl AnalysisContext {
    pub fn new(target_market: TargetMarket, experience_level: ExperienceLevel) -> Self {
        Self {
            target_market,
            experience_level,
            ..Default::default()
        }
    }

    /// Context seeded from the `[profile]` config section
    pub fn from_profile(profile: &ProfileConfig) -> Self {
        Self {
            target_market: profile.target_market,
            experience_level: profile.experience_level,
            industry: profile.industry.clone(),
            target_role: profile.target_role.clone(),
            ..Default::default()
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    pub fn with_target_role(mut self, role: impl Into<String>) -> Self {
        self.target_role = role.into();
        self
    }

    /// Derived context carrying rewrite hints; the original is untouched.
    pub fn with_rewrite_hints(&self, hints: RewriteHints) -> Self {
        Self {
            rewrite_hints: Some(hints),
            ..self.clone()
        }
    }

    /// Industry for prompts, with a placeholder when unset
    pub fn industry_or(&self, default: &str) -> String {
        if self.industry.trim().is_empty() {
            default.to_string()
        } else {
            self.industry.clone()
        }
    }

    /// Target role for prompts, with a placeholder when unset
    pub fn target_role_or(&self, default: &str) -> String {
        if self.target_role.trim().is_empty() {
            default.to_string()
        } else {
            self.target_role.clone()
        }
    }
}

//! Compensation positioning for the South African market: a benchmark band
//! per level, industry premiums, and how much negotiating leverage the CV
//! gives the candidate.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::{count_present, present};
use super::{Agent, AgentKind, AgentOutput, AnalysisContext, ExperienceLevel};
use crate::constants::llm::{CV_EXCERPT_CHARS, JD_EXCERPT_CHARS};
use crate::types::{Result, format_thousands, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Salary Intelligence Agent, a compensation expert for South African \
and international markets: SA salary bands by industry, level and location, JSE-listed versus private \
versus public sector structures, CTC versus take-home, benefits benchmarking and negotiation psychology.

Rough SA CTC bands: Graduate R180k-R350k, Mid R350k-R700k, Senior R700k-R1.5M, Executive R1.5M-R5M+. \
Tech roles carry +20-40%, financial services +15-30%, mining +10-20%.

Respond in EXACTLY this layout:

SALARY_SCORE: [0-100] (how well this CV supports negotiating the top of the band)
MARKET_RATE_SA: Min:[R X] Mid:[R X] Max:[R X] CTC per annum
MARKET_RATE_INTL: UK:[GBP X] US:[USD X] UAE:[AED X] per annum
PERCENTILE_FIT: [X]th percentile
NEGOTIATION_POWER: [Weak/Moderate/Strong/Very Strong, with reason]
UNIQUE_VALUE_PROPS: [premium-commanding factors, comma-separated]
NEGOTIATION_SCRIPT: [exact words to use when asked for salary expectations]
BENEFITS_TO_REQUEST: [comma-separated]
RED_FLAGS: [factors reducing leverage OR NONE]
FIXES:
- [fix 1]
- [fix 2]
- [fix 3]
SALARY_SUMMARY: [2-3 sentence positioning statement]";

/// Annual CTC in rand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SalaryBand {
    min: i64,
    mid: i64,
    max: i64,
}

impl SalaryBand {
    fn for_level(level: ExperienceLevel) -> Self {
        let (min, mid, max) = match level {
            ExperienceLevel::Entry => (180_000, 265_000, 380_000),
            ExperienceLevel::Mid => (350_000, 550_000, 750_000),
            ExperienceLevel::Senior => (700_000, 1_100_000, 1_600_000),
            ExperienceLevel::Executive => (1_500_000, 2_500_000, 5_000_000),
        };
        Self { min, mid, max }
    }

    fn adjusted(self, premium_pct: i64) -> Self {
        let scale = |v: i64| v * (100 + premium_pct) / 100;
        Self {
            min: scale(self.min),
            mid: scale(self.mid),
            max: scale(self.max),
        }
    }
}

/// Checked in order; the first industry substring wins
const INDUSTRY_PREMIUMS: &[(&str, i64)] = &[
    ("fintech", 35),
    ("finance", 25),
    ("banking", 25),
    ("tech", 30),
    ("mining", 20),
    ("engineering", 15),
    ("healthcare", 10),
    ("retail", -10),
    ("ngo", -20),
    ("government", -15),
];

const TECH_TERMS: &[&str] = &["python", "aws", "kubernetes", "ml", "ai ", "data science", "cloud"];
const TECH_PREMIUM: i64 = 25;

const SCARCE_SKILLS: &[&str] = &[
    "actuari", "blockchain", "quantum", "llm", "genai", "kubernetes", "devsecops", "ml engineer",
    "data science", "cybersecur",
];

static ACHIEVEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+%|\$[\d,]+|R\s?[\d,]+|saved|reduced|increased|grew")
        .expect("valid achievement regex")
});

const DEFAULT_FIXES: [&str; 3] = [
    "Add more quantified achievements: each metric adds 5-10% negotiating power",
    "Include LinkedIn profile with recommendations: validates market value",
    "Research the company's remuneration strategy (annual report, Glassdoor SA)",
];

fn industry_premium(cv: &str, industry: &str) -> i64 {
    let industry = industry.to_lowercase();
    if let Some((_, pct)) = INDUSTRY_PREMIUMS
        .iter()
        .find(|(key, _)| industry.contains(key))
    {
        return *pct;
    }
    if count_present(&cv.to_lowercase(), TECH_TERMS) >= 3 {
        TECH_PREMIUM
    } else {
        0
    }
}

fn metrics_strength(cv: &str) -> String {
    match ACHIEVEMENT_RE.find_iter(cv).count() {
        n if n >= 8 => format!("Excellent ({} quantified achievements)", n),
        n if n >= 4 => format!("Good ({} quantified achievements)", n),
        n if n >= 1 => format!("Weak ({}: add more metrics)", n),
        _ => "None: major negotiation weakness".to_string(),
    }
}

fn skill_scarcity(cv: &str) -> String {
    let found = present(&cv.to_lowercase(), SCARCE_SKILLS);
    if found.is_empty() {
        "Standard skill profile: differentiate on achievements".to_string()
    } else {
        format!(
            "High demand skills: {}: strong leverage",
            found[..found.len().min(3)].join(", ")
        )
    }
}

fn rand(amount: i64) -> String {
    format!("R{}", format_thousands(amount))
}

pub struct SalaryIntelligence {
    runtime: AgentRuntime,
}

impl SalaryIntelligence {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for SalaryIntelligence {
    fn kind(&self) -> AgentKind {
        AgentKind::SalaryIntelligence
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let base = SalaryBand::for_level(ctx.experience_level);
        let premium = industry_premium(cv, &ctx.industry);
        let band = base.adjusted(premium);
        let strength = metrics_strength(cv);
        let scarcity = skill_scarcity(cv);

        let prompt = format!(
            "CV TEXT:\n{}\n\nJOB DESCRIPTION:\n{}\n\nCONTEXT:\n\
             - Target Market: {}\n- Experience Level: {}\n- Industry: {}\n- Target Role: {}\n\n\
             Pre-analysis:\n- Estimated base SA salary band: {} - {} CTC\n\
             - Industry premium adjustment: {:+}%\n- Quantified achievements on CV: {}\n\
             - Skill scarcity indicator: {}\n\n\
             Generate precise salary intelligence and a negotiation strategy for this CV and role, \
             with realistic figures for the South African market.",
            truncate_chars(cv, CV_EXCERPT_CHARS),
            truncate_chars(jd, JD_EXCERPT_CHARS),
            ctx.target_market,
            ctx.experience_level,
            ctx.industry_or("Not specified"),
            ctx.target_role_or("Not specified"),
            rand(base.min),
            rand(base.max),
            premium,
            strength,
            scarcity,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields.int_or("SALARY_SCORE", 65);

        let findings = vec![
            format!("Salary Negotiation Power: {}/100", score.clamp(0, 100)),
            format!(
                "SA Market Rate (estimated): {} - {} CTC",
                rand(band.min),
                rand(band.max)
            ),
            format!("Market Mid-Point: {} CTC per annum", rand(band.mid)),
            format!(
                "Industry Premium: {:+}% ({})",
                premium,
                ctx.industry_or("General")
            ),
            format!("Metrics Strength: {}", strength),
            format!("Skill Scarcity: {}", scarcity),
            format!(
                "Negotiation Power: {}",
                fields.section_or("NEGOTIATION_POWER", 150, "See analysis")
            ),
        ];
        let recommendations = fields
            .fixes("SALARY_SUMMARY", 5)
            .unwrap_or_else(|| DEFAULT_FIXES.iter().map(|s| s.to_string()).collect());

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(recommendations)
            .with_content(fields.section("NEGOTIATION_SCRIPT"))
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_first_industry_match_wins() {
        assert_eq!(industry_premium("", "Fintech"), 35);
        assert_eq!(industry_premium("", "Investment Banking"), 25);
        assert_eq!(industry_premium("", "Government"), -15);
        assert_eq!(industry_premium("python, aws and cloud", ""), 25);
        assert_eq!(industry_premium("python", ""), 0);
    }

    #[test]
    fn test_band_adjustment() {
        let band = SalaryBand::for_level(ExperienceLevel::Entry).adjusted(35);
        assert_eq!(band, SalaryBand { min: 243_000, mid: 357_750, max: 513_000 });
        let cut = SalaryBand::for_level(ExperienceLevel::Mid).adjusted(-10);
        assert_eq!(cut.min, 315_000);
    }

    #[test]
    fn test_metrics_strength_tiers() {
        assert!(metrics_strength("nothing").starts_with("None"));
        assert!(metrics_strength("grew 10%").starts_with("Weak (2"));
        assert!(metrics_strength("10% 20% 30% saved").starts_with("Good (4"));
    }

    #[tokio::test]
    async fn test_rule_based_findings() {
        let ctx = AnalysisContext::new(Default::default(), ExperienceLevel::Senior)
            .with_industry("Mining");
        let out = SalaryIntelligence::new(AgentRuntime::rule_based())
            .analyze("Geologist", "Senior geologist", &ctx)
            .await
            .unwrap();
        assert_eq!(out.score(), 65);
        assert!(out
            .findings
            .contains(&"SA Market Rate (estimated): R840,000 - R1,920,000 CTC".to_string()));
        assert!(out.findings.contains(&"Industry Premium: +20% (Mining)".to_string()));
        assert_eq!(out.recommendations.len(), 3);
    }
}

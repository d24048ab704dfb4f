//! Hiring-manager read: vague skill claims, evidence (portfolio, metrics)
//! and whether claimed experience fits the target level.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::years_claimed;
use super::{Agent, AgentKind, AgentOutput, AnalysisContext, ExperienceLevel};
use crate::constants::llm::CV_EXCERPT_CHARS;
use crate::types::{Result, dedup_preserving_order, join_or, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Hiring Manager Whisperer. You read a CV exactly like a senior \
hiring manager doing a technical deep-dive.

Respond in EXACTLY this layout:

HM_SCORE: [0-100]
TECHNICAL_CLAIMS: [count]
EVIDENCED_CLAIMS: [count with evidence]
VAGUE_SKILLS: [comma-separated OR NONE]
PORTFOLIO_PRESENT: [YES/NO]
CULTURE_FIT_SIGNALS: [positive culture indicators OR NONE]
SENIORITY_MATCH: [UNDER/MATCH/OVER, with reason]
CONVERSATION_STARTERS:
- [interview question from the CV]
- [interview question from the CV]
- [interview question from the CV]
FIXES:
- [fix 1]
- [fix 2]
- [fix 3]
EVIDENCE_REWRITE: [weakest technical claim rewritten with what was built, tools, scale and outcome]";

const VAGUE_PHRASES: &[&str] = &[
    "experienced? in",
    "knowledge of",
    "familiar with",
    "proficient in",
    "understanding of",
    "exposure to",
    "worked with",
];

static VAGUE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    VAGUE_PHRASES
        .iter()
        .map(|phrase| {
            Regex::new(&format!(r"(?i){} ([A-Za-z\s\./\+]{{3,25}})", phrase))
                .expect("valid vague claim regex")
        })
        .collect()
});

static PORTFOLIO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)github|gitlab|portfolio|bitbucket|behance|dribbble")
        .expect("valid portfolio regex")
});
static EVIDENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+%|\$\d+|R\s?\d+|saved|reduced|increased|achieved")
        .expect("valid evidence regex")
});

const PORTFOLIO_FIX: &str =
    "Add GitHub/portfolio URL: hiring managers verify technical claims immediately";

/// Skills named after hedging phrases ("familiar with X"), first eight unique
fn find_vague_claims(cv: &str) -> Vec<String> {
    let claims = VAGUE_PATTERNS.iter().flat_map(|re| {
        re.captures_iter(cv)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| s.chars().count() > 2)
            .collect::<Vec<_>>()
    });
    let mut unique = dedup_preserving_order(claims);
    unique.truncate(8);
    unique
}

fn seniority_alignment(cv: &str, level: ExperienceLevel) -> String {
    let expected = level.expected_years() as i64;
    match years_claimed(cv).map(i64::from) {
        Some(yrs) if yrs < expected - 2 => format!(
            "Under-experienced ({}yr vs {}yr expected for {})",
            yrs,
            expected,
            level.to_string().to_lowercase()
        ),
        Some(yrs) if yrs > expected + 6 => {
            format!("Potentially overqualified ({}yr): address proactively", yrs)
        }
        _ => "Seniority appears well-matched".to_string(),
    }
}

fn build_fixes(fields: &ResponseFields<'_>, vague: &[String], has_portfolio: bool) -> Vec<String> {
    let mut fixes = fields.fixes("EVIDENCE_REWRITE", 5).unwrap_or_default();
    if !has_portfolio {
        fixes.insert(0, PORTFOLIO_FIX.to_string());
    }
    for skill in vague.iter().take(2) {
        fixes.push(format!(
            "Expand \"{}\": add project context, scale, outcome",
            skill
        ));
    }
    fixes.truncate(8);
    fixes
}

pub struct HiringManagerWhisperer {
    runtime: AgentRuntime,
}

impl HiringManagerWhisperer {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for HiringManagerWhisperer {
    fn kind(&self) -> AgentKind {
        AgentKind::HiringManager
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let vague = find_vague_claims(cv);
        let has_portfolio = PORTFOLIO_RE.is_match(cv);
        let has_metrics = EVIDENCE_RE.is_match(cv);
        let seniority = seniority_alignment(cv, ctx.experience_level);

        let prompt = format!(
            "CV:\n{}\n\nJD:\n{}\n\nContext:\n- Level: {}\n- Industry: {}\n\n\
             Pre-analysis:\n- Vague: {}\n- Portfolio: {}\n- Metrics: {}\n- Seniority match: {}",
            truncate_chars(cv, CV_EXCERPT_CHARS),
            truncate_chars(jd, 2000),
            ctx.experience_level,
            ctx.industry_or("N/A"),
            join_or(&vague, "None"),
            has_portfolio,
            has_metrics,
            seniority,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields.int_or("HM_SCORE", 60);

        let vague_summary = if vague.is_empty() {
            "0: None".to_string()
        } else {
            format!("{}: {}", vague.len(), vague[..vague.len().min(3)].join(", "))
        };
        let findings = vec![
            format!("Hiring Manager Appeal: {}/100", score.clamp(0, 100)),
            format!("Vague Skill Claims: {}", vague_summary),
            format!(
                "Portfolio/GitHub: {}",
                if has_portfolio {
                    "Present"
                } else {
                    "Missing: critical for technical roles"
                }
            ),
            format!(
                "Quantified Metrics: {}",
                if has_metrics { "Present" } else { "Missing: add numbers" }
            ),
            format!("Seniority Alignment: {}", seniority),
            format!(
                "Technical Claims: {} total, {} evidenced",
                fields.line("TECHNICAL_CLAIMS", 80, "N/A"),
                fields.line("EVIDENCED_CLAIMS", 80, "N/A")
            ),
            format!(
                "Culture Signals: {}",
                fields.line("CULTURE_FIT_SIGNALS", 80, "N/A")
            ),
        ];

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(build_fixes(&fields, &vague, has_portfolio))
            .with_content(fields.section("EVIDENCE_REWRITE"))
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vague_claims_deduplicated() {
        let cv = "Familiar with Docker, knowledge of Docker; proficient in Go";
        assert_eq!(find_vague_claims(cv), vec!["Docker"]);
    }

    #[test]
    fn test_seniority_alignment() {
        assert!(seniority_alignment("2 years", ExperienceLevel::Senior).starts_with("Under-experienced"));
        assert!(seniority_alignment("20 years", ExperienceLevel::Mid).starts_with("Potentially overqualified"));
        assert_eq!(
            seniority_alignment("no claim", ExperienceLevel::Mid),
            "Seniority appears well-matched"
        );
    }

    #[tokio::test]
    async fn test_missing_portfolio_leads_fixes() {
        let out = HiringManagerWhisperer::new(AgentRuntime::rule_based())
            .analyze("Exposure to Kubernetes", "Platform engineer", &AnalysisContext::default())
            .await
            .unwrap();
        assert_eq!(out.score(), 60);
        assert_eq!(out.recommendations[0], PORTFOLIO_FIX);
        assert!(out.recommendations.iter().any(|r| r.starts_with("Expand \"Kubernetes\"")));
    }
}

//! Forward-looking positioning: emerging skills, career progression and AI
//! tool fluency.

use async_trait::async_trait;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::{count_present, present};
use super::{Agent, AgentKind, AgentOutput, AnalysisContext};
use crate::constants::llm::CV_EXCERPT_CHARS;
use crate::types::{Result, join_or, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Future-Proof Architect, a career strategist positioning candidates \
for their next role. Differentiating skills right now: GenAI, LLM integration, prompt engineering, \
AI assistants, Power BI, Python, API integration, automation, cloud-native, ESG reporting, OKRs, \
design thinking.

Respond in EXACTLY this layout:

FUTURE_SCORE: [0-100]
CAREER_TRAJECTORY: [honest assessment of direction and velocity]
NEXT_ROLE_READINESS: [X]% ready for [next logical role title]
SKILL_GAPS: [skills needed for the next role, comma-separated]
EMERGING_SKILLS_PRESENT: [trending skills already in the CV OR NONE]
EMERGING_SKILLS_MISSING: [top 3 to add]
AI_READINESS: [LOW/MEDIUM/HIGH]
LEARNING_PATH: [3 prioritized skills with timeline]
FIXES:
- [fix 1]
- [fix 2]
- [fix 3]
CAREER_NARRATIVE: [2-3 sentences showing an upward trajectory toward the next role]";

const EMERGING_SKILLS: &[&str] = &[
    "generative ai", "llm", "prompt engineering", "ai tools", "github copilot", "power bi",
    "tableau", "looker", "esg", "sustainability", "okr", "okrs", "remote leadership", "async",
    "python", "automation", "api integration", "no-code", "low-code", "data-driven",
    "cloud native", "kubernetes", "terraform", "devsecops", "platform engineering", "mlops",
    "rag", "vector database",
];

const PROGRESSION_WORDS: &[&str] = &[
    "promoted", "advanced", "progressed", "grew", "scaled", "elevated", "appointed",
];

const AI_TOOLS: &[&str] = &[
    "chatgpt", "copilot", "claude", "gemini", "midjourney", "stable diffusion", "dall-e", "llm",
    "gpt", "ai ", "machine learning", "automation",
];

const EMERGING_FIX: &str =
    "Add 2-3 emerging skills: GenAI tools, data-driven decision making, automation";

fn assess_progression(cv_lower: &str) -> &'static str {
    match count_present(cv_lower, PROGRESSION_WORDS) {
        n if n >= 3 => "Strong upward progression",
        n if n >= 1 => "Some progression signals",
        _ => "Progression unclear: strengthen career arc",
    }
}

fn assess_ai_readiness(cv_lower: &str) -> &'static str {
    match count_present(cv_lower, AI_TOOLS) {
        n if n >= 4 => "HIGH: AI-native candidate",
        n if n >= 2 => "MEDIUM: AI-aware",
        _ => "LOW: no AI tools mentioned (critical gap)",
    }
}

pub struct FutureArchitect {
    runtime: AgentRuntime,
}

impl FutureArchitect {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for FutureArchitect {
    fn kind(&self) -> AgentKind {
        AgentKind::FutureArchitect
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let cv_lower = cv.to_lowercase();
        let emerging = present(&cv_lower, EMERGING_SKILLS);
        let progression = assess_progression(&cv_lower);
        let ai_readiness = assess_ai_readiness(&cv_lower);

        let prompt = format!(
            "CV:\n{}\n\nJD:\n{}\n\nContext:\n- Level: {}\n- Target: {}\n- Industry: {}\n\n\
             Pre-analysis:\n- Emerging skills present: {}\n- Coverage: {}/{} tracked skills\n\
             - Progression: {}\n- AI Readiness: {}\n\nDesign future-proof positioning.",
            truncate_chars(cv, CV_EXCERPT_CHARS),
            truncate_chars(jd, 1500),
            ctx.experience_level,
            ctx.target_role_or("Similar to current"),
            ctx.industry_or("N/A"),
            join_or(&emerging, "None"),
            emerging.len(),
            EMERGING_SKILLS.len(),
            progression,
            ai_readiness,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields.int_or("FUTURE_SCORE", 60);

        let findings = vec![
            format!("Future-Proof Score: {}/100", score.clamp(0, 100)),
            format!(
                "Career Trajectory: {}",
                fields.line("CAREER_TRAJECTORY", 100, "N/A")
            ),
            format!(
                "Next Role Readiness: {}",
                fields.line("NEXT_ROLE_READINESS", 100, "N/A")
            ),
            format!(
                "Emerging Skills: {}/{}: {}",
                emerging.len(),
                EMERGING_SKILLS.len(),
                join_or(&emerging[..emerging.len().min(4)], "None")
            ),
            format!("AI Readiness: {}", ai_readiness),
            format!("Progression Signal: {}", progression),
        ];

        let mut recommendations = fields.fixes("CAREER_NARRATIVE", 5).unwrap_or_default();
        if emerging.len() < 3 {
            recommendations.push(EMERGING_FIX.to_string());
        }
        recommendations.truncate(8);

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(recommendations)
            .with_content(fields.section("CAREER_NARRATIVE"))
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::testing::StubProvider;
    use crate::config::RetryConfig;
    use std::sync::Arc;

    #[test]
    fn test_progression_levels() {
        assert_eq!(
            assess_progression("promoted twice, scaled the team, appointed lead"),
            "Strong upward progression"
        );
        assert_eq!(assess_progression("grew sales"), "Some progression signals");
        assert!(assess_progression("analyst").starts_with("Progression unclear"));
    }

    #[test]
    fn test_ai_readiness_levels() {
        assert!(assess_ai_readiness("chatgpt, copilot, claude and gemini").starts_with("HIGH"));
        assert!(assess_ai_readiness("llm automation").starts_with("MEDIUM"));
        assert!(assess_ai_readiness("spreadsheets").starts_with("LOW"));
    }

    #[tokio::test]
    async fn test_narrative_from_model() {
        let stub = Arc::new(StubProvider::replying(
            "FUTURE_SCORE: 74\nFIXES:\n- Lead an MLOps pilot\nCAREER_NARRATIVE: Data engineer moving into platform leadership.",
        ));
        let runtime = AgentRuntime::new(Some(stub), RetryConfig::default());
        let out = FutureArchitect::new(runtime)
            .analyze("Python and Terraform engineer", "Platform lead", &AnalysisContext::default())
            .await
            .unwrap();
        assert_eq!(out.score(), 74);
        assert_eq!(
            out.recommendations,
            vec!["Lead an MLOps pilot".to_string(), EMERGING_FIX.to_string()]
        );
        assert_eq!(
            out.optimized_content,
            "Data engineer moving into platform leadership."
        );
    }
}

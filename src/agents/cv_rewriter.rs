//! Full CV rewrites in three styles, requested concurrently.
//!
//! The output's `optimized_content` holds one marker-delimited block per
//! variant the model actually wrote; [`extract_variant`] reads them back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::{AgentRuntime, Reply};
use super::{Agent, AgentKind, AgentOutput, AnalysisContext};
use crate::constants::llm::JD_EXCERPT_CHARS;
use crate::types::{Result, join_or, truncate_chars};

const ATS_MAX_PROMPT: &str = "You are The CV Rewriter in ATS-MAX mode. Rewrite this CV for the highest \
possible ATS parse rate.

Rules:
- Plain text only. No tables, columns or special characters.
- Standard sections: PROFESSIONAL SUMMARY, WORK EXPERIENCE, EDUCATION, SKILLS, CERTIFICATIONS
- The first bullet of each role starts with a power verb and a number
- Integrate every missing keyword naturally, without stuffing
- Remove \"responsible for\", \"duties included\" and \"worked on\"
- Every achievement is Action Verb + Context + Metric
- Professional summary: 2-3 keyword-dense sentences
- Dates formatted as Month YYYY - Month YYYY

Output ONLY the rewritten CV, starting with the candidate's name.";

const BALANCED_PROMPT: &str = "You are The CV Rewriter in BALANCED mode. Rewrite this CV to work for both \
ATS systems and human readers.

Rules:
- Clean, scannable formatting with simple bullet points
- Power verbs and metrics on every achievement
- A strong career narrative in the summary
- JD keywords integrated naturally throughout
- Show progression, not duties
- 3-5 bullets per role
- Remove all weak language

Output ONLY the rewritten CV, starting with the candidate's name.";

const CREATIVE_PROMPT: &str = "You are The CV Rewriter in CREATIVE mode. Rewrite this CV for human appeal: \
startups, agencies, creative and leadership roles.

Rules:
- A compelling career narrative opening
- Conversational but professional tone
- Lead with impact and story, not titles
- Results and achievements front and centre
- A LinkedIn-style profile section
- Still ATS-friendly (75-85% score target)

Output ONLY the rewritten CV, starting with the candidate's name.";

const CV_CHARS: usize = 5000;

/// The three rewrite styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvVariant {
    AtsMax,
    Balanced,
    Creative,
}

impl CvVariant {
    pub const ALL: [CvVariant; 3] = [Self::AtsMax, Self::Balanced, Self::Creative];

    /// Start and end marker lines around this variant's text
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            Self::AtsMax => ("ATS_MAX_CV_START", "ATS_MAX_CV_END"),
            Self::Balanced => ("BALANCED_CV_START", "BALANCED_CV_END"),
            Self::Creative => ("CREATIVE_CV_START", "CREATIVE_CV_END"),
        }
    }

    fn system_prompt(self) -> &'static str {
        match self {
            Self::AtsMax => ATS_MAX_PROMPT,
            Self::Balanced => BALANCED_PROMPT,
            Self::Creative => CREATIVE_PROMPT,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::AtsMax => "ATS-MAX Version",
            Self::Balanced => "Balanced Version",
            Self::Creative => "Creative Version",
        }
    }
}

impl fmt::Display for CvVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtsMax => write!(f, "ATS-MAX"),
            Self::Balanced => write!(f, "BALANCED"),
            Self::Creative => write!(f, "CREATIVE"),
        }
    }
}

/// Text of one variant from rewriter content, `""` when absent
pub fn extract_variant(content: &str, variant: CvVariant) -> String {
    let (start, end) = variant.markers();
    ResponseFields::new(content)
        .between(start, end)
        .unwrap_or_default()
}

fn rewrite_brief(cv: &str, jd: &str, ctx: &AnalysisContext) -> String {
    let hints = ctx.rewrite_hints.clone().unwrap_or_default();
    let keywords = &hints.missing_keywords[..hints.missing_keywords.len().min(15)];
    format!(
        "CANDIDATE CV:\n{}\n\nJOB DESCRIPTION:\n{}\n\nOPTIMIZATION CONTEXT:\n\
         - Target Market: {}\n- Experience Level: {}\n- Industry: {}\n\
         - Missing Keywords to Add: {}\n- Current Overall Score: {:.1}/100\n\
         - Priority Fixes: {}\n\nRewrite the complete CV now:",
        truncate_chars(cv, CV_CHARS),
        truncate_chars(jd, JD_EXCERPT_CHARS),
        ctx.target_market,
        ctx.experience_level,
        ctx.industry_or("Not specified"),
        join_or(keywords, "None"),
        hints.overall_score,
        join_or(&hints.top_fixes, "None"),
    )
}

pub struct CvRewriter {
    runtime: AgentRuntime,
}

impl CvRewriter {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for CvRewriter {
    fn kind(&self) -> AgentKind {
        AgentKind::CvRewriter
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let brief = rewrite_brief(cv, jd, ctx);
        let name = self.kind().display_name();

        let (ats, balanced, creative) = tokio::join!(
            self.runtime.ask(name, CvVariant::AtsMax.system_prompt(), &brief),
            self.runtime.ask(name, CvVariant::Balanced.system_prompt(), &brief),
            self.runtime.ask(name, CvVariant::Creative.system_prompt(), &brief),
        );
        let replies: [(CvVariant, &Reply); 3] = [
            (CvVariant::AtsMax, &ats),
            (CvVariant::Balanced, &balanced),
            (CvVariant::Creative, &creative),
        ];

        let any_ai = replies.iter().any(|(_, r)| r.ai_powered);
        let content = replies
            .iter()
            .filter(|(_, r)| r.ai_powered)
            .map(|(variant, r)| {
                let (start, end) = variant.markers();
                format!("{}\n{}\n{}", start, r.text.trim(), end)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let keyword_count = ctx
            .rewrite_hints
            .as_ref()
            .map_or(0, |h| h.missing_keywords.len());
        let mut findings = vec![format!(
            "CV Rewrite: {}",
            if any_ai { "AI-Powered" } else { "Requires API key" }
        )];
        findings.extend(replies.iter().map(|(variant, r)| {
            format!(
                "{}: {}",
                variant.title(),
                if r.ai_powered { "Generated" } else { "Requires AI" }
            )
        }));
        findings.push(format!("Missing Keywords Integrated: {}", keyword_count));

        let recommendations = vec![
            "Review AI rewrites carefully: verify all facts are accurate".to_string(),
            "Customize company names, dates, and specific metrics before sending".to_string(),
            "Add LinkedIn URL and portfolio links if missing".to_string(),
        ];
        let raw = format!(
            "ats_max={}\nbalanced={}\ncreative={}",
            ats.text, balanced.text, creative.text
        );

        Ok(AgentOutput::new(self.kind(), if any_ai { 85 } else { 0 })
            .with_findings(findings)
            .with_recommendations(recommendations)
            .with_content(content)
            .with_reply(raw, any_ai)
            .timed(started))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::RewriteHints;
    use crate::ai::provider::testing::StubProvider;
    use crate::config::RetryConfig;
    use std::sync::Arc;

    #[test]
    fn test_extract_variant() {
        let content = "ATS_MAX_CV_START\nJane Doe\nEngineer\nATS_MAX_CV_END\n\n\
                       CREATIVE_CV_START\nJane, storyteller\nCREATIVE_CV_END";
        assert_eq!(extract_variant(content, CvVariant::AtsMax), "Jane Doe\nEngineer");
        assert_eq!(extract_variant(content, CvVariant::Balanced), "");
        assert_eq!(extract_variant(content, CvVariant::Creative), "Jane, storyteller");
    }

    #[tokio::test]
    async fn test_rule_based_emits_no_variants() {
        let out = CvRewriter::new(AgentRuntime::rule_based())
            .analyze("Jane Doe", "Engineer", &AnalysisContext::default())
            .await
            .unwrap();
        assert_eq!(out.score(), 0);
        assert!(!out.ai_powered);
        assert_eq!(out.optimized_content, "");
        assert_eq!(out.findings[0], "CV Rewrite: Requires API key");
        assert_eq!(out.findings[1], "ATS-MAX Version: Requires AI");
    }

    #[tokio::test]
    async fn test_model_variants_round_trip_through_markers() {
        let stub = Arc::new(StubProvider::replying("Jane Doe\nPlatform Engineer"));
        let runtime = AgentRuntime::new(Some(stub.clone()), RetryConfig::default());
        let ctx = AnalysisContext::default().with_rewrite_hints(RewriteHints {
            missing_keywords: vec!["kafka".into(), "terraform".into()],
            overall_score: 61.5,
            top_fixes: vec![],
        });
        let out = CvRewriter::new(runtime)
            .analyze("Jane Doe", "Engineer", &ctx)
            .await
            .unwrap();

        assert_eq!(stub.calls(), 3);
        assert_eq!(out.score(), 85);
        assert!(out.ai_powered);
        for variant in CvVariant::ALL {
            assert_eq!(
                extract_variant(&out.optimized_content, variant),
                "Jane Doe\nPlatform Engineer"
            );
        }
        assert_eq!(out.findings.last().unwrap(), "Missing Keywords Integrated: 2");
    }

    #[test]
    fn test_brief_carries_hints() {
        let ctx = AnalysisContext::default().with_rewrite_hints(RewriteHints {
            missing_keywords: vec!["kafka".into()],
            overall_score: 72.0,
            top_fixes: vec!["Quantify the Acme role".into()],
        });
        let brief = rewrite_brief("cv", "jd", &ctx);
        assert!(brief.contains("Missing Keywords to Add: kafka"));
        assert!(brief.contains("Current Overall Score: 72.0/100"));
        assert!(brief.contains("Priority Fixes: Quantify the Acme role"));
    }
}

//! Semantic overlap between CV and job description: term-frequency cosine,
//! synonym bridges through a small skill ontology, and tone alignment.

use async_trait::async_trait;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::{cosine_similarity, count_present};
use super::{Agent, AgentKind, AgentOutput, AnalysisContext};
use crate::types::{Result, join_or, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Semantic Matcher, an NLP specialist in cosine similarity, TF-IDF \
and skill ontology mapping.

Respond in EXACTLY this layout:

SEMANTIC_SCORE: [0-100]
COSINE_ESTIMATE: [X]%
SEMANTIC_GAPS: [JD concepts not covered by the CV, comma-separated]
HIDDEN_MATCHES: [CV_term->JD_term bridges, comma-separated]
TONE_ALIGNMENT: [Startup/Corporate/Government/Academic] [X]% aligned
IMPLICIT_REQUIREMENTS: [unstated requirements inferred from the JD, comma-separated]
DOMAIN_FLUENCY: [X]%, how native the candidate sounds in this domain
FIXES:
- [improvement 1]
- [improvement 2]
- [improvement 3]
SEMANTIC_BRIDGE: [2-3 sentences restating the candidate's experience in the JD's language]";

/// Concept followed by the terms that imply it
const SKILL_ONTOLOGY: &[(&str, &[&str])] = &[
    (
        "agile",
        &["scrum", "kanban", "sprint", "backlog", "standup", "retro", "velocity", "jira"],
    ),
    (
        "leadership",
        &["managed", "led", "mentored", "coached", "directed", "supervised", "head of", "oversaw"],
    ),
    (
        "data analysis",
        &[
            "analytics", "insights", "reporting", "dashboards", "kpi", "metrics", "tableau",
            "power bi", "looker",
        ],
    ),
    (
        "cloud",
        &["aws", "azure", "gcp", "cloud", "kubernetes", "docker", "devops", "terraform", "lambda"],
    ),
    (
        "communication",
        &["presentation", "stakeholder", "negotiation", "briefing", "reporting", "c-suite"],
    ),
    (
        "project management",
        &[
            "pmp", "prince2", "jira", "ms project", "delivery", "milestones", "governance",
            "waterfall",
        ],
    ),
    (
        "ai ml",
        &[
            "machine learning", "deep learning", "tensorflow", "pytorch", "scikit", "llm", "neural",
            "nlp",
        ],
    ),
    (
        "finance",
        &["fpa", "p&l", "variance", "budget", "forecast", "excel", "sap", "oracle", "erp"],
    ),
];

const TONES: &[(&str, &[&str])] = &[
    (
        "Startup",
        &["disrupt", "scale", "startup", "agile", "iterate", "pivot", "lean", "mvp"],
    ),
    (
        "Corporate",
        &["stakeholder", "governance", "compliance", "enterprise", "policy", "strategy", "c-suite"],
    ),
    (
        "Government",
        &[
            "public sector", "government", "municipality", "department", "regulation", "audit",
            "tender",
        ],
    ),
];

const SIMILARITY_WINDOW: usize = 6000;
const DEFAULT_FIX: &str = "Mirror JD language more closely in your experience descriptions";

/// `synonym->concept` pairs where the JD wants a concept the CV only implies
fn hidden_matches(cv: &str, jd: &str) -> Vec<String> {
    let cvl = cv.to_lowercase();
    let jdl = jd.to_lowercase();
    SKILL_ONTOLOGY
        .iter()
        .filter(|(concept, syns)| {
            (jdl.contains(concept) || count_present(&jdl, syns) > 0) && !cvl.contains(concept)
        })
        .filter_map(|(concept, syns)| {
            syns.iter()
                .find(|s| cvl.contains(*s))
                .map(|syn| format!("{}->{}", syn, concept))
        })
        .take(5)
        .collect()
}

/// Dominant JD tone and how much of its vocabulary the CV shares
fn tone_alignment(cv: &str, jd: &str) -> String {
    let cvl = cv.to_lowercase();
    let jdl = jd.to_lowercase();

    let mut dominant = TONES[0];
    let mut dominant_jd = count_present(&jdl, TONES[0].1);
    for tone in &TONES[1..] {
        let n = count_present(&jdl, tone.1);
        if n > dominant_jd {
            dominant = *tone;
            dominant_jd = n;
        }
    }
    let cv_hits = count_present(&cvl, dominant.1);
    let pct = (cv_hits * 100 / dominant_jd.max(1)).min(100);
    format!("{}: {}% aligned", dominant.0, pct)
}

pub struct SemanticMatcher {
    runtime: AgentRuntime,
}

impl SemanticMatcher {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for SemanticMatcher {
    fn kind(&self) -> AgentKind {
        AgentKind::SemanticMatcher
    }

    async fn analyze(&self, cv: &str, jd: &str, _ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let cosine = cosine_similarity(
            truncate_chars(cv, SIMILARITY_WINDOW),
            truncate_chars(jd, SIMILARITY_WINDOW),
        );
        let hidden = join_or(&hidden_matches(cv, jd), "None");
        let tone = tone_alignment(cv, jd);

        let prompt = format!(
            "CV:\n{}\n\nJD:\n{}\n\nPre-metrics:\n- Cosine: {:.3}\n- Hidden matches: {}\n- Tone: {}\n\n\
             Deep semantic analysis.",
            truncate_chars(cv, 3500),
            truncate_chars(jd, 2000),
            cosine,
            hidden,
            tone,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields.int_or("SEMANTIC_SCORE", (cosine * 100.0) as i64);

        let findings = vec![
            format!("Semantic Match Score: {}/100", score.clamp(0, 100)),
            format!("Cosine Similarity: {:.3} (>0.75 = strong match)", cosine),
            format!("Hidden Semantic Matches: {}", hidden),
            format!("Tone Alignment: {}", tone),
            format!("Semantic Gaps: {}", fields.line("SEMANTIC_GAPS", 100, "N/A")),
            format!("Domain Fluency: {}", fields.line("DOMAIN_FLUENCY", 100, "N/A")),
        ];
        let recommendations = fields
            .fixes("SEMANTIC_BRIDGE", 6)
            .unwrap_or_else(|| vec![DEFAULT_FIX.to_string()]);

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(recommendations)
            .with_content(fields.section("SEMANTIC_BRIDGE"))
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

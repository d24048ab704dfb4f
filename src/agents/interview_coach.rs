//! Interview preparation: predicts the questions a CV/JD pairing invites and
//! packages STAR prompts, salary talk and closing questions.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::{gap_terms, years_claimed};
use super::{Agent, AgentKind, AgentOutput, AnalysisContext, ExperienceLevel};
use crate::constants::llm::{CV_EXCERPT_CHARS, JD_EXCERPT_CHARS};
use crate::types::{Result, dedup_preserving_order, join_or, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Interview Coach. From the gaps between a CV and a job description \
you predict the questions an interviewer will ask: gap and transition probes, behavioural questions \
tied to the role, technical questions on claimed skills, one curveball, and salary. Every question \
gets a STAR starter (Situation, Task, Action, Result).

Respond in EXACTLY this layout:

INTERVIEW_SCORE: [0-100] (estimated interview readiness)
LIKELY_QUESTIONS:
Q1: [most likely question, usually the biggest gap]
STAR: S:[setup] T:[task] A:[action] R:[result]
Q2: [second most likely]
STAR: S:[setup] T:[task] A:[action] R:[result]
Q3: [behavioural]
STAR: S:[setup] T:[task] A:[action] R:[result]
Q4: [technical]
STAR: S:[setup] T:[task] A:[action] R:[result]
Q5: [culture/motivation]
STAR: S:[setup] T:[task] A:[action] R:[result]
Q6: [curveball]
STAR: S:[setup] T:[task] A:[action] R:[result]
SALARY_TALK: [how to handle the salary question for this role and market]
RED_FLAGS_TO_ADDRESS: [CV weaknesses the interviewer will probe, comma-separated]
CLOSING_QUESTIONS: [3 smart questions for the interviewer, comma-separated]
PREP_SUMMARY: [2-3 sentences on top prep priorities]";

static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:senior|lead|manager|director|head|principal|junior|graduate)\s+\w+")
        .expect("valid role regex")
});
static TENURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d\d)\s*[-–]\s*(20\d\d)").expect("valid tenure regex"));
static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Q\d+:\s*(.+?)(?:\nSTAR:|$)").expect("valid question regex")
});
static QUESTION_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Q\d+:").expect("valid question start regex"));

const MAX_QUESTIONS: usize = 6;
const DEFAULT_CLOSING: &str = "Ask interviewer: What does success look like in the first 90 days?";

fn skill_gaps(cv: &str, jd: &str) -> String {
    let gaps = gap_terms(cv, jd);
    join_or(&gaps[..gaps.len().min(8)], "Minimal gaps detected")
}

fn detect_transitions(cv: &str) -> String {
    let roles: Vec<String> = ROLE_RE.find_iter(cv).map(|m| m.as_str().to_string()).collect();
    if roles.len() > 1 {
        let unique = dedup_preserving_order(roles);
        return format!(
            "Multiple role levels: {}",
            unique[..unique.len().min(3)].join(", ")
        );
    }

    let long_tenure = TENURE_RE.captures_iter(cv).any(|c| {
        let start: i32 = c[1].parse().unwrap_or(0);
        let end: i32 = c[2].parse().unwrap_or(0);
        end - start > 2
    });
    if long_tenure {
        "Extended tenure periods: progression narrative needed".to_string()
    } else {
        "Stable career progression".to_string()
    }
}

fn seniority_alignment(cv: &str, level: ExperienceLevel) -> String {
    let expected = level.expected_years() as i64;
    match years_claimed(cv).map(i64::from) {
        Some(yrs) if yrs < expected - 2 => format!(
            "Under-experienced for {} role ({} years vs {} expected)",
            level, yrs, expected
        ),
        Some(yrs) if yrs > expected + 5 => {
            "May be overqualified: address potential concern proactively".to_string()
        }
        _ => "Seniority appears well-matched".to_string(),
    }
}

fn prep_questions(reply: &str) -> Vec<String> {
    QUESTION_RE
        .captures_iter(reply)
        .filter_map(|c| c.get(1))
        .take(MAX_QUESTIONS)
        .map(|q| format!("Prep: {}", truncate_chars(q.as_str().trim(), 120)))
        .collect()
}

fn closing_questions(fields: &ResponseFields<'_>) -> Vec<String> {
    let section = fields.section("CLOSING_QUESTIONS");
    let asks: Vec<String> = section
        .split(',')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .take(3)
        .map(|q| format!("Ask interviewer: {}", q))
        .collect();
    if asks.is_empty() {
        vec![DEFAULT_CLOSING.to_string()]
    } else {
        asks
    }
}

/// Question blocks (with their STAR lines), salary talk and closing
/// questions, formatted for display
fn format_prep_sheet(fields: &ResponseFields<'_>) -> String {
    let text = fields.text();
    let salary_at = text.find("SALARY_TALK:").unwrap_or(text.len());
    let starts: Vec<usize> = QUESTION_START_RE
        .find_iter(text)
        .map(|m| m.start())
        .filter(|&s| s < salary_at)
        .collect();

    let mut sections: Vec<String> = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(salary_at);
            text[start..end].trim().to_string()
        })
        .filter(|block| block.contains("STAR:"))
        .take(MAX_QUESTIONS)
        .collect();

    let salary = fields.section("SALARY_TALK");
    if !salary.is_empty() {
        sections.push(format!("SALARY DISCUSSION:\n{}", salary));
    }
    let closing = fields.section("CLOSING_QUESTIONS");
    if !closing.is_empty() {
        sections.push(format!("SMART QUESTIONS TO ASK:\n{}", closing));
    }

    if sections.is_empty() {
        truncate_chars(text, 2000).to_string()
    } else {
        sections.join("\n\n")
    }
}

pub struct InterviewCoach {
    runtime: AgentRuntime,
}

impl InterviewCoach {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for InterviewCoach {
    fn kind(&self) -> AgentKind {
        AgentKind::InterviewCoach
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let gaps = skill_gaps(cv, jd);
        let transitions = detect_transitions(cv);
        let seniority = seniority_alignment(cv, ctx.experience_level);

        let prompt = format!(
            "CV TEXT:\n{}\n\nJOB DESCRIPTION:\n{}\n\nCONTEXT:\n\
             - Target Market: {}\n- Experience Level: {}\n- Industry: {}\n- Target Role: {}\n\n\
             Pre-analysis:\n- Skill gaps vs JD: {}\n- Career transitions detected: {}\n\
             - Seniority alignment: {}\n\n\
             Generate the interview questions that will be asked for this exact role and CV. \
             Focus on the gaps, transitions and areas the interviewer will probe hardest.",
            truncate_chars(cv, CV_EXCERPT_CHARS),
            truncate_chars(jd, JD_EXCERPT_CHARS),
            ctx.target_market,
            ctx.experience_level,
            ctx.industry_or("Not specified"),
            ctx.target_role_or("Not specified"),
            gaps,
            transitions,
            seniority,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields.int_or("INTERVIEW_SCORE", 60);
        let questions = prep_questions(&reply.text);

        let findings = vec![
            format!("Interview Readiness: {}/100", score.clamp(0, 100)),
            format!("Questions Generated: {}", questions.len()),
            format!("Skill Gaps That Will Be Probed: {}", truncate_chars(&gaps, 100)),
            format!("Career Transitions: {}", transitions),
            format!("Seniority Alignment: {}", seniority),
            format!(
                "Red Flags to Address: {}",
                fields.line("RED_FLAGS_TO_ADDRESS", 150, "See full analysis")
            ),
        ];

        let mut recommendations = questions;
        recommendations.extend(closing_questions(&fields));
        let content = if reply.ai_powered {
            format_prep_sheet(&fields)
        } else {
            String::new()
        };

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(recommendations)
            .with_content(content)
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

    const REPLY: &str = "INTERVIEW_SCORE: 72\nLIKELY_QUESTIONS:\n\
Q1: Why did you leave Acme after six months?\n\
STAR: S:restructure T:role change A:owned migration R:shipped\n\
Q2: How have you used Kafka in production?\n\
STAR: S:payments T:latency A:partitioning R:2x throughput\n\
SALARY_TALK: Anchor on the market midpoint.\n\
RED_FLAGS_TO_ADDRESS: short tenure, no Kafka\n\
CLOSING_QUESTIONS: How is on-call shared?, What will I own in 90 days?\n\
PREP_SUMMARY: Rehearse the Acme story.";

    #[test]
    fn test_transitions() {
        assert!(detect_transitions("Junior Analyst then Senior Analyst").starts_with("Multiple role levels"));
        assert_eq!(
            detect_transitions("Acme 2015 - 2021"),
            "Extended tenure periods: progression narrative needed"
        );
        assert_eq!(detect_transitions("Acme 2020-2021"), "Stable career progression");
    }

    #[test]
    fn test_seniority_alignment() {
        assert_eq!(
            seniority_alignment("3 years of work", ExperienceLevel::Senior),
            "Under-experienced for Senior role (3 years vs 10 expected)"
        );
        assert!(seniority_alignment("20 years", ExperienceLevel::Mid).starts_with("May be overqualified"));
    }

    #[tokio::test]
    async fn test_rule_based_has_default_closing_and_no_content() {
        let out = InterviewCoach::new(AgentRuntime::rule_based())
            .analyze("Engineer", "Kafka platform engineer", &AnalysisContext::default())
            .await
            .unwrap();
        assert_eq!(out.score(), 60);
        assert_eq!(out.recommendations, vec![DEFAULT_CLOSING]);
        assert_eq!(out.optimized_content, "");
    }

    #[tokio::test]
    async fn test_model_questions_and_prep_sheet() {
        let runtime = AgentRuntime::new(
            Some(Arc::new(StubProvider::replying(REPLY))),
            RetryConfig::default(),
        );
        let out = InterviewCoach::new(runtime)
            .analyze("Engineer", "Kafka platform engineer", &AnalysisContext::default())
            .await
            .unwrap();

        assert_eq!(out.score(), 72);
        assert_eq!(
            out.recommendations,
            vec![
                "Prep: Why did you leave Acme after six months?",
                "Prep: How have you used Kafka in production?",
                "Ask interviewer: How is on-call shared?",
                "Ask interviewer: What will I own in 90 days?",
            ]
        );
        assert!(out.optimized_content.starts_with("Q1: Why did you leave Acme"));
        assert!(out.optimized_content.contains("SALARY DISCUSSION:\nAnchor on the market midpoint."));
        assert!(out.optimized_content.contains("SMART QUESTIONS TO ASK:"));
    }
}

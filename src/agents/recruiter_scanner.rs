//! The 6-second recruiter skim: weak phrasing, power verbs, quantified
//! achievements, what the opening shows.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::{count_present, present, reading_ease};
use super::{Agent, AgentKind, AgentOutput, AnalysisContext};
use crate::types::{Result, join_or, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The 6-Second Scanner, an expert in recruiter psychology, F-pattern \
scanning and CV first impressions.

Respond in EXACTLY this layout:

RECRUITER_SCORE: [0-100]
F_PATTERN_SCORE: [0-100]
ACHIEVEMENT_DENSITY: [X metrics per role average]
CV_KILLERS_FOUND: [comma-separated OR NONE]
POWER_VERBS_COUNT: [number]
OPENING_IMPACT: [STRONG/MODERATE/WEAK, what the recruiter sees in 3 seconds]
FIRST_IMPRESSION: [honest one-sentence recruiter reaction]
SCANNABILITY: [HIGH/MEDIUM/LOW]
FIXES:
- [fix 1]
- [fix 2]
- [fix 3]
- [fix 4]
IMPROVED_BULLET: [weakest bullet rewritten as power verb + context + metric]";

const CV_KILLERS: &[&str] = &[
    "responsible for", "duties included", "worked on", "involved in", "helped with",
    "assisted with", "contributed to", "participated in", "tasked with", "was responsible",
    "my responsibilities", "my duties", "i was", "i have", "i am",
];

/// The first ten count as an opening hook
const POWER_VERBS: &[&str] = &[
    "spearheaded", "delivered", "transformed", "exceeded", "optimized", "engineered",
    "architected", "scaled", "generated", "reduced", "led", "launched", "built", "drove",
    "achieved", "increased", "decreased", "saved", "negotiated", "established", "implemented",
    "pioneered", "accelerated", "overhauled", "revolutionized", "secured",
];

static METRIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d+%",
        r"\$[\d,]+",
        r"£[\d,]+",
        r"R\s?[\d,]+",
        r"\d+x\b",
        r"\d+\s*(million|billion|thousand|k)\b",
        r"\d+\s*(people|staff|team|clients|users)",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).expect("valid metric regex"))
    .collect()
});

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid digit regex"));

const DEFAULT_FIX: &str = "Add metrics to every role (%, ZAR, time, team size)";

fn count_metrics(cv: &str) -> usize {
    METRIC_PATTERNS.iter().map(|re| re.find_iter(cv).count()).sum()
}

fn score_opening(cv: &str) -> &'static str {
    let first = truncate_chars(cv, 500).to_lowercase();
    if count_present(&first, &POWER_VERBS[..10]) > 0 {
        "STRONG: power verb in opening"
    } else if DIGITS_RE.is_match(&first) {
        "MODERATE: numbers visible early"
    } else {
        "WEAK: no hooks in first 500 chars"
    }
}

fn describe_reading_ease(cv: &str) -> String {
    match reading_ease(cv) {
        Some(s) if s > 70.0 => format!("{:.0}: Easy", s),
        Some(s) if s > 50.0 => format!("{:.0}: Moderate", s),
        Some(s) => format!("{:.0}: Complex (simplify)", s),
        None => "Not calculated".to_string(),
    }
}

fn heuristic_score(killers: usize, metrics: usize, verbs: usize) -> i64 {
    let s = 55 - killers as i64 * 8 + (metrics as i64 * 3).min(25) + (verbs as i64 * 2).min(15);
    s.clamp(10, 100)
}

fn build_fixes(fields: &ResponseFields<'_>, killers: &[&str]) -> Vec<String> {
    let mut fixes = fields.fixes("IMPROVED_BULLET", 5).unwrap_or_default();
    for killer in killers.iter().take(3) {
        fixes.insert(
            0,
            format!("Replace \"{}\" with power verb + quantified result", killer),
        );
    }
    if fixes.is_empty() {
        return vec![DEFAULT_FIX.to_string()];
    }
    fixes.truncate(8);
    fixes
}

pub struct RecruiterScanner {
    runtime: AgentRuntime,
}

impl RecruiterScanner {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for RecruiterScanner {
    fn kind(&self) -> AgentKind {
        AgentKind::RecruiterScanner
    }

    async fn analyze(&self, cv: &str, jd: &str, _ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let cv_lower = cv.to_lowercase();
        let killers = present(&cv_lower, CV_KILLERS);
        let verbs = count_present(&cv_lower, POWER_VERBS);
        let metrics = count_metrics(cv);
        let ease = describe_reading_ease(cv);
        let opening = score_opening(cv);

        let head = truncate_chars(cv, 2500);
        let rest = truncate_chars(&cv[head.len()..], 2500);
        let prompt = format!(
            "CV (first 2500 chars = what the recruiter sees first):\n{}\n\nRest:\n{}\n\nJD:\n{}\n\n\
             Pre-analysis:\n- CV killers: {}\n- Power verbs: {}\n- Metrics: {}\n\
             - Reading ease: {}\n- Opening impact: {}",
            head,
            rest,
            truncate_chars(jd, 1500),
            join_or(&killers, "None"),
            verbs,
            metrics,
            ease,
            opening,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields
            .int("RECRUITER_SCORE")
            .unwrap_or_else(|| heuristic_score(killers.len(), metrics, verbs));

        let killer_summary = if killers.is_empty() {
            "0: None".to_string()
        } else {
            format!(
                "{}: {}",
                killers.len(),
                killers[..killers.len().min(3)].join(", ")
            )
        };
        let findings = vec![
            format!("6-Second Scan Score: {}/100", score.clamp(0, 100)),
            format!("F-Pattern Score: {}", fields.int_or("F_PATTERN_SCORE", score)),
            format!("CV Killer Phrases: {}", killer_summary),
            format!("Power Verbs Used: {}", verbs),
            format!("Quantified Achievements: {}", metrics),
            format!("Opening Impact: {}", opening),
            format!(
                "First Impression: {}",
                fields.line("FIRST_IMPRESSION", 100, "N/A")
            ),
            format!("Scannability: {}", fields.line("SCANNABILITY", 100, "N/A")),
        ];

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(build_fixes(&fields, &killers))
            .with_content(fields.section("IMPROVED_BULLET"))
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_metrics() {
        assert_eq!(count_metrics("no numbers at all"), 0);
        assert_eq!(count_metrics("Grew revenue 40% and managed 12 people"), 2);
    }

    #[test]
    fn test_opening_strength() {
        assert!(score_opening("Spearheaded a migration").starts_with("STRONG"));
        assert!(score_opening("Engineer since 2015").starts_with("MODERATE"));
        assert!(score_opening("Engineer").starts_with("WEAK"));
    }

    #[test]
    fn test_heuristic_score_bounds() {
        assert_eq!(heuristic_score(0, 0, 0), 55);
        assert_eq!(heuristic_score(10, 0, 0), 10);
        assert_eq!(heuristic_score(0, 100, 100), 95);
    }

    #[test]
    fn test_killer_fixes_lead() {
        let fixes = build_fixes(&ResponseFields::new(""), &["responsible for", "worked on"]);
        assert_eq!(
            fixes[0],
            "Replace \"worked on\" with power verb + quantified result"
        );
        assert_eq!(build_fixes(&ResponseFields::new(""), &[]), vec![DEFAULT_FIX]);
    }

    #[tokio::test]
    async fn test_rule_based_scan() {
        let cv = "I was responsible for reports. Led a team of 5 people and grew sales 20%.";
        let out = RecruiterScanner::new(AgentRuntime::rule_based())
            .analyze(cv, "Analyst", &AnalysisContext::default())
            .await
            .unwrap();
        let killers = present(&cv.to_lowercase(), CV_KILLERS);
        let verbs = count_present(&cv.to_lowercase(), POWER_VERBS);
        assert_eq!(
            out.score() as i64,
            heuristic_score(killers.len(), count_metrics(cv), verbs)
        );
        assert!(out.recommendations[0].starts_with("Replace"));
    }
}

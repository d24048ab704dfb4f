//! Agent output record.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Instant;

use super::AgentKind;
use crate::constants::orchestration::{DEGRADED_SCORE, DEGRADED_WEIGHT, ERROR_MESSAGE_CHARS};
use crate::types::truncate_chars;

/// What one agent reports about a CV.
///
/// `score` is private so every path goes through [`clamp_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub agent_name: String,
    #[serde(deserialize_with = "deserialize_score")]
    score: u8,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
    /// Model-produced artifact (summary rewrite, letter, CV variants)
    pub optimized_content: String,
    /// Model reply, or the rule-based banner
    pub raw_analysis: String,
    pub weight: f64,
    pub execution_ms: u64,
    /// True only when a model actually answered
    pub ai_powered: bool,
}

/// Clamp any integer into the 0..=100 score range.
pub fn clamp_score(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}

fn deserialize_score<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_score)
}

impl AgentOutput {
    pub fn new(kind: AgentKind, score: i64) -> Self {
        Self {
            agent_name: kind.display_name().to_string(),
            score: clamp_score(score),
            findings: Vec::new(),
            recommendations: Vec::new(),
            optimized_content: String::new(),
            raw_analysis: String::new(),
            weight: kind.default_weight(),
            execution_ms: 0,
            ai_powered: false,
        }
    }

    /// Placeholder for an agent that ran past its timeout
    pub fn timed_out(kind: AgentKind) -> Self {
        Self::degraded(kind, "Agent timed out".to_string(), "Re-run for complete analysis")
    }

    /// Placeholder for an agent that returned an error or panicked
    pub fn failed(kind: AgentKind, message: &str) -> Self {
        Self::degraded(
            kind,
            format!("Error: {}", truncate_chars(message, ERROR_MESSAGE_CHARS)),
            "Check API key configuration",
        )
    }

    fn degraded(kind: AgentKind, finding: String, recommendation: &str) -> Self {
        Self {
            weight: DEGRADED_WEIGHT,
            findings: vec![finding],
            recommendations: vec![recommendation.to_string()],
            ..Self::new(kind, DEGRADED_SCORE)
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn set_score(&mut self, score: i64) {
        self.score = clamp_score(score);
    }

    pub fn with_findings(mut self, findings: Vec<String>) -> Self {
        self.findings = findings;
        self
    }

    pub fn with_recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.optimized_content = content.into();
        self
    }

    /// Attach the raw reply and whether a model produced it
    pub fn with_reply(mut self, raw: impl Into<String>, ai_powered: bool) -> Self {
        self.raw_analysis = raw.into();
        self.ai_powered = ai_powered;
        self
    }

    pub fn timed(mut self, started: Instant) -> Self {
        self.execution_ms = started.elapsed().as_millis() as u64;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_clamps() {
        assert_eq!(AgentOutput::new(AgentKind::GlobalSetter, 250).score(), 100);
        assert_eq!(AgentOutput::new(AgentKind::GlobalSetter, -4).score(), 0);
        let mut out = AgentOutput::new(AgentKind::GlobalSetter, 10);
        out.set_score(101);
        assert_eq!(out.score(), 100);
    }

    #[test]
    fn test_new_uses_kind_metadata() {
        let out = AgentOutput::new(AgentKind::CvRewriter, 85);
        assert_eq!(out.agent_name, "The CV Rewriter");
        assert_eq!(out.weight, 2.0);
        assert!(!out.ai_powered);
    }

    #[test]
    fn test_timed_out_shape() {
        let out = AgentOutput::timed_out(AgentKind::SemanticMatcher);
        assert_eq!(out.score(), 50);
        assert_eq!(out.weight, 1.0);
        assert_eq!(out.findings, vec!["Agent timed out"]);
        assert_eq!(out.recommendations, vec!["Re-run for complete analysis"]);
        assert!(!out.ai_powered);
    }

    #[test]
    fn test_failed_truncates_message() {
        let long = "x".repeat(200);
        let out = AgentOutput::failed(AgentKind::HiringManager, &long);
        assert_eq!(out.findings[0], format!("Error: {}", "x".repeat(80)));
        assert_eq!(out.recommendations, vec!["Check API key configuration"]);
    }

    #[test]
    fn test_deserialize_clamps_score() {
        let mut json = serde_json::to_value(AgentOutput::new(AgentKind::GlobalSetter, 70)).unwrap();
        json["score"] = serde_json::json!(250);
        let out: AgentOutput = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(out.score(), 100);

        json["score"] = serde_json::json!(-3);
        let out: AgentOutput = serde_json::from_value(json).unwrap();
        assert_eq!(out.score(), 0);
    }

    proptest! {
        #[test]
        fn prop_clamp_matches_range(score in any::<i64>()) {
            let out = AgentOutput::new(AgentKind::AlgorithmBreaker, score);
            prop_assert_eq!(out.score() as i64, score.clamp(0, 100));
        }
    }
}

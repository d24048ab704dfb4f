//! Weighted score synthesis
//!
//! Folds every agent output into one overall score, a verdict tier and the
//! variant the candidate should send first.
//!
//! ## Weights
//!
//! South Africa and International use the per-market weight table on
//! [`AgentKind`]. "Both" uses each output's own `weight`, which is also what a
//! degraded placeholder carries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::agents::{AgentKind, AgentOutput, AnalysisContext, CvVariant, TargetMarket};
use crate::constants::scoring::{
    EXCELLENT_THRESHOLD, GOOD_THRESHOLD, INTERVIEW_PROBABILITY_CAP, STRONG_THRESHOLD,
    SUMMARY_ACTION_ITEMS,
};

/// Verdict band of the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Strong,
    Good,
    Gaps,
}

impl Tier {
    pub fn for_score(overall: f64) -> Self {
        if overall >= EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if overall >= STRONG_THRESHOLD {
            Self::Strong
        } else if overall >= GOOD_THRESHOLD {
            Self::Good
        } else {
            Self::Gaps
        }
    }

    pub fn recommended_variant(self) -> CvVariant {
        match self {
            Self::Excellent | Self::Strong => CvVariant::Balanced,
            Self::Good | Self::Gaps => CvVariant::AtsMax,
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent profile: optimised for maximum impact.",
            Self::Strong => "Strong foundation: targeted improvements will push to 85+.",
            Self::Good => "Good base: prioritise ATS keyword optimisation and metrics.",
            Self::Gaps => {
                "Significant gaps identified: work through all action items systematically."
            }
        }
    }
}

/// Headline numbers of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Weighted mean, one decimal
    pub overall_score: f64,
    /// `ATS-MAX` or `BALANCED`
    pub recommended_variant: String,
    pub verdict: String,
    pub tier: Tier,
    /// Rough proxy, capped at 97
    pub interview_probability: u8,
    pub agent_scores: BTreeMap<AgentKind, u8>,
    pub weakest_area: Option<AgentKind>,
    pub strongest_area: Option<AgentKind>,
    pub target_market: TargetMarket,
    pub top_action_items: Vec<String>,
    pub ai_powered_count: usize,
}

impl Summary {
    pub fn recommended(&self) -> CvVariant {
        self.tier.recommended_variant()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn synthesis_weight(kind: AgentKind, output: &AgentOutput, market: TargetMarket) -> f64 {
    kind.market_weight(market).unwrap_or(output.weight)
}

/// Weighted overall score, `0.0` when there is nothing to weigh
pub fn overall_score(outputs: &BTreeMap<AgentKind, AgentOutput>, market: TargetMarket) -> f64 {
    let (weighted_sum, total_weight) =
        outputs
            .iter()
            .fold((0.0, 0.0), |(sum, total), (kind, output)| {
                let w = synthesis_weight(*kind, output, market);
                (sum + f64::from(output.score()) * w, total + w)
            });
    if total_weight == 0.0 {
        0.0
    } else {
        round1(weighted_sum / total_weight)
    }
}

pub fn interview_probability(overall: f64) -> u8 {
    (overall * 0.90 + 7.0).round().clamp(0.0, INTERVIEW_PROBABILITY_CAP) as u8
}

/// Lowest and highest scoring agents; ties go to the earlier kind
fn extremes(scores: &BTreeMap<AgentKind, u8>) -> (Option<AgentKind>, Option<AgentKind>) {
    let weakest = scores
        .iter()
        .reduce(|best, cur| if cur.1 < best.1 { cur } else { best })
        .map(|(kind, _)| *kind);
    let strongest = scores
        .iter()
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .map(|(kind, _)| *kind);
    (weakest, strongest)
}

pub fn synthesize(
    outputs: &BTreeMap<AgentKind, AgentOutput>,
    ctx: &AnalysisContext,
    actions: &[String],
) -> Summary {
    let overall = overall_score(outputs, ctx.target_market);
    let tier = Tier::for_score(overall);
    let agent_scores: BTreeMap<AgentKind, u8> = outputs
        .iter()
        .map(|(kind, output)| (*kind, output.score()))
        .collect();
    let (weakest_area, strongest_area) = extremes(&agent_scores);

    Summary {
        overall_score: overall,
        recommended_variant: tier.recommended_variant().to_string(),
        verdict: tier.verdict().to_string(),
        tier,
        interview_probability: interview_probability(overall),
        agent_scores,
        weakest_area,
        strongest_area,
        target_market: ctx.target_market,
        top_action_items: actions.iter().take(SUMMARY_ACTION_ITEMS).cloned().collect(),
        ai_powered_count: outputs.values().filter(|o| o.ai_powered).count(),
    }
}

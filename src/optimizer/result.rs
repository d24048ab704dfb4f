//! Result of one optimization run, serializable as a whole.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::synthesis::Summary;
use super::variants::CvVariants;
use crate::agents::{AgentKind, AgentOutput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: Uuid,
    /// Wall-clock seconds, one decimal
    pub execution_seconds: f64,
    /// RFC 3339
    pub timestamp: String,
    pub version: String,
    pub agents_run: usize,
    /// The model rewrite was attempted (not necessarily successful)
    pub ai_rewrite: bool,
    pub cover_letter_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub summary: Summary,
    pub agent_results: BTreeMap<AgentKind, AgentOutput>,
    pub cv_variants: CvVariants,
    pub cover_letter: String,
    pub action_items: Vec<String>,
    pub ai_mode: bool,
    pub llm_provider: String,
    pub llm_model: String,
    pub metadata: RunMetadata,
}

impl OptimizationResult {
    pub fn to_json(&self) -> crate::types::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! Specialist agents
//!
//! Each agent scores one facet of a CV against a job description. Agents
//! combine deterministic heuristics with an optional model reply obtained
//! through [`AgentRuntime`]; without a model they still produce a complete,
//! rule-based [`AgentOutput`].
//!
//! ## Registry
//!
//! [`AgentRegistry`] holds one instance per [`AgentKind`]. Iteration follows
//! `AgentKind` declaration order, which is the order results are reported in.

mod context;
mod kind;
mod output;
mod parse;
mod runtime;
mod text;

mod algorithm_breaker;
mod compliance_guardian;
mod cover_letter;
mod cv_rewriter;
mod future_architect;
mod global_setter;
mod hiring_manager;
mod interview_coach;
mod recruiter_scanner;
mod sa_specialist;
mod salary_intelligence;
mod semantic_matcher;

pub use context::{AnalysisContext, ExperienceLevel, RewriteHints, TargetMarket};
pub use kind::AgentKind;
pub use output::{AgentOutput, clamp_score};
pub use parse::ResponseFields;
pub use runtime::{AgentRuntime, Reply, rule_based_banner};

pub use algorithm_breaker::AlgorithmBreaker;
pub use compliance_guardian::ComplianceGuardian;
pub use cover_letter::CoverLetterComposer;
pub use cv_rewriter::{CvRewriter, CvVariant, extract_variant};
pub use future_architect::FutureArchitect;
pub use global_setter::GlobalSetter;
pub use hiring_manager::HiringManagerWhisperer;
pub use interview_coach::InterviewCoach;
pub use recruiter_scanner::RecruiterScanner;
pub use sa_specialist::SaSpecialist;
pub use salary_intelligence::SalaryIntelligence;
pub use semantic_matcher::SemanticMatcher;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::Result;

/// One specialist.
///
/// `analyze` may return an error or panic; the optimizer converts both into a
/// degraded output, so implementations need not guard every path.
#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput>;
}

/// All agents keyed by kind
#[derive(Clone)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentKind, Arc<dyn Agent>>,
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.agents.keys()).finish()
    }
}

impl AgentRegistry {
    /// Every built-in agent sharing one runtime
    pub fn new(runtime: AgentRuntime) -> Self {
        let agents: Vec<Arc<dyn Agent>> = vec![
            Arc::new(AlgorithmBreaker::new(runtime.clone())),
            Arc::new(SaSpecialist::new(runtime.clone())),
            Arc::new(GlobalSetter::new(runtime.clone())),
            Arc::new(RecruiterScanner::new(runtime.clone())),
            Arc::new(HiringManagerWhisperer::new(runtime.clone())),
            Arc::new(SemanticMatcher::new(runtime.clone())),
            Arc::new(ComplianceGuardian::new(runtime.clone())),
            Arc::new(FutureArchitect::new(runtime.clone())),
            Arc::new(InterviewCoach::new(runtime.clone())),
            Arc::new(SalaryIntelligence::new(runtime.clone())),
            Arc::new(CoverLetterComposer::new(runtime.clone())),
            Arc::new(CvRewriter::new(runtime)),
        ];
        Self {
            agents: agents.into_iter().map(|a| (a.kind(), a)).collect(),
        }
    }

    /// Swap in a different implementation for one kind
    pub fn replace(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(agent.kind(), agent);
        self
    }

    pub fn get(&self, kind: AgentKind) -> Option<Arc<dyn Agent>> {
        self.agents.get(&kind).cloned()
    }

    /// Analysis agents scheduled for this context, in registry order
    pub fn analysis_agents(&self, ctx: &AnalysisContext) -> Vec<Arc<dyn Agent>> {
        AgentKind::ANALYSIS
            .iter()
            .filter(|kind| ctx.run_optional_agents || !kind.is_optional())
            .filter_map(|kind| self.get(*kind))
            .collect()
    }
}

//! Closed set of agents and their static metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TargetMarket;

/// Every agent the optimizer knows about.
///
/// Declaration order is registry order: it drives iteration over result maps,
/// action compilation and tie-breaks between equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    AlgorithmBreaker,
    SaSpecialist,
    GlobalSetter,
    RecruiterScanner,
    HiringManager,
    SemanticMatcher,
    ComplianceGuardian,
    FutureArchitect,
    InterviewCoach,
    SalaryIntelligence,
    CoverLetter,
    CvRewriter,
}

impl AgentKind {
    /// Analysis agents, in registry order
    pub const ANALYSIS: [AgentKind; 10] = [
        Self::AlgorithmBreaker,
        Self::SaSpecialist,
        Self::GlobalSetter,
        Self::RecruiterScanner,
        Self::HiringManager,
        Self::SemanticMatcher,
        Self::ComplianceGuardian,
        Self::FutureArchitect,
        Self::InterviewCoach,
        Self::SalaryIntelligence,
    ];

    /// Post-phase agents
    pub const AUXILIARY: [AgentKind; 2] = [Self::CoverLetter, Self::CvRewriter];

    pub fn key(self) -> &'static str {
        match self {
            Self::AlgorithmBreaker => "algorithm_breaker",
            Self::SaSpecialist => "sa_specialist",
            Self::GlobalSetter => "global_setter",
            Self::RecruiterScanner => "recruiter_scanner",
            Self::HiringManager => "hiring_manager",
            Self::SemanticMatcher => "semantic_matcher",
            Self::ComplianceGuardian => "compliance_guardian",
            Self::FutureArchitect => "future_architect",
            Self::InterviewCoach => "interview_coach",
            Self::SalaryIntelligence => "salary_intelligence",
            Self::CoverLetter => "cover_letter",
            Self::CvRewriter => "cv_rewriter",
        }
    }

    /// Short label for progress messages
    pub fn label(self) -> &'static str {
        match self {
            Self::AlgorithmBreaker => "Algorithm Breaker",
            Self::SaSpecialist => "SA Specialist",
            Self::GlobalSetter => "Global Setter",
            Self::RecruiterScanner => "6-Second Scanner",
            Self::HiringManager => "Hiring Manager",
            Self::SemanticMatcher => "Semantic Matcher",
            Self::ComplianceGuardian => "Compliance Guardian",
            Self::FutureArchitect => "Future Architect",
            Self::InterviewCoach => "Interview Coach",
            Self::SalaryIntelligence => "Salary Intelligence",
            Self::CoverLetter => "Cover Letter",
            Self::CvRewriter => "CV Rewriter",
        }
    }

    /// Name stamped on the agent's output
    pub fn display_name(self) -> &'static str {
        match self {
            Self::AlgorithmBreaker => "The Algorithm Breaker",
            Self::SaSpecialist => "The South African Specialist",
            Self::GlobalSetter => "The Global Standard Setter",
            Self::RecruiterScanner => "The 6-Second Scanner",
            Self::HiringManager => "The Hiring Manager Whisperer",
            Self::SemanticMatcher => "The Semantic Matcher",
            Self::ComplianceGuardian => "The Compliance Guardian",
            Self::FutureArchitect => "The Future-Proof Architect",
            Self::InterviewCoach => "The Interview Coach",
            Self::SalaryIntelligence => "The Salary Intelligence Agent",
            Self::CoverLetter => "The Cover Letter Composer",
            Self::CvRewriter => "The CV Rewriter",
        }
    }

    /// Weight carried on the output itself (used for the "Both" market)
    pub fn default_weight(self) -> f64 {
        match self {
            Self::AlgorithmBreaker => 1.8,
            Self::SaSpecialist => 1.4,
            Self::GlobalSetter => 1.2,
            Self::RecruiterScanner => 1.3,
            Self::HiringManager => 1.2,
            Self::SemanticMatcher => 1.1,
            Self::ComplianceGuardian => 1.0,
            Self::FutureArchitect => 0.9,
            Self::InterviewCoach => 1.0,
            Self::SalaryIntelligence => 0.8,
            Self::CoverLetter => 0.8,
            Self::CvRewriter => 2.0,
        }
    }

    /// (South Africa, International) weights; auxiliaries fall back to the default
    fn market_weights(self) -> (f64, f64) {
        match self {
            Self::AlgorithmBreaker => (1.8, 1.8),
            Self::SaSpecialist => (2.0, 0.8),
            Self::GlobalSetter => (0.8, 2.0),
            Self::RecruiterScanner => (1.3, 1.3),
            Self::HiringManager => (1.2, 1.2),
            Self::SemanticMatcher => (1.1, 1.3),
            Self::ComplianceGuardian => (1.2, 1.0),
            Self::FutureArchitect => (0.9, 1.0),
            Self::InterviewCoach => (1.0, 1.0),
            Self::SalaryIntelligence => (0.8, 0.7),
            Self::CoverLetter | Self::CvRewriter => {
                (self.default_weight(), self.default_weight())
            }
        }
    }

    /// Synthesis weight for a market. `None` means "use the output's own weight".
    pub fn market_weight(self, market: TargetMarket) -> Option<f64> {
        let (sa, intl) = self.market_weights();
        match market {
            TargetMarket::SouthAfrica => Some(sa),
            TargetMarket::International => Some(intl),
            TargetMarket::Both => None,
        }
    }

    /// Skipped when the context disables optional agents
    pub fn is_optional(self) -> bool {
        matches!(self, Self::InterviewCoach | Self::SalaryIntelligence)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_registry_order_matches_declaration() {
        let mut sorted = AgentKind::ANALYSIS;
        sorted.sort();
        assert_eq!(sorted, AgentKind::ANALYSIS);
        assert!(AgentKind::SalaryIntelligence < AgentKind::CoverLetter);
    }

    #[test]
    fn test_serde_key_matches_key() {
        for kind in AgentKind::ANALYSIS.iter().chain(AgentKind::AUXILIARY.iter()) {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.key()));
        }
    }

    #[test]
    fn test_map_keys_serialize_as_strings() {
        let mut map = BTreeMap::new();
        map.insert(AgentKind::HiringManager, 60);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"hiring_manager":60}"#);
    }

    #[test]
    fn test_market_weights() {
        assert_eq!(
            AgentKind::SaSpecialist.market_weight(TargetMarket::SouthAfrica),
            Some(2.0)
        );
        assert_eq!(
            AgentKind::GlobalSetter.market_weight(TargetMarket::International),
            Some(2.0)
        );
        assert_eq!(AgentKind::SemanticMatcher.market_weight(TargetMarket::Both), None);
    }

    #[test]
    fn test_optional_agents() {
        let optional: Vec<_> = AgentKind::ANALYSIS
            .into_iter()
            .filter(|k| k.is_optional())
            .collect();
        assert_eq!(
            optional,
            vec![AgentKind::InterviewCoach, AgentKind::SalaryIntelligence]
        );
    }
}

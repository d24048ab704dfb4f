//! Priority action list compiled from every agent's recommendations.

use std::collections::{BTreeMap, HashSet};

use crate::agents::{AgentKind, AgentOutput};
use crate::constants::scoring::{
    DEDUP_PREFIX_CHARS, MAX_ACTION_ITEMS, MIN_RECOMMENDATION_CHARS, RECOMMENDATIONS_PER_AGENT,
    URGENCY_DIVISOR,
};
use crate::types::char_len;

/// Lower scores are more urgent
fn urgency(score: u8) -> f64 {
    1.0 + (100.0 - f64::from(score)) / URGENCY_DIVISOR
}

fn dedup_key(recommendation: &str) -> String {
    recommendation
        .to_lowercase()
        .chars()
        .take(DEDUP_PREFIX_CHARS)
        .collect()
}

/// Ranked, deduplicated actions.
///
/// Agents are visited in registry order and the sort is stable, so equal
/// urgencies keep agent order and then recommendation order.
pub fn compile_actions(outputs: &BTreeMap<AgentKind, AgentOutput>) -> Vec<String> {
    let mut weighted: Vec<(f64, &str)> = outputs
        .values()
        .flat_map(|output| {
            let u = urgency(output.score());
            output
                .recommendations
                .iter()
                .take(RECOMMENDATIONS_PER_AGENT)
                .filter(|rec| char_len(rec) > MIN_RECOMMENDATION_CHARS)
                .map(move |rec| (u, rec.as_str()))
        })
        .collect();
    weighted.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut seen = HashSet::new();
    weighted
        .into_iter()
        .filter(|(_, rec)| seen.insert(dedup_key(rec)))
        .map(|(_, rec)| rec.to_string())
        .take(MAX_ACTION_ITEMS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn output(kind: AgentKind, score: i64, recs: &[&str]) -> AgentOutput {
        AgentOutput::new(kind, score)
            .with_recommendations(recs.iter().map(|r| r.to_string()).collect())
    }

    #[test]
    fn test_urgency_orders_weakest_agent_first() {
        let mut outputs = BTreeMap::new();
        outputs.insert(
            AgentKind::AlgorithmBreaker,
            output(AgentKind::AlgorithmBreaker, 90, &["Add Kafka to the skills list"]),
        );
        outputs.insert(
            AgentKind::GlobalSetter,
            output(AgentKind::GlobalSetter, 30, &["Remove the date of birth line"]),
        );
        assert_eq!(
            compile_actions(&outputs),
            vec!["Remove the date of birth line", "Add Kafka to the skills list"]
        );
    }

    #[test]
    fn test_short_and_late_recommendations_dropped() {
        let mut outputs = BTreeMap::new();
        outputs.insert(
            AgentKind::SaSpecialist,
            output(
                AgentKind::SaSpecialist,
                50,
                &[
                    "Too short",
                    "twelve chars",
                    "Add your NQF level to each degree",
                    "Mention B-BBEE status if applicable",
                    "Add SAQA evaluation for foreign degrees",
                    "Add a Johannesburg or Cape Town location",
                    "Sixth recommendation is never considered",
                ],
            ),
        );
        let actions = compile_actions(&outputs);
        assert_eq!(actions.len(), 3);
        assert!(!actions.iter().any(|a| a.starts_with("Sixth")));
        assert!(!actions.iter().any(|a| a == "twelve chars"));
    }

    #[test]
    fn test_dedup_on_prefix_keeps_first() {
        let base = "Quantify every achievement with a percentage, rand value or headcount";
        let mut outputs = BTreeMap::new();
        outputs.insert(
            AgentKind::RecruiterScanner,
            output(AgentKind::RecruiterScanner, 40, &[base]),
        );
        outputs.insert(
            AgentKind::HiringManager,
            output(
                AgentKind::HiringManager,
                40,
                &[&format!("{} wherever possible", base.to_uppercase())],
            ),
        );
        assert_eq!(compile_actions(&outputs), vec![base]);
    }

    #[test]
    fn test_cap_at_eighteen() {
        let mut outputs = BTreeMap::new();
        for (i, kind) in AgentKind::ANALYSIS.into_iter().enumerate() {
            let recs: Vec<String> = (0..5)
                .map(|j| format!("Distinct action number {} from agent {}", j, i))
                .collect();
            outputs.insert(kind, AgentOutput::new(kind, 50).with_recommendations(recs));
        }
        assert_eq!(compile_actions(&outputs).len(), MAX_ACTION_ITEMS);
    }

    proptest! {
        #[test]
        fn prop_actions_bounded_and_unique(
            recs in proptest::collection::vec("[a-zA-Z ]{0,80}", 0..8),
            scores in proptest::collection::vec(0i64..=100, 10),
        ) {
            let outputs: BTreeMap<_, _> = AgentKind::ANALYSIS
                .into_iter()
                .zip(scores)
                .map(|(kind, s)| (kind, AgentOutput::new(kind, s).with_recommendations(recs.clone())))
                .collect();
            let actions = compile_actions(&outputs);
            prop_assert!(actions.len() <= MAX_ACTION_ITEMS);
            let keys: HashSet<String> = actions.iter().map(|a| dedup_key(a)).collect();
            prop_assert_eq!(keys.len(), actions.len());
            prop_assert!(actions.iter().all(|a| char_len(a) > MIN_RECOMMENDATION_CHARS));
        }
    }
}

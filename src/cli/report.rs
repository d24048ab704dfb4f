//! Plain-text optimization report.

use crate::agents::{AgentKind, CvVariant};
use crate::optimizer::OptimizationResult;

const SEP_WIDTH: usize = 68;
const CONTENT_PREVIEW_CHARS: usize = 500;

fn rating(score: u8) -> &'static str {
    match score {
        85.. => "EXCELLENT",
        75..=84 => "STRONG",
        60..=74 => "ADEQUATE",
        _ => "NEEDS WORK",
    }
}

fn priority(rank: usize) -> &'static str {
    match rank {
        1..=4 => "CRITICAL",
        5..=9 => "IMPORTANT",
        _ => "HELPFUL",
    }
}

fn score_bar(score: u8) -> String {
    let filled = usize::from(score / 10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn area(kind: Option<AgentKind>) -> &'static str {
    kind.map_or("N/A", AgentKind::label)
}

/// Full report: scores, actions, variants (recommended first), cover
/// letter and per-agent detail
pub fn render_text(result: &OptimizationResult) -> String {
    let sep = "=".repeat(SEP_WIDTH);
    let thin = "-".repeat(SEP_WIDTH);
    let summary = &result.summary;
    let mut lines = vec![
        sep.clone(),
        "  KAROO OPTIMIZATION REPORT".to_string(),
        format!("  Generated: {}", result.metadata.timestamp),
        format!("  AI Provider: {} ({})", result.llm_provider, result.llm_model),
        format!(
            "  AI-Powered Agents: {}/{}",
            summary.ai_powered_count, result.metadata.agents_run
        ),
        sep.clone(),
        String::new(),
        format!("  OVERALL SCORE:           {:.1}/100", summary.overall_score),
        format!("  INTERVIEW PROBABILITY:   {}%", summary.interview_probability),
        format!("  RECOMMENDED VARIANT:     {}", summary.recommended_variant),
        format!("  VERDICT:                 {}", summary.verdict),
        format!("  STRONGEST AREA:          {}", area(summary.strongest_area)),
        format!("  WEAKEST AREA:            {}", area(summary.weakest_area)),
        String::new(),
        sep.clone(),
        "  AGENT SCORES".to_string(),
        sep.clone(),
    ];

    for (kind, score) in &summary.agent_scores {
        lines.push(format!(
            "  {:<24} {:>3}/100  [{}]  {}",
            kind.label(),
            score,
            score_bar(*score),
            rating(*score)
        ));
    }

    lines.extend([
        String::new(),
        sep.clone(),
        "  PRIORITY ACTION ITEMS".to_string(),
        sep.clone(),
        String::new(),
    ]);
    for (i, item) in result.action_items.iter().enumerate() {
        lines.push(format!("  {:>2}. [{}] {}", i + 1, priority(i + 1), item));
    }

    let recommended = summary.recommended();
    let order = std::iter::once(recommended)
        .chain(CvVariant::ALL.into_iter().filter(|v| *v != recommended));
    for variant in order {
        let content = result.cv_variants.get(variant);
        if content.is_empty() {
            continue;
        }
        let marker = if variant == recommended {
            " (RECOMMENDED)"
        } else {
            ""
        };
        lines.extend([
            String::new(),
            sep.clone(),
            format!("  CV VARIANT: {}{}", variant, marker),
            sep.clone(),
            String::new(),
            content.to_string(),
        ]);
    }

    if !result.cover_letter.is_empty() {
        lines.extend([
            String::new(),
            sep.clone(),
            "  COVER LETTER".to_string(),
            sep.clone(),
            String::new(),
            result.cover_letter.clone(),
        ]);
    }

    lines.extend([
        String::new(),
        sep.clone(),
        "  DETAILED AGENT REPORTS".to_string(),
        sep,
    ]);
    for (kind, output) in &result.agent_results {
        lines.extend([
            String::new(),
            format!("  {}", thin),
            format!("  {}: {}/100", kind.label().to_uppercase(), output.score()),
            format!("  {}", thin),
            "  Findings:".to_string(),
        ]);
        lines.extend(output.findings.iter().map(|f| format!("    • {}", f)));
        lines.push("  Recommendations:".to_string());
        lines.extend(output.recommendations.iter().map(|r| format!("    → {}", r)));
        if !output.optimized_content.is_empty() {
            lines.push("  AI-Generated Improvement:".to_string());
            lines.push(format!(
                "  {}",
                crate::types::truncate_chars(&output.optimized_content, CONTENT_PREVIEW_CHARS)
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AnalysisContext;
    use crate::optimizer::{NoProgress, Optimizer};

    #[test]
    fn test_rating_and_priority_bands() {
        assert_eq!(rating(85), "EXCELLENT");
        assert_eq!(rating(84), "STRONG");
        assert_eq!(rating(60), "ADEQUATE");
        assert_eq!(rating(59), "NEEDS WORK");
        assert_eq!(priority(4), "CRITICAL");
        assert_eq!(priority(5), "IMPORTANT");
        assert_eq!(priority(10), "HELPFUL");
        assert_eq!(score_bar(73), "███████░░░");
    }

    #[tokio::test]
    async fn test_report_sections() {
        let result = Optimizer::rule_based()
            .optimize(
                "Ayanda Zulu\nProject Manager\n- Delivered 12 projects on budget",
                "Project manager with PMP, Agile and stakeholder management",
                &AnalysisContext::default(),
                &NoProgress,
            )
            .await;
        let report = render_text(&result);

        assert!(report.contains("KAROO OPTIMIZATION REPORT"));
        assert!(report.contains("AI Provider: Rule-Based (None)"));
        assert!(report.contains("Algorithm Breaker"));
        assert!(report.contains("(RECOMMENDED)"));
        assert!(report.contains("COVER LETTER"));
        assert!(report.contains("ALGORITHM BREAKER: "));
    }
}

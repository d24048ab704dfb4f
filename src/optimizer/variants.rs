//! CV variants and the deterministic fallback builder.
//!
//! When the rewrite phase is skipped, times out, fails, or leaves a variant
//! empty, that variant is assembled from the analysis outputs instead. A
//! fallback always ends with the untouched original CV, so it is never empty
//! and always carries the CV's header line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::agents::{AgentKind, AgentOutput, CvVariant};

const DIVIDER: &str = "══════════════ YOUR ORIGINAL CV ══════════════";

/// The three CV versions returned to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvVariants {
    pub ats_max: String,
    pub balanced: String,
    pub creative: String,
}

impl CvVariants {
    pub fn get(&self, variant: CvVariant) -> &str {
        match variant {
            CvVariant::AtsMax => &self.ats_max,
            CvVariant::Balanced => &self.balanced,
            CvVariant::Creative => &self.creative,
        }
    }

    pub fn set(&mut self, variant: CvVariant, text: String) {
        match variant {
            CvVariant::AtsMax => self.ats_max = text,
            CvVariant::Balanced => self.balanced = text,
            CvVariant::Creative => self.creative = text,
        }
    }
}

/// Builds fallback variants from analysis outputs.
pub struct FallbackVariants<'a> {
    cv: &'a str,
    outputs: &'a BTreeMap<AgentKind, AgentOutput>,
    overall_score: f64,
    date: &'a str,
}

impl<'a> FallbackVariants<'a> {
    /// `date` is printed verbatim in the header, e.g. `"18 October 2026"`.
    pub fn new(
        cv: &'a str,
        outputs: &'a BTreeMap<AgentKind, AgentOutput>,
        overall_score: f64,
        date: &'a str,
    ) -> Self {
        Self {
            cv,
            outputs,
            overall_score,
            date,
        }
    }

    fn content(&self, kind: AgentKind) -> &'a str {
        self.outputs
            .get(&kind)
            .map(|o| o.optimized_content.as_str())
            .unwrap_or("")
    }

    fn missing_keywords_finding(&self) -> &'a str {
        self.outputs
            .get(&AgentKind::AlgorithmBreaker)
            .and_then(|o| o.findings.iter().find(|f| f.contains("Missing")))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn header(&self) -> String {
        let title = format!("Karoo OPTIMIZED - {}", self.date);
        let score = format!("Overall Score: {:.1}/100", self.overall_score);
        let width = title.chars().count().max(score.chars().count()) + 4;
        let line = |text: &str| format!("║  {:<w$}║", text, w = width - 2);
        format!(
            "╔{bar}╗\n{}\n{}\n╚{bar}╝\n\n",
            line(&title),
            line(&score),
            bar = "═".repeat(width)
        )
    }

    fn body(&self, variant: CvVariant) -> String {
        let compliance = self.content(AgentKind::ComplianceGuardian);
        let narrative = self.content(AgentKind::FutureArchitect);
        match variant {
            CvVariant::AtsMax => format!(
                "═══ ATS-MAX VARIANT (Maximum Parse Rate) ═══\n\n\
                 OPTIMIZED SUMMARY:\n{}\n\nMISSING KEYWORDS TO ADD:\n{}\n\nSEMANTIC CONTEXT:\n{}",
                first_non_empty(
                    &[self.content(AgentKind::AlgorithmBreaker), compliance],
                    "[Apply the ATS-optimized summary from the Algorithm Breaker agent above]",
                ),
                self.missing_keywords_finding(),
                first_non_empty(
                    &[self.content(AgentKind::SemanticMatcher)],
                    "[Add JD language throughout your experience section]",
                ),
            ),
            CvVariant::Balanced => format!(
                "═══ BALANCED VARIANT (RECOMMENDED) ═══\n\n\
                 COMPELLING SUMMARY:\n{}\n\nSTRONGEST ACHIEVEMENT EXAMPLE:\n{}",
                first_non_empty(
                    &[narrative, compliance],
                    "[Apply the career narrative from the Future Architect agent]",
                ),
                first_non_empty(
                    &[self.content(AgentKind::RecruiterScanner)],
                    "[Apply the rewritten bullet from the 6-Second Scanner agent]",
                ),
            ),
            CvVariant::Creative => format!(
                "═══ CREATIVE VARIANT (Human-First) ═══\n\n\
                 CAREER NARRATIVE:\n{}\n\nSA MARKET ANGLE:\n{}",
                first_non_empty(&[narrative], "[Build your story around progression and impact]"),
                first_non_empty(
                    &[self.content(AgentKind::SaSpecialist)],
                    "[Add market-specific positioning]",
                ),
            ),
        }
    }

    pub fn build(&self, variant: CvVariant) -> String {
        format!(
            "{}{}\n\n{}\n{}",
            self.header(),
            self.body(variant),
            DIVIDER,
            self.cv
        )
    }

    pub fn all(&self) -> CvVariants {
        let mut variants = CvVariants::default();
        for variant in CvVariant::ALL {
            variants.set(variant, self.build(variant));
        }
        variants
    }
}

fn first_non_empty<'a>(candidates: &[&'a str], placeholder: &'a str) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|c| !c.trim().is_empty())
        .unwrap_or(placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CV: &str = "Naledi Dlamini\nFinancial Analyst\n- Cut month-end close from 10 to 4 days";

    fn outputs() -> BTreeMap<AgentKind, AgentOutput> {
        let mut map = BTreeMap::new();
        map.insert(
            AgentKind::AlgorithmBreaker,
            AgentOutput::new(AgentKind::AlgorithmBreaker, 60).with_findings(vec![
                "ATS Score: 60/100".into(),
                "Missing Keywords: power bi, ifrs".into(),
            ]),
        );
        map.insert(
            AgentKind::ComplianceGuardian,
            AgentOutput::new(AgentKind::ComplianceGuardian, 80)
                .with_content("Detail-driven analyst with IFRS reporting depth."),
        );
        map.insert(
            AgentKind::RecruiterScanner,
            AgentOutput::new(AgentKind::RecruiterScanner, 70)
                .with_content("Cut month-end close by 60% (10 to 4 days)"),
        );
        map
    }

    #[test]
    fn test_every_variant_ends_with_original_cv() {
        let out = outputs();
        let variants = FallbackVariants::new(CV, &out, 64.2, "18 October 2026").all();
        for variant in CvVariant::ALL {
            let text = variants.get(variant);
            assert!(text.contains("Karoo OPTIMIZED - 18 October 2026"));
            assert!(text.contains("Overall Score: 64.2/100"));
            assert!(text.contains("Naledi Dlamini"));
            assert!(text.ends_with(&format!("{}\n{}", DIVIDER, CV)));
        }
    }

    #[test]
    fn test_ats_body_prefers_algorithm_then_compliance() {
        let out = outputs();
        let ats = FallbackVariants::new(CV, &out, 64.2, "1 May 2026").build(CvVariant::AtsMax);
        assert!(ats.contains("OPTIMIZED SUMMARY:\nDetail-driven analyst with IFRS reporting depth."));
        assert!(ats.contains("MISSING KEYWORDS TO ADD:\nMissing Keywords: power bi, ifrs"));
        assert!(ats.contains("SEMANTIC CONTEXT:\n[Add JD language throughout your experience section]"));
    }

    #[test]
    fn test_balanced_and_creative_bodies() {
        let out = outputs();
        let fallback = FallbackVariants::new(CV, &out, 64.2, "1 May 2026");
        let balanced = fallback.build(CvVariant::Balanced);
        assert!(balanced.contains("COMPELLING SUMMARY:\nDetail-driven analyst"));
        assert!(balanced.contains("STRONGEST ACHIEVEMENT EXAMPLE:\nCut month-end close by 60%"));

        let creative = fallback.build(CvVariant::Creative);
        assert!(creative.contains("CAREER NARRATIVE:\n[Build your story around progression and impact]"));
        assert!(creative.contains("SA MARKET ANGLE:\n[Add market-specific positioning]"));
    }

    #[test]
    fn test_empty_inputs_still_non_empty() {
        let out = BTreeMap::new();
        let variants = FallbackVariants::new("", &out, 0.0, "1 May 2026").all();
        assert!(variants.ats_max.contains("[Apply the ATS-optimized summary"));
        assert!(!variants.balanced.is_empty());
        assert!(!variants.creative.is_empty());
    }

    #[test]
    fn test_header_box_is_aligned() {
        let out = BTreeMap::new();
        let header = FallbackVariants::new(CV, &out, 88.0, "18 October 2026").header();
        let widths: Vec<usize> = header
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths.len(), 4);
        assert!(widths.iter().all(|w| *w == widths[0]));
    }
}

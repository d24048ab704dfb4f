//! Compliance Guardian
//!
//! Flags personal data that GDPR and POPIA say never belongs on a CV, and
//! claims that read as exaggerated. The rule-based score starts at 100 and
//! loses 10 per sensitive item and 5 per exaggeration, floored at 20.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::{Agent, AgentKind, AgentOutput, AnalysisContext};
use crate::constants::llm::CV_EXCERPT_CHARS;
use crate::types::{Result, join_or, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Compliance Guardian, a legal ethics reviewer for CVs: GDPR, \
POPIA, South African labour law and truthfulness of claims.

Respond in EXACTLY this layout:

COMPLIANCE_SCORE: [0-100]
LEGAL_RISKS: [comma-separated OR NONE]
GDPR_STATUS: [COMPLIANT/PARTIAL/NON-COMPLIANT, with reason]
POPIA_STATUS: [COMPLIANT/PARTIAL/NON-COMPLIANT, with reason]
TRUTH_FLAGS: [suspicious claims OR NONE]
SENSITIVE_DATA: [items to remove OR NONE]
DISCRIMINATION_RISKS: [content that could expose the candidate to bias OR NONE]
FIXES:
- [fix 1]
- [fix 2]
- [fix 3]
SANITIZED_SUMMARY: [professional summary with all legally risky content removed]";

fn ci(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("valid compliance regex")
}

static SENSITIVE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("SA ID number", ci(r"\b\d{13}\b")),
        ("date of birth", ci(r"\bDOB\b|\bdate of birth\b|\bborn:\s*\d")),
        ("marital status", ci(r"\b(married|single|divorced|widowed|separated)\b")),
        (
            "religion",
            ci(r"\b(christian|muslim|jewish|hindu|buddhist|catholic|protestant|atheist)\b"),
        ),
        (
            "home address",
            ci(r"\b\d{1,5}\s+\w+\s+(street|road|avenue|drive|lane|close|crescent)\b"),
        ),
        ("photo reference", ci(r"\[photo\]|\[image\]|photograph enclosed")),
        (
            "salary history",
            ci(r"previous salary|salary history|current salary:\s*R"),
        ),
        (
            "id/passport explicit",
            ci(r"\bID\s*number\s*:\s*\d|\bpassport\s*:\s*[A-Z]\d"),
        ),
        ("race/ethnicity explicit", ci(r"\brace:\s*\w+|\bethnicity:\s*\w+")),
        ("disability explicit", ci(r"\bdisability:\s*\w+")),
    ]
});

static EXAGGERATION_FLAGS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            ci(r"\b(guru|ninja|rockstar|wizard|unicorn)\b"),
            "Unprofessional buzzword",
        ),
        (
            ci(r"\b100%\s+(success rate|client satisfaction|accuracy)\b"),
            "Unverifiable 100% claim",
        ),
        (ci(r"saved\s+\$\s*\d{8,}"), "Implausibly large savings: verify"),
        (
            ci(r"increased\s+revenue\s+by\s+\d{3,}%"),
            "Very high %: ensure verifiable",
        ),
        (
            ci(r"managed\s+budget\s+of\s+[R$]\s*\d{10,}"),
            "Unusually large budget claim",
        ),
    ]
});

const GDPR_CRITICAL: &[&str] = &[
    "marital status",
    "religion",
    "date of birth",
    "photo reference",
    "race/ethnicity explicit",
];
const POPIA_CRITICAL: &[&str] = &["SA ID number", "home address", "id/passport explicit"];

fn find_sensitive(cv: &str) -> Vec<&'static str> {
    SENSITIVE_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(cv))
        .map(|(label, _)| *label)
        .collect()
}

fn flag_exaggerations(cv: &str) -> Vec<&'static str> {
    EXAGGERATION_FLAGS
        .iter()
        .filter(|(re, _)| re.is_match(cv))
        .map(|(_, label)| *label)
        .collect()
}

fn gdpr_status(sensitive: &[&str]) -> String {
    let risks: Vec<&str> = sensitive
        .iter()
        .copied()
        .filter(|s| GDPR_CRITICAL.contains(s))
        .collect();
    if !risks.is_empty() {
        format!("NON-COMPLIANT: {}", risks.join(", "))
    } else if !sensitive.is_empty() {
        "PARTIAL: minor concerns".to_string()
    } else {
        "COMPLIANT".to_string()
    }
}

fn popia_status(sensitive: &[&str]) -> String {
    let risks: Vec<&str> = sensitive
        .iter()
        .copied()
        .filter(|s| POPIA_CRITICAL.contains(s))
        .collect();
    if risks.is_empty() {
        "COMPLIANT".to_string()
    } else {
        format!("NON-COMPLIANT: {}", risks.join(", "))
    }
}

fn heuristic_score(sensitive: usize, flags: usize) -> i64 {
    (100 - sensitive as i64 * 10 - flags as i64 * 5).clamp(20, 100)
}

fn build_fixes(fields: &ResponseFields<'_>, sensitive: &[&str], flags: &[&str]) -> Vec<String> {
    let mut fixes = fields.fixes("SANITIZED_SUMMARY", 4).unwrap_or_default();
    for label in sensitive.iter().take(3) {
        fixes.insert(
            0,
            format!("REMOVE immediately: {}: never required on a CV", label),
        );
    }
    fixes.extend(
        flags
            .iter()
            .take(2)
            .map(|flag| format!("Review accuracy: {}", flag)),
    );
    fixes.truncate(8);
    fixes
}

fn counted(items: &[&str], shown: usize) -> String {
    format!(
        "{} items: {}",
        items.len(),
        join_or(&items[..items.len().min(shown)], "None")
    )
}

pub struct ComplianceGuardian {
    runtime: AgentRuntime,
}

impl ComplianceGuardian {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for ComplianceGuardian {
    fn kind(&self) -> AgentKind {
        AgentKind::ComplianceGuardian
    }

    async fn analyze(&self, cv: &str, _jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let sensitive = find_sensitive(cv);
        let flags = flag_exaggerations(cv);
        let gdpr = gdpr_status(&sensitive);
        let popia = popia_status(&sensitive);

        let prompt = format!(
            "CV:\n{}\n\nContext:\n- Market: {}\n\nPre-analysis:\n- Sensitive data: {}\n\
             - Truth flags: {}\n- GDPR: {}\n- POPIA: {}\n\nFull compliance audit.",
            truncate_chars(cv, CV_EXCERPT_CHARS),
            ctx.target_market,
            join_or(&sensitive, "None"),
            join_or(&flags, "None"),
            gdpr,
            popia,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields
            .int("COMPLIANCE_SCORE")
            .unwrap_or_else(|| heuristic_score(sensitive.len(), flags.len()));

        let findings = vec![
            format!("Compliance Score: {}/100", score.clamp(0, 100)),
            format!("GDPR Status: {}", gdpr),
            format!("POPIA Status: {}", popia),
            format!("Sensitive Data: {}", counted(&sensitive, 3)),
            format!("Truth/Accuracy Flags: {}", counted(&flags, 2)),
        ];

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(build_fixes(&fields, &sensitive, &flags))
            .with_content(fields.section("SANITIZED_SUMMARY"))
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

    const RISKY_CV: &str = "Sipho Dlamini\nID: 8001015009087\nMarital status: Married\n\
                            Sales guru who increased revenue by 400%";

    #[test]
    fn test_sensitive_items_in_label_order() {
        assert_eq!(find_sensitive(RISKY_CV), vec!["SA ID number", "marital status"]);
        assert!(find_sensitive("Engineer at Acme").is_empty());
    }

    #[test]
    fn test_statuses() {
        assert_eq!(
            gdpr_status(&["SA ID number", "marital status"]),
            "NON-COMPLIANT: marital status"
        );
        assert_eq!(gdpr_status(&["salary history"]), "PARTIAL: minor concerns");
        assert_eq!(gdpr_status(&[]), "COMPLIANT");
        assert_eq!(popia_status(&["SA ID number"]), "NON-COMPLIANT: SA ID number");
        assert_eq!(popia_status(&["religion"]), "COMPLIANT");
    }

    #[tokio::test]
    async fn test_rule_based_flags_personal_data() {
        let out = ComplianceGuardian::new(AgentRuntime::rule_based())
            .analyze(RISKY_CV, "Sales lead", &AnalysisContext::default())
            .await
            .unwrap();

        // two sensitive items, two exaggerations
        assert_eq!(out.score(), 70);
        assert!(out.recommendations.iter().any(|r| r.contains("REMOVE")));
        assert_eq!(
            out.recommendations[0],
            "REMOVE immediately: marital status: never required on a CV"
        );
        assert!(out.recommendations.contains(&"Review accuracy: Unprofessional buzzword".to_string()));
        assert!(out.findings.contains(&"GDPR Status: NON-COMPLIANT: marital status".to_string()));
    }

    #[tokio::test]
    async fn test_sensitive_fields_lower_the_score() {
        let clean = "Sipho Dlamini\nSales lead at Acme Retail\nGrew regional revenue by 25% in two years";
        let risky = format!("{}\nMarital Status: Married\nID: 8001015009087", clean);
        let agent = ComplianceGuardian::new(AgentRuntime::rule_based());
        let ctx = AnalysisContext::default();

        let clean_out = agent.analyze(clean, "Sales lead", &ctx).await.unwrap();
        let risky_out = agent.analyze(&risky, "Sales lead", &ctx).await.unwrap();

        assert_eq!(clean_out.score(), 100);
        assert_eq!(risky_out.score(), 80);
        assert!(risky_out.score() < clean_out.score());
        assert!(!clean_out.recommendations.iter().any(|r| r.contains("REMOVE")));
        assert!(
            risky_out
                .recommendations
                .iter()
                .any(|r| r.starts_with("REMOVE immediately: marital status"))
        );
        assert!(
            risky_out
                .recommendations
                .iter()
                .any(|r| r.starts_with("REMOVE immediately: SA ID number"))
        );
    }

    #[tokio::test]
    async fn test_model_score_is_clamped() {
        let stub = Arc::new(StubProvider::replying(
            "COMPLIANCE_SCORE: 250\nFIXES:\n- Drop the ID number\nSANITIZED_SUMMARY: Sales lead.",
        ));
        let out = ComplianceGuardian::new(AgentRuntime::new(Some(stub), RetryConfig::default()))
            .analyze(RISKY_CV, "Sales lead", &AnalysisContext::default())
            .await
            .unwrap();
        assert!(out.ai_powered);
        assert_eq!(out.score(), 100);
        assert_eq!(out.findings[0], "Compliance Score: 100/100");
    }

    #[test]
    fn test_score_floor() {
        assert_eq!(heuristic_score(10, 5), 20);
        assert_eq!(heuristic_score(0, 0), 100);
    }
}

//! International readiness: GDPR-sensitive personal data and the sections
//! US/UK/EU/APAC parsers expect.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::{Agent, AgentKind, AgentOutput, AnalysisContext};
use crate::constants::llm::CV_EXCERPT_CHARS;
use crate::types::{Result, join_or, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Global Standard Setter, an international ATS expert for the US, UK, EU, \
APAC and Middle East markets (Taleo, iCIMS, Workday, Greenhouse, Civil Service Jobs, NHS Jobs, \
SAP SuccessFactors, XING, SEEK, Bayt, GulfTalent).

Respond in EXACTLY this layout:

GLOBAL_SCORE: [0-100]
US_SCORE: [0-100] [key issue or strength]
UK_SCORE: [0-100] [key issue]
EU_SCORE: [0-100] [GDPR status]
APAC_SCORE: [0-100] [notes]
ME_SCORE: [0-100] [Gulf market notes]
LINKEDIN_SCORE: [0-100] [profile optimization status]
GDPR_RISKS: [comma-separated risks OR NONE]
MISSING_SECTIONS: [comma-separated missing sections OR NONE]
VISA_ELIGIBILITY: [work-right considerations]
FIXES:
- [fix 1]
- [fix 2]
- [fix 3]
- [fix 4]
GLOBAL_SUMMARY: [2-3 sentence GDPR-compliant international summary]";

const JD_EXCERPT: usize = 2000;

fn ci(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("valid global setter regex")
}

static GDPR_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("marital_status", ci(r"\b(married|single|divorced|widowed|separated)\b")),
        (
            "religion",
            ci(r"\b(christian|muslim|jewish|hindu|buddhist|catholic|protestant|atheist)\b"),
        ),
        ("date_of_birth", ci(r"\bDOB\b|date of birth|born:|\bD\.O\.B\b")),
        ("id_number", ci(r"\b\d{13}\b")),
        ("photo", ci(r"\[photo\]|\[image\]|photograph")),
        ("nationality_explicit", ci(r"\bnationality:\s*\w+")),
        ("gender_explicit", ci(r"\bgender:\s*(male|female|other)\b")),
        ("race_explicit", ci(r"\brace:\s*\w+|\bethnicity:\s*\w+")),
    ]
});

static REQUIRED_SECTIONS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("contact_info", ci(r"@|email|phone|tel|\+\d")),
        ("linkedin", ci(r"linkedin\.com")),
        ("summary_profile", ci(r"summary|objective|profile|about")),
        ("work_experience", ci(r"experience|employment|work history|career")),
        ("education", ci(r"education|qualification|degree|university")),
        ("skills", ci(r"skills|competencies|expertise|technologies")),
    ]
});

fn gdpr_risks(cv: &str) -> Vec<&'static str> {
    GDPR_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(cv))
        .map(|(name, _)| *name)
        .collect()
}

fn missing_sections(cv: &str) -> Vec<&'static str> {
    REQUIRED_SECTIONS
        .iter()
        .filter(|(_, re)| !re.is_match(cv))
        .map(|(name, _)| *name)
        .collect()
}

fn spaced(name: &str) -> String {
    name.replace('_', " ")
}

fn build_fixes(fields: &ResponseFields<'_>, risks: &[&str], missing: &[&str]) -> Vec<String> {
    let mut fixes = fields.fixes("GLOBAL_SUMMARY", 5).unwrap_or_default();
    for risk in risks {
        fixes.insert(
            0,
            format!("REMOVE: {}: illegal to include in UK/EU/US CVs", spaced(risk)),
        );
    }
    for section in missing {
        fixes.push(format!(
            "ADD: {} section: required for international ATS",
            spaced(section)
        ));
    }
    fixes.truncate(10);
    fixes
}

pub struct GlobalSetter {
    runtime: AgentRuntime,
}

impl GlobalSetter {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for GlobalSetter {
    fn kind(&self) -> AgentKind {
        AgentKind::GlobalSetter
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let risks = gdpr_risks(cv);
        let missing = missing_sections(cv);

        let prompt = format!(
            "CV TEXT:\n{}\n\nJOB DESCRIPTION:\n{}\n\nTARGET MARKET: {}\n\n\
             Pre-analysis:\n- GDPR risks: {}\n- Missing sections: {}\n\n\
             Full international analysis.",
            truncate_chars(cv, CV_EXCERPT_CHARS),
            truncate_chars(jd, JD_EXCERPT),
            ctx.target_market,
            join_or(&risks, "None"),
            join_or(&missing, "None"),
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields.int_or("GLOBAL_SCORE", 70);

        let findings = vec![
            format!("Global Readiness: {}/100", score.clamp(0, 100)),
            format!("US Fortune 500: {}", fields.line("US_SCORE", 80, "N/A")),
            format!("UK Civil Service: {}", fields.line("UK_SCORE", 80, "N/A")),
            format!("EU GDPR Compliant: {}", fields.line("EU_SCORE", 80, "N/A")),
            format!("APAC Ready: {}", fields.line("APAC_SCORE", 80, "N/A")),
            format!("LinkedIn Score: {}", fields.line("LINKEDIN_SCORE", 80, "N/A")),
            format!("GDPR Risks: {}", join_or(&risks, "None")),
            format!("Missing Sections: {}", join_or(&missing, "All present")),
        ];

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(build_fixes(&fields, &risks, &missing))
            .with_content(fields.section("GLOBAL_SUMMARY"))
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

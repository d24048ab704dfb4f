//! South African market specialist: NQF level, B-BBEE/EE signals, SA
//! keyword coverage and critical-skills eligibility.

use async_trait::async_trait;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::present;
use super::{Agent, AgentKind, AgentOutput, AnalysisContext};
use crate::constants::llm::{CV_EXCERPT_CHARS, JD_EXCERPT_CHARS};
use crate::types::{Result, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The South African Specialist, an expert in the South African job market: \
B-BBEE Codes of Good Practice, the Employment Equity Act, SETA and SAQA NQF frameworks, LRA, BCEA, \
POPIA and the Critical Skills Visa list. You know how PNet, Careers24, LinkedIn ZA and Indeed ZA rank candidates.

Respond in EXACTLY this layout:

SA_SCORE: [0-100]
BBEE_STATUS: [Identified/Not Identified, with strategic value]
BBEE_RECOMMENDATION: [advice on leveraging EE status]
NQF_LEVEL: Current:[X] Required:[X] Gap:[None/description]
EE_POSITIONING: [Employment Equity positioning strategy]
CRITICAL_SKILLS: [YES/NO, with reason]
SA_PLATFORMS: PNet:[X]% Careers24:[X]% LinkedIn_ZA:[X]%
SA_KEYWORDS_ADD: [comma-separated SA keywords]
FIXES:
- [fix 1]
- [fix 2]
- [fix 3]
- [fix 4]
SA_SUMMARY: [2-3 sentence professional summary tuned for SA employers]";

const SA_KEYWORDS: &[&str] = &[
    "B-BBEE", "Employment Equity", "EE", "SETA", "NQF", "SAQA", "LRA", "BCEA", "OHSA", "POPIA",
    "Critical Skills", "Skills Development", "Transformation", "previously disadvantaged",
    "historically disadvantaged", "equity candidate", "PNet", "Careers24", "South Africa",
    "Cape Town", "Johannesburg", "Durban", "Pretoria", "Sandton", "Midrand", "KwaZulu-Natal",
    "Western Cape", "Gauteng", "Rand", "ZAR", "JSE", "SARB", "SARS", "CIPC", "Companies Act",
];

const BBEE_INDICATORS: &[&str] = &[
    "black", "coloured", "indian", "asian", "female", "disability", "youth",
    "previously disadvantaged", "historically disadvantaged", "equity", "transformation", "hdsa",
    "previously disadvantaged individual",
];

const CRITICAL_SKILLS: &[&str] = &[
    "data science", "machine learning", "artificial intelligence", "cybersecurity",
    "cloud architect", "software engineer", "chemical engineer", "petroleum engineer", "actuary",
    "anaesthesiologist", "radiologist", "cardiologist", "neurosurgeon", "quantity surveyor",
    "geologist", "metallurgist",
];

/// Highest level first; the first hit wins
const NQF_MAP: &[(u8, &[&str], &str)] = &[
    (10, &["phd", "doctorate", "d.phil", "doctor of"], "Doctoral Degree"),
    (
        9,
        &["master", "mba", "msc", "m.com", "m.eng", "mtech", "m.tech", "mphil"],
        "Master's Degree",
    ),
    (
        8,
        &["honours", "hons", "postgraduate diploma", "pgdip", "advanced diploma"],
        "Honours/PG Diploma",
    ),
    (
        7,
        &["bachelor", "b.sc", "b.com", "b.tech", "b.eng", "btech", "bcom", "bsc", "beng", "ba "],
        "Bachelor's Degree",
    ),
    (6, &["national diploma", "nd ", "dip tech"], "National Diploma"),
    (5, &["higher certificate", "hc ", "advanced certificate"], "Higher Certificate"),
    (
        4,
        &["national certificate", "grade 12", "matric", "nsc", "nc(v)"],
        "Matric/NC(V)",
    ),
];

const DEFAULT_FIXES: [&str; 4] = [
    "Add NQF level explicitly after each qualification",
    "Include B-BBEE status if applicable: a major differentiator",
    "Add SETA registration if relevant to your field",
    "Optimise for PNet keyword search by including SA industry terms",
];

/// `(level, description)`; level is "Unknown" when nothing matched
fn detect_nqf(cv: &str) -> (String, String) {
    let t = cv.to_lowercase();
    NQF_MAP
        .iter()
        .find(|(_, keywords, _)| keywords.iter().any(|k| t.contains(k)))
        .map(|(level, _, desc)| (level.to_string(), format!("{} (NQF Level {})", desc, level)))
        .unwrap_or_else(|| {
            (
                "Unknown".to_string(),
                "Qualification not clearly stated".to_string(),
            )
        })
}

fn sa_keyword_coverage(cv: &str) -> usize {
    let upper = cv.to_uppercase();
    let found = SA_KEYWORDS
        .iter()
        .filter(|kw| upper.contains(&kw.to_uppercase()))
        .count();
    found * 100 / SA_KEYWORDS.len()
}

fn detect_bbee(cv: &str) -> String {
    let found = present(&cv.to_lowercase(), BBEE_INDICATORS);
    if found.is_empty() {
        "No explicit B-BBEE indicators: consider strategic disclosure".to_string()
    } else {
        format!(
            "Potential EE candidate indicators: {}",
            found[..found.len().min(3)].join(", ")
        )
    }
}

fn detect_critical_skills(cv: &str) -> String {
    let found = present(&cv.to_lowercase(), CRITICAL_SKILLS);
    if found.is_empty() {
        "Does not appear to match Critical Skills Visa list".to_string()
    } else {
        format!("QUALIFIES: {}", found[..found.len().min(2)].join(", "))
    }
}

pub struct SaSpecialist {
    runtime: AgentRuntime,
}

impl SaSpecialist {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for SaSpecialist {
    fn kind(&self) -> AgentKind {
        AgentKind::SaSpecialist
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let (nqf_level, nqf_desc) = detect_nqf(cv);
        let coverage = sa_keyword_coverage(cv);
        let bbee = detect_bbee(cv);
        let critical = detect_critical_skills(cv);

        let prompt = format!(
            "CV TEXT:\n{}\n\nJOB DESCRIPTION:\n{}\n\nCONTEXT:\n\
             - Target: {}\n- Level: {}\n- Industry: {}\n- Target role: {}\n\n\
             Pre-analysis:\n\
             - NQF Level: {}: {}\n\
             - SA keyword coverage: {}%\n\
             - B-BBEE indicators found: {}\n\
             - Critical Skills match: {}\n\n\
             Provide full SA market optimization with a specific PNet/Careers24 strategy.",
            truncate_chars(cv, CV_EXCERPT_CHARS),
            truncate_chars(jd, JD_EXCERPT_CHARS),
            ctx.target_market,
            ctx.experience_level,
            ctx.industry_or("Not specified"),
            ctx.target_role_or("Not specified"),
            nqf_level,
            nqf_desc,
            coverage,
            bbee,
            critical,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields.int_or("SA_SCORE", 60);

        let findings = vec![
            format!("SA Market Score: {}/100", score.clamp(0, 100)),
            format!("NQF Level: {}: {}", nqf_level, nqf_desc),
            format!("SA Keyword Coverage: {}%", coverage),
            format!("B-BBEE Indicators: {}", bbee),
            format!("Critical Skills Match: {}", critical),
            format!(
                "B-BBEE Status: {}",
                fields.section_or("BBEE_STATUS", 120, "See full analysis")
            ),
            format!(
                "EE Positioning: {}",
                fields.section_or("EE_POSITIONING", 120, "See full analysis")
            ),
        ];
        let recommendations = fields
            .fixes("SA_SUMMARY", 6)
            .unwrap_or_else(|| DEFAULT_FIXES.iter().map(|s| s.to_string()).collect());

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(recommendations)
            .with_content(fields.section("SA_SUMMARY"))
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

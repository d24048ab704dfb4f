//! Algorithm Breaker
//!
//! ATS parse simulation: format hazards, keyword coverage against the job
//! description, section presence.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::debug;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::{jd_keywords, word_count};
use super::{Agent, AgentKind, AgentOutput, AnalysisContext};
use crate::constants::llm::{CV_EXCERPT_CHARS, JD_EXCERPT_CHARS};
use crate::types::{Result, join_or, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Algorithm Breaker, an expert in how applicant tracking systems \
(Taleo, Workday, Greenhouse, Lever, SmartRecruiters, iCIMS, SAP SuccessFactors) parse and rank CVs.

Analyse the CV against the job description and answer in EXACTLY this layout:

ATS_SCORE: [0-100]
PARSER_RATES: Taleo:[X]% Workday:[X]% Greenhouse:[X]% Lever:[X]% SmartRecruiters:[X]%
FORMAT_SCORE: [0-100]
KEYWORD_DENSITY: [X]% (ideal is 2-4%)
KEYWORD_MATCH: [X]%
MISSING_KEYWORDS: [top 10 critical missing keywords, comma-separated]
BLACK_FLAGS: [comma-separated list OR NONE]
SECTION_SCORES: Contact:[X] Summary:[X] Experience:[X] Education:[X] Skills:[X]
FIXES:
- [fix 1]
- [fix 2]
- [fix 3]
- [fix 4]
- [fix 5]
OPTIMIZED_SUMMARY: [2-3 sentence keyword-rich professional summary]";

/// Keywords reported as missing
const MAX_MISSING: usize = 20;

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|.{3,}\|").expect("valid table regex"));
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(header text|footer text|\[image\]|\[photo\])")
        .expect("valid placeholder regex")
});
static FANCY_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[●■▪►✓✗]").expect("valid bullet regex"));
static CV_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)curriculum vitae|c\.v\.|cv:").expect("valid cv label regex")
});
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.]+@[\w.]+").expect("valid email regex"));
static CONTACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@|phone|\+\d").expect("valid contact regex"));

/// Layout hazards that trip ATS parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlackFlag {
    MarkdownTables,
    ExcessiveTabs,
    UnicodeCharacters,
    ImagePlaceholders,
    SpecialBulletChars,
    RedundantCvLabel,
    TooShort,
    TooLong,
    NoEmailDetected,
}

impl BlackFlag {
    fn name(self) -> &'static str {
        match self {
            Self::MarkdownTables => "markdown_tables",
            Self::ExcessiveTabs => "excessive_tabs",
            Self::UnicodeCharacters => "unicode_characters",
            Self::ImagePlaceholders => "image_placeholders",
            Self::SpecialBulletChars => "special_bullet_chars",
            Self::RedundantCvLabel => "redundant_cv_label",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::NoEmailDetected => "no_email_detected",
        }
    }

    fn fix(self) -> Option<&'static str> {
        Some(match self {
            Self::MarkdownTables => "Remove all tables; replace them with plain bullet-point lists.",
            Self::ExcessiveTabs => "Replace tab indentation with spaces throughout.",
            Self::UnicodeCharacters => {
                "Replace all special/unicode characters with ASCII equivalents."
            }
            Self::SpecialBulletChars => {
                "Replace fancy bullet symbols (●►✓) with standard hyphens or asterisks."
            }
            Self::TooShort => "CV under 200 words: expand experience descriptions with metrics.",
            Self::TooLong => "CV exceeds 1500 words: trim to 2 pages max for ATS.",
            Self::NoEmailDetected => "Ensure email address is in plain text format, not an image.",
            Self::RedundantCvLabel => {
                "Remove the \"Curriculum Vitae\" header: it wastes prime ATS real estate."
            }
            Self::ImagePlaceholders => return None,
        })
    }
}

fn non_ascii_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_ascii()).count()
}

fn detect_black_flags(text: &str) -> Vec<BlackFlag> {
    let mut flags = Vec::new();
    if TABLE_RE.is_match(text) {
        flags.push(BlackFlag::MarkdownTables);
    }
    if text.matches('\t').count() > 5 {
        flags.push(BlackFlag::ExcessiveTabs);
    }
    if non_ascii_count(text) > 15 {
        flags.push(BlackFlag::UnicodeCharacters);
    }
    if PLACEHOLDER_RE.is_match(text) {
        flags.push(BlackFlag::ImagePlaceholders);
    }
    if FANCY_BULLET_RE.find_iter(text).count() > 8 {
        flags.push(BlackFlag::SpecialBulletChars);
    }
    if CV_LABEL_RE.is_match(text) {
        flags.push(BlackFlag::RedundantCvLabel);
    }
    match word_count(text) {
        n if n < 200 => flags.push(BlackFlag::TooShort),
        n if n > 1500 => flags.push(BlackFlag::TooLong),
        _ => {}
    }
    if !EMAIL_RE.is_match(text) {
        flags.push(BlackFlag::NoEmailDetected);
    }
    flags
}

/// Keyword coverage of the CV against the job description
#[derive(Debug, Clone)]
struct KeywordReport {
    match_pct: f64,
    density: f64,
    missing: Vec<String>,
}

fn analyze_keywords(cv: &str, jd: &str) -> KeywordReport {
    let unique = jd_keywords(jd);
    let cv_lower = cv.to_lowercase();
    let (matched, missing): (Vec<String>, Vec<String>) = unique
        .iter()
        .cloned()
        .partition(|w| cv_lower.contains(w.as_str()));

    let match_pct = matched.len() as f64 / unique.len().max(1) as f64 * 100.0;
    let occurrences: usize = matched.iter().map(|w| cv_lower.matches(w.as_str()).count()).sum();
    let density = occurrences as f64 / word_count(cv).max(1) as f64 * 100.0;

    KeywordReport {
        match_pct,
        density: density.min(15.0),
        missing: missing.into_iter().take(MAX_MISSING).collect(),
    }
}

fn format_score(text: &str) -> i64 {
    let mut score = 100;
    if TABLE_RE.is_match(text) {
        score -= 20;
    }
    if text.matches('\t').count() > 5 {
        score -= 15;
    }
    if non_ascii_count(text) > 15 {
        score -= 10;
    }
    match word_count(text) {
        n if n < 200 => score -= 20,
        n if n > 1500 => score -= 10,
        _ => {}
    }
    if !EMAIL_RE.is_match(text) {
        score -= 15;
    }
    score.clamp(0, 100)
}

fn section_scores(text: &str) -> String {
    let t = text.to_lowercase();
    let has = |needles: &[&str]| if needles.iter().any(|n| t.contains(n)) { 100 } else { 0 };
    let contact = if CONTACT_RE.is_match(&t) { 100 } else { 0 };
    format!(
        "Contact:{} Summary:{} Exp:{} Edu:{} Skills:{}",
        contact,
        has(&["summary", "objective", "profile", "professional"]),
        has(&["experience", "employment", "work history"]),
        has(&["education", "degree", "qualification", "university", "college"]),
        has(&["skills", "competencies", "technologies"]),
    )
}

fn build_fixes(fields: &ResponseFields<'_>, flags: &[BlackFlag], kw: &KeywordReport) -> Vec<String> {
    let mut fixes = fields.fixes("OPTIMIZED_SUMMARY", 6).unwrap_or_default();
    for fix in flags.iter().filter_map(|f| f.fix()) {
        fixes.insert(0, fix.to_string());
    }
    if !kw.missing.is_empty() {
        let top: Vec<&str> = kw.missing.iter().take(8).map(String::as_str).collect();
        fixes.push(format!(
            "Integrate missing keywords naturally: {}",
            top.join(", ")
        ));
    }
    fixes.truncate(10);
    fixes
}

pub struct AlgorithmBreaker {
    runtime: AgentRuntime,
}

impl AlgorithmBreaker {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for AlgorithmBreaker {
    fn kind(&self) -> AgentKind {
        AgentKind::AlgorithmBreaker
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let flags = detect_black_flags(cv);
        let flag_names: Vec<&str> = flags.iter().map(|f| f.name()).collect();
        let kw = analyze_keywords(cv, jd);
        let format = format_score(cv);
        let sections = section_scores(cv);
        debug!(
            "AlgorithmBreaker: {} flags, {:.1}% keyword match, {} missing",
            flags.len(),
            kw.match_pct,
            kw.missing.len()
        );

        let prompt = format!(
            "CV TEXT:\n{}\n\nJOB DESCRIPTION:\n{}\n\nTARGET MARKET: {}\nEXPERIENCE LEVEL: {}\n\n\
             Pre-analysis results:\n\
             - Black flags detected: {}\n\
             - Keyword match rate: {:.1}%\n\
             - Keyword density: {:.1}%\n\
             - Missing critical keywords: {}\n\
             - Format score: {}/100\n\
             - Section integrity: {}\n\n\
             Perform exhaustive ATS analysis. Be specific and actionable.",
            truncate_chars(cv, CV_EXCERPT_CHARS),
            truncate_chars(jd, JD_EXCERPT_CHARS),
            ctx.target_market,
            ctx.experience_level,
            join_or(&flag_names, "None"),
            kw.match_pct,
            kw.density,
            join_or(&kw.missing[..kw.missing.len().min(12)], "None"),
            format,
            sections,
        );

        let name = self.kind().display_name();
        let reply = self.runtime.ask(name, SYSTEM_PROMPT, &prompt).await;
        let fields = ResponseFields::new(&reply.text);
        let score = fields
            .int("ATS_SCORE")
            .unwrap_or_else(|| ((kw.match_pct * 0.7 + 15.0) as i64).min(100));

        let findings = vec![
            format!("ATS Score: {}/100", score.clamp(0, 100)),
            format!("Keyword Match Rate: {:.1}%", kw.match_pct),
            format!("Keyword Density: {:.1}% (ideal: 2-4%)", kw.density),
            format!("Format Score: {}/100", format),
            format!("Black Flags: {}", join_or(&flag_names, "None detected")),
            format!("Missing Keywords: {}", join_or(&kw.missing, "None")),
            format!("Parser Rates: {}", fields.line("PARSER_RATES", 200, "N/A")),
            format!("Section Scores: {}", sections),
        ];

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(build_fixes(&fields, &flags, &kw))
            .with_content(fields.section("OPTIMIZED_SUMMARY"))
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

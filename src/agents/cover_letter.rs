//! Cover Letter Composer
//!
//! Detects the company and role from the job description, then asks the
//! model for a three-paragraph letter. Without a model it assembles a
//! deterministic letter from the strongest metric lines of the CV, so the
//! letter is always usable.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

use super::parse::ResponseFields;
use super::runtime::AgentRuntime;
use super::text::word_count;
use super::{Agent, AgentKind, AgentOutput, AnalysisContext, TargetMarket};
use crate::constants::llm::JD_EXCERPT_CHARS;
use crate::types::{Result, truncate_chars};

const SYSTEM_PROMPT: &str = "You are The Cover Letter Composer, a career writer whose letters get interviews.

Rules: open with an insight, never with \"I am writing to apply\". Three paragraphs, 280-350 words. \
Reference specific JD elements.
P1: hook (company or industry insight or challenge)
P2: proof (2-3 achievements that match their needs)
P3: confident close (no \"I hope to hear from you\")

South African employers: slightly more formal, mention B-BBEE if relevant. International: punchy, \
direct, results first.

Respond in EXACTLY this layout:

COVER_LETTER_START
[full cover letter]
COVER_LETTER_END

QUALITY_SCORE: [0-100]
PERSONALIZATION: [Generic/Basic/Good/Excellent]
WORD_COUNT: [actual count]
HOOK_TYPE: [Industry insight/Company challenge/Provocative stat/Direct value prop]
TIPS:
- [personalization tip]
- [improvement tip]";

const LETTER_START: &str = "COVER_LETTER_START";
const LETTER_END: &str = "COVER_LETTER_END";

pub(crate) const UNKNOWN_COMPANY: &str = "[Company Name]";
pub(crate) const UNKNOWN_ROLE: &str = "[Role]";

static COMPANY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)(?:at|join|company|organisation|organization):\s*([A-Z][A-Za-z\s&]{2,30})",
        r"(?m)^([A-Z][A-Za-z\s&]{2,30})\s+(?:is|are)\s+(?:looking|seeking|hiring)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid company regex"))
    .collect()
});

static ROLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?im)(?:position|role|job title|vacancy):\s*(.+?)(?:\n|$)",
        r"(?im)^([\w\s/]{5,40})\n",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid role regex"))
    .collect()
});

static METRIC_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+%|[$£]\s?[\d,]+|\bR\s?[\d,]{3,}|\d+\s*(?:people|staff|clients|users|million|k)\b")
        .expect("valid metric line regex")
});

const DEFAULT_TIPS: [&str; 2] = [
    "Add hiring manager's name if you can find it",
    "Reference a recent company news item",
];

fn first_capture(patterns: &[Regex], text: &str, max_chars: usize) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| truncate_chars(m.as_str().trim(), max_chars).to_string())
            .filter(|s| !s.is_empty())
    })
}

fn detect_company(jd: &str) -> String {
    first_capture(&COMPANY_PATTERNS, jd, 40).unwrap_or_else(|| UNKNOWN_COMPANY.to_string())
}

fn detect_role(jd: &str) -> String {
    first_capture(&ROLE_PATTERNS, jd, 60).unwrap_or_else(|| UNKNOWN_ROLE.to_string())
}

/// Up to `limit` CV lines carrying the most metrics, in CV order on ties
fn strongest_metric_lines(cv: &str, limit: usize) -> Vec<String> {
    let mut scored: Vec<(usize, String)> = cv
        .lines()
        .map(|l| l.trim().trim_start_matches(['-', '*', '•', ' ']).trim())
        .filter(|l| !l.is_empty())
        .map(|l| (METRIC_LINE_RE.find_iter(l).count(), l.to_string()))
        .filter(|(hits, _)| *hits > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, line)| truncate_chars(&line, 160).trim_end_matches('.').to_string())
        .collect()
}

fn candidate_name(cv: &str) -> String {
    cv.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|l| truncate_chars(l, 60).to_string())
        .unwrap_or_else(|| "[Your Name]".to_string())
}

/// Deterministic letter for rule-based runs
fn template_letter(cv: &str, company: &str, role: &str, ctx: &AnalysisContext) -> String {
    let industry = ctx.industry_or("your industry");
    let opening = format!(
        "Teams like {}'s are being asked to deliver more, faster, and with less room for error. \
         The {} role sits right at that pressure point in {}, and it is the kind of work my \
         career has been built around.",
        company, role, industry
    );

    let highlights = strongest_metric_lines(cv, 3);
    let proof = if highlights.is_empty() {
        "My CV sets out the roles and results most relevant to this position, with a consistent \
         focus on delivery and measurable outcomes."
            .to_string()
    } else {
        let bullets: Vec<String> = highlights.iter().map(|h| format!("- {}", h)).collect();
        format!(
            "A few results that speak directly to what you need:\n{}",
            bullets.join("\n")
        )
    };

    let close = match ctx.target_market {
        TargetMarket::SouthAfrica => format!(
            "I would welcome the opportunity to discuss how my experience can support {}'s \
             objectives, including its transformation and growth goals. I am available at your \
             convenience.",
            company
        ),
        _ => format!(
            "I'd like to show you how I can deliver the same results at {}. I'm available to talk \
             whenever suits you.",
            company
        ),
    };

    format!(
        "Dear Hiring Manager,\n\n{}\n\n{}\n\n{}\n\nKind regards,\n{}",
        opening,
        proof,
        close,
        candidate_name(cv)
    )
}

/// Letter text from a model reply: between the markers, else everything
/// after the start marker, else the head of the reply
fn extract_letter(fields: &ResponseFields<'_>) -> String {
    if let Some(letter) = fields.between(LETTER_START, LETTER_END) {
        return letter;
    }
    let text = fields.text();
    match text.find(LETTER_START) {
        Some(idx) => truncate_chars(text[idx + LETTER_START.len()..].trim(), 2000).to_string(),
        None => truncate_chars(text, 1500).to_string(),
    }
}

pub struct CoverLetterComposer {
    runtime: AgentRuntime,
}

impl CoverLetterComposer {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for CoverLetterComposer {
    fn kind(&self) -> AgentKind {
        AgentKind::CoverLetter
    }

    async fn analyze(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
        let started = Instant::now();
        let company = detect_company(jd);
        let role = detect_role(jd);

        let prompt = format!(
            "CV (extract the 3 strongest achievements with metrics):\n{}\n\nJD:\n{}\n\nContext:\n\
             - Market: {}\n- Level: {}\n- Industry: {}\n- Company: {}\n- Role: {}\n\n\
             Write a compelling, personalized cover letter that earns an interview. \
             Never start with \"I am writing to apply\". Reference specific JD elements.",
            truncate_chars(cv, 3500),
            truncate_chars(jd, JD_EXCERPT_CHARS),
            ctx.target_market,
            ctx.experience_level,
            ctx.industry_or("N/A"),
            company,
            role,
        );

        let reply = self
            .runtime
            .ask(self.kind().display_name(), SYSTEM_PROMPT, &prompt)
            .await;
        let fields = ResponseFields::new(&reply.text);

        let letter = if reply.ai_powered {
            extract_letter(&fields)
        } else {
            template_letter(cv, &company, &role, ctx)
        };
        let score = fields.int_or("QUALITY_SCORE", 70);

        let findings = vec![
            format!("Cover Letter Quality: {}/100", score.clamp(0, 100)),
            format!("Word Count: {} words", word_count(&letter)),
            format!(
                "Personalization: {}",
                fields.line("PERSONALIZATION", 60, "N/A")
            ),
            format!("Hook Type: {}", fields.line("HOOK_TYPE", 60, "N/A")),
            format!("Company Detected: {}", company),
            format!("Role Detected: {}", role),
        ];
        let tips = fields
            .bullets("TIPS", None, 3)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TIPS.iter().map(|s| s.to_string()).collect());

        Ok(AgentOutput::new(self.kind(), score)
            .with_findings(findings)
            .with_recommendations(tips)
            .with_content(letter)
            .with_reply(reply.text.clone(), reply.ai_powered)
            .timed(started))
    }
}

//! Tolerant parser for `KEY: value` model replies.
//!
//! Agents prompt the model for a fixed line-oriented layout. Replies drift, so
//! every accessor has an explicit default and never fails.

use regex::Regex;
use tracing::debug;

use crate::types::truncate_chars;

/// View over one model reply (or the rule-based banner)
#[derive(Debug, Clone, Copy)]
pub struct ResponseFields<'a> {
    text: &'a str,
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!("Skipping unparsable field pattern {}: {}", pattern, e);
            None
        }
    }
}

impl<'a> ResponseFields<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    fn capture(&self, pattern: &str) -> Option<&'a str> {
        compile(pattern)?
            .captures(self.text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// `KEY: 123` as an integer
    pub fn int(&self, key: &str) -> Option<i64> {
        self.capture(&format!(r"{}:\s*(\d+)", regex::escape(key)))
            .and_then(|digits| digits.parse().ok())
    }

    /// `KEY: 123`, else `default`
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.int(key).unwrap_or(default)
    }

    /// Rest of the `KEY:` line, trimmed and cut to `max_chars`
    pub fn line(&self, key: &str, max_chars: usize, default: &str) -> String {
        self.capture(&format!(r"{}:\s*(.+?)(?:\n|$)", regex::escape(key)))
            .map(|v| truncate_chars(v.trim(), max_chars).to_string())
            .unwrap_or_else(|| default.to_string())
    }

    /// Everything after `KEY:` up to the next `UPPER_KEY:` line, trimmed
    pub fn section(&self, key: &str) -> String {
        self.section_opt(key).unwrap_or_default()
    }

    fn section_opt(&self, key: &str) -> Option<String> {
        self.capture(&format!(r"(?s){}:\s*(.+?)(?:\n[A-Z_]+:|$)", regex::escape(key)))
            .map(|v| v.trim().to_string())
    }

    /// Like [`section`](Self::section) but cut to `max_chars`, with a default
    pub fn section_or(&self, key: &str, max_chars: usize, default: &str) -> String {
        self.section_opt(key)
            .map(|v| truncate_chars(&v, max_chars).to_string())
            .unwrap_or_else(|| default.to_string())
    }

    /// Dash bullets after `HEADER:` up to `stop:` (or end of text).
    ///
    /// `None` when the header is absent, so callers can tell "no list" from
    /// "empty list".
    pub fn bullets(&self, header: &str, stop: Option<&str>, limit: usize) -> Option<Vec<String>> {
        let stop = stop
            .map(|s| format!("{}:|", regex::escape(s)))
            .unwrap_or_default();
        let body = self.capture(&format!(
            r"(?s){}:(.*?)(?:{}$)",
            regex::escape(header),
            stop
        ))?;
        Some(
            body.trim()
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && *l != "-")
                .map(|l| l.trim_start_matches(['-', ' ']).to_string())
                .take(limit)
                .collect(),
        )
    }

    /// `FIXES:` bullets up to `stop:`
    pub fn fixes(&self, stop: &str, limit: usize) -> Option<Vec<String>> {
        self.bullets("FIXES", Some(stop), limit)
    }

    /// Text between a `START` marker line and an `END` marker line
    pub fn between(&self, start: &str, end: &str) -> Option<String> {
        self.capture(&format!(
            r"(?s){}\s*\n(.*?)\n{}",
            regex::escape(start),
            regex::escape(end)
        ))
        .map(|v| v.trim().to_string())
    }
}

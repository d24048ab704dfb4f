//! Shared utility functions for string handling.
//!
//! All truncation is character-based so multi-byte text (names with accents,
//! currency symbols, emoji bullets) never splits inside a code point.

/// Truncate to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Character count, as opposed to byte length.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Render an integer with `,` thousands separators (`1234567` -> `1,234,567`).
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Join items with `, `, or return `empty` when there are none.
pub fn join_or<S: AsRef<str>>(items: &[S], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Remove duplicates keeping first-occurrence order.
pub fn dedup_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("Zoë Müller", 3), "Zoë");
        assert_eq!(truncate_chars("short", 80), "short");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(350000), "350,000");
        assert_eq!(format_thousands(1_500_000), "1,500,000");
        assert_eq!(format_thousands(-2500), "-2,500");
    }

    #[test]
    fn test_join_or() {
        assert_eq!(join_or(&["a", "b"], "None"), "a, b");
        assert_eq!(join_or::<&str>(&[], "None"), "None");
    }

    #[test]
    fn test_dedup_preserving_order() {
        let items = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_preserving_order(items), vec!["b", "a"]);
    }
}

//! Text heuristics shared by several agents.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static WORD_3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("valid word regex"));
static WORD_4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{4,}\b").expect("valid long word regex"));
static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\+?\s*years?").expect("valid years regex"));

/// Words ignored when harvesting job-description keywords
pub const KEYWORD_STOP_WORDS: &[&str] = &[
    "and", "the", "for", "with", "that", "are", "will", "you", "have", "this", "from", "they",
    "been", "has", "was", "our", "your", "their", "but", "not", "all", "can", "its", "who", "may",
    "also", "any", "use", "one", "two", "new",
];

/// Smaller stop list for the interview gap scan
const GAP_STOP_WORDS: &[&str] = &[
    "and", "the", "for", "with", "you", "are", "this", "that", "have", "will",
];

/// English stop words for the cosine estimate
const COSINE_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "in",
    "is", "it", "its", "of", "on", "or", "our", "that", "the", "their", "this", "to", "was",
    "we", "were", "will", "with", "you", "your", "they", "who", "can", "also", "all", "any",
    "been", "not", "may", "us",
];

/// Whitespace-separated token count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Unique lower-cased JD words (3+ ASCII letters, minus stop words), in
/// first-occurrence order
pub fn jd_keywords(jd: &str) -> Vec<String> {
    unique_words(&WORD_3_RE, jd, KEYWORD_STOP_WORDS)
}

/// JD words (4+ letters) absent from the CV, in first-occurrence order
pub fn gap_terms(cv: &str, jd: &str) -> Vec<String> {
    let cv_lower = cv.to_lowercase();
    unique_words(&WORD_4_RE, jd, GAP_STOP_WORDS)
        .into_iter()
        .filter(|w| !cv_lower.contains(w.as_str()))
        .collect()
}

fn unique_words(re: &Regex, text: &str, stop: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    re.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !stop.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Needles that occur in the (already lower-cased) haystack, in needle order
pub fn present<'a>(haystack_lower: &str, needles: &[&'a str]) -> Vec<&'a str> {
    needles
        .iter()
        .copied()
        .filter(|n| haystack_lower.contains(n))
        .collect()
}

/// Number of needles present in the (already lower-cased) haystack
pub fn count_present(haystack_lower: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|n| haystack_lower.contains(*n)).count()
}

/// First "N years" / "N+ years" claim in the CV
pub fn years_claimed(cv: &str) -> Option<u32> {
    YEARS_RE
        .captures(cv)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Term-frequency cosine similarity over stop-word-filtered tokens, in [0, 1]
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let va = term_frequencies(a);
    let vb = term_frequencies(b);
    if va.is_empty() || vb.is_empty() {
        return 0.0;
    }

    let dot: f64 = va
        .iter()
        .filter_map(|(term, x)| vb.get(term).map(|y| x * y))
        .sum();
    let norm = |v: &std::collections::HashMap<String, f64>| v.values().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm(&va) * norm(&vb);
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

fn term_frequencies(text: &str) -> std::collections::HashMap<String, f64> {
    let mut tf = std::collections::HashMap::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 2)
        .map(str::to_lowercase)
        .filter(|w| !COSINE_STOP_WORDS.contains(&w.as_str()))
    {
        *tf.entry(word).or_insert(0.0) += 1.0;
    }
    tf
}

/// Rough Flesch reading ease (sentence and syllable counts are estimates)
pub fn reading_ease(text: &str) -> Option<f64> {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .collect();
    if words.is_empty() {
        return None;
    }

    let sentences = text
        .split(['.', '!', '?', '\n'])
        .filter(|s| s.chars().any(char::is_alphabetic))
        .count()
        .max(1);
    let syllables: usize = words.iter().map(|w| syllable_estimate(w)).sum();

    let wps = words.len() as f64 / sentences as f64;
    let spw = syllables as f64 / words.len() as f64;
    Some(206.835 - 1.015 * wps - 84.6 * spw)
}

fn syllable_estimate(word: &str) -> usize {
    let lower: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups: usize = 0;
    let mut prev_vowel = false;
    for &c in &lower {
        let v = is_vowel(c);
        if v && !prev_vowel {
            groups += 1;
        }
        prev_vowel = v;
    }
    if lower.len() > 2 && lower.ends_with(&['e']) && !lower.ends_with(&['l', 'e']) {
        groups = groups.saturating_sub(1);
    }
    groups.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jd_keywords_unique_in_order() {
        let kws = jd_keywords("Kafka and Terraform; kafka with AWS. The go team");
        assert_eq!(kws, vec!["kafka", "terraform", "aws", "team"]);
    }

    #[test]
    fn test_gap_terms_excludes_cv_substrings() {
        let gaps = gap_terms("Built Kubernetes operators", "kubernetes operator helm charts");
        assert_eq!(gaps, vec!["helm", "charts"]);
    }

    #[test]
    fn test_present_and_count() {
        let hay = "led a team and launched a product";
        assert_eq!(present(hay, &["led", "scaled", "launched"]), vec!["led", "launched"]);
        assert_eq!(count_present(hay, &["led", "scaled", "launched"]), 2);
    }

    #[test]
    fn test_years_claimed() {
        assert_eq!(years_claimed("Engineer with 12+ years in fintech"), Some(12));
        assert_eq!(years_claimed("no numbers"), None);
    }

    #[test]
    fn test_cosine_bounds() {
        assert_eq!(cosine_similarity("", "python rust"), 0.0);
        let same = cosine_similarity("python rust kafka", "python rust kafka");
        assert!((same - 1.0).abs() < 1e-9);
        let partial = cosine_similarity("python django", "python kafka");
        assert!(partial > 0.0 && partial < 1.0);
    }

    #[test]
    fn test_reading_ease_estimates() {
        assert!(reading_ease("").is_none());
        let simple = reading_ease("I led a team. We shipped it. It was fast.").unwrap();
        let dense = reading_ease(
            "Orchestrated organizational transformation initiatives encompassing \
             multidimensional infrastructure modernization.",
        )
        .unwrap();
        assert!(simple > dense);
    }

    #[test]
    fn test_syllable_estimate() {
        assert_eq!(syllable_estimate("team"), 1);
        assert_eq!(syllable_estimate("make"), 1);
        assert_eq!(syllable_estimate("table"), 2);
        assert_eq!(syllable_estimate("organization"), 5);
        assert_eq!(syllable_estimate("the"), 1);
        assert_eq!(syllable_estimate(""), 1);
        assert_eq!(syllable_estimate("42"), 1);
    }
}

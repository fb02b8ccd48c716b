//! Text Analyzer — deterministic, case-insensitive, whole-word matching over plain text.
//!
//! Tokens are `\w+` runs of the lowercased text. No stemming, no stop-word filtering.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// An ASCII integer followed, optionally after one whitespace char, by a year unit.
static EXPERIENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s?(?:year|yr|yrs)").expect("valid experience regex"));

const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "c++",
    "html",
    "css",
    "sql",
    "machine learning",
    "deep learning",
    "data analysis",
    "communication",
    "teamwork",
];

// ────────────────────────────────────────────────────────────────────────────
// Skill vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Ordered, lowercase, de-duplicated set of recognised skills.
/// Built once per process and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    skills: Vec<String>,
}

impl SkillVocabulary {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let skills = skills
            .into_iter()
            .map(|s| normalize_entry(s.as_ref()))
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { skills }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS)
    }
}

fn normalize_entry(entry: &str) -> String {
    entry
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ────────────────────────────────────────────────────────────────────────────
// Skill counts
// ────────────────────────────────────────────────────────────────────────────

/// Occurrence count per vocabulary entry, in vocabulary order, zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCount {
    counts: Vec<(String, usize)>,
}

impl SkillCount {
    /// Count for `skill`, or `None` if it is not a vocabulary entry.
    pub fn get(&self, skill: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(s, _)| s == skill)
            .map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(s, c)| (s.as_str(), *c))
    }

    /// Skills with a non-zero count, in vocabulary order.
    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, c)| *c > 0).map(|(s, _)| s)
    }
}

impl Serialize for SkillCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Lowercases `text` and returns its `\w+` tokens in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Counts every vocabulary entry in `text`.
///
/// Single-word entries are counted as whole tokens. Entries of several words are
/// counted as contiguous token windows, so "machine learning" matches
/// "Machine-Learning" and "machine\nlearning". Entries with symbols that are not
/// word characters (`c++`, `c#`) are counted as literal occurrences that are not
/// part of a longer word.
pub fn extract_skills(text: &str, vocabulary: &SkillVocabulary) -> SkillCount {
    let tokens = tokenize(text);
    let lower = text.to_lowercase();

    let counts = vocabulary
        .skills()
        .iter()
        .map(|skill| {
            let count = match phrase_tokens(skill) {
                Some(words) => count_token_windows(&tokens, &words),
                None => count_literal(&lower, skill),
            };
            (skill.clone(), count)
        })
        .collect();

    SkillCount { counts }
}

/// The entry's words, if every word is a single `\w+` token.
fn phrase_tokens(skill: &str) -> Option<Vec<&str>> {
    let words: Vec<&str> = skill.split(' ').collect();
    let all_word_tokens = words
        .iter()
        .all(|w| WORD_RE.find(w).is_some_and(|m| m.start() == 0 && m.end() == w.len()));
    all_word_tokens.then_some(words)
}

fn count_token_windows(tokens: &[String], words: &[&str]) -> usize {
    if words.is_empty() || tokens.len() < words.len() {
        return 0;
    }
    tokens
        .windows(words.len())
        .filter(|window| window.iter().zip(words).all(|(t, w)| t == w))
        .count()
}

fn count_literal(haystack: &str, needle: &str) -> usize {
    haystack
        .match_indices(needle)
        .filter(|(start, matched)| {
            let before = haystack[..*start].chars().next_back();
            let after = haystack[start + matched.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .count()
}

/// Same character class as the `\w` used for tokens.
fn is_word_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    WORD_RE.is_match(c.encode_utf8(&mut buf))
}

// ────────────────────────────────────────────────────────────────────────────
// Experience and keywords
// ────────────────────────────────────────────────────────────────────────────

/// Sums every "N year(s)/yr/yrs" mention. Mentions are not de-duplicated.
pub fn extract_experience_years(text: &str) -> u32 {
    EXPERIENCE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
        .fold(0u32, |acc, years| acc.saturating_add(years))
}

/// Shared word tokens between the two texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    pub count: usize,
    pub keywords: BTreeSet<String>,
}

/// Intersects the token sets of both texts. Symmetric in its arguments.
pub fn compare_keywords(job_text: &str, resume_text: &str) -> KeywordMatch {
    let job: BTreeSet<String> = tokenize(job_text).into_iter().collect();
    let resume: BTreeSet<String> = tokenize(resume_text).into_iter().collect();
    let keywords: BTreeSet<String> = job.intersection(&resume).cloned().collect();

    KeywordMatch {
        count: keywords.len(),
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(skills: &[&str]) -> SkillVocabulary {
        SkillVocabulary::new(skills)
    }

    #[test]
    fn test_extract_skills_counts_and_zero_fills() {
        let counts = extract_skills("I know Python and SQL", &vocab(&["python", "sql", "java"]));
        assert_eq!(counts.get("python"), Some(1));
        assert_eq!(counts.get("sql"), Some(1));
        assert_eq!(counts.get("java"), Some(0));
        assert_eq!(counts.get("rust"), None);
    }

    #[test]
    fn test_extract_skills_is_whole_word() {
        let counts = extract_skills("JavaScript, java, JAVA", &vocab(&["java", "javascript"]));
        assert_eq!(counts.get("java"), Some(2));
        assert_eq!(counts.get("javascript"), Some(1));
    }

    #[test]
    fn test_extract_skills_is_repeatable() {
        let vocabulary = SkillVocabulary::default();
        let text = "Python, SQL and machine learning; python again.";
        assert_eq!(
            extract_skills(text, &vocabulary),
            extract_skills(text, &vocabulary)
        );
    }

    #[test]
    fn test_phrase_entries_match_adjacent_tokens() {
        let counts = extract_skills(
            "Machine learning and deep-learning. Learning machine.",
            &vocab(&["machine learning", "deep learning"]),
        );
        assert_eq!(counts.get("machine learning"), Some(1));
        assert_eq!(counts.get("deep learning"), Some(1));
    }

    #[test]
    fn test_symbol_entries_match_literally() {
        let counts = extract_skills("C++ and c++17, not abc++", &vocab(&["c++"]));
        assert_eq!(counts.get("c++"), Some(1));
    }

    #[test]
    fn test_skill_count_preserves_vocabulary_order() {
        let counts = extract_skills("sql python", &vocab(&["python", "java", "sql"]));
        let order: Vec<&str> = counts.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec!["python", "java", "sql"]);
        assert_eq!(counts.present().collect::<Vec<_>>(), vec!["python", "sql"]);
    }

    #[test]
    fn test_vocabulary_normalizes_and_dedups() {
        let vocabulary = vocab(&["Python", " python ", "Machine   Learning", ""]);
        assert_eq!(vocabulary.skills(), &["python", "machine learning"]);
        assert_eq!(vocabulary.len(), 2);
    }

    #[test]
    fn test_experience_years_sums_all_mentions() {
        assert_eq!(
            extract_experience_years("5 years of experience, plus 3 yrs freelance"),
            8
        );
    }

    #[test]
    fn test_experience_years_units_and_spacing() {
        assert_eq!(extract_experience_years("2yr contract, 4 YEARS total"), 6);
        assert_eq!(extract_experience_years("5+ years"), 0);
        assert_eq!(extract_experience_years("no numbers here"), 0);
    }

    #[test]
    fn test_experience_years_ignores_non_ascii_digits() {
        assert_eq!(extract_experience_years("\u{0665} years, 3 years"), 3);
    }

    #[test]
    fn test_symbol_entries_respect_marks_and_connectors() {
        let vocabulary = vocab(&["c++"]);
        assert_eq!(extract_skills("e\u{0301}c++", &vocabulary).get("c++"), Some(0));
        assert_eq!(extract_skills("x\u{203F}c++", &vocabulary).get("c++"), Some(0));
        assert_eq!(extract_skills("(c++)", &vocabulary).get("c++"), Some(1));
    }

    #[test]
    fn test_experience_years_saturates() {
        let text = "4294967295 years and 10 years";
        assert_eq!(extract_experience_years(text), u32::MAX);
    }

    #[test]
    fn test_compare_keywords_is_symmetric() {
        let a = "We need a Python developer with SQL skills";
        let b = "Python developer; strong sql and the cloud";
        let ab = compare_keywords(a, b);
        let ba = compare_keywords(b, a);
        assert_eq!(ab, ba);
        assert_eq!(ab.count, 3);
        assert!(ab.keywords.contains("python"));
        assert!(ab.keywords.contains("developer"));
        assert!(ab.keywords.contains("sql"));
    }

    #[test]
    fn test_compare_keywords_keeps_stop_words() {
        let result = compare_keywords("the role and the team", "the candidate and more");
        assert_eq!(
            result.keywords.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["and", "the"]
        );
    }

    #[test]
    fn test_compare_keywords_empty_text() {
        let result = compare_keywords("", "python");
        assert_eq!(result.count, 0);
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_skill_count_serializes_as_map() {
        let counts = extract_skills("python", &vocab(&["python", "java"]));
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json, serde_json::json!({"python": 1, "java": 0}));
    }
}

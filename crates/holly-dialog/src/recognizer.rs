//! Intent recognition.
//!
//! A [`Recognizer`] turns an utterance into ranked [`IntentResult`]s. The
//! built-in [`PatternRecognizer`] classifies with regexes and matches
//! holiday names against the catalog, so the bot runs without an external
//! language-understanding service. [`RecognizerSet`] ranks the results of
//! several recognizers together.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use holly_core::HolidayCatalog;

use crate::types::{Intent, IntentResult, ENTITY_COUNT, ENTITY_HOLIDAY, ENTITY_REMAIN, ENTITY_WHEN};

/// Classifies utterances.
pub trait Recognizer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Candidate classifications, highest score first. Empty when nothing
    /// matched.
    fn recognize(&self, text: &str) -> Vec<IntentResult>;
}

/// The best classification of `text`, or the `None` intent when the
/// recognizer returned nothing.
pub fn top_result(recognizer: &dyn Recognizer, text: &str) -> IntentResult {
    recognizer
        .recognize(text)
        .into_iter()
        .next()
        .unwrap_or_else(|| IntentResult::none(text))
}

fn by_score_desc(a: &IntentResult, b: &IntentResult) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

// =============================================================================
// RecognizerSet
// =============================================================================

/// Runs several recognizers and ranks all of their results by score.
///
/// Ties keep the order the recognizers were added in.
#[derive(Default)]
pub struct RecognizerSet {
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl RecognizerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, recognizer: Box<dyn Recognizer>) -> Self {
        self.recognizers.push(recognizer);
        self
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }
}

impl Recognizer for RecognizerSet {
    fn name(&self) -> &str {
        "set"
    }

    fn recognize(&self, text: &str) -> Vec<IntentResult> {
        let mut results: Vec<IntentResult> = self
            .recognizers
            .iter()
            .flat_map(|r| {
                let found = r.recognize(text);
                debug!(recognizer = r.name(), results = found.len(), "Recognizer ran");
                found
            })
            .collect();
        results.sort_by(by_score_desc);
        results
    }
}

// =============================================================================
// PatternRecognizer
// =============================================================================

struct IntentPatterns {
    rules: Vec<(Regex, Intent, f32)>,
    when_word: Regex,
    remain_word: Regex,
    count_phrase: Regex,
}

static PATTERNS: LazyLock<IntentPatterns> = LazyLock::new(|| {
    let rules: Vec<(&str, Intent, f32)> = vec![
        (r"(?i)\bgoodbye\b", Intent::Goodbye, 0.99),
        (r"(?i)\bbye\b", Intent::Goodbye, 0.99),
        (r"(?i)^\s*holly\b", Intent::Wake, 0.99),
        (r"(?i)\bnext\s+holidays?\b", Intent::NextHoliday, 0.95),
        (r"(?i)\bupcoming\s+holidays?\b", Intent::NextHoliday, 0.90),
        (r"(?i)\bremain(?:ing|s)?\b", Intent::RemainingHolidays, 0.93),
        (r"(?i)\bholidays?\s+(?:are\s+)?left\b", Intent::RemainingHolidays, 0.92),
        (r"(?i)\bhow\s+many\b.*\bholidays?\b", Intent::RemainingHolidays, 0.88),
        (r"(?i)\b(?:list|all)\b.*\bholidays\b", Intent::AllHolidays, 0.90),
        (r"(?i)\bwhen\s+is\b", Intent::WhenHoliday, 0.90),
        (r"(?i)\bwhat\s+(?:date|day|month)\s+is\b", Intent::WhenHoliday, 0.90),
        (r"(?i)\bwhen\s+does\b", Intent::WhenHoliday, 0.85),
    ];

    IntentPatterns {
        rules: rules
            .into_iter()
            .map(|(p, intent, conf)| (Regex::new(p).expect("Invalid intent regex"), intent, conf))
            .collect(),
        when_word: Regex::new(r"\b(when|date|month|day)\b").expect("Invalid when regex"),
        remain_word: Regex::new(r"\b(remain|remains|remaining|left|rest)\b")
            .expect("Invalid remain regex"),
        count_phrase: Regex::new(r"\b(how many|number of|count)\b").expect("Invalid count regex"),
    }
});

/// Regex and catalog based recognizer.
pub struct PatternRecognizer {
    /// (normalized alias, canonical name), longest alias first.
    aliases: Vec<(String, String)>,
}

impl PatternRecognizer {
    /// Build a recognizer that knows the holidays in `catalog`.
    ///
    /// Each holiday is matched by its full name and, for names ending in
    /// "Day", by the name without it ("Labor Day" also matches "labor").
    pub fn new(catalog: &HolidayCatalog) -> Self {
        let mut aliases = Vec::new();
        for record in catalog.all_holidays() {
            let full = normalize(&record.name);
            if let Some(short) = full.strip_suffix(" day") {
                if !short.is_empty() {
                    aliases.push((short.to_string(), record.name.clone()));
                }
            }
            aliases.push((full, record.name.clone()));
        }
        aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { aliases }
    }

    /// Canonical holiday named in `normalized`, and the text with that name
    /// removed.
    fn find_holiday(&self, normalized: &str) -> Option<(String, String)> {
        let padded = format!(" {} ", normalized);
        self.aliases.iter().find_map(|(alias, name)| {
            let needle = format!(" {} ", alias);
            padded
                .find(&needle)
                .map(|at| {
                    let rest = format!("{} {}", &padded[..at], &padded[at + needle.len()..]);
                    (name.clone(), rest)
                })
        })
    }

    fn entities(&self, text: &str) -> Vec<(&'static str, String)> {
        let normalized = normalize(text);
        let mut found = Vec::new();

        let without_holiday = match self.find_holiday(&normalized) {
            Some((name, rest)) => {
                found.push((ENTITY_HOLIDAY, name));
                rest
            }
            None => normalized.clone(),
        };
        if let Some(m) = PATTERNS.when_word.find(&without_holiday) {
            found.push((ENTITY_WHEN, m.as_str().to_string()));
        }
        if let Some(m) = PATTERNS.remain_word.find(&normalized) {
            found.push((ENTITY_REMAIN, m.as_str().to_string()));
        }
        if let Some(m) = PATTERNS.count_phrase.find(&normalized) {
            found.push((ENTITY_COUNT, m.as_str().to_string()));
        }
        found
    }
}

impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        "pattern"
    }

    fn recognize(&self, text: &str) -> Vec<IntentResult> {
        // Best score per intent.
        let mut best: Vec<(Intent, f32)> = Vec::new();
        for (regex, intent, conf) in &PATTERNS.rules {
            if !regex.is_match(text) {
                continue;
            }
            match best.iter_mut().find(|(i, _)| i == intent) {
                Some(entry) if entry.1 < *conf => entry.1 = *conf,
                Some(_) => {}
                None => best.push((*intent, *conf)),
            }
        }
        if best.is_empty() {
            debug!(text, "No intent pattern matched");
            return Vec::new();
        }

        let entities = self.entities(text);
        let mut results: Vec<IntentResult> = best
            .into_iter()
            .map(|(intent, score)| {
                entities.iter().fold(
                    IntentResult::new(text, intent, score),
                    |result, (kind, value)| result.with_entity(kind, value),
                )
            })
            .collect();
        results.sort_by(by_score_desc);
        results
    }
}

/// Lowercase, drop apostrophes, turn other punctuation into spaces, and
/// collapse whitespace.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

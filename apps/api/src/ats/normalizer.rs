//! Skill normalization and vocabulary-driven skill detection.

use std::collections::HashMap;

use indexmap::IndexSet;
use regex::Regex;

use crate::ats::vocabulary::Vocabulary;

/// A vocabulary term and its compiled whole-word matcher.
///
/// Word boundaries are "start/end of text or a non-word character" on both
/// sides, so terms ending in symbols (`c++`, `c#`) still match, and
/// `node` matches inside `node.js`.
#[derive(Debug, Clone)]
pub struct SkillPattern {
    term: String,
    regex: Regex,
}

impl SkillPattern {
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        let term = term.trim().to_lowercase();
        let regex = Regex::new(&format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(&term)))?;
        Ok(Self { term, regex })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Canonical form of `raw` under the built-in synonym table.
pub fn normalize(raw: &str) -> String {
    Vocabulary::builtin().normalize(raw)
}

/// Trims and lower-cases `raw`, then maps it through `synonyms`.
/// Tokens without an entry pass through lower-cased.
pub fn normalize_with(synonyms: &HashMap<String, String>, raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match synonyms.get(&lowered) {
        Some(canonical) => canonical.clone(),
        None => lowered,
    }
}

/// Every vocabulary skill present in `text`, normalized, in vocabulary order.
pub fn detect_skills(text: &str, vocabulary: &Vocabulary) -> IndexSet<String> {
    vocabulary
        .skill_patterns()
        .iter()
        .filter(|pattern| pattern.is_match(text))
        .map(|pattern| vocabulary.normalize(pattern.term()))
        .collect()
}

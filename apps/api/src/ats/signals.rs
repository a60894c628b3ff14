//! Requirement signals shared by the JD and resume parsers: education level,
//! stated experience, and fixed-vocabulary term scans.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Degree level, ordered by seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    Bachelors,
    Masters,
    Phd,
}

impl EducationLevel {
    /// Ordinal used for requirement comparison: bachelors=1, masters=2, phd=3.
    pub fn rank(self) -> u8 {
        match self {
            EducationLevel::Bachelors => 1,
            EducationLevel::Masters => 2,
            EducationLevel::Phd => 3,
        }
    }
}

/// Which document an education scan runs over. Resumes also recognise
/// `mba` and `b.tech`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationSource {
    JobDescription,
    Resume,
}

const PHD_TERMS: &[&str] = &["phd", "ph.d", "doctorate"];
const MASTERS_TERMS: &[&str] = &["master", "ms", "msc", "m.s."];
const BACHELORS_TERMS: &[&str] = &["bachelor", "bs", "bsc", "btech", "b.s."];
const RESUME_MASTERS_TERMS: &[&str] = &["mba"];
const RESUME_BACHELORS_TERMS: &[&str] = &["b.tech"];

static EXPERIENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\+?\s*(?:years?|yrs?)\s*(?:of)?\s*(?:total)?\s*experience").unwrap()
});

/// Highest degree level mentioned in `text`, checked phd → masters → bachelors.
pub fn detect_education(text: &str, source: EducationSource) -> Option<EducationLevel> {
    let lower = text.to_lowercase();
    let mentions = |terms: &[&str]| terms.iter().any(|t| contains_term(&lower, t));
    let resume = source == EducationSource::Resume;

    if mentions(PHD_TERMS) {
        Some(EducationLevel::Phd)
    } else if mentions(MASTERS_TERMS) || (resume && mentions(RESUME_MASTERS_TERMS)) {
        Some(EducationLevel::Masters)
    } else if mentions(BACHELORS_TERMS) || (resume && mentions(RESUME_BACHELORS_TERMS)) {
        Some(EducationLevel::Bachelors)
    } else {
        None
    }
}

/// Years from the first "N+ years (of) experience" phrase, if any.
pub fn stated_experience_years(text: &str) -> Option<u32> {
    EXPERIENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Substring containment, except that terms of three characters or fewer must
/// appear as whole words (`ai` must not fire on "email").
/// Both arguments are expected lower-cased.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    if term.chars().count() > 3 {
        haystack.contains(term)
    } else {
        contains_word(haystack, term)
    }
}

/// True if `word` occurs in `haystack` with no word character on either side.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    haystack.match_indices(word).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Every term (in table order) found in `text_lower`, with aliases folded into
/// their canonical tag.
pub fn scan_terms(
    text_lower: &str,
    terms: &[String],
    aliases: &[(String, String)],
) -> IndexSet<String> {
    let mut found: IndexSet<String> = terms
        .iter()
        .filter(|term| contains_term(text_lower, term))
        .cloned()
        .collect();

    for (alias, canonical) in aliases {
        if contains_term(text_lower, alias) {
            found.insert(canonical.clone());
        }
    }

    found
}

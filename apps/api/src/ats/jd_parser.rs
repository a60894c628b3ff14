//! JD Parser: extracts prioritized skill buckets and requirement signals from a raw job description.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ats::normalizer::detect_skills;
use crate::ats::signals::{
    detect_education, scan_terms, stated_experience_years, EducationLevel, EducationSource,
};
use crate::ats::vocabulary::Vocabulary;

const MANDATORY_MARKERS: &[&str] = &["must", "required", "mandatory", "essential", "need", "needs"];
const PREFERRED_MARKERS: &[&str] = &["should", "preferred", "desirable", "ideal", "plus"];
const OPTIONAL_MARKERS: &[&str] = &["nice to have", "bonus", "optional", "advantage"];

/// Priority tier of a JD requirement, inferred from language markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementPriority {
    Mandatory,
    Preferred,
    Optional,
}

impl RequirementPriority {
    /// Classifies a lower-cased segment. Mandatory markers win over preferred,
    /// preferred over optional. `None` when no marker is present.
    pub fn classify(segment_lower: &str) -> Option<Self> {
        let has_any = |markers: &[&str]| markers.iter().any(|m| segment_lower.contains(m));

        if has_any(MANDATORY_MARKERS) {
            Some(RequirementPriority::Mandatory)
        } else if has_any(PREFERRED_MARKERS) {
            Some(RequirementPriority::Preferred)
        } else if has_any(OPTIONAL_MARKERS) {
            Some(RequirementPriority::Optional)
        } else {
            None
        }
    }
}

/// Full structured output of JD parsing.
///
/// Buckets are deduplicated within themselves only: a skill named in both a
/// "must" and a "preferred" sentence appears in both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequirements {
    pub mandatory_skills: IndexSet<String>,
    pub preferred_skills: IndexSet<String>,
    pub optional_skills: IndexSet<String>,
    pub certifications: IndexSet<String>,
    pub domain_keywords: IndexSet<String>,
    pub role_keywords: IndexSet<String>,
    pub experience_required: Option<u32>,
    pub education_required: Option<EducationLevel>,
}

impl JobRequirements {
    /// Union of all three skill buckets, mandatory first.
    pub fn tech_stack(&self) -> IndexSet<String> {
        self.mandatory_skills
            .iter()
            .chain(&self.preferred_skills)
            .chain(&self.optional_skills)
            .cloned()
            .collect()
    }

    fn bucket_mut(&mut self, priority: RequirementPriority) -> &mut IndexSet<String> {
        match priority {
            RequirementPriority::Mandatory => &mut self.mandatory_skills,
            RequirementPriority::Preferred => &mut self.preferred_skills,
            RequirementPriority::Optional => &mut self.optional_skills,
        }
    }
}

/// Parses a job description into `JobRequirements`. Never fails; text with no
/// recognisable requirements yields empty buckets.
pub fn parse_job_description(text: &str, vocabulary: &Vocabulary) -> JobRequirements {
    let mut requirements = JobRequirements::default();

    for segment in requirement_segments(text) {
        let segment_lower = segment.to_lowercase();
        if vocabulary.is_hr_fluff(&segment_lower) {
            continue;
        }

        let skills = detect_skills(segment, vocabulary);
        if skills.is_empty() {
            continue;
        }

        // Unmarked skill mentions default to preferred.
        let priority = RequirementPriority::classify(&segment_lower)
            .unwrap_or(RequirementPriority::Preferred);
        requirements.bucket_mut(priority).extend(skills);
    }

    let text_lower = text.to_lowercase();
    requirements.certifications = scan_terms(&text_lower, vocabulary.jd_certifications(), &[]);
    requirements.experience_required = stated_experience_years(text);
    requirements.education_required = detect_education(text, EducationSource::JobDescription);
    requirements.domain_keywords =
        scan_terms(&text_lower, vocabulary.domains(), vocabulary.domain_aliases());
    requirements.role_keywords = scan_terms(&text_lower, vocabulary.roles(), &[]);

    debug!(
        "Parsed JD: {} mandatory, {} preferred, {} optional skills, {} certifications",
        requirements.mandatory_skills.len(),
        requirements.preferred_skills.len(),
        requirements.optional_skills.len(),
        requirements.certifications.len()
    );

    requirements
}

/// Splits text into non-empty lines, then each line into sentences at `.`, `;`,
/// `!` or `?` followed by whitespace or end of line. A period inside a token
/// (`node.js`) does not split.
fn requirement_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();

    for line in text.lines() {
        let mut start = 0;
        let mut chars = line.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            if !matches!(c, '.' | ';' | '!' | '?') {
                continue;
            }
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = idx + c.len_utf8();
                segments.push(&line[start..end]);
                start = end;
            }
        }
        segments.push(&line[start..]);
    }

    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

//! Improvement Engine: rule-based suggestions derived from match gaps.
//!
//! Impact strings are templated estimates computed from gap counts; they are
//! not produced by re-running the scorer.

use serde::{Deserialize, Serialize};

use crate::ats::matching::{CertificationMatch, KeywordMatch, MatchResults, ProjectMatch, TierMatches};
use crate::ats::scoring::ScoreBreakdown;

const MAX_MANDATORY_NAMED: usize = 5;
const MAX_PREFERRED_NAMED: usize = 3;
const MAX_KEYWORDS_NAMED: usize = 5;
const MAX_SKILL_IMPACT: usize = 25;
const MANDATORY_IMPACT_PER_SKILL: usize = 8;
const PREFERRED_IMPACT_PER_SKILL: usize = 5;
const LOW_RELEVANCE_THRESHOLD: f64 = 50.0;

/// Sorted High → Medium → Low by the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub area: String,
    pub suggestion: String,
    pub priority: Priority,
    pub impact: String,
    pub actionable: String,
}

impl Improvement {
    fn new(
        area: &str,
        suggestion: impl Into<String>,
        priority: Priority,
        impact: impl Into<String>,
        actionable: impl Into<String>,
    ) -> Self {
        Self {
            area: area.to_string(),
            suggestion: suggestion.into(),
            priority,
            impact: impact.into(),
            actionable: actionable.into(),
        }
    }
}

/// Suggestions in category order (skills, keywords, projects, certifications,
/// education), then stably sorted by priority.
pub fn generate_improvements(results: &MatchResults, breakdown: &ScoreBreakdown) -> Vec<Improvement> {
    let mut improvements = Vec::new();
    improvements.extend(skills_improvements(&results.skills));
    improvements.extend(keywords_improvements(&results.keywords));
    improvements.extend(projects_improvements(&results.projects));
    improvements.extend(certifications_improvements(&results.certifications));
    if breakdown.education_score < 100.0 {
        improvements.push(Improvement::new(
            "Education",
            "Education level below job requirement",
            Priority::High,
            "+2-3% ATS score",
            "Highlight relevant coursework, certifications, or equivalent experience",
        ));
    }

    improvements.sort_by_key(|i| i.priority);
    improvements
}

fn skill_impact(missing: usize, per_skill: usize) -> usize {
    (missing * per_skill).min(MAX_SKILL_IMPACT)
}

fn skills_improvements(skills: &TierMatches) -> Vec<Improvement> {
    let mut out = Vec::new();

    if !skills.mandatory.missing.is_empty() {
        let named = first_n(&skills.mandatory.missing, MAX_MANDATORY_NAMED);
        out.push(Improvement::new(
            "Mandatory Skills",
            format!("Add these critical skills: {}", named.join(", ")),
            Priority::High,
            format!(
                "+{}% ATS score",
                skill_impact(named.len(), MANDATORY_IMPACT_PER_SKILL)
            ),
            format!(
                "Include {} in your skills section and demonstrate usage in projects",
                named[0]
            ),
        ));
    }

    if !skills.preferred.missing.is_empty() {
        let named = first_n(&skills.preferred.missing, MAX_PREFERRED_NAMED);
        out.push(Improvement::new(
            "Preferred Skills",
            format!("Add these recommended skills: {}", named.join(", ")),
            Priority::Medium,
            format!(
                "+{}% ATS score",
                skill_impact(named.len(), PREFERRED_IMPACT_PER_SKILL)
            ),
            format!("Learn and add {} to strengthen your profile", named[0]),
        ));
    }

    if !skills.mandatory.partial.is_empty() {
        out.push(Improvement::new(
            "Skill Terminology",
            "Use exact skill names from job description",
            Priority::Medium,
            "+3-5% ATS score",
            "Replace similar skill names with exact JD terminology",
        ));
    }

    out
}

fn keywords_improvements(keywords: &KeywordMatch) -> Option<Improvement> {
    if keywords.missing.is_empty() {
        return None;
    }
    let named = first_n(&keywords.missing, MAX_KEYWORDS_NAMED);
    let total = keywords.matched.len() + keywords.missing.len();
    let impact = (named.len() as f64 / total as f64 * 20.0).round();

    Some(Improvement::new(
        "Keywords",
        format!("Include these keywords: {}", named.join(", ")),
        Priority::Medium,
        format!("+{impact}% ATS score"),
        format!(
            "Naturally incorporate \"{}\" in your experience or summary section",
            named[0]
        ),
    ))
}

fn projects_improvements(projects: &ProjectMatch) -> Vec<Improvement> {
    let mut out = Vec::new();

    if projects.relevant.is_empty() {
        out.push(Improvement::new(
            "Projects",
            "Add projects demonstrating required technologies",
            Priority::High,
            "+15-20% ATS score",
            "Create or highlight a project using the required tech stack",
        ));
    }

    for gap in &projects.gaps {
        out.push(Improvement::new(
            "Project Coverage",
            gap.as_str(),
            Priority::Medium,
            "+8-12% ATS score",
            "Add a project that addresses this gap",
        ));
    }

    if projects
        .relevant
        .iter()
        .any(|p| p.relevance < LOW_RELEVANCE_THRESHOLD)
    {
        out.push(Improvement::new(
            "Project Relevance",
            "Enhance project descriptions to highlight relevant technologies",
            Priority::Low,
            "+3-5% ATS score",
            "Emphasize how projects used required skills and technologies",
        ));
    }

    out
}

fn certifications_improvements(certifications: &CertificationMatch) -> Option<Improvement> {
    if certifications.missing.is_empty() {
        return None;
    }
    let total = certifications.matched.len() + certifications.missing.len();
    let impact = (certifications.missing.len() as f64 / total as f64 * 5.0).round();

    Some(Improvement::new(
        "Certifications",
        format!(
            "Obtain these certifications: {}",
            certifications.missing.join(", ")
        ),
        Priority::Low,
        format!("+{impact}% ATS score"),
        format!("Consider getting {} certification", certifications.missing[0]),
    ))
}

fn first_n(items: &[String], n: usize) -> &[String] {
    &items[..items.len().min(n)]
}

//! Matching Engine: compares a parsed resume against parsed JD requirements.
//!
//! Skill matching tiers, checked in order per JD term:
//! 1. exact      : case-insensitive equality with a resume skill → 1.0
//! 2. normalized : equal after synonym normalization             → 0.9
//! 3. partial    : substring containment either way (≥ 3 chars)  → 0.6
//! 4. missing
//!
//! Partial matching takes the first qualifying resume skill in set order, not
//! the most similar one.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::ats::jd_parser::JobRequirements;
use crate::ats::resume_parser::{Project, ResumeProfile};
use crate::ats::signals::EducationLevel;
use crate::ats::vocabulary::Vocabulary;

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const NORMALIZED_CONFIDENCE: f64 = 0.9;
pub const PARTIAL_CONFIDENCE: f64 = 0.6;
const PARTIAL_MIN_CHARS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Match result models
// ────────────────────────────────────────────────────────────────────────────

/// A JD term paired with the resume skill that satisfied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSkill {
    pub jd: String,
    pub resume: String,
    pub score: f64,
}

/// Per-list skill match. Every JD term lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub exact: Vec<MatchedSkill>,
    pub normalized: Vec<MatchedSkill>,
    pub partial: Vec<MatchedSkill>,
    pub missing: Vec<String>,
}

impl SkillMatch {
    /// Number of JD terms this match covers.
    pub fn total(&self) -> usize {
        self.exact.len() + self.normalized.len() + self.partial.len() + self.missing.len()
    }
}

/// Skill matches split by requirement priority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierMatches {
    pub mandatory: SkillMatch,
    pub preferred: SkillMatch,
    pub optional: SkillMatch,
}

/// Keyword coverage. Partial keyword hits count as neither matched nor missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EducationMatch {
    pub matched: bool,
    pub score: f64,
}

/// A resume project that fired at least one relevance factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRelevance {
    pub name: String,
    /// 0 – 100, whole number
    pub relevance: f64,
    pub reason: String,
    pub tech_overlap: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMatch {
    pub relevant: Vec<ProjectRelevance>,
    pub gaps: Vec<String>,
}

/// Everything the scoring and improvement engines consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResults {
    pub skills: TierMatches,
    pub keywords: KeywordMatch,
    pub projects: ProjectMatch,
    pub certifications: CertificationMatch,
    pub education: EducationMatch,
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher
// ────────────────────────────────────────────────────────────────────────────

/// Skill and project matcher bound to a vocabulary (for normalization).
pub struct Matcher<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> Matcher<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Runs every category match for one resume/JD pair.
    pub fn match_all(&self, resume: &ResumeProfile, requirements: &JobRequirements) -> MatchResults {
        let skills = TierMatches {
            mandatory: self.match_skills(&resume.skills, &requirements.mandatory_skills),
            preferred: self.match_skills(&resume.skills, &requirements.preferred_skills),
            optional: self.match_skills(&resume.skills, &requirements.optional_skills),
        };

        let keyword_terms = requirements
            .mandatory_skills
            .iter()
            .chain(&requirements.preferred_skills)
            .chain(&requirements.domain_keywords)
            .chain(&requirements.role_keywords);

        MatchResults {
            skills,
            keywords: self.match_keywords(&resume.skills, keyword_terms),
            projects: self.match_projects(&resume.projects, requirements),
            certifications: match_certifications(&resume.certifications, &requirements.certifications),
            education: match_education(resume.education, requirements.education_required),
        }
    }

    /// Classifies each JD term (duplicates included) into one tier.
    pub fn match_skills<I, S>(&self, resume_skills: &IndexSet<String>, jd_skills: I) -> SkillMatch
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resume: Vec<ResumeSkill<'_>> = resume_skills
            .iter()
            .map(|original| ResumeSkill {
                original,
                lower: original.to_lowercase(),
                normalized: self.vocabulary.normalize(original),
            })
            .collect();

        let mut result = SkillMatch::default();

        for jd_skill in jd_skills {
            let jd = jd_skill.as_ref();
            let jd_lower = jd.to_lowercase();
            let jd_normalized = self.vocabulary.normalize(jd);

            if let Some(rs) = resume.iter().find(|rs| rs.lower == jd_lower) {
                result.exact.push(rs.paired_with(jd, EXACT_CONFIDENCE));
            } else if let Some(rs) = resume.iter().find(|rs| rs.normalized == jd_normalized) {
                result.normalized.push(rs.paired_with(jd, NORMALIZED_CONFIDENCE));
            } else if let Some(rs) = find_partial_match(&jd_lower, &resume) {
                result.partial.push(rs.paired_with(jd, PARTIAL_CONFIDENCE));
            } else {
                result.missing.push(jd.to_string());
            }
        }

        result
    }

    /// Keyword coverage over an arbitrary term list: exact and normalized hits
    /// count as matched.
    pub fn match_keywords<I, S>(&self, resume_skills: &IndexSet<String>, terms: I) -> KeywordMatch
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let skill_match = self.match_skills(resume_skills, terms);
        KeywordMatch {
            matched: skill_match
                .exact
                .into_iter()
                .chain(skill_match.normalized)
                .map(|m| m.jd)
                .collect(),
            missing: skill_match.missing,
        }
    }

    /// Scores each project on tech overlap, domain match and role match.
    /// Projects firing no factor are left out entirely.
    pub fn match_projects(&self, projects: &[Project], requirements: &JobRequirements) -> ProjectMatch {
        let jd_tech = requirements.tech_stack();
        let jd_lower: IndexSet<String> = jd_tech.iter().map(|s| s.to_lowercase()).collect();
        let jd_normalized: IndexSet<String> =
            jd_tech.iter().map(|s| self.vocabulary.normalize(s)).collect();
        let jd_tech_size = jd_tech.len().max(1) as f64;

        let mut relevant = Vec::new();

        for project in projects {
            let tech_overlap: Vec<String> = project
                .tech_stack
                .iter()
                .filter(|tech| {
                    jd_lower.contains(&tech.to_lowercase())
                        || jd_normalized.contains(&self.vocabulary.normalize(tech))
                })
                .cloned()
                .collect();

            let domain_match = project.domain.as_deref().is_some_and(|domain| {
                let domain = domain.to_lowercase();
                requirements
                    .domain_keywords
                    .iter()
                    .any(|k| domain.contains(&k.to_lowercase()))
            });

            let description = project.description.to_lowercase();
            let role_match = requirements
                .role_keywords
                .iter()
                .any(|r| description.contains(&r.to_lowercase()));

            let mut factor_scores = Vec::with_capacity(3);
            if !tech_overlap.is_empty() {
                factor_scores.push(tech_overlap.len() as f64 / jd_tech_size * 100.0);
            }
            if domain_match {
                factor_scores.push(100.0);
            }
            if role_match {
                factor_scores.push(100.0);
            }

            if factor_scores.is_empty() {
                continue;
            }

            let relevance = factor_scores.iter().sum::<f64>() / factor_scores.len() as f64;
            relevant.push(ProjectRelevance {
                name: project.title.clone(),
                relevance: relevance.round(),
                reason: relevance_reason(&tech_overlap, domain_match, role_match),
                tech_overlap,
            });
        }

        let mut gaps = Vec::new();
        if relevant.is_empty() {
            gaps.push("No projects demonstrate experience with required technologies".to_string());
        }

        let covered: IndexSet<String> = relevant
            .iter()
            .flat_map(|p| p.tech_overlap.iter())
            .map(|t| self.vocabulary.normalize(t))
            .collect();
        let uncovered: Vec<&str> = requirements
            .mandatory_skills
            .iter()
            .filter(|skill| !covered.contains(&self.vocabulary.normalize(skill)))
            .map(String::as_str)
            .collect();
        if !uncovered.is_empty() {
            gaps.push(format!("No projects showcase: {}", uncovered.join(", ")));
        }

        ProjectMatch { relevant, gaps }
    }
}

struct ResumeSkill<'s> {
    original: &'s String,
    lower: String,
    normalized: String,
}

impl ResumeSkill<'_> {
    fn paired_with(&self, jd: &str, score: f64) -> MatchedSkill {
        MatchedSkill {
            jd: jd.to_string(),
            resume: self.original.clone(),
            score,
        }
    }
}

/// First resume skill that contains, or is contained in, the JD term.
/// The contained side must be at least three characters long.
fn find_partial_match<'r, 's>(
    jd_lower: &str,
    resume: &'r [ResumeSkill<'s>],
) -> Option<&'r ResumeSkill<'s>> {
    let jd_long_enough = jd_lower.chars().count() >= PARTIAL_MIN_CHARS;
    resume.iter().find(|rs| {
        let rs_long_enough = rs.lower.chars().count() >= PARTIAL_MIN_CHARS;
        (rs_long_enough && jd_lower.contains(rs.lower.as_str()))
            || (jd_long_enough && rs.lower.contains(jd_lower))
    })
}

fn relevance_reason(tech_overlap: &[String], domain_match: bool, role_match: bool) -> String {
    let mut reasons = Vec::new();
    if !tech_overlap.is_empty() {
        let shown: Vec<&str> = tech_overlap.iter().take(3).map(String::as_str).collect();
        reasons.push(format!(
            "Uses {} required technologies: {}",
            tech_overlap.len(),
            shown.join(", ")
        ));
    }
    if domain_match {
        reasons.push("Matches target domain".to_string());
    }
    if role_match {
        reasons.push("Aligns with role requirements".to_string());
    }
    reasons.join(". ")
}

/// Bidirectional, case-insensitive substring containment. No tiers.
pub fn match_certifications(
    resume_certs: &IndexSet<String>,
    jd_certs: &IndexSet<String>,
) -> CertificationMatch {
    let resume_lower: Vec<String> = resume_certs.iter().map(|c| c.to_lowercase()).collect();
    let (matched, missing) = jd_certs.iter().cloned().partition(|jd_cert| {
        let jd_lower = jd_cert.to_lowercase();
        resume_lower
            .iter()
            .any(|rc| rc.contains(&jd_lower) || jd_lower.contains(rc.as_str()))
    });
    CertificationMatch { matched, missing }
}

/// Ordinal comparison: bachelors < masters < phd.
pub fn match_education(
    resume: Option<EducationLevel>,
    required: Option<EducationLevel>,
) -> EducationMatch {
    match (resume, required) {
        (_, None) => EducationMatch {
            matched: true,
            score: 1.0,
        },
        (None, Some(_)) => EducationMatch {
            matched: false,
            score: 0.0,
        },
        (Some(have), Some(need)) if have.rank() >= need.rank() => EducationMatch {
            matched: true,
            score: 1.0,
        },
        (Some(_), Some(_)) => EducationMatch {
            matched: false,
            score: 0.5,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> IndexSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn matcher() -> Matcher<'static> {
        Matcher::new(Vocabulary::builtin())
    }

    fn project(title: &str, description: &str, tech: &[&str], domain: Option<&str>) -> Project {
        Project {
            title: title.to_string(),
            description: description.to_string(),
            tech_stack: skills(tech),
            domain: domain.map(str::to_string),
        }
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let result = matcher().match_skills(&skills(&["React"]), ["react"]);
        assert_eq!(result.exact.len(), 1);
        assert_eq!(result.exact[0].resume, "React");
        assert_eq!(result.exact[0].score, EXACT_CONFIDENCE);
    }

    #[test]
    fn test_normalized_match() {
        let result = matcher().match_skills(&skills(&["node.js"]), ["NodeJS"]);
        assert!(result.exact.is_empty());
        assert_eq!(result.normalized.len(), 1);
        assert_eq!(result.normalized[0].jd, "NodeJS");
        assert_eq!(result.normalized[0].score, NORMALIZED_CONFIDENCE);
    }

    #[test]
    fn test_partial_match_first_wins() {
        // "spring boot" contains both "spring" and "boot"; set order decides
        let result = matcher().match_skills(&skills(&["spring", "boot"]), ["spring boot"]);
        assert_eq!(result.partial.len(), 1);
        assert_eq!(result.partial[0].resume, "spring");
        assert_eq!(result.partial[0].score, PARTIAL_CONFIDENCE);
    }

    #[test]
    fn test_partial_match_resume_contains_jd() {
        let result = matcher().match_skills(&skills(&["react native"]), ["react"]);
        assert_eq!(result.partial.len(), 1);
        assert_eq!(result.partial[0].resume, "react native");
    }

    #[test]
    fn test_partial_match_requires_three_chars() {
        let result = matcher().match_skills(&skills(&["go"]), ["golang tooling"]);
        assert!(result.partial.is_empty());
        assert_eq!(result.missing, vec!["golang tooling"]);
    }

    #[test]
    fn test_missing_keeps_original_jd_string() {
        let result = matcher().match_skills(&skills(&["python"]), ["Kubernetes"]);
        assert_eq!(result.missing, vec!["Kubernetes"]);
    }

    #[test]
    fn test_bucket_coverage_with_duplicates() {
        let resume = skills(&["react", "node.js", "spring"]);
        let jd = ["react", "React", "nodejs", "spring boot", "docker", "docker"];
        let result = matcher().match_skills(&resume, jd);
        assert_eq!(result.total(), jd.len());
        assert_eq!(result.exact.len(), 2);
        assert_eq!(result.normalized.len(), 1);
        assert_eq!(result.partial.len(), 1);
        assert_eq!(result.missing.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        let result = matcher().match_skills(&skills(&[]), Vec::<String>::new());
        assert_eq!(result, SkillMatch::default());
        let result = matcher().match_skills(&skills(&[]), ["rust"]);
        assert_eq!(result.missing, vec!["rust"]);
    }

    #[test]
    fn test_keywords_ignore_partial_hits() {
        let resume = skills(&["react native", "aws"]);
        let result = matcher().match_keywords(&resume, ["react", "aws", "backend"]);
        assert_eq!(result.matched, vec!["aws"]);
        assert_eq!(result.missing, vec!["backend"]);
    }

    #[test]
    fn test_certifications_bidirectional_containment() {
        let resume = skills(&["aws certified solutions architect", "pmp"]);
        let jd = skills(&["aws certified", "PMP", "cissp"]);
        let result = match_certifications(&resume, &jd);
        assert_eq!(result.matched, vec!["aws certified", "PMP"]);
        assert_eq!(result.missing, vec!["cissp"]);
    }

    #[test]
    fn test_education_ordinal() {
        let m = match_education(Some(EducationLevel::Masters), Some(EducationLevel::Bachelors));
        assert!(m.matched);
        assert_eq!(m.score, 1.0);

        let m = match_education(Some(EducationLevel::Bachelors), Some(EducationLevel::Masters));
        assert!(!m.matched);
        assert_eq!(m.score, 0.5);
    }

    #[test]
    fn test_education_no_requirement_and_no_degree() {
        assert_eq!(
            match_education(None, None),
            EducationMatch { matched: true, score: 1.0 }
        );
        assert_eq!(
            match_education(None, Some(EducationLevel::Phd)),
            EducationMatch { matched: false, score: 0.0 }
        );
    }

    #[test]
    fn test_project_relevance_averages_fired_factors() {
        let requirements = JobRequirements {
            mandatory_skills: skills(&["react", "node.js"]),
            preferred_skills: skills(&["aws", "docker"]),
            domain_keywords: skills(&["fintech"]),
            role_keywords: skills(&["backend"]),
            ..Default::default()
        };
        let projects = vec![project(
            "Payments",
            "fintech dashboard",
            &["react", "aws"],
            Some("fintech"),
        )];

        let result = matcher().match_projects(&projects, &requirements);
        assert_eq!(result.relevant.len(), 1);
        // tech 2/4*100 = 50, domain 100 → (50 + 100) / 2 = 75
        assert_eq!(result.relevant[0].relevance, 75.0);
        assert_eq!(
            result.relevant[0].reason,
            "Uses 2 required technologies: react, aws. Matches target domain"
        );
        assert_eq!(result.gaps, vec!["No projects showcase: node.js"]);
    }

    #[test]
    fn test_projects_without_factors_are_excluded() {
        let requirements = JobRequirements {
            mandatory_skills: skills(&["rust"]),
            ..Default::default()
        };
        let projects = vec![project("Blog", "personal blog", &["php"], None)];

        let result = matcher().match_projects(&projects, &requirements);
        assert!(result.relevant.is_empty());
        assert_eq!(
            result.gaps,
            vec![
                "No projects demonstrate experience with required technologies",
                "No projects showcase: rust",
            ]
        );
    }

    #[test]
    fn test_role_match_alone_makes_project_relevant() {
        let requirements = JobRequirements {
            role_keywords: skills(&["backend"]),
            ..Default::default()
        };
        let projects = vec![project("API", "Backend service for orders", &[], None)];

        let result = matcher().match_projects(&projects, &requirements);
        assert_eq!(result.relevant[0].relevance, 100.0);
        assert!(result.gaps.is_empty());
    }

    #[test]
    fn test_match_all_collects_every_category() {
        let requirements = JobRequirements {
            mandatory_skills: skills(&["react"]),
            certifications: skills(&["pmp"]),
            education_required: Some(EducationLevel::Bachelors),
            ..Default::default()
        };
        let resume = ResumeProfile {
            skills: skills(&["react"]),
            education: Some(EducationLevel::Masters),
            ..Default::default()
        };

        let results = matcher().match_all(&resume, &requirements);
        assert_eq!(results.skills.mandatory.exact.len(), 1);
        assert_eq!(results.keywords.matched, vec!["react"]);
        assert_eq!(results.certifications.missing, vec!["pmp"]);
        assert!(results.education.matched);
    }
}

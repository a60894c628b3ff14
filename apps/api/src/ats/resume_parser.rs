//! Resume Parser: extracts skills, projects, certifications, education and
//! experience from plain resume text.
//!
//! Project extraction is a line heuristic, not a layout parser:
//! - a line mentioning "project" with a colon, or shorter than 50 chars, opens the project section
//! - inside the section, a short line (< 100 chars) without a period starts a new project
//! - any other line is appended to the current project's description
//! - a line mentioning "experience", "education" or "certification" then closes the section;
//!   a bare heading of that kind is neither a title nor description text
//!
//! Resumes with unconventional formatting will be mis-segmented (a description
//! line without a period becomes a title, "improved user experience" ends the
//! section). Callers should treat projects as a best-effort signal.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ats::normalizer::detect_skills;
use crate::ats::signals::{
    detect_education, scan_terms, stated_experience_years, EducationLevel, EducationSource,
};
use crate::ats::vocabulary::Vocabulary;

const SECTION_END_MARKERS: &[&str] = &["experience", "education", "certification"];
const SECTION_HEADER_MAX_CHARS: usize = 50;
const PROJECT_TITLE_MAX_CHARS: usize = 100;
const MAX_INFERRED_EXPERIENCE_YEARS: i32 = 50;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// A project found in the resume's project section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    pub tech_stack: IndexSet<String>,
    pub domain: Option<String>,
}

impl Project {
    fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn append_line(&mut self, line: &str, vocabulary: &Vocabulary) {
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(line);
        self.tech_stack.extend(detect_skills(line, vocabulary));
    }
}

/// Everything the matcher needs to know about a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeProfile {
    pub skills: IndexSet<String>,
    pub projects: Vec<Project>,
    pub certifications: IndexSet<String>,
    pub education: Option<EducationLevel>,
    pub experience_years: Option<u32>,
    pub domains: IndexSet<String>,
}

/// Parses a resume, inferring experience spans against the current calendar year.
pub fn parse_resume(text: &str, vocabulary: &Vocabulary) -> ResumeProfile {
    parse_resume_as_of(text, vocabulary, Utc::now().year())
}

/// Parses a resume with an explicit "current year" for span inference.
pub fn parse_resume_as_of(text: &str, vocabulary: &Vocabulary, current_year: i32) -> ResumeProfile {
    let text_lower = text.to_lowercase();

    let profile = ResumeProfile {
        skills: detect_skills(text, vocabulary),
        projects: extract_projects(text, vocabulary),
        certifications: extract_certifications(text, vocabulary),
        education: detect_education(text, EducationSource::Resume),
        experience_years: infer_experience_years(text, current_year),
        domains: scan_terms(&text_lower, vocabulary.domains(), vocabulary.domain_aliases()),
    };

    debug!(
        "Parsed resume: {} skills, {} projects, {} certifications, experience {:?}",
        profile.skills.len(),
        profile.projects.len(),
        profile.certifications.len(),
        profile.experience_years
    );

    profile
}

fn extract_projects(text: &str, vocabulary: &Vocabulary) -> Vec<Project> {
    let mut projects = Vec::new();
    let mut in_section = false;
    let mut current: Option<Project> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();
        let char_count = line.chars().count();

        if lower.contains("project") && (line.contains(':') || char_count < SECTION_HEADER_MAX_CHARS)
        {
            in_section = true;
            continue;
        }

        let short_line = char_count < PROJECT_TITLE_MAX_CHARS && !line.contains('.');
        let ends_section = SECTION_END_MARKERS.iter().any(|m| lower.contains(m));

        if in_section && short_line && !ends_section {
            projects.extend(current.replace(Project::titled(line)));
            continue;
        }

        if !short_line {
            if let Some(project) = current.as_mut() {
                project.append_line(line, vocabulary);
            }
        }

        if ends_section {
            projects.extend(current.take());
            in_section = false;
        }
    }
    projects.extend(current);

    for project in &mut projects {
        project.domain = infer_project_domain(&project.description, vocabulary);
    }

    projects
}

/// First project domain (in table order) mentioned in the description.
fn infer_project_domain(description: &str, vocabulary: &Vocabulary) -> Option<String> {
    let found = scan_terms(
        &description.to_lowercase(),
        vocabulary.project_domains(),
        vocabulary.domain_aliases(),
    );
    vocabulary
        .project_domains()
        .iter()
        .find(|d| found.contains(*d))
        .cloned()
}

fn extract_certifications(text: &str, vocabulary: &Vocabulary) -> IndexSet<String> {
    vocabulary
        .resume_certification_patterns()
        .iter()
        .filter_map(|pattern| pattern.find(text))
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Stated "N years experience" if present, otherwise the span from the earliest
/// year mentioned to `current_year` (needs two distinct years, capped at 50).
fn infer_experience_years(text: &str, current_year: i32) -> Option<u32> {
    if let Some(years) = stated_experience_years(text) {
        return Some(years);
    }

    let years: BTreeSet<i32> = YEAR_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if years.len() < 2 {
        return None;
    }

    let earliest = *years.first()?;
    Some((current_year - earliest).clamp(0, MAX_INFERRED_EXPERIENCE_YEARS) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
Alex Rivera
Full stack engineer. Python, React, Docker, PostgreSQL.

Projects:
Payments Dashboard
Built a fintech dashboard with React and Node.js.
Deployed on AWS with Docker.
Clinic Scheduler
A healthcare booking tool written in Django and PostgreSQL.

Work Experience
Acme Corp, 2018 - 2023
Senior Engineer building REST services.

Education
MSc Computer Science, 2016

Certifications
AWS Certified Solutions Architect
";

    fn parse(text: &str) -> ResumeProfile {
        parse_resume_as_of(text, Vocabulary::builtin(), 2026)
    }

    #[test]
    fn test_full_resume_skills() {
        let profile = parse(RESUME);
        for skill in ["python", "react", "node.js", "django", "postgres", "docker", "aws", "rest"] {
            assert!(profile.skills.contains(skill), "missing skill {skill}");
        }
    }

    #[test]
    fn test_projects_segmented_by_title_lines() {
        let profile = parse(RESUME);
        assert_eq!(profile.projects.len(), 2);

        let payments = &profile.projects[0];
        assert_eq!(payments.title, "Payments Dashboard");
        assert!(payments.description.starts_with("Built a fintech dashboard"));
        for tech in ["react", "node.js", "aws", "docker"] {
            assert!(payments.tech_stack.contains(tech), "missing tech {tech}");
        }
        assert_eq!(payments.domain.as_deref(), Some("fintech"));

        let clinic = &profile.projects[1];
        assert_eq!(clinic.title, "Clinic Scheduler");
        assert!(clinic.tech_stack.contains("django"));
        assert!(clinic.tech_stack.contains("postgres"));
        assert_eq!(clinic.domain.as_deref(), Some("healthcare"));
    }

    #[test]
    fn test_project_section_closed_by_experience_header() {
        let profile = parse(RESUME);
        assert!(profile
            .projects
            .iter()
            .all(|p| !p.description.contains("REST services")));
    }

    #[test]
    fn test_project_experience_heading_opens_section() {
        let profile = parse("Project Experience\nShop App\nBuilt an ecommerce store with React.\n");
        assert_eq!(profile.projects.len(), 1);
        assert_eq!(profile.projects[0].title, "Shop App");
        assert!(profile.projects[0].tech_stack.contains("react"));

        let profile = parse("Projects & Certifications\nShop App\nBuilt a store with Vue.\n");
        assert_eq!(profile.projects.len(), 1);
        assert_eq!(profile.projects[0].title, "Shop App");
    }

    #[test]
    fn test_description_mentioning_experience_is_kept() {
        let text = "Projects:\nShop App\nBuilt an ecommerce store with React.\n\
                    Improved user experience with Docker and Redis.\n";
        let profile = parse(text);
        assert_eq!(profile.projects.len(), 1);

        let shop = &profile.projects[0];
        assert!(shop.description.ends_with("Improved user experience with Docker and Redis."));
        for tech in ["react", "docker", "redis"] {
            assert!(shop.tech_stack.contains(tech), "missing tech {tech}");
        }
    }

    #[test]
    fn test_end_heading_is_not_a_project() {
        let profile = parse(RESUME);
        assert!(profile.projects.iter().all(|p| p.title != "Work Experience"));
    }

    #[test]
    fn test_no_project_section_means_no_projects() {
        let profile = parse("Engineer with React.\nBuilt things with Docker.");
        assert!(profile.projects.is_empty());
    }

    #[test]
    fn test_ecommerce_alias_for_project_domain() {
        let text = "Projects\nStorefront\nAn e-commerce store on Vue.";
        let profile = parse(text);
        assert_eq!(profile.projects[0].domain.as_deref(), Some("ecommerce"));
        assert!(profile.domains.contains("ecommerce"));
    }

    #[test]
    fn test_certifications_lowercased() {
        let profile = parse(RESUME);
        assert_eq!(
            profile.certifications.iter().collect::<Vec<_>>(),
            vec!["aws certified"]
        );
    }

    #[test]
    fn test_certification_abbreviations_need_word_boundaries() {
        let profile = parse("Certified PMP and CSM; worked with csmith tools");
        assert!(profile.certifications.contains("pmp"));
        assert!(profile.certifications.contains("csm"));
        assert_eq!(profile.certifications.len(), 2);
    }

    #[test]
    fn test_education_detected() {
        assert_eq!(parse(RESUME).education, Some(EducationLevel::Masters));
        assert_eq!(parse("No degree listed").education, None);
    }

    #[test]
    fn test_experience_inferred_from_year_span() {
        // earliest year 2016, as of 2026
        assert_eq!(parse(RESUME).experience_years, Some(10));
    }

    #[test]
    fn test_stated_experience_wins_over_year_span() {
        let text = "7 years of experience. Worked 2001 - 2020.";
        assert_eq!(parse(text).experience_years, Some(7));
    }

    #[test]
    fn test_single_year_gives_no_experience() {
        assert_eq!(parse("Graduated 2020, graduated again 2020").experience_years, None);
    }

    #[test]
    fn test_inferred_experience_capped_at_50() {
        assert_eq!(parse("Joined 1950, retired 2020").experience_years, Some(50));
    }

    #[test]
    fn test_resume_domains() {
        let profile = parse(RESUME);
        assert!(profile.domains.contains("fintech"));
        assert!(profile.domains.contains("healthcare"));
        assert!(!profile.domains.contains("ai"));
    }

    #[test]
    fn test_empty_resume_yields_empty_profile() {
        assert_eq!(parse(""), ResumeProfile::default());
    }
}

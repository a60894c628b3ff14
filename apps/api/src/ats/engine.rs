//! ATS Engine: runs the full pipeline for one resume/JD pair:
//! parse both documents → match → score → improvements.
//!
//! The engine owns its vocabulary and weights and holds no per-call state, so
//! one instance is shared across requests behind an `Arc`.

use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ats::improvements::{generate_improvements, Improvement};
use crate::ats::jd_parser::{parse_job_description, JobRequirements};
use crate::ats::matching::{MatchResults, Matcher};
use crate::ats::resume_parser::{parse_resume_as_of, ResumeProfile};
use crate::ats::scoring::{
    calculate_ats_score_with, selection_probability, AtsScore, ScoreBreakdown, ScoringWeights,
    TierWeights,
};
use crate::ats::signals::EducationLevel;
use crate::ats::vocabulary::Vocabulary;
use crate::errors::AtsError;

static DEFAULT_ENGINE: LazyLock<AtsEngine> = LazyLock::new(AtsEngine::default);

// ────────────────────────────────────────────────────────────────────────────
// Result models
// ────────────────────────────────────────────────────────────────────────────

/// Complete, serializable outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsAnalysis {
    pub ats_score: u32,
    pub selection_probability: u32,
    pub breakdown: ScoreBreakdown,
    /// Mandatory exact, preferred exact, mandatory normalized, preferred normalized.
    pub matched_skills: Vec<String>,
    pub partial_skills: Vec<PartialSkill>,
    pub missing_skills: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub project_relevance: Vec<ProjectSummary>,
    pub project_gaps: Vec<String>,
    pub matched_certifications: Vec<String>,
    pub missing_certifications: Vec<String>,
    pub improvements: Vec<Improvement>,
    pub explainability: Explainability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialSkill {
    pub resume: String,
    pub jd: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub relevance: f64,
    pub reason: String,
}

/// What the engine saw and how it weighed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explainability {
    pub jd_requirements: JdRequirementsSummary,
    pub resume_data: ResumeDataSummary,
    /// e.g. `"skillsWeight": "50%"`
    pub scoring_logic: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdRequirementsSummary {
    pub mandatory_skills: IndexSet<String>,
    pub preferred_skills: IndexSet<String>,
    pub optional_skills: IndexSet<String>,
    pub certifications: IndexSet<String>,
    pub education: Option<EducationLevel>,
    pub experience: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDataSummary {
    pub skills_found: IndexSet<String>,
    pub projects_found: usize,
    pub certifications_found: IndexSet<String>,
    pub education_found: Option<EducationLevel>,
    pub experience_years: Option<u32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct AtsEngine {
    vocabulary: Vocabulary,
    weights: ScoringWeights,
    tier_weights: TierWeights,
}

impl AtsEngine {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            ..Default::default()
        }
    }

    /// Structured requirements extracted from a JD, without scoring.
    pub fn parse_job_description(&self, jd_text: &str) -> Result<JobRequirements, AtsError> {
        require_text(jd_text, "jobDescription")?;
        Ok(parse_job_description(jd_text, &self.vocabulary))
    }

    /// Structured resume profile, without scoring.
    pub fn parse_resume(&self, resume_text: &str) -> Result<ResumeProfile, AtsError> {
        require_text(resume_text, "resumeText")?;
        Ok(parse_resume_as_of(resume_text, &self.vocabulary, Utc::now().year()))
    }

    pub fn analyze(&self, resume_text: &str, jd_text: &str) -> Result<AtsAnalysis, AtsError> {
        self.analyze_as_of(resume_text, jd_text, Utc::now().year())
    }

    /// Full analysis with an explicit current year for experience inference.
    /// Fails only when either text is empty or whitespace-only.
    pub fn analyze_as_of(
        &self,
        resume_text: &str,
        jd_text: &str,
        current_year: i32,
    ) -> Result<AtsAnalysis, AtsError> {
        require_text(resume_text, "resumeText")?;
        require_text(jd_text, "jobDescription")?;

        let requirements = parse_job_description(jd_text, &self.vocabulary);
        let resume = parse_resume_as_of(resume_text, &self.vocabulary, current_year);

        let results = Matcher::new(&self.vocabulary).match_all(&resume, &requirements);
        debug!(
            "Matched skills: {} mandatory missing, {} keywords missing, {} relevant projects",
            results.skills.mandatory.missing.len(),
            results.keywords.missing.len(),
            results.projects.relevant.len()
        );

        let score = calculate_ats_score_with(&results, &self.weights, &self.tier_weights);
        let probability = selection_probability(score.ats_score);
        let improvements = generate_improvements(&results, &score.breakdown);

        info!(
            "ATS analysis complete: score {}, selection probability {}, {} improvements",
            score.ats_score,
            probability,
            improvements.len()
        );

        Ok(self.assemble(score, probability, results, improvements, &requirements, &resume))
    }

    fn assemble(
        &self,
        score: AtsScore,
        selection_probability: u32,
        results: MatchResults,
        improvements: Vec<Improvement>,
        requirements: &JobRequirements,
        resume: &ResumeProfile,
    ) -> AtsAnalysis {
        let MatchResults {
            skills,
            keywords,
            projects,
            certifications,
            ..
        } = results;
        let (mandatory, preferred) = (&skills.mandatory, &skills.preferred);

        let matched_skills = mandatory
            .exact
            .iter()
            .chain(&preferred.exact)
            .chain(&mandatory.normalized)
            .chain(&preferred.normalized)
            .map(|m| m.jd.clone())
            .collect();

        let partial_skills = mandatory
            .partial
            .iter()
            .chain(&preferred.partial)
            .map(|m| PartialSkill {
                resume: m.resume.clone(),
                jd: m.jd.clone(),
                similarity: m.score,
            })
            .collect();

        let missing_skills = mandatory
            .missing
            .iter()
            .chain(&preferred.missing)
            .cloned()
            .collect();

        let project_relevance = projects
            .relevant
            .into_iter()
            .map(|p| ProjectSummary {
                name: p.name,
                relevance: p.relevance,
                reason: p.reason,
            })
            .collect();

        AtsAnalysis {
            ats_score: score.ats_score,
            selection_probability,
            breakdown: score.breakdown,
            matched_skills,
            partial_skills,
            missing_skills,
            matched_keywords: keywords.matched,
            missing_keywords: keywords.missing,
            project_relevance,
            project_gaps: projects.gaps,
            matched_certifications: certifications.matched,
            missing_certifications: certifications.missing,
            improvements,
            explainability: self.explain(requirements, resume),
        }
    }

    fn explain(&self, requirements: &JobRequirements, resume: &ResumeProfile) -> Explainability {
        Explainability {
            jd_requirements: JdRequirementsSummary {
                mandatory_skills: requirements.mandatory_skills.clone(),
                preferred_skills: requirements.preferred_skills.clone(),
                optional_skills: requirements.optional_skills.clone(),
                certifications: requirements.certifications.clone(),
                education: requirements.education_required,
                experience: requirements.experience_required,
            },
            resume_data: ResumeDataSummary {
                skills_found: resume.skills.clone(),
                projects_found: resume.projects.len(),
                certifications_found: resume.certifications.clone(),
                education_found: resume.education,
                experience_years: resume.experience_years,
            },
            scoring_logic: self
                .weights
                .as_percentages()
                .into_iter()
                .map(|(category, pct)| (format!("{category}Weight"), pct))
                .collect(),
        }
    }
}

fn require_text(text: &str, field: &'static str) -> Result<(), AtsError> {
    if text.trim().is_empty() {
        return Err(AtsError::MalformedInput { field });
    }
    Ok(())
}

/// Analyzes a resume against a job description with the built-in vocabulary.
pub fn analyze_resume_ats(resume_text: &str, jd_text: &str) -> Result<AtsAnalysis, AtsError> {
    DEFAULT_ENGINE.analyze(resume_text, jd_text)
}

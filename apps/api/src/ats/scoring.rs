//! Scoring Engine: turns match results into a weighted 0–100 ATS score and a
//! derived selection probability.

use serde::{Deserialize, Serialize};

use crate::ats::matching::{
    CertificationMatch, EducationMatch, KeywordMatch, MatchResults, ProjectMatch, SkillMatch,
    TierMatches, EXACT_CONFIDENCE, NORMALIZED_CONFIDENCE, PARTIAL_CONFIDENCE,
};

/// Category weights for the aggregate score. Defaults sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub projects: f64,
    pub keywords: f64,
    pub education: f64,
    pub certifications: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.5,
            projects: 0.2,
            keywords: 0.2,
            education: 0.05,
            certifications: 0.05,
        }
    }
}

impl ScoringWeights {
    /// Weights as display percentages, e.g. `"50%"`.
    pub fn as_percentages(&self) -> [(&'static str, String); 5] {
        let pct = |w: f64| format!("{}%", (w * 100.0).round());
        [
            ("skills", pct(self.skills)),
            ("projects", pct(self.projects)),
            ("keywords", pct(self.keywords)),
            ("education", pct(self.education)),
            ("certifications", pct(self.certifications)),
        ]
    }
}

/// Relative weight of each requirement tier inside the skills score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierWeights {
    pub mandatory: f64,
    pub preferred: f64,
    pub optional: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            mandatory: 3.0,
            preferred: 2.0,
            optional: 1.0,
        }
    }
}

/// Per-category sub-scores, each 0 – 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub skills_score: f64,
    pub projects_score: f64,
    pub keywords_score: f64,
    pub education_score: f64,
    pub certifications_score: f64,
}

impl ScoreBreakdown {
    fn rounded(self) -> Self {
        Self {
            skills_score: self.skills_score.round(),
            projects_score: self.projects_score.round(),
            keywords_score: self.keywords_score.round(),
            education_score: self.education_score.round(),
            certifications_score: self.certifications_score.round(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScore {
    pub ats_score: u32,
    /// Whole-number sub-scores; the aggregate was computed before rounding.
    pub breakdown: ScoreBreakdown,
}

/// Scores match results with the default weights.
pub fn calculate_ats_score(results: &MatchResults) -> AtsScore {
    calculate_ats_score_with(results, &ScoringWeights::default(), &TierWeights::default())
}

pub fn calculate_ats_score_with(
    results: &MatchResults,
    weights: &ScoringWeights,
    tier_weights: &TierWeights,
) -> AtsScore {
    let breakdown = ScoreBreakdown {
        skills_score: skills_score(&results.skills, tier_weights),
        projects_score: projects_score(&results.projects),
        keywords_score: keywords_score(&results.keywords),
        education_score: education_score(&results.education),
        certifications_score: certifications_score(&results.certifications),
    };

    let weighted = breakdown.skills_score * weights.skills
        + breakdown.projects_score * weights.projects
        + breakdown.keywords_score * weights.keywords
        + breakdown.education_score * weights.education
        + breakdown.certifications_score * weights.certifications;

    AtsScore {
        ats_score: to_percent(weighted),
        breakdown: breakdown.rounded(),
    }
}

/// Tier-weighted, confidence-weighted share of JD skills covered.
/// 0 when the JD names no skills at all.
pub fn skills_score(tiers: &TierMatches, tier_weights: &TierWeights) -> f64 {
    let mut total_weight = 0.0;
    let mut earned_weight = 0.0;

    for (tier, weight) in [
        (&tiers.mandatory, tier_weights.mandatory),
        (&tiers.preferred, tier_weights.preferred),
        (&tiers.optional, tier_weights.optional),
    ] {
        total_weight += tier.total() as f64 * weight;
        earned_weight += earned(tier) * weight;
    }

    if total_weight == 0.0 {
        return 0.0;
    }
    earned_weight / total_weight * 100.0
}

fn earned(tier: &SkillMatch) -> f64 {
    tier.exact.len() as f64 * EXACT_CONFIDENCE
        + tier.normalized.len() as f64 * NORMALIZED_CONFIDENCE
        + tier.partial.len() as f64 * PARTIAL_CONFIDENCE
}

pub fn keywords_score(keywords: &KeywordMatch) -> f64 {
    ratio_or_full(keywords.matched.len(), keywords.missing.len())
}

/// Mean relevance of relevant projects, 0 when there are none.
pub fn projects_score(projects: &ProjectMatch) -> f64 {
    if projects.relevant.is_empty() {
        return 0.0;
    }
    let total: f64 = projects.relevant.iter().map(|p| p.relevance).sum();
    total / projects.relevant.len() as f64
}

pub fn education_score(education: &EducationMatch) -> f64 {
    if education.matched {
        100.0
    } else {
        50.0
    }
}

pub fn certifications_score(certifications: &CertificationMatch) -> f64 {
    ratio_or_full(certifications.matched.len(), certifications.missing.len())
}

fn ratio_or_full(matched: usize, missing: usize) -> f64 {
    let total = matched + missing;
    if total == 0 {
        return 100.0;
    }
    matched as f64 / total as f64 * 100.0
}

/// Piecewise-linear transform of the ATS score. Mid-range scores (40–80) are
/// stretched, the ends compressed.
pub fn selection_probability(ats_score: u32) -> u32 {
    let s = f64::from(ats_score);
    let probability = if s >= 80.0 {
        85.0 + (s - 80.0) * 0.75
    } else if s >= 60.0 {
        50.0 + (s - 60.0) * 1.75
    } else if s >= 40.0 {
        20.0 + (s - 40.0) * 1.5
    } else {
        s * 0.5
    };
    to_percent(probability)
}

fn to_percent(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

//! Axum route handlers for the ATS API.
//!
//! Text extraction from uploaded files happens upstream; these endpoints take
//! plain text.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::ats::engine::AtsAnalysis;
use crate::ats::jd_parser::JobRequirements;
use crate::ats::resume_parser::ResumeProfile;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseJdRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats/analyze
///
/// Scores a resume against a job description and returns the full analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AtsAnalysis>, AppError> {
    let analysis = state
        .engine
        .analyze(&request.resume_text, &request.job_description)?;
    Ok(Json(analysis))
}

/// POST /api/v1/ats/parse-jd
///
/// Returns the structured requirements extracted from a job description.
/// Useful for previewing extraction before analyzing.
pub async fn handle_parse_jd(
    State(state): State<AppState>,
    Json(request): Json<ParseJdRequest>,
) -> Result<Json<JobRequirements>, AppError> {
    let requirements = state.engine.parse_job_description(&request.job_description)?;
    Ok(Json(requirements))
}

/// POST /api/v1/ats/parse-resume
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ResumeProfile>, AppError> {
    let profile = state.engine.parse_resume(&request.resume_text)?;
    Ok(Json(profile))
}

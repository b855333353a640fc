use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::matcher::{match_jobs, MatchReport, MATCH_THRESHOLD};
use crate::prompt_builder::listing::JobListing;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub user_id: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<JobListing>,
    /// Overrides [`MATCH_THRESHOLD`].
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub report: MatchReport,
    /// Ready-made input for `POST /api/v1/prompts/jobs`.
    pub job_item: Value,
}

/// POST /api/v1/matches
///
/// Scores the listings against the user's skills and returns the match
/// report together with the job-match item built from it.
pub async fn handle_match(
    State(state): State<AppState>,
    AppJson(request): AppJson<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id cannot be empty".to_string()));
    }

    let report = match_jobs(
        &request.user_id,
        &request.skills,
        &request.jobs,
        request.threshold.unwrap_or(MATCH_THRESHOLD),
        state.similarity.as_ref(),
        state.clock.as_ref(),
    )
    .await?;

    let job_item = report.to_job_item();
    Ok(Json(MatchResponse { report, job_item }))
}

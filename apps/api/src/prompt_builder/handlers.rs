//! Axum route handlers for the prompt builders.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::chat::{InboundMessage, TelegramUpdate};
use crate::prompt_builder::chat::{build_chat_prompt, ChatPromptRecord};
use crate::prompt_builder::jobs::{build_job_prompt, JobPromptOutcome};
use crate::prompt_builder::listing::render_listing_prompt;
use crate::state::AppState;

/// POST /api/v1/prompts/chat
///
/// Takes a Telegram update and returns the generated user id plus the
/// profile-extraction prompt.
pub async fn handle_chat_prompt(
    State(state): State<AppState>,
    AppJson(update): AppJson<TelegramUpdate>,
) -> Result<Json<ChatPromptRecord>, AppError> {
    let record = build_chat_prompt(InboundMessage::from(update), state.clock.as_ref());
    Ok(Json(record))
}

/// POST /api/v1/prompts/jobs
///
/// Takes a job-match item (`data` + `Key`/`key`/`fileName`). A missing batch
/// is answered with an error record, not an HTTP error, so the orchestrator
/// can branch on it.
pub async fn handle_job_prompt(
    State(state): State<AppState>,
    AppJson(item): AppJson<Value>,
) -> Result<Json<JobPromptOutcome>, AppError> {
    Ok(Json(build_job_prompt(&item, state.clock.as_ref())))
}

#[derive(Debug, Deserialize)]
pub struct ListingPromptRequest {
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct ListingPromptResponse {
    pub prompt: String,
}

/// POST /api/v1/prompts/listing
///
/// Wraps scraped job-offer text in the listing extraction prompt.
pub async fn handle_listing_prompt(
    AppJson(request): AppJson<ListingPromptRequest>,
) -> Result<Json<ListingPromptResponse>, AppError> {
    if request.job_text.trim().is_empty() {
        return Err(AppError::BadRequest("job_text cannot be empty".to_string()));
    }
    Ok(Json(ListingPromptResponse {
        prompt: render_listing_prompt(&request.job_text),
    }))
}

//! Axum route handlers for the composed pipelines.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::chat::{InboundMessage, TelegramUpdate};
use crate::normalizer::NormalizedRecord;
use crate::pipeline::{run_chat_pipeline, run_job_pipeline, JobPipelineOutcome};
use crate::state::AppState;

/// POST /api/v1/pipeline/chat
///
/// Full chat path: prompt, LLM call, normalization and profile write.
pub async fn handle_chat_pipeline(
    State(state): State<AppState>,
    AppJson(update): AppJson<TelegramUpdate>,
) -> Result<Json<NormalizedRecord>, AppError> {
    let record = run_chat_pipeline(
        InboundMessage::from(update),
        state.clock.as_ref(),
        state.llm.as_ref(),
        state.store.as_ref(),
    )
    .await?;
    Ok(Json(record))
}

/// POST /api/v1/pipeline/jobs
///
/// Full job-match path: prompt and LLM call. Returns the message text for the
/// orchestrator to deliver, or the error record when the batch is missing.
pub async fn handle_job_pipeline(
    State(state): State<AppState>,
    AppJson(item): AppJson<Value>,
) -> Result<Json<JobPipelineOutcome>, AppError> {
    let outcome = run_job_pipeline(&item, state.clock.as_ref(), state.llm.as_ref()).await?;
    Ok(Json(outcome))
}

use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{AppError, PipelineError};
use crate::extract::AppJson;
use crate::normalizer::{
    normalize_request, reply_text, NormalizeRequest, NormalizedRecord, REPLY_TEXT_FIELD,
};
use crate::prompt_builder::listing::{parse_listing, JobListing};

/// POST /api/v1/responses/normalize
///
/// Body: `{ "llm_reply": <generateContent body>, "context": { "chat_id", "user_id" } }`.
pub async fn handle_normalize(
    AppJson(request): AppJson<NormalizeRequest>,
) -> Result<Json<NormalizedRecord>, AppError> {
    let record = normalize_request(&request)?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct ListingReplyRequest {
    #[serde(default)]
    pub llm_reply: Option<Value>,
}

/// POST /api/v1/responses/listing
///
/// Body: `{ "llm_reply": <generateContent body> }`. Returns the listing with
/// placeholders filled in, or 422 when the reply is missing or not JSON.
pub async fn handle_listing_reply(
    AppJson(request): AppJson<ListingReplyRequest>,
) -> Result<Json<JobListing>, AppError> {
    let text = request
        .llm_reply
        .as_ref()
        .and_then(reply_text)
        .ok_or_else(|| PipelineError::missing(REPLY_TEXT_FIELD))?;
    Ok(Json(parse_listing(text)?))
}

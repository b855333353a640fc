//! Pipeline runner — chains a prompt builder, one LLM call and (for the chat
//! path) the normalizer plus the profile write.
//!
//! The runner adds no behaviour of its own: every step is one of the pure
//! units, and an LLM failure is returned as is, without retry.

pub mod handlers;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::clock::Clock;
use crate::errors::AppError;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::chat::{ChatId, InboundMessage};
use crate::normalizer::{normalize, NormalizedRecord, PromptContext};
use crate::prompt_builder::chat::build_chat_prompt;
use crate::prompt_builder::jobs::{build_job_prompt, JobPromptError, JobPromptOutcome};
use crate::storage::ProfileStore;

/// Plain-text notification composed for one chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationMessage {
    pub chat_id: ChatId,
    pub message: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobPipelineOutcome {
    Notification(NotificationMessage),
    Error(JobPromptError),
}

/// Chat message → extraction prompt → LLM → normalized record → `users/{chatId}.json`.
pub async fn run_chat_pipeline(
    message: InboundMessage,
    clock: &dyn Clock,
    llm: &dyn TextGenerator,
    store: &dyn ProfileStore,
) -> Result<NormalizedRecord, AppError> {
    let record = build_chat_prompt(message, clock);
    let context = PromptContext {
        chat_id: record.chat_id.clone(),
        user_id: Some(record.user_id.clone()),
    };
    // A reply without a routable chat id could never be stored.
    context.require_chat_id()?;

    let reply = llm.generate(&record.prompt).await?;
    let normalized = normalize(reply.text(), Some(&context))?;

    store
        .put_json(&normalized.file_name, normalized.json_content.clone())
        .await?;

    info!(
        "Stored profile for user {} at {}",
        normalized.user_id, normalized.file_name
    );
    Ok(normalized)
}

/// Job-match item → notification prompt → LLM → message text.
/// A missing batch short-circuits into the error record before any LLM call.
pub async fn run_job_pipeline(
    item: &Value,
    clock: &dyn Clock,
    llm: &dyn TextGenerator,
) -> Result<JobPipelineOutcome, AppError> {
    let record = match build_job_prompt(item, clock) {
        JobPromptOutcome::Prompt(record) => record,
        JobPromptOutcome::Error(err) => return Ok(JobPipelineOutcome::Error(err)),
    };

    let reply = llm.generate(&record.prompt).await?;
    let message = reply
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(LlmError::EmptyContent)?
        .to_string();

    info!("Composed notification for chat {}", record.chat_id);
    Ok(JobPipelineOutcome::Notification(NotificationMessage {
        chat_id: record.chat_id,
        message,
        created_at: record.created_at,
        warnings: record.warnings,
    }))
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matcher::handlers::handle_match;
use crate::normalizer::handlers::{handle_listing_reply, handle_normalize};
use crate::pipeline::handlers::{handle_chat_pipeline, handle_job_pipeline};
use crate::prompt_builder::handlers::{
    handle_chat_prompt, handle_job_prompt, handle_listing_prompt,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Transformation units, one orchestrator step each
        .route("/api/v1/prompts/chat", post(handle_chat_prompt))
        .route("/api/v1/prompts/jobs", post(handle_job_prompt))
        .route("/api/v1/responses/normalize", post(handle_normalize))
        .route("/api/v1/prompts/listing", post(handle_listing_prompt))
        .route("/api/v1/responses/listing", post(handle_listing_reply))
        .route("/api/v1/matches", post(handle_match))
        // Composed runs
        .route("/api/v1/pipeline/chat", post(handle_chat_pipeline))
        .route("/api/v1/pipeline/jobs", post(handle_job_pipeline))
        .with_state(state)
}

use std::sync::Arc;

use crate::clock::Clock;
use crate::llm_client::TextGenerator;
use crate::matcher::SimilarityScorer;
use crate::storage::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every field is an immutable handle; requests never share mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Time source for user ids and `created_at`. `SystemClock` in production.
    pub clock: Arc<dyn Clock>,
    /// Text generator used by the pipeline runner. Default: `GeminiClient`.
    pub llm: Arc<dyn TextGenerator>,
    /// Profile file sink used by the chat pipeline. Default: `S3ProfileStore`.
    pub store: Arc<dyn ProfileStore>,
    /// Semantic term of the match score. Default: `LexicalSimilarity`.
    pub similarity: Arc<dyn SimilarityScorer>,
}

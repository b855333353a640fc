//! Job-match path — turns a batch of matched listings into a notification prompt.
//!
//! The input item is free-form JSON from the matcher. It is classified once at
//! the boundary into [`JobListingBatch`], so the rest of the path never
//! re-checks for missing fields.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::clock::{iso_timestamp, Clock};
use crate::errors::PipelineError;
use crate::models::chat::ChatId;
use crate::prompt_builder::prompts::{NOTIFICATION_INSTRUCTIONS, NOTIFICATION_PROMPT_TEMPLATE};

/// Field holding the listings.
pub const LISTINGS_FIELD: &str = "data";

/// Fields that may carry the storage key, in priority order.
pub const KEY_FIELDS: [&str; 3] = ["Key", "key", "fileName"];

const MISSING_BATCH_MESSAGE: &str =
    "Error al acceder a los datos: No se encontraron datos en json.data";

/// The listings of a job-match item, or the fact that there are none.
#[derive(Debug, Clone, PartialEq)]
pub enum JobListingBatch {
    Valid(Value),
    Missing,
}

impl JobListingBatch {
    /// `null`, `false`, `0`, `""` and an absent field all count as missing.
    /// An empty array is a valid (empty) batch.
    pub fn from_item(item: &Value) -> Self {
        match item.get(LISTINGS_FIELD) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => JobListingBatch::Missing,
            Some(Value::String(s)) if s.is_empty() => JobListingBatch::Missing,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => JobListingBatch::Missing,
            Some(listings) => JobListingBatch::Valid(listings.clone()),
        }
    }
}

/// Successful job-path output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPromptRecord {
    pub chat_id: ChatId,
    pub prompt: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Input-shape snapshot attached to an error record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDebug {
    pub has_json: bool,
    pub json_keys: Option<Vec<String>>,
    pub full_json: Value,
}

/// Recoverable job-path failure, reported as data rather than raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPromptError {
    pub error: String,
    pub debug: InputDebug,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobPromptOutcome {
    Prompt(JobPromptRecord),
    Error(JobPromptError),
}

/// Last `/` segment with a trailing `.json` removed. `""` stays `""`.
pub fn derive_storage_key(source: &str) -> &str {
    let last = source.rsplit('/').next().unwrap_or_default();
    last.strip_suffix(".json").unwrap_or(last)
}

/// First non-empty string among [`KEY_FIELDS`].
pub fn find_source_key(item: &Value) -> Option<&str> {
    KEY_FIELDS
        .iter()
        .filter_map(|field| item.get(*field).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// Renders the notification prompt around the pretty-printed listings
/// (two-space indent, field order as received).
pub fn render_notification_prompt(listings: &Value) -> String {
    let listings_json = format!("{listings:#}");
    NOTIFICATION_PROMPT_TEMPLATE
        .replace("{instructions}", NOTIFICATION_INSTRUCTIONS)
        .replace("{listings_json}", &listings_json)
}

/// Builds the job-path output. A missing batch becomes an error record;
/// an empty correlation id is kept but reported as a warning.
pub fn build_job_prompt(item: &Value, clock: &dyn Clock) -> JobPromptOutcome {
    let listings = match JobListingBatch::from_item(item) {
        JobListingBatch::Valid(listings) => listings,
        JobListingBatch::Missing => {
            warn!("Job-match item has no '{LISTINGS_FIELD}' field");
            return JobPromptOutcome::Error(missing_batch_error(item));
        }
    };

    let source = find_source_key(item).unwrap_or_default();
    let chat_id = derive_storage_key(source).to_string();

    let mut warnings = Vec::new();
    if chat_id.is_empty() {
        let err = PipelineError::malformed(KEY_FIELDS.join("|"), source);
        warn!("{err}; notification will carry an empty chat id");
        warnings.push(err.to_string());
    }

    JobPromptOutcome::Prompt(JobPromptRecord {
        chat_id: ChatId::Text(chat_id),
        prompt: render_notification_prompt(&listings),
        created_at: iso_timestamp(clock.now()),
        warnings,
    })
}

fn missing_batch_error(item: &Value) -> JobPromptError {
    let keys = item.as_object().map(|obj| obj.keys().cloned().collect());
    JobPromptError {
        error: MISSING_BATCH_MESSAGE.to_string(),
        debug: InputDebug {
            has_json: !item.is_null(),
            json_keys: keys,
            full_json: item.clone(),
        },
    }
}

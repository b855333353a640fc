//! Response normalizer — cleans the LLM reply to the extraction prompt and
//! pairs it with the chat/user ids of the record that produced the prompt.
//!
//! `json_content` is returned as a string. It is checked against the profile
//! schema only to attach a warning; a consumer must still treat it as
//! unverified JSON.

pub mod handlers;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::PipelineError;
use crate::models::chat::ChatId;
use crate::models::profile::parse_profile;

/// Where the reply text sits in a `generateContent` response body.
pub const REPLY_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

pub const REPLY_TEXT_FIELD: &str = "llm_reply.candidates[0].content.parts[0].text";

/// Ids carried over from the chat-path record. Extra fields are ignored, so
/// the whole `ChatPromptRecord` can be passed as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    #[serde(default)]
    pub chat_id: Option<ChatId>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl PromptContext {
    /// The chat id, if it can name a storage file.
    pub fn require_chat_id(&self) -> Result<&ChatId, PipelineError> {
        let chat_id = self
            .chat_id
            .as_ref()
            .ok_or_else(|| PipelineError::missing("context.chat_id"))?;
        if chat_id.is_blank() {
            return Err(PipelineError::malformed("context.chat_id", chat_id.to_string()));
        }
        Ok(chat_id)
    }
}

/// Named normalizer input: the raw LLM body plus its originating context.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub llm_reply: Option<Value>,
    #[serde(default)]
    pub context: Option<PromptContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub chat_id: ChatId,
    pub json_content: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Text of the first part of the first candidate, if it is a string.
pub fn reply_text(reply: &Value) -> Option<&str> {
    reply.pointer(REPLY_TEXT_POINTER).and_then(Value::as_str)
}

/// Removes the opening fence (with its info string, e.g. `json`) and the
/// closing ```` ``` ````, then trims. Prose around the fences is dropped.
/// Text without fences comes back trimmed and otherwise untouched.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(open) = text.find("```") else {
        return text;
    };
    let after = &text[open + "```".len()..];
    let body = match after.find('\n') {
        Some(eol) if is_info_string(&after[..eol]) => &after[eol + 1..],
        _ => strip_json_tag(after),
    };
    let body = match body.rfind("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

/// Language tag after an opening fence: a single word, possibly empty.
fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}

/// Single-line fence such as ```` ```json{"a":1}``` ````.
fn strip_json_tag(after: &str) -> &str {
    match after.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &after[4..],
        _ => after,
    }
}

/// `users/{chatId}.json`
pub fn storage_path(chat_id: &ChatId) -> String {
    format!("users/{chat_id}.json")
}

/// Builds the normalized record. A missing reply or context is a hard,
/// typed failure; a blank chat id is rejected since it cannot name a file.
pub fn normalize(
    reply_text: Option<&str>,
    context: Option<&PromptContext>,
) -> Result<NormalizedRecord, PipelineError> {
    let raw = reply_text.ok_or_else(|| PipelineError::missing(REPLY_TEXT_FIELD))?;
    let context = context.ok_or_else(|| PipelineError::missing("context"))?;
    let chat_id = context.require_chat_id()?.clone();
    let user_id = context
        .user_id
        .clone()
        .ok_or_else(|| PipelineError::missing("context.user_id"))?;

    let json_content = strip_json_fences(raw).to_string();

    let mut warnings = Vec::new();
    if let Err(e) = parse_profile(&json_content, &chat_id) {
        warn!("Reply for chat {chat_id} is not a valid profile: {e}");
        warnings.push(e.to_string());
    }

    Ok(NormalizedRecord {
        file_name: storage_path(&chat_id),
        user_id,
        chat_id,
        json_content,
        warnings,
    })
}

/// [`normalize`] over the HTTP request shape.
pub fn normalize_request(request: &NormalizeRequest) -> Result<NormalizedRecord, PipelineError> {
    let text = request.llm_reply.as_ref().and_then(reply_text);
    normalize(text, request.context.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> PromptContext {
        PromptContext {
            chat_id: Some(ChatId::Numeric(12345)),
            user_id: Some("user_12345_1700000000000".to_string()),
        }
    }

    fn gemini_body(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        assert_eq!(strip_json_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        assert_eq!(strip_json_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_fences_is_idempotent_on_clean_json() {
        let clean = "{\"a\": 1}";
        assert_eq!(strip_json_fences(clean), clean);
        assert_eq!(strip_json_fences("  {\"a\": 1}\n"), clean);
        assert_eq!(strip_json_fences(strip_json_fences(clean)), clean);
    }

    #[test]
    fn test_strip_json_fences_ignores_surrounding_chatter() {
        let text = "Aquí está:\n```json\n{\"name\": \"Ana\"}\n```\n¡Saludos!";
        assert_eq!(strip_json_fences(text), "{\"name\": \"Ana\"}");
    }

    #[test]
    fn test_strip_json_fences_drops_any_info_string() {
        assert_eq!(strip_json_fences("```JSON\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_json_fences("```jsonc\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_fences_after_prose_with_bare_fence() {
        assert_eq!(strip_json_fences("Sure:\n```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_fences_single_line() {
        assert_eq!(strip_json_fences("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_json_fences("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_fences_keeps_inner_content_byte_identical() {
        let inner = "{\n  \"skills\": [\"C#\", \".NET Core\"],\n  \"email\": \"\"\n}";
        let text = format!("```json\r\n{inner}\r\n```");
        assert_eq!(strip_json_fences(&text), inner);
    }

    #[test]
    fn test_reply_text_reads_first_candidate_part() {
        assert_eq!(reply_text(&gemini_body("hola")), Some("hola"));
        assert_eq!(reply_text(&json!({"candidates": []})), None);
        assert_eq!(
            reply_text(&json!({"candidates": [{"content": {"parts": [{"text": 3}]}}]})),
            None
        );
    }

    #[test]
    fn test_normalize_builds_record() {
        let body = gemini_body("```json\n{\"a\":1}\n```");
        let record = normalize(reply_text(&body), Some(&context())).unwrap();
        assert_eq!(record.json_content, "{\"a\":1}");
        assert_eq!(record.file_name, "users/12345.json");
        assert_eq!(record.user_id, "user_12345_1700000000000");
        assert_eq!(record.chat_id, ChatId::Numeric(12345));
    }

    #[test]
    fn test_valid_profile_has_no_warnings() {
        let text = "```json\n{\"name\":\"Ana\",\"email\":\"\",\"skills\":[\"Rust\"],\"job_type\":\"Full time\",\"location\":\"Remoto\"}\n```";
        let record = normalize(Some(text), Some(&context())).unwrap();
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_non_profile_output_is_kept_with_warning() {
        let record = normalize(Some("no es json"), Some(&context())).unwrap();
        assert_eq!(record.json_content, "no es json");
        assert_eq!(record.warnings.len(), 1);
        assert!(record.warnings[0].starts_with("Unparsable LLM output"));
    }

    #[test]
    fn test_missing_reply_is_typed_error() {
        let err = normalize(None, Some(&context())).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInputData { .. }));

        let request = NormalizeRequest {
            llm_reply: Some(json!({"candidates": []})),
            context: Some(context()),
        };
        let err = normalize_request(&request).unwrap_err();
        assert_eq!(err, PipelineError::missing(REPLY_TEXT_FIELD));
    }

    #[test]
    fn test_missing_context_is_typed_error() {
        let err = normalize(Some("{}"), None).unwrap_err();
        assert_eq!(err, PipelineError::missing("context"));

        let no_user = PromptContext {
            user_id: None,
            ..context()
        };
        let err = normalize(Some("{}"), Some(&no_user)).unwrap_err();
        assert_eq!(err, PipelineError::missing("context.user_id"));
    }

    #[test]
    fn test_blank_chat_id_is_rejected() {
        let blank = PromptContext {
            chat_id: Some(ChatId::Text(String::new())),
            ..context()
        };
        let err = normalize(Some("{}"), Some(&blank)).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedIdentifier { .. }));
    }

    #[test]
    fn test_context_accepts_full_chat_prompt_record() {
        let request: NormalizeRequest = serde_json::from_value(json!({
            "llm_reply": gemini_body("```json\n{}\n```"),
            "context": {
                "chat_id": 12345,
                "user_id": "user_12345_1",
                "message": "hola",
                "prompt": "...",
                "created_at": "2023-11-14T22:13:20.000Z"
            }
        }))
        .unwrap();
        let record = normalize_request(&request).unwrap();
        assert_eq!(record.file_name, "users/12345.json");
        assert_eq!(record.json_content, "{}");
    }

    #[test]
    fn test_record_serializes_with_orchestrator_field_names() {
        let record = normalize(Some("```json\n{}\n```"), Some(&context())).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], "user_12345_1700000000000");
        assert_eq!(json["chat_id"], 12345);
        assert_eq!(json["json_content"], "{}");
        assert_eq!(json["file_name"], "users/12345.json");
        assert!(json.get("warnings").is_none());
    }
}

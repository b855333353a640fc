//! Chat path — turns an inbound chat message into a profile-extraction prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::{iso_timestamp, Clock};
use crate::models::chat::{ChatId, InboundMessage};
use crate::prompt_builder::prompts::EXTRACTION_PROMPT_TEMPLATE;

/// Output of the chat path. Field names are what the normalizer reads back as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPromptRecord {
    pub chat_id: Option<ChatId>,
    pub user_id: String,
    pub message: Option<String>,
    pub prompt: String,
    pub created_at: String,
}

/// `user_{chatId}_{epochMillis}`.
///
/// Two calls for the same chat within one millisecond collide; callers that
/// need stronger uniqueness must serialize per chat.
pub fn generate_user_id(chat_id: Option<&ChatId>, at: DateTime<Utc>) -> String {
    let chat = chat_id.map(ToString::to_string).unwrap_or_default();
    format!("user_{}_{}", chat, at.timestamp_millis())
}

/// Renders the extraction prompt. Pure: same inputs, same string.
pub fn render_extraction_prompt(chat_id: Option<&ChatId>, text: Option<&str>) -> String {
    let chat = chat_id.map(ToString::to_string).unwrap_or_default();
    EXTRACTION_PROMPT_TEMPLATE
        .replace("{chat_id}", &chat)
        .replace("{message_text}", text.unwrap_or_default())
}

/// Builds the full chat-path record. The clock read is the only impure step.
pub fn build_chat_prompt(message: InboundMessage, clock: &dyn Clock) -> ChatPromptRecord {
    if message.chat_id.is_none() {
        warn!("Inbound message has no chat id; prompt will embed an empty id");
    }
    if message.text.is_none() {
        warn!("Inbound message has no text; prompt will embed an empty message");
    }

    let now = clock.now();
    let user_id = generate_user_id(message.chat_id.as_ref(), now);
    let prompt = render_extraction_prompt(message.chat_id.as_ref(), message.text.as_deref());

    ChatPromptRecord {
        chat_id: message.chat_id,
        user_id,
        message: message.text,
        prompt,
        created_at: iso_timestamp(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn inbound(chat_id: i64, text: &str) -> InboundMessage {
        InboundMessage {
            chat_id: Some(ChatId::Numeric(chat_id)),
            text: Some(text.to_string()),
        }
    }

    #[test]
    fn test_user_id_is_deterministic_for_fixed_clock() {
        let clock = FixedClock::at_millis(1_700_000_000_000);
        let a = build_chat_prompt(inbound(555, "hola"), &clock);
        let b = build_chat_prompt(inbound(555, "hola"), &clock);
        assert_eq!(a.user_id, "user_555_1700000000000");
        assert_eq!(a, b);
    }

    #[test]
    fn test_user_id_differs_across_timestamps() {
        let id = ChatId::Numeric(555);
        let first = generate_user_id(Some(&id), FixedClock::at_millis(1_000).0);
        let second = generate_user_id(Some(&id), FixedClock::at_millis(1_001).0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_text_still_renders_complete_prompt() {
        let record = build_chat_prompt(inbound(42, ""), &FixedClock::at_millis(0));
        assert!(record.prompt.contains("Usuario_42"));
        assert!(record.prompt.contains(r#"Un usuario envió el mensaje: """#));
        assert!(record.prompt.contains("\"location\""));
        assert!(record.prompt.contains("```json"));
    }

    #[test]
    fn test_prompt_embeds_message_and_default_policy() {
        let prompt = render_extraction_prompt(
            Some(&ChatId::Numeric(7)),
            Some("Soy Ana, sé Rust y busco remoto"),
        );
        assert!(prompt.contains(r#""Soy Ana, sé Rust y busco remoto""#));
        assert!(prompt.contains("job_type: 'No especificado'"));
        assert!(prompt.contains("location: 'No especificado'"));
        assert!(prompt.contains("email: ''"));
        assert!(prompt.contains("Las habilidades sean un array de strings."));
    }

    #[test]
    fn test_message_text_is_not_reinterpreted_as_placeholder() {
        let prompt = render_extraction_prompt(Some(&ChatId::Numeric(7)), Some("literal {chat_id}"));
        assert!(prompt.contains("literal {chat_id}"));
    }

    #[test]
    fn test_missing_chat_id_embeds_empty_value() {
        let record = build_chat_prompt(
            InboundMessage {
                chat_id: None,
                text: Some("hola".to_string()),
            },
            &FixedClock::at_millis(5),
        );
        assert_eq!(record.user_id, "user__5");
        assert!(record.prompt.contains("'Usuario_'"));
    }

    #[test]
    fn test_record_serializes_with_orchestrator_field_names() {
        let record = build_chat_prompt(inbound(9, "hi"), &FixedClock::at_millis(1_700_000_000_000));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["chat_id"], 9);
        assert_eq!(json["user_id"], "user_9_1700000000000");
        assert_eq!(json["message"], "hi");
        assert_eq!(json["created_at"], "2023-11-14T22:13:20.000Z");
        assert!(json["prompt"].as_str().unwrap().contains("\"hi\""));
    }
}

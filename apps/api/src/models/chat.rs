use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque chat identifier. Telegram sends integers; keys derived from
/// storage paths are strings. The original JSON shape is kept on output.
/// Any other JSON value degrades to its textual form instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatId {
    Numeric(i64),
    Text(String),
}

impl ChatId {
    /// True when the id cannot route anything back to a conversation.
    pub fn is_blank(&self) -> bool {
        matches!(self, ChatId::Text(s) if s.trim().is_empty())
    }
}

impl<'de> Deserialize<'de> for ChatId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => match n.as_i64() {
                Some(id) => ChatId::Numeric(id),
                None => ChatId::Text(n.to_string()),
            },
            Value::String(s) => ChatId::Text(s),
            Value::Null => ChatId::Text(String::new()),
            other => ChatId::Text(other.to_string()),
        })
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Numeric(n) => write!(f, "{n}"),
            ChatId::Text(s) => f.write_str(s),
        }
    }
}

/// Telegram update as delivered by the chat trigger: `message.chat.id` and `message.text`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramMessage {
    #[serde(default)]
    pub chat: Option<TelegramChat>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramChat {
    #[serde(default)]
    pub id: Option<ChatId>,
}

/// A single inbound chat message. Both fields may be absent upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: Option<ChatId>,
    pub text: Option<String>,
}

impl From<TelegramUpdate> for InboundMessage {
    fn from(update: TelegramUpdate) -> Self {
        let message = update.message.unwrap_or_default();
        InboundMessage {
            chat_id: message.chat.and_then(|c| c.id),
            text: message.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_chat_id_roundtrips_as_number() {
        let id: ChatId = serde_json::from_str("123456789").unwrap();
        assert_eq!(id, ChatId::Numeric(123456789));
        assert_eq!(serde_json::to_string(&id).unwrap(), "123456789");
        assert_eq!(id.to_string(), "123456789");
    }

    #[test]
    fn test_text_chat_id_is_kept_as_string() {
        let id: ChatId = serde_json::from_str(r#""12345""#).unwrap();
        assert_eq!(id, ChatId::Text("12345".to_string()));
        assert!(!id.is_blank());
        assert!(ChatId::Text("  ".to_string()).is_blank());
    }

    #[test]
    fn test_odd_chat_id_falls_back_to_text() {
        let id: ChatId = serde_json::from_str("1.5").unwrap();
        assert_eq!(id, ChatId::Text("1.5".to_string()));
        let id: ChatId = serde_json::from_str("true").unwrap();
        assert_eq!(id, ChatId::Text("true".to_string()));
    }

    #[test]
    fn test_null_chat_id_is_absent() {
        let update: TelegramUpdate =
            serde_json::from_str(r#"{"message": {"chat": {"id": null}, "text": "hola"}}"#).unwrap();
        assert_eq!(InboundMessage::from(update).chat_id, None);
    }

    #[test]
    fn test_telegram_update_maps_to_inbound_message() {
        let json = r#"{"update_id": 1, "message": {"chat": {"id": -42, "type": "private"}, "text": "hola"}}"#;
        let update: TelegramUpdate = serde_json::from_str(json).unwrap();
        let msg = InboundMessage::from(update);
        assert_eq!(msg.chat_id, Some(ChatId::Numeric(-42)));
        assert_eq!(msg.text.as_deref(), Some("hola"));
    }

    #[test]
    fn test_update_without_message_yields_empty_inbound() {
        let update: TelegramUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(InboundMessage::from(update), InboundMessage::default());
    }
}

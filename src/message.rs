use serde_json::Value;

/// Where an inbound message should be routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Completion request
    Chat,
    /// Image generation request
    Image,
    /// No matching command prefix; remember it, do not reply
    Ignored,
}

/// An inbound gateway message, normalized at the ingestion boundary.
///
/// Webhook payloads arrive with uneven shape (missing fields, media
/// without captions); everything downstream of this struct can assume
/// one fixed form and never branches on payload shape again.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Conversation the message belongs to
    pub chat_id: String,
    /// Who sent it; `me` for own messages echoed back by the gateway
    pub sender: String,
    /// Trimmed body text, possibly empty for media-only messages
    pub body: String,
    pub from_me: bool,
    pub has_media: bool,
}

impl InboundMessage {
    /// Parse a webhook `payload` object. Missing fields normalize to
    /// empty strings rather than failing; blank chat ids are rejected
    /// later, at the registry boundary.
    pub fn from_payload(payload: &Value) -> Self {
        let from_me = payload["fromMe"].as_bool().unwrap_or(false);
        let sender = if from_me {
            "me".to_string()
        } else {
            payload["from"].as_str().unwrap_or("").to_string()
        };

        Self {
            chat_id: payload["to"].as_str().unwrap_or("").to_string(),
            sender,
            body: payload["body"].as_str().unwrap_or("").trim().to_string(),
            from_me,
            has_media: payload["hasMedia"].as_bool().unwrap_or(false),
        }
    }

    /// Textual content, if any. Media-only messages carry none and
    /// never reach the memory core.
    pub fn text(&self) -> Option<&str> {
        if self.body.is_empty() {
            None
        } else {
            Some(&self.body)
        }
    }

    pub fn route(&self, chat_prefix: &str, image_prefix: &str) -> Route {
        if self.body.starts_with(chat_prefix) {
            Route::Chat
        } else if self.body.starts_with(image_prefix) {
            Route::Image
        } else {
            Route::Ignored
        }
    }

    /// Body with the command prefix stripped and re-trimmed
    pub fn command_text(&self, prefix: &str) -> &str {
        self.body.strip_prefix(prefix).unwrap_or(&self.body).trim()
    }
}

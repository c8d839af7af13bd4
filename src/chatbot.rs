use crate::config::ChatConfig;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::Duration;

/// A single transcript entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn user(text: String) -> Self {
        Self {
            text,
            is_bot: false,
            timestamp: Utc::now(),
        }
    }

    fn bot(text: String) -> Self {
        Self {
            text,
            is_bot: true,
            timestamp: Utc::now(),
        }
    }
}

/// Scripted FAQ responder: a fixed-priority keyword table over an
/// append-only transcript. Not an NLP system.
pub struct Chatbot {
    config: ChatConfig,
    transcript: Mutex<Vec<ChatMessage>>,
}

impl Chatbot {
    /// Create a chatbot with the transcript seeded by the configured
    /// greeting
    pub fn new(config: ChatConfig) -> Self {
        let greeting = ChatMessage::bot(config.greeting.clone());
        Self {
            config,
            transcript: Mutex::new(vec![greeting]),
        }
    }

    /// Append a user message and, after the configured display delay, the
    /// matched canned reply. Blank input is ignored. Returns the reply.
    pub async fn send(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.transcript
            .lock()
            .push(ChatMessage::user(trimmed.to_string()));

        tokio::time::sleep(Duration::from_millis(self.config.response_delay_ms)).await;

        let reply = Self::respond(trimmed);
        self.transcript.lock().push(ChatMessage::bot(reply.clone()));
        Some(reply)
    }

    /// Resolve a user message to a canned reply. Case-insensitive
    /// substring match, first matching branch wins; the order below is an
    /// observable contract.
    pub fn respond(message: &str) -> String {
        let lower = message.to_lowercase();

        if lower.contains("hi") || lower.contains("hello") {
            "Hello! How can I help you with deepfake detection today?".to_string()
        } else if lower.contains("how") && (lower.contains("work") || lower.contains("detect")) {
            "Our system analyzes facial movements, lighting patterns, and compression \
             artifacts to identify signs of manipulation. Would you like to know more about \
             a specific aspect?"
                .to_string()
        } else if lower.contains("accurate") || lower.contains("reliability") {
            "Our detection achieves 95-98% accuracy on benchmark tests. Real-world \
             performance depends on video quality and the sophistication of the deepfake."
                .to_string()
        } else if lower.contains("format") || lower.contains("support") {
            "We support MP4, AVI, MOV videos and JPG, PNG, WEBP images. Maximum file size \
             is 100MB for videos and 20MB for images."
                .to_string()
        } else if lower.contains("privacy") || lower.contains("data") {
            "All processing is confidential. Uploaded files are immediately deleted after \
             analysis and never stored or shared."
                .to_string()
        } else if lower.contains("thank") {
            "You're welcome! Feel free to ask if you have any other questions.".to_string()
        } else {
            "I'm not sure I understand. Could you rephrase your question? You can ask about \
             how detection works, supported formats, or our accuracy rates."
                .to_string()
        }
    }

    /// Snapshot of the transcript, oldest first
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.lock().clone()
    }
}

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::to_chat_html;
use std::sync::Arc;

pub const SEO_SYSTEM_PROMPT: &str = "You are an SEO expert providing guidance on keyword optimization, internal linking, and on-page SEO. Format responses properly with bullet points, numbers, and spacing for readability.";

pub const GREETING_REPLY: &str = "Hello! How can I help you today?";
const THANKS_REPLY: &str = "You're welcome! Let me know if there's anything else you'd like to optimize.";
const FAREWELL_REPLY: &str = "Goodbye! Good luck climbing into the top 10.";

/// Fixed answers for small talk, so greetings never cost an API call
pub fn canned_reply(message: &str) -> Option<&'static str> {
    let normalized = message
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_lowercase();

    match normalized.as_str() {
        "hi" | "hello" | "hey" | "hi there" | "hello there" | "hey there" | "good morning"
        | "good afternoon" | "good evening" => Some(GREETING_REPLY),
        "thanks" | "thank you" | "thx" | "thanks a lot" | "thank you so much" => {
            Some(THANKS_REPLY)
        }
        "bye" | "goodbye" | "see you" => Some(FAREWELL_REPLY),
        _ => None,
    }
}

pub struct SeoChatUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
}

impl SeoChatUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self { llm_client, config }
    }

    pub async fn execute(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(AppError::InputMissing("Message is required".to_string()));
        }

        if let Some(reply) = canned_reply(message) {
            tracing::debug!("Answered chat message with canned reply");
            return Ok(reply.to_string());
        }

        let raw_result = self
            .llm_client
            .generate(&self.config, SEO_SYSTEM_PROMPT, message)
            .await?;

        Ok(to_chat_html(&raw_result))
    }
}

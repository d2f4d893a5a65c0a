//! LLM-based translation via the OpenAI chat API.

use super::Translator;
use crate::error::{Result, TeksteError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::debug;

/// Translator backed by an OpenAI chat model.
pub struct OpenAiTranslator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAiTranslator {
    /// Create a new OpenAI translator using the given chat model.
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        debug!("Translating {} chars to {} via {}", text.len(), target_lang, self.model);

        let system = format!(
            "You are a subtitle translator. Translate the user's text into the \
             language with code '{}', detecting the source language yourself. \
             Reply with the translation only, no quotes or commentary.",
            target_lang
        );

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| TeksteError::Translation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(text)
                .build()
                .map_err(|e| TeksteError::Translation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.2)
            .build()
            .map_err(|e| TeksteError::Translation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TeksteError::OpenAI(format!("Translation request failed: {}", e)))?;

        let translated = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| TeksteError::Translation("Empty response from LLM".to_string()))?
            .trim()
            .to_string();

        Ok(translated)
    }
}

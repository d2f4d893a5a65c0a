//! Google Translate implementation using the public gtx endpoint.

use super::Translator;
use crate::error::{Result, TeksteError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Translator backed by the unauthenticated Google Translate web endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
}

impl GoogleTranslator {
    /// Create a new Google translator with the default request timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        debug!("Translating {} chars to {}", text.len(), target_lang);

        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TeksteError::Translation(format!(
                "Translate endpoint returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        parse_response(&body)
    }
}

/// Extract the translated text from the gtx response.
///
/// The payload is a nested array; element [0] holds sentence pairs of the
/// form `[translated, original, ...]`.
fn parse_response(body: &serde_json::Value) -> Result<String> {
    let sentences = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TeksteError::Translation("Unexpected response shape".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|pair| pair.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(TeksteError::Translation("Empty translation result".to_string()));
    }

    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_response() {
        let body = json!([[["Olá mundo.", "Hello world.", null]], null, "en"]);
        assert_eq!(parse_response(&body).unwrap(), "Olá mundo.");
    }

    #[test]
    fn test_parse_response_joins_sentences() {
        let body = json!([
            [
                ["Primeira frase. ", "First sentence. ", null],
                ["Segunda frase.", "Second sentence.", null]
            ],
            null,
            "en"
        ]);
        assert_eq!(parse_response(&body).unwrap(), "Primeira frase. Segunda frase.");
    }

    #[test]
    fn test_parse_response_rejects_unexpected_shape() {
        assert!(parse_response(&json!({"error": "nope"})).is_err());
        assert!(parse_response(&json!([[]])).is_err());
    }
}

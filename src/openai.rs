//! OpenAI client configuration.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
///
/// Audio uploads for transcription can be large; the default reqwest
/// timeout would cut them off.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with the configured timeout.
///
/// Reads `OPENAI_API_KEY` from the environment.
pub fn create_client() -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}

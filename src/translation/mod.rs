//! Translation module for Tekste.
//!
//! Provides a trait-based interface for translation providers. The source
//! language is always auto-detected; callers only name the target.

mod google;
mod openai;

pub use google::GoogleTranslator;
pub use openai::OpenAiTranslator;

use crate::config::{Settings, TranslationProvider};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for translation services.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text to the target language (source auto-detected).
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String>;
}

/// Create the translator configured in settings.
pub fn create_translator(settings: &Settings) -> Arc<dyn Translator> {
    match settings.translation.provider {
        TranslationProvider::Google => Arc::new(GoogleTranslator::new()),
        TranslationProvider::OpenAI => {
            Arc::new(OpenAiTranslator::new(&settings.translation.model))
        }
    }
}

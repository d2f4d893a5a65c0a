//! Block-by-block translation of assembled SRT text.

use crate::translation::Translator;
use regex::Regex;
use tracing::{debug, warn};

/// Result of translating an SRT document.
///
/// Fallbacks are counted rather than silently swallowed so callers (and
/// tests) can observe how many captions kept their original text.
#[derive(Debug)]
pub struct TranslationOutcome {
    /// The rejoined SRT text, same block ordering as the input.
    pub srt: String,
    /// Blocks whose text was replaced with a translation.
    pub translated: usize,
    /// Well-formed blocks that kept their original text after a
    /// translation failure.
    pub fallback: usize,
    /// Malformed blocks (fewer than 3 lines) passed through unmodified.
    pub passthrough: usize,
}

impl TranslationOutcome {
    fn empty() -> Self {
        Self {
            srt: String::new(),
            translated: 0,
            fallback: 0,
            passthrough: 0,
        }
    }
}

/// Translate SRT caption text block by block.
///
/// A well-formed block has at least 3 lines: index, time range, and one or
/// more text lines (joined with spaces before translation). Translation
/// failures are isolated per block; the original text is kept and
/// processing continues. Blank input returns immediately without invoking
/// the translator.
pub async fn translate_srt(
    srt_content: &str,
    target_lang: &str,
    translator: &dyn Translator,
) -> TranslationOutcome {
    let trimmed = srt_content.trim();
    if trimmed.is_empty() {
        return TranslationOutcome::empty();
    }

    // Blank-line boundaries, tolerating stray whitespace between blocks.
    let separator = Regex::new(r"\n\s*\n").expect("valid block separator pattern");

    let mut outcome = TranslationOutcome::empty();
    let mut blocks = Vec::new();

    for block in separator.split(trimmed) {
        if block.trim().is_empty() {
            continue;
        }

        let lines: Vec<&str> = block.split('\n').collect();
        if lines.len() < 3 {
            outcome.passthrough += 1;
            blocks.push(block.to_string());
            continue;
        }

        let index = lines[0];
        let timecode = lines[1];
        let original_text = lines[2..].join(" ");

        match translator.translate(&original_text, target_lang).await {
            Ok(translated_text) => {
                outcome.translated += 1;
                blocks.push(format!("{}\n{}\n{}", index, timecode, translated_text));
            }
            Err(e) => {
                warn!("Translation failed for block {}, keeping original: {}", index, e);
                outcome.fallback += 1;
                blocks.push(block.to_string());
            }
        }
    }

    debug!(
        "Translated {} blocks ({} fallback, {} passthrough)",
        outcome.translated, outcome.fallback, outcome.passthrough
    );

    outcome.srt = blocks.join("\n\n");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TeksteError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Uppercases input and counts invocations.
    struct UppercaseTranslator {
        calls: AtomicUsize,
    }

    impl UppercaseTranslator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Translator for UppercaseTranslator {
        async fn translate(&self, text: &str, _target_lang: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_uppercase())
        }
    }

    /// Always errors, simulating an unreachable translation service.
    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _text: &str, _target_lang: &str) -> Result<String> {
            Err(TeksteError::Translation("service unavailable".to_string()))
        }
    }

    const SAMPLE: &str = "1\n00:00:00,000 --> 00:00:02,500\nHello world.\n\n\
                          2\n00:00:02,500 --> 00:00:05,000\nSecond caption.";

    #[tokio::test]
    async fn test_translates_each_block() {
        let translator = UppercaseTranslator::new();
        let outcome = translate_srt(SAMPLE, "pt", &translator).await;

        assert_eq!(outcome.translated, 2);
        assert_eq!(outcome.fallback, 0);
        assert!(outcome.srt.contains("HELLO WORLD."));
        assert!(outcome.srt.contains("SECOND CAPTION."));
        // Timecodes and indices untouched
        assert!(outcome.srt.contains("1\n00:00:00,000 --> 00:00:02,500"));
    }

    #[tokio::test]
    async fn test_multiline_text_joined_before_translation() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nfirst line\nsecond line";
        let translator = UppercaseTranslator::new();
        let outcome = translate_srt(srt, "pt", &translator).await;

        assert_eq!(outcome.srt, "1\n00:00:00,000 --> 00:00:02,000\nFIRST LINE SECOND LINE");
    }

    #[tokio::test]
    async fn test_empty_input_skips_translator() {
        let translator = UppercaseTranslator::new();

        let outcome = translate_srt("", "pt", &translator).await;
        assert_eq!(outcome.srt, "");

        let outcome = translate_srt("   \n  \n ", "pt", &translator).await;
        assert_eq!(outcome.srt, "");

        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_block_passes_through() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000";
        let translator = UppercaseTranslator::new();
        let outcome = translate_srt(srt, "pt", &translator).await;

        assert_eq!(outcome.srt, srt);
        assert_eq!(outcome.passthrough, 1);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_translator_keeps_original_text() {
        let outcome = translate_srt(SAMPLE, "pt", &FailingTranslator).await;

        assert_eq!(outcome.srt, SAMPLE);
        assert_eq!(outcome.translated, 0);
        assert_eq!(outcome.fallback, 2);
    }

    #[tokio::test]
    async fn test_ordering_preserved() {
        let translator = UppercaseTranslator::new();
        let outcome = translate_srt(SAMPLE, "pt", &translator).await;

        let first = outcome.srt.find("HELLO").unwrap();
        let second = outcome.srt.find("SECOND").unwrap();
        assert!(first < second);
    }
}

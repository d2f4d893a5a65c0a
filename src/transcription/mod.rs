//! Transcription module for Tekste.
//!
//! Handles speech-to-text transcription of downloaded audio. The production
//! implementation uses the OpenAI Whisper API, splitting long audio into
//! chunks and re-offsetting segment timestamps.

mod models;
mod whisper;

pub use models::{Transcript, TranscriptSegment};
pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file and return ordered segments with timestamps.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}

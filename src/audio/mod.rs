//! Audio acquisition for Tekste.
//!
//! Provides a trait-based seam for turning a video URL into a local audio
//! file, plus ffmpeg helpers for splitting long audio before transcription.

mod downloader;

pub use downloader::{probe_duration, split_audio, YtDlpFetcher};

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for audio acquisition from a remote video source.
///
/// Implementations produce a single audio file inside `work_dir` or fail;
/// the pipeline treats any failure as terminal for the job.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Fetch the audio track for `url` into `work_dir`.
    async fn fetch(&self, url: &str, work_dir: &Path) -> Result<PathBuf>;
}

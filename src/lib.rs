//! Tekste - Subtitle Generation Service
//!
//! A background job pipeline that turns a video URL into a translated SRT
//! subtitle file.
//!
//! The name "Tekste" comes from the Norwegian verb for "to subtitle."
//!
//! # Overview
//!
//! Tekste allows you to:
//! - Submit a video URL and poll a job until subtitles are ready
//! - Transcribe audio with timed caption segments
//! - Translate captions to a target language, falling back to the original
//!   text per caption when translation fails
//! - Download the finished `.srt` file
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `audio` - Audio acquisition from remote video sources
//! - `transcription` - Speech-to-text transcription
//! - `translation` - Text translation providers
//! - `subtitle` - SRT assembly and caption translation
//! - `jobs` - Job status store (in-memory or SQLite-backed)
//! - `pipeline` - Per-job orchestration
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tekste::config::Settings;
//! use tekste::jobs::MemoryJobStore;
//! use tekste::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let jobs = Arc::new(MemoryJobStore::new());
//!     let pipeline = Pipeline::new(settings, jobs.clone())?;
//!
//!     // Process one video end-to-end; status updates land in the job store.
//!     pipeline
//!         .run_job("job-1", "https://youtube.com/watch?v=dQw4w9WgXcQ", "pt")
//!         .await;
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod jobs;
pub mod openai;
pub mod pipeline;
pub mod subtitle;
pub mod transcription;
pub mod translation;

pub use error::{Result, TeksteError};

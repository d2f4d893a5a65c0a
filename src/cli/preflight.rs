//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available before
//! starting a pipeline that would otherwise fail midway through a job.

use crate::error::{Result, TeksteError};
use std::process::Command;

/// Run pre-flight checks for the subtitle pipeline.
///
/// The pipeline needs yt-dlp for audio acquisition, ffmpeg/ffprobe for
/// audio processing, and an OpenAI API key for Whisper transcription.
pub fn check_pipeline() -> Result<()> {
    check_api_key()?;
    check_tool("yt-dlp")?;
    check_tool("ffmpeg")?;
    check_tool("ffprobe")?;
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(TeksteError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(TeksteError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(TeksteError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TeksteError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(TeksteError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

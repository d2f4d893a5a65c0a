//! Audio download and processing via yt-dlp and ffmpeg.

use super::AudioFetcher;
use crate::error::{Result, TeksteError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Base name for the extracted audio file inside a job workspace.
const AUDIO_STEM: &str = "audio";

/// Audio fetcher that shells out to yt-dlp.
pub struct YtDlpFetcher;

impl YtDlpFetcher {
    /// Create a new yt-dlp backed fetcher.
    pub fn new() -> Self {
        Self
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    #[instrument(skip(self, work_dir), fields(url = %url))]
    async fn fetch(&self, url: &str, work_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(work_dir)?;

        info!("Downloading audio from {}", url);

        let template = work_dir.join(format!("{}.%(ext)s", AUDIO_STEM));

        let result = Command::new("yt-dlp")
            .arg("--extract-audio")
            .arg("--audio-format").arg("mp3")
            .arg("--audio-quality").arg("0")
            .arg("--output").arg(template.to_str().unwrap_or_default())
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TeksteError::ToolNotFound("yt-dlp".into()));
            }
            Err(e) => {
                return Err(TeksteError::AudioDownload(format!(
                    "yt-dlp execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TeksteError::AudioDownload(format!("yt-dlp failed: {stderr}")));
        }

        let target_path = work_dir.join(format!("{}.mp3", AUDIO_STEM));
        let downloaded = find_audio_file(work_dir)?;

        // yt-dlp occasionally leaves the source container untouched
        if downloaded != target_path {
            normalize_to_mp3(&downloaded, &target_path).await?;
            let _ = std::fs::remove_file(&downloaded);
        }

        Ok(target_path)
    }
}

/// Locate the extracted audio file in the workspace.
fn find_audio_file(dir: &Path) -> Result<PathBuf> {
    for ext in &["mp3", "opus", "m4a", "webm", "ogg"] {
        let candidate = dir.join(format!("{}.{}", AUDIO_STEM, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(TeksteError::AudioDownload(
        "Audio file not found after download".into(),
    ))
}

/// Convert an audio file to MP3 using ffmpeg.
async fn normalize_to_mp3(source: &Path, dest: &Path) -> Result<()> {
    debug!("Converting {:?} to MP3", source);

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-vn")
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(TeksteError::AudioDownload(format!(
                "ffmpeg conversion failed: {err}"
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TeksteError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(TeksteError::AudioDownload(format!("ffmpeg error: {e}"))),
    }
}

/// Segment a long audio file into chunks for transcription.
///
/// Returns (chunk_path, offset_seconds) tuples. Audio shorter than
/// `chunk_seconds` is returned as a single untouched entry.
#[instrument(skip_all)]
pub async fn split_audio(
    source: &Path,
    output_dir: &Path,
    chunk_seconds: u32,
) -> Result<Vec<(PathBuf, f64)>> {
    std::fs::create_dir_all(output_dir)?;

    let total_duration = probe_duration(source).await?;
    debug!("Total audio duration: {:.1}s", total_duration);

    let chunk_len = chunk_seconds as f64;

    if total_duration <= chunk_len {
        return Ok(vec![(source.to_path_buf(), 0.0)]);
    }

    let base_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(AUDIO_STEM);

    let mut segments = Vec::new();
    let mut offset = 0.0;
    let mut idx = 0u32;

    while offset < total_duration {
        let segment_path = output_dir.join(format!("{}_{:04}.mp3", base_name, idx));
        let segment_len = chunk_len.min(total_duration - offset);

        extract_segment(source, &segment_path, offset, segment_len).await?;

        segments.push((segment_path, offset));
        offset += chunk_len;
        idx += 1;
    }

    info!("Split audio into {} segments", segments.len());
    Ok(segments)
}

/// Extract a time segment from an audio file.
async fn extract_segment(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    // Stream copy first; it's fast and lossless when the container allows it
    let copy_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("warning")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Ok(status) = copy_result {
        if status.success() && dest.exists() {
            return Ok(());
        }
    }

    warn!("Stream copy failed, re-encoding segment");

    let encode_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match encode_result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(TeksteError::AudioDownload(format!(
                "Segment extraction failed: {err}"
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TeksteError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(TeksteError::AudioDownload(format!("ffmpeg error: {e}"))),
    }
}

/// Query the duration of an audio file using ffprobe.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TeksteError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(TeksteError::AudioDownload(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(TeksteError::AudioDownload("ffprobe returned error".into()));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|_| TeksteError::AudioDownload("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| TeksteError::AudioDownload("Could not determine audio duration".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_audio_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_audio_file(dir.path()).is_err());
    }

    #[test]
    fn test_find_audio_file_prefers_mp3() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("audio.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("audio.opus"), b"x").unwrap();

        let found = find_audio_file(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("audio.mp3"));
    }
}

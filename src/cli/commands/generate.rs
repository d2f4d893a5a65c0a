//! Generate command - one-shot subtitle generation from the command line.
//!
//! Runs the same pipeline as the HTTP surface, inline, and copies the
//! finished subtitle file to a local path.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::error::TeksteError;
use crate::jobs::{JobStatus, JobStore, MemoryJobStore};
use crate::pipeline::Pipeline;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Run the generate command.
pub async fn run_generate(
    url: &str,
    target_lang: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> anyhow::Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|_| TeksteError::InvalidInput(format!("Invalid video URL: {}", url)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(
            TeksteError::InvalidInput(format!("Unsupported URL scheme: {}", parsed.scheme()))
                .into(),
        );
    }

    preflight::check_pipeline()?;

    let target_lang =
        target_lang.unwrap_or_else(|| settings.translation.default_target_lang.clone());

    let jobs = Arc::new(MemoryJobStore::new());
    let pipeline = Pipeline::new(settings, jobs.clone())?;

    let job_id = Uuid::new_v4().to_string();
    jobs.create(&job_id).await?;

    Output::info(&format!("Generating {} subtitles for {}", target_lang, url));

    let spinner = Output::spinner("Processing...");
    pipeline.run_job(&job_id, url, &target_lang).await;
    spinner.finish_and_clear();

    let record = jobs
        .get(&job_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Job record disappeared"))?;

    if record.status != JobStatus::Completed {
        Output::error(&record.message);
        anyhow::bail!("Subtitle generation failed");
    }

    let artifact = pipeline.settings().artifact_path(&job_id);
    let destination = match output {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(format!("subtitles_{}.srt", job_id)),
    };
    std::fs::copy(&artifact, &destination)?;

    Output::success(&format!("Subtitles written to {}", destination.display()));

    Ok(())
}

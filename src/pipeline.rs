//! Per-job pipeline orchestration.
//!
//! Drives one job end-to-end: acquire audio, transcribe, translate, persist
//! the subtitle file, and finalize the job record. Stage failures are caught
//! here and converted into a terminal `error` status; nothing propagates to
//! the hosting process.

use crate::audio::{AudioFetcher, YtDlpFetcher};
use crate::config::Settings;
use crate::error::{Result, TeksteError};
use crate::jobs::{JobStatus, JobStore};
use crate::subtitle::{build_srt, translate_srt};
use crate::transcription::{Transcriber, WhisperTranscriber};
use crate::translation::{create_translator, Translator};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// The per-job pipeline.
///
/// One instance serves all jobs; each `run_job` call owns its own scratch
/// workspace and job record, so concurrent jobs never share mutable state
/// beyond the job store.
pub struct Pipeline {
    settings: Settings,
    fetcher: Arc<dyn AudioFetcher>,
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    jobs: Arc<dyn JobStore>,
}

impl Pipeline {
    /// Create a pipeline with production components from settings.
    pub fn new(settings: Settings, jobs: Arc<dyn JobStore>) -> Result<Self> {
        let transcriber = Arc::new(WhisperTranscriber::with_config(
            &settings.transcription.model,
            settings.transcription.chunk_duration_seconds,
            settings.transcription.max_concurrent_chunks,
        ));
        let translator = create_translator(&settings);

        Self::with_components(settings, Arc::new(YtDlpFetcher::new()), transcriber, translator, jobs)
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        settings: Settings,
        fetcher: Arc<dyn AudioFetcher>,
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
        jobs: Arc<dyn JobStore>,
    ) -> Result<Self> {
        std::fs::create_dir_all(settings.temp_dir())?;
        std::fs::create_dir_all(settings.downloads_dir())?;

        Ok(Self {
            settings,
            fetcher,
            transcriber,
            translator,
            jobs,
        })
    }

    /// Get a reference to the job store.
    pub fn jobs(&self) -> Arc<dyn JobStore> {
        self.jobs.clone()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one job to completion.
    ///
    /// Never returns an error: every stage failure ends in a terminal
    /// `error` record for the job. The scratch workspace is removed on the
    /// way out regardless of outcome.
    #[instrument(skip(self, video_url, target_lang), fields(job_id = %job_id))]
    pub async fn run_job(&self, job_id: &str, video_url: &str, target_lang: &str) {
        // Workspace is keyed by job id so concurrent jobs never collide
        let work_dir = self.settings.temp_dir().join(job_id);

        let result = self
            .run_stages(job_id, video_url, target_lang, &work_dir)
            .await;

        if work_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&work_dir) {
                warn!("Failed to remove workspace {:?}: {}", work_dir, e);
            }
        }

        match result {
            Ok(captions) => {
                info!("Job finished with {} captions", captions);
            }
            Err(e) => {
                error!("Job failed: {}", e);
                self.set_status(job_id, JobStatus::Error, 0, &format!("Error: {}", e), None)
                    .await;
            }
        }
    }

    /// The sequential stage chain. Any error here marks the job failed.
    async fn run_stages(
        &self,
        job_id: &str,
        video_url: &str,
        target_lang: &str,
        work_dir: &Path,
    ) -> Result<usize> {
        std::fs::create_dir_all(work_dir)?;

        self.set_status(job_id, JobStatus::Processing, 10, "Downloading audio", None)
            .await;
        let audio_path = self.fetcher.fetch(video_url, work_dir).await?;

        self.set_status(job_id, JobStatus::Processing, 40, "Transcribing audio", None)
            .await;
        let transcript = self.transcriber.transcribe(&audio_path).await?;

        let srt = build_srt(&transcript.segments);
        if srt.is_empty() {
            return Err(TeksteError::Transcription(
                "Transcription produced no captions".to_string(),
            ));
        }

        self.set_status(job_id, JobStatus::Processing, 70, "Translating captions", None)
            .await;
        let outcome = translate_srt(&srt, target_lang, self.translator.as_ref()).await;
        if outcome.fallback > 0 {
            warn!(
                "{} of {} captions kept their original text",
                outcome.fallback,
                outcome.translated + outcome.fallback
            );
        }

        self.set_status(job_id, JobStatus::Processing, 90, "Saving subtitles", None)
            .await;
        let artifact_path = self.settings.artifact_path(job_id);
        if let Some(parent) = artifact_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Stage in the workspace, then publish to the stable path. The
        // completed flip below must only happen once the file is in place.
        let staged = work_dir.join("subtitles.srt");
        tokio::fs::write(&staged, &outcome.srt).await?;
        move_file(&staged, &artifact_path)?;

        self.set_status(
            job_id,
            JobStatus::Completed,
            100,
            "Processing complete",
            Some(format!("/download/{}", job_id)),
        )
        .await;

        Ok(outcome.translated + outcome.fallback + outcome.passthrough)
    }

    /// Best-effort status update. Losing a status write degrades visibility
    /// but must never abort the job itself.
    async fn set_status(
        &self,
        job_id: &str,
        status: JobStatus,
        progress: u8,
        message: &str,
        download_url: Option<String>,
    ) {
        if let Err(e) = self
            .jobs
            .update(job_id, status, progress, message, download_url)
            .await
        {
            warn!("Failed to update status for job {}: {}", job_id, e);
        }
    }
}

/// Move a file, falling back to copy+remove across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    let _ = std::fs::remove_file(from);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobRecord, MemoryJobStore};
    use crate::transcription::{Transcript, TranscriptSegment};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct StubFetcher;

    #[async_trait]
    impl AudioFetcher for StubFetcher {
        async fn fetch(&self, _url: &str, work_dir: &Path) -> Result<PathBuf> {
            let path = work_dir.join("audio.mp3");
            std::fs::write(&path, b"not really audio")?;
            Ok(path)
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl AudioFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str, _work_dir: &Path) -> Result<PathBuf> {
            Err(TeksteError::AudioDownload("source unreachable".to_string()))
        }
    }

    struct StubTranscriber {
        segments: Vec<TranscriptSegment>,
    }

    impl StubTranscriber {
        fn speaking() -> Self {
            Self {
                segments: vec![
                    TranscriptSegment::new(0.0, 2.0, "Hello there.".to_string()),
                    TranscriptSegment::new(2.0, 4.5, "General greeting.".to_string()),
                ],
            }
        }

        fn silent() -> Self {
            Self { segments: vec![] }
        }
    }

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript> {
            Ok(Transcript::new(self.segments.clone()))
        }
    }

    struct UppercaseTranslator;

    #[async_trait]
    impl Translator for UppercaseTranslator {
        async fn translate(&self, text: &str, _target_lang: &str) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    /// Store that records every update for sequence assertions.
    struct RecordingStore {
        inner: MemoryJobStore,
        updates: Mutex<Vec<(JobStatus, u8, bool)>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inner: MemoryJobStore::new(),
                updates: Mutex::new(Vec::new()),
            }
        }

        fn sequence(&self) -> Vec<(JobStatus, u8, bool)> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobStore for RecordingStore {
        async fn create(&self, job_id: &str) -> Result<()> {
            self.inner.create(job_id).await
        }

        async fn update(
            &self,
            job_id: &str,
            status: JobStatus,
            progress: u8,
            message: &str,
            download_url: Option<String>,
        ) -> Result<()> {
            self.updates
                .lock()
                .unwrap()
                .push((status, progress, download_url.is_some()));
            self.inner
                .update(job_id, status, progress, message, download_url)
                .await
        }

        async fn get(&self, job_id: &str) -> Result<Option<JobRecord>> {
            self.inner.get(job_id).await
        }
    }

    /// Store whose writes always fail; visibility degrades, jobs must not.
    struct BrokenStore;

    #[async_trait]
    impl JobStore for BrokenStore {
        async fn create(&self, _job_id: &str) -> Result<()> {
            Err(TeksteError::JobStore("write failed".to_string()))
        }

        async fn update(
            &self,
            _job_id: &str,
            _status: JobStatus,
            _progress: u8,
            _message: &str,
            _download_url: Option<String>,
        ) -> Result<()> {
            Err(TeksteError::JobStore("write failed".to_string()))
        }

        async fn get(&self, _job_id: &str) -> Result<Option<JobRecord>> {
            Ok(None)
        }
    }

    fn test_settings(root: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.general.data_dir = root.join("data").to_string_lossy().into_owned();
        settings.general.temp_dir = root.join("tmp").to_string_lossy().into_owned();
        settings
    }

    fn pipeline_with(
        root: &Path,
        fetcher: Arc<dyn AudioFetcher>,
        transcriber: Arc<dyn Transcriber>,
        jobs: Arc<dyn JobStore>,
    ) -> Pipeline {
        Pipeline::with_components(
            test_settings(root),
            fetcher,
            transcriber,
            Arc::new(UppercaseTranslator),
            jobs,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_successful_job() {
        let root = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordingStore::new());
        let pipeline = pipeline_with(
            root.path(),
            Arc::new(StubFetcher),
            Arc::new(StubTranscriber::speaking()),
            store.clone(),
        );

        store.create("job-1").await.unwrap();
        pipeline.run_job("job-1", "https://example.com/v", "pt").await;

        assert_eq!(
            store.sequence(),
            vec![
                (JobStatus::Processing, 10, false),
                (JobStatus::Processing, 40, false),
                (JobStatus::Processing, 70, false),
                (JobStatus::Processing, 90, false),
                (JobStatus::Completed, 100, true),
            ]
        );

        let record = store.get("job-1").await.unwrap().unwrap();
        assert_eq!(record.download_url.as_deref(), Some("/download/job-1"));

        let artifact = pipeline.settings().artifact_path("job-1");
        let srt = std::fs::read_to_string(&artifact).unwrap();
        assert!(srt.contains("1\n00:00:00,000 --> 00:00:02,000\nHELLO THERE."));

        // Workspace removed after success
        assert!(!pipeline.settings().temp_dir().join("job-1").exists());
    }

    #[tokio::test]
    async fn test_acquisition_failure_marks_job_error() {
        let root = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordingStore::new());
        let pipeline = pipeline_with(
            root.path(),
            Arc::new(FailingFetcher),
            Arc::new(StubTranscriber::speaking()),
            store.clone(),
        );

        store.create("job-2").await.unwrap();
        pipeline.run_job("job-2", "https://example.com/v", "pt").await;

        assert_eq!(
            store.sequence(),
            vec![
                (JobStatus::Processing, 10, false),
                (JobStatus::Error, 0, false),
            ]
        );

        let record = store.get("job-2").await.unwrap().unwrap();
        assert!(record.message.contains("source unreachable"));
        assert!(!pipeline.settings().artifact_path("job-2").exists());
        assert!(!pipeline.settings().temp_dir().join("job-2").exists());
    }

    #[tokio::test]
    async fn test_empty_transcription_marks_job_error() {
        let root = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordingStore::new());
        let pipeline = pipeline_with(
            root.path(),
            Arc::new(StubFetcher),
            Arc::new(StubTranscriber::silent()),
            store.clone(),
        );

        store.create("job-3").await.unwrap();
        pipeline.run_job("job-3", "https://example.com/v", "pt").await;

        let record = store.get("job-3").await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Error);
        assert_eq!(record.progress, 0);
        assert!(!pipeline.settings().artifact_path("job-3").exists());
    }

    #[tokio::test]
    async fn test_status_store_failure_does_not_abort_job() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(
            root.path(),
            Arc::new(StubFetcher),
            Arc::new(StubTranscriber::speaking()),
            Arc::new(BrokenStore),
        );

        pipeline.run_job("job-4", "https://example.com/v", "pt").await;

        // Status visibility is gone, the artifact is not
        assert!(pipeline.settings().artifact_path("job-4").exists());
    }

    #[tokio::test]
    async fn test_concurrent_jobs_are_isolated() {
        let root = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryJobStore::new());
        let pipeline = Arc::new(pipeline_with(
            root.path(),
            Arc::new(StubFetcher),
            Arc::new(StubTranscriber::speaking()),
            store.clone(),
        ));

        store.create("left").await.unwrap();
        store.create("right").await.unwrap();

        let a = {
            let p = pipeline.clone();
            tokio::spawn(async move { p.run_job("left", "https://example.com/a", "pt").await })
        };
        let b = {
            let p = pipeline.clone();
            tokio::spawn(async move { p.run_job("right", "https://example.com/b", "de").await })
        };
        a.await.unwrap();
        b.await.unwrap();

        let left = store.get("left").await.unwrap().unwrap();
        let right = store.get("right").await.unwrap().unwrap();
        assert_eq!(left.download_url.as_deref(), Some("/download/left"));
        assert_eq!(right.download_url.as_deref(), Some("/download/right"));
        assert!(pipeline.settings().artifact_path("left").exists());
        assert!(pipeline.settings().artifact_path("right").exists());
    }
}

//! Job status store for Tekste.
//!
//! Tracks each submitted job's progress through the pipeline. Clients poll
//! these records until a job reaches `completed` or `error`.

mod memory;
mod sqlite;

pub use memory::MemoryJobStore;
pub use sqlite::SqliteJobStore;

use crate::config::Settings;
use crate::error::{Result, TeksteError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle state of a job. Progression is one-directional:
/// pending -> processing -> completed | error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "error" => Ok(JobStatus::Error),
            _ => Err(format!("Unknown job status: {}", s)),
        }
    }
}

/// Current state of one job, as served to polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Opaque job identifier, assigned at submission.
    pub job_id: String,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Progress percentage; reset to 0 on error.
    pub progress: u8,
    /// Human-readable description of the current stage.
    pub message: String,
    /// Relative download URL, set only once the job completes.
    pub download_url: Option<String>,
    /// Time of the last update.
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create the initial record for a freshly submitted job.
    pub fn pending(job_id: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            status: JobStatus::Pending,
            progress: 0,
            message: "Waiting for processing to start".to_string(),
            download_url: None,
            updated_at: Utc::now(),
        }
    }
}

/// Trait for job status store implementations.
///
/// Stores must support independent per-key reads and writes; the pipeline
/// guarantees at most one writer per job id.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Initialize a record for a new job (status=pending, progress=0).
    async fn create(&self, job_id: &str) -> Result<()>;

    /// Overwrite a job's record with a new state.
    async fn update(
        &self,
        job_id: &str,
        status: JobStatus,
        progress: u8,
        message: &str,
        download_url: Option<String>,
    ) -> Result<()>;

    /// Fetch a job's current record, or None if unknown or expired.
    async fn get(&self, job_id: &str) -> Result<Option<JobRecord>>;
}

/// Create the job store configured in settings.
pub fn create_job_store(settings: &Settings) -> Result<Arc<dyn JobStore>> {
    match settings.jobs.provider.as_str() {
        "memory" => Ok(Arc::new(MemoryJobStore::new())),
        "sqlite" => Ok(Arc::new(SqliteJobStore::new(
            &settings.jobs_sqlite_path(),
            settings.jobs.ttl_seconds,
        )?)),
        other => Err(TeksteError::Config(format!(
            "Unknown job store provider: {} (use memory or sqlite)",
            other
        ))),
    }
}

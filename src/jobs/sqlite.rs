//! SQLite-backed job store with per-record expiry.
//!
//! Every write refreshes the record's expiry window, mirroring the behavior
//! of an expiring key-value store: jobs that stop updating are eventually
//! reclaimed, and expired records read as absent.

use super::{JobRecord, JobStatus, JobStore};
use crate::error::{Result, TeksteError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS jobs (
        job_id TEXT PRIMARY KEY,
        status TEXT NOT NULL,
        progress INTEGER NOT NULL,
        message TEXT NOT NULL,
        download_url TEXT,
        updated_at TEXT NOT NULL,
        expires_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_jobs_expires_at ON jobs(expires_at);
"#;

/// SQLite-backed job store.
pub struct SqliteJobStore {
    conn: Mutex<Connection>,
    ttl_seconds: u64,
}

impl SqliteJobStore {
    /// Open (or create) a job store at the given path.
    pub fn new(path: &Path, ttl_seconds: u64) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite job store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
            ttl_seconds,
        })
    }

    /// Create an in-memory job store (useful for testing).
    pub fn in_memory(ttl_seconds: u64) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            ttl_seconds,
        })
    }

    fn next_expiry(&self) -> i64 {
        Utc::now().timestamp() + self.ttl_seconds as i64
    }

    /// Write a full record, refreshing its expiry window.
    fn put(&self, record: &JobRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        // Reclaim long-idle jobs while we hold the connection anyway
        conn.execute(
            "DELETE FROM jobs WHERE expires_at <= ?1",
            params![Utc::now().timestamp()],
        )?;

        conn.execute(
            "INSERT OR REPLACE INTO jobs
                 (job_id, status, progress, message, download_url, updated_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.job_id,
                record.status.to_string(),
                record.progress,
                record.message,
                record.download_url,
                record.updated_at.to_rfc3339(),
                self.next_expiry(),
            ],
        )?;

        Ok(())
    }
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn create(&self, job_id: &str) -> Result<()> {
        self.put(&JobRecord::pending(job_id))
    }

    async fn update(
        &self,
        job_id: &str,
        status: JobStatus,
        progress: u8,
        message: &str,
        download_url: Option<String>,
    ) -> Result<()> {
        self.put(&JobRecord {
            job_id: job_id.to_string(),
            status,
            progress,
            message: message.to_string(),
            download_url,
            updated_at: Utc::now(),
        })
    }

    async fn get(&self, job_id: &str) -> Result<Option<JobRecord>> {
        let conn = self.conn.lock().unwrap();

        let row = conn
            .query_row(
                "SELECT status, progress, message, download_url, updated_at, expires_at
                 FROM jobs WHERE job_id = ?1",
                params![job_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u8>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((status, progress, message, download_url, updated_at, expires_at)) = row else {
            return Ok(None);
        };

        if expires_at <= Utc::now().timestamp() {
            conn.execute("DELETE FROM jobs WHERE job_id = ?1", params![job_id])?;
            return Ok(None);
        }

        let status: JobStatus = status
            .parse()
            .map_err(|e: String| TeksteError::JobStore(e))?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| TeksteError::JobStore(format!("Bad timestamp in store: {}", e)))?
            .with_timezone(&Utc);

        Ok(Some(JobRecord {
            job_id: job_id.to_string(),
            status,
            progress,
            message,
            download_url,
            updated_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_update_get() {
        let store = SqliteJobStore::in_memory(3600).unwrap();
        store.create("job-1").await.unwrap();
        store
            .update(
                "job-1",
                JobStatus::Completed,
                100,
                "Done",
                Some("/download/job-1".into()),
            )
            .await
            .unwrap();

        let record = store.get("job-1").await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.progress, 100);
        assert_eq!(record.download_url.as_deref(), Some("/download/job-1"));
    }

    #[tokio::test]
    async fn test_unknown_job_is_none() {
        let store = SqliteJobStore::in_memory(3600).unwrap();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_record_reads_as_absent() {
        // Zero TTL: records expire the moment they are written
        let store = SqliteJobStore::in_memory(0).unwrap();
        store.create("job-1").await.unwrap();

        assert!(store.get("job-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_backed_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.db");

        let store = SqliteJobStore::new(&path, 3600).unwrap();
        store.create("job-1").await.unwrap();

        let record = store.get("job-1").await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Pending);
    }
}

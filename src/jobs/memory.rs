//! In-memory job store implementation.
//!
//! Records live for the process lifetime; there is no expiry.

use super::{JobRecord, JobStatus, JobStore};
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory job store.
pub struct MemoryJobStore {
    records: RwLock<HashMap<String, JobRecord>>,
}

impl MemoryJobStore {
    /// Create a new in-memory job store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job_id: &str) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert(job_id.to_string(), JobRecord::pending(job_id));
        Ok(())
    }

    async fn update(
        &self,
        job_id: &str,
        status: JobStatus,
        progress: u8,
        message: &str,
        download_url: Option<String>,
    ) -> Result<()> {
        let record = JobRecord {
            job_id: job_id.to_string(),
            status,
            progress,
            message: message.to_string(),
            download_url,
            updated_at: Utc::now(),
        };

        let mut records = self.records.write().unwrap();
        records.insert(job_id.to_string(), record);
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<Option<JobRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(job_id).cloned())
    }
}

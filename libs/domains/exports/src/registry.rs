use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::job::{ExportFormat, JobExecution};

/// In-memory store of job executions and of the paths being written
#[derive(Debug)]
pub struct JobRegistry {
    jobs: RwLock<BTreeMap<i64, JobExecution>>,
    next_id: AtomicI64,
    busy_paths: Arc<Mutex<HashSet<PathBuf>>>,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            busy_paths: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub async fn create(&self, format: ExportFormat, file_path: &str) -> JobExecution {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let job = JobExecution::new(id, format, file_path);
        self.jobs.write().await.insert(id, job.clone());
        job
    }

    pub async fn save(&self, job: &JobExecution) {
        self.jobs.write().await.insert(job.id, job.clone());
    }

    pub async fn get(&self, id: i64) -> Option<JobExecution> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// All jobs, oldest first
    pub async fn list(&self) -> Vec<JobExecution> {
        self.jobs.read().await.values().cloned().collect()
    }

    /// Claims `path` until the returned lock is dropped.
    ///
    /// Fails with [`ExportError::PathBusy`] while another export holds the
    /// same canonical path.
    pub fn lock_path(&self, path: &Path) -> ExportResult<PathLock> {
        let canonical = canonical_path(path);
        let mut busy = self
            .busy_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !busy.insert(canonical.clone()) {
            return Err(ExportError::PathBusy(path.display().to_string()));
        }
        debug!(path = %canonical.display(), "Locked export path");

        Ok(PathLock {
            path: canonical,
            busy_paths: Arc::clone(&self.busy_paths),
        })
    }
}

/// Releases its path on drop
#[derive(Debug)]
pub struct PathLock {
    path: PathBuf,
    busy_paths: Arc<Mutex<HashSet<PathBuf>>>,
}

impl Drop for PathLock {
    fn drop(&mut self) {
        self.busy_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.path);
        debug!(path = %self.path.display(), "Released export path");
    }
}

/// The file may not exist yet, so only the parent directory is resolved.
fn canonical_path(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

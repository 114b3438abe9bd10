use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::StorageError;
use crate::id;
use crate::model::{FormData, Submission, SubmissionStatus};

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Default quota of the file store, in the range browsers give local storage
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Trait for persisting finalized enrollments
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Promotes a draft to a pending submission with a fresh id
    async fn append(&self, data: FormData) -> StorageResult<Submission>;
    /// All submissions, newest first
    async fn list(&self) -> StorageResult<Vec<Submission>>;
    async fn get(&self, id: &str) -> StorageResult<Option<Submission>>;
    async fn delete(&self, id: &str) -> StorageResult<()>;
    async fn update_status(&self, id: &str, status: SubmissionStatus)
    -> StorageResult<Submission>;
}

fn check_transition(submission: &Submission, status: SubmissionStatus) -> StorageResult<()> {
    if submission.status.can_become(status) {
        Ok(())
    } else {
        Err(StorageError::InvalidTransition {
            id: submission.id.clone(),
            from: submission.status,
            to: status,
        })
    }
}

fn unique_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = id::submission_id();
        if !taken(&candidate) {
            return candidate;
        }
    }
}

/// In-memory implementation of SubmissionStore
pub struct InMemorySubmissionStore {
    submissions: Arc<DashMap<String, (u64, Submission)>>,
    sequence: AtomicU64,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(DashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }
}

impl Default for InMemorySubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn append(&self, data: FormData) -> StorageResult<Submission> {
        let id = unique_id(|candidate| self.submissions.contains_key(candidate));
        let submission = Submission::new(id.clone(), data);
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.submissions.insert(id, (seq, submission.clone()));
        Ok(submission)
    }

    async fn list(&self) -> StorageResult<Vec<Submission>> {
        let mut entries: Vec<(u64, Submission)> = self
            .submissions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries.into_iter().map(|(_, submission)| submission).collect())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Submission>> {
        Ok(self.submissions.get(id).map(|entry| entry.1.clone()))
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.submissions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn update_status(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> StorageResult<Submission> {
        let mut entry = self
            .submissions
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        check_transition(&entry.1, status)?;
        entry.1.status = status;
        Ok(entry.1.clone())
    }
}

/// JSON-file implementation of SubmissionStore.
///
/// The whole collection lives in one JSON array, newest first, rewritten on
/// every change. Writes larger than the quota are refused.
pub struct JsonFileSubmissionStore {
    path: PathBuf,
    quota_bytes: usize,
    lock: Mutex<()>,
}

impl JsonFileSubmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_quota(path, DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(path: impl Into<PathBuf>, quota_bytes: usize) -> Self {
        Self {
            path: path.into(),
            quota_bytes,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file reads as an empty collection
    async fn read_all(&self) -> Vec<Submission> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read submissions");
                return Vec::new();
            }
        };
        serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "failed to parse submissions");
            Vec::new()
        })
    }

    async fn write_all(&self, submissions: &[Submission]) -> StorageResult<()> {
        let raw = serde_json::to_vec(submissions)?;
        if raw.len() > self.quota_bytes {
            warn!(
                needed = raw.len(),
                limit = self.quota_bytes,
                "submission store quota exceeded"
            );
            return Err(StorageError::QuotaExceeded {
                needed: raw.len(),
                limit: self.quota_bytes,
            });
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for JsonFileSubmissionStore {
    async fn append(&self, data: FormData) -> StorageResult<Submission> {
        let _guard = self.lock.lock().await;
        let mut submissions = self.read_all().await;
        let id = unique_id(|candidate| submissions.iter().any(|s| s.id == candidate));
        let submission = Submission::new(id, data);
        submissions.insert(0, submission.clone());
        self.write_all(&submissions).await?;
        info!(id = %submission.id, total = submissions.len(), "submission stored");
        Ok(submission)
    }

    async fn list(&self) -> StorageResult<Vec<Submission>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await)
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Submission>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await.into_iter().find(|s| s.id == id))
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut submissions = self.read_all().await;
        let before = submissions.len();
        submissions.retain(|s| s.id != id);
        if submissions.len() == before {
            return Err(StorageError::NotFound(id.to_string()));
        }
        self.write_all(&submissions).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> StorageResult<Submission> {
        let _guard = self.lock.lock().await;
        let mut submissions = self.read_all().await;
        let submission = submissions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        check_transition(submission, status)?;
        submission.status = status;
        let updated = submission.clone();
        self.write_all(&submissions).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> FormData {
        let mut data = FormData::default();
        data.personal.full_name = name.to_string();
        data
    }

    #[tokio::test]
    async fn in_memory_store_orders_newest_first() {
        let store = InMemorySubmissionStore::new();
        let first = store.append(named("Ana Lima")).await.unwrap();
        let second = store.append(named("Bruno Reis")).await.unwrap();
        assert_ne!(first.id, second.id);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[0].status, SubmissionStatus::Pending);
    }

    #[tokio::test]
    async fn status_changes_once() {
        let store = InMemorySubmissionStore::new();
        let s = store.append(named("Ana Lima")).await.unwrap();

        let approved = store
            .update_status(&s.id, SubmissionStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, SubmissionStatus::Approved);

        let again = store.update_status(&s.id, SubmissionStatus::Rejected).await;
        assert!(matches!(again, Err(StorageError::InvalidTransition { .. })));
        assert!(matches!(
            store.update_status("MISSING00", SubmissionStatus::Approved).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db").join("submissions.json");

        let store = JsonFileSubmissionStore::new(&path);
        assert!(store.list().await.unwrap().is_empty());
        let first = store.append(named("Ana Lima")).await.unwrap();
        let second = store.append(named("Bruno Reis")).await.unwrap();

        let reopened = JsonFileSubmissionStore::new(&path);
        let all = reopened.list().await.unwrap();
        assert_eq!(
            all.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec![second.id.as_str(), first.id.as_str()]
        );

        reopened
            .update_status(&first.id, SubmissionStatus::Rejected)
            .await
            .unwrap();
        reopened.delete(&second.id).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, SubmissionStatus::Rejected);
        assert!(matches!(
            store.delete(&second.id).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn quota_overflow_is_reported_distinctly() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSubmissionStore::with_quota(dir.path().join("s.json"), 2048);

        let mut big = named("Ana Lima");
        big.personal.profile_picture = Some(format!("data:image/jpeg;base64,{}", "A".repeat(4096)));
        let err = store.append(big).await.unwrap_err();
        assert!(err.is_quota_exceeded());
        assert!(err.to_string().contains("smaller photos"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileSubmissionStore::new(&path);
        assert!(store.list().await.unwrap().is_empty());
        store.append(named("Ana Lima")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}

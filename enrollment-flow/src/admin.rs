use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::StorageError;
use crate::model::{Submission, SubmissionStatus};
use crate::print;
use crate::storage::{StorageResult, SubmissionStore};

/// Counters shown above the submission list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl SubmissionStats {
    pub fn tally(submissions: &[Submission]) -> Self {
        submissions.iter().fold(Self::default(), |mut stats, s| {
            stats.total += 1;
            match s.status {
                SubmissionStatus::Pending => stats.pending += 1,
                SubmissionStatus::Approved => stats.approved += 1,
                SubmissionStatus::Rejected => stats.rejected += 1,
            }
            stats
        })
    }
}

/// Whether a submission matches the admin search box: name and id ignore
/// case, CPF matches as typed
pub fn matches_search(submission: &Submission, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let lowered = term.to_lowercase();
    submission
        .data
        .personal
        .full_name
        .to_lowercase()
        .contains(&lowered)
        || submission.data.personal.cpf.contains(term)
        || submission.id.to_lowercase().contains(&lowered)
}

/// Back-office review of stored enrollments
pub struct AdminPanel {
    store: Arc<dyn SubmissionStore>,
}

impl AdminPanel {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    /// Newest first, optionally narrowed by a search term
    pub async fn list(&self, search: Option<&str>) -> StorageResult<Vec<Submission>> {
        let all = self.store.list().await?;
        Ok(match search {
            Some(term) => all.into_iter().filter(|s| matches_search(s, term)).collect(),
            None => all,
        })
    }

    pub async fn stats(&self) -> StorageResult<SubmissionStats> {
        Ok(SubmissionStats::tally(&self.store.list().await?))
    }

    pub async fn show(&self, id: &str) -> StorageResult<Submission> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    pub async fn approve(&self, id: &str) -> StorageResult<Submission> {
        self.decide(id, SubmissionStatus::Approved).await
    }

    pub async fn reject(&self, id: &str) -> StorageResult<Submission> {
        self.decide(id, SubmissionStatus::Rejected).await
    }

    async fn decide(&self, id: &str, status: SubmissionStatus) -> StorageResult<Submission> {
        let updated = self.store.update_status(id, status).await?;
        info!(id, status = %status, "submission reviewed");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.store.delete(id).await?;
        info!(id, "submission deleted");
        Ok(())
    }

    /// Paper form of one submission
    pub async fn print(&self, id: &str) -> StorageResult<String> {
        Ok(print::render(&self.show(id).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormData;
    use crate::storage::InMemorySubmissionStore;

    fn applicant(name: &str, cpf: &str) -> FormData {
        let mut data = FormData::default();
        data.personal.full_name = name.to_string();
        data.personal.cpf = cpf.to_string();
        data
    }

    async fn seeded() -> (AdminPanel, Vec<Submission>) {
        let store = Arc::new(InMemorySubmissionStore::new());
        let mut stored = Vec::new();
        for (name, cpf) in [
            ("Ana Lima", "111.222.333-44"),
            ("Bruno Reis", "555.666.777-88"),
            ("Carla Anaya", "999.000.111-22"),
        ] {
            stored.push(store.append(applicant(name, cpf)).await.unwrap());
        }
        (AdminPanel::new(store), stored)
    }

    #[tokio::test]
    async fn search_by_name_cpf_or_id() {
        let (panel, stored) = seeded().await;

        let names = |list: Vec<Submission>| {
            list.into_iter()
                .map(|s| s.data.personal.full_name)
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(panel.list(Some("LIMA")).await.unwrap()),
            vec!["Ana Lima"]
        );
        assert_eq!(
            names(panel.list(Some("666.777")).await.unwrap()),
            vec!["Bruno Reis"]
        );
        let by_id = panel
            .list(Some(&stored[0].id.to_lowercase()))
            .await
            .unwrap();
        assert!(by_id.iter().any(|s| s.id == stored[0].id));
        assert_eq!(panel.list(Some("  ")).await.unwrap().len(), 3);
        assert!(panel.list(Some("zzz-nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn review_updates_counters() {
        let (panel, stored) = seeded().await;
        panel.approve(&stored[0].id).await.unwrap();
        panel.reject(&stored[1].id).await.unwrap();

        assert_eq!(
            panel.stats().await.unwrap(),
            SubmissionStats {
                total: 3,
                pending: 1,
                approved: 1,
                rejected: 1,
            }
        );

        let err = panel.reject(&stored[0].id).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn delete_and_show_missing() {
        let (panel, stored) = seeded().await;
        panel.delete(&stored[2].id).await.unwrap();
        assert!(matches!(
            panel.show(&stored[2].id).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            panel.delete(&stored[2].id).await,
            Err(StorageError::NotFound(_))
        ));
        assert_eq!(panel.stats().await.unwrap().total, 2);

        let sheet = panel.print(&stored[0].id).await.unwrap();
        assert!(sheet.contains(&stored[0].id));
    }
}

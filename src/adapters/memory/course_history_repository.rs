//! In-memory CourseHistoryRepository for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{CourseHistoryEntryId, CourseId, DomainError, UserId};
use crate::domain::user::CourseHistoryEntry;
use crate::ports::CourseHistoryRepository;

/// In-memory course history store with (user, course) uniqueness.
#[derive(Default)]
pub struct InMemoryCourseHistoryRepository {
    entries: RwLock<HashMap<CourseHistoryEntryId, CourseHistoryEntry>>,
    round_trips: AtomicUsize,
}

impl InMemoryCourseHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// All entries owned by the user.
    pub async fn entries_for(&self, user_id: UserId) -> Vec<CourseHistoryEntry> {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.user_id() == user_id)
            .cloned()
            .collect()
    }

    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    fn begin(&self) {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CourseHistoryRepository for InMemoryCourseHistoryRepository {
    async fn find_by_user_and_course(
        &self,
        user_id: UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseHistoryEntry>, DomainError> {
        self.begin();
        Ok(self
            .entries
            .read()
            .await
            .values()
            .find(|e| e.user_id() == user_id && e.course_id() == course_id)
            .cloned())
    }

    async fn find_by_ids(
        &self,
        ids: &[CourseHistoryEntryId],
    ) -> Result<Vec<CourseHistoryEntry>, DomainError> {
        self.begin();
        let entries = self.entries.read().await;
        Ok(ids.iter().filter_map(|id| entries.get(id)).cloned().collect())
    }

    async fn find_course_ids(
        &self,
        ids: &[CourseHistoryEntryId],
    ) -> Result<Vec<CourseId>, DomainError> {
        self.begin();
        let entries = self.entries.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| entries.get(id))
            .map(|e| e.course_id().clone())
            .collect())
    }

    async fn save(&self, entry: &CourseHistoryEntry) -> Result<CourseHistoryEntryId, DomainError> {
        self.begin();
        let mut entries = self.entries.write().await;
        let existing_id = entries
            .values()
            .find(|e| e.user_id() == entry.user_id() && e.course_id() == entry.course_id())
            .map(|e| e.id());

        let stored_id = existing_id.unwrap_or_else(|| entry.id());
        let stored = CourseHistoryEntry::reconstitute(
            stored_id,
            entry.user_id(),
            entry.course_id().clone(),
            entry.term_id(),
            entry.program_year_id().cloned(),
        );
        entries.insert(stored_id, stored);
        Ok(stored_id)
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, DomainError> {
        self.begin();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.user_id() != user_id);
        Ok((before - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::term::TermId;

    fn course(id: &str) -> CourseId {
        CourseId::new(id).unwrap()
    }

    #[tokio::test]
    async fn save_keeps_one_entry_per_user_and_course() {
        let repo = InMemoryCourseHistoryRepository::new();
        let user = UserId::new();
        let first = CourseHistoryEntry::new(user, course("cs135"), "2012_09".parse().unwrap(), None);
        let racing = CourseHistoryEntry::new(user, course("cs135"), "2013_01".parse().unwrap(), None);

        let first_id = repo.save(&first).await.unwrap();
        let racing_id = repo.save(&racing).await.unwrap();

        assert_eq!(first_id, racing_id);
        let stored = repo.entries_for(user).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].term_id(), "2013_01".parse::<TermId>().unwrap());
    }

    #[tokio::test]
    async fn course_id_projection_skips_missing() {
        let repo = InMemoryCourseHistoryRepository::new();
        let user = UserId::new();
        let entry = CourseHistoryEntry::new(user, course("math135"), TermId::Shortlist, None);
        let id = repo.save(&entry).await.unwrap();

        let ids = repo
            .find_course_ids(&[id, CourseHistoryEntryId::new()])
            .await
            .unwrap();
        assert_eq!(ids, vec![course("math135")]);
    }

    #[tokio::test]
    async fn delete_by_user_only_touches_owner() {
        let repo = InMemoryCourseHistoryRepository::new();
        let owner = UserId::new();
        let other = UserId::new();
        repo.save(&CourseHistoryEntry::new(owner, course("a"), TermId::Shortlist, None))
            .await
            .unwrap();
        repo.save(&CourseHistoryEntry::new(other, course("a"), TermId::Shortlist, None))
            .await
            .unwrap();

        assert_eq!(repo.delete_by_user(owner).await.unwrap(), 1);
        assert!(repo.entries_for(owner).await.is_empty());
        assert_eq!(repo.entries_for(other).await.len(), 1);
    }
}

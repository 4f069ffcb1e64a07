//! CourseHistoryRepository port - persistence of course history entries.

use async_trait::async_trait;

use crate::domain::foundation::{CourseHistoryEntryId, CourseId, DomainError, UserId};
use crate::domain::user::CourseHistoryEntry;

/// Repository for course history entries.
#[async_trait]
pub trait CourseHistoryRepository: Send + Sync {
    /// Finds the entry for a (user, course) pair.
    async fn find_by_user_and_course(
        &self,
        user_id: UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseHistoryEntry>, DomainError>;

    /// Finds entries by id. Missing ids are skipped.
    async fn find_by_ids(
        &self,
        ids: &[CourseHistoryEntryId],
    ) -> Result<Vec<CourseHistoryEntry>, DomainError>;

    /// Course id projection of the given entries. Missing ids are skipped.
    async fn find_course_ids(
        &self,
        ids: &[CourseHistoryEntryId],
    ) -> Result<Vec<CourseId>, DomainError>;

    /// Creates or overwrites an entry.
    ///
    /// Returns the id under which the (user, course) entry is stored. This
    /// differs from `entry.id()` when a concurrent writer created the entry
    /// for the same pair first; the body written here still wins.
    async fn save(&self, entry: &CourseHistoryEntry) -> Result<CourseHistoryEntryId, DomainError>;

    /// Deletes every entry owned by the user. Returns the number deleted.
    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, DomainError>;
}

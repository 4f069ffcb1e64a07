//! In-memory UserRepository for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{CourseHistoryEntryId, DomainError, ErrorCode, Fbid, UserId};
use crate::domain::user::{User, UserCounters, UserProfile};
use crate::ports::{UserCourseHistory, UserRepository};

/// In-memory user store.
///
/// Every call counts as one round trip; `round_trips()` lets tests assert
/// that bulk operations stay bulk. `set_unavailable(true)` makes every call
/// fail with `DatabaseError`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
    round_trips: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns a copy of the stored user.
    pub async fn get(&self, id: UserId) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn begin(&self) -> Result<(), DomainError> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "User store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        self.begin()?;
        let mut users = self.users.write().await;
        if users.contains_key(&user.id()) || users.values().any(|u| u.fbid() == user.fbid()) {
            return Err(DomainError::new(
                ErrorCode::DuplicateUser,
                format!("User already exists: {}", user.fbid()),
            ));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update_profile(&self, id: UserId, profile: &UserProfile) -> Result<(), DomainError> {
        self.begin()?;
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(|| DomainError::user_not_found(id))?;
        user.update_profile(profile.clone());
        Ok(())
    }

    async fn record_invite(
        &self,
        id: UserId,
        first_invite_points: u32,
    ) -> Result<UserCounters, DomainError> {
        self.begin()?;
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(|| DomainError::user_not_found(id))?;
        user.record_invite(first_invite_points);
        Ok(user.counters())
    }

    async fn replace_facebook_friends(
        &self,
        id: UserId,
        fbids: &[Fbid],
    ) -> Result<Vec<UserId>, DomainError> {
        self.begin()?;
        let mut users = self.users.write().await;
        let resolved: Vec<UserId> = users
            .values()
            .filter(|u| u.id() != id && fbids.contains(u.fbid()))
            .map(|u| u.id())
            .collect();
        let user = users.get_mut(&id).ok_or_else(|| DomainError::user_not_found(id))?;
        user.replace_friend_fbids(fbids.to_vec());
        user.replace_friend_ids(resolved);
        Ok(user.friend_ids().to_vec())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.begin()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_ids_by_fbids(&self, fbids: &[Fbid]) -> Result<Vec<UserId>, DomainError> {
        self.begin()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| fbids.contains(u.fbid()))
            .map(|u| u.id())
            .collect())
    }

    async fn find_course_histories(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserCourseHistory>, DomainError> {
        self.begin()?;
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id))
            .map(|u| UserCourseHistory {
                user_id: u.id(),
                course_history: u.course_history().to_vec(),
            })
            .collect())
    }

    async fn add_friend_to_all(
        &self,
        user_ids: &[UserId],
        friend_id: UserId,
    ) -> Result<u64, DomainError> {
        self.begin()?;
        let mut users = self.users.write().await;
        let mut changed = 0;
        for id in user_ids {
            if let Some(user) = users.get_mut(id) {
                if user.link_friend(friend_id) {
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn remove_friend_from_all(
        &self,
        user_ids: &[UserId],
        friend_id: UserId,
    ) -> Result<u64, DomainError> {
        self.begin()?;
        let mut users = self.users.write().await;
        let mut changed = 0;
        for id in user_ids {
            if let Some(user) = users.get_mut(id) {
                if user.unlink_friend(friend_id) {
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn append_course_entry(
        &self,
        user_id: UserId,
        entry_id: CourseHistoryEntryId,
    ) -> Result<bool, DomainError> {
        self.begin()?;
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        Ok(user.record_course_entry(entry_id))
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        self.begin()?;
        self.users.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(fbid: &str) -> User {
        User::new(
            Fbid::new(fbid).unwrap(),
            UserProfile::new("Test", "User").unwrap(),
            vec![],
        )
    }

    #[tokio::test]
    async fn create_rejects_duplicate_fbid() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("1")).await.unwrap();

        let err = repo.create(&user("1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateUser);
    }

    #[tokio::test]
    async fn field_writes_require_existing_user() {
        let repo = InMemoryUserRepository::new();
        let ghost = UserId::new();
        let profile = UserProfile::new("A", "B").unwrap();

        let err = repo.update_profile(ghost, &profile).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
        let err = repo.record_invite(ghost, 100).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
        let err = repo.replace_facebook_friends(ghost, &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn field_writes_leave_links_and_history_alone() {
        let repo = InMemoryUserRepository::new();
        let a = user("a");
        repo.create(&a).await.unwrap();
        let friend = UserId::new();
        let entry = CourseHistoryEntryId::new();
        repo.add_friend_to_all(&[a.id()], friend).await.unwrap();
        repo.append_course_entry(a.id(), entry).await.unwrap();

        repo.update_profile(a.id(), &UserProfile::new("New", "Name").unwrap())
            .await
            .unwrap();
        let counters = repo.record_invite(a.id(), 100).await.unwrap();

        let stored = repo.get(a.id()).await.unwrap();
        assert_eq!(stored.name(), "New Name");
        assert_eq!(stored.friend_ids(), &[friend]);
        assert_eq!(stored.course_history(), &[entry]);
        assert_eq!(counters.num_invites, 1);
        assert_eq!(counters.num_points, 100);
    }

    #[tokio::test]
    async fn facebook_refresh_resolves_at_write_time_and_keeps_history() {
        let repo = InMemoryUserRepository::new();
        let me = user("me");
        let b = user("b");
        repo.create(&me).await.unwrap();
        repo.create(&b).await.unwrap();
        let entry = CourseHistoryEntryId::new();
        repo.append_course_entry(me.id(), entry).await.unwrap();

        let resolved = repo
            .replace_facebook_friends(
                me.id(),
                &[Fbid::new("b").unwrap(), Fbid::new("me").unwrap(), Fbid::new("ghost").unwrap()],
            )
            .await
            .unwrap();

        assert_eq!(resolved, vec![b.id()]);
        let stored = repo.get(me.id()).await.unwrap();
        assert_eq!(stored.friend_ids(), &[b.id()]);
        assert_eq!(stored.friend_fbids().len(), 3);
        assert_eq!(stored.course_history(), &[entry]);
    }

    #[tokio::test]
    async fn find_ids_by_fbids_skips_unknown() {
        let repo = InMemoryUserRepository::new();
        let a = user("a");
        repo.create(&a).await.unwrap();

        let ids = repo
            .find_ids_by_fbids(&[Fbid::new("a").unwrap(), Fbid::new("ghost").unwrap()])
            .await
            .unwrap();
        assert_eq!(ids, vec![a.id()]);
    }

    #[tokio::test]
    async fn friend_set_mutations_are_idempotent() {
        let repo = InMemoryUserRepository::new();
        let a = user("a");
        let friend = UserId::new();
        repo.create(&a).await.unwrap();

        assert_eq!(repo.add_friend_to_all(&[a.id()], friend).await.unwrap(), 1);
        assert_eq!(repo.add_friend_to_all(&[a.id()], friend).await.unwrap(), 0);
        assert_eq!(repo.get(a.id()).await.unwrap().friend_ids(), &[friend]);

        assert_eq!(repo.remove_friend_from_all(&[a.id()], friend).await.unwrap(), 1);
        assert_eq!(repo.remove_friend_from_all(&[a.id()], friend).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn append_course_entry_is_guarded() {
        let repo = InMemoryUserRepository::new();
        let a = user("a");
        repo.create(&a).await.unwrap();
        let entry = CourseHistoryEntryId::new();

        assert!(repo.append_course_entry(a.id(), entry).await.unwrap());
        assert!(!repo.append_course_entry(a.id(), entry).await.unwrap());
        assert_eq!(repo.get(a.id()).await.unwrap().course_history().len(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_fails_calls() {
        let repo = InMemoryUserRepository::new();
        repo.set_unavailable(true);
        let err = repo.find_by_id(UserId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}

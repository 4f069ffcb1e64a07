//! UserRepository port - persistence of user documents.
//!
//! There is no whole-document update. Every write after `create` touches
//! only the fields it names, so concurrent writers of different fields never
//! overwrite each other: profile edits, invite counters, the Facebook friend
//! refresh, friend set add/remove and course history append are all
//! single-document atomic statements. There are no multi-document
//! transactions; each call is atomic on its own documents only.

use async_trait::async_trait;

use crate::domain::foundation::{CourseHistoryEntryId, DomainError, Fbid, UserId};
use crate::domain::user::{User, UserCounters, UserProfile};

/// Projection of a user onto its id and course history references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCourseHistory {
    pub user_id: UserId,
    pub course_history: Vec<CourseHistoryEntryId>,
}

/// Repository for user documents.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user.
    ///
    /// # Errors
    ///
    /// - `DuplicateUser` if the id or fbid is already taken
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Overwrites the profile fields only.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    async fn update_profile(&self, id: UserId, profile: &UserProfile) -> Result<(), DomainError>;

    /// Increments `num_invites`, adding `first_invite_points` to
    /// `num_points` when this is the user's first invite. Returns the
    /// counters after the increment.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    async fn record_invite(
        &self,
        id: UserId,
        first_invite_points: u32,
    ) -> Result<UserCounters, DomainError>;

    /// Replaces `friend_fbids` with `fbids` and `friend_ids` with the users
    /// those fbids resolve to at write time, in one statement. Returns the
    /// resolved friend ids.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    async fn replace_facebook_friends(
        &self,
        id: UserId,
        fbids: &[Fbid],
    ) -> Result<Vec<UserId>, DomainError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Ids of the users whose fbid is in `fbids`. Unknown fbids are skipped.
    async fn find_ids_by_fbids(&self, fbids: &[Fbid]) -> Result<Vec<UserId>, DomainError>;

    /// Id + course history projection of the given users, in one lookup.
    /// Missing users are skipped.
    async fn find_course_histories(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserCourseHistory>, DomainError>;

    /// Adds `friend_id` to the `friend_ids` set of every user in `user_ids`.
    ///
    /// Returns the number of documents changed.
    async fn add_friend_to_all(
        &self,
        user_ids: &[UserId],
        friend_id: UserId,
    ) -> Result<u64, DomainError>;

    /// Removes `friend_id` from the `friend_ids` set of every user in
    /// `user_ids`.
    ///
    /// Returns the number of documents changed.
    async fn remove_friend_from_all(
        &self,
        user_ids: &[UserId],
        friend_id: UserId,
    ) -> Result<u64, DomainError>;

    /// Appends `entry_id` to the user's `course_history` unless present.
    ///
    /// Returns true if the entry was appended.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    async fn append_course_entry(
        &self,
        user_id: UserId,
        entry_id: CourseHistoryEntryId,
    ) -> Result<bool, DomainError>;

    /// Deletes the user document. Deleting a missing user is not an error.
    async fn delete(&self, id: UserId) -> Result<(), DomainError>;
}

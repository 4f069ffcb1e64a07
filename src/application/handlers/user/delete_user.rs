//! DeleteUserHandler - removes a user and everything they own.

use std::sync::Arc;

use tracing::info;

use crate::application::CourseIdMemo;
use crate::domain::foundation::{CommandMetadata, DomainError, UserId};
use crate::ports::{CourseHistoryRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct DeleteUserCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteUserResult {
    /// Friends whose link to the user was removed.
    pub unlinked_friends: u64,
    pub deleted_entries: u64,
}

/// Handler for user deletion.
///
/// Steps run in order without a transaction: unlink from friends, delete
/// course history, delete the user. Cached mutual-course sets that mention
/// the user are left to expire with the next rebuild.
pub struct DeleteUserHandler {
    users: Arc<dyn UserRepository>,
    history: Arc<dyn CourseHistoryRepository>,
    memo: Arc<CourseIdMemo>,
}

impl DeleteUserHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        history: Arc<dyn CourseHistoryRepository>,
        memo: Arc<CourseIdMemo>,
    ) -> Self {
        Self {
            users,
            history,
            memo,
        }
    }

    #[tracing::instrument(skip_all, fields(user_id = %cmd.user_id, correlation_id = %metadata.correlation_id()))]
    pub async fn handle(
        &self,
        cmd: DeleteUserCommand,
        metadata: CommandMetadata,
    ) -> Result<DeleteUserResult, DomainError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(cmd.user_id))?;

        let unlinked_friends = if user.friend_ids().is_empty() {
            0
        } else {
            self.users
                .remove_friend_from_all(user.friend_ids(), user.id())
                .await?
        };
        let deleted_entries = self.history.delete_by_user(user.id()).await?;
        self.users.delete(user.id()).await?;
        self.memo.forget(user.id()).await;

        info!(unlinked_friends, deleted_entries, "User deleted");
        Ok(DeleteUserResult {
            unlinked_friends,
            deleted_entries,
        })
    }
}

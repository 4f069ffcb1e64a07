//! ClearMutualCoursesHandler - drops a user's cached mutual-course sets.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, DomainError, UserId};
use crate::domain::user::UserPair;
use crate::ports::{MutualCourseCache, UserRepository};

#[derive(Debug, Clone)]
pub struct ClearMutualCoursesCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearMutualCoursesResult {
    pub pairs_cleared: usize,
}

/// Deletes the cached set of every (user, friend) pair in one round trip.
pub struct ClearMutualCoursesHandler {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn MutualCourseCache>,
}

impl ClearMutualCoursesHandler {
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<dyn MutualCourseCache>) -> Self {
        Self { users, cache }
    }

    #[tracing::instrument(skip_all, fields(user_id = %cmd.user_id, correlation_id = %metadata.correlation_id()))]
    pub async fn handle(
        &self,
        cmd: ClearMutualCoursesCommand,
        metadata: CommandMetadata,
    ) -> Result<ClearMutualCoursesResult, DomainError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(cmd.user_id))?;

        let pairs: Vec<UserPair> = user
            .friend_ids()
            .iter()
            .map(|friend_id| UserPair::new(user.id(), *friend_id))
            .collect();
        if !pairs.is_empty() {
            self.cache.delete_many(&pairs).await?;
        }

        info!(pairs_cleared = pairs.len(), "Mutual courses cleared");
        Ok(ClearMutualCoursesResult {
            pairs_cleared: pairs.len(),
        })
    }
}

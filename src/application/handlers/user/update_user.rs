//! UpdateUserHandler - profile edits.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{CommandMetadata, DomainError, UserId};
use crate::domain::user::{User, UserProfile};
use crate::ports::UserRepository;

/// Command to replace a user's profile fields.
#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub user_id: UserId,
    pub profile: UserProfile,
}

#[derive(Debug, Clone)]
pub struct UpdateUserResult {
    pub user: User,
}

/// Handler for profile edits. Friend links are left alone.
pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[tracing::instrument(skip_all, fields(user_id = %cmd.user_id, correlation_id = %metadata.correlation_id()))]
    pub async fn handle(
        &self,
        cmd: UpdateUserCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateUserResult, DomainError> {
        self.users.update_profile(cmd.user_id, &cmd.profile).await?;
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(cmd.user_id))?;

        debug!("Profile updated");
        Ok(UpdateUserResult { user })
    }
}

//! CreateUserHandler - registers a user and links them into the friend graph.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::foundation::{CommandMetadata, DomainError, Fbid};
use crate::domain::user::{User, UserProfile};
use crate::ports::UserRepository;

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub fbid: Fbid,
    pub profile: UserProfile,
    /// Raw Facebook friend list; may name people who are not users.
    pub friend_fbids: Vec<Fbid>,
}

/// Result of successful user creation.
#[derive(Debug, Clone)]
pub struct CreateUserResult {
    pub user: User,
    /// Existing users that now list the new user as a friend.
    pub linked_friends: u64,
}

/// Handler for user creation.
///
/// This is the only place friend links are made in both directions. Profile
/// updates go through `UpdateUserHandler`, which never links.
pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl CreateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[tracing::instrument(skip_all, fields(fbid = %cmd.fbid, correlation_id = %metadata.correlation_id()))]
    pub async fn handle(
        &self,
        cmd: CreateUserCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateUserResult, DomainError> {
        let mut user = User::new(cmd.fbid, cmd.profile, cmd.friend_fbids);

        // 1. Resolve Facebook friends that are already users
        let friend_ids = if user.friend_fbids().is_empty() {
            Vec::new()
        } else {
            self.users.find_ids_by_fbids(user.friend_fbids()).await?
        };
        debug!(
            requested = user.friend_fbids().len(),
            resolved = friend_ids.len(),
            "Resolved friend fbids"
        );
        user.replace_friend_ids(friend_ids);

        // 2. Persist
        self.users.create(&user).await?;

        // 3. Link back from each friend
        let linked_friends = if user.friend_ids().is_empty() {
            0
        } else {
            self.users
                .add_friend_to_all(user.friend_ids(), user.id())
                .await?
        };

        info!(user_id = %user.id(), linked_friends, "User created");

        Ok(CreateUserResult {
            user,
            linked_friends,
        })
    }
}

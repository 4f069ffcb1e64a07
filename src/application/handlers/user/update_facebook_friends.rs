//! UpdateFacebookFriendsHandler - replaces a user's Facebook friend list.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, DomainError, Fbid, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct UpdateFacebookFriendsCommand {
    pub user_id: UserId,
    pub friend_fbids: Vec<Fbid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFacebookFriendsResult {
    pub friend_fbids: Vec<Fbid>,
    pub friend_ids: Vec<UserId>,
}

/// Overwrites `friend_fbids` and re-resolves `friend_ids` from it.
///
/// Every friend link is Facebook-sourced, so the resolved list replaces the
/// old one outright. Resolution happens inside the write, so a friend who
/// links to this user concurrently is either resolved or re-added after.
/// Only this user's friend fields change; friends that dropped out keep
/// their link until their own list is refreshed.
pub struct UpdateFacebookFriendsHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateFacebookFriendsHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[tracing::instrument(skip_all, fields(user_id = %cmd.user_id, correlation_id = %metadata.correlation_id()))]
    pub async fn handle(
        &self,
        cmd: UpdateFacebookFriendsCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateFacebookFriendsResult, DomainError> {
        let mut friend_fbids: Vec<Fbid> = Vec::with_capacity(cmd.friend_fbids.len());
        for fbid in cmd.friend_fbids {
            if !friend_fbids.contains(&fbid) {
                friend_fbids.push(fbid);
            }
        }

        let friend_ids = self
            .users
            .replace_facebook_friends(cmd.user_id, &friend_fbids)
            .await?;

        info!(
            fbids = friend_fbids.len(),
            friends = friend_ids.len(),
            "Facebook friends replaced"
        );
        Ok(UpdateFacebookFriendsResult {
            friend_fbids,
            friend_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::user::{User, UserProfile};

    fn fbid(s: &str) -> Fbid {
        Fbid::new(s).unwrap()
    }

    async fn seed(repo: &InMemoryUserRepository, id: &str) -> User {
        let user = User::new(fbid(id), UserProfile::new("Seed", id).unwrap(), vec![]);
        repo.create(&user).await.unwrap();
        user
    }

    #[tokio::test]
    async fn replaces_links_with_resolved_friends() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let a = seed(&repo, "a").await;
        let b = seed(&repo, "b").await;
        let me = seed(&repo, "me").await;
        let handler = UpdateFacebookFriendsHandler::new(repo.clone());

        handler
            .handle(
                UpdateFacebookFriendsCommand {
                    user_id: me.id(),
                    friend_fbids: vec![fbid("a"), fbid("ghost")],
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap();
        let result = handler
            .handle(
                UpdateFacebookFriendsCommand {
                    user_id: me.id(),
                    friend_fbids: vec![fbid("b"), fbid("b")],
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.friend_ids, vec![b.id()]);
        assert_eq!(result.friend_fbids, vec![fbid("b")]);
        let stored = repo.get(me.id()).await.unwrap();
        assert!(!stored.friend_ids().contains(&a.id()));
    }

    #[tokio::test]
    async fn does_not_link_back() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let a = seed(&repo, "a").await;
        let me = seed(&repo, "me").await;

        UpdateFacebookFriendsHandler::new(repo.clone())
            .handle(
                UpdateFacebookFriendsCommand {
                    user_id: me.id(),
                    friend_fbids: vec![fbid("a")],
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap();

        assert!(repo.get(a.id()).await.unwrap().friend_ids().is_empty());
    }

    #[tokio::test]
    async fn is_a_single_write() {
        let repo = Arc::new(InMemoryUserRepository::new());
        seed(&repo, "a").await;
        let me = seed(&repo, "me").await;
        let before = repo.round_trips();

        UpdateFacebookFriendsHandler::new(repo.clone())
            .handle(
                UpdateFacebookFriendsCommand {
                    user_id: me.id(),
                    friend_fbids: vec![fbid("a")],
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap();

        assert_eq!(repo.round_trips() - before, 1);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let err = UpdateFacebookFriendsHandler::new(Arc::new(InMemoryUserRepository::new()))
            .handle(
                UpdateFacebookFriendsCommand {
                    user_id: UserId::new(),
                    friend_fbids: vec![fbid("a")],
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}

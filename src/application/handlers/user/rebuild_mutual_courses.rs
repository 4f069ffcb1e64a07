//! RebuildMutualCoursesHandler - writes a user's mutual-course sets to the cache.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::info;

use crate::application::CourseIdMemo;
use crate::domain::foundation::{CommandMetadata, CourseId, DomainError, UserId};
use crate::domain::user::{mutual_course_ids, UserPair};
use crate::ports::{CourseHistoryRepository, MutualCourseCache, UserRepository};

#[derive(Debug, Clone)]
pub struct RebuildMutualCoursesCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildMutualCoursesResult {
    /// Friend pairs with a non-empty intersection.
    pub pairs_written: usize,
}

/// Handler for rebuilding the mutual-course cache of one user.
///
/// Adds to the existing sets and never removes, so a course dropped since
/// the last rebuild stays cached until the pair is cleared.
pub struct RebuildMutualCoursesHandler {
    users: Arc<dyn UserRepository>,
    history: Arc<dyn CourseHistoryRepository>,
    cache: Arc<dyn MutualCourseCache>,
    memo: Arc<CourseIdMemo>,
}

impl RebuildMutualCoursesHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        history: Arc<dyn CourseHistoryRepository>,
        cache: Arc<dyn MutualCourseCache>,
        memo: Arc<CourseIdMemo>,
    ) -> Self {
        Self {
            users,
            history,
            cache,
            memo,
        }
    }

    #[tracing::instrument(skip_all, fields(user_id = %cmd.user_id, correlation_id = %metadata.correlation_id()))]
    pub async fn handle(
        &self,
        cmd: RebuildMutualCoursesCommand,
        metadata: CommandMetadata,
    ) -> Result<RebuildMutualCoursesResult, DomainError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(cmd.user_id))?;

        if user.friend_ids().is_empty() {
            return Ok(RebuildMutualCoursesResult { pairs_written: 0 });
        }

        let mine = self.memo.for_user(&user).await?;
        if mine.is_empty() {
            return Ok(RebuildMutualCoursesResult { pairs_written: 0 });
        }

        let theirs = self.friend_course_ids(user.friend_ids()).await?;
        let entries: Vec<(UserPair, HashSet<CourseId>)> = user
            .friend_ids()
            .iter()
            .filter_map(|friend_id| {
                let shared = mutual_course_ids(&mine, theirs.get(friend_id)?);
                (!shared.is_empty()).then(|| (UserPair::new(user.id(), *friend_id), shared))
            })
            .collect();

        if !entries.is_empty() {
            self.cache.add_many(&entries).await?;
        }

        info!(
            friends = user.friend_ids().len(),
            pairs_written = entries.len(),
            "Mutual courses rebuilt"
        );
        Ok(RebuildMutualCoursesResult {
            pairs_written: entries.len(),
        })
    }

    /// Course id sets of the given friends: one projection lookup for their
    /// history references and one lookup for the entries themselves.
    async fn friend_course_ids(
        &self,
        friend_ids: &[UserId],
    ) -> Result<HashMap<UserId, HashSet<CourseId>>, DomainError> {
        let projections = self.users.find_course_histories(friend_ids).await?;
        let entry_ids: Vec<_> = projections
            .iter()
            .flat_map(|p| p.course_history.iter().copied())
            .collect();
        if entry_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut by_user: HashMap<UserId, HashSet<CourseId>> = HashMap::new();
        for entry in self.history.find_by_ids(&entry_ids).await? {
            by_user
                .entry(entry.user_id())
                .or_default()
                .insert(entry.course_id().clone());
        }
        Ok(by_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryCourseHistoryRepository, InMemoryMutualCourseCache, InMemoryUserRepository,
    };
    use crate::domain::foundation::Fbid;
    use crate::domain::term::TermId;
    use crate::domain::user::{CourseHistoryEntry, User, UserProfile};

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        history: Arc<InMemoryCourseHistoryRepository>,
        cache: Arc<InMemoryMutualCourseCache>,
        handler: RebuildMutualCoursesHandler,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let history = Arc::new(InMemoryCourseHistoryRepository::new());
        let cache = Arc::new(InMemoryMutualCourseCache::new());
        let memo = Arc::new(CourseIdMemo::new(history.clone()));
        let handler =
            RebuildMutualCoursesHandler::new(users.clone(), history.clone(), cache.clone(), memo);
        Fixture {
            users,
            history,
            cache,
            handler,
        }
    }

    fn course(id: &str) -> CourseId {
        CourseId::new(id).unwrap()
    }

    async fn seed(f: &Fixture, fbid: &str, courses: &[&str], friends: &[UserId]) -> User {
        let mut user = User::new(
            Fbid::new(fbid).unwrap(),
            UserProfile::new("Test", fbid).unwrap(),
            vec![],
        );
        for friend in friends {
            user.link_friend(*friend);
        }
        f.users.create(&user).await.unwrap();
        for id in courses {
            let entry =
                CourseHistoryEntry::new(user.id(), course(id), TermId::concrete(2012, 9).unwrap(), None);
            f.history.save(&entry).await.unwrap();
            f.users.append_course_entry(user.id(), entry.id()).await.unwrap();
        }
        user
    }

    fn rebuild(user: &User) -> RebuildMutualCoursesCommand {
        RebuildMutualCoursesCommand { user_id: user.id() }
    }

    #[tokio::test]
    async fn writes_intersection_under_pair_key() {
        let f = fixture();
        let b = seed(&f, "b", &["y", "z", "w"], &[]).await;
        let a = seed(&f, "a", &["x", "y", "z"], &[b.id()]).await;

        let result = f.handler.handle(rebuild(&a), CommandMetadata::new()).await.unwrap();

        assert_eq!(result.pairs_written, 1);
        let stored = f.cache.get(UserPair::new(b.id(), a.id())).await.unwrap();
        assert_eq!(stored, [course("y"), course("z")].into_iter().collect());
        assert_eq!(f.cache.round_trips(), 1);
    }

    #[tokio::test]
    async fn empty_intersection_writes_nothing() {
        let f = fixture();
        let b = seed(&f, "b", &["q"], &[]).await;
        let c = seed(&f, "c", &[], &[]).await;
        let a = seed(&f, "a", &["x"], &[b.id(), c.id()]).await;

        let result = f.handler.handle(rebuild(&a), CommandMetadata::new()).await.unwrap();

        assert_eq!(result.pairs_written, 0);
        assert_eq!(f.cache.key_count().await, 0);
        assert_eq!(f.cache.round_trips(), 0);
    }

    #[tokio::test]
    async fn friend_lookups_are_bulk() {
        let f = fixture();
        let mut friends = Vec::new();
        for i in 0..5 {
            friends.push(seed(&f, &format!("f{i}"), &["x"], &[]).await.id());
        }
        let a = seed(&f, "a", &["x"], &friends).await;
        let users_before = f.users.round_trips();
        let history_before = f.history.round_trips();

        let result = f.handler.handle(rebuild(&a), CommandMetadata::new()).await.unwrap();

        assert_eq!(result.pairs_written, 5);
        // find_by_id + one projection lookup
        assert_eq!(f.users.round_trips() - users_before, 2);
        // own course ids + one entry lookup for all friends
        assert_eq!(f.history.round_trips() - history_before, 2);
        assert_eq!(f.cache.round_trips(), 1);
    }

    #[tokio::test]
    async fn rebuild_only_adds() {
        let f = fixture();
        let b = seed(&f, "b", &["y"], &[]).await;
        let a = seed(&f, "a", &["y"], &[b.id()]).await;
        let pair = UserPair::new(a.id(), b.id());
        f.cache
            .add_many(&[(pair, [course("old")].into_iter().collect())])
            .await
            .unwrap();

        f.handler.handle(rebuild(&a), CommandMetadata::new()).await.unwrap();

        let stored = f.cache.get(pair).await.unwrap();
        assert!(stored.contains(&course("old")));
        assert!(stored.contains(&course("y")));
    }
}

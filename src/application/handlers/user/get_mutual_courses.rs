//! GetMutualCoursesHandler - reads cached mutual courses for all friends.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::foundation::{CourseId, DomainError, UserId};
use crate::domain::user::UserPair;
use crate::ports::{MutualCourseCache, UserRepository};

/// Query for a user's mutual courses with each friend.
#[derive(Debug, Clone)]
pub struct GetMutualCoursesQuery {
    pub user_id: UserId,
}

/// Friend id to the courses shared with that friend. Every friend has an
/// entry; a pair that was never cached maps to an empty set.
pub type MutualCourses = HashMap<UserId, HashSet<CourseId>>;

pub struct GetMutualCoursesHandler {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn MutualCourseCache>,
}

impl GetMutualCoursesHandler {
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<dyn MutualCourseCache>) -> Self {
        Self { users, cache }
    }

    #[tracing::instrument(skip_all, fields(user_id = %query.user_id))]
    pub async fn handle(&self, query: GetMutualCoursesQuery) -> Result<MutualCourses, DomainError> {
        let user = self
            .users
            .find_by_id(query.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(query.user_id))?;

        if user.friend_ids().is_empty() {
            return Ok(MutualCourses::new());
        }

        let pairs: Vec<UserPair> = user
            .friend_ids()
            .iter()
            .map(|friend_id| UserPair::new(user.id(), *friend_id))
            .collect();
        let sets = self.cache.read_many(&pairs).await?;

        Ok(user.friend_ids().iter().copied().zip(sets).collect())
    }
}

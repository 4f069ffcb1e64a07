//! Per-user memo of course id sets.
//!
//! A user's course id set is a function of the entry ids in their
//! `course_history`: an entry's course never changes once written. The memo
//! therefore keys each set on the history snapshot it was computed from, and
//! a freshly loaded user whose history differs misses and recomputes. Writes
//! made by other processes are picked up on the next lookup without any
//! invalidation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::foundation::{CourseHistoryEntryId, CourseId, DomainError, UserId};
use crate::domain::user::User;
use crate::ports::CourseHistoryRepository;

struct Memoized {
    history: Vec<CourseHistoryEntryId>,
    course_ids: Arc<HashSet<CourseId>>,
}

pub struct CourseIdMemo {
    history: Arc<dyn CourseHistoryRepository>,
    sets: RwLock<HashMap<UserId, Memoized>>,
}

impl CourseIdMemo {
    pub fn new(history: Arc<dyn CourseHistoryRepository>) -> Self {
        Self {
            history,
            sets: RwLock::new(HashMap::new()),
        }
    }

    /// Course ids of an already loaded user.
    pub async fn for_user(&self, user: &User) -> Result<Arc<HashSet<CourseId>>, DomainError> {
        if let Some(hit) = self.sets.read().await.get(&user.id()) {
            if hit.history == user.course_history() {
                return Ok(Arc::clone(&hit.course_ids));
            }
        }

        let course_ids: Arc<HashSet<CourseId>> = if user.course_history().is_empty() {
            Arc::default()
        } else {
            Arc::new(
                self.history
                    .find_course_ids(user.course_history())
                    .await?
                    .into_iter()
                    .collect(),
            )
        };

        self.sets.write().await.insert(
            user.id(),
            Memoized {
                history: user.course_history().to_vec(),
                course_ids: Arc::clone(&course_ids),
            },
        );
        Ok(course_ids)
    }

    /// Drops the user's slot.
    pub async fn forget(&self, user_id: UserId) {
        self.sets.write().await.remove(&user_id);
    }
}

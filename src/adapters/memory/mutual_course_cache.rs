//! In-memory MutualCourseCache.
//!
//! Mirrors the Redis adapter's semantics: union on add, empty set for a
//! missing key, and one counted round trip per call regardless of batch
//! size.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode};
use crate::domain::user::UserPair;
use crate::ports::MutualCourseCache;

#[derive(Default)]
pub struct InMemoryMutualCourseCache {
    sets: RwLock<HashMap<UserPair, HashSet<CourseId>>>,
    points_total: RwLock<i64>,
    round_trips: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryMutualCourseCache {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Stored set for a pair, if any.
    pub async fn get(&self, pair: UserPair) -> Option<HashSet<CourseId>> {
        self.sets.read().await.get(&pair).cloned()
    }

    pub async fn key_count(&self) -> usize {
        self.sets.read().await.len()
    }

    pub async fn points_total(&self) -> i64 {
        *self.points_total.read().await
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
            return Err(DomainError::new(ErrorCode::CacheError, "Cache unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl MutualCourseCache for InMemoryMutualCourseCache {
    async fn add_many(&self, entries: &[(UserPair, HashSet<CourseId>)]) -> Result<(), DomainError> {
        if entries.is_empty() {
            return Ok(());
        }
        self.begin()?;
        let mut sets = self.sets.write().await;
        for (pair, course_ids) in entries.iter().filter(|(_, ids)| !ids.is_empty()) {
            sets.entry(*pair)
                .or_default()
                .extend(course_ids.iter().cloned());
        }
        Ok(())
    }

    async fn read_many(&self, pairs: &[UserPair]) -> Result<Vec<HashSet<CourseId>>, DomainError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        self.begin()?;
        let sets = self.sets.read().await;
        Ok(pairs
            .iter()
            .map(|pair| sets.get(pair).cloned().unwrap_or_default())
            .collect())
    }

    async fn delete_many(&self, pairs: &[UserPair]) -> Result<(), DomainError> {
        if pairs.is_empty() {
            return Ok(());
        }
        self.begin()?;
        let mut sets = self.sets.write().await;
        for pair in pairs {
            sets.remove(pair);
        }
        Ok(())
    }

    async fn increment_points_total(&self, by: u32) -> Result<i64, DomainError> {
        self.begin()?;
        let mut total = self.points_total.write().await;
        *total += i64::from(by);
        Ok(*total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn courses(ids: &[&str]) -> HashSet<CourseId> {
        ids.iter().map(|id| CourseId::new(*id).unwrap()).collect()
    }

    #[tokio::test]
    async fn add_unions_into_existing_set() {
        let cache = InMemoryMutualCourseCache::new();
        let pair = UserPair::new(UserId::new(), UserId::new());

        cache.add_many(&[(pair, courses(&["a"]))]).await.unwrap();
        cache.add_many(&[(pair, courses(&["b"]))]).await.unwrap();

        assert_eq!(cache.get(pair).await, Some(courses(&["a", "b"])));
    }

    #[tokio::test]
    async fn empty_sets_are_not_written() {
        let cache = InMemoryMutualCourseCache::new();
        let pair = UserPair::new(UserId::new(), UserId::new());

        cache.add_many(&[(pair, HashSet::new())]).await.unwrap();

        assert_eq!(cache.key_count().await, 0);
    }

    #[tokio::test]
    async fn batched_read_is_one_round_trip() {
        let cache = InMemoryMutualCourseCache::new();
        let pairs: Vec<_> = (0..5)
            .map(|_| UserPair::new(UserId::new(), UserId::new()))
            .collect();

        let sets = cache.read_many(&pairs).await.unwrap();

        assert_eq!(sets.len(), 5);
        assert!(sets.iter().all(HashSet::is_empty));
        assert_eq!(cache.round_trips(), 1);
    }

    #[tokio::test]
    async fn unavailable_cache_reports_cache_error() {
        let cache = InMemoryMutualCourseCache::new();
        cache.set_unavailable(true);

        let err = cache.increment_points_total(5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CacheError);
    }
}

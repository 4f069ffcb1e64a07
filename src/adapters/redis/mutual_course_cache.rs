//! Redis-backed mutual-course cache.
//!
//! Each user pair maps to a Redis set at `{prefix}:{first}:{second}`.
//! Batched operations are sent as one pipeline so N pairs cost a single
//! round trip.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::HashSet;
use tracing::debug;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode};
use crate::domain::user::{UserPair, DEFAULT_KEY_PREFIX};
use crate::ports::MutualCourseCache;

/// Default key of the site-wide point counter.
pub const DEFAULT_POINTS_KEY: &str = "total_points";

/// Redis implementation of [`MutualCourseCache`].
#[derive(Clone)]
pub struct RedisMutualCourseCache {
    conn: MultiplexedConnection,
    key_prefix: String,
    points_key: String,
}

impl RedisMutualCourseCache {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            points_key: DEFAULT_POINTS_KEY.to_string(),
        }
    }

    /// Set the prefix of pair keys.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the key of the point counter.
    pub fn with_points_key(mut self, key: impl Into<String>) -> Self {
        self.points_key = key.into();
        self
    }

    fn key(&self, pair: &UserPair) -> String {
        pair.cache_key(&self.key_prefix)
    }
}

fn cache_error(context: &str, e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("{}: {}", context, e))
}

#[async_trait]
impl MutualCourseCache for RedisMutualCourseCache {
    async fn add_many(&self, entries: &[(UserPair, HashSet<CourseId>)]) -> Result<(), DomainError> {
        let mut pipe = redis::pipe();
        let mut queued = 0usize;
        for (pair, course_ids) in entries.iter().filter(|(_, ids)| !ids.is_empty()) {
            let members: Vec<&str> = course_ids.iter().map(CourseId::as_str).collect();
            pipe.sadd(self.key(pair), members).ignore();
            queued += 1;
        }
        if queued == 0 {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        pipe.query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| cache_error("Failed to add mutual courses", e))?;

        debug!(pairs = queued, "Added mutual courses");
        Ok(())
    }

    async fn read_many(&self, pairs: &[UserPair]) -> Result<Vec<HashSet<CourseId>>, DomainError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for pair in pairs {
            pipe.smembers(self.key(pair));
        }

        let mut conn = self.conn.clone();
        let raw: Vec<HashSet<String>> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| cache_error("Failed to read mutual courses", e))?;

        Ok(raw
            .into_iter()
            .map(|members| {
                members
                    .into_iter()
                    .filter_map(|id| CourseId::new(id).ok())
                    .collect()
            })
            .collect())
    }

    async fn delete_many(&self, pairs: &[UserPair]) -> Result<(), DomainError> {
        if pairs.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        for pair in pairs {
            pipe.del(self.key(pair)).ignore();
        }

        let mut conn = self.conn.clone();
        pipe.query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| cache_error("Failed to delete mutual courses", e))?;

        Ok(())
    }

    async fn increment_points_total(&self, by: u32) -> Result<i64, DomainError> {
        let mut conn = self.conn.clone();
        conn.incr(&self.points_key, i64::from(by))
            .await
            .map_err(|e| cache_error("Failed to increment point total", e))
    }
}

impl std::fmt::Debug for RedisMutualCourseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisMutualCourseCache")
            .field("key_prefix", &self.key_prefix)
            .field("points_key", &self.points_key)
            .finish_non_exhaustive()
    }
}

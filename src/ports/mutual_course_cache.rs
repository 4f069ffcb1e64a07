//! MutualCourseCache port - key-value cache of mutual courses per user pair.
//!
//! The cache is derived data. It may be stale, it may be missing entries,
//! and it may be regenerated from course history at any time. Batched
//! methods must complete in a single round trip to the backing store.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::domain::foundation::{CourseId, DomainError};
use crate::domain::user::UserPair;

/// Port for the mutual-course cache.
#[async_trait]
pub trait MutualCourseCache: Send + Sync {
    /// Adds course ids to the set stored for each pair (set union), in one
    /// round trip. Pairs with an empty set are skipped.
    async fn add_many(&self, entries: &[(UserPair, HashSet<CourseId>)]) -> Result<(), DomainError>;

    /// Reads the set stored for each pair, in one round trip.
    ///
    /// The result has one set per requested pair, in request order. A
    /// missing key reads as an empty set.
    async fn read_many(&self, pairs: &[UserPair]) -> Result<Vec<HashSet<CourseId>>, DomainError>;

    /// Deletes the set stored for each pair, in one round trip.
    async fn delete_many(&self, pairs: &[UserPair]) -> Result<(), DomainError>;

    /// Increments the site-wide point total. Returns the new total.
    async fn increment_points_total(&self, by: u32) -> Result<i64, DomainError>;
}

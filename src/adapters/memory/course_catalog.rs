//! In-memory CourseCatalog.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::domain::foundation::{CourseId, DomainError};
use crate::ports::CourseCatalog;

#[derive(Default)]
pub struct InMemoryCourseCatalog {
    courses: RwLock<HashSet<CourseId>>,
}

impl InMemoryCourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog holding the given course ids.
    pub fn with_courses<I>(courses: I) -> Self
    where
        I: IntoIterator<Item = CourseId>,
    {
        Self {
            courses: RwLock::new(courses.into_iter().collect()),
        }
    }

    pub async fn insert(&self, course_id: CourseId) {
        self.courses.write().await.insert(course_id);
    }
}

#[async_trait]
impl CourseCatalog for InMemoryCourseCatalog {
    async fn exists(&self, course_id: &CourseId) -> Result<bool, DomainError> {
        Ok(self.courses.read().await.contains(course_id))
    }
}

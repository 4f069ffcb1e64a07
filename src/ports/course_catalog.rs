//! CourseCatalog port - the authoritative list of courses.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError};

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Returns true if the catalog knows the course.
    async fn exists(&self, course_id: &CourseId) -> Result<bool, DomainError>;
}

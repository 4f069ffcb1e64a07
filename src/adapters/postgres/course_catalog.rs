//! PostgreSQL implementation of CourseCatalog.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode};
use crate::ports::CourseCatalog;

/// Course catalog backed by the `courses` table.
#[derive(Clone)]
pub struct PostgresCourseCatalog {
    pool: PgPool,
}

impl PostgresCourseCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseCatalog for PostgresCourseCatalog {
    async fn exists(&self, course_id: &CourseId) -> Result<bool, DomainError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
                .bind(course_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to check course existence: {}", e),
                    )
                })?;

        Ok(exists)
    }
}

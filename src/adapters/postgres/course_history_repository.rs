//! PostgreSQL implementation of CourseHistoryRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{
    CourseHistoryEntryId, CourseId, DomainError, ErrorCode, ProgramYearId, UserId,
};
use crate::domain::term::TermId;
use crate::domain::user::CourseHistoryEntry;
use crate::ports::CourseHistoryRepository;

/// PostgreSQL implementation of CourseHistoryRepository.
///
/// `user_courses` has a unique (user_id, course_id) constraint; `save`
/// upserts on it so concurrent first attempts converge on one row.
#[derive(Clone)]
pub struct PostgresCourseHistoryRepository {
    pool: PgPool,
}

impl PostgresCourseHistoryRepository {
    /// Creates a new PostgresCourseHistoryRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn entry_uuids(ids: &[CourseHistoryEntryId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

#[async_trait]
impl CourseHistoryRepository for PostgresCourseHistoryRepository {
    async fn find_by_user_and_course(
        &self,
        user_id: UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseHistoryEntry>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, course_id, term_id, program_year_id
            FROM user_courses
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch course history entry", e))?;

        row.map(row_to_entry).transpose()
    }

    async fn find_by_ids(
        &self,
        ids: &[CourseHistoryEntryId],
    ) -> Result<Vec<CourseHistoryEntry>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, course_id, term_id, program_year_id
            FROM user_courses
            WHERE id = ANY($1)
            "#,
        )
        .bind(entry_uuids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch course history entries", e))?;

        rows.into_iter().map(row_to_entry).collect()
    }

    async fn find_course_ids(
        &self,
        ids: &[CourseHistoryEntryId],
    ) -> Result<Vec<CourseId>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT course_id FROM user_courses WHERE id = ANY($1)")
                .bind(entry_uuids(ids))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to fetch course ids", e))?;

        rows.into_iter()
            .map(|(id,)| CourseId::new(id).map_err(DomainError::from))
            .collect()
    }

    async fn save(&self, entry: &CourseHistoryEntry) -> Result<CourseHistoryEntryId, DomainError> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO user_courses (id, user_id, course_id, term_id, program_year_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, course_id) DO UPDATE SET
                term_id = EXCLUDED.term_id,
                program_year_id = EXCLUDED.program_year_id
            RETURNING id
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(entry.user_id().as_uuid())
        .bind(entry.course_id().as_str())
        .bind(entry.term_id().to_string())
        .bind(entry.program_year_id().map(|p| p.as_str().to_string()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save course history entry", e))?;

        Ok(CourseHistoryEntryId::from_uuid(id))
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM user_courses WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete course history", e))?;

        Ok(result.rows_affected())
    }
}

fn row_to_entry(row: PgRow) -> Result<CourseHistoryEntry, DomainError> {
    let get_err = |e: sqlx::Error| db_error("Failed to read course history row", e);

    let id: Uuid = row.try_get("id").map_err(get_err)?;
    let user_id: Uuid = row.try_get("user_id").map_err(get_err)?;
    let course_id: String = row.try_get("course_id").map_err(get_err)?;
    let term_id: String = row.try_get("term_id").map_err(get_err)?;
    let program_year_id: Option<String> = row.try_get("program_year_id").map_err(get_err)?;

    let term_id: TermId = term_id.parse()?;
    let program_year_id = program_year_id.map(ProgramYearId::new).transpose()?;

    Ok(CourseHistoryEntry::reconstitute(
        CourseHistoryEntryId::from_uuid(id),
        UserId::from_uuid(user_id),
        CourseId::new(course_id)?,
        term_id,
        program_year_id,
    ))
}

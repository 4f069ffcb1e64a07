//! PostgreSQL implementation of UserRepository.
//!
//! Friend links and course history are array columns on the `users` row,
//! so every set mutation is a single-row atomic UPDATE. No statement after
//! the INSERT writes a column it was not asked to change.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{
    CourseHistoryEntryId, DomainError, ErrorCode, Fbid, Timestamp, UserId, ValidationError,
};
use crate::domain::user::{User, UserCounters, UserProfile};
use crate::ports::{UserCourseHistory, UserRepository};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn uuids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let profile = user.profile();
        let counters = user.counters();
        sqlx::query(
            r#"
            INSERT INTO users (
                id, fbid, first_name, middle_name, last_name, program_name, join_date,
                friend_ids, friend_fbids, course_history, num_invites, num_points
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.fbid().as_str())
        .bind(&profile.first_name)
        .bind(&profile.middle_name)
        .bind(&profile.last_name)
        .bind(&profile.program_name)
        .bind(user.join_date().as_datetime())
        .bind(uuids(user.friend_ids()))
        .bind(fbid_strings(user.friend_fbids()))
        .bind(entry_uuids(user.course_history()))
        .bind(counters.num_invites as i32)
        .bind(counters.num_points as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DomainError::new(
                ErrorCode::DuplicateUser,
                format!("User already exists: {}", user.fbid()),
            ),
            other => db_error("Failed to insert user", other),
        })?;

        Ok(())
    }

    async fn update_profile(&self, id: UserId, profile: &UserProfile) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = $2,
                middle_name = $3,
                last_name = $4,
                program_name = $5
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(&profile.first_name)
        .bind(&profile.middle_name)
        .bind(&profile.last_name)
        .bind(&profile.program_name)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update profile", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::user_not_found(id));
        }

        Ok(())
    }

    async fn record_invite(
        &self,
        id: UserId,
        first_invite_points: u32,
    ) -> Result<UserCounters, DomainError> {
        // Right-hand sides see the pre-update row.
        let row: Option<(i32, i32)> = sqlx::query_as(
            r#"
            UPDATE users SET
                num_invites = num_invites + 1,
                num_points = num_points + CASE WHEN num_invites = 0 THEN $2 ELSE 0 END
            WHERE id = $1
            RETURNING num_invites, num_points
            "#,
        )
        .bind(id.as_uuid())
        .bind(first_invite_points as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to record invite", e))?;

        let (num_invites, num_points) = row.ok_or_else(|| DomainError::user_not_found(id))?;
        Ok(UserCounters {
            num_invites: num_invites.max(0) as u32,
            num_points: num_points.max(0) as u32,
        })
    }

    async fn replace_facebook_friends(
        &self,
        id: UserId,
        fbids: &[Fbid],
    ) -> Result<Vec<UserId>, DomainError> {
        let row: Option<(Vec<Uuid>,)> = sqlx::query_as(
            r#"
            UPDATE users SET
                friend_fbids = $2,
                friend_ids = ARRAY(
                    SELECT friend.id FROM users friend
                    WHERE friend.fbid = ANY($2) AND friend.id <> $1
                )
            WHERE id = $1
            RETURNING friend_ids
            "#,
        )
        .bind(id.as_uuid())
        .bind(fbid_strings(fbids))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to replace Facebook friends", e))?;

        let (friend_ids,) = row.ok_or_else(|| DomainError::user_not_found(id))?;
        Ok(friend_ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, fbid, first_name, middle_name, last_name, program_name, join_date,
                   friend_ids, friend_fbids, course_history, num_invites, num_points
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch user", e))?;

        row.map(row_to_user).transpose()
    }

    async fn find_ids_by_fbids(&self, fbids: &[Fbid]) -> Result<Vec<UserId>, DomainError> {
        if fbids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE fbid = ANY($1)")
            .bind(fbid_strings(fbids))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to resolve fbids", e))?;

        Ok(ids.into_iter().map(|(id,)| UserId::from_uuid(id)).collect())
    }

    async fn find_course_histories(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserCourseHistory>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(Uuid, Vec<Uuid>)> =
            sqlx::query_as("SELECT id, course_history FROM users WHERE id = ANY($1)")
                .bind(uuids(ids))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to fetch course histories", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, history)| UserCourseHistory {
                user_id: UserId::from_uuid(id),
                course_history: history
                    .into_iter()
                    .map(CourseHistoryEntryId::from_uuid)
                    .collect(),
            })
            .collect())
    }

    async fn add_friend_to_all(
        &self,
        user_ids: &[UserId],
        friend_id: UserId,
    ) -> Result<u64, DomainError> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE users SET friend_ids = array_append(friend_ids, $2)
            WHERE id = ANY($1) AND id <> $2 AND NOT ($2 = ANY(friend_ids))
            "#,
        )
        .bind(uuids(user_ids))
        .bind(friend_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to add friend link", e))?;

        Ok(result.rows_affected())
    }

    async fn remove_friend_from_all(
        &self,
        user_ids: &[UserId],
        friend_id: UserId,
    ) -> Result<u64, DomainError> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE users SET friend_ids = array_remove(friend_ids, $2)
            WHERE id = ANY($1) AND $2 = ANY(friend_ids)
            "#,
        )
        .bind(uuids(user_ids))
        .bind(friend_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to remove friend link", e))?;

        Ok(result.rows_affected())
    }

    async fn append_course_entry(
        &self,
        user_id: UserId,
        entry_id: CourseHistoryEntryId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET course_history = array_append(course_history, $2)
            WHERE id = $1 AND NOT ($2 = ANY(course_history))
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(entry_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to append course history", e))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check user existence", e))?;

        if exists {
            Ok(false)
        } else {
            Err(DomainError::user_not_found(user_id))
        }
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete user", e))?;

        Ok(())
    }
}

fn fbid_strings(fbids: &[Fbid]) -> Vec<String> {
    fbids.iter().map(|f| f.as_str().to_string()).collect()
}

fn entry_uuids(ids: &[CourseHistoryEntryId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

fn row_to_user(row: PgRow) -> Result<User, DomainError> {
    let get_err = |e: sqlx::Error| db_error("Failed to read user row", e);
    let corrupt = |e: ValidationError| {
        DomainError::new(ErrorCode::DatabaseError, format!("Corrupt user row: {}", e))
    };

    let id: Uuid = row.try_get("id").map_err(get_err)?;
    let fbid: String = row.try_get("fbid").map_err(get_err)?;
    let first_name: String = row.try_get("first_name").map_err(get_err)?;
    let middle_name: Option<String> = row.try_get("middle_name").map_err(get_err)?;
    let last_name: String = row.try_get("last_name").map_err(get_err)?;
    let program_name: Option<String> = row.try_get("program_name").map_err(get_err)?;
    let join_date: chrono::DateTime<chrono::Utc> = row.try_get("join_date").map_err(get_err)?;
    let friend_ids: Vec<Uuid> = row.try_get("friend_ids").map_err(get_err)?;
    let friend_fbids: Vec<String> = row.try_get("friend_fbids").map_err(get_err)?;
    let course_history: Vec<Uuid> = row.try_get("course_history").map_err(get_err)?;
    let num_invites: i32 = row.try_get("num_invites").map_err(get_err)?;
    let num_points: i32 = row.try_get("num_points").map_err(get_err)?;

    let profile = UserProfile {
        first_name,
        middle_name,
        last_name,
        program_name,
    };
    let friend_fbids = friend_fbids
        .into_iter()
        .map(Fbid::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(corrupt)?;

    Ok(User::reconstitute(
        UserId::from_uuid(id),
        Fbid::new(fbid).map_err(corrupt)?,
        profile,
        Timestamp::from_datetime(join_date),
        friend_ids.into_iter().map(UserId::from_uuid).collect(),
        friend_fbids,
        course_history
            .into_iter()
            .map(CourseHistoryEntryId::from_uuid)
            .collect(),
        UserCounters {
            num_invites: num_invites.max(0) as u32,
            num_points: num_points.max(0) as u32,
        },
    ))
}

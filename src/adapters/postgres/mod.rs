//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - User documents with array-column friend sets
//! - `PostgresCourseHistoryRepository` - Course history entries
//! - `PostgresCourseCatalog` - Course existence checks
//!
//! The schema lives in `migrations/` and is applied with [`run_migrations`].

mod course_catalog;
mod course_history_repository;
mod user_repository;

pub use course_catalog::PostgresCourseCatalog;
pub use course_history_repository::PostgresCourseHistoryRepository;
pub use user_repository::PostgresUserRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Opens a connection pool with the configured limits.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to connect to database: {}", e),
            )
        })
}

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to run migrations: {}", e),
        )
    })
}

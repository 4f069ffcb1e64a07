//! In-memory adapters for every port.
//!
//! Used by the test suites and for running the lifecycle without external
//! services. Stores count their round trips so batching can be asserted.

mod course_catalog;
mod course_history_repository;
mod data_quality_sink;
mod mutual_course_cache;
mod user_repository;

pub use course_catalog::InMemoryCourseCatalog;
pub use course_history_repository::InMemoryCourseHistoryRepository;
pub use data_quality_sink::InMemoryDataQualitySink;
pub use mutual_course_cache::InMemoryMutualCourseCache;
pub use user_repository::InMemoryUserRepository;

//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `UserRepository` - User documents and their atomic set mutations
//! - `CourseHistoryRepository` - Course history entries
//! - `MutualCourseCache` - Key-value cache of mutual courses per user pair
//!
//! ## Collaborator Ports
//!
//! - `CourseCatalog` - Course existence checks
//! - `DataQualitySink` - Fire-and-forget data-quality events
//! - `TermClock` - Current academic term

mod course_catalog;
mod course_history_repository;
mod data_quality_sink;
mod mutual_course_cache;
mod term_clock;
mod user_repository;

pub use course_catalog::CourseCatalog;
pub use course_history_repository::CourseHistoryRepository;
pub use data_quality_sink::DataQualitySink;
pub use mutual_course_cache::MutualCourseCache;
pub use term_clock::TermClock;
pub use user_repository::{UserCourseHistory, UserRepository};

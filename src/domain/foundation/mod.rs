//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the Coursemates domain.

mod command;
mod errors;
mod ids;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CourseHistoryEntryId, CourseId, Fbid, ProgramYearId, UserId};
pub use timestamp::Timestamp;

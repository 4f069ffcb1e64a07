//! User module - enrollment history and social graph.
//!
//! # Domain Invariants
//!
//! 1. `friend_ids` is symmetric eventually: if A lists B, B comes to list A.
//!    It is corrected opportunistically, never transactionally.
//! 2. `course_history` holds at most one entry per course.
//! 3. A course history entry records the most recent real attempt; the
//!    shortlist placeholder never replaces a real attempt.
//! 4. Mutual-course sets are derived data keyed by an unordered user pair.

pub mod aggregate;
pub mod course_history;
pub mod events;
pub mod mutual_courses;
pub mod points;

pub use aggregate::{User, UserCounters, UserProfile};
pub use course_history::{AttemptMerge, CourseHistoryEntry};
pub use events::{DataQualityCategory, DataQualityEvent};
pub use mutual_courses::{mutual_course_ids, UserPair, DEFAULT_KEY_PREFIX};
pub use points::PointSource;

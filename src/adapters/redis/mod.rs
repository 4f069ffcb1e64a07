//! Redis adapters.

mod mutual_course_cache;

pub use mutual_course_cache::{RedisMutualCourseCache, DEFAULT_POINTS_KEY};

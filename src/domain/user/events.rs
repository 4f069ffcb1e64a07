//! Data-quality events raised by the user domain.

use crate::domain::foundation::{CourseId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Category a data-quality event is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityCategory {
    DataModel,
}

/// A non-fatal signal that referenced data is missing from its
/// authoritative source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DataQualityEvent {
    /// A course id that the catalog does not know about.
    UnknownCourseId {
        course_id: CourseId,
        user_id: UserId,
        occurred_at: Timestamp,
    },
}

impl DataQualityEvent {
    pub fn unknown_course(course_id: CourseId, user_id: UserId) -> Self {
        DataQualityEvent::UnknownCourseId {
            course_id,
            user_id,
            occurred_at: Timestamp::now(),
        }
    }

    pub fn category(&self) -> DataQualityCategory {
        match self {
            DataQualityEvent::UnknownCourseId { .. } => DataQualityCategory::DataModel,
        }
    }

    /// Event name, e.g. `unknown_course_id`.
    pub fn name(&self) -> &'static str {
        match self {
            DataQualityEvent::UnknownCourseId { .. } => "unknown_course_id",
        }
    }

    /// The identifier the event is about.
    pub fn identifier(&self) -> String {
        match self {
            DataQualityEvent::UnknownCourseId { course_id, .. } => course_id.to_string(),
        }
    }
}

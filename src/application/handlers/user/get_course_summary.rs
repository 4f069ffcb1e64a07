//! GetCourseSummaryHandler - derived facts about a user's course history.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ProgramYearId, UserId};
use crate::domain::user::CourseHistoryEntry;
use crate::ports::{CourseHistoryRepository, TermClock, UserRepository};

#[derive(Debug, Clone)]
pub struct GetCourseSummaryQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    /// At least one course was actually taken (not just shortlisted).
    pub has_course_history: bool,
    pub has_shortlisted: bool,
    /// Program year of the most recent course taken up to the current term.
    pub latest_program_year_id: Option<ProgramYearId>,
}

pub struct GetCourseSummaryHandler {
    users: Arc<dyn UserRepository>,
    history: Arc<dyn CourseHistoryRepository>,
    clock: Arc<dyn TermClock>,
}

impl GetCourseSummaryHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        history: Arc<dyn CourseHistoryRepository>,
        clock: Arc<dyn TermClock>,
    ) -> Self {
        Self {
            users,
            history,
            clock,
        }
    }

    #[tracing::instrument(skip_all, fields(user_id = %query.user_id))]
    pub async fn handle(&self, query: GetCourseSummaryQuery) -> Result<CourseSummary, DomainError> {
        let user = self
            .users
            .find_by_id(query.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(query.user_id))?;

        let entries = if user.course_history().is_empty() {
            Vec::new()
        } else {
            self.history.find_by_ids(user.course_history()).await?
        };

        // terms after the current one are planned, not taken
        let current = self.clock.current_term();
        let mut latest: Option<&CourseHistoryEntry> = None;
        for entry in entries
            .iter()
            .filter(|e| !e.is_shortlisted() && !e.term_id().is_more_recent_than(&current))
        {
            if latest.map_or(true, |best| entry.term_id().is_more_recent_than(&best.term_id())) {
                latest = Some(entry);
            }
        }

        Ok(CourseSummary {
            has_course_history: entries.iter().any(|e| !e.is_shortlisted()),
            has_shortlisted: entries.iter().any(|e| e.is_shortlisted()),
            latest_program_year_id: latest.and_then(|e| e.program_year_id().cloned()),
        })
    }
}

//! AddCourseHandler - records an attempt at a course in a user's history.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::foundation::{CommandMetadata, CourseId, DomainError, ProgramYearId, UserId};
use crate::domain::term::TermId;
use crate::domain::user::{AttemptMerge, CourseHistoryEntry, DataQualityEvent};
use crate::ports::{CourseCatalog, CourseHistoryRepository, DataQualitySink, UserRepository};

/// Command to record a course attempt.
#[derive(Debug, Clone)]
pub struct AddCourseCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub term_id: TermId,
    pub program_year_id: Option<ProgramYearId>,
}

/// What happened to the (user, course) entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryChange {
    Created,
    Merged(AttemptMerge),
}

#[derive(Debug, Clone)]
pub enum AddCourseOutcome {
    Recorded {
        entry: CourseHistoryEntry,
        change: EntryChange,
        /// The entry id was newly appended to the user's history.
        appended: bool,
    },
    /// The course is not in the catalog. Nothing was written.
    UnknownCourse,
}

/// Handler for recording course attempts.
///
/// The entry is written before the user's history reference, and the
/// reference is appended with an atomic append-if-absent. A crash between
/// the two leaves an orphan entry that the next call for the same course
/// adopts. No lock is held across the read-modify-write; concurrent calls
/// for the same course race and the last write of the entry body wins.
pub struct AddCourseHandler {
    users: Arc<dyn UserRepository>,
    history: Arc<dyn CourseHistoryRepository>,
    catalog: Arc<dyn CourseCatalog>,
    data_quality: Arc<dyn DataQualitySink>,
}

impl AddCourseHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        history: Arc<dyn CourseHistoryRepository>,
        catalog: Arc<dyn CourseCatalog>,
        data_quality: Arc<dyn DataQualitySink>,
    ) -> Self {
        Self {
            users,
            history,
            catalog,
            data_quality,
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(
            user_id = %cmd.user_id,
            course_id = %cmd.course_id,
            term_id = %cmd.term_id,
            correlation_id = %metadata.correlation_id(),
        )
    )]
    pub async fn handle(
        &self,
        cmd: AddCourseCommand,
        metadata: CommandMetadata,
    ) -> Result<AddCourseOutcome, DomainError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(cmd.user_id))?;

        // 1. Merge into the existing entry, or create one for a known course
        let existing = self
            .history
            .find_by_user_and_course(user.id(), &cmd.course_id)
            .await?;

        let (mut entry, change) = match existing {
            Some(mut entry) => {
                let merge = entry.merge_attempt(cmd.term_id, cmd.program_year_id);
                (entry, EntryChange::Merged(merge))
            }
            None => {
                if !self.catalog.exists(&cmd.course_id).await? {
                    self.report_unknown_course(cmd.course_id, user.id()).await;
                    return Ok(AddCourseOutcome::UnknownCourse);
                }
                let entry = CourseHistoryEntry::new(
                    user.id(),
                    cmd.course_id,
                    cmd.term_id,
                    cmd.program_year_id,
                );
                (entry, EntryChange::Created)
            }
        };

        // 2. Persist the entry before the user references it
        let stored_id = self.history.save(&entry).await?;
        if stored_id != entry.id() {
            debug!(entry_id = %stored_id, "Adopted concurrently created entry");
            entry = CourseHistoryEntry::reconstitute(
                stored_id,
                entry.user_id(),
                entry.course_id().clone(),
                entry.term_id(),
                entry.program_year_id().cloned(),
            );
        }

        // 3. Reference it from the user's history
        let appended = if user.has_course_entry(stored_id) {
            false
        } else {
            self.users.append_course_entry(user.id(), stored_id).await?
        };

        info!(?change, appended, "Course recorded");
        Ok(AddCourseOutcome::Recorded {
            entry,
            change,
            appended,
        })
    }

    async fn report_unknown_course(&self, course_id: CourseId, user_id: UserId) {
        warn!("Course not in catalog; skipping");
        let event = DataQualityEvent::unknown_course(course_id, user_id);
        if let Err(err) = self.data_quality.record(event).await {
            warn!(error = %err, "Failed to record data-quality event");
        }
    }
}

//! Course history entries.
//!
//! One entry per (user, course). Retaking a course does not add a second
//! entry; the entry is moved to the latest attempt instead.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseHistoryEntryId, CourseId, ProgramYearId, UserId};
use crate::domain::term::TermId;

/// Outcome of merging an attempt into an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptMerge {
    /// The entry now records the new attempt.
    Replaced,
    /// The stored attempt was at least as recent; nothing changed.
    Kept,
}

/// A user's recorded attempt at a course.
///
/// # Invariants
///
/// - `term_id` only moves forward, except away from the shortlist sentinel
/// - `user_id` and `course_id` never change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseHistoryEntry {
    id: CourseHistoryEntryId,
    user_id: UserId,
    course_id: CourseId,
    term_id: TermId,
    program_year_id: Option<ProgramYearId>,
}

impl CourseHistoryEntry {
    /// Records a first attempt.
    pub fn new(
        user_id: UserId,
        course_id: CourseId,
        term_id: TermId,
        program_year_id: Option<ProgramYearId>,
    ) -> Self {
        Self {
            id: CourseHistoryEntryId::new(),
            user_id,
            course_id,
            term_id,
            program_year_id,
        }
    }

    /// Rebuilds an entry from persisted state.
    pub fn reconstitute(
        id: CourseHistoryEntryId,
        user_id: UserId,
        course_id: CourseId,
        term_id: TermId,
        program_year_id: Option<ProgramYearId>,
    ) -> Self {
        Self {
            id,
            user_id,
            course_id,
            term_id,
            program_year_id,
        }
    }

    pub fn id(&self) -> CourseHistoryEntryId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn term_id(&self) -> TermId {
        self.term_id
    }

    pub fn program_year_id(&self) -> Option<&ProgramYearId> {
        self.program_year_id.as_ref()
    }

    pub fn is_shortlisted(&self) -> bool {
        self.term_id.is_shortlist()
    }

    /// Merges a later-reported attempt.
    ///
    /// The attempt replaces the stored term and program year iff it is
    /// strictly more recent, or the stored term is the shortlist sentinel.
    pub fn merge_attempt(
        &mut self,
        term_id: TermId,
        program_year_id: Option<ProgramYearId>,
    ) -> AttemptMerge {
        if term_id.is_more_recent_than(&self.term_id) || self.term_id.is_shortlist() {
            self.term_id = term_id;
            self.program_year_id = program_year_id;
            AttemptMerge::Replaced
        } else {
            AttemptMerge::Kept
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> TermId {
        s.parse().unwrap()
    }

    fn entry(term_id: TermId) -> CourseHistoryEntry {
        CourseHistoryEntry::new(
            UserId::new(),
            CourseId::new("cs135").unwrap(),
            term_id,
            Some(ProgramYearId::new("1A").unwrap()),
        )
    }

    #[test]
    fn newer_attempt_replaces_older() {
        let mut e = entry(term("2012_09"));
        let merge = e.merge_attempt(term("2013_01"), Some(ProgramYearId::new("1B").unwrap()));

        assert_eq!(merge, AttemptMerge::Replaced);
        assert_eq!(e.term_id(), term("2013_01"));
        assert_eq!(e.program_year_id().map(|p| p.as_str()), Some("1B"));
    }

    #[test]
    fn older_or_equal_attempt_is_ignored() {
        let mut e = entry(term("2013_01"));

        assert_eq!(e.merge_attempt(term("2012_09"), None), AttemptMerge::Kept);
        assert_eq!(e.merge_attempt(term("2013_01"), None), AttemptMerge::Kept);
        assert_eq!(e.term_id(), term("2013_01"));
        assert_eq!(e.program_year_id().map(|p| p.as_str()), Some("1A"));
    }

    #[test]
    fn real_attempt_supersedes_shortlist() {
        let mut e = entry(TermId::Shortlist);
        assert_eq!(e.merge_attempt(term("2010_01"), None), AttemptMerge::Replaced);
        assert_eq!(e.term_id(), term("2010_01"));
        assert!(!e.is_shortlisted());
    }

    #[test]
    fn shortlist_never_overwrites_real_attempt() {
        let mut e = entry(term("2013_05"));
        assert_eq!(e.merge_attempt(TermId::Shortlist, None), AttemptMerge::Kept);
        assert_eq!(e.term_id(), term("2013_05"));
    }
}

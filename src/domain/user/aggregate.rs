//! User aggregate root.
//!
//! A user carries two friend collections: `friend_fbids`, the raw list of
//! Facebook friends (many of whom are not on the platform), and
//! `friend_ids`, the resolved links to users that are. Both have set
//! semantics. `course_history` holds references to course history entries in
//! the order they were first recorded, at most one per course.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseHistoryEntryId, Fbid, Timestamp, UserId, ValidationError};

const FB_GRAPH_URL: &str = "https://graph.facebook.com";

/// Editable profile fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Full program name, e.g. "Software Engineering, Co-op".
    pub program_name: Option<String>,
}

impl UserProfile {
    /// Creates a profile, validating required names.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        if first_name.trim().is_empty() {
            return Err(ValidationError::empty_field("first_name"));
        }
        if last_name.trim().is_empty() {
            return Err(ValidationError::empty_field("last_name"));
        }
        Ok(Self {
            first_name,
            middle_name: None,
            last_name,
            program_name: None,
        })
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    pub fn with_program_name(mut self, program_name: impl Into<String>) -> Self {
        self.program_name = Some(program_name.into());
        self
    }
}

/// Invite and point counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounters {
    pub num_invites: u32,
    /// Cached point total; recomputed by the nightly aggregation.
    pub num_points: u32,
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    fbid: Fbid,
    profile: UserProfile,
    join_date: Timestamp,
    friend_ids: Vec<UserId>,
    friend_fbids: Vec<Fbid>,
    course_history: Vec<CourseHistoryEntryId>,
    counters: UserCounters,
}

impl User {
    /// Creates a user that has not been persisted yet.
    ///
    /// `friend_ids` starts empty; it is filled in when the user is created
    /// through the lifecycle, which resolves `friend_fbids`.
    pub fn new(fbid: Fbid, profile: UserProfile, friend_fbids: Vec<Fbid>) -> Self {
        let mut user = Self {
            id: UserId::new(),
            fbid,
            profile,
            join_date: Timestamp::now(),
            friend_ids: Vec::new(),
            friend_fbids: Vec::new(),
            course_history: Vec::new(),
            counters: UserCounters::default(),
        };
        user.replace_friend_fbids(friend_fbids);
        user
    }

    /// Rebuilds a user from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        fbid: Fbid,
        profile: UserProfile,
        join_date: Timestamp,
        friend_ids: Vec<UserId>,
        friend_fbids: Vec<Fbid>,
        course_history: Vec<CourseHistoryEntryId>,
        counters: UserCounters,
    ) -> Self {
        Self {
            id,
            fbid,
            profile,
            join_date,
            friend_ids,
            friend_fbids,
            course_history,
            counters,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn fbid(&self) -> &Fbid {
        &self.fbid
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn join_date(&self) -> &Timestamp {
        &self.join_date
    }

    pub fn friend_ids(&self) -> &[UserId] {
        &self.friend_ids
    }

    pub fn friend_fbids(&self) -> &[Fbid] {
        &self.friend_fbids
    }

    pub fn course_history(&self) -> &[CourseHistoryEntryId] {
        &self.course_history
    }

    pub fn counters(&self) -> UserCounters {
        self.counters
    }

    // === Derived presentation values ===

    /// "First Last".
    pub fn name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
    }

    /// Program name up to the first comma, or empty.
    pub fn short_program_name(&self) -> &str {
        self.profile
            .program_name
            .as_deref()
            .and_then(|name| name.split(',').next())
            .unwrap_or("")
    }

    pub fn fb_pic_url(&self) -> String {
        format!("{}/{}/picture", FB_GRAPH_URL, self.fbid)
    }

    pub fn profile_url(&self) -> String {
        format!("/profile/{}", self.id)
    }

    // === Mutations ===

    pub fn update_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    /// Replaces the raw Facebook friend list, dropping duplicates.
    pub fn replace_friend_fbids(&mut self, fbids: Vec<Fbid>) {
        self.friend_fbids.clear();
        for fbid in fbids {
            if !self.friend_fbids.contains(&fbid) {
                self.friend_fbids.push(fbid);
            }
        }
    }

    /// Overwrites the resolved friend links. Self-links and duplicates are
    /// dropped.
    pub fn replace_friend_ids(&mut self, ids: Vec<UserId>) {
        self.friend_ids.clear();
        for id in ids {
            self.link_friend(id);
        }
    }

    /// Adds a friend link. Returns false if already present.
    pub fn link_friend(&mut self, friend_id: UserId) -> bool {
        if friend_id == self.id || self.friend_ids.contains(&friend_id) {
            return false;
        }
        self.friend_ids.push(friend_id);
        true
    }

    /// Removes a friend link. Returns false if it was not present.
    pub fn unlink_friend(&mut self, friend_id: UserId) -> bool {
        let before = self.friend_ids.len();
        self.friend_ids.retain(|id| *id != friend_id);
        self.friend_ids.len() != before
    }

    pub fn has_course_entry(&self, entry_id: CourseHistoryEntryId) -> bool {
        self.course_history.contains(&entry_id)
    }

    /// Appends a course history reference unless already present.
    pub fn record_course_entry(&mut self, entry_id: CourseHistoryEntryId) -> bool {
        if self.has_course_entry(entry_id) {
            return false;
        }
        self.course_history.push(entry_id);
        true
    }

    /// Counts an invite, awarding `first_invite_points` on the first one.
    /// Returns the points awarded.
    pub fn record_invite(&mut self, first_invite_points: u32) -> Option<u32> {
        self.counters.num_invites = self.counters.num_invites.saturating_add(1);
        if self.counters.num_invites == 1 {
            self.counters.num_points = self.counters.num_points.saturating_add(first_invite_points);
            Some(first_invite_points)
        } else {
            None
        }
    }
}

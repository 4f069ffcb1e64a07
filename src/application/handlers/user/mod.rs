//! User lifecycle handlers.
//!
//! Commands change users, course history, or the mutual-course cache;
//! queries only read.

mod add_course;
mod clear_mutual_courses;
mod create_user;
mod delete_user;
mod get_course_summary;
mod get_mutual_courses;
mod invite_friend;
mod rebuild_mutual_courses;
mod update_facebook_friends;
mod update_user;

pub use add_course::{AddCourseCommand, AddCourseHandler, AddCourseOutcome, EntryChange};
pub use clear_mutual_courses::{
    ClearMutualCoursesCommand, ClearMutualCoursesHandler, ClearMutualCoursesResult,
};
pub use create_user::{CreateUserCommand, CreateUserHandler, CreateUserResult};
pub use delete_user::{DeleteUserCommand, DeleteUserHandler, DeleteUserResult};
pub use get_course_summary::{CourseSummary, GetCourseSummaryHandler, GetCourseSummaryQuery};
pub use get_mutual_courses::{GetMutualCoursesHandler, GetMutualCoursesQuery, MutualCourses};
pub use invite_friend::{InviteFriendCommand, InviteFriendHandler, InviteFriendResult};
pub use rebuild_mutual_courses::{
    RebuildMutualCoursesCommand, RebuildMutualCoursesHandler, RebuildMutualCoursesResult,
};
pub use update_facebook_friends::{
    UpdateFacebookFriendsCommand, UpdateFacebookFriendsHandler, UpdateFacebookFriendsResult,
};
pub use update_user::{UpdateUserCommand, UpdateUserHandler, UpdateUserResult};

//! UserLifecycle - one entry point over every user handler.
//!
//! Wires the handlers to a shared set of ports. Rebuilds share one
//! [`CourseIdMemo`]; deleting a user drops their slot in it.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, DomainError};
use crate::ports::{
    CourseCatalog, CourseHistoryRepository, DataQualitySink, MutualCourseCache, TermClock,
    UserRepository,
};

use super::handlers::*;
use super::CourseIdMemo;

/// Ports the lifecycle runs against.
#[derive(Clone)]
pub struct LifecyclePorts {
    pub users: Arc<dyn UserRepository>,
    pub history: Arc<dyn CourseHistoryRepository>,
    pub catalog: Arc<dyn CourseCatalog>,
    pub cache: Arc<dyn MutualCourseCache>,
    pub data_quality: Arc<dyn DataQualitySink>,
    pub clock: Arc<dyn TermClock>,
}

pub struct UserLifecycle {
    create_user: CreateUserHandler,
    update_user: UpdateUserHandler,
    update_facebook_friends: UpdateFacebookFriendsHandler,
    add_course: AddCourseHandler,
    delete_user: DeleteUserHandler,
    rebuild_mutual_courses: RebuildMutualCoursesHandler,
    get_mutual_courses: GetMutualCoursesHandler,
    clear_mutual_courses: ClearMutualCoursesHandler,
    invite_friend: InviteFriendHandler,
    get_course_summary: GetCourseSummaryHandler,
}

impl UserLifecycle {
    pub fn new(ports: LifecyclePorts) -> Self {
        let LifecyclePorts {
            users,
            history,
            catalog,
            cache,
            data_quality,
            clock,
        } = ports;
        let memo = Arc::new(CourseIdMemo::new(history.clone()));

        Self {
            create_user: CreateUserHandler::new(users.clone()),
            update_user: UpdateUserHandler::new(users.clone()),
            update_facebook_friends: UpdateFacebookFriendsHandler::new(users.clone()),
            add_course: AddCourseHandler::new(users.clone(), history.clone(), catalog, data_quality),
            delete_user: DeleteUserHandler::new(users.clone(), history.clone(), memo.clone()),
            rebuild_mutual_courses: RebuildMutualCoursesHandler::new(
                users.clone(),
                history.clone(),
                cache.clone(),
                memo,
            ),
            get_mutual_courses: GetMutualCoursesHandler::new(users.clone(), cache.clone()),
            clear_mutual_courses: ClearMutualCoursesHandler::new(users.clone(), cache.clone()),
            invite_friend: InviteFriendHandler::new(users.clone(), cache),
            get_course_summary: GetCourseSummaryHandler::new(users, history, clock),
        }
    }

    pub async fn create_user(
        &self,
        cmd: CreateUserCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateUserResult, DomainError> {
        self.create_user.handle(cmd, metadata).await
    }

    pub async fn update_user(
        &self,
        cmd: UpdateUserCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateUserResult, DomainError> {
        self.update_user.handle(cmd, metadata).await
    }

    pub async fn update_facebook_friends(
        &self,
        cmd: UpdateFacebookFriendsCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateFacebookFriendsResult, DomainError> {
        self.update_facebook_friends.handle(cmd, metadata).await
    }

    pub async fn add_course(
        &self,
        cmd: AddCourseCommand,
        metadata: CommandMetadata,
    ) -> Result<AddCourseOutcome, DomainError> {
        self.add_course.handle(cmd, metadata).await
    }

    pub async fn delete_user(
        &self,
        cmd: DeleteUserCommand,
        metadata: CommandMetadata,
    ) -> Result<DeleteUserResult, DomainError> {
        self.delete_user.handle(cmd, metadata).await
    }

    pub async fn rebuild_mutual_courses(
        &self,
        cmd: RebuildMutualCoursesCommand,
        metadata: CommandMetadata,
    ) -> Result<RebuildMutualCoursesResult, DomainError> {
        self.rebuild_mutual_courses.handle(cmd, metadata).await
    }

    pub async fn get_mutual_courses(
        &self,
        query: GetMutualCoursesQuery,
    ) -> Result<MutualCourses, DomainError> {
        self.get_mutual_courses.handle(query).await
    }

    pub async fn clear_mutual_courses(
        &self,
        cmd: ClearMutualCoursesCommand,
        metadata: CommandMetadata,
    ) -> Result<ClearMutualCoursesResult, DomainError> {
        self.clear_mutual_courses.handle(cmd, metadata).await
    }

    pub async fn invite_friend(
        &self,
        cmd: InviteFriendCommand,
        metadata: CommandMetadata,
    ) -> Result<InviteFriendResult, DomainError> {
        self.invite_friend.handle(cmd, metadata).await
    }

    pub async fn get_course_summary(
        &self,
        query: GetCourseSummaryQuery,
    ) -> Result<CourseSummary, DomainError> {
        self.get_course_summary.handle(query).await
    }
}

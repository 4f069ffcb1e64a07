//! InviteFriendHandler - counts invites and awards first-invite points.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, DomainError, UserId};
use crate::domain::user::PointSource;
use crate::ports::{MutualCourseCache, UserRepository};

#[derive(Debug, Clone)]
pub struct InviteFriendCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InviteFriendResult {
    pub num_invites: u32,
    /// Points awarded for this invite, if any.
    pub points_awarded: Option<u32>,
    /// Site-wide point total after the award.
    pub points_total: Option<i64>,
}

pub struct InviteFriendHandler {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn MutualCourseCache>,
}

impl InviteFriendHandler {
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<dyn MutualCourseCache>) -> Self {
        Self { users, cache }
    }

    #[tracing::instrument(skip_all, fields(user_id = %cmd.user_id, correlation_id = %metadata.correlation_id()))]
    pub async fn handle(
        &self,
        cmd: InviteFriendCommand,
        metadata: CommandMetadata,
    ) -> Result<InviteFriendResult, DomainError> {
        let points = PointSource::FirstInvite.points();
        let counters = self.users.record_invite(cmd.user_id, points).await?;
        let points_awarded = (counters.num_invites == 1).then_some(points);

        let points_total = match points_awarded {
            Some(points) => {
                let total = self.cache.increment_points_total(points).await?;
                info!(points, total, "Points awarded");
                Some(total)
            }
            None => None,
        };

        Ok(InviteFriendResult {
            num_invites: counters.num_invites,
            points_awarded,
            points_total,
        })
    }
}

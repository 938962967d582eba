use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Follow;

/// Request body for POST /follow/. The follower is always the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FollowWrite {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub following: String,
}

/// Follow as rendered to clients: both sides by username
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowView {
    pub user: String,
    pub following: String,
}

impl From<Follow> for FollowView {
    fn from(follow: Follow) -> Self {
        FollowView {
            user: follow.user,
            following: follow.following,
        }
    }
}

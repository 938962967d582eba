/// Follow service
///
/// A follow is created by the acting user naming a target by username.
/// Self-follow is rejected before any storage lookup; duplicates are
/// rejected by an existence check here and, under a race, by the
/// `unique_follower` constraint, which surfaces the same error.
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::db::{FollowRepository, UserRepository};
use crate::dto::FollowWrite;
use crate::error::{AppError, Result, ValidationError};
use crate::metrics::blog::{record_created, record_follow_rejection};
use crate::models::{AuthUser, Follow, NewFollow};

/// Check a candidate follow `(user_id, following_id)` against persisted state.
pub async fn validate_follow(
    follows: &dyn FollowRepository,
    user_id: Uuid,
    following_id: Uuid,
) -> Result<()> {
    if user_id == following_id {
        return Err(ValidationError::SelfFollow.into());
    }
    if follows.exists(user_id, following_id).await? {
        return Err(ValidationError::DuplicateFollow.into());
    }
    Ok(())
}

#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { follows, users }
    }

    /// Follows owned by `actor`, optionally narrowed by a substring of the
    /// followed username.
    pub async fn list(&self, actor: &AuthUser, search: Option<String>) -> Result<Vec<Follow>> {
        let search = search.filter(|s| !s.trim().is_empty());
        Ok(self.follows.list_for_user(actor.id, search).await?)
    }

    pub async fn create(&self, actor: &AuthUser, input: FollowWrite) -> Result<Follow> {
        input.validate()?;

        let target = self
            .users
            .find_by_username(&input.following)
            .await?
            .ok_or_else(|| {
                ValidationError::field(
                    "following",
                    format!("Object with username={} does not exist.", input.following),
                )
            })?;

        match self.insert(actor.id, target.id).await {
            Ok(follow) => {
                record_created("follow");
                info!(user = %follow.user, following = %follow.following, "created follow");
                Ok(follow)
            }
            Err(AppError::Validation(err)) => {
                record_follow_rejection(&err);
                warn!(user = %actor.username, following = %target.username, reason = %err, "follow rejected");
                Err(AppError::Validation(err))
            }
            Err(e) => Err(e),
        }
    }

    async fn insert(&self, user_id: Uuid, following_id: Uuid) -> Result<Follow> {
        validate_follow(self.follows.as_ref(), user_id, following_id).await?;

        let follow = self
            .follows
            .create(&NewFollow {
                id: Uuid::new_v4(),
                user_id,
                following_id,
            })
            .await?;
        Ok(follow)
    }

    /// Remove `actor`'s follow of `username`.
    pub async fn delete(&self, actor: &AuthUser, username: &str) -> Result<()> {
        let target = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", username)))?;

        if !self.follows.delete(actor.id, target.id).await? {
            return Err(AppError::NotFound(format!(
                "{} does not follow {}",
                actor.username, username
            )));
        }

        info!(user = %actor.username, following = %username, "deleted follow");
        Ok(())
    }
}

use std::sync::Arc;

use tracing::{info, warn};

use crate::db::UserRepository;
use crate::error::{AppError, Result, StoreError};
use crate::models::{AuthUser, User, USERS_USERNAME_UNIQUE};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Make sure the authenticated principal exists locally so it can be
    /// referenced as an author or follow party.
    ///
    /// A token whose username is already held locally by a different id is
    /// refused as unauthenticated.
    pub async fn sync(&self, actor: &AuthUser) -> Result<User> {
        match self.users.upsert(&User::from(actor)).await {
            Ok(user) => Ok(user),
            Err(StoreError::ConstraintViolation(name)) if name == USERS_USERNAME_UNIQUE => {
                warn!(
                    user_id = %actor.id,
                    username = %actor.username,
                    "token username is held by another user id"
                );
                Err(AppError::Unauthorized(
                    "Token identity conflicts with an existing user".into(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a user together with their posts, comments and follows.
    pub async fn delete_by_username(&self, username: &str) -> Result<User> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", username)))?;

        self.users.delete(user.id).await?;
        info!(user_id = %user.id, %username, "deleted user");
        Ok(user)
    }
}

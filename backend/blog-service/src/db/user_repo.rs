use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::User;

/// Access to the local user mirror.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user or refresh its username.
    async fn upsert(&self, user: &User) -> StoreResult<User>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Delete a user; posts, comments and follows go with it.
    /// Returns true if a row was removed.
    async fn delete(&self, user_id: Uuid) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn upsert(&self, user: &User) -> StoreResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username
            WHERE users.username <> EXCLUDED.username
            RETURNING id, username
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .fetch_optional(&self.pool)
        .await?;

        // No row comes back when the stored username was already current.
        Ok(row.unwrap_or_else(|| user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn delete(&self, user_id: Uuid) -> StoreResult<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        debug!(%user_id, affected, "deleted user");
        Ok(affected > 0)
    }
}

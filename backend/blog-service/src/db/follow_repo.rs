use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{Follow, NewFollow};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Check if `user_id` already follows `following_id`
    async fn exists(&self, user_id: Uuid, following_id: Uuid) -> StoreResult<bool>;

    /// Insert a follow. The schema rejects duplicates (`unique_follower`)
    /// and self-follows (`user_cant_follow_himself`).
    async fn create(&self, follow: &NewFollow) -> StoreResult<Follow>;

    /// Follows owned by `user_id`, optionally narrowed to followed usernames
    /// containing `search` (case-insensitive).
    async fn list_for_user(&self, user_id: Uuid, search: Option<String>)
        -> StoreResult<Vec<Follow>>;

    async fn delete(&self, user_id: Uuid, following_id: Uuid) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE metacharacters so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    async fn exists(&self, user_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND following_id = $2)",
        )
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, follow: &NewFollow) -> StoreResult<Follow> {
        let follow = sqlx::query_as::<_, Follow>(
            r#"
            WITH f AS (
                INSERT INTO follows (id, user_id, following_id)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, following_id
            )
            SELECT f.id, f.user_id, u.username AS "user", f.following_id, t.username AS "following"
            FROM f
            INNER JOIN users u ON u.id = f.user_id
            INNER JOIN users t ON t.id = f.following_id
            "#,
        )
        .bind(follow.id)
        .bind(follow.user_id)
        .bind(follow.following_id)
        .fetch_one(&self.pool)
        .await?;

        debug!(
            "Created follow in PostgreSQL: {} -> {}",
            follow.user, follow.following
        );
        Ok(follow)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        search: Option<String>,
    ) -> StoreResult<Vec<Follow>> {
        let pattern = search.as_deref().map(like_pattern);

        let follows = sqlx::query_as::<_, Follow>(
            r#"
            SELECT f.id, f.user_id, u.username AS "user", f.following_id, t.username AS "following"
            FROM follows f
            INNER JOIN users u ON u.id = f.user_id
            INNER JOIN users t ON t.id = f.following_id
            WHERE f.user_id = $1
              AND ($2::text IS NULL OR t.username ILIKE $2)
            ORDER BY t.username ASC
            "#,
        )
        .bind(user_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(follows)
    }

    async fn delete(&self, user_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        let affected = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND following_id = $2")
            .bind(user_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

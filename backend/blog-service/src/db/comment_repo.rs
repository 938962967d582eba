use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{Comment, NewComment};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &NewComment) -> StoreResult<Comment>;

    async fn get(&self, comment_id: Uuid) -> StoreResult<Option<Comment>>;

    /// Comments of a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>>;

    /// Replace the text. `None` if the comment no longer exists.
    async fn update_text(&self, comment_id: Uuid, text: &str) -> StoreResult<Option<Comment>>;

    async fn delete(&self, comment_id: Uuid) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, comment: &NewComment) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH c AS (
                INSERT INTO comments (id, text, created, author_id, post_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, text, created, author_id, post_id
            )
            SELECT c.id, c.text, c.created, c.author_id, u.username AS author, c.post_id
            FROM c
            INNER JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(comment.id)
        .bind(&comment.text)
        .bind(comment.created)
        .bind(comment.author_id)
        .bind(comment.post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn get(&self, comment_id: Uuid) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.text, c.created, c.author_id, u.username AS author, c.post_id
            FROM comments c
            INNER JOIN users u ON u.id = c.author_id
            WHERE c.id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.text, c.created, c.author_id, u.username AS author, c.post_id
            FROM comments c
            INNER JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created ASC, c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn update_text(&self, comment_id: Uuid, text: &str) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH c AS (
                UPDATE comments
                SET text = $2
                WHERE id = $1
                RETURNING id, text, created, author_id, post_id
            )
            SELECT c.id, c.text, c.created, c.author_id, u.username AS author, c.post_id
            FROM c
            INNER JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(comment_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete(&self, comment_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

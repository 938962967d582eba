use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{NewPost, Page, Post, PostFilter, PostUpdate};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &NewPost) -> StoreResult<Post>;

    async fn get(&self, post_id: Uuid) -> StoreResult<Option<Post>>;

    /// Newest first. `None` returns every matching post.
    async fn list(&self, filter: &PostFilter, page: Option<Page>) -> StoreResult<Vec<Post>>;

    async fn count(&self, filter: &PostFilter) -> StoreResult<i64>;

    /// Overwrite the mutable fields. `None` if the post no longer exists.
    async fn update(&self, post_id: Uuid, changes: &PostUpdate) -> StoreResult<Option<Post>>;

    /// Delete a post and, through the schema, its comments.
    async fn delete(&self, post_id: Uuid) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: &NewPost) -> StoreResult<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            WITH p AS (
                INSERT INTO posts (id, text, pub_date, author_id, image, group_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, text, pub_date, author_id, image, group_id
            )
            SELECT p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.image, p.group_id
            FROM p
            INNER JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.author_id)
        .bind(&post.image)
        .bind(post.group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn get(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.image, p.group_id
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list(&self, filter: &PostFilter, page: Option<Page>) -> StoreResult<Vec<Post>> {
        // LIMIT NULL means no limit in PostgreSQL
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.image, p.group_id
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            WHERE ($1::uuid IS NULL OR p.group_id = $1)
            ORDER BY p.pub_date DESC, p.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.group_id)
        .bind(page.map(|p| p.limit))
        .bind(page.map(|p| p.offset).unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn count(&self, filter: &PostFilter) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE ($1::uuid IS NULL OR group_id = $1)",
        )
        .bind(filter.group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn update(&self, post_id: Uuid, changes: &PostUpdate) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            WITH p AS (
                UPDATE posts
                SET text = $2, image = $3, group_id = $4
                WHERE id = $1
                RETURNING id, text, pub_date, author_id, image, group_id
            )
            SELECT p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.image, p.group_id
            FROM p
            INNER JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(post_id)
        .bind(&changes.text)
        .bind(&changes.image)
        .bind(changes.group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete(&self, post_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

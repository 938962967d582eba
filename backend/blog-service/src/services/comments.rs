/// Comment service - comments always live under a post
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::{CommentRepository, PostRepository};
use crate::dto::{CommentPatch, CommentWrite};
use crate::error::{AppError, Result};
use crate::metrics::blog::record_created;
use crate::middleware::permissions::check_ownership;
use crate::models::{AuthUser, Comment, NewComment};

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    async fn ensure_post(&self, post_id: Uuid) -> Result<()> {
        match self.posts.get(post_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("post {}", post_id))),
        }
    }

    /// Comments of a post, oldest first.
    pub async fn list(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.ensure_post(post_id).await?;
        Ok(self.comments.list_for_post(post_id).await?)
    }

    /// A comment addressed through a post it does not belong to is not found.
    pub async fn get(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment> {
        self.comments
            .get(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))
    }

    /// Comment on `post_id` as `actor`. The post comes from the path, never
    /// from the payload.
    pub async fn create(&self, actor: &AuthUser, post_id: Uuid, input: CommentWrite) -> Result<Comment> {
        input.validate()?;
        self.ensure_post(post_id).await?;

        let comment = self
            .comments
            .create(&NewComment {
                id: Uuid::new_v4(),
                post_id,
                author_id: actor.id,
                text: input.text,
                created: Utc::now(),
            })
            .await?;

        record_created("comment");
        info!(comment_id = %comment.id, %post_id, author = %actor.username, "created comment");
        Ok(comment)
    }

    pub async fn update(
        &self,
        actor: &AuthUser,
        post_id: Uuid,
        comment_id: Uuid,
        changes: CommentPatch,
    ) -> Result<Comment> {
        let current = self.get(post_id, comment_id).await?;
        check_ownership(actor, &current, "comment")?;
        changes.validate()?;

        let Some(text) = changes.text else {
            return Ok(current);
        };

        let comment = self
            .comments
            .update_text(comment_id, &text)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;

        info!(%comment_id, "updated comment");
        Ok(comment)
    }

    pub async fn delete(&self, actor: &AuthUser, post_id: Uuid, comment_id: Uuid) -> Result<()> {
        let current = self.get(post_id, comment_id).await?;
        check_ownership(actor, &current, "comment")?;

        if !self.comments.delete(comment_id).await? {
            return Err(AppError::NotFound(format!("comment {}", comment_id)));
        }

        info!(%comment_id, "deleted comment");
        Ok(())
    }
}

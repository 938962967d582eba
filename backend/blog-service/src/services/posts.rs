/// Post service - post creation, retrieval, updates and deletion
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::PostRepository;
use crate::dto::{PostPatch, PostWrite};
use crate::error::{AppError, Result, ValidationError};
use crate::metrics::blog::record_created;
use crate::middleware::permissions::check_ownership;
use crate::models::{AuthUser, NewPost, Page, Post, PostFilter};

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Every post matching `filter`, newest first.
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        Ok(self.posts.list(filter, None).await?)
    }

    /// One page of posts plus the total number of matches.
    pub async fn list_page(&self, filter: &PostFilter, page: Page) -> Result<(Vec<Post>, i64)> {
        let posts = self.posts.list(filter, Some(page)).await?;
        let count = self.posts.count(filter).await?;
        Ok((posts, count))
    }

    pub async fn get(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .get(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))
    }

    /// Create a post authored by `actor`, published now.
    pub async fn create(&self, actor: &AuthUser, input: PostWrite) -> Result<Post> {
        input.validate()?;

        let post = self
            .posts
            .create(&NewPost {
                id: Uuid::new_v4(),
                author_id: actor.id,
                text: input.text,
                pub_date: Utc::now(),
                image: input.image,
                group_id: input.group,
            })
            .await?;

        record_created("post");
        info!(post_id = %post.id, author = %actor.username, "created post");
        Ok(post)
    }

    /// Apply `changes` to a post owned by `actor`. Author and publication
    /// date are never touched.
    pub async fn update(&self, actor: &AuthUser, post_id: Uuid, changes: PostPatch) -> Result<Post> {
        let current = self.get(post_id).await?;
        check_ownership(actor, &current, "post")?;

        changes.validate()?;
        if changes.image_too_long() {
            return Err(ValidationError::field(
                "image",
                "Ensure this field has no more than 255 characters.",
            )
            .into());
        }

        let update = changes.merge_into(&current);
        let post = self
            .posts
            .update(post_id, &update)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        info!(post_id = %post.id, "updated post");
        Ok(post)
    }

    /// Delete a post owned by `actor`; its comments go with it.
    pub async fn delete(&self, actor: &AuthUser, post_id: Uuid) -> Result<()> {
        let current = self.get(post_id).await?;
        check_ownership(actor, &current, "post")?;

        if !self.posts.delete(post_id).await? {
            return Err(AppError::NotFound(format!("post {}", post_id)));
        }

        info!(%post_id, "deleted post");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockPostRepository;
    use crate::error::StoreError;
    use crate::models::{PostUpdate, POSTS_GROUP_FK};
    use chrono::{DateTime, Duration};

    fn alice() -> AuthUser {
        AuthUser::new(Uuid::new_v4(), "alice")
    }

    fn bob() -> AuthUser {
        AuthUser::new(Uuid::new_v4(), "bob")
    }

    fn stored(new: &NewPost, author: &str) -> Post {
        Post {
            id: new.id,
            text: new.text.clone(),
            pub_date: new.pub_date,
            author_id: new.author_id,
            author: author.to_string(),
            image: new.image.clone(),
            group_id: new.group_id,
        }
    }

    fn existing(author: &AuthUser, pub_date: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::new_v4(),
            text: "hello".into(),
            pub_date,
            author_id: author.id,
            author: author.username.clone(),
            image: None,
            group_id: None,
        }
    }

    fn apply(post: &Post, update: &PostUpdate) -> Post {
        Post {
            text: update.text.clone(),
            image: update.image.clone(),
            group_id: update.group_id,
            ..post.clone()
        }
    }

    #[tokio::test]
    async fn create_stamps_author_and_pub_date() {
        let alice = alice();
        let alice_id = alice.id;

        let mut repo = MockPostRepository::new();
        repo.expect_create()
            .withf(move |p| p.author_id == alice_id && p.group_id.is_none())
            .times(1)
            .returning(|p| Ok(stored(p, "alice")));

        let service = PostService::new(Arc::new(repo));
        let before = Utc::now();
        // `author`/`pub_date` keys in the payload never deserialize into PostWrite.
        let input: PostWrite = serde_json::from_str(
            r#"{"text": "hello", "author": "bob", "pub_date": "2001-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let post = service.create(&alice, input).await.unwrap();

        assert_eq!(post.author, "alice");
        assert_eq!(post.text, "hello");
        assert!(post.group_id.is_none());
        assert!(post.pub_date >= before && post.pub_date <= Utc::now());
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_storage() {
        let mut repo = MockPostRepository::new();
        repo.expect_create().never();

        let service = PostService::new(Arc::new(repo));
        let input = PostWrite {
            text: String::new(),
            group: None,
            image: None,
        };
        assert!(matches!(
            service.create(&alice(), input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_group_is_a_group_field_error() {
        let mut repo = MockPostRepository::new();
        repo.expect_create()
            .returning(|_| Err(StoreError::MissingReference(POSTS_GROUP_FK.into())));

        let service = PostService::new(Arc::new(repo));
        let input = PostWrite {
            text: "hello".into(),
            group: Some(Uuid::new_v4()),
            image: None,
        };
        match service.create(&alice(), input).await.unwrap_err() {
            AppError::Validation(ValidationError::Fields(fields)) => {
                assert!(fields.contains_key("group"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_author_cannot_update() {
        let post = existing(&alice(), Utc::now());
        let returned = post.clone();

        let mut repo = MockPostRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(returned.clone())));
        repo.expect_update().never();

        let service = PostService::new(Arc::new(repo));
        let changes = PostPatch {
            text: Some("hijacked".into()),
            ..Default::default()
        };
        let err = service.update(&bob(), post.id, changes).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn author_update_keeps_author_and_pub_date() {
        let alice = alice();
        let published = Utc::now() - Duration::days(3);
        let post = existing(&alice, published);
        let current = post.clone();
        let for_update = post.clone();

        let mut repo = MockPostRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(current.clone())));
        repo.expect_update()
            .withf(|_, u| u.text == "hello world")
            .times(1)
            .returning(move |_, u| Ok(Some(apply(&for_update, u))));

        let service = PostService::new(Arc::new(repo));
        let changes = PostPatch {
            text: Some("hello world".into()),
            ..Default::default()
        };
        let updated = service.update(&alice, post.id, changes).await.unwrap();

        assert_eq!(updated.text, "hello world");
        assert_eq!(updated.author, "alice");
        assert_eq!(updated.author_id, alice.id);
        assert_eq!(updated.pub_date, published);
    }

    #[tokio::test]
    async fn update_of_missing_post_is_not_found() {
        let mut repo = MockPostRepository::new();
        repo.expect_get().returning(|_| Ok(None));

        let service = PostService::new(Arc::new(repo));
        let err = service
            .update(&alice(), Uuid::new_v4(), PostPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn overlong_image_is_rejected_on_patch() {
        let alice = alice();
        let post = existing(&alice, Utc::now());
        let current = post.clone();

        let mut repo = MockPostRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(current.clone())));
        repo.expect_update().never();

        let service = PostService::new(Arc::new(repo));
        let changes = PostPatch {
            image: Some(Some("x".repeat(256))),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&alice, post.id, changes).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn non_author_cannot_delete() {
        let post = existing(&alice(), Utc::now());
        let returned = post.clone();

        let mut repo = MockPostRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(returned.clone())));
        repo.expect_delete().never();

        let service = PostService::new(Arc::new(repo));
        let err = service.delete(&bob(), post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn list_page_returns_total_count() {
        let alice = alice();
        let posts = vec![existing(&alice, Utc::now())];
        let page_posts = posts.clone();

        let mut repo = MockPostRepository::new();
        repo.expect_list()
            .withf(|_, page| page.map(|p| p.limit) == Some(1))
            .returning(move |_, _| Ok(page_posts.clone()));
        repo.expect_count().returning(|_| Ok(7));

        let service = PostService::new(Arc::new(repo));
        let (page, count) = service
            .list_page(&PostFilter::default(), Page::clamped(1, None, 100))
            .await
            .unwrap();
        assert_eq!(page, posts);
        assert_eq!(count, 7);
    }
}

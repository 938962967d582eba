/// Data models for blog-service
///
/// This module defines the persisted entities:
/// - User: mirror of the identity provider's user, referenced by everything else
/// - Group: topic category a post can be filed under
/// - Post: authored text with optional image and group
/// - Comment: authored reply attached to a post
/// - Follow: directed subscription from one user to another
///
/// Write-once fields (`pub_date`, `created`, `author_id`, `post_id`, follow
/// `user_id`) only appear in the `New*` candidates, never in an update type.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Storage constraint names, as declared in migrations/.
pub const USERS_USERNAME_UNIQUE: &str = "users_username_key";
pub const GROUPS_SLUG_UNIQUE: &str = "groups_slug_key";
pub const POSTS_AUTHOR_FK: &str = "posts_author_id_fkey";
pub const POSTS_GROUP_FK: &str = "posts_group_id_fkey";
pub const COMMENTS_AUTHOR_FK: &str = "comments_author_id_fkey";
pub const COMMENTS_POST_FK: &str = "comments_post_id_fkey";
pub const FOLLOWS_USER_FK: &str = "follows_user_id_fkey";
pub const FOLLOWS_FOLLOWING_FK: &str = "follows_following_id_fkey";
pub const UNIQUE_FOLLOWER: &str = "unique_follower";
pub const USER_CANT_FOLLOW_HIMSELF: &str = "user_cant_follow_himself";

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// The authenticated principal making the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

impl AuthUser {
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

impl From<&AuthUser> for User {
    fn from(actor: &AuthUser) -> Self {
        User {
            id: actor.id,
            username: actor.username.clone(),
        }
    }
}

/// Group entity - topic category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Candidate group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Post entity, joined with its author's username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub author: String,
    pub image: Option<String>,
    pub group_id: Option<Uuid>,
}

/// Candidate post with every server-computed field already filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub group_id: Option<Uuid>,
}

/// The full mutable field set of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub text: String,
    pub image: Option<String>,
    pub group_id: Option<Uuid>,
}

/// Filter for post listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub group_id: Option<Uuid>,
}

/// Comment entity, joined with its author's username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_id: Uuid,
    pub author: String,
    pub post_id: Uuid,
}

/// Candidate comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Follow entity, joined with both usernames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user: String,
    pub following_id: Uuid,
    pub following: String,
}

/// Candidate follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFollow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub following_id: Uuid,
}

/// Limit/offset window over a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Clamp client-supplied values: limit into `1..=max_limit`, offset to >= 0.
    pub fn clamped(limit: i64, offset: Option<i64>, max_limit: i64) -> Self {
        Self {
            limit: limit.clamp(1, max_limit.max(1)),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

/// Anything with a single owning user for mutation purposes.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_is_clamped() {
        assert_eq!(
            Page::clamped(500, Some(-3), 100),
            Page {
                limit: 100,
                offset: 0
            }
        );
        assert_eq!(
            Page::clamped(0, None, 100),
            Page {
                limit: 1,
                offset: 0
            }
        );
        assert_eq!(
            Page::clamped(10, Some(i64::MAX), 100).offset,
            i64::MAX
        );
        assert_eq!(
            Page::clamped(10, Some(20), 100),
            Page {
                limit: 10,
                offset: 20
            }
        );
    }
}

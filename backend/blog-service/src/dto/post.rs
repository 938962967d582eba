use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{deserialize_some, not_blank};
use crate::models::{Post, PostUpdate};

/// Request body for creating a post
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostWrite {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    #[serde(default)]
    pub group: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub image: Option<String>,
}

/// Request body for PATCH. Absent keys leave the field unchanged;
/// `null` clears `group`/`image`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostPatch {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub group: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image: Option<Option<String>>,
}

impl PostPatch {
    /// Apply onto the current state of a post.
    pub fn merge_into(self, current: &Post) -> PostUpdate {
        PostUpdate {
            text: self.text.unwrap_or_else(|| current.text.clone()),
            image: self.image.unwrap_or_else(|| current.image.clone()),
            group_id: self.group.unwrap_or(current.group_id),
        }
    }

    pub(crate) fn image_too_long(&self) -> bool {
        matches!(&self.image, Some(Some(image)) if image.chars().count() > 255)
    }
}

/// Request body for PUT. `text` is required; optional fields left out stay
/// as they are and `null` clears them, as with PATCH.
#[derive(Debug, Clone, Deserialize)]
pub struct PostReplace {
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub group: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image: Option<Option<String>>,
}

impl From<PostReplace> for PostPatch {
    fn from(replace: PostReplace) -> Self {
        PostPatch {
            text: Some(replace.text),
            group: replace.group,
            image: replace.image,
        }
    }
}

/// Post as rendered to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostView {
    pub id: Uuid,
    pub text: String,
    pub group: Option<Uuid>,
    pub author: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        PostView {
            id: post.id,
            text: post.text,
            group: post.group_id,
            author: post.author,
            pub_date: post.pub_date,
            image: post.image,
        }
    }
}

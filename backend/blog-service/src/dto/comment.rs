use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;
use crate::models::Comment;

/// Request body for creating or replacing a comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentWrite {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

/// Request body for PATCH
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentPatch {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub text: Option<String>,
}

impl From<CommentWrite> for CommentPatch {
    fn from(write: CommentWrite) -> Self {
        CommentPatch {
            text: Some(write.text),
        }
    }
}

/// Comment as rendered to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentView {
    pub id: Uuid,
    pub author: String,
    pub post: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        CommentView {
            id: comment.id,
            author: comment.author,
            post: comment.post_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_and_author_in_payload_are_ignored() {
        let body = r#"{"text": "nice", "post": "not-a-uuid", "author": "mallory"}"#;
        let write: CommentWrite = serde_json::from_str(body).unwrap();
        assert_eq!(write.text, "nice");
    }

    #[test]
    fn whitespace_text_is_blank() {
        let write: CommentWrite = serde_json::from_str(r#"{"text": "\n\t "}"#).unwrap();
        let errors = write.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("text"));

        let patch: CommentPatch = serde_json::from_str(r#"{"text": "  "}"#).unwrap();
        assert!(patch.validate().is_err());
    }

    #[test]
    fn empty_patch_is_valid() {
        let patch: CommentPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.text.is_none());
        assert!(patch.validate().is_ok());
    }
}

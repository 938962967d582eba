use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Group;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug pattern");
}

/// Group creation payload (admin path only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GroupWrite {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(
        length(min = 1, max = 50),
        regex(
            path = *SLUG_RE,
            message = "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
        )
    )]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// Group as rendered to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<Group> for GroupView {
    fn from(group: Group) -> Self {
        GroupView {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

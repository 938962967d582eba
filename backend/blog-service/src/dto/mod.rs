/// Transfer representation
///
/// Request bodies carry only client-writable fields; any other key in the
/// payload (`author`, `pub_date`, `id`, ...) is dropped by serde and never
/// reaches the services. Response bodies render user references as
/// usernames.
pub mod comment;
pub mod follow;
pub mod group;
pub mod post;

pub use comment::{CommentPatch, CommentView, CommentWrite};
pub use follow::{FollowView, FollowWrite};
pub use group::{GroupView, GroupWrite};
pub use post::{PostPatch, PostReplace, PostView, PostWrite};

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidationError;

use crate::models::Page;

/// Distinguish an absent key (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Reject empty and whitespace-only text.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("This field may not be blank.")));
    }
    Ok(())
}

/// Limit/offset envelope returned by paginated listings
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// `base` is the request path plus any non-paging query, e.g.
    /// `/api/v1/posts/?group=<id>`.
    pub fn new(results: Vec<T>, count: i64, page: Page, base: &str) -> Self {
        let sep = if base.contains('?') { '&' } else { '?' };
        let link = |offset: i64| {
            format!(
                "{}{}limit={}&offset={}",
                base, sep, page.limit, offset
            )
        };

        let next = page
            .offset
            .checked_add(page.limit)
            .filter(|next| *next < count)
            .map(link);
        let previous = (page.offset > 0).then(|| link((page.offset - page.limit).max(0)));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

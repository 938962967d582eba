/// Ownership checks for mutating operations
///
/// Only the author of a post or comment may change or delete it.
use crate::error::{AppError, Result};
use crate::models::{AuthUser, Owned};

/// Check that `actor` owns `entity`; `what` names it in the error.
pub fn check_ownership<T: Owned>(actor: &AuthUser, entity: &T, what: &str) -> Result<()> {
    if entity.owner_id() == actor.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You don't have permission to modify this {}",
            what
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Comment;
    use chrono::Utc;
    use uuid::Uuid;

    fn comment_by(author_id: Uuid) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            text: "hi".into(),
            created: Utc::now(),
            author_id,
            author: "alice".into(),
            post_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn owner_passes() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        assert!(check_ownership(&alice, &comment_by(alice.id), "comment").is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        let bob = AuthUser::new(Uuid::new_v4(), "bob");
        let err = check_ownership(&bob, &comment_by(alice.id), "comment").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}

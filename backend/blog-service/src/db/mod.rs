/// Database access layer
///
/// Each entity has a repository trait (the seam services depend on) and a
/// PostgreSQL implementation over a shared `PgPool`. Referential actions and
/// follow constraints live in the schema, see `migrations/`.
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;

pub use comment_repo::{CommentRepository, PgCommentRepository};
pub use follow_repo::{FollowRepository, PgFollowRepository};
pub use group_repo::{GroupRepository, PgGroupRepository};
pub use post_repo::{PgPostRepository, PostRepository};
pub use user_repo::{PgUserRepository, UserRepository};

#[cfg(test)]
pub use comment_repo::MockCommentRepository;
#[cfg(test)]
pub use follow_repo::MockFollowRepository;
#[cfg(test)]
pub use group_repo::MockGroupRepository;
#[cfg(test)]
pub use post_repo::MockPostRepository;
#[cfg(test)]
pub use user_repo::MockUserRepository;

use sqlx::PgPool;
use std::sync::Arc;

/// Run embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Bundle of repository handles shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            groups: Arc::new(PgGroupRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            follows: Arc::new(PgFollowRepository::new(pool)),
        }
    }
}

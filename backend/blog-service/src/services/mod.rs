/// Business logic layer for blog-service
///
/// Services own every rule about who may do what and which fields the
/// server fills in. They depend on repository traits only:
/// - UserService: local mirror of authenticated principals
/// - PostService: post CRUD with group filtering and pagination
/// - CommentService: comments nested under a post
/// - GroupService: read access plus admin creation
/// - FollowService: follow rules (no self-follow, no duplicates)
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod users;

pub use comments::CommentService;
pub use follows::{validate_follow, FollowService};
pub use groups::GroupService;
pub use posts::PostService;
pub use users::UserService;

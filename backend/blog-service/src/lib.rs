/// Blog Service Library
///
/// Posts, groups, comments and follow relationships behind a JSON API.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `dto`: request/response shapes (writable vs server-computed fields)
/// - `models`: persisted entities and storage constraint names
/// - `services`: ownership and follow rules
/// - `db`: repository traits and PostgreSQL implementations
/// - `middleware`: JWT authentication, permissions, request metrics
/// - `error`: error types and HTTP rendering
/// - `config`: configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use db::Repositories;
use services::{CommentService, FollowService, GroupService, PostService, UserService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub groups: GroupService,
    pub follows: FollowService,
    /// Upper bound for `?limit=` on paginated listings
    pub max_page_limit: i64,
}

impl AppState {
    pub fn new(repos: Repositories, max_page_limit: i64) -> Self {
        Self {
            users: UserService::new(repos.users.clone()),
            posts: PostService::new(repos.posts.clone()),
            comments: CommentService::new(repos.comments, repos.posts),
            groups: GroupService::new(repos.groups),
            follows: FollowService::new(repos.follows, repos.users),
            max_page_limit,
        }
    }
}

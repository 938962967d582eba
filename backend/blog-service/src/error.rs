/// Error types for Blog Service
///
/// Three layers:
/// - `StoreError`: what a repository reports, with SQLSTATE classification
/// - `ValidationError`: field-scoped rejections returned to API clients
/// - `AppError`: everything a service operation can fail with, rendered to HTTP
use std::collections::BTreeMap;

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::models::{
    COMMENTS_AUTHOR_FK, COMMENTS_POST_FK, FOLLOWS_FOLLOWING_FK, FOLLOWS_USER_FK, GROUPS_SLUG_UNIQUE,
    POSTS_AUTHOR_FK, POSTS_GROUP_FK, UNIQUE_FOLLOWER, USERS_USERNAME_UNIQUE, USER_CANT_FOLLOW_HIMSELF,
};

/// Result type for service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for repository operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Key used for errors that are not tied to a single submitted field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Repository-level failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique or check constraint rejected the row
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    /// A foreign key pointed at a row that does not exist
    #[error("referenced row does not exist: {0}")]
    MissingReference(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().map(str::to_string);
            match (db_err.code().as_deref(), constraint) {
                (Some(UNIQUE_VIOLATION) | Some(CHECK_VIOLATION), Some(name)) => {
                    return StoreError::ConstraintViolation(name);
                }
                (Some(FOREIGN_KEY_VIOLATION), Some(name)) => {
                    return StoreError::MissingReference(name);
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Rejection of a candidate entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cannot follow yourself")]
    SelfFollow,

    #[error("cannot follow twice")]
    DuplicateFollow,

    #[error("invalid fields: {0:?}")]
    Fields(BTreeMap<String, Vec<String>>),
}

impl ValidationError {
    /// Single-field rejection.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), vec![message.into()]);
        ValidationError::Fields(fields)
    }

    /// Messages keyed by field, as sent to the client.
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            ValidationError::SelfFollow | ValidationError::DuplicateFollow => {
                let mut fields = BTreeMap::new();
                fields.insert(NON_FIELD_ERRORS.to_string(), vec![self.to_string()]);
                fields
            }
            ValidationError::Fields(fields) => fields.clone(),
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        ValidationError::Fields(fields)
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.into())
    }
}

/// Storage constraint names are translated back into the same shapes the
/// validation layer produces, so a request that loses a race gets the same
/// answer as one rejected up front.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation(name) => match name.as_str() {
                UNIQUE_FOLLOWER => ValidationError::DuplicateFollow.into(),
                USER_CANT_FOLLOW_HIMSELF => ValidationError::SelfFollow.into(),
                GROUPS_SLUG_UNIQUE => {
                    ValidationError::field("slug", "group with this slug already exists.").into()
                }
                USERS_USERNAME_UNIQUE => {
                    ValidationError::field("username", "user with this username already exists.")
                        .into()
                }
                other => ValidationError::field(
                    NON_FIELD_ERRORS,
                    format!("constraint {} violated", other),
                )
                .into(),
            },
            StoreError::MissingReference(name) => {
                let field = match name.as_str() {
                    POSTS_GROUP_FK => "group",
                    COMMENTS_POST_FK => "post",
                    POSTS_AUTHOR_FK | COMMENTS_AUTHOR_FK => "author",
                    FOLLOWS_USER_FK => "user",
                    FOLLOWS_FOLLOWING_FK => "following",
                    _ => NON_FIELD_ERRORS,
                };
                ValidationError::field(field, "object does not exist.").into()
            }
            StoreError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::Validation(err) => HttpResponse::build(status).json(serde_json::json!({
                "errors": err.errors(),
                "status": status.as_u16(),
            })),
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Internal server error",
                    "status": status.as_u16(),
                }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            })),
        }
    }
}

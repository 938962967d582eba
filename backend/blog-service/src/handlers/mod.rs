/// HTTP handlers for blog endpoints
///
/// This module contains handlers for:
/// - Posts: list (filter by group, optional pagination), CRUD
/// - Groups: read-only listing
/// - Comments: CRUD nested under a post
/// - Follows: the acting user's subscriptions
///
/// Every route here sits behind `JwtAuthMiddleware`. Trailing slashes are
/// trimmed by `NormalizePath` at the app level, so `/posts/` and `/posts`
/// reach the same resource.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;

pub use comments::{
    create_comment, delete_comment, get_comment, list_comments, partial_update_comment,
    update_comment,
};
pub use follows::{create_follow, delete_follow, list_follows};
pub use groups::{get_group, list_groups};
pub use posts::{create_post, delete_post, get_post, list_posts, partial_update_post, update_post};

use actix_web::{error, web, HttpRequest};

use crate::error::{AppError, ValidationError, NON_FIELD_ERRORS};
use crate::middleware::{JwtAuthMiddleware, MetricsMiddleware};

/// Malformed JSON bodies come back in the same shape as field validation.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = match &err {
            error::JsonPayloadError::Deserialize(e) => e.to_string(),
            other => other.to_string(),
        };
        AppError::from(ValidationError::field(NON_FIELD_ERRORS, message)).into()
    })
}

/// A path segment that does not parse (e.g. a non-UUID id) names nothing.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req: &HttpRequest| {
        tracing::debug!(path = %req.path(), error = %err, "unparseable path");
        AppError::NotFound(req.path().to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::from(ValidationError::field(NON_FIELD_ERRORS, err.to_string())).into()
    })
}

/// Register the authenticated `/api/v1` API.
pub fn configure(auth: JwtAuthMiddleware) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api/v1")
                .wrap(auth)
                .wrap(MetricsMiddleware)
                .app_data(json_config())
                .app_data(path_config())
                .app_data(query_config())
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(list_posts))
                                .route(web::post().to(create_post)),
                        )
                        .service(
                            web::resource("/{post_id}/comments")
                                .route(web::get().to(list_comments))
                                .route(web::post().to(create_comment)),
                        )
                        .service(
                            web::resource("/{post_id}/comments/{comment_id}")
                                .route(web::get().to(get_comment))
                                .route(web::put().to(update_comment))
                                .route(web::patch().to(partial_update_comment))
                                .route(web::delete().to(delete_comment)),
                        )
                        .service(
                            web::resource("/{post_id}")
                                .route(web::get().to(get_post))
                                .route(web::put().to(update_post))
                                .route(web::patch().to(partial_update_post))
                                .route(web::delete().to(delete_post)),
                        ),
                )
                .service(
                    web::scope("/groups")
                        .service(web::resource("").route(web::get().to(list_groups)))
                        .service(web::resource("/{group_id}").route(web::get().to(get_group))),
                )
                .service(
                    web::scope("/follow")
                        .service(
                            web::resource("")
                                .route(web::get().to(list_follows))
                                .route(web::post().to(create_follow)),
                        )
                        .route("/{username}", web::delete().to(delete_follow)),
                ),
        );
    }
}

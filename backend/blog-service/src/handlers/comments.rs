/// Comment handlers - nested under `/posts/{post_id}/comments`
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dto::{CommentPatch, CommentView, CommentWrite};
use crate::error::Result;
use crate::models::AuthUser;
use crate::AppState;

pub async fn list_comments(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = state.comments.list(post_id.into_inner()).await?;
    let views: Vec<CommentView> = comments.into_iter().map(CommentView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

pub async fn create_comment(
    state: web::Data<AppState>,
    actor: AuthUser,
    post_id: web::Path<Uuid>,
    body: web::Json<CommentWrite>,
) -> Result<HttpResponse> {
    let comment = state
        .comments
        .create(&actor, post_id.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(CommentView::from(comment)))
}

pub async fn get_comment(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state.comments.get(post_id, comment_id).await?;
    Ok(HttpResponse::Ok().json(CommentView::from(comment)))
}

pub async fn update_comment(
    state: web::Data<AppState>,
    actor: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentWrite>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .comments
        .update(&actor, post_id, comment_id, body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(CommentView::from(comment)))
}

pub async fn partial_update_comment(
    state: web::Data<AppState>,
    actor: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentPatch>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .comments
        .update(&actor, post_id, comment_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(CommentView::from(comment)))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    actor: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state.comments.delete(&actor, post_id, comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

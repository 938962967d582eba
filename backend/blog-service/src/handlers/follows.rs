/// Follow handlers - the caller's subscriptions to other users
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::dto::{FollowView, FollowWrite};
use crate::error::Result;
use crate::models::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FollowListQuery {
    pub search: Option<String>,
}

pub async fn list_follows(
    state: web::Data<AppState>,
    actor: AuthUser,
    query: web::Query<FollowListQuery>,
) -> Result<HttpResponse> {
    let follows = state
        .follows
        .list(&actor, query.into_inner().search)
        .await?;
    let views: Vec<FollowView> = follows.into_iter().map(FollowView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

pub async fn create_follow(
    state: web::Data<AppState>,
    actor: AuthUser,
    body: web::Json<FollowWrite>,
) -> Result<HttpResponse> {
    let follow = state.follows.create(&actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(FollowView::from(follow)))
}

pub async fn delete_follow(
    state: web::Data<AppState>,
    actor: AuthUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    state.follows.delete(&actor, &username).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Group handlers - groups are read-only over HTTP
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dto::GroupView;
use crate::error::Result;
use crate::AppState;

pub async fn list_groups(state: web::Data<AppState>) -> Result<HttpResponse> {
    let groups = state.groups.list().await?;
    let views: Vec<GroupView> = groups.into_iter().map(GroupView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

pub async fn get_group(
    state: web::Data<AppState>,
    group_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let group = state.groups.get(group_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GroupView::from(group)))
}

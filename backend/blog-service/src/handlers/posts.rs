/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::dto::{Paginated, PostPatch, PostReplace, PostView, PostWrite};
use crate::error::Result;
use crate::models::{AuthUser, Page, PostFilter};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub group: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List posts, newest first. With `limit` the response is a page envelope.
pub async fn list_posts(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    let filter = PostFilter {
        group_id: query.group,
    };

    let Some(limit) = query.limit else {
        let posts = state.posts.list(&filter).await?;
        let views: Vec<PostView> = posts.into_iter().map(PostView::from).collect();
        return Ok(HttpResponse::Ok().json(views));
    };

    let page = Page::clamped(limit, query.offset, state.max_page_limit);
    let (posts, count) = state.posts.list_page(&filter, page).await?;

    let base = match filter.group_id {
        Some(group_id) => format!("{}?group={}", req.path(), group_id),
        None => req.path().to_string(),
    };
    let views = posts.into_iter().map(PostView::from).collect();

    Ok(HttpResponse::Ok().json(Paginated::new(views, count, page, &base)))
}

/// Create a new post authored by the caller
pub async fn create_post(
    state: web::Data<AppState>,
    actor: AuthUser,
    body: web::Json<PostWrite>,
) -> Result<HttpResponse> {
    let post = state.posts.create(&actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(PostView::from(post)))
}

/// Get a post by ID
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = state.posts.get(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostView::from(post)))
}

/// Replace a post's text; optional fields follow PATCH rules
pub async fn update_post(
    state: web::Data<AppState>,
    actor: AuthUser,
    post_id: web::Path<Uuid>,
    body: web::Json<PostReplace>,
) -> Result<HttpResponse> {
    let changes = PostPatch::from(body.into_inner());
    let post = state
        .posts
        .update(&actor, post_id.into_inner(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(PostView::from(post)))
}

pub async fn partial_update_post(
    state: web::Data<AppState>,
    actor: AuthUser,
    post_id: web::Path<Uuid>,
    body: web::Json<PostPatch>,
) -> Result<HttpResponse> {
    let post = state
        .posts
        .update(&actor, post_id.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(PostView::from(post)))
}

pub async fn delete_post(
    state: web::Data<AppState>,
    actor: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.posts.delete(&actor, post_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::models::{AuthUser, Post};
    use actix_web::{http::StatusCode, test};
    use chrono::Utc;
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn post_by(author: &AuthUser) -> Post {
        Post {
            id: Uuid::new_v4(),
            text: "hello".into(),
            pub_date: Utc::now(),
            author_id: author.id,
            author: author.username.clone(),
            image: None,
            group_id: None,
        }
    }

    #[actix_web::test]
    async fn create_renders_author_username() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        let alice_id = alice.id;

        let mut repos = MockRepos::new();
        repos
            .posts
            .expect_create()
            .withf(move |p| p.author_id == alice_id)
            .returning(|p| {
                Ok(Post {
                    id: p.id,
                    text: p.text.clone(),
                    pub_date: p.pub_date,
                    author_id: p.author_id,
                    author: "alice".into(),
                    image: p.image.clone(),
                    group_id: p.group_id,
                })
            });
        let app = app(repos).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/posts/")
            .insert_header(bearer(&alice))
            .set_json(json!({"text": "hello", "author": "bob", "pub_date": "2001-01-01T00:00:00Z"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["author"], "alice");
        assert_eq!(body["text"], "hello");
        assert!(body["group"].is_null());
        assert_ne!(body["pub_date"], "2001-01-01T00:00:00Z");
    }

    #[actix_web::test]
    async fn blank_text_is_bad_request() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        let mut repos = MockRepos::new();
        repos.posts.expect_create().never();
        let app = app(repos).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&alice))
            .set_json(json!({"text": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["errors"]["text"].is_array());

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&alice))
            .set_json(json!({"text": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["text"][0], "This field may not be blank.");
    }

    #[actix_web::test]
    async fn put_with_null_group_clears_it() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        let mut post = post_by(&alice);
        post.group_id = Some(Uuid::new_v4());
        post.image = Some("posts/a.png".into());
        let post_id = post.id;
        let current = post.clone();

        let mut repos = MockRepos::new();
        repos
            .posts
            .expect_get()
            .returning(move |_| Ok(Some(current.clone())));
        repos
            .posts
            .expect_update()
            .withf(|_, update| update.group_id.is_none() && update.image.is_some())
            .times(1)
            .returning(move |_, update| {
                let mut stored = post.clone();
                stored.text = update.text.clone();
                stored.group_id = update.group_id;
                stored.image = update.image.clone();
                Ok(Some(stored))
            });
        let app = app(repos).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/posts/{}/", post_id))
            .insert_header(bearer(&alice))
            .set_json(json!({"text": "moved out", "group": null}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["group"].is_null());
        assert_eq!(body["image"], "posts/a.png");
        assert_eq!(body["text"], "moved out");
    }

    #[actix_web::test]
    async fn non_author_patch_is_forbidden() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        let bob = AuthUser::new(Uuid::new_v4(), "bob");
        let post = post_by(&alice);
        let post_id = post.id;

        let mut repos = MockRepos::new();
        repos
            .posts
            .expect_get()
            .returning(move |_| Ok(Some(post.clone())));
        repos.posts.expect_update().never();
        let app = app(repos).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{}/", post_id))
            .insert_header(bearer(&bob))
            .set_json(json!({"text": "mine"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn unknown_or_malformed_id_is_not_found() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        let mut repos = MockRepos::new();
        repos.posts.expect_get().returning(|_| Ok(None));
        let app = app(repos).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{}/", Uuid::new_v4()))
            .insert_header(bearer(&alice))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = test::TestRequest::get()
            .uri("/api/v1/posts/42/")
            .insert_header(bearer(&alice))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn limit_switches_to_page_envelope() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        let posts = vec![post_by(&alice), post_by(&alice)];

        let mut repos = MockRepos::new();
        repos
            .posts
            .expect_list()
            .withf(|_, page| page.map(|p| (p.limit, p.offset)) == Some((2, 0)))
            .returning(move |_, _| Ok(posts.clone()));
        repos.posts.expect_count().returning(|_| Ok(5));
        let app = app(repos).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/posts/?limit=2")
            .insert_header(bearer(&alice))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 5);
        assert_eq!(body["results"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["next"], "/api/v1/posts?limit=2&offset=2");
        assert!(body["previous"].is_null());
    }

    #[actix_web::test]
    async fn offset_past_the_end_has_no_next_page() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");

        let mut repos = MockRepos::new();
        repos.posts.expect_list().returning(|_, _| Ok(vec![]));
        repos.posts.expect_count().returning(|_| Ok(5));
        let app = app(repos).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/posts?limit=10&offset={}", i64::MAX))
            .insert_header(bearer(&alice))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["next"].is_null());
        assert_eq!(body["results"], json!([]));
    }

    #[actix_web::test]
    async fn delete_by_author_is_no_content() {
        let alice = AuthUser::new(Uuid::new_v4(), "alice");
        let post = post_by(&alice);
        let post_id = post.id;

        let mut repos = MockRepos::new();
        repos
            .posts
            .expect_get()
            .returning(move |_| Ok(Some(post.clone())));
        repos.posts.expect_delete().times(1).returning(|_| Ok(true));
        let app = app(repos).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{}", post_id))
            .insert_header(bearer(&alice))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );
    }
}

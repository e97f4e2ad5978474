//! # sb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the Post
//! Store. Mutating form endpoints redirect back to the page that shows
//! the result; `/api/posts` serves the raw snapshot document.

use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use sb_core::error::AppError;
use sb_core::models::VoteKind;
use sb_core::store::PostStore;
use sb_core::traits::IdentityProvider;
use sb_ui::{BoardTemplate, PostTemplate, PostView, ReplyView};
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// State shared across all Actix-web workers. The store sits behind a
/// single lock, so mutations serialize exactly as the domain expects.
pub struct AppState {
    pub store: RwLock<PostStore>,
    pub identity: Box<dyn IdentityProvider>,
}

#[derive(Deserialize)]
pub struct NewPostForm {
    pub content: String,
}

#[derive(Deserialize)]
pub struct VoteForm {
    pub choice: String,
}

#[derive(Deserialize)]
pub struct ReplyForm {
    pub content: String,
}

/// Renders the flat list view.
pub async fn board_index(data: web::Data<AppState>) -> impl Responder {
    let viewer = match viewer_id(&data).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let store = data.store.read().await;
    let posts = store
        .list()
        .iter()
        .map(|post| PostView::for_user(post, &viewer))
        .collect();

    render_page(BoardTemplate {
        title: "sphere-board".to_string(),
        posts,
    })
}

/// Renders a single post with its replies and the reply form.
pub async fn post_detail(data: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let post_id = path.into_inner();
    let viewer = match viewer_id(&data).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let store = data.store.read().await;
    match store.get(post_id) {
        Some(post) => render_page(PostTemplate {
            title: "Post on sphere-board".to_string(),
            post: PostView::for_user(post, &viewer),
            replies: post.replies.iter().map(ReplyView::from_reply).collect(),
        }),
        None => HttpResponse::NotFound().finish(),
    }
}

/// Creates a post from the composer form and bounces back to the board.
pub async fn create_post(
    data: web::Data<AppState>,
    form: web::Form<NewPostForm>,
) -> impl Responder {
    let author = match viewer_id(&data).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut store = data.store.write().await;
    match store.create(&form.content, Some(author)).await {
        Ok(_) => see_other("/"),
        Err(err) => error_response(&err),
    }
}

/// Applies one vote-machine step for the requesting user.
pub async fn vote_post(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Form<VoteForm>,
) -> impl Responder {
    let post_id = path.into_inner();
    let choice = match form.choice.as_str() {
        "like" => VoteKind::Like,
        "dislike" => VoteKind::Dislike,
        other => {
            return HttpResponse::BadRequest().body(format!("unknown vote choice: {other}"))
        }
    };

    let voter = match viewer_id(&data).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut store = data.store.write().await;
    match store.vote(post_id, &voter, choice).await {
        Ok(post) => see_other(&format!("/post/{}", post.id)),
        Err(err) => error_response(&err),
    }
}

/// Bumps the share counter.
pub async fn share_post(data: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let post_id = path.into_inner();

    let mut store = data.store.write().await;
    match store.share(post_id).await {
        Ok(post) => see_other(&format!("/post/{}", post.id)),
        Err(err) => error_response(&err),
    }
}

/// Appends a reply and returns to the post detail page.
pub async fn reply_post(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Form<ReplyForm>,
) -> impl Responder {
    let post_id = path.into_inner();
    let author = match viewer_id(&data).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut store = data.store.write().await;
    match store.reply(post_id, &form.content, Some(author)).await {
        Ok(_) => see_other(&format!("/post/{post_id}")),
        Err(err) => error_response(&err),
    }
}

/// Serves the full snapshot document as JSON.
pub async fn api_posts(data: web::Data<AppState>) -> impl Responder {
    let store = data.store.read().await;
    HttpResponse::Ok().json(store.snapshot())
}

async fn viewer_id(data: &AppState) -> Result<String, HttpResponse> {
    data.identity.get_or_create().await.map_err(|err| {
        log::error!("identity lookup failed: {err:#}");
        HttpResponse::InternalServerError().finish()
    })
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location.to_string()))
        .finish()
}

fn render_page<T: Template>(template: T) -> HttpResponse {
    match template.render() {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(err) => {
            log::error!("template rendering failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::Validation(_) => HttpResponse::BadRequest().body(err.to_string()),
        AppError::NotFound(..) => HttpResponse::NotFound().body(err.to_string()),
        _ => HttpResponse::InternalServerError().finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use sb_core::traits::MemoryArchive;

    const TEST_USER: &str = "user_test00000";

    struct FixedIdentity;

    #[async_trait]
    impl IdentityProvider for FixedIdentity {
        async fn get_or_create(&self) -> anyhow::Result<String> {
            Ok(TEST_USER.to_string())
        }
    }

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            store: RwLock::new(PostStore::new(Box::new(MemoryArchive::default()))),
            identity: Box::new(FixedIdentity),
        })
    }

    async fn seeded_post(state: &web::Data<AppState>, content: &str) -> Uuid {
        state
            .store
            .write()
            .await
            .create(content, Some(TEST_USER.to_string()))
            .await
            .expect("seed post")
            .id
    }

    macro_rules! service {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .configure(crate::configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_post_redirects_and_stores_the_author() {
        let state = test_state();
        let app = service!(state);

        let req = test::TestRequest::post()
            .uri("/post")
            .set_form([("content", "hello from the form")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let store = state.store.read().await;
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].author_id.as_deref(), Some(TEST_USER));
    }

    #[actix_web::test]
    async fn blank_content_is_a_bad_request() {
        let state = test_state();
        let app = service!(state);

        let req = test::TestRequest::post()
            .uri("/post")
            .set_form([("content", "   ")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.store.read().await.list().is_empty());
    }

    #[actix_web::test]
    async fn voting_twice_through_the_endpoint_toggles_off() {
        let state = test_state();
        let post_id = seeded_post(&state, "toggle me").await;
        let app = service!(state);

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri(&format!("/post/{post_id}/vote"))
                .set_form([("choice", "like")])
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        }

        let store = state.store.read().await;
        let post = store.get(post_id).expect("post exists");
        assert_eq!(post.likes, 0);
        assert!(post.user_vote(TEST_USER).is_none());
    }

    #[actix_web::test]
    async fn unknown_vote_choice_is_rejected() {
        let state = test_state();
        let post_id = seeded_post(&state, "no such choice").await;
        let app = service!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/post/{post_id}/vote"))
            .set_form([("choice", "love")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn engagement_on_a_missing_post_is_not_found() {
        let state = test_state();
        let app = service!(state);
        let missing = Uuid::now_v7();

        let vote = test::TestRequest::post()
            .uri(&format!("/post/{missing}/vote"))
            .set_form([("choice", "like")])
            .to_request();
        assert_eq!(
            test::call_service(&app, vote).await.status(),
            StatusCode::NOT_FOUND
        );

        let share = test::TestRequest::post()
            .uri(&format!("/post/{missing}/share"))
            .to_request();
        assert_eq!(
            test::call_service(&app, share).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn reply_form_appends_and_redirects_to_the_post() {
        let state = test_state();
        let post_id = seeded_post(&state, "parent").await;
        let app = service!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/post/{post_id}/reply"))
            .set_form([("content", "nice one")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(location, format!("/post/{post_id}"));

        let store = state.store.read().await;
        assert_eq!(store.get(post_id).expect("post").reply_count(), 1);
    }

    #[actix_web::test]
    async fn board_page_renders_posts() {
        let state = test_state();
        seeded_post(&state, "visible on the board").await;
        let app = service!(state);

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("visible on the board"));
    }

    #[actix_web::test]
    async fn detail_page_is_not_found_for_unknown_ids() {
        let state = test_state();
        let app = service!(state);

        let req = test::TestRequest::get()
            .uri(&format!("/post/{}", Uuid::now_v7()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn api_posts_serves_the_snapshot_document() {
        let state = test_state();
        let post_id = seeded_post(&state, "over the wire").await;
        let app = service!(state);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let value: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let posts = value["posts"].as_array().expect("posts array");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["id"], post_id.to_string());
        assert_eq!(posts[0]["content"], "over the wire");
        assert!(posts[0]["userVotes"].is_object());
        assert!(posts[0]["replies"].is_array());
    }
}

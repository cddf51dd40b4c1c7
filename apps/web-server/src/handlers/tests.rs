use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use blogicum_core::domain::{Category, Comment, Post, PostDraft, User};
use blogicum_core::ports::{PasswordService, Repositories, TokenService};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

struct Fixture {
    store: InMemoryStore,
    repos: Repositories,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let config = JwtConfig {
            secret: "handler-test-secret".to_string(),
            ..JwtConfig::default()
        };
        Self {
            repos: store.repositories(),
            store,
            tokens: Arc::new(JwtTokenService::new(config)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    fn bearer(&self, user: &User) -> (header::HeaderName, String) {
        let token = self.tokens.generate_token(user.id, &user.username).unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    async fn user(&self, username: &str) -> User {
        self.repos
            .users
            .insert(User::new(username.into(), format!("{username}@example.com"), "x".into()))
            .await
            .unwrap()
    }

    async fn category(&self, slug: &str, is_published: bool) -> Category {
        let mut category = Category::new(slug.into(), String::new(), slug.into());
        category.is_published = is_published;
        self.repos.categories.insert(category).await.unwrap()
    }

    async fn post(&self, author: &User, category: Option<&Category>, hours_ago: i64) -> Post {
        let draft = PostDraft {
            title: "Post".into(),
            text: "Body".into(),
            pub_date: Utc::now() - Duration::hours(hours_ago),
            location_id: None,
            category_id: category.map(|c| c.id),
            image: None,
            is_published: true,
        };
        self.repos
            .posts
            .insert(Post::new(author.id, draft, Utc::now()))
            .await
            .unwrap()
    }

    async fn comment(&self, post: &Post, author: &User, text: &str) -> Comment {
        self.repos
            .comments
            .insert(Comment::new(post.id, author.id, text.into(), Utc::now()))
            .await
            .unwrap()
    }
}

macro_rules! app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(AppState::in_memory($fixture.store.clone())))
                .app_data(web::Data::new($fixture.tokens.clone()))
                .app_data(web::Data::new($fixture.passwords.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn location<B>(res: &ServiceResponse<B>) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn post_form(category_id: Option<i64>) -> Value {
    json!({
        "title": "Fresh post",
        "text": "Written today",
        "pub_date": Utc::now().to_rfc3339(),
        "category": category_id,
    })
}

#[actix_rt::test]
async fn test_index_shows_only_public_posts() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let open = fx.category("travel", true).await;
    let hidden = fx.category("drafts", false).await;

    let visible = fx.post(&alice, Some(&open), 1).await;
    fx.post(&alice, Some(&open), -24).await;
    fx.post(&alice, Some(&hidden), 1).await;
    fx.post(&alice, None, 1).await;
    let mut unpublished = fx.post(&alice, Some(&open), 1).await;
    unpublished.is_published = false;
    fx.repos.posts.update(unpublished).await.unwrap();

    let app = app!(fx);
    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["items"][0]["post"]["id"], visible.id);
}

#[actix_rt::test]
async fn test_index_paginates_by_ten() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let open = fx.category("travel", true).await;
    for hours_ago in 1..=12 {
        fx.post(&alice, Some(&open), hours_ago).await;
    }

    let app = app!(fx);
    let first: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
    let second: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?page=2").to_request(),
    )
    .await;
    let garbage: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?page=abc").to_request(),
    )
    .await;
    let too_far: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?page=99").to_request(),
    )
    .await;

    assert_eq!(first["data"]["items"].as_array().unwrap().len(), 10);
    assert_eq!(first["data"]["num_pages"], 2);
    assert_eq!(second["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(garbage["data"]["number"], 1);
    assert_eq!(too_far["data"]["number"], 2);
}

#[actix_rt::test]
async fn test_unknown_or_hidden_category_is_404() {
    let fx = Fixture::new();
    fx.category("drafts", false).await;

    let app = app!(fx);
    for uri in ["/category/drafts/", "/category/nope/"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_rt::test]
async fn test_scheduled_post_visible_to_author_only() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let open = fx.category("travel", true).await;
    let scheduled = fx.post(&alice, Some(&open), -48).await;
    let uri = format!("/posts/{}/", scheduled.id);

    let app = app!(fx);
    let anon = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let other = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(fx.bearer(&bob))
            .to_request(),
    )
    .await;
    let author: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(fx.bearer(&alice))
            .to_request(),
    )
    .await;

    assert_eq!(anon.status(), StatusCode::NOT_FOUND);
    assert_eq!(other.status(), StatusCode::NOT_FOUND);
    assert_eq!(author["data"]["card"]["post"]["id"], scheduled.id);
    assert_eq!(author["data"]["comment_form"]["text"], "");
}

#[actix_rt::test]
async fn test_own_profile_lists_unpublished_posts() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let open = fx.category("travel", true).await;
    fx.post(&alice, Some(&open), -48).await;

    let app = app!(fx);
    let anon: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/profile/alice/").to_request(),
    )
    .await;
    let owner: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/profile/alice/")
            .insert_header(fx.bearer(&alice))
            .to_request(),
    )
    .await;

    assert_eq!(anon["data"]["page"]["count"], 0);
    assert_eq!(anon["data"]["is_owner"], false);
    assert_eq!(owner["data"]["page"]["count"], 1);
    assert_eq!(owner["data"]["is_owner"], true);
}

#[actix_rt::test]
async fn test_create_post_requires_login() {
    let fx = Fixture::new();
    let open = fx.category("travel", true).await;

    let app = app!(fx);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .set_json(post_form(Some(open.id)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=%2Fposts%2Fcreate%2F");
}

#[actix_rt::test]
async fn test_create_post_redirects_to_profile() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let open = fx.category("travel", true).await;

    let app = app!(fx);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header(fx.bearer(&alice))
            .set_json(post_form(Some(open.id)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/alice/");
    let created = fx.repos.posts.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(created.author_id, alice.id);
    assert_eq!(created.title, "Fresh post");
}

#[actix_rt::test]
async fn test_invalid_post_form_is_rejected_without_write() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;

    let app = app!(fx);
    let missing_category = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header(fx.bearer(&alice))
            .set_json(post_form(None))
            .to_request(),
    )
    .await;
    assert_eq!(missing_category.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(missing_category).await;
    assert!(body["errors"]["category"].is_array());

    let unknown_category = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header(fx.bearer(&alice))
            .set_json(post_form(Some(42)))
            .to_request(),
    )
    .await;
    assert_eq!(unknown_category.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert!(fx.repos.posts.find_by_id(1).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_non_author_edit_redirects_to_post() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let open = fx.category("travel", true).await;
    let post = fx.post(&alice, Some(&open), 1).await;

    let app = app!(fx);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(fx.bearer(&bob))
            .set_json(post_form(Some(open.id)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", post.id));
    let stored = fx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Post");
}

#[actix_rt::test]
async fn test_access_is_checked_before_the_body() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let open = fx.category("travel", true).await;
    let post = fx.post(&alice, Some(&open), 1).await;

    let app = app!(fx);
    let anon_comment = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(anon_comment.status(), StatusCode::FOUND);
    assert!(location(&anon_comment).starts_with("/auth/login/?next="));

    let foreign_edit = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(fx.bearer(&bob))
            .set_json(json!({ "title": "Hijacked", "text": "x" }))
            .to_request(),
    )
    .await;
    assert_eq!(foreign_edit.status(), StatusCode::FOUND);
    assert_eq!(location(&foreign_edit), format!("/posts/{}/", post.id));

    let anon_create = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(anon_create.status(), StatusCode::FOUND);

    let stored = fx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Post");
    assert!(fx.repos.comments.for_post(post.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_author_edit_with_missing_fields_is_422() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let open = fx.category("travel", true).await;
    let post = fx.post(&alice, Some(&open), 1).await;

    let app = app!(fx);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(fx.bearer(&alice))
            .set_json(json!({ "text": "Only text", "category": open.id }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"]["title"][0], "This field is required.");

    let stored = fx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Body");
}

#[actix_rt::test]
async fn test_malformed_body_from_author_is_400() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;

    let app = app!(fx);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header(fx.bearer(&alice))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(fx.repos.posts.find_by_id(1).await.unwrap().is_none());
}

#[core::prelude::v1::test]
fn test_missing_field_is_read_from_serde_message() {
    assert_eq!(
        super::missing_field("missing field `pub_date` at line 1 column 2"),
        Some("pub_date")
    );
    assert_eq!(super::missing_field("invalid type: string"), None);
}

#[actix_rt::test]
async fn test_author_edit_and_delete() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let open = fx.category("travel", true).await;
    let post = fx.post(&alice, Some(&open), 1).await;
    fx.comment(&post, &alice, "first").await;

    let app = app!(fx);
    let form: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(fx.bearer(&alice))
            .to_request(),
    )
    .await;
    assert_eq!(form["data"]["form"]["title"], "Post");

    let edited = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(fx.bearer(&alice))
            .set_json(post_form(Some(open.id)))
            .to_request(),
    )
    .await;
    assert_eq!(location(&edited), format!("/posts/{}/", post.id));

    let deleted = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/delete/", post.id))
            .insert_header(fx.bearer(&alice))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::FOUND);
    assert_eq!(location(&deleted), "/");

    let gone = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/", post.id))
            .insert_header(fx.bearer(&alice))
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    assert!(fx.repos.comments.for_post(post.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_comment_lifecycle() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let open = fx.category("travel", true).await;
    let post = fx.post(&alice, Some(&open), 1).await;

    let app = app!(fx);
    let anon = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .set_json(json!({ "text": "hello" }))
            .to_request(),
    )
    .await;
    assert_eq!(anon.status(), StatusCode::FOUND);
    assert!(location(&anon).starts_with("/auth/login/?next="));

    let added = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .insert_header(fx.bearer(&bob))
            .set_json(json!({ "text": "hello" }))
            .to_request(),
    )
    .await;
    assert_eq!(location(&added), format!("/posts/{}/", post.id));

    let comments = fx.repos.comments.for_post(post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    let comment = &comments[0];

    let hijack = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit_comment/{}/", post.id, comment.id))
            .insert_header(fx.bearer(&alice))
            .set_json(json!({ "text": "rewritten" }))
            .to_request(),
    )
    .await;
    assert_eq!(hijack.status(), StatusCode::FOUND);
    assert_eq!(location(&hijack), format!("/posts/{}/", post.id));

    let edited = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit_comment/{}/", post.id, comment.id))
            .insert_header(fx.bearer(&bob))
            .set_json(json!({ "text": "edited" }))
            .to_request(),
    )
    .await;
    assert_eq!(edited.status(), StatusCode::FOUND);
    let stored = fx.repos.comments.find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "edited");

    let removed = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/delete_comment/{}/", post.id, comment.id))
            .insert_header(fx.bearer(&bob))
            .to_request(),
    )
    .await;
    assert_eq!(location(&removed), format!("/posts/{}/", post.id));
    assert!(fx.repos.comments.find_by_id(comment.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_blank_comment_is_rejected() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let open = fx.category("travel", true).await;
    let post = fx.post(&alice, Some(&open), 1).await;

    let app = app!(fx);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .insert_header(fx.bearer(&alice))
            .set_json(json!({ "text": "  " }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(fx.repos.comments.for_post(post.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_missing_or_misplaced_comment_is_404() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let open = fx.category("travel", true).await;
    let first = fx.post(&alice, Some(&open), 1).await;
    let second = fx.post(&alice, Some(&open), 2).await;
    let comment = fx.comment(&first, &alice, "on the first post").await;

    let app = app!(fx);
    let missing = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/delete_comment/999/", first.id))
            .insert_header(fx.bearer(&alice))
            .to_request(),
    )
    .await;
    let misplaced = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/edit_comment/{}/", second.id, comment.id))
            .insert_header(fx.bearer(&alice))
            .to_request(),
    )
    .await;

    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(misplaced.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_profile_edit_guards_and_rename() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;

    let app = app!(fx);
    let foreign = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/bob/edit/")
            .insert_header(fx.bearer(&alice))
            .to_request(),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::FOUND);
    assert_eq!(location(&foreign), "/profile/bob/");

    let taken = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/alice/edit/")
            .insert_header(fx.bearer(&alice))
            .set_json(json!({ "username": bob.username }))
            .to_request(),
    )
    .await;
    assert_eq!(taken.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let renamed = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/alice/edit/")
            .insert_header(fx.bearer(&alice))
            .set_json(json!({ "username": "alice2", "first_name": "Alice" }))
            .to_request(),
    )
    .await;
    assert_eq!(renamed.status(), StatusCode::FOUND);
    assert_eq!(location(&renamed), "/profile/alice2/");

    let stored = fx.repos.users.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "alice2");
    assert_eq!(stored.first_name, "Alice");
}

#[actix_rt::test]
async fn test_register_then_login() {
    let fx = Fixture::new();
    let app = app!(fx);

    let registered = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/registration/")
            .set_json(json!({ "username": "carol", "password": "long-enough" }))
            .to_request(),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);

    let short = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/registration/")
            .set_json(json!({ "username": "dave", "password": "short" }))
            .to_request(),
    )
    .await;
    assert_eq!(short.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let wrong = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({ "username": "carol", "password": "not-the-one" }))
            .to_request(),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let login: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/?next=/posts/create/")
            .set_json(json!({ "username": "carol", "password": "long-enough" }))
            .to_request(),
    )
    .await;
    assert_eq!(login["token_type"], "Bearer");
    assert_eq!(login["next"], "/posts/create/");

    let token = login["access_token"].as_str().unwrap();
    let me: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/auth/me/")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(me["data"]["username"], "carol");
}

#[actix_rt::test]
async fn test_me_requires_token() {
    let fx = Fixture::new();
    let app = app!(fx);

    let res = test::call_service(&app, test::TestRequest::get().uri("/auth/me/").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_health_echoes_request_id() {
    let fx = Fixture::new();
    let app = app!(fx);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/health")
            .insert_header(("X-Request-ID", "abc-123"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-request-id").unwrap(), "abc-123");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["request_id"], "abc-123");
}

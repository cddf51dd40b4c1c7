//! Post pages and forms.

use std::convert::Infallible;

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Serialize;

use blogicum_core::domain::{Post, PostDetail, PostDraft};
use blogicum_core::routes;
use blogicum_shared::forms::{CommentForm, PostForm};

use super::{deny, found, ok, parse_form, respond};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Post page payload: the post, its comments and a blank comment form.
#[derive(Serialize)]
struct PostPage {
    #[serde(flatten)]
    detail: PostDetail,
    comment_form: CommentForm,
}

/// A post with the form it would be edited through.
#[derive(Serialize)]
struct PostFormPage {
    post_id: i64,
    form: PostForm,
}

fn form_from_post(post: &Post) -> PostForm {
    PostForm {
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: post.pub_date,
        location: post.location_id,
        category: post.category_id,
        image: post.image.clone(),
        is_published: post.is_published,
    }
}

fn draft_from_form(form: PostForm) -> PostDraft {
    PostDraft {
        title: form.title,
        text: form.text,
        pub_date: form.pub_date,
        location_id: form.location,
        category_id: form.category,
        image: form.image,
        is_published: form.is_published,
    }
}

/// GET /posts/{post_id}/
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let access = state
        .blog
        .post_detail(&identity.viewer(), Utc::now(), *post_id)
        .await?;

    respond(access, |detail| {
        ok(PostPage {
            detail,
            comment_form: CommentForm::default(),
        })
    })
}

/// GET /posts/create/
pub async fn create_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let access = state.blog.new_post_form(&identity.viewer());

    respond(access, |_| ok(PostForm::blank(Utc::now())))
}

/// POST /posts/create/ - redirects to the author's profile.
pub async fn create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    if let Err(denied) = state.blog.new_post_form(&viewer).into_allowed::<Infallible>() {
        return deny(denied);
    }

    let form: PostForm = parse_form(&body)?;

    let access = state
        .blog
        .create_post(&viewer, Utc::now(), draft_from_form(form))
        .await?;

    respond(access, |card| found(&routes::profile_path(&card.author.username)))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let access = state
        .blog
        .post_for_edit(&identity.viewer(), *post_id)
        .await?;

    respond(access, |post| {
        ok(PostFormPage {
            post_id: post.id,
            form: form_from_post(&post),
        })
    })
}

/// POST /posts/{post_id}/edit/ - redirects to the post.
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let post_id = post_id.into_inner();
    if let Err(denied) = state
        .blog
        .post_for_edit(&viewer, post_id)
        .await?
        .into_allowed::<Infallible>()
    {
        return deny(denied);
    }

    let form: PostForm = parse_form(&body)?;

    let access = state
        .blog
        .update_post(&viewer, post_id, draft_from_form(form))
        .await?;

    respond(access, |post| found(&routes::post_detail_path(post.id)))
}

/// GET /posts/{post_id}/delete/ - the post as it would be deleted.
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let access = state
        .blog
        .post_for_delete(&identity.viewer(), *post_id)
        .await?;

    respond(access, |post| {
        ok(PostFormPage {
            post_id: post.id,
            form: form_from_post(&post),
        })
    })
}

/// POST /posts/{post_id}/delete/ - redirects to the front page.
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let access = state
        .blog
        .delete_post(&identity.viewer(), *post_id)
        .await?;

    respond(access, |()| found(&routes::index_path()))
}

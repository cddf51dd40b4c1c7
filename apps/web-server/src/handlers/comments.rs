//! Comment forms.

use std::convert::Infallible;

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::policy::require_login;
use blogicum_core::routes;
use blogicum_shared::forms::CommentForm;

use super::{deny, found, ok, parse_form, respond};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /posts/{post_id}/comment/ - redirects to the post.
pub async fn create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let post_id = post_id.into_inner();
    if let Err(denied) = require_login(&viewer, &routes::post_detail_path(post_id))
        .into_allowed::<Infallible>()
    {
        return deny(denied);
    }

    let form: CommentForm = parse_form(&body)?;

    let access = state
        .blog
        .add_comment(&viewer, Utc::now(), post_id, form.text)
        .await?;

    respond(access, |comment| found(&routes::post_detail_path(comment.post_id)))
}

/// GET /posts/{post_id}/edit_comment/{comment_id}/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let access = state
        .blog
        .comment_for_edit(&identity.viewer(), post_id, comment_id)
        .await?;

    respond(access, ok)
}

/// POST /posts/{post_id}/edit_comment/{comment_id}/ - redirects to the post.
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(i64, i64)>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let (post_id, comment_id) = path.into_inner();
    if let Err(denied) = state
        .blog
        .comment_for_edit(&viewer, post_id, comment_id)
        .await?
        .into_allowed::<Infallible>()
    {
        return deny(denied);
    }

    let form: CommentForm = parse_form(&body)?;

    let access = state
        .blog
        .update_comment(&viewer, post_id, comment_id, form.text)
        .await?;

    respond(access, |comment| found(&routes::post_detail_path(comment.post_id)))
}

/// GET /posts/{post_id}/delete_comment/{comment_id}/
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let access = state
        .blog
        .comment_for_delete(&identity.viewer(), post_id, comment_id)
        .await?;

    respond(access, ok)
}

/// POST /posts/{post_id}/delete_comment/{comment_id}/ - redirects to the post.
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let access = state
        .blog
        .delete_comment(&identity.viewer(), post_id, comment_id)
        .await?;

    respond(access, |()| found(&routes::post_detail_path(post_id)))
}

//! Post listings: front page, category pages and profiles.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use super::{PageQuery, ok, respond};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .index(&identity.viewer(), Utc::now(), query.page.as_deref())
        .await?;

    Ok(ok(page))
}

/// GET /category/{slug}/
pub async fn category_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let access = state
        .blog
        .category_posts(&identity.viewer(), Utc::now(), &slug, query.page.as_deref())
        .await?;

    respond(access, ok)
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let access = state
        .blog
        .profile(&identity.viewer(), Utc::now(), &username, query.page.as_deref())
        .await?;

    respond(access, ok)
}
